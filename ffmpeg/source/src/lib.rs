/*!
    Media input and demuxing for the ffmpeg crate ecosystem.

    This crate opens a media file, selects its best video stream and reads
    compressed packets from it in file order. It also owns the conversions
    between FFmpeg's types and [`ffmpeg_types`], shared by the decode, encode
    and sink crates.

    # Example

    ```ignore
    use ffmpeg_source::Source;
    use ffmpeg_types::Demuxer;

    let mut source = Source::open("video.mp4")?;
    let stream = source.video_stream().expect("no video");

    // Decoders are created from the stream's codec parameters
    let codec_config = source.take_video_codec_config().unwrap();

    while let Some(packet) = source.next_packet()? {
        if packet.stream_index == stream.index {
            // Decode packet
        }
    }
    ```
*/

pub use ffmpeg_types::{Error, Packet, Result, VideoStreamInfo};

pub mod convert;
mod source;

pub use source::{CodecConfig, Source};

/**
    Initialize FFmpeg. Safe to call any number of times.
*/
pub fn init() -> Result<()> {
    ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))
}
