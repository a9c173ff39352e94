/*!
    Video decoding for the ffmpeg crate ecosystem.

    This crate turns compressed packets into [`Picture`]s. Decoded frames
    are converted into whatever pixel format and size the caller's picture
    was allocated with, so downstream stages never see FFmpeg frames.

    # Example

    ```ignore
    use ffmpeg_decode::{VideoDecoder, VideoDecoderConfig};
    use ffmpeg_source::Source;
    use ffmpeg_types::{Decoder, Demuxer, Picture, PixelFormat, Received};

    let mut source = Source::open("video.mp4")?;
    let stream = source.video_stream().unwrap();
    let codec_config = source.take_video_codec_config().unwrap();

    let mut decoder =
        VideoDecoder::new(codec_config, stream.time_base, VideoDecoderConfig::new())?;
    let mut picture =
        Picture::alloc(PixelFormat::Yuv420p, stream.width, stream.height, stream.time_base)?;

    while let Some(packet) = source.next_packet()? {
        if packet.stream_index != stream.index {
            continue;
        }
        decoder.submit(&packet)?;
        while let Received::Ready(()) = decoder.receive(&mut picture)? {
            // Use picture
        }
    }
    ```
*/

pub use ffmpeg_source::CodecConfig;
pub use ffmpeg_types::{Error, Packet, Picture, Result};

mod config;
mod video;

pub use config::VideoDecoderConfig;
pub use video::VideoDecoder;
