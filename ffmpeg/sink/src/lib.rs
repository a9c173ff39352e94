/*!
    Media output and muxing for the ffmpeg crate ecosystem.

    This crate handles the output side of the media pipeline. It takes encoded
    packets from the encoder and writes them into a container file: MP4,
    Matroska or MPEG-TS.

    # Basic Usage

    ```ignore
    use ffmpeg_sink::{ContainerFormat, Sink, SinkConfig};
    use ffmpeg_types::{Encoder, Muxer};

    let mut sink = Sink::file("output.mp4", SinkConfig::new(ContainerFormat::Mp4))?;

    // The encoder must know about global headers before it is opened
    let config = VideoEncoderConfig::new().with_global_header(sink.requires_global_header());
    let encoder = VideoEncoder::new(&settings, config)?;

    sink.add_video_stream(encoder.codec(), &encoder.parameters()?, encoder.time_base())?;
    sink.write_header()?;

    // Write encoded packets, in sink.time_base()
    for packet in encoded_packets {
        sink.write(packet)?;
    }

    // Finalize the file (critical!)
    sink.finish()?;
    ```

    # Container Formats

    - **MP4**: Most compatible, supports H.264/H.265/AV1
    - **MKV**: Most flexible, supports virtually any codec
    - **MPEG-TS**: Transport stream, good for streaming

    ```ignore
    // MP4 with fast start (moov at beginning for streaming)
    SinkConfig::new(ContainerFormat::Mp4).with_fast_start(true)

    // Whatever the output path's extension says
    SinkConfig::guess()
    ```

    # Finalization

    Always call `finish()` to properly finalize the container. Without it:
    - Duration may be unknown to players
    - Seeking may not work
    - Some players won't open the file
*/

pub use ffmpeg_types::{Error, Packet, Rational, Result};

mod config;
mod sink;

pub use config::{ContainerFormat, SinkConfig};
pub use sink::Sink;
