/*!
    Video encoding for the ffmpeg crate ecosystem.

    This crate turns [`Picture`]s into compressed packets. The encoder is
    opened once from fully resolved [`EncoderSettings`] and never
    reconfigured; pictures must match its size and pixel format.

    # Example

    ```ignore
    use ffmpeg_encode::{VideoEncoder, VideoEncoderConfig};
    use ffmpeg_types::{Encoder, Received};

    let mut encoder = VideoEncoder::new(&settings, VideoEncoderConfig::new())?;

    encoder.submit(&picture)?;
    while let Received::Ready(packet) = encoder.receive()? {
        // Write packet
    }

    encoder.flush()?;
    while let Received::Ready(packet) = encoder.receive()? {
        // Write remaining packets
    }
    ```
*/

pub use ffmpeg_types::{EncoderSettings, Error, Packet, Picture, Result};

mod config;
mod video;

pub use config::VideoEncoderConfig;
pub use video::VideoEncoder;
