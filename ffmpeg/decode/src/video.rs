/*!
    Video decoder implementation.
*/

use ffmpeg_next::{
    codec::{self, decoder::Video as VideoDecoderFFmpeg, threading},
    format::Pixel,
    packet::Mut as PacketMut,
    software::scaling,
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::{debug, trace};

use ffmpeg_source::CodecConfig;
use ffmpeg_source::convert::{error_from_ffmpeg, frame_to_picture, is_again, pixel_to_ffmpeg};
use ffmpeg_types::{Decoder, Error, Packet, Picture, Pts, Rational, Received, Result, Submit};

use crate::config::VideoDecoderConfig;

/**
    Source and destination geometry a scaler was created for.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Conversion {
    src: (Pixel, u32, u32),
    dst: (Pixel, u32, u32),
}

struct Scaler {
    context: scaling::Context,
    conversion: Conversion,
    output: VideoFrameFFmpeg,
}

/**
    Presentation timestamp of a decoded frame, falling back to FFmpeg's
    best-effort guess only when the frame carries none.
*/
fn frame_pts(frame: &VideoFrameFFmpeg) -> Option<Pts> {
    frame.pts().or(frame.timestamp()).map(Pts)
}

/**
    Video decoder.

    Decodes packets of one video stream. Each received picture is written
    into the caller's picture, converting pixel format and size when the
    decoded frame differs from it.
*/
pub struct VideoDecoder {
    decoder: VideoDecoderFFmpeg,
    time_base: Rational,
    frame: VideoFrameFFmpeg,
    scaler: Option<Scaler>,
}

impl VideoDecoder {
    /**
        Create a new video decoder from codec configuration.

        # Arguments

        * `codec_config` - Codec configuration from the source
        * `time_base` - Time base of the stream's packets
        * `config` - Decoder configuration
    */
    pub fn new(
        codec_config: CodecConfig,
        time_base: Rational,
        config: VideoDecoderConfig,
    ) -> Result<Self> {
        ffmpeg_source::init()?;

        let parameters = codec_config.into_parameters();

        let mut decoder_ctx = codec::context::Context::from_parameters(parameters)
            .map_err(|e| Error::codec(e.to_string()))?;

        decoder_ctx.set_threading(threading::Config {
            kind: threading::Type::Frame,
            count: config.thread_count,
        });

        let decoder = decoder_ctx
            .decoder()
            .video()
            .map_err(|e| Error::codec(e.to_string()))?;

        debug!(
            codec = ?decoder.id(),
            width = decoder.width(),
            height = decoder.height(),
            format = ?decoder.format(),
            threads = config.thread_count,
            "opened video decoder"
        );

        Ok(Self {
            decoder,
            time_base,
            frame: VideoFrameFFmpeg::empty(),
            scaler: None,
        })
    }

    /**
        Get the time base for this decoder.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Write the last received frame into `picture`.
    */
    fn write_picture(&mut self, picture: &mut Picture) -> Result<()> {
        let conversion = Conversion {
            src: (self.frame.format(), self.frame.width(), self.frame.height()),
            dst: (
                pixel_to_ffmpeg(picture.format()),
                picture.width(),
                picture.height(),
            ),
        };

        if conversion.src == conversion.dst {
            frame_to_picture(&self.frame, picture)?;
        } else {
            let scaler = Self::scaler_for(&mut self.scaler, conversion)?;
            scaler
                .context
                .run(&self.frame, &mut scaler.output)
                .map_err(|e| Error::codec(e.to_string()))?;
            frame_to_picture(&scaler.output, picture)?;
        }

        picture.pts = frame_pts(&self.frame);
        picture.time_base = self.time_base;
        Ok(())
    }

    /**
        The scaler for `conversion`, created on first use and recreated
        whenever the decoded geometry changes.
    */
    fn scaler_for(slot: &mut Option<Scaler>, conversion: Conversion) -> Result<&mut Scaler> {
        let stale = slot
            .as_ref()
            .is_none_or(|scaler| scaler.conversion != conversion);

        if stale {
            let (src_format, src_width, src_height) = conversion.src;
            let (dst_format, dst_width, dst_height) = conversion.dst;
            if dst_format == Pixel::None {
                return Err(Error::unsupported_format(
                    "picture format has no FFmpeg equivalent",
                ));
            }

            let context = scaling::Context::get(
                src_format,
                src_width,
                src_height,
                dst_format,
                dst_width,
                dst_height,
                scaling::Flags::BILINEAR,
            )
            .map_err(|e| Error::codec(e.to_string()))?;

            debug!(
                from = ?conversion.src,
                to = ?conversion.dst,
                "converting decoded frames"
            );

            *slot = Some(Scaler {
                context,
                conversion,
                output: VideoFrameFFmpeg::empty(),
            });
        }

        slot.as_mut().ok_or_else(|| Error::codec("scaler missing"))
    }
}

impl Decoder for VideoDecoder {
    fn submit(&mut self, packet: &Packet) -> Result<Submit> {
        // Create FFmpeg packet from our packet
        let mut ffmpeg_pkt = if packet.data.is_empty() {
            ffmpeg_next::Packet::empty()
        } else {
            ffmpeg_next::Packet::copy(&packet.data)
        };

        // Set timing info
        unsafe {
            let pkt_ptr = ffmpeg_pkt.as_mut_ptr();
            if let Some(pts) = packet.pts {
                (*pkt_ptr).pts = pts.0;
            }
            if let Some(dts) = packet.dts {
                (*pkt_ptr).dts = dts.0;
            }
            (*pkt_ptr).duration = packet.duration.0;
        }
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        match self.decoder.send_packet(&ffmpeg_pkt) {
            Ok(()) => Ok(Submit::Accepted),
            Err(e) if is_again(&e) => {
                trace!("decoder busy");
                Ok(Submit::Busy)
            }
            Err(e) => Err(error_from_ffmpeg(e)),
        }
    }

    fn receive(&mut self, picture: &mut Picture) -> Result<Received<()>> {
        match self.decoder.receive_frame(&mut self.frame) {
            Ok(()) => {
                self.write_picture(picture)?;
                Ok(Received::Ready(()))
            }
            Err(e) if is_again(&e) => Ok(Received::NotReady),
            Err(ffmpeg_next::Error::Eof) => Ok(Received::EndOfStream),
            Err(e) => Err(error_from_ffmpeg(e)),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self.decoder.send_eof() {
            // Already flushed
            Ok(()) | Err(ffmpeg_next::Error::Eof) => Ok(()),
            Err(e) => Err(error_from_ffmpeg(e)),
        }
    }
}

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("time_base", &self.time_base)
            .field("width", &self.decoder.width())
            .field("height", &self.decoder.height())
            .field("scaling", &self.scaler.as_ref().map(|s| s.conversion))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pts: Option<i64>, best_effort: Option<i64>) -> VideoFrameFFmpeg {
        let mut frame = VideoFrameFFmpeg::new(Pixel::GRAY8, 2, 2);
        frame.set_pts(pts);
        unsafe {
            (*frame.as_mut_ptr()).best_effort_timestamp =
                best_effort.unwrap_or(ffmpeg_next::ffi::AV_NOPTS_VALUE);
        }
        frame
    }

    #[test]
    fn frame_pts_prefers_the_stored_pts() {
        assert_eq!(frame_pts(&frame(Some(3), Some(5))), Some(Pts(3)));
    }

    #[test]
    fn frame_pts_falls_back_to_best_effort() {
        assert_eq!(frame_pts(&frame(None, Some(5))), Some(Pts(5)));
        assert_eq!(frame_pts(&frame(None, None)), None);
    }
}
