/*!
    Video encoder implementation.
*/

use ffmpeg_next::{
    Codec,
    codec::{self, threading},
    encoder,
    ffi,
    format::Pixel,
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::{debug, trace};

use ffmpeg_source::convert::{
    codec_to_ffmpeg, error_from_ffmpeg, is_again, picture_to_frame, pixel_to_ffmpeg,
    rational_to_ffmpeg,
};
use ffmpeg_types::{
    EncoderSettings, Encoder, Error, MediaDuration, Packet, Picture, Pts, Rational, Received,
    Result, Submit,
};

use crate::config::VideoEncoderConfig;

/**
    Video encoder.

    Encodes pictures of a fixed size and pixel format. Packets are emitted
    in decode order with timestamps in [`Encoder::time_base`].
*/
pub struct VideoEncoder {
    encoder: encoder::video::Encoder,
    codec: Codec,
    time_base: Rational,
    frame: VideoFrameFFmpeg,
}

impl VideoEncoder {
    /**
        Find and open an encoder for `settings`.

        A named encoder in the settings takes precedence over the default
        encoder of the codec.
    */
    pub fn new(settings: &EncoderSettings, config: VideoEncoderConfig) -> Result<Self> {
        ffmpeg_source::init()?;

        let codec = match &settings.encoder_name {
            Some(name) => encoder::find_by_name(name)
                .ok_or_else(|| Error::unsupported_format(format!("no encoder named '{name}'")))?,
            None => encoder::find(codec_to_ffmpeg(settings.codec)).ok_or_else(|| {
                Error::unsupported_format(format!("no encoder for {}", settings.codec))
            })?,
        };

        let format = pixel_to_ffmpeg(settings.pixel_format);
        if format == Pixel::None {
            return Err(Error::unsupported_format(format!(
                "{} has no FFmpeg equivalent",
                settings.pixel_format
            )));
        }

        let ctx = codec::Context::new_with_codec(codec);
        let mut enc_ctx = ctx
            .encoder()
            .video()
            .map_err(|e| Error::codec(e.to_string()))?;

        enc_ctx.set_threading(threading::Config {
            kind: threading::Type::Frame,
            count: config.thread_count,
        });
        enc_ctx.set_width(settings.width);
        enc_ctx.set_height(settings.height);
        enc_ctx.set_format(format);
        enc_ctx.set_time_base(rational_to_ffmpeg(settings.time_base));
        if let Some(frame_rate) = settings.frame_rate {
            enc_ctx.set_frame_rate(Some(rational_to_ffmpeg(frame_rate)));
        }
        if let Some(bit_rate) = settings.bit_rate {
            enc_ctx.set_bit_rate(usize::try_from(bit_rate).unwrap_or(usize::MAX));
        }
        if let Some(gop_size) = settings.gop_size {
            enc_ctx.set_gop(gop_size);
        }
        if let Some(max_b_frames) = settings.max_b_frames {
            enc_ctx.set_max_b_frames(max_b_frames as usize);
        }
        if config.global_header {
            enc_ctx.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let encoder = enc_ctx
            .open_as(codec)
            .map_err(|e| Error::codec(format!("could not open encoder {}: {e}", codec.name())))?;

        // Some encoders adjust the time base on open
        let time_base = unsafe {
            let tb = (*encoder.as_ptr()).time_base;
            Rational::new(tb.num, tb.den)
        };

        debug!(
            encoder = codec.name(),
            width = settings.width,
            height = settings.height,
            format = %settings.pixel_format,
            time_base = %time_base,
            "opened video encoder"
        );

        Ok(Self {
            encoder,
            codec,
            time_base,
            frame: VideoFrameFFmpeg::new(format, settings.width, settings.height),
        })
    }

    /**
        The encoder implementation in use.
    */
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /**
        Codec parameters for an output stream carrying this encoder's
        packets, including any extradata produced on open.
    */
    pub fn parameters(&self) -> Result<codec::Parameters> {
        let mut parameters = codec::Parameters::new();
        let ret = unsafe {
            ffi::avcodec_parameters_from_context(parameters.as_mut_ptr(), self.encoder.as_ptr())
        };
        if ret < 0 {
            return Err(error_from_ffmpeg(ffmpeg_next::Error::from(ret)));
        }
        Ok(parameters)
    }

    fn convert_packet(&self, packet: &ffmpeg_next::Packet) -> Packet {
        Packet::new(
            packet.data().map(<[u8]>::to_vec).unwrap_or_default(),
            0,
            packet.pts().map(Pts),
            packet.dts().map(Pts),
            MediaDuration(packet.duration()),
            self.time_base,
            packet.is_key(),
        )
    }
}

impl Encoder for VideoEncoder {
    fn time_base(&self) -> Rational {
        self.time_base
    }

    fn submit(&mut self, picture: &Picture) -> Result<Submit> {
        // The encoder may still reference the previous frame's buffers
        let ret = unsafe { ffi::av_frame_make_writable(self.frame.as_mut_ptr()) };
        if ret < 0 {
            return Err(error_from_ffmpeg(ffmpeg_next::Error::from(ret)));
        }

        picture_to_frame(picture, &mut self.frame)?;
        let pts = picture
            .pts
            .map(|pts| pts.rescale(picture.time_base, self.time_base));
        self.frame.set_pts(pts.map(|pts| pts.0));

        match self.encoder.send_frame(&self.frame) {
            Ok(()) => Ok(Submit::Accepted),
            Err(e) if is_again(&e) => {
                trace!("encoder busy");
                Ok(Submit::Busy)
            }
            Err(e) => Err(error_from_ffmpeg(e)),
        }
    }

    fn receive(&mut self) -> Result<Received<Packet>> {
        let mut packet = ffmpeg_next::Packet::empty();
        match self.encoder.receive_packet(&mut packet) {
            Ok(()) => Ok(Received::Ready(self.convert_packet(&packet))),
            Err(e) if is_again(&e) => Ok(Received::NotReady),
            Err(ffmpeg_next::Error::Eof) => Ok(Received::EndOfStream),
            Err(e) => Err(error_from_ffmpeg(e)),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self.encoder.send_eof() {
            Ok(()) | Err(ffmpeg_next::Error::Eof) => Ok(()),
            Err(e) => Err(error_from_ffmpeg(e)),
        }
    }
}

impl std::fmt::Debug for VideoEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoEncoder")
            .field("codec", &self.codec.name())
            .field("time_base", &self.time_base)
            .field("width", &self.frame.width())
            .field("height", &self.frame.height())
            .finish_non_exhaustive()
    }
}
