/*!
    Conversions between FFmpeg types and `ffmpeg_types`.
*/

use ffmpeg_next::{codec, format::Pixel, util::error::EAGAIN, util::frame::video::Video as VideoFrame};

use ffmpeg_types::{CodecId, Error, Picture, PixelFormat, Rational, Result};

/**
    Convert an FFmpeg pixel format, if it is one we know.
*/
pub fn pixel_from_ffmpeg(format: Pixel) -> Option<PixelFormat> {
    Some(match format {
        Pixel::YUV420P => PixelFormat::Yuv420p,
        Pixel::YUVA420P => PixelFormat::Yuva420p,
        Pixel::NV12 => PixelFormat::Nv12,
        Pixel::BGRA => PixelFormat::Bgra,
        Pixel::RGBA => PixelFormat::Rgba,
        Pixel::RGB24 => PixelFormat::Rgb24,
        Pixel::BGR24 => PixelFormat::Bgr24,
        Pixel::YUV422P => PixelFormat::Yuv422p,
        Pixel::YUV440P => PixelFormat::Yuv440p,
        Pixel::YUV444P => PixelFormat::Yuv444p,
        Pixel::YUV420P10LE => PixelFormat::Yuv420p10,
        Pixel::GRAY8 => PixelFormat::Gray8,
        _ => return None,
    })
}

/**
    Convert a pixel format to its FFmpeg equivalent.
*/
pub fn pixel_to_ffmpeg(format: PixelFormat) -> Pixel {
    match format {
        PixelFormat::Yuv420p => Pixel::YUV420P,
        PixelFormat::Yuva420p => Pixel::YUVA420P,
        PixelFormat::Nv12 => Pixel::NV12,
        PixelFormat::Bgra => Pixel::BGRA,
        PixelFormat::Rgba => Pixel::RGBA,
        PixelFormat::Rgb24 => Pixel::RGB24,
        PixelFormat::Bgr24 => Pixel::BGR24,
        PixelFormat::Yuv422p => Pixel::YUV422P,
        PixelFormat::Yuv440p => Pixel::YUV440P,
        PixelFormat::Yuv444p => Pixel::YUV444P,
        PixelFormat::Yuv420p10 => Pixel::YUV420P10LE,
        PixelFormat::Gray8 => Pixel::GRAY8,
        _ => Pixel::None,
    }
}

/**
    Convert an FFmpeg codec id, if it is one we know.
*/
pub fn codec_from_ffmpeg(id: codec::Id) -> Option<CodecId> {
    Some(match id {
        codec::Id::H264 => CodecId::H264,
        codec::Id::HEVC => CodecId::H265,
        codec::Id::VP8 => CodecId::Vp8,
        codec::Id::VP9 => CodecId::Vp9,
        codec::Id::AV1 => CodecId::Av1,
        codec::Id::MPEG4 => CodecId::Mpeg4,
        codec::Id::MPEG2VIDEO => CodecId::Mpeg2Video,
        _ => return None,
    })
}

/**
    Convert a codec id to its FFmpeg equivalent.
*/
pub fn codec_to_ffmpeg(id: CodecId) -> codec::Id {
    match id {
        CodecId::H264 => codec::Id::H264,
        CodecId::H265 => codec::Id::HEVC,
        CodecId::Vp8 => codec::Id::VP8,
        CodecId::Vp9 => codec::Id::VP9,
        CodecId::Av1 => codec::Id::AV1,
        CodecId::Mpeg4 => codec::Id::MPEG4,
        CodecId::Mpeg2Video => codec::Id::MPEG2VIDEO,
        _ => codec::Id::None,
    }
}

pub fn rational_from_ffmpeg(value: ffmpeg_next::Rational) -> Rational {
    Rational {
        num: value.numerator(),
        den: value.denominator(),
    }
}

pub fn rational_to_ffmpeg(value: Rational) -> ffmpeg_next::Rational {
    ffmpeg_next::Rational::new(value.num, value.den)
}

/**
    Returns true for FFmpeg's "try again" error: the codec wants its output
    drained (on send) or more input (on receive).
*/
pub fn is_again(err: &ffmpeg_next::Error) -> bool {
    matches!(err, ffmpeg_next::Error::Other { errno } if *errno == EAGAIN)
}

/**
    Convert an FFmpeg error, keeping end of file distinguishable.
*/
pub fn error_from_ffmpeg(err: ffmpeg_next::Error) -> Error {
    match err {
        ffmpeg_next::Error::Eof => Error::Eof,
        ffmpeg_next::Error::InvalidData => Error::invalid_data(err.to_string()),
        other => Error::codec(other.to_string()),
    }
}

/**
    Copy the samples of `frame` into `picture`, row by row.

    Fails unless both have the same pixel format and size.
*/
pub fn frame_to_picture(frame: &VideoFrame, picture: &mut Picture) -> Result<()> {
    check_geometry(frame, picture)?;

    for (index, plane) in picture.planes_mut().iter_mut().enumerate() {
        let stride = frame.stride(index);
        let data = frame.data(index);
        let row_bytes = plane.row_bytes();
        for y in 0..plane.height() {
            let row = data
                .get(y * stride..y * stride + row_bytes)
                .ok_or_else(|| Error::invalid_data(format!("frame plane {index} is too short")))?;
            plane.row_mut(y).copy_from_slice(row);
        }
    }
    Ok(())
}

/**
    Copy the samples of `picture` into `frame`, row by row.

    The frame must be writable. Fails unless both have the same pixel
    format and size.
*/
pub fn picture_to_frame(picture: &Picture, frame: &mut VideoFrame) -> Result<()> {
    check_geometry(frame, picture)?;

    for (index, plane) in picture.planes().iter().enumerate() {
        let stride = frame.stride(index);
        let data = frame.data_mut(index);
        let row_bytes = plane.row_bytes();
        for y in 0..plane.height() {
            let row = data
                .get_mut(y * stride..y * stride + row_bytes)
                .ok_or_else(|| Error::invalid_data(format!("frame plane {index} is too short")))?;
            row.copy_from_slice(plane.row(y));
        }
    }
    Ok(())
}

fn check_geometry(frame: &VideoFrame, picture: &Picture) -> Result<()> {
    if frame.format() != pixel_to_ffmpeg(picture.format())
        || frame.width() != picture.width()
        || frame.height() != picture.height()
    {
        return Err(Error::invalid_data(format!(
            "frame is {:?} {}x{}, picture is {} {}x{}",
            frame.format(),
            frame.width(),
            frame.height(),
            picture.format(),
            picture.width(),
            picture.height(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_formats_convert_both_ways() {
        for format in [
            PixelFormat::Yuv420p,
            PixelFormat::Nv12,
            PixelFormat::Yuv422p,
            PixelFormat::Yuv440p,
            PixelFormat::Yuv420p10,
            PixelFormat::Bgra,
        ] {
            assert_eq!(pixel_from_ffmpeg(pixel_to_ffmpeg(format)), Some(format));
        }
        assert_eq!(pixel_from_ffmpeg(Pixel::YUV411P), None);
    }

    #[test]
    fn codecs_convert_both_ways() {
        for codec in [CodecId::H264, CodecId::H265, CodecId::Vp9, CodecId::Av1] {
            assert_eq!(codec_from_ffmpeg(codec_to_ffmpeg(codec)), Some(codec));
        }
        assert_eq!(codec_from_ffmpeg(codec::Id::THEORA), None);
    }

    #[test]
    fn rationals_convert_both_ways() {
        let tb = Rational::new(1001, 30000);
        assert_eq!(rational_from_ffmpeg(rational_to_ffmpeg(tb)), tb);
    }

    #[test]
    fn again_is_recognized() {
        assert!(is_again(&ffmpeg_next::Error::Other { errno: EAGAIN }));
        assert!(!is_again(&ffmpeg_next::Error::Eof));
    }

    #[test]
    fn eof_stays_eof() {
        assert!(matches!(error_from_ffmpeg(ffmpeg_next::Error::Eof), Error::Eof));
    }

    #[test]
    fn frame_samples_copy_into_picture() {
        let mut frame = VideoFrame::new(Pixel::GRAY8, 3, 2);
        let stride = frame.stride(0);
        frame.data_mut(0)[..3].copy_from_slice(&[1, 2, 3]);
        frame.data_mut(0)[stride..stride + 3].copy_from_slice(&[4, 5, 6]);
        let mut picture = Picture::alloc(PixelFormat::Gray8, 3, 2, Rational::new(1, 25)).unwrap();

        frame_to_picture(&frame, &mut picture).unwrap();

        assert_eq!(picture.planes()[0].row(0), &[1, 2, 3]);
        assert_eq!(picture.planes()[0].row(1), &[4, 5, 6]);
    }

    #[test]
    fn picture_samples_copy_into_frame() {
        let mut picture = Picture::alloc(PixelFormat::Yuv420p, 4, 2, Rational::new(1, 25)).unwrap();
        picture.planes_mut()[1].row_mut(0).copy_from_slice(&[7, 8]);
        let mut frame = VideoFrame::new(Pixel::YUV420P, 4, 2);

        picture_to_frame(&picture, &mut frame).unwrap();

        assert_eq!(&frame.data(1)[..2], &[7, 8]);
    }

    #[test]
    fn mismatched_frame_is_rejected() {
        let frame = VideoFrame::new(Pixel::GRAY8, 2, 2);
        let mut picture = Picture::alloc(PixelFormat::Gray8, 2, 3, Rational::new(1, 25)).unwrap();
        assert!(frame_to_picture(&frame, &mut picture).is_err());
    }
}
