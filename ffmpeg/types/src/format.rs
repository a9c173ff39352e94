/*!
    Pixel format types and plane layout descriptors.
*/

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/**
    Layout of a single plane within a pixel format.

    Sample dimensions of the plane are derived from the picture size by a
    right shift that rounds up, so odd luma sizes still cover every pixel:
    a 5x3 4:2:0 picture has 3x2 chroma planes.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaneLayout {
    /// log2 of the horizontal subsampling factor.
    pub width_shift: u8,
    /// log2 of the vertical subsampling factor.
    pub height_shift: u8,
    /// Size in bytes of one sample unit (one pixel's worth of this plane).
    pub sample_bytes: usize,
}

impl PlaneLayout {
    const fn new(width_shift: u8, height_shift: u8, sample_bytes: usize) -> Self {
        Self {
            width_shift,
            height_shift,
            sample_bytes,
        }
    }

    /**
        Width in samples of this plane for a picture `width` pixels wide.
    */
    #[inline]
    pub const fn plane_width(&self, width: u32) -> usize {
        ceil_shift(width, self.width_shift)
    }

    /**
        Height in samples of this plane for a picture `height` pixels tall.
    */
    #[inline]
    pub const fn plane_height(&self, height: u32) -> usize {
        ceil_shift(height, self.height_shift)
    }
}

const fn ceil_shift(value: u32, shift: u8) -> usize {
    let value = value as usize;
    (value + (1 << shift) - 1) >> shift
}

const LUMA_8: PlaneLayout = PlaneLayout::new(0, 0, 1);
const LUMA_16: PlaneLayout = PlaneLayout::new(0, 0, 2);

const YUV420P: [PlaneLayout; 3] = [LUMA_8, PlaneLayout::new(1, 1, 1), PlaneLayout::new(1, 1, 1)];
const YUVA420P: [PlaneLayout; 4] = [
    LUMA_8,
    PlaneLayout::new(1, 1, 1),
    PlaneLayout::new(1, 1, 1),
    LUMA_8,
];
const YUV422P: [PlaneLayout; 3] = [LUMA_8, PlaneLayout::new(1, 0, 1), PlaneLayout::new(1, 0, 1)];
const YUV440P: [PlaneLayout; 3] = [LUMA_8, PlaneLayout::new(0, 1, 1), PlaneLayout::new(0, 1, 1)];
const YUV444P: [PlaneLayout; 3] = [LUMA_8, LUMA_8, LUMA_8];
const YUV420P10: [PlaneLayout; 3] = [
    LUMA_16,
    PlaneLayout::new(1, 1, 2),
    PlaneLayout::new(1, 1, 2),
];
// Interleaved UV: one chroma sample unit is a U/V byte pair
const NV12: [PlaneLayout; 2] = [LUMA_8, PlaneLayout::new(1, 1, 2)];
const GRAY8: [PlaneLayout; 1] = [LUMA_8];
const RGB24: [PlaneLayout; 1] = [PlaneLayout::new(0, 0, 3)];
const RGB32: [PlaneLayout; 1] = [PlaneLayout::new(0, 0, 4)];

/**
    Video pixel formats.

    This is a subset of formats commonly encountered in media pipelines.
    Not all FFmpeg pixel formats are represented.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (most common video format)
    Yuv420p,
    /// Planar YUV 4:2:0 with an alpha plane, 20bpp
    Yuva420p,
    /// Semi-planar YUV 4:2:0, 12bpp (common hardware decoder output)
    Nv12,
    /// Packed BGRA, 32bpp
    Bgra,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:0, 16bpp (4:2:2 turned on its side)
    Yuv440p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Planar YUV 4:2:0, 10-bit little-endian (HDR content)
    Yuv420p10,
    /// Single luma plane, 8bpp
    Gray8,
}

impl PixelFormat {
    /**
        Per-plane layout, in plane order.
    */
    pub const fn planes(self) -> &'static [PlaneLayout] {
        match self {
            Self::Yuv420p => &YUV420P,
            Self::Yuva420p => &YUVA420P,
            Self::Nv12 => &NV12,
            Self::Bgra | Self::Rgba => &RGB32,
            Self::Rgb24 | Self::Bgr24 => &RGB24,
            Self::Yuv422p => &YUV422P,
            Self::Yuv440p => &YUV440P,
            Self::Yuv444p => &YUV444P,
            Self::Yuv420p10 => &YUV420P10,
            Self::Gray8 => &GRAY8,
        }
    }

    /**
        The canonical FFmpeg name of this format.
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yuv420p => "yuv420p",
            Self::Yuva420p => "yuva420p",
            Self::Nv12 => "nv12",
            Self::Bgra => "bgra",
            Self::Rgba => "rgba",
            Self::Rgb24 => "rgb24",
            Self::Bgr24 => "bgr24",
            Self::Yuv422p => "yuv422p",
            Self::Yuv440p => "yuv440p",
            Self::Yuv444p => "yuv444p",
            Self::Yuv420p10 => "yuv420p10le",
            Self::Gray8 => "gray",
        }
    }

    /**
        The format a picture of this format has after a quarter turn.

        Rotation swaps the horizontal and vertical subsampling of every
        plane, so 4:2:2 becomes 4:4:0 and back. Formats with symmetric
        subsampling are their own rotation.
    */
    pub const fn rotated(self) -> Self {
        match self {
            Self::Yuv422p => Self::Yuv440p,
            Self::Yuv440p => Self::Yuv422p,
            other => other,
        }
    }

    const ALL: [Self; 12] = [
        Self::Yuv420p,
        Self::Yuva420p,
        Self::Nv12,
        Self::Bgra,
        Self::Rgba,
        Self::Rgb24,
        Self::Bgr24,
        Self::Yuv422p,
        Self::Yuv440p,
        Self::Yuv444p,
        Self::Yuv420p10,
        Self::Gray8,
    ];
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| format!("unknown pixel format '{s}'"))
    }
}

impl TryFrom<String> for PixelFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_format_plane_counts() {
        assert_eq!(PixelFormat::Yuv420p.planes().len(), 3);
        assert_eq!(PixelFormat::Yuva420p.planes().len(), 4);
        assert_eq!(PixelFormat::Nv12.planes().len(), 2);
        assert_eq!(PixelFormat::Rgb24.planes().len(), 1);
    }

    #[test]
    fn yuv420_chroma_is_half_size() {
        let chroma = PixelFormat::Yuv420p.planes()[1];
        assert_eq!(chroma.plane_width(1920), 960);
        assert_eq!(chroma.plane_height(1080), 540);
    }

    #[test]
    fn odd_sizes_round_up() {
        let chroma = PixelFormat::Yuv420p.planes()[1];
        assert_eq!(chroma.plane_width(5), 3);
        assert_eq!(chroma.plane_height(3), 2);
        assert_eq!(chroma.plane_width(1), 1);
    }

    #[test]
    fn yuv422_subsamples_horizontally_only() {
        let chroma = PixelFormat::Yuv422p.planes()[2];
        assert_eq!(chroma.plane_width(640), 320);
        assert_eq!(chroma.plane_height(480), 480);
    }

    #[test]
    fn rotation_swaps_subsampling() {
        for format in PixelFormat::ALL {
            let rotated = format.rotated();
            assert_eq!(rotated.rotated(), format);
            for (a, b) in format.planes().iter().zip(rotated.planes()) {
                assert_eq!(a.width_shift, b.height_shift);
                assert_eq!(a.height_shift, b.width_shift);
                assert_eq!(a.sample_bytes, b.sample_bytes);
            }
        }
        assert_eq!(PixelFormat::Yuv420p.rotated(), PixelFormat::Yuv420p);
    }

    #[test]
    fn multi_byte_sample_units() {
        assert_eq!(PixelFormat::Yuv420p10.planes()[0].sample_bytes, 2);
        assert_eq!(PixelFormat::Nv12.planes()[1].sample_bytes, 2);
        assert_eq!(PixelFormat::Rgb24.planes()[0].sample_bytes, 3);
        assert_eq!(PixelFormat::Bgra.planes()[0].sample_bytes, 4);
    }

    #[test]
    fn pixel_format_names_round_trip() {
        for format in PixelFormat::ALL {
            assert_eq!(format.name().parse::<PixelFormat>(), Ok(format));
        }
        assert_eq!("YUV420P".parse::<PixelFormat>(), Ok(PixelFormat::Yuv420p));
        assert!("yuv411p".parse::<PixelFormat>().is_err());
    }
}
