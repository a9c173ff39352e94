/*!
    Decoded planar picture types.
*/

use arrayvec::ArrayVec;

use crate::{Error, PixelFormat, Pts, Rational, Result};

/**
    Maximum number of planes a picture can carry.
*/
pub const MAX_PLANES: usize = 4;

/**
    Row alignment, in bytes, used when a picture allocates its own planes.
*/
pub const STRIDE_ALIGN: usize = 32;

/**
    One sample plane of a picture.

    Rows are `stride` bytes apart; only the first `width * sample_bytes`
    bytes of each row carry samples, the rest is padding.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    stride: usize,
    width: usize,
    height: usize,
    sample_bytes: usize,
}

impl Plane {
    /**
        Allocate a zeroed plane with an aligned stride.
    */
    pub fn alloc(width: usize, height: usize, sample_bytes: usize) -> Result<Self> {
        let row_bytes = row_bytes(width, sample_bytes)?;
        let stride = row_bytes
            .checked_next_multiple_of(STRIDE_ALIGN)
            .ok_or(Error::OutOfMemory { bytes: usize::MAX })?;
        let len = stride
            .checked_mul(height)
            .ok_or(Error::OutOfMemory { bytes: usize::MAX })?;

        Ok(Self {
            data: zeroed(len)?,
            stride,
            width,
            height,
            sample_bytes,
        })
    }

    /**
        Wrap existing sample data.

        Fails if `stride` is shorter than a row or `data` cannot hold
        `height` rows.
    */
    pub fn from_data(
        data: Vec<u8>,
        stride: usize,
        width: usize,
        height: usize,
        sample_bytes: usize,
    ) -> Result<Self> {
        let row_bytes = row_bytes(width, sample_bytes)?;
        if stride < row_bytes {
            return Err(Error::invalid_data(format!(
                "stride {stride} is shorter than a {row_bytes} byte row"
            )));
        }
        let needed = match height {
            0 => 0,
            h => stride * (h - 1) + row_bytes,
        };
        if data.len() < needed {
            return Err(Error::invalid_data(format!(
                "plane needs {needed} bytes but only {} were given",
                data.len()
            )));
        }

        Ok(Self {
            data,
            stride,
            width,
            height,
            sample_bytes,
        })
    }

    /**
        Wrap tightly packed sample data (stride equals row size).
    */
    pub fn packed(data: Vec<u8>, width: usize, height: usize, sample_bytes: usize) -> Result<Self> {
        Self::from_data(data, width * sample_bytes, width, height, sample_bytes)
    }

    /// Width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between rows in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes per sample unit.
    pub fn sample_bytes(&self) -> usize {
        self.sample_bytes
    }

    /// Bytes of sample data in one row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width * self.sample_bytes
    }

    /// Raw plane memory, padding included.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw plane memory, padding included.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /**
        Sample bytes of row `y`, without padding.
    */
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /**
        Mutable sample bytes of row `y`, without padding.
    */
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.row_bytes();
        &mut self.data[start..end]
    }

    /**
        The sample unit at column `x` of row `y`.
    */
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> &[u8] {
        let start = y * self.stride + x * self.sample_bytes;
        &self.data[start..start + self.sample_bytes]
    }

    /**
        Returns true if both planes have the same sample geometry.
        Strides may differ.
    */
    pub fn same_geometry(&self, other: &Plane) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.sample_bytes == other.sample_bytes
    }

    /**
        Returns true if both planes hold the same samples, ignoring padding.
    */
    pub fn same_samples(&self, other: &Plane) -> bool {
        self.same_geometry(other) && (0..self.height).all(|y| self.row(y) == other.row(y))
    }
}

impl std::fmt::Debug for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plane")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("sample_bytes", &self.sample_bytes)
            .finish_non_exhaustive()
    }
}

/**
    A decoded planar picture.

    Plane count and per-plane sample dimensions always follow the pixel
    format's layout for the picture's nominal width and height.
*/
#[derive(Clone, Debug)]
pub struct Picture {
    format: PixelFormat,
    width: u32,
    height: u32,
    planes: ArrayVec<Plane, MAX_PLANES>,
    /// Presentation timestamp (None for pictures without timing).
    pub pts: Option<Pts>,
    /// Time base for interpreting the PTS.
    pub time_base: Rational,
}

impl Picture {
    /**
        Allocate a zeroed picture with aligned planes.

        Fails with [`Error::OutOfMemory`] if any plane cannot be allocated.
    */
    pub fn alloc(format: PixelFormat, width: u32, height: u32, time_base: Rational) -> Result<Self> {
        let planes = format
            .planes()
            .iter()
            .map(|layout| {
                Plane::alloc(
                    layout.plane_width(width),
                    layout.plane_height(height),
                    layout.sample_bytes,
                )
            })
            .collect::<Result<ArrayVec<_, MAX_PLANES>>>()?;

        Ok(Self {
            format,
            width,
            height,
            planes,
            pts: None,
            time_base,
        })
    }

    /**
        Assemble a picture from existing planes.

        Fails if the planes do not match the layout `format` prescribes for
        a `width` x `height` picture.
    */
    pub fn from_planes(
        format: PixelFormat,
        width: u32,
        height: u32,
        planes: impl IntoIterator<Item = Plane>,
        time_base: Rational,
    ) -> Result<Self> {
        let mut collected = ArrayVec::<Plane, MAX_PLANES>::new();
        for plane in planes {
            collected
                .try_push(plane)
                .map_err(|_| Error::invalid_data("too many planes"))?;
        }

        let layouts = format.planes();
        if collected.len() != layouts.len() {
            return Err(Error::invalid_data(format!(
                "{format} needs {} planes, got {}",
                layouts.len(),
                collected.len()
            )));
        }
        for (index, (plane, layout)) in collected.iter().zip(layouts).enumerate() {
            let expected = (
                layout.plane_width(width),
                layout.plane_height(height),
                layout.sample_bytes,
            );
            let actual = (plane.width, plane.height, plane.sample_bytes);
            if expected != actual {
                return Err(Error::invalid_data(format!(
                    "plane {index} of {width}x{height} {format} should be {expected:?}, got {actual:?}"
                )));
            }
        }

        Ok(Self {
            format,
            width,
            height,
            planes: collected,
            pts: None,
            time_base,
        })
    }

    /// Builder-style PTS setter.
    pub fn with_pts(mut self, pts: Option<Pts>) -> Self {
        self.pts = pts;
        self
    }

    /// Picture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Picture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format of the planes.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// All planes, in format order.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// All planes, mutably.
    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    /// A single plane.
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    /**
        Returns true if `other` has this picture's rotated format and the
        transposed size, i.e. it can receive this picture rotated by 90 degrees.
    */
    pub fn is_transpose_of(&self, other: &Picture) -> bool {
        self.format.rotated() == other.format
            && self.width == other.height
            && self.height == other.width
            && self.planes.len() == other.planes.len()
            && self.planes.iter().zip(other.planes.iter()).all(|(a, b)| {
                a.width == b.height && a.height == b.width && a.sample_bytes == b.sample_bytes
            })
    }

    /**
        Returns true if both pictures hold identical samples, ignoring
        padding and timing.
    */
    pub fn same_samples(&self, other: &Picture) -> bool {
        self.format == other.format
            && self.width == other.width
            && self.height == other.height
            && self
                .planes
                .iter()
                .zip(other.planes.iter())
                .all(|(a, b)| a.same_samples(b))
    }
}

fn row_bytes(width: usize, sample_bytes: usize) -> Result<usize> {
    width
        .checked_mul(sample_bytes)
        .ok_or(Error::OutOfMemory { bytes: usize::MAX })
}

fn zeroed(bytes: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| Error::OutOfMemory { bytes })?;
    data.resize(bytes, 0);
    Ok(data)
}

// Ensure pictures are Send + Sync
static_assertions::assert_impl_all!(Picture: Send, Sync);
static_assertions::assert_impl_all!(Plane: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    const TB_1_1000: Rational = Rational { num: 1, den: 1000 };

    #[test]
    fn alloc_yuv420p() {
        let picture = Picture::alloc(PixelFormat::Yuv420p, 1920, 1080, TB_1_1000).unwrap();

        assert_eq!(picture.planes().len(), 3);
        assert_eq!(picture.planes()[0].width(), 1920);
        assert_eq!(picture.planes()[0].height(), 1080);
        assert_eq!(picture.planes()[1].width(), 960);
        assert_eq!(picture.planes()[1].height(), 540);
        assert_eq!(picture.planes()[2].width(), 960);
        assert_eq!(picture.planes()[2].height(), 540);
    }

    #[test]
    fn alloc_aligns_strides() {
        let picture = Picture::alloc(PixelFormat::Yuv420p, 100, 10, TB_1_1000).unwrap();

        for plane in picture.planes() {
            assert_eq!(plane.stride() % STRIDE_ALIGN, 0);
            assert!(plane.stride() >= plane.row_bytes());
        }
        assert_eq!(picture.planes()[0].stride(), 128);
        assert_eq!(picture.planes()[1].stride(), 64);
    }

    #[test]
    fn alloc_reports_out_of_memory() {
        let err = Picture::alloc(PixelFormat::Bgra, u32::MAX, u32::MAX, TB_1_1000).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }

    #[test]
    fn rows_exclude_padding() {
        let mut plane = Plane::alloc(3, 2, 1).unwrap();
        plane.row_mut(1).copy_from_slice(&[7, 8, 9]);

        assert_eq!(plane.row(0), &[0, 0, 0]);
        assert_eq!(plane.row(1), &[7, 8, 9]);
        assert_eq!(plane.sample(2, 1), &[9]);
    }

    #[test]
    fn from_data_validates_length() {
        // The last row may omit its padding
        assert!(Plane::from_data(vec![0; 10], 6, 4, 2, 1).is_ok());
        assert!(Plane::from_data(vec![0; 8], 4, 4, 2, 1).is_ok());
        assert!(Plane::from_data(vec![0; 7], 4, 4, 2, 1).is_err());
        assert!(Plane::from_data(vec![0; 16], 3, 4, 2, 1).is_err());
    }

    #[test]
    fn from_planes_checks_layout() {
        let luma = Plane::packed(vec![0; 16], 4, 4, 1).unwrap();
        let good = Plane::packed(vec![0; 4], 2, 2, 1).unwrap();
        let bad = Plane::packed(vec![0; 8], 4, 2, 1).unwrap();

        assert!(
            Picture::from_planes(
                PixelFormat::Yuv420p,
                4,
                4,
                [luma.clone(), good.clone(), good.clone()],
                TB_1_1000
            )
            .is_ok()
        );
        assert!(
            Picture::from_planes(
                PixelFormat::Yuv420p,
                4,
                4,
                [luma.clone(), good.clone(), bad],
                TB_1_1000
            )
            .is_err()
        );
        assert!(
            Picture::from_planes(PixelFormat::Yuv420p, 4, 4, [luma, good], TB_1_1000).is_err()
        );
    }

    #[test]
    fn transpose_geometry() {
        let a = Picture::alloc(PixelFormat::Yuv420p, 6, 4, TB_1_1000).unwrap();
        let b = Picture::alloc(PixelFormat::Yuv420p, 4, 6, TB_1_1000).unwrap();
        let c = Picture::alloc(PixelFormat::Yuv444p, 4, 6, TB_1_1000).unwrap();

        assert!(a.is_transpose_of(&b));
        assert!(b.is_transpose_of(&a));
        assert!(!a.is_transpose_of(&a));
        assert!(!a.is_transpose_of(&c));
    }

    #[test]
    fn same_samples_ignores_padding() {
        let aligned = Plane::alloc(2, 1, 1).unwrap();
        let packed = Plane::packed(vec![0, 0], 2, 1, 1).unwrap();
        assert_ne!(aligned.stride(), packed.stride());
        assert!(aligned.same_samples(&packed));
    }
}
