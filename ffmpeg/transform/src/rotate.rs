/*!
    Quarter-turn clockwise rotation of planar pictures.
*/

use ffmpeg_types::{Picture, Plane, Result};

/**
    Rotate `src` by 90 degrees clockwise into the pre-allocated `dst`.

    Every plane is rotated on its own sample grid, so subsampled chroma
    planes keep their subsampling ratio: a 4:2:0 picture of `W x H` with
    `W/2 x H/2` chroma becomes `H x W` with `H/2 x W/2` chroma. Samples
    are copied as whole units, which keeps multi-byte samples (10-bit,
    interleaved NV12 chroma, packed RGB) intact.

    The timestamp and time base of `src` are carried over unchanged.

    # Panics

    Panics if `dst` does not have the rotated format of `src` with width and
    height swapped. Allocate it with [`Picture::alloc`] using
    [`PixelFormat::rotated`](ffmpeg_types::PixelFormat::rotated) of the
    source format and the transposed size.
*/
pub fn rotate90_into(src: &Picture, dst: &mut Picture) {
    assert!(
        src.is_transpose_of(dst),
        "destination must be a {} picture of {}x{}, got {} {}x{}",
        src.format().rotated(),
        src.height(),
        src.width(),
        dst.format(),
        dst.width(),
        dst.height(),
    );

    for (src_plane, dst_plane) in src.planes().iter().zip(dst.planes_mut()) {
        rotate_plane(src_plane, dst_plane);
    }

    dst.pts = src.pts;
    dst.time_base = src.time_base;
}

/**
    Rotate `src` by 90 degrees clockwise into a newly allocated picture.
*/
pub fn rotate90(src: &Picture) -> Result<Picture> {
    let mut dst = Picture::alloc(
        src.format().rotated(),
        src.height(),
        src.width(),
        src.time_base,
    )?;
    rotate90_into(src, &mut dst);
    Ok(dst)
}

/**
    Source sample `(x, y)` lands at `(src_h - 1 - y, x)`: source row `y`
    becomes destination column `src_h - 1 - y`.
*/
fn rotate_plane(src: &Plane, dst: &mut Plane) {
    let unit = src.sample_bytes();
    let src_h = src.height();
    let dst_stride = dst.stride();
    let dst_data = dst.data_mut();

    for y in 0..src_h {
        let column = (src_h - 1 - y) * unit;
        for (x, sample) in src.row(y).chunks_exact(unit).enumerate() {
            let offset = x * dst_stride + column;
            dst_data[offset..offset + unit].copy_from_slice(sample);
        }
    }
}
