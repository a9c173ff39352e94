/*!
    Picture transformation for the vidrotate ffmpeg crate family.

    This crate rotates decoded pictures by a quarter turn clockwise. It works
    purely on [`Picture`] planes and has no FFmpeg dependency.

    # Rotation

    ```ignore
    use ffmpeg_transform::{rotate90, rotate90_into};
    use ffmpeg_types::Picture;

    // Allocate the destination once: the transposed size never changes
    let mut rotated = Picture::alloc(format.rotated(), height, width, time_base)?;

    for picture in decoded_pictures {
        rotate90_into(&picture, &mut rotated);
        // Encode `rotated`
    }

    // Or let the transform allocate
    let rotated = rotate90(&picture)?;
    ```

    # Plane Geometry

    Each plane is rotated on its own sample grid, as described by the pixel
    format's [`PlaneLayout`](ffmpeg_types::PlaneLayout). Chroma subsampling is
    never assumed: 4:2:0, 4:4:4, semi-planar and packed formats all rotate
    correctly, including odd sizes and multi-byte samples. Horizontal and
    vertical subsampling trade places, so 4:2:2 turns into 4:4:0.

    # Stateless

    Rotation is stateless: every picture transforms independently, the
    destination is fully overwritten, and timing is copied from the source.
*/

pub use ffmpeg_types::{Picture, PixelFormat, Plane, Result};

mod rotate;

pub use rotate::{rotate90, rotate90_into};
