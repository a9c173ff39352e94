//! Property-based tests for picture rotation.
//!
//! Uses proptest to check the per-sample mapping and the four-turn identity
//! over random sizes and pixel formats.

use ffmpeg_transform::{rotate90, rotate90_into};
use ffmpeg_types::{Picture, PixelFormat, Pts, Rational};
use proptest::prelude::*;

const TB: Rational = Rational { num: 1, den: 30 };

const FORMATS: [PixelFormat; 8] = [
    PixelFormat::Yuv420p,
    PixelFormat::Yuva420p,
    PixelFormat::Yuv422p,
    PixelFormat::Yuv444p,
    PixelFormat::Yuv420p10,
    PixelFormat::Nv12,
    PixelFormat::Rgb24,
    PixelFormat::Gray8,
];

/// A picture of the given format and size filled from `seed`.
fn filled(format: PixelFormat, width: u32, height: u32, seed: u8) -> Picture {
    let mut picture = Picture::alloc(format, width, height, TB).unwrap();
    for (index, plane) in picture.planes_mut().iter_mut().enumerate() {
        for y in 0..plane.height() {
            for (x, byte) in plane.row_mut(y).iter_mut().enumerate() {
                *byte = seed
                    .wrapping_mul(31)
                    .wrapping_add((index * 67 + y * 13 + x * 7) as u8);
            }
        }
    }
    picture.with_pts(Some(Pts(seed as i64)))
}

fn picture_strategy() -> impl Strategy<Value = Picture> {
    (0..FORMATS.len(), 0u32..24, 0u32..24, any::<u8>())
        .prop_map(|(format, width, height, seed)| filled(FORMATS[format], width, height, seed))
}

// =============================================================================
// Geometry
// =============================================================================

proptest! {
    /// Every sample of every plane lands at (src_h - 1 - y, x).
    #[test]
    fn samples_map_clockwise(src in picture_strategy()) {
        let dst = rotate90(&src).unwrap();

        prop_assert_eq!(dst.width(), src.height());
        prop_assert_eq!(dst.height(), src.width());

        for (src_plane, dst_plane) in src.planes().iter().zip(dst.planes()) {
            prop_assert_eq!(dst_plane.width(), src_plane.height());
            prop_assert_eq!(dst_plane.height(), src_plane.width());

            let src_h = src_plane.height();
            for y in 0..src_h {
                for x in 0..src_plane.width() {
                    prop_assert_eq!(dst_plane.sample(src_h - 1 - y, x), src_plane.sample(x, y));
                }
            }
        }
    }

    /// Four quarter turns give back the original picture.
    #[test]
    fn four_rotations_are_identity(src in picture_strategy()) {
        let once = rotate90(&src).unwrap();
        let twice = rotate90(&once).unwrap();
        let thrice = rotate90(&twice).unwrap();
        let full = rotate90(&thrice).unwrap();

        prop_assert!(full.same_samples(&src));
        prop_assert_eq!(full.pts, src.pts);
    }

    /// Rotating into a reused destination matches a fresh rotation.
    #[test]
    fn reused_destination_matches_fresh(a in picture_strategy(), seed in any::<u8>()) {
        let b = filled(a.format(), a.width(), a.height(), seed);
        let mut reused = Picture::alloc(a.format().rotated(), a.height(), a.width(), TB).unwrap();

        rotate90_into(&a, &mut reused);
        rotate90_into(&b, &mut reused);

        prop_assert!(reused.same_samples(&rotate90(&b).unwrap()));
    }
}

// =============================================================================
// Chroma Consistency
// =============================================================================

proptest! {
    /// 4:2:0 chroma of (W/2, H/2) becomes (H/2, W/2).
    #[test]
    fn chroma_ratio_preserved(half_w in 1u32..64, half_h in 1u32..64) {
        let (width, height) = (half_w * 2, half_h * 2);
        let src = Picture::alloc(PixelFormat::Yuv420p, width, height, TB).unwrap();

        let dst = rotate90(&src).unwrap();

        for chroma in &dst.planes()[1..] {
            prop_assert_eq!(chroma.width(), half_h as usize);
            prop_assert_eq!(chroma.height(), half_w as usize);
        }
    }
}
