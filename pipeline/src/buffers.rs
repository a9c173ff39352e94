use ffmpeg_types::{Picture, PixelFormat, Rational};

/// Pre-allocated picture slots owned by the pipeline.
///
/// The decoded slot holds `width` x `height` pictures in the decode format;
/// the rotated slot holds the transposed size in that format's rotation.
/// Both slots are allocated once and overwritten on every iteration: the
/// decoder writes into `decoded`, rotation writes `decoded` into `rotated`,
/// and the encoder borrows `rotated`. Encoded packets are not pooled; each
/// is owned by whoever drained it last.
#[derive(Debug)]
pub struct Buffers {
    decoded: Picture,
    rotated: Picture,
}

impl Buffers {
    /// Allocate slots for `width` x `height` input pictures decoded as `format`.
    pub fn alloc(
        format: PixelFormat,
        width: u32,
        height: u32,
        time_base: Rational,
    ) -> ffmpeg_types::Result<Self> {
        let decoded = Picture::alloc(format, width, height, time_base)?;
        let rotated = Picture::alloc(format.rotated(), height, width, time_base)?;
        Ok(Self { decoded, rotated })
    }

    pub fn decoded(&self) -> &Picture {
        &self.decoded
    }

    pub fn decoded_mut(&mut self) -> &mut Picture {
        &mut self.decoded
    }

    pub fn rotated(&self) -> &Picture {
        &self.rotated
    }

    /// Rotate the decoded slot into the rotated slot.
    pub fn rotate(&mut self) -> &mut Picture {
        ffmpeg_transform::rotate90_into(&self.decoded, &mut self.rotated);
        &mut self.rotated
    }
}
