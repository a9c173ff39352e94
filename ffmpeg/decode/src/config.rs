/*!
    Decoder configuration types.
*/

/**
    Configuration for video decoder.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoDecoderConfig {
    /// Number of decoding threads; 0 lets FFmpeg pick one per core.
    pub thread_count: usize,
}

impl VideoDecoderConfig {
    /**
        Create a new config with default settings.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Decode with exactly `count` threads.
    */
    pub fn with_threads(count: usize) -> Self {
        Self {
            thread_count: count,
        }
    }
}
