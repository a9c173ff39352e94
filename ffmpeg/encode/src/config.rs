/*!
    Encoder configuration types.
*/

/**
    Configuration for video encoder.

    Codec parameters come from [`EncoderSettings`](ffmpeg_types::EncoderSettings);
    this only holds what depends on the surroundings of the encoder.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoEncoderConfig {
    /// Put codec headers in extradata instead of in-band. Required by
    /// containers such as MP4 and Matroska.
    pub global_header: bool,
    /// Number of encoding threads; 0 lets FFmpeg pick one per core.
    pub thread_count: usize,
}

impl VideoEncoderConfig {
    /**
        Create a new config with default settings.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Set whether codec headers go into extradata.
    */
    pub fn with_global_header(mut self, global_header: bool) -> Self {
        self.global_header = global_header;
        self
    }

    /**
        Encode with exactly `count` threads.
    */
    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }
}
