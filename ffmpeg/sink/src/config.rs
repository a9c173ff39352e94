/*!
    Sink configuration types.
*/

use std::path::Path;
use std::str::FromStr;

/**
    Container format for output.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// MP4 container (most compatible).
    Mp4,
    /// Matroska container (most flexible).
    Mkv,
    /// MPEG transport stream.
    MpegTs,
}

impl ContainerFormat {
    /**
        Get the FFmpeg format name for this container.
    */
    pub fn ffmpeg_format_name(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "matroska",
            Self::MpegTs => "mpegts",
        }
    }

    /**
        Get the typical file extension for this container.
    */
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
            Self::MpegTs => "ts",
        }
    }

    /**
        Guess the container from the extension of `path`.
    */
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "mp4" | "m4v" | "mov" => Some(Self::Mp4),
            "mkv" | "webm" => Some(Self::Mkv),
            "ts" | "m2ts" | "mts" => Some(Self::MpegTs),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ContainerFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "mkv" | "matroska" => Ok(Self::Mkv),
            "ts" | "mpegts" => Ok(Self::MpegTs),
            _ => Err(format!("unknown container format '{s}'")),
        }
    }
}

/**
    Configuration for a media sink.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Container format to use (None = guess from the output path).
    pub format: Option<ContainerFormat>,
    /// Enable "fast start" for MP4 (moves moov atom to beginning).
    pub fast_start: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            format: None,
            fast_start: true,
        }
    }
}

impl SinkConfig {
    /**
        Create a new sink configuration for the given container.
    */
    pub fn new(format: ContainerFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }

    /**
        Create configuration that picks the container from the output path.
    */
    pub fn guess() -> Self {
        Self::default()
    }

    /**
        Enable or disable fast start for MP4.
    */
    pub fn with_fast_start(mut self, enabled: bool) -> Self {
        self.fast_start = enabled;
        self
    }

    /**
        The container to write to `path`: the configured one, else the one
        matching its extension.
    */
    pub fn resolve_format(&self, path: impl AsRef<Path>) -> Option<ContainerFormat> {
        self.format.or_else(|| ContainerFormat::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ContainerFormat::from_path("out.MP4"), Some(ContainerFormat::Mp4));
        assert_eq!(ContainerFormat::from_path("a/b.mkv"), Some(ContainerFormat::Mkv));
        assert_eq!(ContainerFormat::from_path("clip.ts"), Some(ContainerFormat::MpegTs));
        assert_eq!(ContainerFormat::from_path("clip.avi"), None);
        assert_eq!(ContainerFormat::from_path("noext"), None);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("matroska".parse::<ContainerFormat>(), Ok(ContainerFormat::Mkv));
        assert_eq!("TS".parse::<ContainerFormat>(), Ok(ContainerFormat::MpegTs));
        assert!("hls".parse::<ContainerFormat>().is_err());
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        assert_eq!(
            SinkConfig::new(ContainerFormat::Mkv).resolve_format("out.mp4"),
            Some(ContainerFormat::Mkv)
        );
        assert_eq!(
            SinkConfig::guess().resolve_format("out.mp4"),
            Some(ContainerFormat::Mp4)
        );
    }

    #[test]
    fn fast_start_defaults_on() {
        let mp4 = SinkConfig::new(ContainerFormat::Mp4);
        assert!(mp4.fast_start);
        assert!(!mp4.with_fast_start(false).fast_start);
    }
}
