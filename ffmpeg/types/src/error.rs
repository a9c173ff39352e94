/*!
    Error type shared by every crate of the family.

    Adapters translate backend failures into these variants, so callers can
    tell a broken input from a missing codec or a misuse of the API without
    knowing which backend produced the error.
*/

use std::fmt;

/**
    Failure of a media operation.
*/
#[derive(Debug)]
pub enum Error {
    /// I/O error (file not found, permission denied, ...)
    Io(std::io::Error),
    /// The codec library reported a failure while decoding or encoding
    Codec { message: String },
    /// Input is malformed, or two buffers disagree on their geometry
    InvalidData { message: String },
    /// Input is well-formed but uses something we cannot handle
    UnsupportedFormat { message: String },
    /// An operation was called at a point its object does not allow,
    /// such as writing to a finished output
    InvalidState { message: String },
    /// A buffer of the given size could not be allocated
    OutOfMemory { bytes: usize },
    /// End of stream; control flow more than failure
    Eof,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Codec { message } => write!(f, "codec error: {message}"),
            Self::InvalidData { message } => write!(f, "invalid data: {message}"),
            Self::UnsupportedFormat { message } => write!(f, "unsupported format: {message}"),
            Self::InvalidState { message } => write!(f, "invalid state: {message}"),
            Self::OutOfMemory { bytes } => write!(f, "out of memory allocating {bytes} bytes"),
            Self::Eof => f.write_str("end of stream"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory { bytes: usize::MAX }
    }
}

impl Error {
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn messages_name_the_kind() {
        let cases = [
            (Error::codec("send failed"), "codec error: send failed"),
            (Error::invalid_data("truncated NAL"), "invalid data: truncated NAL"),
            (Error::unsupported_format("yuv411p"), "unsupported format: yuv411p"),
            (Error::invalid_state("output finished"), "invalid state: output finished"),
            (Error::OutOfMemory { bytes: 4096 }, "out of memory allocating 4096 bytes"),
            (Error::Eof, "end of stream"),
        ];
        for (error, message) in cases {
            assert_eq!(error.to_string(), message);
        }
    }

    #[test]
    fn io_errors_keep_their_source() {
        let e: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "clip.mp4").into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.source().is_some());
        assert!(Error::codec("x").source().is_none());
    }

    #[test]
    fn failed_reservation_is_out_of_memory() {
        let e: Error = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(e, Error::OutOfMemory { .. }));
    }
}
