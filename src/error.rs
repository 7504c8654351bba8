use flexi_logger::FlexiLoggerError;
use image::ImageError;

use std::error::Error;
use std::fmt;
use std::io::Error as IOError;

#[derive(Debug)]
pub struct LprError(LprErrorKind);

#[derive(Debug)]
pub enum LprErrorKind {
    IOError(IOError),
    ImageError(ImageError),
    LoggerError(FlexiLoggerError),
    /// font bytes rusttype could not parse
    FontError,
    InvalidConfig(String),
    ParseBox(String),
    EmptyImage,
}

impl LprError {
    pub fn kind(&self) -> &LprErrorKind {
        &self.0
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::InvalidConfig(msg.into()))
    }

    pub fn parse_box(input: impl Into<String>) -> Self {
        Self(LprErrorKind::ParseBox(input.into()))
    }
}

impl<T> From<T> for LprError
where T:  Into<LprErrorKind>
{
    fn from(e: T) -> Self {
        Self(e.into())
    }
}

impl fmt::Display for LprError {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            LprErrorKind::IOError(e) => e.fmt(f),
            LprErrorKind::ImageError(e) => e.fmt(f),
            LprErrorKind::LoggerError(e) => e.fmt(f),
            LprErrorKind::FontError => write!(f, "invalid font data"),
            LprErrorKind::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            LprErrorKind::ParseBox(input) => {
                write!(f, "cannot parse box {:?}, expected xmin,ymin,xmax,ymax", input)
            }
            LprErrorKind::EmptyImage => write!(f, "image has no pixels"),
        }
    }
}

impl Error for LprError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.kind() {
            LprErrorKind::IOError(e) => Some(e),
            LprErrorKind::ImageError(e) => Some(e),
            LprErrorKind::LoggerError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IOError> for LprErrorKind {
    fn from(e: IOError) -> Self {
        Self::IOError(e)
    }
}

impl From<ImageError> for LprErrorKind {
    fn from(e: ImageError) -> Self {
        Self::ImageError(e)
    }
}

impl From<FlexiLoggerError> for LprErrorKind {
    fn from(e: FlexiLoggerError) -> Self {
        Self::LoggerError(e)
    }
}


#[cfg(test)]
mod test {

    use super::{LprError, LprErrorKind};

    use std::error::Error;
    use std::io;

    #[test]
    fn io_error_converts_and_keeps_source() {
        let e: LprError = io::Error::new(io::ErrorKind::NotFound, "nr1.jpg").into();
        assert!(matches!(e.kind(), LprErrorKind::IOError(_)));
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "nr1.jpg");
    }

    #[test]
    fn config_error_message() {
        let e = LprError::invalid_config("blur size must be odd, got 4");
        assert_eq!(e.to_string(), "invalid config: blur size must be odd, got 4");
        assert!(e.source().is_none());
    }
}
