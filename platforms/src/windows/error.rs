use thiserror::Error;

#[derive(Error, PartialEq, Clone, Debug)]
pub enum Error {
    #[error("dialog text must not contain interior NUL characters")]
    InvalidText,
    #[error("win32 API error {0}: {1}")]
    Win32(i32, String),
}

impl From<windows::core::Error> for Error {
    fn from(error: windows::core::Error) -> Self {
        Error::Win32(error.code().0, error.message())
    }
}
