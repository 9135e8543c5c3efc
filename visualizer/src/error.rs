use thiserror::Error;

#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    #[error("matrix element type `{0}` is not supported")]
    UnsupportedElementType(&'static str),
    #[error("matrix must have at least one row with at least one element")]
    EmptyMatrix,
    #[error("pixel buffer holds {actual} bytes but exactly {expected} are required")]
    BufferSize { expected: usize, actual: usize },
    #[error("row {row} has {actual} elements, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
