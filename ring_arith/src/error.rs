use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid modulus {q}: {reason}")]
    InvalidModulus { q: u64, reason: &'static str },

    #[error("unsupported transform length {n}: must be a power of two >= 2")]
    UnsupportedLength { n: usize },

    #[error("no primitive {order}-th root of unity modulo {q}")]
    NoPrimitiveRoot { order: u64, q: u64 },

    #[error("operand at index {index} is {value}, not a residue modulo {q}")]
    OperandOutOfRange { index: usize, value: u64, q: u64 },

    #[error("length mismatch for {context}: expected {expected}, got {got}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("buffer too short for {context}: needed {needed}, got {got}")]
    BufferTooShort {
        context: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("invalid stride for {context}: must be non-zero")]
    InvalidStride { context: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
