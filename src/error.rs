/// Errors raised while resolving a single table row.
///
/// Every variant aborts the line it was raised for and nothing else.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed field `{token}`")]
    MalformedField { token: String },
    #[error("value {value:#x} of `{token}` does not fit in {width} bits")]
    MalformedRange { token: String, value: u64, width: u32 },
    #[error("`{mnemonic}` needs {bits} significant bits, more than the 64-bit working width")]
    Overflow { mnemonic: String, bits: usize },
    #[error("`{mnemonic}` holds unresolved operand `{name}`")]
    UnresolvedOperand { mnemonic: String, name: String },
    #[error("`{mnemonic}` is {width} bits wide, expected 32")]
    WidthMismatch { mnemonic: String, width: usize },
    #[error("empty table row")]
    EmptyLine,
}

pub type Result<T> = std::result::Result<T, Error>;
