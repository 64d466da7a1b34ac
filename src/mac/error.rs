use thiserror::Error;

/// Validation failures of the MAC address formatter.
///
/// All of them are local and deterministic, retrying never helps.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacError {
    #[error("invalid MAC address")]
    InvalidMacAddress,

    #[error("invalid MAC address length; must be divisible by group size")]
    InvalidMacAddressLength,

    #[error("invalid group size; must be 2, 4 or 6")]
    InvalidGroupSize,

    #[error("invalid case option")]
    InvalidCaseOption,

    #[error("invalid delimiter option")]
    InvalidDelimiterOption,
}

pub type MacResult<T> = Result<T, MacError>;
