//! Typed error surface for the engine.
//!
//! Mirrors the shape of `idb-utils`' `IdbError`: one variant per condition the
//! engine can report, built with `thiserror` instead of hand-rolled `Display`
//! impls. Each variant also carries a stable negative `code()` matching the
//! legacy C-style integer surface described in the specification (the later,
//! more complete enumeration — see `DESIGN.md`).

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MdbError {
    #[error("failed to open database file")]
    Open,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("not a MeagerDB file")]
    NotMdb,

    #[error("unsupported on-disk version")]
    BadVersion,

    #[error("a database is already open on this handle")]
    AlreadyOpen,

    #[error("page size is not a multiple of the cipher block size")]
    BadPageSize,

    #[error("unrecognized key-derivation function name")]
    BadKeyDerive,

    #[error("corrupt data detected")]
    Corrupt,

    #[error("incorrect password")]
    BadPassword,

    #[error("page size exceeds the supported maximum")]
    UnsupportedPageSize,

    #[error("database is full")]
    Full,

    #[error("row not found")]
    RowNotFound,

    #[error("operation already in progress")]
    Busy,

    #[error("data too big")]
    DataTooBig,

    #[error("no row is currently selected")]
    NoRowSelected,

    #[error("database is not open")]
    NotOpen,

    #[error("not enough data")]
    NotEnoughData,

    #[error("bad argument")]
    BadArgument,

    #[error("value has the wrong type")]
    BadType,

    #[error("not found")]
    NotFound,

    #[error("unsupported cipher suite")]
    UnsupportedCipher,
}

impl MdbError {
    /// Stable negative code matching the specification's external integer
    /// error surface, in the order §6 lists the names.
    pub fn code(&self) -> i32 {
        match self {
            MdbError::Open => -1,
            MdbError::Io(_) => -2,
            MdbError::NotMdb => -3,
            MdbError::BadVersion => -4,
            MdbError::AlreadyOpen => -5,
            MdbError::BadPageSize => -6,
            MdbError::BadKeyDerive => -7,
            MdbError::Corrupt => -8,
            MdbError::BadPassword => -9,
            MdbError::UnsupportedPageSize => -10,
            MdbError::Full => -11,
            MdbError::RowNotFound => -12,
            MdbError::Busy => -13,
            MdbError::DataTooBig => -14,
            MdbError::NoRowSelected => -15,
            MdbError::NotOpen => -16,
            MdbError::NotEnoughData => -17,
            MdbError::BadArgument => -18,
            MdbError::BadType => -19,
            MdbError::NotFound => -20,
            MdbError::UnsupportedCipher => -21,
        }
    }
}

impl From<io::Error> for MdbError {
    fn from(e: io::Error) -> Self {
        MdbError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MdbError>;
