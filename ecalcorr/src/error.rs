//! Error types returned by this crate.

use super::category::CategoryKey;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Identifies one of the two correction tables held by a correction service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableKind {
    /// The table of energy-scale offsets.
    Scale,
    /// The table of smearing parameters.
    Smearing,
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Scale => write!(f, "scale"),
            Self::Smearing => write!(f, "smearing"),
        }
    }
}

/// Catch-all error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Both correction tables are empty after loading.
    #[error("scale and smearing correction maps are both empty")]
    EmptyTables,
    /// A query was made against a table without any entries.
    #[error("{0} correction map is empty")]
    EmptyTable(TableKind),
    /// A category was inserted that is equivalent to one already in the table.
    #[error("category already defined: adding {new}, defined {existing}")]
    DuplicateCategory {
        /// The category that was being inserted.
        new: Box<CategoryKey>,
        /// The category already stored in the table.
        existing: Box<CategoryKey>,
    },
    /// A smearing angle column contained a token that is neither a number nor `M_PI_2`.
    #[error("invalid angle `{0}` in smearing table")]
    InvalidAngle(String),
    /// Bin limits were constructed from too few edges.
    #[error("at least two bin limits are required, got {0}")]
    InvalidBinLimits(usize),
    /// A percentage outside of `[0, 100]` was requested.
    #[error("percentage {0} is outside of [0, 100]")]
    InvalidPercentage(f64),
    /// An error that originates in this crate.
    #[error("{0}")]
    General(String),
    /// Error while reading a table.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error that does not originate from this crate.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
