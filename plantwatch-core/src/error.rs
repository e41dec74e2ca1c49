use thiserror::Error;

/// Why a submission was rejected as "not a plant".
///
/// Both causes surface to users with the same message; the distinction is kept
/// for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionCause {
    /// The identification service returned no best match.
    NoMatch(String),
    /// The classifier reply could not be parsed into a verdict.
    UnparseableClassification(String),
}

impl std::fmt::Display for RejectionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch(reason) => write!(f, "no species match ({reason})"),
            Self::UnparseableClassification(reason) => {
                write!(f, "classification reply could not be parsed ({reason})")
            }
        }
    }
}

/// Persistence failures reported by a [`ReportStore`](crate::store::ReportStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),
}

#[derive(Error, Debug)]
pub enum PlantwatchError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Not a plant: {0}")]
    NotAPlant(RejectionCause),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Client configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlantwatchError>;
