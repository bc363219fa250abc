use thiserror::Error;

/// Failures surfaced by the favorites store.
///
/// The store never retries; every variant is returned to the caller as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Creating, upgrading or downgrading the schema failed. The store is
    /// unusable afterwards.
    #[error("Schema error: {0}")]
    Schema(#[source] sea_orm::DbErr),

    #[error("Unsupported resource: {0}")]
    UnsupportedResource(String),

    /// A write that had to take effect did not, e.g. an insert that produced
    /// no row id.
    #[error("Write failed on {resource}: {reason}")]
    WriteFailed { resource: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub fn write_failed(resource: impl ToString, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }
}
