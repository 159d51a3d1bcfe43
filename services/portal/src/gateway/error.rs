use crate::store::{Collection, StoreError};
use std::time::Duration;
use thiserror::Error;

/// Failure of a gateway operation.
///
/// All variants are recoverable: callers show a message and keep prior state.
/// The optimistic cache is never rolled back on a failed write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{label} timed out after {after:?}")]
    Timeout { label: String, after: Duration },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("remote store failure: {0}")]
    RemoteFailure(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub(crate) fn not_found(collection: Collection, id: &str) -> Self {
        GatewayError::NotFound {
            entity: collection.noun(),
            id: id.to_string(),
        }
    }

    /// Map a store failure for an operation on `id` (when there is one).
    pub(crate) fn from_store(collection: Collection, id: Option<&str>, err: StoreError) -> Self {
        match (err, id) {
            (StoreError::NotFound(_), Some(id)) => GatewayError::not_found(collection, id),
            (StoreError::NotFound(message), None) => GatewayError::RemoteFailure(message),
            (StoreError::Unexpected(err), _) => GatewayError::RemoteFailure(format!("{err:#}")),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout { .. })
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::RemoteFailure(err.to_string())
    }
}
