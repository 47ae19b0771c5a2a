use thiserror::Error;

/// Failure of a single decision-store call. The cause string is kept for logs only.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// User-facing failure of a decision RPC. Never carries storage details.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Unavailable(&'static str),
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl ServiceError {
    /// Collapse a store failure into the generic message for this step.
    pub fn from_store(err: &StoreError, message: &'static str) -> Self {
        match err {
            StoreError::DeadlineExceeded => ServiceError::DeadlineExceeded,
            _ => ServiceError::Unavailable(message),
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Unavailable(_) => 2001,
            ServiceError::DeadlineExceeded => 2002,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_do_not_leak_cause() {
        let err = StoreError::Db("relation \"decisions\" does not exist".into());
        let svc = ServiceError::from_store(&err, "unable to update likes");
        assert_eq!(svc.to_string(), "unable to update likes");
        assert_eq!(svc.code(), 2001);
    }

    #[test]
    fn deadline_is_preserved() {
        let svc = ServiceError::from_store(&StoreError::DeadlineExceeded, "unused");
        assert_eq!(svc, ServiceError::DeadlineExceeded);
        assert_eq!(svc.code(), 2002);
    }
}
