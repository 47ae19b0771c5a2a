//! Service layer for the "who liked me" feature.
//! - `decisions::repository` is the only seam to storage (reader + writer traits).
//! - `decisions::service` holds the request orchestration, cursor handling and match check.
//! - Storage failures stay in `StoreError`; callers only ever see `ServiceError`.

pub mod errors;
pub mod pagination;
pub mod decisions;
#[cfg(test)]
pub mod test_support;
