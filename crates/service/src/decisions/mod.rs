//! Decision module: directed like/pass decisions, mutual matches and the
//! "who liked me" listings.
//!
//! Layered like the rest of the service crate: `domain` types, the
//! `repository` traits (with an in-memory implementation), the SeaORM-backed
//! store under `repo`, and the orchestration in `service`.

pub mod context;
pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use context::RequestContext;
pub use service::DecisionService;
