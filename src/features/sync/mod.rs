pub mod dtos;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod workers;

pub use engine::{Reconciler, SyncLocks};
pub use routes::routes;
pub use services::SyncService;
pub use workers::SyncWorker;
