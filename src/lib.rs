pub mod app;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod state;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, AttendanceError};
pub use ledger::Ledger;
pub use state::AppState;
pub use stats::DateFilter;
pub use storage::{JsonFileStore, MemoryStore, Store};
