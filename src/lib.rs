pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::routes::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, UpstreamError};
pub use services::stream_service::StreamService;
