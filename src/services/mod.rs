pub mod flatten;
pub mod query;
pub mod stream_service;
