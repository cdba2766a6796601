pub mod cache;
pub mod stream;
