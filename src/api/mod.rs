pub mod routes;
pub mod upstream;
