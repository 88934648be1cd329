pub mod app;
pub mod domain;
pub mod error;
pub mod ncbi;
pub mod order;
pub mod output;
pub mod table;
