pub mod error;
pub mod loader;
pub mod parser;
pub mod replicates;
