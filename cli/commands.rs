pub mod config;
pub mod generate;
pub mod stats;
pub mod tree;
