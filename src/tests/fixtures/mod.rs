pub mod config;
pub mod facts;
