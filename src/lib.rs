pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod model;
pub mod parser;
pub mod render;
pub mod report;
pub mod sink;
