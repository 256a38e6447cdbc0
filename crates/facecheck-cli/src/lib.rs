pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod output;
