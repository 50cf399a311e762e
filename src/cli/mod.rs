//! CLI module for the book-library-suite binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
