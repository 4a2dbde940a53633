//! Frontend module - Tokens and Scanner

pub mod token;
pub mod scanner;
