//! Utility module

mod error;
mod report;

pub use error::LexError;
pub use report::{Reporter, StderrReporter};

#[cfg(test)]
pub use report::{CollectingReporter, SilentReporter};
