//! The `utils` module provides the pieces shared by every other module of
//! `chatrelay`: the error taxonomy and logging setup.

pub mod error;
pub mod logging;

pub use error::RelayError;

#[cfg(test)]
mod tests;
