//! Error types for `factoid-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("content field missing or blank")]
  BlankContent,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
