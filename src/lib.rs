pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod llm;
pub mod mail;
pub mod pipeline;
pub mod secrets;

pub use error::{Error, Result};
