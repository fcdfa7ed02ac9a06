pub mod config;
pub mod error;
pub mod ids;
pub mod message;
pub mod trace;
pub mod truncation;

pub use error::{Error, Result};
