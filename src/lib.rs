#[macro_use]
extern crate derive_new;

pub mod config;
pub mod data;
pub mod error;

pub use config::DataConfig;
pub use data::*;
pub use error::{DataError, Result};
