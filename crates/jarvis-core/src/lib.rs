pub mod config;
pub mod error;

pub use config::JarvisConfig;
pub use error::{JarvisError, Result};
