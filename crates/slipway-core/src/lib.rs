pub mod config;
pub mod error;
pub mod exec;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod release;
pub mod steps;

pub use error::{Result, SlipwayError};
