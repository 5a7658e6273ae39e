//! Taskboard core types
//!
//! Entity models, form validation, board state and the pure aggregations
//! shared by the API client and the terminal UI.

pub mod board;
pub mod error;
pub mod forms;
pub mod models;
pub mod stats;
pub mod storage;
pub mod table;

pub use error::{Error, Result};
