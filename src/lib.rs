pub mod app;
pub mod commands;
pub mod conclusion;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod panel;
pub mod prompt;
pub mod rating;
pub mod relay;
pub mod session;
pub mod transport;
pub mod visual;

pub use crate::app::App;
pub use crate::config::Config;
pub use crate::error::{FeedbackError, Result};
