//! Infrastructure adapters for the filesystem, clipboard, notifications, and config.

pub mod clipboard;
pub mod config;
pub mod fs;
pub mod logging;
pub mod notify;
