//! UI layer for the desktop client.

pub mod app;

pub use app::{Startup, TodoApp};
