//! TUI module: Terminal User Interface using Ratatui.
//!
//! Walks one session through:
//! - Home
//! - The 13-field assessment form
//! - Results with recommendations and report download

mod app;
mod styles;
mod ui;

pub use app::{App, Screen, Session, NO_RESULT_NOTICE, TRAIN_COMMAND};
pub use styles::MedicalTheme;
