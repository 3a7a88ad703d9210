//! Browser client for the stock trading demo backend.
//!
//! Pure pieces (`config`, `session`, `api`, `view`, `controller`) carry all
//! of the behavior and are tested natively; `app` binds them to Dioxus.

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod session;
pub mod view;
