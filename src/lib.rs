//! Terminal client for a remote course catalog: list, filter, create, edit
//! and delete courses and their weekly time slots.

pub mod api;
pub mod config;
pub mod draft;
pub mod logging;
pub mod models;
pub mod theme;
pub mod toast;
pub mod ui;
