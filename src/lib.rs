//! Passpad Library
//!
//! Multi-tap passphrase entry screen for small touchscreen devices: the
//! keyboard layout and edit buffer models, the event-loop state machine
//! that multiplexes touch, inactivity timer and swipe input, and a terminal
//! front-end that renders the device screen.

// Module declarations
pub mod config;
pub mod constants;
pub mod keyboard;
pub mod models;
pub mod tui;
