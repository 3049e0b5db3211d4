//! pistats core: host metrics on a small monochrome OLED.
//!
//! # Modules
//!
//! - [`collector`]: shell-backed metric snapshot (hostname, IP, CPU, memory)
//! - [`framebuffer`]: 1-bit pixel grid, an `embedded-graphics` draw target
//! - [`render`]: live metrics frame and shutdown summary frame
//! - [`display`]: `Display` trait and the SSD1306 I2C backend
//! - [`monitor`]: heartbeat state and the poll-render loop
//! - [`signals`]: stop token and SIGINT/SIGTERM/SIGQUIT handlers
//! - [`config`]: YAML config file, CLI overrides, validation
//! - [`infrastructure`]: command runner and test doubles

pub mod collector;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod infrastructure;
pub mod logging;
pub mod monitor;
pub mod render;
pub mod signals;

pub use error::{MonitorError, Result};
