//! pistats terminal preview: draws the OLED framebuffer in a terminal.
//!
//! Useful on machines without a panel attached. The preview implements the
//! same `Display` trait as the SSD1306 backend, so the monitor loop runs
//! unchanged.
//!
//! # Modules
//!
//! - [`raster`]: framebuffer to half-block text lines
//! - [`preview`]: ratatui inline viewport implementing `Display`

pub mod preview;
pub mod raster;
