//! Display backends that push a `Framebuffer` to a physical (or simulated) panel.
//!
//! `Display` is the seam between the monitor loop and the hardware. The
//! SSD1306 backend drives a real OLED over Linux I2C; the terminal preview
//! lives in the `pistats-tui` crate; `RecordingDisplay` in
//! [`crate::infrastructure::mock`] serves the tests.

#[cfg(target_os = "linux")]
pub mod oled;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// A monochrome pixel-addressable panel.
pub trait Display {
    /// Hardware init; leaves the panel blank.
    fn init(&mut self) -> Result<()>;

    /// Transfer the whole framebuffer to the panel.
    fn show(&mut self, fb: &Framebuffer) -> Result<()>;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn show(&mut self, fb: &Framebuffer) -> Result<()> {
        (**self).show(fb)
    }
}

/// Which backend renders the frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Ssd1306,
    Preview,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Ssd1306
    }
}
