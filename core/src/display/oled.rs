//! SSD1306 OLED over Linux I2C (`/dev/i2c-N`).

use linux_embedded_hal::I2cdev;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use tracing::info;

use crate::config::DisplayConfig as PanelSettings;
use crate::display::Display;
use crate::error::{MonitorError, Result};
use crate::framebuffer::Framebuffer;

type Panel<SIZE> = Ssd1306<I2CInterface<I2cdev>, SIZE, BufferedGraphicsMode<SIZE>>;

/// The two panel heights the driver supports.
enum Driver {
    Rows32(Panel<DisplaySize128x32>),
    Rows64(Panel<DisplaySize128x64>),
}

pub struct Ssd1306Display {
    driver: Driver,
    device: String,
}

impl Ssd1306Display {
    /// Open the I2C bus. No bytes are sent to the panel until `init`.
    pub fn open(config: &PanelSettings) -> Result<Self> {
        let i2c = I2cdev::new(&config.device)
            .map_err(|e| MonitorError::Display(format!("cannot open {}: {}", config.device, e)))?;
        let interface = I2CDisplayInterface::new_custom_address(i2c, config.address);
        let driver = match config.height {
            64 => Driver::Rows64(
                Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                    .into_buffered_graphics_mode(),
            ),
            32 => Driver::Rows32(
                Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
                    .into_buffered_graphics_mode(),
            ),
            other => {
                return Err(MonitorError::Display(format!(
                    "unsupported panel height {}",
                    other
                )))
            }
        };
        Ok(Ssd1306Display {
            driver,
            device: config.device.clone(),
        })
    }
}

impl Display for Ssd1306Display {
    fn init(&mut self) -> Result<()> {
        match &mut self.driver {
            Driver::Rows32(panel) => init_panel(panel),
            Driver::Rows64(panel) => init_panel(panel),
        }?;
        info!(device = %self.device, "ssd1306 initialised");
        Ok(())
    }

    fn show(&mut self, fb: &Framebuffer) -> Result<()> {
        match &mut self.driver {
            Driver::Rows32(panel) => push(panel, fb),
            Driver::Rows64(panel) => push(panel, fb),
        }
    }
}

fn init_panel<SIZE: DisplaySize>(panel: &mut Panel<SIZE>) -> Result<()> {
    panel
        .init()
        .map_err(|e| MonitorError::Display(format!("init failed: {:?}", e)))?;
    let blank = Framebuffer::new(u32::from(SIZE::WIDTH), u32::from(SIZE::HEIGHT));
    push(panel, &blank)
}

fn push<SIZE: DisplaySize>(panel: &mut Panel<SIZE>, fb: &Framebuffer) -> Result<()> {
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            panel.set_pixel(x, y, fb.get(x, y));
        }
    }
    panel
        .flush()
        .map_err(|e| MonitorError::Display(format!("flush failed: {:?}", e)))
}
