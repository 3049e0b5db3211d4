//! pistats: host stats and a heartbeat on a small OLED.
//!
//! # Usage
//!
//! ```text
//! pistats                      # 128x32 PiOLED on /dev/i2c-1, 0.25 s heartbeat
//! pistats -b 1.0 --freeze      # slower beat, keep last frame on exit
//! pistats --preview            # draw in the terminal instead of the panel
//! pistats -c /etc/pistats.yaml --print-config
//! ```
//!
//! Exit codes: 0 after SIGINT/SIGTERM/SIGQUIT, 1 when a metric command
//! fails, 2 when startup fails.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;

use pistats_core::collector::ShellMetricSource;
use pistats_core::config::{self, Config, Overrides};
use pistats_core::display::{Backend, Display};
use pistats_core::monitor::Monitor;
use pistats_core::signals::{self, StopToken};
use pistats_core::{logging, MonitorError, Result};
use pistats_tui::preview::TerminalDisplay;

const EXIT_STARTUP: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "pistats", version)]
#[command(about = "Show hostname, IP, CPU load and memory on an SSD1306 OLED", long_about = None)]
struct Cli {
    /// Seconds between heartbeats [default: 0.25]
    #[arg(short = 'b', long, value_name = "SECONDS")]
    heartbeat: Option<f64>,

    /// Leave the last live frame on the display instead of the summary
    #[arg(long)]
    freeze: bool,

    /// YAML config file (falls back to $PISTATS_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// I2C bus device [default: /dev/i2c-1]
    #[arg(long, value_name = "PATH")]
    device: Option<String>,

    /// I2C address, hex or decimal [default: 0x3C]
    #[arg(long, value_name = "ADDR", value_parser = config::parse_address)]
    address: Option<u8>,

    /// Panel height in pixels, 32 or 64 [default: 32]
    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Draw frames in this terminal instead of on the OLED
    #[arg(long)]
    preview: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            heartbeat: self.heartbeat,
            freeze: self.freeze,
            device: self.device.clone(),
            address: self.address,
            height: self.height,
            preview: self.preview,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let config_path = config::resolve_config_path(cli.config.clone());
    let config = match Config::resolve(config_path.as_deref(), &cli.overrides()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("pistats: {}", e);
            return EXIT_STARTUP;
        }
    };

    if cli.print_config {
        return match config.to_yaml() {
            Ok(yaml) => {
                print!("{}", yaml);
                0
            }
            Err(e) => {
                eprintln!("pistats: {}", e);
                EXIT_STARTUP
            }
        };
    }

    logging::init();
    info!(config = ?config_path, backend = ?config.display.backend, "starting pistats");

    let stop = StopToken::new();
    if let Err(e) = signals::install_handlers(&stop) {
        eprintln!("pistats: {}", e);
        return EXIT_STARTUP;
    }

    let display = match open_display(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("pistats: {}", e);
            return EXIT_STARTUP;
        }
    };

    let source = ShellMetricSource::new(config.commands.clone());
    let mut monitor = match Monitor::new(source, display, config.monitor_config()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("pistats: failed to start: {}", e);
            return EXIT_STARTUP;
        }
    };

    monitor.run(&stop).exit_code()
}

fn open_display(config: &Config) -> Result<Box<dyn Display>> {
    match config.display.backend {
        Backend::Preview => {
            let preview = TerminalDisplay::new(config.display.height, "pistats")
                .map_err(|e| MonitorError::Display(format!("terminal preview: {}", e)))?;
            Ok(Box::new(preview))
        }
        Backend::Ssd1306 => open_oled(config),
    }
}

#[cfg(target_os = "linux")]
fn open_oled(config: &Config) -> Result<Box<dyn Display>> {
    let oled = pistats_core::display::oled::Ssd1306Display::open(&config.display)?;
    Ok(Box::new(oled))
}

#[cfg(not(target_os = "linux"))]
fn open_oled(_config: &Config) -> Result<Box<dyn Display>> {
    Err(MonitorError::Display(
        "the SSD1306 backend needs Linux I2C; use --preview".into(),
    ))
}
