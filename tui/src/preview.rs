//! Terminal preview display: ratatui inline viewport.
//!
//! The viewport sits below the shell prompt rather than on the alternate
//! screen, so the last frame (live or summary) stays visible after exit and
//! Ctrl-C still reaches the process as SIGINT.

use std::io::{self, Stdout};

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Terminal, TerminalOptions, Viewport};

use pistats_core::display::Display;
use pistats_core::error::{MonitorError, Result};
use pistats_core::framebuffer::Framebuffer;

use crate::raster;

pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
}

impl TerminalDisplay {
    /// Reserve an inline viewport big enough for a `height`-pixel panel.
    pub fn new(height: u32, title: &str) -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(raster::text_rows(height) + 2),
            },
        )?;
        Ok(TerminalDisplay {
            terminal,
            title: format!(" {} ", title),
        })
    }
}

impl Display for TerminalDisplay {
    fn init(&mut self) -> Result<()> {
        self.terminal
            .clear()
            .map_err(|e| MonitorError::Display(format!("terminal clear failed: {}", e)))
    }

    fn show(&mut self, fb: &Framebuffer) -> Result<()> {
        let lines: Vec<Line> = raster::rasterize(fb).into_iter().map(Line::from).collect();
        let title = self.title.as_str();
        self.terminal
            .draw(|frame| {
                let block = Block::bordered().title(title);
                frame.render_widget(Paragraph::new(lines).block(block), frame.area());
            })
            .map_err(|e| MonitorError::Display(format!("terminal draw failed: {}", e)))?;
        Ok(())
    }
}
