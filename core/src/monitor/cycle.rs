//! The poll-render loop: collect → render → push → sleep, until told to stop.
//!
//! `Monitor` owns the only framebuffer and heartbeat in the process. It moves
//! through `Running` → `Stopping` → `Terminated`:
//!
//! 1. Each `tick` while `Running` checks the stop token, collects a snapshot,
//!    advances the heartbeat, renders, pushes and sleeps.
//! 2. A stop request or a collection failure moves it to `Stopping`.
//! 3. `shutdown` draws the summary frame (unless frozen) and ends in
//!    `Terminated`.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::collector::MetricSource;
use crate::config::MonitorConfig;
use crate::display::Display;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::monitor::heartbeat::Heartbeat;
use crate::render;
use crate::signals::StopToken;

/// Why the loop left `Running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Stop token set (SIGINT / SIGTERM / SIGQUIT or a caller).
    Signal,
    /// A metric command failed; carries the error text.
    CollectionFailed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Signal => write!(f, "stop requested"),
            StopReason::CollectionFailed(reason) => write!(f, "{}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Stopping(StopReason),
    Terminated(StopReason),
}

/// What a finished run reports back to the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub reason: StopReason,
    pub heartbeats: u64,
    /// Completed live iterations (frames pushed).
    pub iterations: u64,
}

impl RunOutcome {
    /// 0 for a requested stop, 1 when collection failed.
    pub fn exit_code(&self) -> i32 {
        match self.reason {
            StopReason::Signal => 0,
            StopReason::CollectionFailed(_) => 1,
        }
    }
}

pub struct Monitor<S, D> {
    source: S,
    display: D,
    framebuffer: Framebuffer,
    heartbeat: Heartbeat,
    config: MonitorConfig,
    state: MonitorState,
    iterations: u64,
}

impl<S: MetricSource, D: Display> Monitor<S, D> {
    /// Initialise the display and push a blank frame. Init failure is fatal.
    pub fn new(source: S, mut display: D, config: MonitorConfig) -> Result<Self> {
        display.init()?;
        let framebuffer = Framebuffer::new(config.width, config.height);
        display.show(&framebuffer)?;
        info!(
            width = config.width,
            height = config.height,
            interval_ms = config.interval.as_millis() as u64,
            freeze = config.freeze,
            "monitor started"
        );
        Ok(Monitor {
            source,
            display,
            framebuffer,
            heartbeat: Heartbeat::new(),
            config,
            state: MonitorState::Running,
            iterations: 0,
        })
    }

    /// Run exactly one iteration of the loop and return the resulting state.
    /// Does nothing once the monitor has left `Running`.
    pub fn tick(&mut self, stop: &StopToken) -> &MonitorState {
        if self.state != MonitorState::Running {
            return &self.state;
        }
        if stop.is_stopped() {
            self.state = MonitorState::Stopping(StopReason::Signal);
            return &self.state;
        }

        let snapshot = match self.source.collect() {
            Ok(snapshot) => snapshot,
            // Ctrl-C reaches the metric command too; its death is not a failure.
            Err(e) if stop.is_stopped() => {
                info!(error = %e, "metric command interrupted by stop request");
                self.state = MonitorState::Stopping(StopReason::Signal);
                return &self.state;
            }
            Err(e) => {
                error!(error = %e, "metric collection failed, stopping monitor");
                self.state = MonitorState::Stopping(StopReason::CollectionFailed(e.to_string()));
                return &self.state;
            }
        };

        let heart = self.heartbeat.beat();
        render::render_metrics(&mut self.framebuffer, &snapshot, heart);
        if let Err(e) = self.display.show(&self.framebuffer) {
            warn!(error = %e, "failed to push frame");
        }
        self.iterations += 1;
        debug!(iteration = self.iterations, heart, beats = self.heartbeat.count(), "frame pushed");

        if stop.sleep(self.config.interval) {
            self.state = MonitorState::Stopping(StopReason::Signal);
        }
        &self.state
    }

    /// Tick until the loop stops, then shut down.
    pub fn run(&mut self, stop: &StopToken) -> RunOutcome {
        while *self.tick(stop) == MonitorState::Running {}
        self.shutdown()
    }

    /// Finish the run: draw and push the summary frame unless `freeze` is set.
    ///
    /// Called while still `Running`, this counts as a requested stop. Calling
    /// it again after `Terminated` returns the same outcome and draws nothing.
    pub fn shutdown(&mut self) -> RunOutcome {
        let reason = match &self.state {
            MonitorState::Terminated(reason) => return self.outcome(reason.clone()),
            MonitorState::Stopping(reason) => reason.clone(),
            MonitorState::Running => StopReason::Signal,
        };

        if self.config.freeze {
            info!("display frozen on last frame");
        } else {
            render::render_summary(&mut self.framebuffer, self.heartbeat.count());
            if let Err(e) = self.display.show(&self.framebuffer) {
                warn!(error = %e, "failed to push summary frame");
            }
        }

        info!(
            heartbeats = self.heartbeat.count(),
            iterations = self.iterations,
            reason = %reason,
            "monitor stopped"
        );
        self.state = MonitorState::Terminated(reason.clone());
        self.outcome(reason)
    }

    fn outcome(&self, reason: StopReason) -> RunOutcome {
        RunOutcome {
            reason,
            heartbeats: self.heartbeat.count(),
            iterations: self.iterations,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn heartbeats(&self) -> u64 {
        self.heartbeat.count()
    }

    /// Whether the next live frame will draw the heart.
    pub fn heart_visible(&self) -> bool {
        self.heartbeat.is_visible()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
