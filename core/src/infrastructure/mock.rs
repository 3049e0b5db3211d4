//! Test doubles for the command runner, the metric source and the display.
//!
//! They record what the monitor loop did, making it easy to write
//! deterministic tests without spawning processes or touching I2C.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::collector::{MetricSnapshot, MetricSource};
use crate::display::Display;
use crate::error::{MonitorError, Result};
use crate::framebuffer::Framebuffer;
use crate::infrastructure::runner::CommandRunner;
use crate::signals::StopToken;

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<std::result::Result<String, String>>,
    log: Vec<String>,
}

/// Serves scripted replies to metric commands and logs every command line.
///
/// Clones share one script, so a test can hand a clone to a
/// `ShellMetricSource` and inspect the log afterwards. Once the replies run
/// out every command prints nothing and succeeds.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    script: Rc<RefCell<Script>>,
}

impl ScriptedRunner {
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        ScriptedRunner {
            script: Rc::new(RefCell::new(Script {
                replies: replies.into(),
                log: Vec::new(),
            })),
        }
    }

    /// Command lines run so far, oldest first.
    pub fn commands(&self) -> Vec<String> {
        self.script.borrow().log.clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cmd: &str) -> std::result::Result<String, String> {
        let mut script = self.script.borrow_mut();
        script.log.push(cmd.to_string());
        script.replies.pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}

/// Returns the same snapshot every time, with optional scripted failure/stop.
pub struct FixedMetricSource {
    snapshot: MetricSnapshot,
    collections: Cell<usize>,
    fail_after: Option<usize>,
    stop_after: Option<(usize, StopToken)>,
}

impl FixedMetricSource {
    pub fn new(snapshot: MetricSnapshot) -> Self {
        FixedMetricSource {
            snapshot,
            collections: Cell::new(0),
            fail_after: None,
            stop_after: None,
        }
    }

    /// Succeed `n` times, then fail every later call with a collection error.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Set `token` during the `n`th collection, as a signal would, even if it fails.
    pub fn stop_after(mut self, n: usize, token: StopToken) -> Self {
        self.stop_after = Some((n, token));
        self
    }

    /// Number of `collect` calls so far, failed ones included.
    pub fn collections(&self) -> usize {
        self.collections.get()
    }
}

impl MetricSource for FixedMetricSource {
    fn collect(&self) -> Result<MetricSnapshot> {
        let call = self.collections.get() + 1;
        self.collections.set(call);
        if let Some((n, token)) = &self.stop_after {
            if call == *n {
                token.stop();
            }
        }
        if let Some(limit) = self.fail_after {
            if call > limit {
                return Err(MonitorError::collection("cpu", "scripted failure"));
            }
        }
        Ok(self.snapshot.clone())
    }
}

/// Records init calls and a copy of every frame shown.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    inits: usize,
    frames: Vec<Framebuffer>,
    fail_init: bool,
    fail_show_after: Option<usize>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_init() -> Self {
        RecordingDisplay {
            fail_init: true,
            ..Self::default()
        }
    }

    /// Accept `n` frames, then fail every later push.
    pub fn failing_show_after(n: usize) -> Self {
        RecordingDisplay {
            fail_show_after: Some(n),
            ..Self::default()
        }
    }

    pub fn inits(&self) -> usize {
        self.inits
    }

    /// Every successfully pushed frame, oldest first.
    pub fn frames(&self) -> &[Framebuffer] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Framebuffer> {
        self.frames.last()
    }
}

impl Display for RecordingDisplay {
    fn init(&mut self) -> Result<()> {
        if self.fail_init {
            return Err(MonitorError::Display("scripted init failure".into()));
        }
        self.inits += 1;
        Ok(())
    }

    fn show(&mut self, fb: &Framebuffer) -> Result<()> {
        if let Some(limit) = self.fail_show_after {
            if self.frames.len() >= limit {
                return Err(MonitorError::Display("scripted push failure".into()));
            }
        }
        self.frames.push(fb.clone());
        Ok(())
    }
}
