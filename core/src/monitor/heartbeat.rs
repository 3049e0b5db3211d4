//! Heartbeat state: the blinking heart and the count of beats drawn.

/// Toggle plus counter, both scoped to the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heartbeat {
    visible: bool,
    count: u64,
}

impl Heartbeat {
    /// Starts visible with zero beats.
    pub fn new() -> Self {
        Heartbeat {
            visible: true,
            count: 0,
        }
    }

    /// Advance one iteration. Returns whether the heart is drawn this time;
    /// a drawn heart counts as a beat.
    pub fn beat(&mut self) -> bool {
        let drawn = self.visible;
        if drawn {
            self.count = self.count.saturating_add(1);
        }
        self.visible = !drawn;
        drawn
    }

    /// Whether the next `beat` will draw the heart.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}
