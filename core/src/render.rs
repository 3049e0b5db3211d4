//! Frame composition: the live metrics frame and the shutdown summary frame.
//!
//! Both frames clear the framebuffer first. Text uses the fixed-width
//! `FONT_5X8` with a top baseline, so each line's y offset is the top row of
//! its glyphs.

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::collector::MetricSnapshot;
use crate::framebuffer::Framebuffer;

/// Top row of each live-frame text line: host, IP, CPU, memory.
pub const LINE_OFFSETS: [i32; 4] = [0, 8, 16, 25];

/// Top row of the two summary lines.
pub const SUMMARY_OFFSETS: [i32; 2] = [8, 16];

/// Width the hostname is padded or truncated to.
pub const HOST_WIDTH: usize = 13;

pub const HEART_WIDTH: u32 = 8;

/// Counts above this are shown as ">1,000,000".
pub const HEARTBEAT_DISPLAY_CAP: u64 = 1_000_000;

/// Vertical segment (first row, last row) for each heart column, left to right.
const HEART_COLUMNS: [(i32, i32); 8] = [
    (1, 3),
    (0, 4),
    (1, 5),
    (2, 6),
    (2, 6),
    (1, 5),
    (0, 4),
    (1, 3),
];

/// Draw the live frame: optional heart, then host/IP/CPU/memory lines.
pub fn render_metrics(fb: &mut Framebuffer, snapshot: &MetricSnapshot, heart_visible: bool) {
    fb.clear();
    if heart_visible {
        draw_heart(fb);
    }
    let lines = [
        host_line(&snapshot.hostname),
        format!("IP: {}", snapshot.ip),
        snapshot.cpu.clone(),
        snapshot.mem.clone(),
    ];
    for (text, y) in lines.iter().zip(LINE_OFFSETS) {
        draw_text(fb, text, y);
    }
}

/// Draw the shutdown frame reporting the total heartbeat count.
pub fn render_summary(fb: &mut Framebuffer, heartbeats: u64) {
    fb.clear();
    draw_text(fb, "Monitor stopped after", SUMMARY_OFFSETS[0]);
    draw_text(fb, &format_heartbeats(heartbeats), SUMMARY_OFFSETS[1]);
}

/// Heart glyph in the top-right corner, right-aligned to the canvas width.
pub fn draw_heart(fb: &mut Framebuffer) {
    let left = fb.width().saturating_sub(HEART_WIDTH) as i32;
    let style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    for (col, (top, bottom)) in HEART_COLUMNS.iter().enumerate() {
        let x = left + col as i32;
        let _ = Line::new(Point::new(x, *top), Point::new(x, *bottom))
            .into_styled(style)
            .draw(fb);
    }
}

fn draw_text(fb: &mut Framebuffer, text: &str, y: i32) {
    let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
    let _ = Text::with_baseline(text, Point::new(0, y), style, Baseline::Top).draw(fb);
}

/// `"Host: "` followed by the name padded or cut to exactly `HOST_WIDTH` chars.
pub fn host_line(name: &str) -> String {
    let name: String = name.trim_end().chars().take(HOST_WIDTH).collect();
    format!("Host: {:<width$}", name, width = HOST_WIDTH)
}

/// `"<count> heartbeats"` with thousands separators, capped for display.
pub fn format_heartbeats(count: u64) -> String {
    if count > HEARTBEAT_DISPLAY_CAP {
        format!(">{} heartbeats", group_thousands(HEARTBEAT_DISPLAY_CAP))
    } else {
        format!("{} heartbeats", group_thousands(count))
    }
}

/// Format `n` with a comma every three digits.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MetricSnapshot {
        MetricSnapshot {
            hostname: "pi".into(),
            ip: "192.168.1.20".into(),
            cpu: "CPU Load: 0.42".into(),
            mem: "Mem: 210/926MB 22.68%".into(),
        }
    }

    #[test]
    fn group_thousands_inserts_commas() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(12345), "12,345");
        assert_eq!(group_thousands(123456), "123,456");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn heartbeats_below_cap_are_exact() {
        assert_eq!(format_heartbeats(0), "0 heartbeats");
        assert_eq!(format_heartbeats(3), "3 heartbeats");
        assert_eq!(format_heartbeats(4321), "4,321 heartbeats");
        assert_eq!(format_heartbeats(1_000_000), "1,000,000 heartbeats");
    }

    #[test]
    fn heartbeats_above_cap_are_capped() {
        assert_eq!(format_heartbeats(1_000_001), ">1,000,000 heartbeats");
        assert_eq!(format_heartbeats(u64::MAX), ">1,000,000 heartbeats");
    }

    #[test]
    fn host_line_pads_short_names() {
        assert_eq!(host_line("pi"), "Host: pi           ");
        assert_eq!(host_line("pi").len(), "Host: ".len() + HOST_WIDTH);
        assert_eq!(host_line("pi\n"), "Host: pi           ");
    }

    #[test]
    fn host_line_truncates_long_names() {
        assert_eq!(host_line("raspberrypi-garage-01"), "Host: raspberrypi-g");
        assert_eq!(host_line("exactly13char"), "Host: exactly13char");
    }

    #[test]
    fn heart_occupies_top_right_corner() {
        let mut fb = Framebuffer::new(128, 32);
        draw_heart(&mut fb);
        let expected: usize = HEART_COLUMNS
            .iter()
            .map(|(top, bottom)| (bottom - top + 1) as usize)
            .sum();
        assert_eq!(fb.lit_count(), expected);
        assert_eq!(fb.lit_in(120, 0, 128, 7), expected);
        assert!(fb.get(121, 0));
        assert!(fb.get(123, 6));
        assert!(!fb.get(120, 0));
        assert!(!fb.get(127, 4));
    }

    #[test]
    fn heart_follows_canvas_width() {
        let mut fb = Framebuffer::new(64, 32);
        draw_heart(&mut fb);
        assert!(fb.get(57, 0));
        assert_eq!(fb.lit_in(0, 0, 56, 32), 0);
    }

    #[test]
    fn metrics_frame_with_and_without_heart() {
        let mut with_heart = Framebuffer::new(128, 32);
        render_metrics(&mut with_heart, &snapshot(), true);
        let mut without = Framebuffer::new(128, 32);
        render_metrics(&mut without, &snapshot(), false);

        assert!(with_heart.lit_in(120, 0, 128, 7) > 0);
        assert_eq!(without.lit_in(120, 0, 128, 7), 0);
        // text is identical either way
        assert_eq!(with_heart.lit_in(0, 0, 115, 32), without.lit_in(0, 0, 115, 32));
    }

    #[test]
    fn metrics_frame_draws_each_line_band() {
        let mut fb = Framebuffer::new(128, 32);
        render_metrics(&mut fb, &snapshot(), false);
        for y in LINE_OFFSETS {
            let y = y as u32;
            assert!(fb.lit_in(0, y, 128, y + 8) > 0, "no text near row {}", y);
        }
    }

    #[test]
    fn metrics_frame_clears_previous_content() {
        let mut fb = Framebuffer::new(128, 32);
        fb.set(127, 31, true);
        let blank = MetricSnapshot {
            hostname: String::new(),
            ip: String::new(),
            cpu: String::new(),
            mem: String::new(),
        };
        render_metrics(&mut fb, &blank, false);
        assert!(!fb.get(127, 31));
    }

    #[test]
    fn summary_frame_matches_fresh_render() {
        let mut fb = Framebuffer::new(128, 32);
        render_metrics(&mut fb, &snapshot(), true);
        render_summary(&mut fb, 3);

        let mut fresh = Framebuffer::new(128, 32);
        render_summary(&mut fresh, 3);
        assert_eq!(fb, fresh);
        // nothing in the top band or the heart corner
        assert_eq!(fb.lit_in(0, 0, 128, 8), 0);
        assert!(fb.lit_in(0, 8, 128, 24) > 0);
    }
}
