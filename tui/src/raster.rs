//! Framebuffer to text, two pixel rows per terminal line.
//!
//! Each character cell covers one column and two rows using the Unicode
//! half blocks, so a 128x32 panel becomes 16 lines of 128 characters.

use pistats_core::framebuffer::Framebuffer;

pub const FULL: char = '\u{2588}'; // █
pub const UPPER: char = '\u{2580}'; // ▀
pub const LOWER: char = '\u{2584}'; // ▄
pub const EMPTY: char = ' ';

/// Render `fb` as `ceil(height / 2)` lines of `width` characters.
pub fn rasterize(fb: &Framebuffer) -> Vec<String> {
    let mut lines = Vec::with_capacity(text_rows(fb.height()) as usize);
    for row in (0..fb.height()).step_by(2) {
        let line: String = (0..fb.width())
            .map(|x| cell(fb.get(x, row), fb.get(x, row + 1)))
            .collect();
        lines.push(line);
    }
    lines
}

/// Terminal lines needed for a panel of `height` pixels.
pub fn text_rows(height: u32) -> u16 {
    height.div_ceil(2) as u16
}

fn cell(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => FULL,
        (true, false) => UPPER,
        (false, true) => LOWER,
        (false, false) => EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pistats_core::render;

    #[test]
    fn blank_buffer_is_spaces() {
        let lines = rasterize(&Framebuffer::new(128, 32));
        assert_eq!(lines.len(), 16);
        assert!(lines.iter().all(|l| l.chars().count() == 128 && l.trim().is_empty()));
    }

    #[test]
    fn half_blocks_per_row_pair() {
        let mut fb = Framebuffer::new(4, 2);
        fb.set(0, 0, true);
        fb.set(0, 1, true);
        fb.set(1, 0, true);
        fb.set(2, 1, true);
        assert_eq!(rasterize(&fb), vec![format!("{}{}{}{}", FULL, UPPER, LOWER, EMPTY)]);
    }

    #[test]
    fn odd_height_pads_last_line() {
        let mut fb = Framebuffer::new(2, 3);
        fb.set(1, 2, true);
        let lines = rasterize(&fb);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], format!("{}{}", EMPTY, UPPER));
        assert_eq!(text_rows(3), 2);
    }

    #[test]
    fn heart_shows_in_top_right_cells() {
        let mut fb = Framebuffer::new(128, 32);
        render::draw_heart(&mut fb);
        let lines = rasterize(&fb);
        let top: Vec<char> = lines[0].chars().collect();
        assert!(top[..120].iter().all(|&c| c == EMPTY));
        assert!(top[120..].iter().any(|&c| c != EMPTY));
    }
}
