use image::{Rgba, RgbaImage};

pub const GLYPH_W: u32 = 5;
pub const GLYPH_H: u32 = 7;
/// Horizontal advance per character, including one column of spacing.
pub const ADVANCE: u32 = GLYPH_W + 1;

/// 5x7 glyph rows, lower 5 bits per row, MSB on the left. Only the characters
/// that frame titles use are present; anything else renders as a blank cell.
#[rustfmt::skip]
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '0' => [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E],
        '1' => [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E],
        '2' => [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F],
        '3' => [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E],
        '4' => [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02],
        '5' => [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E],
        '6' => [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E],
        '7' => [0x1F,0x01,0x02,0x04,0x08,0x08,0x08],
        '8' => [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E],
        '9' => [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C],
        'S' => [0x0F,0x10,0x10,0x0E,0x01,0x01,0x1E],
        'e' => [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E],
        'p' => [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10],
        't' => [0x08,0x08,0x1C,0x08,0x08,0x09,0x06],
        _ => [0x00; 7],
    }
}

/// Width in pixels of `text` drawn at the given integer scale.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    (chars * ADVANCE - 1) * scale
}

/// Draws `text` with its top-left corner at `(x, y)`. Pixels falling outside
/// the canvas are clipped.
pub fn draw_text(canvas: &mut RgbaImage, x: u32, y: u32, text: &str, scale: u32, color: Rgba<u8>) {
    let scale = scale.max(1);
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as u32 * ADVANCE * scale;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = y + row as u32 * scale;
                fill_rect(canvas, px, py, scale, scale, color);
            }
        }
    }
}

pub(crate) fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}
