//! CPU drawing primitives used by both painters.
//!
//! Everything clips against the image bounds, so callers can pass coordinates
//! that fall partly or entirely outside the frame.

use anyhow::{Result, anyhow, bail};
use image::{Rgb, RgbImage};

use frame_ingest::{Frame, FrameFormat};

/// Width of one glyph cell (5 px glyph plus 1 px spacing) at scale 1.
const GLYPH_ADVANCE: i32 = 6;
/// Height of a glyph at scale 1.
pub const GLYPH_HEIGHT: i32 = 7;

/// Convert a captured BGR frame into an RGB image.
pub fn frame_to_rgb(frame: &Frame) -> Result<RgbImage> {
    if !matches!(frame.format, FrameFormat::Bgr8) {
        bail!("unsupported frame format");
    }
    let rgb = bgr_to_rgb(&frame.data);
    RgbImage::from_vec(frame.width as u32, frame.height as u32, rgb)
        .ok_or_else(|| anyhow!("failed to convert frame into image buffer"))
}

fn bgr_to_rgb(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    for chunk in input.chunks_exact(3) {
        output.push(chunk[2]);
        output.push(chunk[1]);
        output.push(chunk[0]);
    }
    output
}

#[inline]
fn put(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

/// Filled axis-aligned rectangle, corners inclusive.
pub fn fill_rect(
    image: &mut RgbImage,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    color: Rgb<u8>,
) {
    let width = image.width() as i32;
    let height = image.height() as i32;
    if width == 0 || height == 0 {
        return;
    }
    let (left, right) = (left.min(right), left.max(right));
    let (top, bottom) = (top.min(bottom), top.max(bottom));
    if right < 0 || bottom < 0 || left >= width || top >= height {
        return;
    }
    let left = left.clamp(0, width - 1);
    let right = right.clamp(0, width - 1);
    let top = top.clamp(0, height - 1);
    let bottom = bottom.clamp(0, height - 1);

    for y in top..=bottom {
        for x in left..=right {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Rectangle outline `thickness` pixels wide, drawn inward from the given corners.
pub fn draw_rectangle(
    image: &mut RgbImage,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    color: Rgb<u8>,
    thickness: u32,
) {
    let (left, right) = (left.min(right), left.max(right));
    let (top, bottom) = (top.min(bottom), top.max(bottom));
    let t = thickness.max(1) as i32 - 1;
    fill_rect(image, left, top, right, top + t, color);
    fill_rect(image, left, bottom - t, right, bottom, color);
    fill_rect(image, left, top, left + t, bottom, color);
    fill_rect(image, right - t, top, right, bottom, color);
}

/// Filled disc.
pub fn fill_circle(image: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>) {
    let radius = radius.max(0);
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put(image, center.0 + dx, center.1 + dy, color);
            }
        }
    }
}

/// Circle outline of the given stroke width.
pub fn draw_circle(
    image: &mut RgbImage,
    center: (i32, i32),
    radius: i32,
    color: Rgb<u8>,
    thickness: u32,
) {
    let half = thickness.max(1) as f32 / 2.0;
    let inner = (radius as f32 - half).max(0.0);
    let outer = radius as f32 + half;
    let reach = outer.ceil() as i32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dx * dx + dy * dy) as f32).sqrt();
            if d >= inner && d <= outer {
                put(image, center.0 + dx, center.1 + dy, color);
            }
        }
    }
}

/// Line segment with round caps, `thickness` pixels wide.
pub fn draw_line(
    image: &mut RgbImage,
    from: (i32, i32),
    to: (i32, i32),
    color: Rgb<u8>,
    thickness: u32,
) {
    let radius = (thickness.max(1) as i32 - 1) / 2;
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let (w, h) = (image.width() as i32, image.height() as i32);
    if x0.max(x1) < -radius
        || y0.max(y1) < -radius
        || x0.min(x1) >= w + radius
        || y0.min(y1) >= h + radius
    {
        return;
    }
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if radius == 0 {
            put(image, x0, y0, color);
        } else {
            fill_circle(image, (x0, y0), radius, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Mix `overlay` into `base` in place: `base * (1 - alpha) + overlay * alpha`.
pub fn blend_into(base: &mut RgbImage, overlay: &RgbImage, alpha: f32) -> Result<()> {
    if base.dimensions() != overlay.dimensions() {
        bail!(
            "blend: dimension mismatch {:?} vs {:?}",
            base.dimensions(),
            overlay.dimensions()
        );
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    for (dst, src) in base.pixels_mut().zip(overlay.pixels()) {
        for channel in 0..3 {
            let mixed = dst.0[channel] as f32 * inv + src.0[channel] as f32 * alpha;
            dst.0[channel] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(())
}

/// Pixel width of `text` rendered at `scale`.
pub fn text_width(text: &str, scale: u32) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE * scale.max(1) as i32
}

/// Render `text` with the built-in 5x7 font; `(x, y)` is the top-left corner.
/// Lowercase letters are drawn as capitals, unknown characters as blanks.
pub fn draw_label(
    image: &mut RgbImage,
    mut x: i32,
    y: i32,
    text: &str,
    color: Rgb<u8>,
    scale: u32,
) {
    let scale = scale.max(1) as i32;
    for ch in text.chars().flat_map(|c| c.to_uppercase()) {
        if let Some(glyph) = glyph_bits(ch) {
            for (row, pattern) in glyph.iter().enumerate() {
                for col in 0..5 {
                    if (pattern >> (4 - col)) & 1 == 1 {
                        let px = x + col * scale;
                        let py = y + row as i32 * scale;
                        fill_rect(image, px, py, px + scale - 1, py + scale - 1, color);
                    }
                }
            }
        }
        x += GLYPH_ADVANCE * scale;
    }
}

fn glyph_bits(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '%' => [0b10001, 0b10010, 0b00100, 0b01000, 0b10010, 0b10001, 0b00000],
        '.' => [0, 0, 0, 0, 0, 0b00110, 0b00110],
        ' ' => [0, 0, 0, 0, 0, 0, 0],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn count(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn lines_outside_the_image_are_skipped() {
        let mut image = RgbImage::new(20, 10);
        draw_line(&mut image, (-5, -400_000), (15, -300_000), RED, 3);
        draw_line(&mut image, (25, 2), (900_000, 8), RED, 3);
        assert_eq!(count(&image, RED), 0);

        draw_line(&mut image, (-50, 5), (50, 5), RED, 1);
        assert_eq!(count(&image, RED), 20);
    }

    #[test]
    fn converts_bgr_frames() {
        let frame = Frame {
            data: vec![1, 2, 3, 4, 5, 6],
            width: 2,
            height: 1,
            timestamp_ms: 0,
            format: FrameFormat::Bgr8,
        };
        let image = frame_to_rgb(&frame).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([3, 2, 1]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([6, 5, 4]));
    }

    #[test]
    fn rejects_short_frames() {
        let frame = Frame {
            data: vec![0; 5],
            width: 2,
            height: 1,
            timestamp_ms: 0,
            format: FrameFormat::Bgr8,
        };
        assert!(frame_to_rgb(&frame).is_err());
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut image = RgbImage::new(4, 4);
        fill_rect(&mut image, -10, -10, 1, 1, RED);
        assert_eq!(count(&image, RED), 4);
        fill_rect(&mut image, 10, 10, 20, 20, RED);
        assert_eq!(count(&image, RED), 4);
    }

    #[test]
    fn thin_line_covers_both_endpoints() {
        let mut image = RgbImage::new(10, 10);
        draw_line(&mut image, (1, 1), (8, 1), RED, 1);
        assert_eq!(count(&image, RED), 8);
        assert_eq!(image.get_pixel(1, 1), &RED);
        assert_eq!(image.get_pixel(8, 1), &RED);
    }

    #[test]
    fn thick_line_is_wider() {
        let mut image = RgbImage::new(20, 20);
        draw_line(&mut image, (5, 10), (15, 10), RED, 5);
        assert_eq!(image.get_pixel(10, 8), &RED);
        assert_eq!(image.get_pixel(10, 12), &RED);
        assert_eq!(image.get_pixel(10, 14), &BLACK);
    }

    #[test]
    fn label_draws_known_glyphs_only() {
        let mut image = RgbImage::new(40, 10);
        draw_label(&mut image, 0, 0, "I", RED, 1);
        // 'I' has 3 + 1*5 + 3 lit cells.
        assert_eq!(count(&image, RED), 11);

        let mut image = RgbImage::new(40, 10);
        draw_label(&mut image, 0, 0, "~", RED, 1);
        assert_eq!(count(&image, RED), 0);
        assert_eq!(text_width("AB", 2), 24);
    }

    #[test]
    fn blend_mixes_evenly() {
        let mut base = RgbImage::from_pixel(1, 1, Rgb([200, 0, 100]));
        let overlay = RgbImage::from_pixel(1, 1, Rgb([0, 200, 100]));
        blend_into(&mut base, &overlay, 0.5).unwrap();
        assert_eq!(base.get_pixel(0, 0), &Rgb([100, 100, 100]));

        let wrong = RgbImage::new(2, 2);
        assert!(blend_into(&mut base, &wrong, 0.5).is_err());
    }
}
