use crate::error::RenderError;
use crate::render::Frame;
use font8x8::UnicodeFonts;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Quantises a display-ready frame to 8-bit RGB.
pub fn frame_to_image(frame: &Frame) -> RgbImage {
    RgbImage::from_fn(frame.width, frame.height, |x, y| {
        let c = frame.pixel(x, y).clamp(glam::Vec3::ZERO, glam::Vec3::ONE) * 255.0;
        Rgb([c.x.round() as u8, c.y.round() as u8, c.z.round() as u8])
    })
}

/// Writes a frame, optionally stretched to `upscale` (viewport size) and with
/// `hud` lines stamped top-left.
pub fn save_frame(
    frame: &Frame,
    path: &Path,
    upscale: Option<(u32, u32)>,
    hud: &[String],
) -> Result<(), RenderError> {
    let mut img = frame_to_image(frame);
    if let Some((w, h)) = upscale {
        if (w, h) != (img.width(), img.height()) && w > 0 && h > 0 {
            img = imageops::resize(&img, w, h, FilterType::Triangle);
        }
    }
    if !hud.is_empty() {
        draw_hud(&mut img, hud);
    }
    img.save(path)?;
    log::debug!("[png] wrote {}", path.display());
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Glyph scale factor (each font pixel becomes FONT_SCALE×FONT_SCALE pixels).
const FONT_SCALE: u32 = 2;
const CHAR_W: u32 = 8 * FONT_SCALE;
const CHAR_H: u32 = 8 * FONT_SCALE;
const PAD: u32 = 6;
const LINE_GAP: u32 = 4;

const HUD_TEXT: [u8; 3] = [235, 235, 235];
const HUD_SHADOW: [u8; 3] = [0, 0, 0];
const HUD_BACKDROP: [u8; 3] = [0, 0, 0];
/// Backdrop opacity; the frame shows through the rest.
const HUD_ALPHA: f32 = 0.55;

/// Screen rectangle the HUD owns.  Text never leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Panel {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Panel {
    /// Panel sized to fit `lines`, anchored top-left and cut to the image.
    fn fit(lines: &[String], img: &RgbImage) -> Self {
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        let rows = lines.len() as u32;
        let w = cols * CHAR_W + 2 * PAD;
        let h = (rows * (CHAR_H + LINE_GAP)).saturating_sub(LINE_GAP) + 2 * PAD;
        Self {
            x0: 0,
            y0: 0,
            x1: w.min(img.width()),
            y1: h.min(img.height()),
        }
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }

    /// Top-left of the glyph cell at `col` on text line `row`.
    fn cell(&self, col: u32, row: u32) -> (u32, u32) {
        (
            self.x0 + PAD + col * CHAR_W,
            self.y0 + PAD + row * (CHAR_H + LINE_GAP),
        )
    }
}

/// Stats panel, standing in for the live FPS counter.
fn draw_hud(img: &mut RgbImage, lines: &[String]) {
    let panel = Panel::fit(lines, img);
    darken(img, &panel);

    for (row, line) in lines.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            let (x, y) = panel.cell(col as u32, row as u32);
            // Shadow one font pixel down-right keeps text legible over snow.
            stamp_glyph(img, &panel, c, x + FONT_SCALE / 2, y + FONT_SCALE / 2, HUD_SHADOW);
            stamp_glyph(img, &panel, c, x, y, HUD_TEXT);
        }
    }
}

/// Blends the backdrop over the panel.
fn darken(img: &mut RgbImage, panel: &Panel) {
    for py in panel.y0..panel.y1 {
        for px in panel.x0..panel.x1 {
            let Rgb(under) = *img.get_pixel(px, py);
            let out: [u8; 3] = std::array::from_fn(|i| {
                (under[i] as f32 * (1.0 - HUD_ALPHA) + HUD_BACKDROP[i] as f32 * HUD_ALPHA).round()
                    as u8
            });
            img.put_pixel(px, py, Rgb(out));
        }
    }
}

/// Writes the set bits of `c`'s 8×8 glyph, scaled, with the cell's top-left
/// at `(x, y)`.  Pixels outside `panel` are dropped.  Glyphs missing from
/// the basic font draw nothing.
fn stamp_glyph(img: &mut RgbImage, panel: &Panel, c: char, x: u32, y: u32, color: [u8; 3]) {
    let Some(glyph) = font8x8::BASIC_FONTS.get(c) else {
        return;
    };
    let lit = glyph.iter().enumerate().flat_map(|(row, &bits)| {
        (0u32..8)
            .filter(move |col| bits & (1 << col) != 0)
            .map(move |col| (col, row as u32))
    });
    for (col, row) in lit {
        for dy in 0..FONT_SCALE {
            for dx in 0..FONT_SCALE {
                let px = x + col * FONT_SCALE + dx;
                let py = y + row * FONT_SCALE + dy;
                if panel.contains(px, py) {
                    img.put_pixel(px, py, Rgb(color));
                }
            }
        }
    }
}
