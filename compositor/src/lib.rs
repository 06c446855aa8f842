//! Flattens a generated background, a legibility gradient and an optional
//! shadowed text overlay into a single 1280x720 PNG.

mod font;
mod wrap;

pub use font::load_font_cached;
pub use wrap::wrap_lines;

use std::{path::Path, str::FromStr};

use image::{DynamicImage, Rgba, RgbaImage, imageops};
use rusttype::{Font, Scale, point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CANVAS_WIDTH: u32 = 1280;
pub const CANVAS_HEIGHT: u32 = 720;

/// Ratio between the export canvas and the client preview (640x360).
/// Overlay styles are specified in preview pixels; everything size-like
/// is scaled by this factor at export time.
pub const EXPORT_SCALE: f32 = 2.0;

/// Horizontal margin kept free of text, split across both sides.
const WRAP_MARGIN: u32 = 100;
/// Vertical distance of the top/bottom anchors from the canvas edge.
const EDGE_ANCHOR_OFFSET: f32 = 120.0;
/// Line height as a multiple of the scaled font size.
const LINE_HEIGHT_FACTOR: f32 = 2.5;
/// Fixed drop shadow offset in export pixels.
const SHADOW_OFFSET: f32 = 4.0;
/// Peak opacity of the legibility gradient at the bottom edge.
const GRADIENT_MAX_ALPHA: f32 = 0.6;

const OVERLAY_FONT: &str = "Inter-Bold.ttf";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("background image could not be decoded: {0}")]
    Decode(image::ImageError),
    #[error("image encoding failed: {0}")]
    Encode(image::ImageError),
    #[error("font: {0}")]
    Font(String),
    #[error("invalid color: {0}")]
    Color(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    Center,
    Bottom,
}

impl FromStr for TextPosition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(TextPosition::Top),
            "center" => Ok(TextPosition::Center),
            "bottom" => Ok(TextPosition::Bottom),
            _ => Err(()),
        }
    }
}

impl TextPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextPosition::Top => "top",
            TextPosition::Center => "center",
            TextPosition::Bottom => "bottom",
        }
    }
}

/// Overlay text styling, in preview pixels. Fields omitted on the wire
/// fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub font_size: f32,
    pub color: String,
    pub shadow_color: String,
    pub shadow_blur: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle {
            font_size: 48.0,
            color: "#ffffff".to_string(),
            shadow_color: "#000000".to_string(),
            shadow_blur: 8.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Overlay {
    pub text: String,
    pub position: TextPosition,
    pub style: OverlayStyle,
}

/// Composites the final thumbnail: background scaled and cropped to fill
/// the canvas, legibility gradient, optional word-wrapped text with drop
/// shadow. Returns encoded PNG bytes.
pub fn compose(
    background: &[u8],
    overlay: Option<&Overlay>,
    fonts_dir: &Path,
) -> Result<Vec<u8>, ComposeError> {
    let decoded = image::load_from_memory(background).map_err(ComposeError::Decode)?;

    let mut canvas = decoded
        .resize_to_fill(CANVAS_WIDTH, CANVAS_HEIGHT, imageops::FilterType::Lanczos3)
        .to_rgba8();
    apply_gradient(&mut canvas);

    if let Some(overlay) = overlay {
        if !overlay.text.trim().is_empty() {
            let font = font::load_font_cached(fonts_dir, OVERLAY_FONT)?;
            draw_overlay(&mut canvas, &font, overlay)?;
        }
    }

    let mut out = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(ComposeError::Encode)?;
    Ok(out)
}

/// Darkens the lower half: fully transparent at the vertical midpoint,
/// ramping to ~60% opaque black at the bottom edge, so overlay text stays
/// legible regardless of the background.
fn apply_gradient(canvas: &mut RgbaImage) {
    let mid = CANVAS_HEIGHT / 2;
    for y in mid..CANVAS_HEIGHT {
        let t = (y - mid) as f32 / (CANVAS_HEIGHT - mid) as f32;
        let alpha = GRADIENT_MAX_ALPHA * t;
        for x in 0..CANVAS_WIDTH {
            let px = canvas.get_pixel_mut(x, y);
            for c in 0..3 {
                px.0[c] = (px.0[c] as f32 * (1.0 - alpha)) as u8;
            }
        }
    }
}

fn draw_overlay(
    canvas: &mut RgbaImage,
    font: &Font<'static>,
    overlay: &Overlay,
) -> Result<(), ComposeError> {
    let style = &overlay.style;
    let px = style.font_size * EXPORT_SCALE;
    let scale = Scale::uniform(px);
    let fill = parse_hex_color(&style.color)?;
    let shadow = parse_hex_color(&style.shadow_color)?;

    let max_width = (CANVAS_WIDTH - WRAP_MARGIN) as f32;
    let lines = wrap::wrap_lines(&overlay.text, max_width, |s| measure_width(font, scale, s));
    if lines.is_empty() {
        return Ok(());
    }

    let line_height = px * LINE_HEIGHT_FACTOR;
    let block_height = line_height * lines.len() as f32;
    let mut top = anchor_y(overlay.position) - block_height / 2.0;
    // keep a tall wrapped block on the canvas
    top = top.clamp(0.0, (CANVAS_HEIGHT as f32 - block_height).max(0.0));

    // text and shadow go into their own layers so the shadow can be
    // blurred without touching the background
    let mut text_layer = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let mut shadow_layer = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    for (i, line) in lines.iter().enumerate() {
        let width = measure_width(font, scale, line);
        let x = (CANVAS_WIDTH as f32 - width) / 2.0;
        let y = top + line_height * i as f32 + (line_height - px) / 2.0;
        draw_line(
            &mut shadow_layer,
            font,
            scale,
            x + SHADOW_OFFSET,
            y + SHADOW_OFFSET,
            shadow,
            line,
        );
        draw_line(&mut text_layer, font, scale, x, y, fill, line);
    }

    let shadow_layer = if style.shadow_blur > 0.0 {
        imageops::blur(&shadow_layer, style.shadow_blur * EXPORT_SCALE * 0.5)
    } else {
        shadow_layer
    };

    overlay_alpha(canvas, &shadow_layer);
    overlay_alpha(canvas, &text_layer);
    Ok(())
}

fn anchor_y(position: TextPosition) -> f32 {
    match position {
        TextPosition::Top => EDGE_ANCHOR_OFFSET,
        TextPosition::Center => CANVAS_HEIGHT as f32 / 2.0,
        TextPosition::Bottom => CANVAS_HEIGHT as f32 - EDGE_ANCHOR_OFFSET,
    }
}

fn measure_width(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn draw_line(
    layer: &mut RgbaImage,
    font: &Font<'_>,
    scale: Scale,
    x: f32,
    y: f32,
    color: Rgba<u8>,
    text: &str,
) {
    let v_metrics = font.v_metrics(scale);
    let baseline = y + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(x, baseline)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= layer.width() || py >= layer.height() {
                    return;
                }
                let a = (v * 255.0) as u8;
                if a == 0 {
                    return;
                }
                let dst = layer.get_pixel_mut(px, py);
                // keep the strongest coverage where glyphs touch
                if a > dst.0[3] {
                    *dst = Rgba([color.0[0], color.0[1], color.0[2], a]);
                }
            });
        }
    }
}

fn overlay_alpha(base: &mut RgbaImage, over: &RgbaImage) {
    for (x, y, p) in over.enumerate_pixels() {
        let a = p.0[3] as f32 / 255.0;
        if a <= 0.0 {
            continue;
        }
        let dst = base.get_pixel_mut(x, y);
        let inv = 1.0 - a;
        for c in 0..3 {
            dst.0[c] = (p.0[c] as f32 * a + dst.0[c] as f32 * inv) as u8;
        }
        dst.0[3] = 255;
    }
}

fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ComposeError> {
    let trimmed = s.trim().trim_start_matches('#');
    if trimmed.len() != 6 {
        return Err(ComposeError::Color(s.to_string()));
    }
    let bytes = hex::decode(trimmed).map_err(|_| ComposeError::Color(s.to_string()))?;
    Ok(Rgba([bytes[0], bytes[1], bytes[2], 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn output_is_fixed_resolution_png() {
        let bytes = compose(&white_png(64, 64), None, Path::new(".")).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), CANVAS_WIDTH);
        assert_eq!(img.height(), CANVAS_HEIGHT);
    }

    #[test]
    fn gradient_darkens_the_bottom_edge_only() {
        let bytes = compose(&white_png(64, 64), None, Path::new(".")).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();

        // upper half untouched
        let top = img.get_pixel(CANVAS_WIDTH / 2, CANVAS_HEIGHT / 4);
        assert!(top.0[0] > 250, "upper half should stay white, got {:?}", top);

        // bottom edge at ~60% black over white: 255 * 0.4 = 102
        let bottom = img.get_pixel(CANVAS_WIDTH / 2, CANVAS_HEIGHT - 1);
        assert!(
            (95..=110).contains(&bottom.0[0]),
            "bottom edge should be ~60% darkened, got {:?}",
            bottom
        );

        // midpoint is where the ramp starts
        let mid = img.get_pixel(CANVAS_WIDTH / 2, CANVAS_HEIGHT / 2);
        assert!(mid.0[0] > 250, "midpoint should be undarkened, got {:?}", mid);
    }

    #[test]
    fn undecodable_background_is_rejected() {
        let err = compose(b"not an image", None, Path::new(".")).unwrap_err();
        assert!(matches!(err, ComposeError::Decode(_)));
    }

    #[test]
    fn anchors_match_position() {
        assert_eq!(anchor_y(TextPosition::Top), EDGE_ANCHOR_OFFSET);
        assert_eq!(anchor_y(TextPosition::Center), CANVAS_HEIGHT as f32 / 2.0);
        assert_eq!(
            anchor_y(TextPosition::Bottom),
            CANVAS_HEIGHT as f32 - EDGE_ANCHOR_OFFSET
        );
    }

    #[test]
    fn hex_colors_parse_and_reject() {
        assert_eq!(
            parse_hex_color("#fbbf24").unwrap(),
            Rgba([0xfb, 0xbf, 0x24, 255])
        );
        assert_eq!(
            parse_hex_color("ffffff").unwrap(),
            Rgba([255, 255, 255, 255])
        );
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn text_positions_parse_from_wire_strings() {
        assert_eq!("top".parse::<TextPosition>(), Ok(TextPosition::Top));
        assert_eq!("bottom".parse::<TextPosition>(), Ok(TextPosition::Bottom));
        assert!("middle".parse::<TextPosition>().is_err());
    }
}
