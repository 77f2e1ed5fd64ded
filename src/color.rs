use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

pub const BG_WINDOW: Color32 = Color32::from_rgb(0xEC, 0xEF, 0xF1);
pub const BG_FRAME: Color32 = Color32::from_rgb(0xCF, 0xD8, 0xDC);
pub const ACCENT: Color32 = Color32::from_rgb(0x4D, 0xB6, 0xAC);
pub const TABLE_BG: Color32 = Color32::from_rgb(0x98, 0xE2, 0xEA);
pub const TABLE_FG: Color32 = Color32::from_rgb(0x1E, 0x1E, 0x2F);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.70);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging colour map (heatmap)
// ---------------------------------------------------------------------------

/// Blue → light grey → red over `-1.0..=1.0`.  NaN maps to grey.
pub fn diverging(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::GRAY;
    }
    let cold = LinSrgb::new(0.045f32, 0.073, 0.527);
    let mid = LinSrgb::new(0.723f32, 0.723, 0.723);
    let hot = LinSrgb::new(0.456f32, 0.001, 0.019);

    let t = value.clamp(-1.0, 1.0) as f32;
    let lin = if t < 0.0 {
        mid.mix(cold, -t)
    } else {
        mid.mix(hot, t)
    };
    to_color32(Srgb::from_linear(lin))
}

/// Black or white, whichever reads better on `bg`.
pub fn contrast_text(bg: Color32) -> Color32 {
    let luma = 0.299 * bg.r() as f32 + 0.587 * bg.g() as f32 + 0.114 * bg.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
