use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Bar palette
// ---------------------------------------------------------------------------

/// Anchor colours of the viridis colour map, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn to_linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Sample the viridis ramp at `t` in `[0, 1]`, interpolating in linear RGB.
pub fn viridis_at(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lo as f32;

    let mixed = to_linear(VIRIDIS[lo]).mix(to_linear(VIRIDIS[lo + 1]), frac);
    let rgb: Srgb = Srgb::from_linear(mixed);
    let (r, g, b) = rgb.into_format::<u8>().into_components();
    Color32::from_rgb(r, g, b)
}

/// `n` colours spread evenly along the viridis ramp, one per bar.
pub fn viridis_palette(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![viridis_at(0.5)],
        _ => (0..n)
            .map(|i| viridis_at(i as f32 / (n - 1) as f32))
            .collect(),
    }
}
