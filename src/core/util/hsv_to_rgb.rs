use crate::core::data::colour::Colour;

/// Standard HSV to RGB conversion.
///
/// `hue` is in degrees and wrapped into `[0, 360)`; `saturation` and `value`
/// are clamped to `[0, 1]`.
#[must_use]
pub fn hsv_to_rgb(hue: f64, saturation: f32, value: f32) -> Colour {
    let hue = hue.rem_euclid(360.0);
    let saturation = f64::from(saturation.clamp(0.0, 1.0));
    let value = f64::from(value.clamp(0.0, 1.0));

    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = value - chroma;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    Colour::new(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

fn to_channel(component: f64) -> u8 {
    (component * 255.0).round().clamp(0.0, 255.0) as u8
}
