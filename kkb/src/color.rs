//! HSV colors and conversion to the RGB triples sent to the LED driver.

use rgb::RGB8;

use crate::config::BrightnessConfig;

/// Hue, saturation, value. All components use the full 0..=255 range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    pub const fn with_value(self, v: u8) -> Self {
        Self { v, ..self }
    }
}

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

pub const HSV_WHITE: Hsv = Hsv::new(0, 0, 255);
pub const HSV_BLUE: Hsv = Hsv::new(170, 255, 255);
pub const HSV_CYAN: Hsv = Hsv::new(128, 255, 255);
pub const HSV_GOLDENROD: Hsv = Hsv::new(30, 218, 218);
pub const HSV_GREEN: Hsv = Hsv::new(85, 255, 255);
pub const HSV_ORANGE: Hsv = Hsv::new(21, 255, 255);
pub const HSV_SPRING_GREEN: Hsv = Hsv::new(106, 255, 255);

/// Hues used by the layer indicators
pub mod palette {
    use super::*;

    /// Caps lock, on every layer
    pub const CAPS: Hsv = HSV_ORANGE;
    /// Flood color of the Windows base layer
    pub const BASE_WINDOWS: Hsv = HSV_GOLDENROD;
    /// Flood color of the custom base layer
    pub const BASE_CUSTOM: Hsv = HSV_BLUE;
    /// Brightness indicator on the number row
    pub const BRIGHTNESS_SCALE: Hsv = HSV_CYAN;
    /// Idle keys on function layers
    pub const FN_INACTIVE: Hsv = HSV_BLUE;
    /// Keys with an action on function layers
    pub const FN_ACTIVE: Hsv = HSV_GREEN;
    /// Transparent keys on function layers
    pub const FN_CONTROLS: Hsv = HSV_SPRING_GREEN;
    /// System keys on the config and bootloader layers
    pub const SYSTEM: Hsv = HSV_WHITE;
}

/// Integer HSV to RGB conversion, six hue regions of ~43 steps each.
pub fn hsv_to_rgb(hsv: Hsv) -> RGB8 {
    if hsv.s == 0 {
        return RGB8::new(hsv.v, hsv.v, hsv.v);
    }

    let h = hsv.h as u16;
    let s = hsv.s as u16;
    let v = hsv.v as u16;

    let region = h * 6 / 255;
    // (2h mod 85) * 3, always fits a u8
    let remainder = (h * 2 - region * 85) * 3;

    let p = ((v * (255 - s)) >> 8) as u8;
    let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;
    let v = v as u8;

    match region {
        0 | 6 => RGB8::new(v, t, p),
        1 => RGB8::new(q, v, p),
        2 => RGB8::new(p, v, t),
        3 => RGB8::new(p, q, v),
        4 => RGB8::new(t, p, v),
        _ => RGB8::new(v, p, q),
    }
}

/// Color of `hsv` at the given brightness.
///
/// A brightness of 0 is off, anything else is clamped into the absolute LED range first.
pub fn create_color(hsv: Hsv, brightness: u8, config: &BrightnessConfig) -> RGB8 {
    if brightness == 0 {
        return OFF;
    }
    let clamped = brightness.max(config.absolute_min).min(config.absolute_max);
    hsv_to_rgb(hsv.with_value(clamped))
}
