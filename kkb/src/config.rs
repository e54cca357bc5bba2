//! Tunable configurations of the kkb firmware core.

/// Brightness limits and offsets.
///
/// The main brightness is kept inside `[main_min, main_max]`, which is narrower than the absolute
/// LED range: layer highlights add `active_offset` or `off_offset` to the main brightness and the
/// result must still be inside `[absolute_min, absolute_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BrightnessConfig {
    /// Absolute lower limit of any LED value
    pub absolute_min: u8,
    /// Absolute upper limit of any LED value
    pub absolute_max: u8,
    /// Offset of the caps-lock color on base layers
    pub caps_offset: i8,
    /// Offset of highlighted keys on function layers
    pub active_offset: i8,
    /// Offset of idle keys on function layers
    pub off_offset: i8,
    /// Amount changed by one brightness key press
    pub step: u8,
    /// Startup brightness, in percent of the main range, used when nothing valid is persisted
    pub startup_percent: u8,
    /// Percent represented by one lit key of the brightness indicator
    pub indicator_step_percent: u8,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self::new()
    }
}

const fn abs_i8(v: i8) -> u8 {
    v.unsigned_abs()
}

const fn max_u8(a: u8, b: u8) -> u8 {
    if a > b { a } else { b }
}

impl BrightnessConfig {
    pub const fn new() -> Self {
        Self {
            absolute_min: 10,
            absolute_max: 255,
            caps_offset: -20,
            active_offset: 40,
            off_offset: -60,
            step: 5,
            startup_percent: 80,
            indicator_step_percent: 10,
        }
    }

    /// Lower limit of the main brightness
    pub const fn main_min(&self) -> u8 {
        max_u8(self.absolute_min, abs_i8(self.off_offset))
    }

    /// Upper limit of the main brightness
    pub const fn main_max(&self) -> u8 {
        if self.active_offset > 0 {
            self.absolute_max.saturating_sub(self.active_offset as u8)
        } else {
            self.absolute_max
        }
    }

    /// Adjustment step, never zero
    pub const fn step(&self) -> u8 {
        if self.step == 0 { 1 } else { self.step }
    }

    /// Brightness used on first boot or after storage corruption.
    ///
    /// `startup_percent` of the main range, counted in whole steps and rounded up to a step multiple.
    pub const fn startup_default(&self) -> u8 {
        let min = self.main_min() as u32;
        let max = self.main_max() as u32;
        let step = self.step() as u32;
        if max <= min {
            return min as u8;
        }
        let span_steps = (max - min) / step;
        let raw = min + (self.startup_percent as u32 * span_steps) / 100 * step;
        let rounded = raw.div_ceil(step) * step;
        if rounded > max {
            max as u8
        } else if rounded < min {
            min as u8
        } else {
            rounded as u8
        }
    }
}

/// Brightness indicator on the number row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    /// LED index of the first indicator key
    pub num_row_start: u8,
    /// Number of indicator keys
    pub num_row_count: u8,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            num_row_start: 1,
            num_row_count: 10,
        }
    }
}
