use crate::config::BrightnessConfig;
use crate::storage::BrightnessStorage;

/// Direction of a brightness key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Increase,
    Decrease,
}

/// `value` shifted by `offset` and clamped into the absolute LED range.
///
/// Only a sum of exactly 0 stays 0 (off). A sum below zero is still a lit LED at `absolute_min`.
pub const fn offset_brightness(value: u8, offset: i8, config: &BrightnessConfig) -> u8 {
    let shifted = value as i16 + offset as i16;
    if shifted == 0 {
        0
    } else if shifted < config.absolute_min as i16 {
        config.absolute_min
    } else if shifted > config.absolute_max as i16 {
        config.absolute_max
    } else {
        shifted as u8
    }
}

/// Owner of the global brightness level.
///
/// The value is loaded once at startup and written back every time it actually changes. A held
/// brightness key triggers a single adjustment: each direction is latched on press and released on
/// key up, so auto-repeat doesn't hammer the storage.
pub struct BrightnessController<S: BrightnessStorage> {
    config: BrightnessConfig,
    /// Current main brightness
    value: u8,
    storage: S,
    increase_latched: bool,
    decrease_latched: bool,
}

impl<S: BrightnessStorage> BrightnessController<S> {
    /// Create a controller at the startup default, call [`Self::load`] to restore the persisted value.
    pub fn new(config: BrightnessConfig, storage: S) -> Self {
        Self {
            value: config.startup_default(),
            config,
            storage,
            increase_latched: false,
            decrease_latched: false,
        }
    }

    pub fn config(&self) -> &BrightnessConfig {
        &self.config
    }

    /// Current main brightness
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the persisted brightness, falling back to the startup default if it's unusable.
    pub fn load(&mut self) -> u8 {
        let raw = match self.storage.read_brightness() {
            Ok(raw) => raw,
            Err(_) => {
                warn!("Failed to read brightness from storage, using default");
                0
            }
        };
        self.value = self.load_or_default(raw);
        info!("Brightness loaded: {}", self.value);
        self.value
    }

    /// Validate a raw persisted word.
    ///
    /// The brightness lives in the low byte and is only ever written with the upper bytes clear, so
    /// a word outside the absolute range is uninitialized or corrupted storage and is replaced by the
    /// startup default.
    pub fn load_or_default(&self, raw: u32) -> u8 {
        let min = self.config.absolute_min as u32;
        let max = self.config.absolute_max as u32;
        if raw < min || raw > max {
            let default = self.config.startup_default();
            warn!("Persisted brightness {} out of range, using {}", raw, default);
            default
        } else {
            raw as u8
        }
    }

    /// Change the brightness by `delta`, clamped to the main range.
    ///
    /// The new value is persisted only if it differs from the current one. Returns whether it did.
    pub fn adjust(&mut self, delta: i16) -> bool {
        // min/max instead of clamp, a degenerate range must not panic
        let target = (self.value as i16)
            .saturating_add(delta)
            .max(self.config.main_min() as i16)
            .min(self.config.main_max() as i16) as u8;
        if target == self.value {
            return false;
        }

        self.value = target;
        debug!("Brightness set to {}", target);
        if self.storage.write_brightness(target as u32).is_err() {
            error!("Failed to persist brightness {}", target);
        }
        true
    }

    /// Percent of `value` inside the main range, saturating at both ends
    pub fn percent_of(&self, value: u8) -> u8 {
        let min = self.config.main_min();
        let max = self.config.main_max();
        if max <= min {
            return 0;
        }
        let range = (max - min) as u16;
        let position = value.saturating_sub(min).min(max - min) as u16;
        (position * 100 / range) as u8
    }

    /// Current brightness as 0..=100 percent of the main range
    pub fn current_percent(&self) -> u8 {
        self.percent_of(self.value)
    }

    /// Main brightness shifted by `offset`, see [`offset_brightness`]
    pub fn with_offset(&self, offset: i8) -> u8 {
        offset_brightness(self.value, offset, &self.config)
    }

    /// Handle a brightness key event, returns whether the event is consumed (always).
    ///
    /// Only the first press of a direction adjusts, repeats while latched are ignored until release.
    pub fn on_key_event(&mut self, direction: Direction, pressed: bool) -> bool {
        let step = self.config.step() as i16;
        let (latched, delta) = match direction {
            Direction::Increase => (&mut self.increase_latched, step),
            Direction::Decrease => (&mut self.decrease_latched, -step),
        };

        let trigger = pressed && !*latched;
        *latched = pressed;
        if trigger {
            self.adjust(delta);
        }
        true
    }
}
