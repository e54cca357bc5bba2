//! Per-key RGB indicators.
//!
//! Every rendering tick the host asks for the colors of a range of LEDs. The current layer picks
//! a [`LayerHandler`], which paints the range through an [`RgbBackend`] using [`LayerColors`].

use rgb::RGB8;

use crate::action::{KeyAction, KeyClass};
use crate::brightness::offset_brightness;
use crate::color::{Hsv, OFF, create_color, palette};
use crate::config::{BrightnessConfig, IndicatorConfig};
use crate::keycode::KeyCode;
use crate::keymap::Keymap;
use crate::layer::Layer;
use crate::led::LedConfig;

/// Sink of LED colors, usually the RGB matrix driver of the host
pub trait RgbBackend {
    fn set_led_color(&mut self, index: u8, color: RGB8);
}

impl<B: RgbBackend> RgbBackend for &mut B {
    fn set_led_color(&mut self, index: u8, color: RGB8) {
        (**self).set_led_color(index, color)
    }
}

/// Everything a layer handler reads to pick colors, borrowed for a single tick.
pub struct LayerColors<'a, K: Keymap, const ROW: usize, const COL: usize> {
    pub keymap: &'a K,
    pub leds: &'a LedConfig<ROW, COL>,
    pub brightness_config: &'a BrightnessConfig,
    pub indicator_config: &'a IndicatorConfig,
    /// Main brightness
    pub brightness: u8,
    /// Main brightness in percent of its range
    pub brightness_percent: u8,
    pub caps_lock: bool,
}

impl<K: Keymap, const ROW: usize, const COL: usize> LayerColors<'_, K, ROW, COL> {
    fn at_offset(&self, hsv: Hsv, offset: i8) -> RGB8 {
        create_color(hsv, offset_brightness(self.brightness, offset, self.brightness_config), self.brightness_config)
    }

    fn at_max(&self, hsv: Hsv) -> RGB8 {
        create_color(hsv, self.brightness_config.absolute_max, self.brightness_config)
    }

    /// Flood `[led_min, led_max)` with `base` at main brightness.
    ///
    /// While caps lock is on, keylight LEDs take the caps color, dimmed by the caps offset.
    pub fn base_layer<B: RgbBackend>(&self, led_min: u8, led_max: u8, base: Hsv, backend: &mut B) {
        let color = self.at_offset(base, 0);
        let caps = self.at_offset(palette::CAPS, self.brightness_config.caps_offset);
        for index in led_min..led_max {
            if self.caps_lock && self.leds.is_keylight(index) {
                backend.set_led_color(index, caps);
            } else {
                backend.set_led_color(index, color);
            }
        }
    }

    /// Color every key of `layer` in range by what it does on that layer.
    ///
    /// With `blank_off`, keys without an action are turned off instead of dimmed.
    pub fn layer_key_colors<B: RgbBackend>(&self, led_min: u8, led_max: u8, layer: u8, blank_off: bool, backend: &mut B) {
        let config = self.brightness_config;
        let active = self.at_offset(palette::FN_ACTIVE, config.active_offset);
        let controls = self.at_offset(palette::FN_CONTROLS, config.active_offset);
        let (inactive, caps_dim) = if blank_off {
            (OFF, OFF)
        } else {
            (
                self.at_offset(palette::FN_INACTIVE, config.off_offset),
                self.at_offset(palette::CAPS, config.off_offset),
            )
        };

        for (row, col, index) in self.leds.keys_in_range(led_min, led_max) {
            let color = match self.keymap.action_at(layer, row, col).class() {
                KeyClass::Active => active,
                KeyClass::Transparent => controls,
                KeyClass::Blank if self.caps_lock => caps_dim,
                KeyClass::Blank => inactive,
            };
            backend.set_led_color(index, color);
        }
    }

    /// Light one number-row key per `indicator_step_percent` of brightness
    pub fn brightness_indicator<B: RgbBackend>(&self, led_min: u8, led_max: u8, backend: &mut B) {
        let step = self.brightness_config.indicator_step_percent.max(1);
        let lit = self.brightness_percent / step;
        let color = self.at_offset(palette::BRIGHTNESS_SCALE, self.brightness_config.active_offset);

        let start = self.indicator_config.num_row_start;
        for i in 0..self.indicator_config.num_row_count.min(lit) {
            let index = start.saturating_add(i);
            if index >= led_min && index < led_max {
                backend.set_led_color(index, color);
            }
        }
    }

    /// System configuration layer: key colors, brightness scale, then the bootloader layer key and
    /// the caps lock key at full brightness.
    pub fn system_config_layer<B: RgbBackend>(&self, led_min: u8, led_max: u8, layer: u8, backend: &mut B) {
        self.layer_key_colors(led_min, led_max, layer, true, backend);
        self.brightness_indicator(led_min, led_max, backend);

        let system = self.at_max(palette::SYSTEM);
        let caps = self.at_max(palette::CAPS);
        for (row, col, index) in self.leds.keys_in_range(led_min, led_max) {
            match self.keymap.action_at(layer, row, col) {
                KeyAction::LayerOn(Layer::Bootloader) => backend.set_led_color(index, system),
                KeyAction::Key(KeyCode::CAPS_LOCK) if self.caps_lock => backend.set_led_color(index, caps),
                _ => {}
            }
        }
    }

    /// Bootloader layer: every key that does something is white at full brightness
    pub fn bootloader_layer<B: RgbBackend>(&self, led_min: u8, led_max: u8, layer: u8, backend: &mut B) {
        self.layer_key_colors(led_min, led_max, layer, true, backend);

        let system = self.at_max(palette::SYSTEM);
        for (row, col, index) in self.leds.keys_in_range(led_min, led_max) {
            if self.keymap.action_at(layer, row, col).class() == KeyClass::Active {
                backend.set_led_color(index, system);
            }
        }
    }
}

/// Rendering strategy of a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerHandler {
    /// Single color flood
    Base(Hsv),
    /// Per-key highlight, idle keys dimmed
    Function,
    SystemConfig,
    Bootloader,
}

impl LayerHandler {
    /// Handler of a layer number. Unknown layers render like the Windows base layer.
    pub fn for_layer(layer: u8) -> Self {
        match Layer::from_repr(layer) {
            Some(Layer::BaseWindows) | None => LayerHandler::Base(palette::BASE_WINDOWS),
            Some(Layer::BaseCustom) => LayerHandler::Base(palette::BASE_CUSTOM),
            Some(Layer::SysConfig) => LayerHandler::SystemConfig,
            Some(Layer::Bootloader) => LayerHandler::Bootloader,
            Some(_) => LayerHandler::Function,
        }
    }

    pub fn draw<K: Keymap, B: RgbBackend, const ROW: usize, const COL: usize>(
        self,
        colors: &LayerColors<'_, K, ROW, COL>,
        layer: u8,
        led_min: u8,
        led_max: u8,
        backend: &mut B,
    ) {
        match self {
            LayerHandler::Base(hsv) => colors.base_layer(led_min, led_max, hsv, backend),
            LayerHandler::Function => colors.layer_key_colors(led_min, led_max, layer, false, backend),
            LayerHandler::SystemConfig => colors.system_config_layer(led_min, led_max, layer, backend),
            LayerHandler::Bootloader => colors.bootloader_layer(led_min, led_max, layer, backend),
        }
    }
}
