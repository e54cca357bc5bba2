use crate::action::KeyAction;
use crate::brightness::{BrightnessController, Direction};
use crate::config::{BrightnessConfig, IndicatorConfig};
use crate::indicator::{LayerColors, LayerHandler, RgbBackend};
use crate::keymap::KeyMap;
use crate::layer::{Layer, LayerState};
use crate::led::LedConfig;
use crate::led_indicator::LedIndicator;
use crate::shortcut::KeyReporter;
use crate::storage::BrightnessStorage;

/// Keyboard core: layer state, brightness and indicator rendering, driven by the host.
///
/// The host calls [`Kkb::post_init`] once, feeds key events to [`Kkb::process_key`] and asks for
/// LED colors with [`Kkb::render_indicators`] every rendering tick.
pub struct Kkb<'a, S: BrightnessStorage, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,
    layer_state: LayerState,
    brightness: BrightnessController<S>,
    led_config: LedConfig<ROW, COL>,
    indicator_config: IndicatorConfig,
    /// Lock LEDs of the host
    led_indicator: LedIndicator,
}

impl<'a, S: BrightnessStorage, const ROW: usize, const COL: usize, const NUM_LAYER: usize>
    Kkb<'a, S, ROW, COL, NUM_LAYER>
{
    pub fn new(
        layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
        led_config: LedConfig<ROW, COL>,
        storage: S,
    ) -> Self {
        Self::with_config(
            layers,
            led_config,
            storage,
            BrightnessConfig::default(),
            IndicatorConfig::default(),
        )
    }

    pub fn with_config(
        layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
        led_config: LedConfig<ROW, COL>,
        storage: S,
        brightness_config: BrightnessConfig,
        indicator_config: IndicatorConfig,
    ) -> Self {
        Self {
            keymap: KeyMap::new(layers),
            layer_state: LayerState::new(),
            brightness: BrightnessController::new(brightness_config, storage),
            led_config,
            indicator_config,
            led_indicator: LedIndicator::new(),
        }
    }

    /// Restore the persisted brightness
    pub fn post_init(&mut self) {
        self.brightness.load();
    }

    pub fn layer_state(&self) -> &LayerState {
        &self.layer_state
    }

    pub fn layer_state_mut(&mut self) -> &mut LayerState {
        &mut self.layer_state
    }

    pub fn brightness(&self) -> &BrightnessController<S> {
        &self.brightness
    }

    pub fn keymap(&self) -> &KeyMap<'a, ROW, COL, NUM_LAYER> {
        &self.keymap
    }

    pub fn led_indicator(&self) -> LedIndicator {
        self.led_indicator
    }

    /// Update the lock LEDs reported by the host
    pub fn set_led_indicator(&mut self, led_indicator: LedIndicator) {
        if led_indicator != self.led_indicator {
            debug!("Host LED state: {:?}", led_indicator.into_bits());
        }
        self.led_indicator = led_indicator;
    }

    pub fn dip_switch_update(&mut self, index: u8, active: bool) {
        self.layer_state.dip_switch_update(index, active);
    }

    /// Brightness key event, always consumed
    pub fn on_brightness_key_event(&mut self, direction: Direction, pressed: bool) -> bool {
        self.brightness.on_key_event(direction, pressed)
    }

    /// Paint LEDs `[led_min, led_max)` for the current layer. Returns true: the host must not
    /// render anything on top.
    pub fn render_indicators<B: RgbBackend>(&self, led_min: u8, led_max: u8, backend: &mut B) -> bool {
        let layer = self.layer_state.highest_active_layer();
        let colors = LayerColors {
            keymap: &self.keymap,
            leds: &self.led_config,
            brightness_config: self.brightness.config(),
            indicator_config: &self.indicator_config,
            brightness: self.brightness.value(),
            brightness_percent: self.brightness.current_percent(),
            caps_lock: self.led_indicator.caps_lock(),
        };
        LayerHandler::for_layer(layer).draw(&colors, layer, led_min, led_max, backend);
        true
    }

    /// Resolve a matrix event through the keymap and process it.
    ///
    /// Returns the action when the host has to handle it, `None` when it was consumed here.
    pub fn process_key<R: KeyReporter>(
        &mut self,
        row: usize,
        col: usize,
        pressed: bool,
        reporter: &mut R,
    ) -> Option<KeyAction> {
        let action = self.keymap.resolve(&self.layer_state, row, col, pressed);
        if self.process_action(action, pressed, reporter) {
            None
        } else {
            Some(action)
        }
    }

    /// Process an action, returns whether it was consumed.
    pub fn process_action<R: KeyReporter>(&mut self, action: KeyAction, pressed: bool, reporter: &mut R) -> bool {
        match action {
            KeyAction::Shortcut(shortcut) => {
                shortcut.process(pressed, reporter);
                true
            }
            KeyAction::Brightness(direction) => {
                if self.layer_state.highest_active_layer() >= Layer::BaseCustom.index() {
                    self.on_brightness_key_event(direction, pressed)
                } else {
                    if !pressed {
                        // Key pressed on a layer that is gone by now, drop the latch anyway
                        self.brightness.on_key_event(direction, false);
                    }
                    false
                }
            }
            KeyAction::LayerOn(layer) => {
                if pressed {
                    self.layer_state.layer_on(layer);
                } else {
                    self.layer_state.layer_off(layer);
                }
                true
            }
            KeyAction::LayerToggle(layer) => {
                if pressed {
                    self.layer_state.layer_toggle(layer);
                }
                true
            }
            KeyAction::LayerTo(layer) => {
                if pressed {
                    self.layer_state.layer_move(layer);
                }
                true
            }
            KeyAction::No | KeyAction::Transparent | KeyAction::Key(_) | KeyAction::Bootloader => false,
        }
    }
}
