use strum::FromRepr;

/// Layers of the kkb keymap, in priority order: a higher number wins when several are active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Layer {
    /// Windows base layer, selected by the DIP switch
    BaseWindows = 0,
    /// Custom base layer for coding
    BaseCustom = 1,
    /// Standard function layer 1: media and RGB controls
    StdFn1 = 2,
    /// Standard function layer 2: F1-F12
    StdFn2 = 3,
    /// Coding layer 1: brackets and operators
    CustomFn1 = 4,
    /// Coding layer 2: punctuation
    CustomFn2 = 5,
    /// Coding layer 3: build, flash, F-keys
    CustomFn3 = 6,
    /// Coding layer 4: navigation and system access
    CustomFn4 = 7,
    /// System configuration: brightness and bootloader access
    SysConfig = 8,
    /// Bootloader select
    Bootloader = 9,
}

impl Layer {
    pub const COUNT: usize = 10;

    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Layer state as a priority stack.
///
/// The persistent default layer and the transiently held layers are kept as two bitmasks, the
/// highest bit of their union is the current layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    default_layers: u32,
    active_layers: u32,
}

impl LayerState {
    /// Start on the Windows base layer
    pub const fn new() -> Self {
        Self {
            default_layers: 1 << Layer::BaseWindows as u8,
            active_layers: 0,
        }
    }

    /// Highest layer in the union of default and active layers, 0 when nothing is set
    pub fn highest_active_layer(&self) -> u8 {
        let state = self.default_layers | self.active_layers;
        if state == 0 { 0 } else { 31 - state.leading_zeros() as u8 }
    }

    /// The current layer, unknown layer numbers fall back to the Windows base layer
    pub fn current_layer(&self) -> Layer {
        Layer::from_repr(self.highest_active_layer()).unwrap_or(Layer::BaseWindows)
    }

    pub fn is_active(&self, layer: Layer) -> bool {
        (self.default_layers | self.active_layers) & (1 << layer as u8) != 0
    }

    pub fn default_layers(&self) -> u32 {
        self.default_layers
    }

    pub fn active_layers(&self) -> u32 {
        self.active_layers
    }

    /// Replace the persistent default layer
    pub fn set_default_layer(&mut self, layer: Layer) {
        self.default_layers = 1 << layer as u8;
        debug!("Default layer: {:?}", layer);
    }

    pub fn layer_on(&mut self, layer: Layer) {
        self.active_layers |= 1 << layer as u8;
        debug!("Layer on: {:?}, current: {}", layer, self.highest_active_layer());
    }

    pub fn layer_off(&mut self, layer: Layer) {
        self.active_layers &= !(1 << layer as u8);
        debug!("Layer off: {:?}, current: {}", layer, self.highest_active_layer());
    }

    pub fn layer_toggle(&mut self, layer: Layer) {
        self.active_layers ^= 1 << layer as u8;
        debug!("Layer toggle: {:?}, current: {}", layer, self.highest_active_layer());
    }

    /// Drop every held layer and activate only `layer`
    pub fn layer_move(&mut self, layer: Layer) {
        self.active_layers = 1 << layer as u8;
        debug!("Layer move: {:?}", layer);
    }

    /// DIP switch handler. Switch 0 picks the default layer: on is Windows, off is custom.
    pub fn dip_switch_update(&mut self, index: u8, active: bool) {
        if index == 0 {
            let layer = if active { Layer::BaseWindows } else { Layer::BaseCustom };
            info!("DIP switch {} -> {}, default layer {:?}", index, active, layer);
            self.set_default_layer(layer);
        }
    }
}
