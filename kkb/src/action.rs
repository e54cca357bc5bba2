use crate::brightness::Direction;
use crate::keycode::KeyCode;
use crate::layer::Layer;
use crate::shortcut::Shortcut;

/// A KeyAction is the action at a keyboard position, stored in keymap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Explicitly inert position
    #[default]
    No,
    /// Transparent action, next layer will be checked
    Transparent,
    /// Plain key, handled by the host
    Key(KeyCode),
    /// Activate a layer while held
    LayerOn(Layer),
    /// Toggle a layer on press
    LayerToggle(Layer),
    /// Switch to a layer on press, dropping the other held layers
    LayerTo(Layer),
    /// Change the indicator brightness
    Brightness(Direction),
    /// Windows key combination
    Shortcut(Shortcut),
    /// Jump to the bootloader
    Bootloader,
}

/// How a key is rendered on layers that highlight keys
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyClass {
    /// The key does something on this layer
    Active,
    /// The key falls through to a lower layer
    Transparent,
    /// The key does nothing
    Blank,
}

impl KeyAction {
    pub fn class(&self) -> KeyClass {
        match self {
            KeyAction::No => KeyClass::Blank,
            KeyAction::Transparent => KeyClass::Transparent,
            _ => KeyClass::Active,
        }
    }
}
