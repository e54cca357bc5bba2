use crate::action::KeyAction;
use crate::layer::LayerState;

/// Lookup of the action bound to a key position on a given layer
pub trait Keymap {
    /// Action at (row, col) on `layer`. Positions that don't exist are [`KeyAction::No`].
    fn action_at(&self, layer: u8, row: usize, col: usize) -> KeyAction;
}

/// Keymap represents the stack of layers.
///
/// Keymap should be binded to the actual pcb matrix definition: the tuple `(layer, row, col)`
/// retrieves the action of a physical key.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Layers
    layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
    /// Layer each key was resolved on when it was pressed, so the release hits the same action
    layer_cache: [[u8; COL]; ROW],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    pub fn new(layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER]) -> Self {
        Self {
            layers,
            layer_cache: [[0; COL]; ROW],
        }
    }

    /// Resolve the action of a key event.
    ///
    /// On press, layers are searched from the highest active one downwards, skipping transparent
    /// keys, and the winning layer is cached. On release the cached layer is used, so a key released
    /// after its layer was turned off still releases the action it pressed.
    pub fn resolve(&mut self, state: &LayerState, row: usize, col: usize, pressed: bool) -> KeyAction {
        if row >= ROW || col >= COL {
            return KeyAction::No;
        }

        if !pressed {
            let layer = self.layer_cache[row][col];
            return self.action_at(layer, row, col);
        }

        let active = state.default_layers() | state.active_layers();
        let top = state.highest_active_layer();
        for layer in (0..=top).rev() {
            if active & (1 << layer) == 0 {
                continue;
            }
            let action = self.action_at(layer, row, col);
            if action != KeyAction::Transparent {
                self.layer_cache[row][col] = layer;
                return action;
            }
        }
        self.layer_cache[row][col] = 0;
        KeyAction::No
    }
}

impl<const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keymap for KeyMap<'_, ROW, COL, NUM_LAYER> {
    fn action_at(&self, layer: u8, row: usize, col: usize) -> KeyAction {
        self.layers
            .get(layer as usize)
            .and_then(|l| l.get(row))
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(KeyAction::No)
    }
}

impl<K: Keymap> Keymap for &K {
    fn action_at(&self, layer: u8, row: usize, col: usize) -> KeyAction {
        (**self).action_at(layer, row, col)
    }
}
