//! LED geometry types shared by the indicator engine and the board definition.

/// LED is under a modifier key
pub const LED_FLAG_MODIFIER: u8 = 0x01;
/// LED lights a regular key
pub const LED_FLAG_KEYLIGHT: u8 = 0x04;

/// Address of an SNLED27351 channel: cathode bus `cb`, anode `ca`.
///
/// Both are 1-based as in the datasheet's `CBx_CAy` names and must be at least 1.
pub(crate) const fn snled_channel(cb: u8, ca: u8) -> u8 {
    (cb - 1) * 16 + (ca - 1)
}

/// Where an RGB LED is wired: driver chip and the channel of each color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedPosition {
    pub driver: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LedPosition {
    pub const fn new(driver: u8, r: u8, g: u8, b: u8) -> Self {
        Self { driver, r, g, b }
    }
}

/// Mapping between matrix positions and LED indices, plus per-LED flags.
#[derive(Clone, Copy, Debug)]
pub struct LedConfig<const ROW: usize, const COL: usize> {
    /// LED index under each matrix position, `None` where there is no key
    pub matrix_co: [[Option<u8>; COL]; ROW],
    /// `LED_FLAG_*` bits of each LED
    pub flags: &'static [u8],
}

impl<const ROW: usize, const COL: usize> LedConfig<ROW, COL> {
    pub fn led_at(&self, row: usize, col: usize) -> Option<u8> {
        self.matrix_co.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn led_count(&self) -> usize {
        self.flags.len()
    }

    /// Whether the LED lights a key that follows the caps-lock color on base layers
    pub fn is_keylight(&self, index: u8) -> bool {
        self.flags
            .get(index as usize)
            .is_some_and(|f| f & LED_FLAG_KEYLIGHT != 0)
    }

    /// Matrix positions with an LED inside `[led_min, led_max)`, as `(row, col, led)`
    pub fn keys_in_range(&self, led_min: u8, led_max: u8) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.matrix_co.iter().enumerate().flat_map(move |(row, cols)| {
            cols.iter().enumerate().filter_map(move |(col, led)| match led {
                Some(led) if *led >= led_min && *led < led_max => Some((row, col, *led)),
                _ => None,
            })
        })
    }
}
