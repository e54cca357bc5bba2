//! Board definition of the kkb 69-key ISO keyboard.
//!
//! Matrix of 5 rows by 15 columns. Column 0 is wired to a GPIO, columns 1..=14 to outputs 0..=13
//! of a pair of cascaded 74HC595. Every key carries an RGB LED on one of two SNLED27351 drivers.

use crate::driver::FlexPin;
use crate::layer::Layer;
use crate::led::{LED_FLAG_KEYLIGHT, LED_FLAG_MODIFIER, LedConfig, LedPosition, snled_channel};
use crate::matrix::ColumnPin;

pub const ROW: usize = 5;
pub const COL: usize = 15;
pub const NUM_LAYER: usize = Layer::COUNT;
pub const LED_COUNT: usize = 69;

/// LED of the caps-lock key
pub const CAPS_LOCK_LED: u8 = 29;

/// Keys present in each matrix row, bit n is column n
const ROW_KEYS: [u16; ROW] = [0x7FFF, 0x5FFF, 0x7FFF, 0x7FFF, 0x7E47];

/// LEDs under modifier keys of the bottom row
const MODIFIER_LEDS: [u8; 6] = [59, 60, 61, 63, 64, 65];

const fn pos(driver: u8, r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> LedPosition {
    LedPosition::new(
        driver,
        snled_channel(r.0, r.1),
        snled_channel(g.0, g.1),
        snled_channel(b.0, b.1),
    )
}

/// Driver channels of every LED, indexed by LED number
pub static LED_POSITIONS: [LedPosition; LED_COUNT] = [
    // Row 0
    pos(0, (6, 1), (4, 1), (5, 1)),
    pos(0, (6, 2), (4, 2), (5, 2)),
    pos(0, (6, 3), (4, 3), (5, 3)),
    pos(0, (6, 4), (4, 4), (5, 4)),
    pos(0, (6, 5), (4, 5), (5, 5)),
    pos(0, (6, 6), (4, 6), (5, 6)),
    pos(0, (6, 7), (4, 7), (5, 7)),
    pos(0, (6, 8), (4, 8), (5, 8)),
    pos(0, (6, 9), (4, 9), (5, 9)),
    pos(0, (6, 10), (4, 10), (5, 10)),
    pos(0, (6, 11), (4, 11), (5, 11)),
    pos(0, (6, 12), (4, 12), (5, 12)),
    pos(0, (6, 13), (4, 13), (5, 13)),
    pos(0, (6, 14), (4, 14), (5, 14)),
    pos(0, (6, 16), (4, 16), (5, 16)),

    // Row 1
    pos(0, (1, 1), (3, 1), (2, 1)),
    pos(0, (1, 2), (3, 2), (2, 2)),
    pos(0, (1, 3), (3, 3), (2, 3)),
    pos(0, (1, 4), (3, 4), (2, 4)),
    pos(0, (1, 5), (3, 5), (2, 5)),
    pos(0, (1, 6), (3, 6), (2, 6)),
    pos(0, (1, 7), (3, 7), (2, 7)),
    pos(0, (1, 8), (3, 8), (2, 8)),
    pos(0, (1, 9), (3, 9), (2, 9)),
    pos(0, (1, 10), (3, 10), (2, 10)),
    pos(0, (1, 11), (3, 11), (2, 11)),
    pos(0, (1, 12), (3, 12), (2, 12)),
    pos(0, (1, 13), (3, 13), (2, 13)),
    pos(0, (1, 16), (3, 16), (2, 16)),

    // Row 2
    pos(1, (9, 1), (7, 1), (8, 1)),
    pos(1, (9, 2), (7, 2), (8, 2)),
    pos(1, (9, 3), (7, 3), (8, 3)),
    pos(1, (9, 4), (7, 4), (8, 4)),
    pos(1, (9, 5), (7, 5), (8, 5)),
    pos(1, (9, 6), (7, 6), (8, 6)),
    pos(1, (9, 7), (7, 7), (8, 7)),
    pos(1, (9, 8), (7, 8), (8, 8)),
    pos(1, (9, 9), (7, 9), (8, 9)),
    pos(1, (9, 10), (7, 10), (8, 10)),
    pos(1, (9, 11), (7, 11), (8, 11)),
    pos(1, (9, 12), (7, 12), (8, 12)),
    pos(1, (9, 14), (7, 14), (8, 14)),
    pos(0, (1, 14), (3, 14), (2, 14)),
    pos(1, (9, 16), (7, 16), (8, 16)),

    // Row 3
    pos(1, (3, 1), (1, 1), (2, 1)),
    pos(1, (3, 2), (1, 2), (2, 2)),
    pos(1, (3, 3), (1, 3), (2, 3)),
    pos(1, (3, 4), (1, 4), (2, 4)),
    pos(1, (3, 5), (1, 5), (2, 5)),
    pos(1, (3, 6), (1, 6), (2, 6)),
    pos(1, (3, 7), (1, 7), (2, 7)),
    pos(1, (3, 8), (1, 8), (2, 8)),
    pos(1, (3, 9), (1, 9), (2, 9)),
    pos(1, (3, 10), (1, 10), (2, 10)),
    pos(1, (3, 11), (1, 11), (2, 11)),
    pos(1, (3, 12), (1, 12), (2, 12)),
    pos(1, (3, 14), (1, 14), (2, 14)),
    pos(1, (3, 15), (1, 15), (2, 15)),
    pos(1, (3, 16), (1, 16), (2, 16)),

    // Row 4
    pos(1, (6, 1), (4, 1), (5, 1)),
    pos(1, (6, 2), (4, 2), (5, 2)),
    pos(1, (6, 3), (4, 3), (5, 3)),
    pos(1, (6, 7), (4, 7), (5, 7)),
    pos(1, (6, 11), (4, 11), (5, 11)),
    pos(1, (6, 12), (4, 12), (5, 12)),
    pos(1, (6, 13), (4, 13), (5, 13)),
    pos(1, (6, 14), (4, 14), (5, 14)),
    pos(1, (6, 15), (4, 15), (5, 15)),
    pos(1, (6, 16), (4, 16), (5, 16)),
];

const fn build_matrix_co() -> [[Option<u8>; COL]; ROW] {
    let mut co = [[None; COL]; ROW];
    let mut led = 0u8;
    let mut row = 0;
    while row < ROW {
        let mut col = 0;
        while col < COL {
            if ROW_KEYS[row] & (1 << col) != 0 {
                co[row][col] = Some(led);
                led += 1;
            }
            col += 1;
        }
        row += 1;
    }
    co
}

const fn build_flags() -> [u8; LED_COUNT] {
    let mut flags = [LED_FLAG_KEYLIGHT; LED_COUNT];
    let mut i = 0;
    while i < MODIFIER_LEDS.len() {
        flags[MODIFIER_LEDS[i] as usize] = LED_FLAG_MODIFIER;
        i += 1;
    }
    flags
}

const LED_FLAGS: [u8; LED_COUNT] = build_flags();

/// Matrix to LED mapping of the board
pub const LED_CONFIG: LedConfig<ROW, COL> = LedConfig {
    matrix_co: build_matrix_co(),
    flags: &LED_FLAGS,
};

/// Column topology of the board: column 0 on `col0`, the others on shift register outputs.
pub fn column_topology<P: FlexPin>(col0: Option<P>) -> [ColumnPin<P>; COL] {
    let mut col0 = col0;
    core::array::from_fn(|col| {
        if col == 0 {
            ColumnPin::Direct(col0.take())
        } else {
            ColumnPin::Shifted((col - 1) as u8)
        }
    })
}
