use embassy_time::Delay;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::driver::flex_pin::{FlexPin, drive_low_atomic, release_atomic};
use crate::driver::shift_register::{ALL_HIGH, ShiftRegister};

/// Default settle time between selecting a column and sampling the rows, in microseconds
pub const SETTLE_TIME_US: u32 = 1;

/// Raw key state of the whole matrix, one bit per (row, col). `true` means pressed.
///
/// This is the undebounced state, it should go through a debouncer before it's treated as
/// authoritative.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixState<const ROW: usize, const COL: usize> {
    rows: [u32; ROW],
}

impl<const ROW: usize, const COL: usize> Default for MatrixState<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> MatrixState<ROW, COL> {
    pub const fn new() -> Self {
        const { assert!(COL <= 32, "a matrix row is stored in a u32") };
        Self { rows: [0; ROW] }
    }

    pub fn is_pressed(&self, row: usize, col: usize) -> bool {
        row < ROW && col < COL && self.rows[row] & (1 << col) != 0
    }

    /// Set the bit of (row, col), returns true if it changed
    pub fn update(&mut self, row: usize, col: usize, pressed: bool) -> bool {
        if row >= ROW || col >= COL {
            return false;
        }
        let old = self.rows[row];
        if pressed {
            self.rows[row] |= 1 << col;
        } else {
            self.rows[row] &= !(1 << col);
        }
        self.rows[row] != old
    }

    /// Bits of a row, bit `n` is column `n`
    pub fn row_bits(&self, row: usize) -> u32 {
        self.rows.get(row).copied().unwrap_or(0)
    }

    pub fn rows(&self) -> &[u32; ROW] {
        &self.rows
    }

    /// Number of keys currently pressed
    pub fn pressed_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }
}

/// How a column is activated.
///
/// Fixed when the topology is built and never changed afterwards.
pub enum ColumnPin<P: FlexPin> {
    /// Column driven by a GPIO. `None` is a column position without a wire.
    Direct(Option<P>),
    /// Column driven by the given output bit of the shift register
    Shifted(u8),
}

/// Activates one column at a time, over GPIO columns and shift register columns.
///
/// Active columns are driven low, inactive ones are left high (GPIO released to its pull-up,
/// register output high).
pub struct ColumnSelector<C, DS, SHCP, STCP, const COL: usize>
where
    C: FlexPin,
    DS: OutputPin,
    SHCP: OutputPin,
    STCP: OutputPin,
{
    columns: [ColumnPin<C>; COL],
    shift_register: ShiftRegister<DS, SHCP, STCP>,
    /// Index of the last shifted column in sweep order
    last_shifted: Option<usize>,
}

impl<C, DS, SHCP, STCP, const COL: usize> ColumnSelector<C, DS, SHCP, STCP, COL>
where
    C: FlexPin,
    DS: OutputPin,
    SHCP: OutputPin,
    STCP: OutputPin,
{
    pub fn new(columns: [ColumnPin<C>; COL], shift_register: ShiftRegister<DS, SHCP, STCP>) -> Self {
        for column in columns.iter() {
            if let ColumnPin::Shifted(bit) = column {
                debug_assert!(*bit < 16, "shift register has 16 outputs");
            }
        }
        let last_shifted = columns.iter().rposition(|c| matches!(c, ColumnPin::Shifted(_)));
        Self {
            columns,
            shift_register,
            last_shifted,
        }
    }

    /// Activate a column. Returns whether anything was driven.
    pub fn select(&mut self, col: usize) -> bool {
        match self.columns.get_mut(col) {
            Some(ColumnPin::Direct(Some(pin))) => {
                drive_low_atomic(pin);
                true
            }
            Some(ColumnPin::Shifted(bit)) => {
                // Exactly one output low, the rest stay deselected
                let pattern = !(1u16 << *bit);
                self.shift_register.shift(pattern);
                true
            }
            Some(ColumnPin::Direct(None)) | None => false,
        }
    }

    /// Deactivate a column.
    ///
    /// Shifted columns are not cleared one by one: selecting the next shifted column already
    /// replaces the pattern, so the register is only reset to all-high after the last shifted
    /// column. This relies on the sweep visiting columns in ascending order without exiting early.
    pub fn deselect(&mut self, col: usize) {
        let last_shifted = self.last_shifted;
        match self.columns.get_mut(col) {
            Some(ColumnPin::Direct(Some(pin))) => release_atomic(pin),
            Some(ColumnPin::Shifted(_)) if Some(col) == last_shifted => self.shift_register.shift(ALL_HIGH),
            _ => {}
        }
    }

    /// Put every column back to the not-selected state
    pub fn deselect_all(&mut self) {
        for column in self.columns.iter_mut() {
            if let ColumnPin::Direct(Some(pin)) = column {
                release_atomic(pin);
            }
        }
        self.shift_register.shift(ALL_HIGH);
    }

    /// Pattern currently latched in the shift register
    pub fn shift_register_outputs(&self) -> u16 {
        self.shift_register.latched()
    }
}

/// Matrix scanner for a col2row matrix with pulled-up rows.
///
/// A pressed key connects the selected (low) column to its row, so a row reading low means pressed.
/// Row positions without a pin always read as released.
pub struct Matrix<R, C, DS, SHCP, STCP, const ROW: usize, const COL: usize, D = Delay>
where
    R: FlexPin,
    C: FlexPin,
    DS: OutputPin,
    SHCP: OutputPin,
    STCP: OutputPin,
    D: DelayNs,
{
    /// Row pins, sampled while a column is selected
    rows: [Option<R>; ROW],
    /// Column activation
    selector: ColumnSelector<C, DS, SHCP, STCP, COL>,
    /// Busy-wait delay used for the settle time
    delay: D,
    settle_us: u32,
}

impl<R, C, DS, SHCP, STCP, const ROW: usize, const COL: usize, D> Matrix<R, C, DS, SHCP, STCP, ROW, COL, D>
where
    R: FlexPin,
    C: FlexPin,
    DS: OutputPin,
    SHCP: OutputPin,
    STCP: OutputPin,
    D: DelayNs,
{
    /// Create a matrix from row pins, column topology and a delay provider.
    pub fn new(rows: [Option<R>; ROW], selector: ColumnSelector<C, DS, SHCP, STCP, COL>, delay: D) -> Self {
        const { assert!(COL <= 32, "a matrix row is stored in a u32") };
        Self {
            rows,
            selector,
            delay,
            settle_us: SETTLE_TIME_US,
        }
    }

    /// Override the settle time between column selection and row sampling
    pub fn with_settle_time(mut self, settle_us: u32) -> Self {
        self.settle_us = settle_us;
        self
    }

    /// Configure rows as pulled-up inputs and deselect every column.
    pub fn init(&mut self) {
        for row in self.rows.iter_mut().flatten() {
            release_atomic(row);
        }
        self.selector.deselect_all();
        info!("Matrix initialized: {} rows, {} cols", ROW, COL);
    }

    /// Sweep all columns once and write the raw key state into `state`.
    ///
    /// Returns true if any key changed since the previous content of `state`.
    pub fn scan(&mut self, state: &mut MatrixState<ROW, COL>) -> bool {
        let mut changed = false;
        for col in 0..COL {
            self.selector.select(col);
            self.delay.delay_us(self.settle_us);

            for (row, pin) in self.rows.iter_mut().enumerate() {
                let pressed = match pin {
                    Some(pin) => pin.is_low().unwrap_or(false),
                    None => false,
                };
                changed |= state.update(row, col, pressed);
            }

            self.selector.deselect(col);
        }

        if changed {
            trace!("Matrix changed, {} keys down", state.pressed_count());
        }
        changed
    }

    pub fn selector(&self) -> &ColumnSelector<C, DS, SHCP, STCP, COL> {
        &self.selector
    }
}
