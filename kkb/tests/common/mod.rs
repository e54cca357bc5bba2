use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_storage::nor_flash::{ErrorType as FlashErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash};
use kkb::action::KeyAction;
use kkb::board::{COL, LED_COUNT, NUM_LAYER, ROW, column_topology};
use kkb::driver::{FlexPin, ShiftRegister};
use kkb::indicator::RgbBackend;
use kkb::keycode::KeyCode;
use kkb::matrix::{ColumnSelector, Matrix};
use kkb::shortcut::KeyReporter;
use kkb::storage::BrightnessStorage;
use kkb::{a, bri, k, mo, sc};
use rgb::RGB8;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Electrical state of the simulated board: one GPIO column, a 16-bit 74HC595 chain and the rows.
pub struct SimState {
    /// Physically pressed keys
    pub keys: [[bool; COL]; ROW],
    pub data: bool,
    pub clock: bool,
    pub latch: bool,
    /// Content of the shift stage
    pub shift: u16,
    /// Content of the storage stage, i.e. the parallel outputs
    pub outputs: u16,
    pub col0_output: bool,
    pub col0_high: bool,
    pub row_output: [bool; ROW],
    /// Number of latch strobes
    pub latches: usize,
}

impl SimState {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            keys: [[false; COL]; ROW],
            data: false,
            clock: false,
            latch: false,
            shift: 0,
            outputs: 0xFFFF,
            col0_output: false,
            col0_high: true,
            row_output: [false; ROW],
            latches: 0,
        }))
    }

    /// Whether a column is currently pulled low
    pub fn column_active(&self, col: usize) -> bool {
        if col == 0 {
            self.col0_output && !self.col0_high
        } else {
            self.outputs & (1 << (col - 1)) == 0
        }
    }

    pub fn active_columns(&self) -> Vec<usize> {
        (0..COL).filter(|c| self.column_active(*c)).collect()
    }

    fn row_low(&self, row: usize) -> bool {
        !self.row_output[row] && (0..COL).any(|c| self.column_active(c) && self.keys[row][c])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimLine {
    Data,
    Clock,
    Latch,
    Col0,
    Row(usize),
}

/// A pin of the simulated board
pub struct SimPin {
    state: Rc<RefCell<SimState>>,
    line: SimLine,
}

impl SimPin {
    pub fn new(state: &Rc<RefCell<SimState>>, line: SimLine) -> Self {
        Self {
            state: state.clone(),
            line,
        }
    }

    fn set_level(&mut self, high: bool) {
        let mut s = self.state.borrow_mut();
        match self.line {
            SimLine::Data => s.data = high,
            SimLine::Clock => {
                if high && !s.clock {
                    s.shift = (s.shift << 1) | s.data as u16;
                }
                s.clock = high;
            }
            SimLine::Latch => {
                if high && !s.latch {
                    s.outputs = s.shift;
                    s.latches += 1;
                }
                s.latch = high;
            }
            SimLine::Col0 => s.col0_high = high,
            SimLine::Row(_) => {}
        }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let s = self.state.borrow();
        Ok(match self.line {
            SimLine::Row(row) => s.row_low(row),
            SimLine::Col0 => !s.col0_high,
            _ => false,
        })
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(true);
        Ok(())
    }
}

impl FlexPin for SimPin {
    fn set_as_input(&mut self) {
        let mut s = self.state.borrow_mut();
        match self.line {
            SimLine::Col0 => {
                s.col0_output = false;
                s.col0_high = true;
            }
            SimLine::Row(row) => s.row_output[row] = false,
            _ => {}
        }
    }

    fn set_as_output(&mut self) {
        let mut s = self.state.borrow_mut();
        match self.line {
            SimLine::Col0 => s.col0_output = true,
            SimLine::Row(row) => s.row_output[row] = true,
            _ => {}
        }
    }
}

pub type SimMatrix = Matrix<SimPin, SimPin, SimPin, SimPin, SimPin, ROW, COL, NoopDelay>;
pub type SimSelector = ColumnSelector<SimPin, SimPin, SimPin, SimPin, COL>;

pub fn sim_selector(state: &Rc<RefCell<SimState>>, with_col0: bool) -> SimSelector {
    let col0 = with_col0.then(|| SimPin::new(state, SimLine::Col0));
    let shift_register = ShiftRegister::new(
        SimPin::new(state, SimLine::Data),
        SimPin::new(state, SimLine::Clock),
        SimPin::new(state, SimLine::Latch),
    );
    ColumnSelector::new(column_topology(col0), shift_register)
}

/// Matrix of the kkb wired to the simulated board, `missing_rows` have no pin
pub fn sim_matrix(state: &Rc<RefCell<SimState>>, with_col0: bool, missing_rows: &[usize]) -> SimMatrix {
    let rows = core::array::from_fn(|row| {
        if missing_rows.contains(&row) {
            None
        } else {
            Some(SimPin::new(state, SimLine::Row(row)))
        }
    });
    Matrix::new(rows, sim_selector(state, with_col0), NoopDelay::new())
}

/// NOR flash in RAM with 4-byte writes and 4 KiB sectors
pub struct RamFlash {
    pub data: Vec<u8>,
    pub erases: usize,
    pub writes: usize,
}

impl RamFlash {
    pub fn new(sectors: usize) -> Self {
        Self {
            data: vec![0xFF; sectors * Self::ERASE_SIZE],
            erases: 0,
            writes: 0,
        }
    }
}

impl FlashErrorType for RamFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        bytes.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = 4096;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let (from, to) = (from as usize, to as usize);
        if from % Self::ERASE_SIZE != 0 || to % Self::ERASE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if to > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        self.data[from..to].fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        if start % Self::WRITE_SIZE != 0 || bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if start + bytes.len() > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        // NOR programming only clears bits
        for (cell, byte) in self.data[start..].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        self.writes += 1;
        Ok(())
    }
}

/// Brightness word in RAM, `None` makes reads fail
pub struct MemStorage {
    pub word: Option<u32>,
    pub writes: Vec<u32>,
}

impl MemStorage {
    pub fn new(word: u32) -> Self {
        Self {
            word: Some(word),
            writes: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            word: None,
            writes: Vec::new(),
        }
    }
}

impl BrightnessStorage for MemStorage {
    type Error = ();

    fn read_brightness(&mut self) -> Result<u32, Self::Error> {
        self.word.ok_or(())
    }

    fn write_brightness(&mut self, raw: u32) -> Result<(), Self::Error> {
        self.word = Some(raw);
        self.writes.push(raw);
        Ok(())
    }
}

/// Colors set by the indicator engine
pub struct RecordingBackend {
    pub colors: [Option<RGB8>; LED_COUNT],
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            colors: [None; LED_COUNT],
        }
    }

    pub fn color(&self, index: u8) -> Option<RGB8> {
        self.colors[index as usize]
    }
}

impl RgbBackend for RecordingBackend {
    fn set_led_color(&mut self, index: u8, color: RGB8) {
        self.colors[index as usize] = Some(color);
    }
}

/// Key reports sent to the host, `true` for register
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<(bool, KeyCode)>,
}

impl KeyReporter for RecordingReporter {
    fn register(&mut self, code: KeyCode) {
        self.events.push((true, code));
    }

    fn unregister(&mut self, code: KeyCode) {
        self.events.push((false, code));
    }
}

// Positions used by the test keymap, with their LED index
pub const KEY_ESC: (usize, usize) = (0, 0); // led 0
pub const KEY_1: (usize, usize) = (0, 1); // led 1
pub const KEY_2: (usize, usize) = (0, 2); // led 2
pub const KEY_TAB: (usize, usize) = (1, 0); // led 15
pub const KEY_Q: (usize, usize) = (1, 1); // led 16
pub const KEY_CAPS: (usize, usize) = (2, 0); // led 29
pub const KEY_SPACE: (usize, usize) = (4, 6); // led 62
pub const KEY_FN: (usize, usize) = (4, 9); // led 63
pub const KEY_CFG: (usize, usize) = (4, 10); // led 64

/// Keymap of the simulated board.
///
/// Base Windows: every key is `A`, caps lock on the caps key, `Fn` and `Cfg` hold StdFn1 and
/// SysConfig. Base Custom is transparent. The function layers map a few keys only.
pub fn test_layers() -> [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    let mut layers = [[[a!(No); COL]; ROW]; NUM_LAYER];

    layers[0] = [[k!(A); COL]; ROW];
    layers[0][KEY_CAPS.0][KEY_CAPS.1] = k!(CAPS_LOCK);
    layers[0][KEY_FN.0][KEY_FN.1] = mo!(StdFn1);
    layers[0][KEY_CFG.0][KEY_CFG.1] = mo!(SysConfig);

    layers[1] = [[a!(Transparent); COL]; ROW];

    // StdFn1
    layers[2][KEY_1.0][KEY_1.1] = bri!(Increase);
    layers[2][KEY_2.0][KEY_2.1] = bri!(Decrease);
    layers[2][KEY_TAB.0][KEY_TAB.1] = sc!(Task);
    layers[2][KEY_Q.0][KEY_Q.1] = a!(Transparent);
    layers[2][KEY_FN.0][KEY_FN.1] = a!(Transparent);

    // SysConfig
    layers[8][KEY_1.0][KEY_1.1] = bri!(Increase);
    layers[8][KEY_2.0][KEY_2.1] = bri!(Decrease);
    layers[8][KEY_CAPS.0][KEY_CAPS.1] = k!(CAPS_LOCK);
    layers[8][KEY_SPACE.0][KEY_SPACE.1] = mo!(Bootloader);
    layers[8][KEY_CFG.0][KEY_CFG.1] = a!(Transparent);

    // Bootloader
    layers[9][KEY_ESC.0][KEY_ESC.1] = a!(Bootloader);
    layers[9][KEY_SPACE.0][KEY_SPACE.1] = a!(Transparent);

    layers
}
