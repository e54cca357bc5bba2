//! Bit-banged driver for a 16-bit serial-in/parallel-out register chain (two cascaded 74HC595).
//!
//! The register has no handshake. Data is shifted MSB first on the rising edge of the shift clock
//! and copied to the parallel outputs on the rising edge of the latch, so the only thing keeping the
//! protocol correct is the spin delay between edges. Treat [`SHIFT_DELAY_SPINS`] as a per-board
//! tuning value.

use embedded_hal::digital::OutputPin;

/// Default number of spin iterations after every edge.
pub const SHIFT_DELAY_SPINS: u16 = 1;

/// Register value with every output high, which deselects every shifted column.
pub const ALL_HIGH: u16 = 0xFFFF;

/// Bit-banged 16-bit SIPO shift register
///
/// # Type Parameters
/// - `DS`: serial data pin
/// - `SHCP`: shift clock pin
/// - `STCP`: storage (latch) clock pin
pub struct ShiftRegister<DS, SHCP, STCP>
where
    DS: OutputPin,
    SHCP: OutputPin,
    STCP: OutputPin,
{
    data: DS,
    clock: SHCP,
    latch: STCP,
    delay_spins: u16,
    /// Last value presented on the parallel outputs
    latched: u16,
}

impl<DS, SHCP, STCP> ShiftRegister<DS, SHCP, STCP>
where
    DS: OutputPin,
    SHCP: OutputPin,
    STCP: OutputPin,
{
    /// Create a register driver with the default edge delay
    pub fn new(data: DS, clock: SHCP, latch: STCP) -> Self {
        Self::with_delay(data, clock, latch, SHIFT_DELAY_SPINS)
    }

    /// Create a register driver with a custom edge delay, in spin iterations
    pub fn with_delay(data: DS, clock: SHCP, latch: STCP, delay_spins: u16) -> Self {
        Self {
            data,
            clock,
            latch,
            delay_spins,
            // Power-on content of the register is unknown, assume deselected
            latched: ALL_HIGH,
        }
    }

    #[inline(always)]
    fn edge_delay(&self) {
        for _ in 0..self.delay_spins {
            core::hint::spin_loop();
        }
    }

    /// Shift `bits` out MSB first, then strobe the latch so all 16 outputs change at once.
    pub fn shift(&mut self, bits: u16) {
        let mut data = bits;
        for _ in 0..16 {
            self.clock.set_low().ok();
            if data & 0x8000 != 0 {
                self.data.set_high().ok();
            } else {
                self.data.set_low().ok();
            }
            data <<= 1;
            self.edge_delay();

            self.clock.set_high().ok();
            self.edge_delay();
        }

        self.edge_delay();
        self.latch.set_low().ok();
        self.edge_delay();
        self.latch.set_high().ok();

        self.latched = bits;
    }

    /// Value most recently latched onto the parallel outputs
    pub fn latched(&self) -> u16 {
        self.latched
    }

    /// Release the pins
    pub fn release(self) -> (DS, SHCP, STCP) {
        (self.data, self.clock, self.latch)
    }
}
