//! Persistence of the brightness word.
//!
//! Only one 32-bit word is persisted. Its low byte holds the brightness, the upper bytes are
//! reserved and ignored on read.

use byteorder::{ByteOrder, LittleEndian};
use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind};

/// Largest flash write granularity supported by [`FlashStorage`]
const MAX_WRITE_SIZE: usize = 32;

/// Value read from a word that was never programmed
const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// Storage of the persisted brightness word
pub trait BrightnessStorage {
    type Error: core::fmt::Debug;

    /// Read the raw persisted word. Uninitialized storage may return any value.
    fn read_brightness(&mut self) -> Result<u32, Self::Error>;

    /// Persist the raw word
    fn write_brightness(&mut self, raw: u32) -> Result<(), Self::Error>;
}

impl<S: BrightnessStorage> BrightnessStorage for &mut S {
    type Error = S::Error;

    fn read_brightness(&mut self) -> Result<u32, Self::Error> {
        (**self).read_brightness()
    }

    fn write_brightness(&mut self, raw: u32) -> Result<(), Self::Error> {
        (**self).write_brightness(raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// Error reported by the flash driver
    Flash(NorFlashErrorKind),
    /// Flash write granularity is larger than supported
    WriteSizeTooLarge,
    /// Storage offset is not aligned to an erase sector
    Unaligned,
}

/// Brightness storage on one reserved sector of a NOR flash.
///
/// The word sits little-endian at the start of the sector. Every write erases the sector first.
pub struct FlashStorage<F: NorFlash> {
    flash: F,
    /// Start of the reserved sector
    offset: u32,
}

impl<F: NorFlash> FlashStorage<F> {
    /// Use the sector starting at `offset`.
    pub fn new(flash: F, offset: u32) -> Result<Self, StorageError> {
        if F::WRITE_SIZE > MAX_WRITE_SIZE {
            return Err(StorageError::WriteSizeTooLarge);
        }
        if F::ERASE_SIZE != 0 && offset as usize % F::ERASE_SIZE != 0 {
            return Err(StorageError::Unaligned);
        }
        Ok(Self { flash, offset })
    }

    pub fn into_inner(self) -> F {
        self.flash
    }
}

fn map_flash_error<E: NorFlashError>(e: E) -> StorageError {
    StorageError::Flash(e.kind())
}

impl<F: NorFlash> BrightnessStorage for FlashStorage<F> {
    type Error = StorageError;

    fn read_brightness(&mut self) -> Result<u32, Self::Error> {
        let mut buf = [0u8; 4];
        self.flash.read(self.offset, &mut buf).map_err(map_flash_error)?;
        let raw = LittleEndian::read_u32(&buf);
        if raw == ERASED_WORD {
            // Never written
            return Ok(0);
        }
        Ok(raw)
    }

    fn write_brightness(&mut self, raw: u32) -> Result<(), Self::Error> {
        let erase_size = F::ERASE_SIZE.max(1) as u32;
        self.flash
            .erase(self.offset, self.offset + erase_size)
            .map_err(map_flash_error)?;

        // Pad the word up to the write granularity
        let write_size = F::WRITE_SIZE.max(1);
        let len = 4usize.div_ceil(write_size) * write_size;
        if len > MAX_WRITE_SIZE {
            return Err(StorageError::WriteSizeTooLarge);
        }
        let mut buf = [0xFFu8; MAX_WRITE_SIZE];
        LittleEndian::write_u32(&mut buf[..4], raw);
        self.flash.write(self.offset, &buf[..len]).map_err(map_flash_error)
    }
}
