mod common;

use kkb::brightness::{BrightnessController, Direction};
use kkb::config::BrightnessConfig;
use kkb::storage::{BrightnessStorage, FlashStorage, StorageError};

use crate::common::{MemStorage, RamFlash};

fn controller(word: u32) -> BrightnessController<MemStorage> {
    let mut controller = BrightnessController::new(BrightnessConfig::default(), MemStorage::new(word));
    controller.load();
    controller
}

fn controller_low() -> BrightnessController<MemStorage> {
    let config = BrightnessConfig {
        absolute_min: 1,
        off_offset: -1,
        ..BrightnessConfig::new()
    };
    let mut controller = BrightnessController::new(config, MemStorage::new(10));
    controller.load();
    controller
}

#[test]
fn test_startup_default_scenario() {
    let controller = BrightnessController::new(BrightnessConfig::default(), MemStorage::new(0));
    assert_eq!(controller.config().main_min(), 60);
    assert_eq!(controller.config().main_max(), 215);
    assert_eq!(controller.value(), 180);
}

#[test]
fn test_out_of_range_word_loads_default() {
    let controller = controller(0);
    assert_eq!(controller.load_or_default(300), 180);
    assert_eq!(controller.load_or_default(5), 180);
    assert_eq!(controller.load_or_default(0xFFFF_FFFF), 180);
    assert_eq!(controller.load_or_default(10), 10);
    assert_eq!(controller.load_or_default(255), 255);
}

#[test]
fn test_load_or_default_is_idempotent() {
    let controller = controller(0);
    for raw in [0u32, 9, 10, 42, 180, 255, 256, 300, u32::MAX] {
        let once = controller.load_or_default(raw);
        assert_eq!(controller.load_or_default(once as u32), once);
    }
}

#[test]
fn test_load_restores_persisted_value() {
    let controller = controller(120);
    assert_eq!(controller.value(), 120);
    assert!(controller.storage().writes.is_empty());

    let mut failing = BrightnessController::new(BrightnessConfig::default(), MemStorage::failing());
    assert_eq!(failing.load(), 180);
}

#[test]
fn test_adjust_at_minimum_is_unchanged() {
    let mut controller = controller(60);
    assert!(!controller.adjust(-5));
    assert_eq!(controller.value(), 60);
    assert!(controller.storage().writes.is_empty());
}

#[test]
fn test_adjust_converges_to_boundary() {
    let mut controller = controller(180);
    let mut changes = 0;
    for _ in 0..20 {
        if controller.adjust(5) {
            changes += 1;
        }
        assert!(controller.value() <= 215);
    }
    assert_eq!(controller.value(), 215);
    assert_eq!(changes, 7);
    assert_eq!(controller.storage().writes.last(), Some(&215));

    for _ in 0..100 {
        controller.adjust(-7);
        assert!(controller.value() >= 60);
    }
    assert_eq!(controller.value(), 60);
}

#[test]
fn test_adjust_clamps_loaded_value_outside_main_range() {
    // 250 is a valid persisted value, but outside the main range
    let mut controller = controller(250);
    assert_eq!(controller.value(), 250);
    assert!(controller.adjust(5));
    assert_eq!(controller.value(), 215);
}

#[test]
fn test_percent_endpoints_and_monotonic() {
    let controller = controller(180);
    assert_eq!(controller.percent_of(60), 0);
    assert_eq!(controller.percent_of(215), 100);
    assert_eq!(controller.percent_of(10), 0);
    assert_eq!(controller.percent_of(255), 100);
    assert_eq!(controller.current_percent(), 77);

    let mut last = 0;
    for value in 0..=255u8 {
        let percent = controller.percent_of(value);
        assert!(percent >= last);
        last = percent;
    }
}

#[test]
fn test_percent_of_degenerate_range_is_zero() {
    let config = BrightnessConfig {
        active_offset: 127,
        off_offset: -128,
        ..BrightnessConfig::new()
    };
    let controller = BrightnessController::new(config, MemStorage::new(0));
    assert_eq!(controller.current_percent(), 0);
    assert_eq!(controller.percent_of(255), 0);
}

#[test]
fn test_held_key_adjusts_once() {
    let mut controller = controller(180);

    assert!(controller.on_key_event(Direction::Increase, true));
    assert_eq!(controller.value(), 185);
    // Auto-repeat while held
    assert!(controller.on_key_event(Direction::Increase, true));
    assert!(controller.on_key_event(Direction::Increase, true));
    assert_eq!(controller.value(), 185);

    assert!(controller.on_key_event(Direction::Increase, false));
    assert!(controller.on_key_event(Direction::Increase, true));
    assert_eq!(controller.value(), 190);
    assert_eq!(controller.storage().writes, vec![185, 190]);
}

#[test]
fn test_directions_latch_independently() {
    let mut controller = controller(180);

    controller.on_key_event(Direction::Increase, true);
    controller.on_key_event(Direction::Decrease, true);
    assert_eq!(controller.value(), 180);
    controller.on_key_event(Direction::Decrease, true);
    assert_eq!(controller.value(), 180);

    // Release without press doesn't adjust
    controller.on_key_event(Direction::Increase, false);
    controller.on_key_event(Direction::Decrease, false);
    assert_eq!(controller.value(), 180);
    assert_eq!(controller.storage().writes, vec![185, 180]);
}

#[test]
fn test_with_offset_clamps_to_absolute_range() {
    let controller = controller(215);
    assert_eq!(controller.with_offset(40), 255);
    assert_eq!(controller.with_offset(-60), 155);
    assert_eq!(controller.with_offset(i8::MAX), 255);

    // Below zero is still lit at the absolute minimum
    let controller = self::controller(15);
    assert_eq!(controller.with_offset(-20), 10);
    assert_eq!(controller.with_offset(-60), 10);
    assert_eq!(controller.with_offset(-4), 11);

    // Only an exact zero turns the LED off
    let controller = self::controller(60);
    assert_eq!(controller.with_offset(-60), 0);

    let controller = controller_low();
    assert_eq!(controller.with_offset(-10), 0);
    assert_eq!(controller.with_offset(-60), 1);
}

#[test]
fn test_flash_storage_round_trip() {
    let mut storage = FlashStorage::new(RamFlash::new(2), 4096).unwrap();
    // Erased flash is uninitialized
    assert_eq!(storage.read_brightness().unwrap(), 0);

    let mut controller = BrightnessController::new(BrightnessConfig::default(), storage);
    assert_eq!(controller.load(), 180);
    controller.adjust(-20);
    controller.adjust(-20);

    let flash = controller.into_storage().into_inner();
    assert_eq!(flash.erases, 2);
    assert_eq!(&flash.data[4096..4100], &140u32.to_le_bytes());
    // First sector untouched
    assert!(flash.data[..4096].iter().all(|b| *b == 0xFF));

    let mut controller = BrightnessController::new(BrightnessConfig::default(), FlashStorage::new(flash, 4096).unwrap());
    assert_eq!(controller.load(), 140);
}

#[test]
fn test_flash_storage_rejects_unaligned_offset() {
    assert!(matches!(
        FlashStorage::new(RamFlash::new(1), 100),
        Err(StorageError::Unaligned)
    ));
}

#[test]
fn test_flash_storage_out_of_bounds_write() {
    let mut storage = FlashStorage::new(RamFlash::new(1), 4096).unwrap();
    assert!(storage.write_brightness(100).is_err());
    assert!(storage.read_brightness().is_err());
}
