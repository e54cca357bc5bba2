//! Input acquisition and visual feedback for the kkb 69-key keyboard.
//!
//! The crate scans a key matrix whose first column is a plain GPIO and whose
//! remaining columns hang off a 16-bit serial-in/parallel-out register, and it
//! derives per-key RGB colors from the active layer, the host's caps-lock state
//! and a persisted brightness level.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod action;
pub mod board;
pub mod brightness;
pub mod color;
pub mod config;
pub mod driver;
pub mod indicator;
pub mod keyboard;
pub mod keycode;
pub mod keymap;
pub mod layer;
mod layout_macro;
pub mod led;
pub mod led_indicator;
pub mod matrix;
pub mod shortcut;
pub mod storage;

pub use keyboard::Kkb;
