pub mod flex_pin;
pub mod shift_register;

pub use flex_pin::FlexPin;
pub use shift_register::ShiftRegister;
