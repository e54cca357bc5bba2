/// A key on the HID keyboard/keypad usage page (0x07).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const A: Self = Self(0x04);
    pub const C: Self = Self(0x06);
    pub const E: Self = Self(0x08);
    pub const S: Self = Self(0x16);
    pub const ENTER: Self = Self(0x28);
    pub const TAB: Self = Self(0x2B);
    pub const CAPS_LOCK: Self = Self(0x39);
    pub const LEFT_SHIFT: Self = Self(0xE1);
    pub const LEFT_GUI: Self = Self(0xE3);
}
