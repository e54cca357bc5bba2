use bitfield_struct::bitfield;

/// Lock LED state reported by the host, as in the HID spec 11.1
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct LedIndicator {
    #[bits(1)]
    pub num_lock: bool,
    #[bits(1)]
    pub caps_lock: bool,
    #[bits(1)]
    pub scroll_lock: bool,
    #[bits(1)]
    pub compose: bool,
    #[bits(1)]
    pub kana: bool,
    #[bits(3)]
    _reserved: u8,
}

impl LedIndicator {
    pub const CAPS_LOCK: Self = Self::new().with_caps_lock(true);

    /// Parse the output report byte sent by the host
    pub const fn from_report(report: u8) -> Self {
        Self::from_bits(report & 0x1F)
    }
}
