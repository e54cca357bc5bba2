//! Single keys that send a Windows key combination.

use crate::keycode::KeyCode;

/// Receiver of host key reports
pub trait KeyReporter {
    /// Add a key to the report
    fn register(&mut self, code: KeyCode);

    /// Remove a key from the report
    fn unregister(&mut self, code: KeyCode);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shortcut {
    /// Task view, Win+Tab
    Task,
    /// File explorer, Win+E
    Files,
    /// Snipping tool, Shift+Win+S
    Screenshot,
    /// Cortana, Win+C
    Cortana,
}

impl Shortcut {
    /// Keys of the combination, in press order
    pub const fn codes(self) -> &'static [KeyCode] {
        match self {
            Shortcut::Task => &[KeyCode::LEFT_GUI, KeyCode::TAB],
            Shortcut::Files => &[KeyCode::LEFT_GUI, KeyCode::E],
            Shortcut::Screenshot => &[KeyCode::LEFT_SHIFT, KeyCode::LEFT_GUI, KeyCode::S],
            Shortcut::Cortana => &[KeyCode::LEFT_GUI, KeyCode::C],
        }
    }

    /// Press registers the keys in order, release unregisters them in reverse order.
    pub fn process<R: KeyReporter>(self, pressed: bool, reporter: &mut R) {
        debug!("Shortcut {:?} pressed: {}", self, pressed);
        if pressed {
            for code in self.codes() {
                reporter.register(*code);
            }
        } else {
            for code in self.codes().iter().rev() {
                reporter.unregister(*code);
            }
        }
    }
}
