use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Pin that can be switched between a pulled-up input and a push-pull output.
///
/// Matrix lines are parked as pulled-up inputs and only driven when a column is selected,
/// so the HAL pin has to change its mode at runtime.
pub trait FlexPin: ErrorType + InputPin + OutputPin {
    /// Reconfigure as input with the internal pull-up enabled
    fn set_as_input(&mut self);

    /// Reconfigure as push-pull output
    fn set_as_output(&mut self);
}

/// Drive the pin low as an output.
///
/// Mode and level are changed inside one critical section, an interrupt handler touching GPIO never
/// observes a pin that is already an output but still at its old level.
pub(crate) fn drive_low_atomic<P: FlexPin>(pin: &mut P) {
    critical_section::with(|_| {
        pin.set_as_output();
        pin.set_low().ok();
    });
}

/// Release the pin to a pulled-up input (high impedance, reads high when idle).
pub(crate) fn release_atomic<P: FlexPin>(pin: &mut P) {
    critical_section::with(|_| {
        pin.set_as_input();
    });
}
