//! Vibration motor

/// Haptic feedback output
pub trait Haptics {
    /// Fire one short vibration pulse
    ///
    /// Must not block; the pulse runs to completion in the background.
    fn short_pulse(&mut self);
}

impl<T: Haptics + ?Sized> Haptics for &mut T {
    fn short_pulse(&mut self) {
        (**self).short_pulse()
    }
}
