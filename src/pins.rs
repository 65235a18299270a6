//! Optional control lines next to the SPI bus

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

/// Placeholder type for a control line that is not wired
///
/// It has no values; it only names the pin type of a `None` slot in
/// [`ControlPins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPin {}

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }
}

impl StatefulOutputPin for NoPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        match *self {}
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        match *self {}
    }
}

/// Enable, direction and step lines; absent lines are left untouched
#[derive(Debug)]
pub struct ControlPins<EN = NoPin, DIR = NoPin, STEP = NoPin> {
    /// Active-low driver enable
    pub enable: Option<EN>,
    /// Direction input of the driver
    pub dir: Option<DIR>,
    /// Step input of the driver
    pub step: Option<STEP>,
}

impl ControlPins {
    /// No control line is wired
    #[must_use]
    pub const fn none() -> Self {
        Self {
            enable: None,
            dir: None,
            step: None,
        }
    }
}
