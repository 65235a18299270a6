#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod diagnostics;
mod driver;
mod error;
mod pins;
pub mod register;
pub mod settings;
mod shadow;
mod transport;
mod utils;

pub use diagnostics::{Connection, SpiStatus};
pub use driver::Tmc2130;
pub use error::Error;
pub use pins::{ControlPins, NoPin};
pub use register::{Access, Register};
pub use shadow::ShadowRegisters;
pub use transport::{HardwareSpi, SPI_FREQUENCY_HZ, SPI_MODE, SoftwareSpi, Transport};
