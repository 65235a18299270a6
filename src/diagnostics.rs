//! Status reported by the TMC2130 outside of register payloads

bitfield::bitfield! {
    /// `SPI_STATUS` byte clocked out while the address byte is sent
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct SpiStatus(u8);
    impl Debug;
    /// GSTAT.reset is set
    pub reset_flag, _: 0;
    /// GSTAT.drv_err is set
    pub driver_error, _: 1;
    /// DRV_STATUS.stallguard is set
    pub sg2, _: 2;
    /// DRV_STATUS.stst is set
    pub standstill, _: 3;
}

impl SpiStatus {
    /// Get the raw status byte
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.0
    }
}

impl From<u8> for SpiStatus {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// Outcome of probing the driver status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connection {
    /// The chip answered with a plausible value
    Responding,
    /// Every bit read high: MISO is likely not connected
    Disconnected,
    /// Every bit read low: the chip is likely unpowered or MISO is floating
    NoPower,
}

impl Connection {
    /// Classify a raw `DRV_STATUS` value
    #[must_use]
    pub const fn from_drv_status(raw: u32) -> Self {
        match raw {
            0xFFFF_FFFF => Self::Disconnected,
            0 => Self::NoPower,
            _ => Self::Responding,
        }
    }

    /// Check if the chip is answering
    #[must_use]
    pub const fn is_responding(&self) -> bool {
        matches!(self, Self::Responding)
    }
}
