//! Byte-level bus access used by the register protocol.
//!
//! Chip-select is driven by the driver itself, so a transport only moves bits.
//! Both implementations produce identical frames: mode 3, MSB first.

use embedded_hal::{
    delay::DelayNs,
    digital::{Error as _, ErrorKind, InputPin, OutputPin},
    spi::{MODE_3, Mode, SpiBus},
};

/// SPI mode required by the TMC2130: clock idles high, data sampled on the trailing edge
pub const SPI_MODE: Mode = MODE_3;

/// Bus clock the driver is designed for
pub const SPI_FREQUENCY_HZ: u32 = 2_000_000;

/// Half of one clock period at [`SPI_FREQUENCY_HZ`]
const HALF_PERIOD_NS: u32 = 1_000_000_000 / SPI_FREQUENCY_HZ / 2;

/// Synchronous full-duplex bus primitives
pub trait Transport {
    /// Error reported by the underlying bus
    type Error;

    /// Prepare the bus for a transaction
    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Clock out `byte` and return the byte clocked in
    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Clock out `word` MSB first and return the word clocked in
    fn transfer16(&mut self, word: u16) -> Result<u16, Self::Error> {
        let [high, low] = word.to_be_bytes();
        let high = self.transfer(high)?;
        let low = self.transfer(low)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Wait until every transfer has left the bus
    fn end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Transport over a hardware SPI peripheral
///
/// The bus must be configured with [`SPI_MODE`] at up to [`SPI_FREQUENCY_HZ`].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareSpi<SPI> {
    spi: SPI,
}

impl<SPI> HardwareSpi<SPI> {
    /// Wrap a configured SPI bus
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the SPI bus
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Transport for HardwareSpi<SPI>
where
    SPI: SpiBus<u8>,
{
    type Error = SPI::Error;

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi.transfer_in_place(&mut buf)?;
        Ok(buf[0])
    }

    fn transfer16(&mut self, word: u16) -> Result<u16, Self::Error> {
        let mut buf = word.to_be_bytes();
        self.spi.transfer_in_place(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.spi.flush()
    }
}

/// Transport bit-banged over three GPIO lines
#[derive(Debug)]
pub struct SoftwareSpi<MOSI, MISO, SCK, D> {
    mosi: MOSI,
    miso: MISO,
    sck: SCK,
    delay: D,
}

impl<MOSI, MISO, SCK, D> SoftwareSpi<MOSI, MISO, SCK, D>
where
    MOSI: OutputPin,
    MISO: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    /// Create a bit-banged bus from data, clock and delay providers
    pub fn new(mosi: MOSI, miso: MISO, sck: SCK, delay: D) -> Self {
        Self {
            mosi,
            miso,
            sck,
            delay,
        }
    }

    /// Release the pins and delay provider
    pub fn release(self) -> (MOSI, MISO, SCK, D) {
        (self.mosi, self.miso, self.sck, self.delay)
    }
}

impl<MOSI, MISO, SCK, D> Transport for SoftwareSpi<MOSI, MISO, SCK, D>
where
    MOSI: OutputPin,
    MISO: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    type Error = ErrorKind;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.sck.set_high().map_err(|e| e.kind())
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut received = 0u8;

        for bit in (0..8).rev() {
            self.sck.set_low().map_err(|e| e.kind())?;
            if (byte >> bit) & 1 == 1 {
                self.mosi.set_high().map_err(|e| e.kind())?;
            } else {
                self.mosi.set_low().map_err(|e| e.kind())?;
            }
            self.delay.delay_ns(HALF_PERIOD_NS);

            self.sck.set_high().map_err(|e| e.kind())?;
            let level = self.miso.is_high().map_err(|e| e.kind())?;
            received = (received << 1) | u8::from(level);
            self.delay.delay_ns(HALF_PERIOD_NS);
        }

        Ok(received)
    }
}
