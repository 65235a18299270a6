use embedded_hal::digital::ErrorKind;

/// Error type for TMC2130 operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transport reported an error
    Communication(E),
    /// A chip-select or control pin could not be driven
    Pin(ErrorKind),
}

impl<E> Error<E> {
    pub(crate) fn pin(err: impl embedded_hal::digital::Error) -> Self {
        Self::Pin(err.kind())
    }
}
