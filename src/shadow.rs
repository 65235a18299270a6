//! Driver-held copies of the configuration registers.

use crate::register::{Register, SHADOWED_REGISTERS};

/// Power-on value of PWMCONF
const PWMCONF_RESET: u32 = 0x0005_0480;

/// Last value written to every shadowed register
///
/// Write-only registers cannot be read back from the chip, so their getters are
/// served from here. The copy is updated before every write transaction,
/// whether or not the transaction succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShadowRegisters {
    values: [u32; SHADOWED_REGISTERS],
}

impl Default for ShadowRegisters {
    fn default() -> Self {
        let mut values = [0; SHADOWED_REGISTERS];
        if let Some(slot) = Register::PwmConf.shadow_slot() {
            values[slot] = PWMCONF_RESET;
        }
        Self { values }
    }
}

impl ShadowRegisters {
    /// Shadow value of `register`, or 0 for registers without a shadow
    #[must_use]
    pub fn get(&self, register: Register) -> u32 {
        register.shadow_slot().map_or(0, |slot| self.values[slot])
    }

    /// Store `value` for `register`; ignored for registers without a shadow
    pub(crate) fn store(&mut self, register: Register, value: u32) {
        if let Some(slot) = register.shadow_slot() {
            self.values[slot] = value;
        }
    }
}
