//! Blocking driver for the TMC2130 stepper motor driver

use embedded_hal::digital::{OutputPin, StatefulOutputPin};

use crate::{
    diagnostics::{Connection, SpiStatus},
    error::Error,
    pins::{ControlPins, NoPin},
    register::{
        Access, ChopperConfig, CoolStepConfig, CurrentControl, DirectCoilControl, DriverStatus,
        EncoderControl, GlobalConfig, GlobalStatus, InputStatus, MicrostepCurrent, PUSH_ORDER,
        PwmConfig, Register,
    },
    settings,
    shadow::ShadowRegisters,
    transport::Transport,
    utils,
};

const WRITE_BIT: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;

/// Registers written from the shadow copy by [`Tmc2130::begin`]
const INIT_ORDER: [Register; 5] = [
    Register::GConf,
    Register::ChopConf,
    Register::CoolConf,
    Register::PwmConf,
    Register::IholdIrun,
];

/// Off time applied by [`Tmc2130::begin`]
const DEFAULT_TOFF: u8 = 8;
/// Blank time applied by [`Tmc2130::begin`], 24 clocks
const DEFAULT_TBL: u8 = 1;

/// Bitfield getter and shadow-backed setter per register field
///
/// Getters of write-only registers are served from the shadow copy, all others
/// read the chip.
macro_rules! fields {
    ($reg:ident as $layout:ident { $($(#[$doc:meta])* $get:ident, $set:ident: $ty:ty;)* }) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the bus transaction fails
            pub fn $get(&mut self) -> Result<$ty, Error<T::Error>> {
                self.register(Register::$reg).map(|raw| $layout(raw).$get())
            }

            #[doc = concat!("Set `", stringify!($get), "` in ", stringify!($reg), ", truncated to the field width")]
            ///
            /// # Errors
            ///
            /// Returns an error if the bus transaction fails
            pub fn $set(&mut self, value: $ty) -> Result<(), Error<T::Error>> {
                self.modify_register(Register::$reg, |raw| {
                    let mut layout = $layout(*raw);
                    layout.$set(value);
                    *raw = layout.0;
                })
            }
        )*
    };
}

/// Bitfield getters of read-only registers
macro_rules! status_fields {
    ($reg:ident as $layout:ident { $($(#[$doc:meta])* $get:ident: $ty:ty;)* }) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the bus transaction fails
            pub fn $get(&mut self) -> Result<$ty, Error<T::Error>> {
                self.read_register(Register::$reg).map(|raw| $layout(raw).$get())
            }
        )*
    };
}

/// Whole-register getter and setter pairs
macro_rules! value_registers {
    ($($(#[$doc:meta])* $reg:ident: $get:ident, $set:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the bus transaction fails
            pub fn $get(&mut self) -> Result<u32, Error<T::Error>> {
                self.register(Register::$reg)
            }

            #[doc = concat!("Write ", stringify!($reg), ", truncated to the register width")]
            ///
            /// # Errors
            ///
            /// Returns an error if the bus transaction fails
            pub fn $set(&mut self, value: u32) -> Result<(), Error<T::Error>> {
                self.write_register(Register::$reg, value)
            }
        )*
    };
}

/// TMC2130 driver instance
///
/// Owns the transport, the chip-select line and the optional control lines for
/// the lifetime of the motor axis.
#[derive(Debug)]
pub struct Tmc2130<T, CS, EN = NoPin, DIR = NoPin, STEP = NoPin> {
    transport: T,
    cs: CS,
    pins: ControlPins<EN, DIR, STEP>,
    shadow: ShadowRegisters,
    status: SpiStatus,
    started: bool,
    otpw: bool,
    rsense: f32,
    current_ma: u16,
}

impl<T, CS> Tmc2130<T, CS> {
    /// Create a driver that only controls chip-select
    pub fn new(transport: T, cs: CS) -> Self {
        Self::with_control_pins(transport, cs, ControlPins::none())
    }
}

impl<T, CS, EN, DIR, STEP> Tmc2130<T, CS, EN, DIR, STEP> {
    /// Create a driver that also owns the enable, direction and step lines
    pub fn with_control_pins(transport: T, cs: CS, pins: ControlPins<EN, DIR, STEP>) -> Self {
        Self {
            transport,
            cs,
            pins,
            shadow: ShadowRegisters::default(),
            status: SpiStatus::default(),
            started: false,
            otpw: false,
            rsense: settings::DEFAULT_RSENSE,
            current_ma: 0,
        }
    }

    /// Release the transport and pins, consuming the driver
    pub fn release(self) -> (T, CS, ControlPins<EN, DIR, STEP>) {
        (self.transport, self.cs, self.pins)
    }

    /// Check whether [`begin`](Self::begin) completed
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// `SPI_STATUS` byte of the most recent transaction
    pub fn status(&self) -> SpiStatus {
        self.status
    }

    /// Shadow copies of the configuration registers
    pub fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// Sense resistor used by the last current calculation, in ohms
    pub fn rsense(&self) -> f32 {
        self.rsense
    }

    /// RMS current last requested through [`set_rms_current`](Self::set_rms_current), in mA
    pub fn current(&self) -> u16 {
        self.current_ma
    }

    /// Sticky overtemperature prewarning flag
    pub fn overtemperature_warning(&self) -> bool {
        self.otpw
    }

    /// Acknowledge the overtemperature prewarning
    pub fn clear_overtemperature_warning(&mut self) {
        self.otpw = false;
    }
}

impl<T, CS, EN, DIR, STEP> Tmc2130<T, CS, EN, DIR, STEP>
where
    T: Transport,
    CS: OutputPin,
    EN: StatefulOutputPin,
    DIR: OutputPin,
    STEP: OutputPin,
{
    /// Configure the pins and bring the chip to a known state
    ///
    /// The driver output stays disabled through the enable line. The caller is
    /// expected to have waited for the chip to power up.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the bus fails
    pub fn begin(&mut self) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Initializing TMC2130");

        if let Some(enable) = self.pins.enable.as_mut() {
            enable.set_high().map_err(Error::pin)?;
        }
        if let Some(dir) = self.pins.dir.as_mut() {
            dir.set_low().map_err(Error::pin)?;
        }
        if let Some(step) = self.pins.step.as_mut() {
            step.set_low().map_err(Error::pin)?;
        }
        self.cs.set_high().map_err(Error::pin)?;

        for register in INIT_ORDER {
            let value = self.shadow.get(register);
            self.write_register(register, value)?;
        }

        self.set_toff(DEFAULT_TOFF)?;
        self.set_tbl(DEFAULT_TBL)?;

        self.started = true;
        Ok(())
    }

    /// Run `body` with chip-select asserted
    ///
    /// Chip-select is released and the transport drained even when `body`
    /// fails, so the next frame starts on a fresh falling edge. The first error
    /// wins.
    fn frame<R>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<R, Error<T::Error>>,
    ) -> Result<R, Error<T::Error>> {
        self.cs.set_low().map_err(Error::pin)?;
        let result = body(self);
        let end = self.transport.end().map_err(Error::Communication);
        let deselect = self.cs.set_high().map_err(Error::pin);

        let value = result?;
        end?;
        deselect?;
        Ok(value)
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Error<T::Error>> {
        self.transport.transfer(byte).map_err(Error::Communication)
    }

    /// Write a full register
    ///
    /// The value is masked to the register width and stored in the shadow
    /// copy before the transaction starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn write_register(&mut self, register: Register, value: u32) -> Result<(), Error<T::Error>> {
        let value = value & register.mask();
        self.shadow.store(register, value);

        let address = register.address() & ADDRESS_MASK;

        #[cfg(feature = "defmt")]
        defmt::trace!("Writing 0x{:08X} to register 0x{:02X}", value, address);

        self.transport.begin().map_err(Error::Communication)?;
        self.frame(|this| {
            let status = this.transfer(WRITE_BIT | address)?;
            this.status = SpiStatus::from(status);
            for byte in value.to_be_bytes() {
                this.transfer(byte)?;
            }
            Ok(())
        })
    }

    /// Read a full register from the chip
    ///
    /// The chip answers each datagram with data requested by the previous one,
    /// so the address is sent twice:
    /// - Transaction 1: send address, flush 4 bytes, ignore response
    /// - Transaction 2: send address again, receive 4 data bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn read_register(&mut self, register: Register) -> Result<u32, Error<T::Error>> {
        let address = register.address() & ADDRESS_MASK;

        #[cfg(feature = "defmt")]
        defmt::trace!("Reading register 0x{:02X}", address);

        self.transport.begin().map_err(Error::Communication)?;
        self.frame(|this| {
            let status = this.transfer(address)?;
            this.status = SpiStatus::from(status);
            this.transport.transfer16(0).map_err(Error::Communication)?;
            this.transport.transfer16(0).map_err(Error::Communication)?;
            Ok(())
        })?;

        let data = self.frame(|this| {
            this.transfer(address)?;
            let mut data = [0u8; 4];
            for byte in &mut data {
                *byte = this.transfer(0)?;
            }
            Ok(data)
        })?;

        let value = u32::from_be_bytes(data);

        #[cfg(feature = "defmt")]
        defmt::debug!("Register 0x{:02X} value: 0x{:08X}", address, value);

        Ok(value)
    }

    /// Current value of a register
    ///
    /// Write-only registers are answered from the shadow copy without touching
    /// the bus; every other register is read from the chip.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn register(&mut self, register: Register) -> Result<u32, Error<T::Error>> {
        match register.access() {
            Access::Write => Ok(self.shadow.get(register)),
            Access::Read | Access::ReadWrite | Access::ReadClear => self.read_register(register),
        }
    }

    fn modify_register(
        &mut self,
        register: Register,
        f: impl FnOnce(&mut u32),
    ) -> Result<(), Error<T::Error>> {
        let mut value = self.shadow.get(register);
        f(&mut value);
        self.write_register(register, value)
    }

    /// Rewrite every shadowed register so a power-cycled chip gets the last
    /// known configuration back
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn push(&mut self) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Pushing shadow registers");

        for register in PUSH_ORDER {
            let value = self.shadow.get(register);
            self.write_register(register, value)?;
        }
        Ok(())
    }

    /// Check that the chip answers by reading `DRV_STATUS`
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn test_connection(&mut self) -> Result<Connection, Error<T::Error>> {
        let connection = self
            .read_register(Register::DrvStatus)
            .map(Connection::from_drv_status)?;

        #[cfg(feature = "defmt")]
        if !connection.is_responding() {
            defmt::warn!("TMC2130 not responding: {}", connection);
        }

        Ok(connection)
    }

    /// Read `DRV_STATUS` and latch the overtemperature prewarning
    ///
    /// Returns `true` if the prewarning is active right now. The latched flag
    /// stays set until [`clear_overtemperature_warning`](Self::clear_overtemperature_warning).
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn check_overtemperature(&mut self) -> Result<bool, Error<T::Error>> {
        let status = self.drv_status()?;
        if status.otpw() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TMC2130 overtemperature prewarning");
            self.otpw = true;
        }
        Ok(status.otpw())
    }

    /// Check whether the driver stage is on
    ///
    /// The enable line must be driven low (if wired) and the off time must be
    /// non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the enable pin or the bus fails
    pub fn is_enabled(&mut self) -> Result<bool, Error<T::Error>> {
        if let Some(enable) = self.pins.enable.as_mut() {
            if !enable.is_set_low().map_err(Error::pin)? {
                return Ok(false);
            }
        }
        Ok(self.toff()? != 0)
    }

    /// Set the coil current from an RMS value in milliamps
    ///
    /// High sensitivity mode is selected when the standard range would leave
    /// fewer than 16 current steps, and deselected otherwise. The hold current
    /// is `multiplier` times the run current scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn set_rms_current(
        &mut self,
        milliamps: u16,
        multiplier: f32,
        rsense: f32,
    ) -> Result<(), Error<T::Error>> {
        self.rsense = rsense;

        let mut scale = settings::current_scale(milliamps, rsense, settings::VFS_STANDARD);
        if scale < settings::LOW_SCALE_LIMIT {
            #[cfg(feature = "defmt")]
            defmt::debug!("Current scale {} too low, enabling vsense", scale);
            self.set_vsense(true)?;
            scale = settings::current_scale(milliamps, rsense, settings::VFS_HIGH_SENSITIVITY);
        } else if self.vsense()? {
            self.set_vsense(false)?;
        }

        self.set_irun(scale)?;
        self.set_ihold(settings::hold_scale(scale, multiplier))?;
        self.current_ma = milliamps;
        Ok(())
    }

    /// Set the coil current for a board with the common 0.11 Ω sense resistor
    ///
    /// Same as [`set_rms_current`](Self::set_rms_current) with
    /// [`DEFAULT_HOLD_MULTIPLIER`](settings::DEFAULT_HOLD_MULTIPLIER) and
    /// [`DEFAULT_RSENSE`](settings::DEFAULT_RSENSE).
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn set_rms_current_default(&mut self, milliamps: u16) -> Result<(), Error<T::Error>> {
        self.set_rms_current(
            milliamps,
            settings::DEFAULT_HOLD_MULTIPLIER,
            settings::DEFAULT_RSENSE,
        )
    }

    /// RMS current produced by the configured run current scale, in milliamps
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn rms_current(&mut self) -> Result<u16, Error<T::Error>> {
        let irun = self.irun()?;
        let vfs = settings::full_scale_voltage(self.vsense()?);
        Ok(settings::rms_current(irun, self.rsense, vfs))
    }

    /// Set the microstep resolution
    ///
    /// Accepts 256, 128, 64, 32, 16, 8, 4, 2, or 0 for full steps. Any other
    /// value leaves the chip untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn set_microsteps(&mut self, microsteps: u16) -> Result<(), Error<T::Error>> {
        match settings::microsteps_to_mres(microsteps) {
            Some(mres) => self.set_mres(mres),
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Ignoring unsupported microstep count {}", microsteps);
                Ok(())
            }
        }
    }

    /// Microsteps per full step, 0 for full steps
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn microsteps(&mut self) -> Result<u16, Error<T::Error>> {
        self.mres().map(settings::mres_to_microsteps)
    }

    /// Decrease the coil current by one step every `value` stallGuard2 readings
    ///
    /// Accepts 32, 8, 2 or 1. Any other value leaves the chip untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn set_sg_current_decrease(&mut self, value: u8) -> Result<(), Error<T::Error>> {
        match settings::current_decrease_to_sedn(value) {
            Some(sedn) => self.set_sedn(sedn),
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Ignoring unsupported current decrease {}", value);
                Ok(())
            }
        }
    }

    /// stallGuard2 readings per current decrease step
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn sg_current_decrease(&mut self) -> Result<u8, Error<T::Error>> {
        self.sedn().map(settings::sedn_to_current_decrease)
    }

    /// Global status flags
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn gstat(&mut self) -> Result<GlobalStatus, Error<T::Error>> {
        self.read_register(Register::GStat).map(GlobalStatus)
    }

    /// Clear global status flags by writing 1 to them
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn clear_gstat(&mut self, flags: u8) -> Result<(), Error<T::Error>> {
        self.write_register(Register::GStat, u32::from(flags))
    }

    /// Input pin states and version
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn ioin(&mut self) -> Result<InputStatus, Error<T::Error>> {
        self.read_register(Register::Ioin).map(InputStatus)
    }

    /// Driver status flags
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn drv_status(&mut self) -> Result<DriverStatus, Error<T::Error>> {
        self.read_register(Register::DrvStatus).map(DriverStatus)
    }

    /// Time between the last two steps in clock cycles
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn tstep(&mut self) -> Result<u32, Error<T::Error>> {
        self.read_register(Register::TStep)
            .map(|raw| raw & Register::TStep.mask())
    }

    /// Position in the microstep table
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn mscnt(&mut self) -> Result<u16, Error<T::Error>> {
        self.read_register(Register::MsCnt)
            .map(|raw| (raw & Register::MsCnt.mask()) as u16)
    }

    /// Actual stealthChop amplitude
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn pwm_scale(&mut self) -> Result<u8, Error<T::Error>> {
        self.read_register(Register::PwmScale)
            .map(|raw| (raw & Register::PwmScale.mask()) as u8)
    }

    /// Steps skipped by dcStep
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn lost_steps(&mut self) -> Result<u32, Error<T::Error>> {
        self.read_register(Register::LostSteps)
            .map(|raw| raw & Register::LostSteps.mask())
    }

    /// stallGuard2 threshold, -64 to 63
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn sgt(&mut self) -> Result<i8, Error<T::Error>> {
        Ok(utils::sign_extend(u32::from(self.sgt_raw()?), 7) as i8)
    }

    /// Set the stallGuard2 threshold, truncated to 7 bits
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_sgt(&mut self, value: i8) -> Result<(), Error<T::Error>> {
        let raw = utils::truncate_signed(i32::from(value), 7) as u8;
        self.set_sgt_raw(raw)
    }

    /// Coil A current in direct mode
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn coil_a(&mut self) -> Result<i16, Error<T::Error>> {
        Ok(utils::sign_extend(self.coil_a_raw()?, 9) as i16)
    }

    /// Set coil A current in direct mode, truncated to 9 bits
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn set_coil_a(&mut self, value: i16) -> Result<(), Error<T::Error>> {
        self.set_coil_a_raw(utils::truncate_signed(i32::from(value), 9))
    }

    /// Coil B current in direct mode
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn coil_b(&mut self) -> Result<i16, Error<T::Error>> {
        Ok(utils::sign_extend(self.coil_b_raw()?, 9) as i16)
    }

    /// Set coil B current in direct mode, truncated to 9 bits
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    pub fn set_coil_b(&mut self, value: i16) -> Result<(), Error<T::Error>> {
        self.set_coil_b_raw(utils::truncate_signed(i32::from(value), 9))
    }

    /// Actual microstep current of coil A
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn cur_a(&mut self) -> Result<i16, Error<T::Error>> {
        let raw = self.read_register(Register::MsCurAct)?;
        Ok(utils::sign_extend(MicrostepCurrent(raw).cur_a_raw(), 9) as i16)
    }

    /// Actual microstep current of coil B
    ///
    /// # Errors
    ///
    /// Returns an error if the bus or chip-select pin fails
    #[allow(clippy::cast_possible_truncation)]
    pub fn cur_b(&mut self) -> Result<i16, Error<T::Error>> {
        let raw = self.read_register(Register::MsCurAct)?;
        Ok(utils::sign_extend(MicrostepCurrent(raw).cur_b_raw(), 9) as i16)
    }

    value_registers! {
        /// GCONF as a whole
        GConf: gconf, set_gconf;
        /// IHOLD_IRUN as a whole
        IholdIrun: ihold_irun, set_ihold_irun;
        /// Delay before standstill power down, in units of 2^18 clocks
        TPowerDown: tpowerdown, set_tpowerdown;
        /// Upper velocity threshold for stealthChop
        TPwmThrs: tpwmthrs, set_tpwmthrs;
        /// Lower velocity threshold for coolStep and stall output
        TCoolThrs: tcoolthrs, set_tcoolthrs;
        /// Velocity threshold for high velocity chopper settings
        THigh: thigh, set_thigh;
        /// XDIRECT as a whole
        XDirect: xdirect, set_xdirect;
        /// dcStep minimum velocity
        VdcMin: vdcmin, set_vdcmin;
        /// CHOPCONF as a whole
        ChopConf: chopconf, set_chopconf;
        /// COOLCONF as a whole
        CoolConf: coolconf, set_coolconf;
        /// PWMCONF as a whole
        PwmConf: pwmconf, set_pwmconf;
        /// ENCM_CTRL as a whole
        EncmCtrl: encm_ctrl, set_encm_ctrl;
    }

    fields!(GConf as GlobalConfig {
        /// Use voltage supplied to AIN as current reference
        i_scale_analog, set_i_scale_analog: bool;
        /// Use internal sense resistors
        internal_rsense, set_internal_rsense: bool;
        /// stealthChop voltage PWM mode
        en_pwm_mode, set_en_pwm_mode: bool;
        /// Commutation by full step encoder
        enc_commutation, set_enc_commutation: bool;
        /// Inverse motor direction
        shaft, set_shaft: bool;
        /// DIAG0 on driver errors
        diag0_error, set_diag0_error: bool;
        /// DIAG0 on overtemperature prewarning
        diag0_otpw, set_diag0_otpw: bool;
        /// DIAG0 on motor stall
        diag0_stall, set_diag0_stall: bool;
        /// DIAG1 on motor stall
        diag1_stall, set_diag1_stall: bool;
        /// DIAG1 on index position
        diag1_index, set_diag1_index: bool;
        /// DIAG1 while chopper is on
        diag1_onstate, set_diag1_onstate: bool;
        /// DIAG1 on skipped dcStep steps
        diag1_steps_skipped, set_diag1_steps_skipped: bool;
        /// DIAG0 push-pull output
        diag0_int_pushpull, set_diag0_int_pushpull: bool;
        /// DIAG1 push-pull output
        diag1_pushpull, set_diag1_pushpull: bool;
        /// Small hysteresis for step frequency comparison
        small_hysteresis, set_small_hysteresis: bool;
        /// Emergency stop on DCIN
        stop_enable, set_stop_enable: bool;
        /// Coil currents taken from XDIRECT
        direct_mode, set_direct_mode: bool;
        /// Analog test output mode; must stay 0 in normal operation
        test_mode, set_test_mode: bool;
    });

    fields!(IholdIrun as CurrentControl {
        /// Standstill current scale
        ihold, set_ihold: u8;
        /// Run current scale
        irun, set_irun: u8;
        /// Delay before reducing to hold current
        iholddelay, set_iholddelay: u8;
    });

    fields!(XDirect as DirectCoilControl {
        /// Raw 9-bit coil A current
        coil_a_raw, set_coil_a_raw: u32;
        /// Raw 9-bit coil B current
        coil_b_raw, set_coil_b_raw: u32;
    });

    fields!(ChopConf as ChopperConfig {
        /// Off time; 0 disables the driver stage
        toff, set_toff: u8;
        /// Hysteresis start, or fast decay time bits 2..0
        hstrt, set_hstrt: u8;
        /// Hysteresis end, or sine wave offset
        hend, set_hend: u8;
        /// Fast decay time bit 3
        fd3, set_fd3: bool;
        /// Disable fast decay comparator
        disfdcc, set_disfdcc: bool;
        /// Random off time
        rndtf, set_rndtf: bool;
        /// Chopper mode
        chm, set_chm: bool;
        /// Comparator blank time
        tbl, set_tbl: u8;
        /// High sensitivity current sensing
        vsense, set_vsense: bool;
        /// High velocity fullstep
        vhighfs, set_vhighfs: bool;
        /// High velocity chopper mode
        vhighchm, set_vhighchm: bool;
        /// PWM synchronization clock
        sync, set_sync: u8;
        /// Microstep resolution code
        mres, set_mres: u8;
        /// Interpolation to 256 microsteps
        intpol, set_intpol: bool;
        /// Step on both edges
        dedge, set_dedge: bool;
        /// Short to GND protection disable
        diss2g, set_diss2g: bool;
    });

    fields!(CoolConf as CoolStepConfig {
        /// Minimum stallGuard2 value for smart current control
        semin, set_semin: u8;
        /// Current up step width
        seup, set_seup: u8;
        /// stallGuard2 hysteresis for smart current control
        semax, set_semax: u8;
        /// Current down step speed code
        sedn, set_sedn: u8;
        /// Minimum current for smart current control
        seimin, set_seimin: bool;
        /// Raw 7-bit stallGuard2 threshold
        sgt_raw, set_sgt_raw: u8;
        /// stallGuard2 filter
        sfilt, set_sfilt: bool;
    });

    fields!(PwmConf as PwmConfig {
        /// PWM amplitude offset
        pwm_ampl, set_pwm_ampl: u8;
        /// PWM amplitude gradient
        pwm_grad, set_pwm_grad: u8;
        /// PWM frequency
        pwm_freq, set_pwm_freq: u8;
        /// Automatic amplitude scaling
        pwm_autoscale, set_pwm_autoscale: bool;
        /// Symmetric PWM
        pwm_symmetric, set_pwm_symmetric: bool;
        /// Standstill option at zero current
        freewheel, set_freewheel: u8;
    });

    fields!(EncmCtrl as EncoderControl {
        /// Invert encoder inputs
        inv, set_inv: bool;
        /// Ignore step input
        maxspeed, set_maxspeed: bool;
    });

    status_fields!(GStat as GlobalStatus {
        /// The chip has been reset since GSTAT was last cleared
        reset: bool;
        /// The driver has been shut down
        drv_err: bool;
        /// Charge pump undervoltage
        uv_cp: bool;
    });

    status_fields!(Ioin as InputStatus {
        /// STEP input level
        step: bool;
        /// DIR input level
        dir: bool;
        /// DCEN_CFG4 input level
        dcen_cfg4: bool;
        /// DCIN_CFG5 input level
        dcin_cfg5: bool;
        /// DRV_ENN_CFG6 input level
        drv_enn_cfg6: bool;
        /// DCO output level
        dco: bool;
        /// Silicon version
        version: u8;
    });

    status_fields!(DrvStatus as DriverStatus {
        /// stallGuard2 result
        sg_result: u16;
        /// Full step active
        fsactive: bool;
        /// Actual current scale
        cs_actual: u8;
        /// Motor stall
        stallguard: bool;
        /// Overtemperature shutdown
        ot: bool;
        /// Overtemperature prewarning, not latched
        otpw: bool;
        /// Short to ground on phase A
        s2ga: bool;
        /// Short to ground on phase B
        s2gb: bool;
        /// Open load on phase A
        ola: bool;
        /// Open load on phase B
        olb: bool;
        /// Standstill
        stst: bool;
    });
}
