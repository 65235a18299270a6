//! Register map of the TMC2130.
//!
//! Field positions follow section 5 of the TMC2130 datasheet.

/// How the driver may access a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Readable only
    Read,
    /// Writable only; reads are answered from the shadow copy
    Write,
    /// Readable and writable
    ReadWrite,
    /// Readable; writing 1 to a bit clears it
    ReadClear,
}

/// Register addresses for TMC2130
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// Global configuration flags
    GConf = 0x00,
    /// Global status flags
    GStat = 0x01,
    /// Input pin states and silicon version
    Ioin = 0x04,
    /// Run and hold current control
    IholdIrun = 0x10,
    /// Delay from standstill to motor current power down
    TPowerDown = 0x11,
    /// Actual time between two microsteps
    TStep = 0x12,
    /// Upper velocity for stealthChop voltage PWM mode
    TPwmThrs = 0x13,
    /// Lower threshold velocity for coolStep and stallGuard
    TCoolThrs = 0x14,
    /// Velocity threshold for high velocity chopper settings
    THigh = 0x15,
    /// Direct coil current control
    XDirect = 0x2D,
    /// Automatic commutation dcStep minimum velocity
    VdcMin = 0x33,
    /// Microstep counter
    MsCnt = 0x6A,
    /// Actual microstep currents of both coils
    MsCurAct = 0x6B,
    /// Chopper and driver configuration
    ChopConf = 0x6C,
    /// coolStep and stallGuard2 configuration
    CoolConf = 0x6D,
    /// Driver status flags and stallGuard2 result
    DrvStatus = 0x6F,
    /// Voltage PWM mode chopper configuration
    PwmConf = 0x70,
    /// Actual PWM amplitude scaler
    PwmScale = 0x71,
    /// Encoder mode configuration
    EncmCtrl = 0x72,
    /// Number of input steps skipped due to dcStep
    LostSteps = 0x73,
}

/// Number of registers carrying a shadow copy
pub const SHADOWED_REGISTERS: usize = 12;

/// Order in which [`Tmc2130::push`](crate::Tmc2130::push) rewrites the configuration
pub const PUSH_ORDER: [Register; SHADOWED_REGISTERS] = [
    Register::GConf,
    Register::IholdIrun,
    Register::TPowerDown,
    Register::TPwmThrs,
    Register::TCoolThrs,
    Register::THigh,
    Register::XDirect,
    Register::VdcMin,
    Register::ChopConf,
    Register::CoolConf,
    Register::PwmConf,
    Register::EncmCtrl,
];

impl Register {
    /// 7-bit register address
    #[must_use]
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// Access mode of the register
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::GConf | Self::XDirect | Self::ChopConf => Access::ReadWrite,
            Self::GStat => Access::ReadClear,
            Self::IholdIrun
            | Self::TPowerDown
            | Self::TPwmThrs
            | Self::TCoolThrs
            | Self::THigh
            | Self::VdcMin
            | Self::CoolConf
            | Self::PwmConf
            | Self::EncmCtrl => Access::Write,
            Self::Ioin
            | Self::TStep
            | Self::MsCnt
            | Self::MsCurAct
            | Self::DrvStatus
            | Self::PwmScale
            | Self::LostSteps => Access::Read,
        }
    }

    /// Bits of the 32-bit payload that carry data
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::GConf => 0x0003_FFFF,
            Self::GStat => 0x07,
            Self::TPowerDown | Self::PwmScale => 0xFF,
            Self::TStep | Self::TPwmThrs | Self::TCoolThrs | Self::THigh | Self::LostSteps => {
                0x000F_FFFF
            }
            Self::VdcMin => 0x007F_FFFF,
            Self::MsCnt => 0x03FF,
            Self::EncmCtrl => 0x03,
            _ => 0xFFFF_FFFF,
        }
    }

    /// Slot in the shadow table, for registers the driver keeps a copy of
    #[must_use]
    pub const fn shadow_slot(self) -> Option<usize> {
        let mut slot = 0;
        while slot < SHADOWED_REGISTERS {
            if PUSH_ORDER[slot] as u8 == self as u8 {
                return Some(slot);
            }
            slot += 1;
        }
        None
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

bitfield::bitfield! {
    /// GCONF
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct GlobalConfig(u32);
    impl Debug;
    /// Use voltage supplied to AIN as current reference
    pub i_scale_analog, set_i_scale_analog: 0;
    /// Use internal sense resistors
    pub internal_rsense, set_internal_rsense: 1;
    /// Enable stealthChop voltage PWM mode
    pub en_pwm_mode, set_en_pwm_mode: 2;
    /// Enable commutation by full step encoder
    pub enc_commutation, set_enc_commutation: 3;
    /// Inverse motor direction
    pub shaft, set_shaft: 4;
    /// DIAG0 signals driver errors
    pub diag0_error, set_diag0_error: 5;
    /// DIAG0 signals overtemperature prewarning
    pub diag0_otpw, set_diag0_otpw: 6;
    /// DIAG0 signals motor stall
    pub diag0_stall, set_diag0_stall: 7;
    /// DIAG1 signals motor stall
    pub diag1_stall, set_diag1_stall: 8;
    /// DIAG1 signals index position
    pub diag1_index, set_diag1_index: 9;
    /// DIAG1 active when chopper is on
    pub diag1_onstate, set_diag1_onstate: 10;
    /// DIAG1 toggles on skipped steps in dcStep
    pub diag1_steps_skipped, set_diag1_steps_skipped: 11;
    /// DIAG0 push-pull output
    pub diag0_int_pushpull, set_diag0_int_pushpull: 12;
    /// DIAG1 push-pull output
    pub diag1_pushpull, set_diag1_pushpull: 13;
    /// Hysteresis for step frequency comparison
    pub small_hysteresis, set_small_hysteresis: 14;
    /// Emergency stop on DCIN
    pub stop_enable, set_stop_enable: 15;
    /// Motor coil currents taken from XDIRECT
    pub direct_mode, set_direct_mode: 16;
    /// Analog test output mode, must be 0 in normal operation
    pub test_mode, set_test_mode: 17;
}

bitfield::bitfield! {
    /// GSTAT
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct GlobalStatus(u32);
    impl Debug;
    /// The IC has been reset since the last read of GSTAT
    pub reset, _: 0;
    /// The driver has been shut down due to overtemperature or short circuit
    pub drv_err, _: 1;
    /// Undervoltage on the charge pump
    pub uv_cp, _: 2;
}

bitfield::bitfield! {
    /// IOIN
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct InputStatus(u32);
    impl Debug;
    u8;
    /// STEP input level
    pub step, _: 0;
    /// DIR input level
    pub dir, _: 1;
    /// DCEN_CFG4 input level
    pub dcen_cfg4, _: 2;
    /// DCIN_CFG5 input level
    pub dcin_cfg5, _: 3;
    /// DRV_ENN_CFG6 input level
    pub drv_enn_cfg6, _: 4;
    /// DCO output level
    pub dco, _: 5;
    /// Silicon version, 0x11 for the TMC2130
    pub version, _: 31, 24;
}

bitfield::bitfield! {
    /// IHOLD_IRUN
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct CurrentControl(u32);
    impl Debug;
    u8;
    /// Standstill current scale
    pub ihold, set_ihold: 4, 0;
    /// Motor run current scale
    pub irun, set_irun: 12, 8;
    /// Number of clock cycles for motor power down after standstill
    pub iholddelay, set_iholddelay: 19, 16;
}

bitfield::bitfield! {
    /// XDIRECT
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct DirectCoilControl(u32);
    impl Debug;
    u32;
    /// Coil A current, 9-bit two's complement
    pub coil_a_raw, set_coil_a_raw: 8, 0;
    /// Coil B current, 9-bit two's complement
    pub coil_b_raw, set_coil_b_raw: 24, 16;
}

bitfield::bitfield! {
    /// MSCURACT
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct MicrostepCurrent(u32);
    impl Debug;
    u32;
    /// Coil A microstep current, 9-bit two's complement
    pub cur_a_raw, _: 8, 0;
    /// Coil B microstep current, 9-bit two's complement
    pub cur_b_raw, _: 24, 16;
}

bitfield::bitfield! {
    /// CHOPCONF
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct ChopperConfig(u32);
    impl Debug;
    u8;
    /// Off time; 0 disables the driver
    pub toff, set_toff: 3, 0;
    /// Hysteresis start value (chm=0) or fast decay time bits 2..0 (chm=1)
    pub hstrt, set_hstrt: 6, 4;
    /// Hysteresis low value (chm=0) or sine wave offset (chm=1)
    pub hend, set_hend: 10, 7;
    /// Fast decay time bit 3 (chm=1)
    pub fd3, set_fd3: 11;
    /// Disable current comparator for fast decay termination (chm=1)
    pub disfdcc, set_disfdcc: 12;
    /// Random off time
    pub rndtf, set_rndtf: 13;
    /// Chopper mode: 0 spreadCycle, 1 constant off time
    pub chm, set_chm: 14;
    /// Comparator blank time select
    pub tbl, set_tbl: 16, 15;
    /// High sensitivity, low sense resistor voltage
    pub vsense, set_vsense: 17;
    /// High velocity fullstep selection
    pub vhighfs, set_vhighfs: 18;
    /// High velocity chopper mode
    pub vhighchm, set_vhighchm: 19;
    /// SYNC PWM synchronization clock
    pub sync, set_sync: 23, 20;
    /// Microstep resolution
    pub mres, set_mres: 27, 24;
    /// Interpolation to 256 microsteps
    pub intpol, set_intpol: 28;
    /// Step on both edges of STEP
    pub dedge, set_dedge: 29;
    /// Short to GND protection disable
    pub diss2g, set_diss2g: 30;
}

bitfield::bitfield! {
    /// COOLCONF
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct CoolStepConfig(u32);
    impl Debug;
    u8;
    /// Minimum stallGuard2 value for smart current control
    pub semin, set_semin: 3, 0;
    /// Current up step width
    pub seup, set_seup: 6, 5;
    /// stallGuard2 hysteresis value for smart current control
    pub semax, set_semax: 11, 8;
    /// Current down step speed
    pub sedn, set_sedn: 14, 13;
    /// Minimum current for smart current control
    pub seimin, set_seimin: 15;
    /// stallGuard2 threshold, 7-bit two's complement
    pub sgt_raw, set_sgt_raw: 22, 16;
    /// stallGuard2 filter enable
    pub sfilt, set_sfilt: 24;
}

bitfield::bitfield! {
    /// DRV_STATUS
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct DriverStatus(u32);
    impl Debug;
    u16;
    /// stallGuard2 result or motor temperature estimate in standstill
    pub sg_result, _: 9, 0;
    /// Full step active indicator
    pub fsactive, _: 15;
    /// Actual motor current scale
    pub u8, cs_actual, _: 20, 16;
    /// Motor stall detected or dcStep stall
    pub stallguard, _: 24;
    /// Overtemperature shutdown
    pub ot, _: 25;
    /// Overtemperature prewarning
    pub otpw, _: 26;
    /// Short to ground on phase A
    pub s2ga, _: 27;
    /// Short to ground on phase B
    pub s2gb, _: 28;
    /// Open load on phase A
    pub ola, _: 29;
    /// Open load on phase B
    pub olb, _: 30;
    /// Standstill indicator
    pub stst, _: 31;
}

bitfield::bitfield! {
    /// PWMCONF
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct PwmConfig(u32);
    impl Debug;
    u8;
    /// User defined PWM amplitude offset
    pub pwm_ampl, set_pwm_ampl: 7, 0;
    /// User defined PWM amplitude gradient
    pub pwm_grad, set_pwm_grad: 15, 8;
    /// PWM frequency selection
    pub pwm_freq, set_pwm_freq: 17, 16;
    /// PWM automatic amplitude scaling
    pub pwm_autoscale, set_pwm_autoscale: 18;
    /// Force symmetric PWM
    pub pwm_symmetric, set_pwm_symmetric: 19;
    /// Standstill option when motor current setting is zero
    pub freewheel, set_freewheel: 21, 20;
}

bitfield::bitfield! {
    /// ENCM_CTRL
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct EncoderControl(u32);
    impl Debug;
    /// Invert encoder inputs
    pub inv, set_inv: 0;
    /// Ignore step input, use encoder to determine motor speed
    pub maxspeed, set_maxspeed: 1;
}
