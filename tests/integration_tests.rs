//! Integration tests for the TMC2130 driver using mocked SPI and GPIO.

use embedded_hal_mock::eh1::{
    digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
    spi::{Mock as SpiMock, Transaction as SpiTransaction},
};
use tmc2130::{Connection, ControlPins, HardwareSpi, NoPin, Register, Tmc2130};

type Driver = Tmc2130<HardwareSpi<SpiMock<u8>>, PinMock>;

/// Expected bus traffic, kept in lockstep for SPI and chip-select
#[derive(Default)]
struct Script {
    spi: Vec<SpiTransaction<u8>>,
    cs: Vec<PinTransaction>,
}

impl Script {
    fn new() -> Self {
        Self::default()
    }

    fn cs_high(mut self) -> Self {
        self.cs.push(PinTransaction::set(PinState::High));
        self
    }

    fn write_with_status(mut self, address: u8, value: u32, status: u8) -> Self {
        self.cs.push(PinTransaction::set(PinState::Low));
        self.spi.push(SpiTransaction::transfer_in_place(
            vec![0x80 | address],
            vec![status],
        ));
        for byte in value.to_be_bytes() {
            self.spi
                .push(SpiTransaction::transfer_in_place(vec![byte], vec![0x00]));
        }
        self.spi.push(SpiTransaction::flush());
        self.cs.push(PinTransaction::set(PinState::High));
        self
    }

    fn write(self, address: u8, value: u32) -> Self {
        self.write_with_status(address, value, 0x00)
    }

    fn read(mut self, address: u8, value: u32) -> Self {
        // Phase 1: address plus four dummy bytes, response discarded
        self.cs.push(PinTransaction::set(PinState::Low));
        self.spi
            .push(SpiTransaction::transfer_in_place(vec![address], vec![0x00]));
        self.spi.push(SpiTransaction::transfer_in_place(
            vec![0x00, 0x00],
            vec![0x00, 0x00],
        ));
        self.spi.push(SpiTransaction::transfer_in_place(
            vec![0x00, 0x00],
            vec![0x00, 0x00],
        ));
        self.spi.push(SpiTransaction::flush());
        self.cs.push(PinTransaction::set(PinState::High));

        // Phase 2: address again, data clocked in
        self.cs.push(PinTransaction::set(PinState::Low));
        self.spi
            .push(SpiTransaction::transfer_in_place(vec![address], vec![0x00]));
        for byte in value.to_be_bytes() {
            self.spi
                .push(SpiTransaction::transfer_in_place(vec![0x00], vec![byte]));
        }
        self.spi.push(SpiTransaction::flush());
        self.cs.push(PinTransaction::set(PinState::High));
        self
    }

    fn build(self) -> Driver {
        let spi = SpiMock::new(&self.spi);
        let cs = PinMock::new(&self.cs);
        Tmc2130::new(HardwareSpi::new(spi), cs)
    }
}

fn finish(driver: Driver) {
    let (transport, mut cs, _) = driver.release();
    transport.release().done();
    cs.done();
}

#[test]
fn writes_address_with_write_bit_and_payload_msb_first() {
    let mut driver = Script::new().write(0x13, 0x000A_BCDE).build();

    driver.set_tpwmthrs(0x000A_BCDE).unwrap();

    finish(driver);
}

#[test]
fn captures_status_byte_from_address_transfer() {
    let mut driver = Script::new().write_with_status(0x11, 0x14, 0x09).build();

    driver.set_tpowerdown(0x14).unwrap();

    let status = driver.status();
    assert_eq!(status.raw(), 0x09);
    assert!(status.reset_flag());
    assert!(!status.driver_error());
    assert!(!status.sg2());
    assert!(status.standstill());

    finish(driver);
}

#[test]
fn reads_register_in_two_phases() {
    let mut driver = Script::new().read(0x6F, 0x8000_0123).build();

    let status = driver.drv_status().unwrap();
    assert!(status.stst());
    assert_eq!(status.sg_result(), 0x123);
    assert!(!status.otpw());

    finish(driver);
}

#[test]
fn begin_applies_default_configuration() {
    let mut driver = Script::new()
        .cs_high()
        .write(0x00, 0x0000_0000)
        .write(0x6C, 0x0000_0000)
        .write(0x6D, 0x0000_0000)
        .write(0x70, 0x0005_0480)
        .write(0x10, 0x0000_0000)
        .write(0x6C, 0x0000_0008) // toff = 8
        .write(0x6C, 0x0000_8008) // tbl = 1
        .build();

    assert!(!driver.is_started());
    driver.begin().unwrap();
    assert!(driver.is_started());
    assert_eq!(driver.shadow().get(Register::ChopConf), 0x0000_8008);

    finish(driver);
}

#[test]
fn begin_configures_wired_control_pins_only() {
    let script = Script::new()
        .cs_high()
        .write(0x00, 0x0000_0000)
        .write(0x6C, 0x0000_0000)
        .write(0x6D, 0x0000_0000)
        .write(0x70, 0x0005_0480)
        .write(0x10, 0x0000_0000)
        .write(0x6C, 0x0000_0008)
        .write(0x6C, 0x0000_8008);

    let mut enable = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let mut dir = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let spi = SpiMock::new(&script.spi);
    let cs = PinMock::new(&script.cs);

    let pins = ControlPins {
        enable: Some(enable.clone()),
        dir: Some(dir.clone()),
        step: None::<NoPin>,
    };
    let mut driver = Tmc2130::with_control_pins(HardwareSpi::new(spi), cs, pins);

    driver.begin().unwrap();

    let (transport, mut cs, _) = driver.release();
    transport.release().done();
    cs.done();
    enable.done();
    dir.done();
}

#[test]
fn write_only_fields_read_back_from_shadow() {
    let mut driver = Script::new()
        .write(0x10, 0x0000_1400)
        .write(0x14, 0x0000_01F4)
        .build();

    driver.set_irun(20).unwrap();
    driver.set_tcoolthrs(500).unwrap();

    // No bus traffic expected for these
    assert_eq!(driver.irun().unwrap(), 20);
    assert_eq!(driver.tcoolthrs().unwrap(), 500);
    assert_eq!(driver.ihold().unwrap(), 0);

    finish(driver);
}

#[test]
fn read_write_fields_are_read_from_chip() {
    let mut driver = Script::new().read(0x6C, 0x0300_8008).build();

    assert_eq!(driver.mres().unwrap(), 3);

    finish(driver);
}

#[test]
fn setting_one_field_keeps_neighbours() {
    let mut driver = Script::new()
        .write(0x10, 0x0000_001F)
        .write(0x10, 0x0000_1F1F)
        .write(0x10, 0x000F_1F1F)
        .write(0x10, 0x000F_031F)
        .build();

    driver.set_ihold(0x1F).unwrap();
    driver.set_irun(0x1F).unwrap();
    driver.set_iholddelay(0x0F).unwrap();
    driver.set_irun(3).unwrap();

    assert_eq!(driver.ihold().unwrap(), 0x1F);
    assert_eq!(driver.iholddelay().unwrap(), 0x0F);
    assert_eq!(driver.irun().unwrap(), 3);

    finish(driver);
}

#[test]
fn out_of_range_values_are_truncated() {
    let mut driver = Script::new()
        .write(0x10, 0x0000_0800) // 40 & 0x1F = 8
        .write(0x11, 0x0000_00FF)
        .build();

    driver.set_irun(40).unwrap();
    driver.set_tpowerdown(0x1FF).unwrap();

    assert_eq!(driver.irun().unwrap(), 8);
    assert_eq!(driver.tpowerdown().unwrap(), 0xFF);

    finish(driver);
}

#[test]
fn whole_register_writes_are_masked_to_register_width() {
    let mut driver = Script::new()
        .write(0x33, 0x007F_FFFF) // VDCMIN, 23 bits
        .write(0x72, 0x0000_0003) // ENCM_CTRL, 2 bits
        .write(0x00, 0x0003_FFFF) // GCONF, 18 bits
        .build();

    driver.set_vdcmin(0xFFFF_FFFF).unwrap();
    driver.set_encm_ctrl(0xFF).unwrap();
    driver.set_gconf(0xFFFF_FFFF).unwrap();

    assert_eq!(driver.vdcmin().unwrap(), 0x007F_FFFF);
    assert_eq!(driver.encm_ctrl().unwrap(), 0x03);
    assert_eq!(driver.shadow().get(Register::GConf), 0x0003_FFFF);

    finish(driver);
}

#[test]
fn test_mode_is_the_top_gconf_bit() {
    let mut driver = Script::new()
        .write(0x00, 0x0002_0000)
        .read(0x00, 0x0002_0000)
        .write(0x00, 0x0000_0000)
        .build();

    driver.set_test_mode(true).unwrap();
    assert!(driver.test_mode().unwrap());
    driver.set_test_mode(false).unwrap();

    finish(driver);
}

#[test]
fn push_rewrites_shadowed_registers_in_order() {
    let mut driver = Script::new()
        .write(0x13, 0x0000_01F4)
        .write(0x72, 0x0000_0001)
        .write(0x00, 0x0000_0000)
        .write(0x10, 0x0000_0000)
        .write(0x11, 0x0000_0000)
        .write(0x13, 0x0000_01F4)
        .write(0x14, 0x0000_0000)
        .write(0x15, 0x0000_0000)
        .write(0x2D, 0x0000_0000)
        .write(0x33, 0x0000_0000)
        .write(0x6C, 0x0000_0000)
        .write(0x6D, 0x0000_0000)
        .write(0x70, 0x0005_0480)
        .write(0x72, 0x0000_0001)
        .build();

    driver.set_tpwmthrs(500).unwrap();
    driver.set_inv(true).unwrap();
    driver.push().unwrap();

    finish(driver);
}

#[test]
fn reports_connection_state() {
    let mut driver = Script::new()
        .read(0x6F, 0xFFFF_FFFF)
        .read(0x6F, 0x0000_0000)
        .read(0x6F, 0x8000_0000)
        .build();

    assert_eq!(driver.test_connection().unwrap(), Connection::Disconnected);
    assert_eq!(driver.test_connection().unwrap(), Connection::NoPower);
    assert_eq!(driver.test_connection().unwrap(), Connection::Responding);

    finish(driver);
}

#[test]
fn overtemperature_warning_is_sticky() {
    let mut driver = Script::new()
        .read(0x6F, 1 << 26)
        .read(0x6F, 0x0000_0000)
        .build();

    assert!(!driver.overtemperature_warning());

    assert!(driver.check_overtemperature().unwrap());
    assert!(driver.overtemperature_warning());

    assert!(!driver.check_overtemperature().unwrap());
    assert!(driver.overtemperature_warning());

    driver.clear_overtemperature_warning();
    assert!(!driver.overtemperature_warning());

    finish(driver);
}

#[test]
fn rms_current_stays_in_standard_sensitivity() {
    // 32 * sqrt(2) * 1.64 * 0.12 / 0.325 - 1 = 26.4
    let mut driver = Script::new()
        .read(0x6C, 0x0000_0000) // vsense is off
        .write(0x10, 0x0000_1A00)
        .write(0x10, 0x0000_1A0D)
        .build();

    driver.set_rms_current(1640, 0.5, 0.10).unwrap();

    assert_eq!(driver.irun().unwrap(), 26);
    assert_eq!(driver.ihold().unwrap(), 13);
    assert_eq!(driver.current(), 1640);
    assert!((driver.rsense() - 0.10).abs() < f32::EPSILON);

    finish(driver);
}

#[test]
fn rms_current_switches_to_high_sensitivity() {
    // Standard range gives 4, below 16; high sensitivity gives 8
    let mut driver = Script::new()
        .write(0x6C, 0x0002_0000)
        .write(0x10, 0x0000_0800)
        .write(0x10, 0x0000_0804)
        .read(0x6C, 0x0002_0000)
        .build();

    driver.set_rms_current(300, 0.5, 0.10).unwrap();
    assert_eq!(driver.irun().unwrap(), 8);
    assert_eq!(driver.ihold().unwrap(), 4);

    let readback = driver.rms_current().unwrap();
    assert!(readback.abs_diff(300) <= 34, "readback {readback} mA");

    finish(driver);
}

#[test]
fn rms_current_leaves_high_sensitivity_for_large_currents() {
    let mut driver = Script::new()
        .read(0x6C, 0x0002_0000) // vsense is on
        .write(0x6C, 0x0000_0000)
        .write(0x10, 0x0000_1A00)
        .write(0x10, 0x0000_1A0D)
        .build();

    driver.set_rms_current(1640, 0.5, 0.10).unwrap();

    finish(driver);
}

#[test]
fn rms_current_default_uses_common_board_values() {
    // 32 * sqrt(2) * 1.64 * 0.13 / 0.325 - 1 = 28.7, hold at half
    let mut driver = Script::new()
        .read(0x6C, 0x0000_0000)
        .write(0x10, 0x0000_1C00)
        .write(0x10, 0x0000_1C0E)
        .build();

    driver.set_rms_current_default(1640).unwrap();

    assert_eq!(driver.irun().unwrap(), 28);
    assert_eq!(driver.ihold().unwrap(), 14);
    assert_eq!(driver.current(), 1640);
    assert!((driver.rsense() - 0.11).abs() < f32::EPSILON);

    finish(driver);
}

#[test]
fn microsteps_map_to_resolution_code() {
    let mut driver = Script::new()
        .write(0x6C, 0x0400_0000)
        .read(0x6C, 0x0400_0000)
        .write(0x6C, 0x0800_0000)
        .read(0x6C, 0x0800_0000)
        .build();

    driver.set_microsteps(16).unwrap();
    assert_eq!(driver.microsteps().unwrap(), 16);

    driver.set_microsteps(0).unwrap();
    assert_eq!(driver.microsteps().unwrap(), 0);

    finish(driver);
}

#[test]
fn unsupported_microsteps_are_ignored() {
    let mut driver = Script::new().build();

    driver.set_microsteps(17).unwrap();
    driver.set_microsteps(512).unwrap();
    driver.set_microsteps(1).unwrap();

    finish(driver);
}

#[test]
fn sg_current_decrease_maps_to_sedn() {
    let mut driver = Script::new().write(0x6D, 0x0000_2000).build();

    driver.set_sg_current_decrease(8).unwrap();
    driver.set_sg_current_decrease(5).unwrap();

    assert_eq!(driver.sedn().unwrap(), 0b01);
    assert_eq!(driver.sg_current_decrease().unwrap(), 8);

    finish(driver);
}

#[test]
fn stallguard_threshold_is_signed() {
    let mut driver = Script::new()
        .write(0x6D, 0x007B_0000)
        .write(0x6D, 0x017B_0000)
        .build();

    driver.set_sgt(-5).unwrap();
    driver.set_sfilt(true).unwrap();

    assert_eq!(driver.sgt().unwrap(), -5);
    assert!(driver.sfilt().unwrap());

    finish(driver);
}

#[test]
fn coil_currents_are_sign_extended() {
    let mut driver = Script::new()
        .read(0x2D, 0x01F0_01FF)
        .read(0x2D, 0x01F0_01FF)
        .write(0x2D, 0x0000_0100)
        .build();

    assert_eq!(driver.coil_a().unwrap(), -1);
    assert_eq!(driver.coil_b().unwrap(), -16);

    driver.set_coil_a(-256).unwrap();

    finish(driver);
}

#[test]
fn enabled_without_enable_pin_depends_on_off_time() {
    let mut driver = Script::new()
        .read(0x6C, 0x0000_8008)
        .read(0x6C, 0x0000_8000)
        .build();

    assert!(driver.is_enabled().unwrap());
    assert!(!driver.is_enabled().unwrap());

    finish(driver);
}

#[test]
fn reads_status_registers() {
    let mut driver = Script::new()
        .read(0x04, 0x1100_0001)
        .read(0x01, 0x0000_0005)
        .write(0x01, 0x0000_0005)
        .build();

    assert_eq!(driver.ioin().unwrap().version(), 0x11);

    let gstat = driver.gstat().unwrap();
    assert!(gstat.reset());
    assert!(!gstat.drv_err());
    assert!(gstat.uv_cp());

    driver.clear_gstat(0x05).unwrap();
    assert_eq!(driver.shadow().get(Register::GStat), 0);

    finish(driver);
}
