// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use crate::command::Command;
use crate::crc::check_word;
use crate::error::SdpError;
use crate::model::{
    PressureRange, SensorModel, SDP3X_ADDRESSES, SDP8XX_ADDRESSES, TEMPERATURE_SCALE,
};
use embedded_hal::i2c::I2c;
use i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::I2cdev;
use log::{debug, info, warn};
use std::fmt;
use std::path::Path;
use std::{thread, time};

/// Without clock stretching, a read issued sooner than this after a
/// trigger is not acknowledged.
pub const TRIGGERED_CONVERSION_TIME: time::Duration = time::Duration::from_millis(45);

/// General call address, used by the soft reset
const GENERAL_CALL_ADDRESS: u8 = 0x00;

/// Every returned word is two data bytes and a checksum
const WORD_LEN: usize = 3;

/// Largest transaction: product id (2 words) and serial number (4 words)
const BUFFER_LEN: usize = 6 * WORD_LEN;

const ALL_ADDRESSES: [u8; 5] = [0x21, 0x22, 0x23, 0x25, 0x26];

/// Temperature compensation applied by the sensor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemperatureCompensation {
    /// For mass flow applications
    MassFlow,
    /// For differential pressure applications, where absolute pressure matters
    #[default]
    DifferentialPressure,
}

/// Measurement mode the driver believes the sensor is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasurementMode {
    Idle,
    /// A one-shot measurement was triggered and not read yet
    Triggered,
    ContinuousAveraged,
    ContinuousInstant,
}

impl MeasurementMode {
    pub fn is_continuous(&self) -> bool {
        matches!(
            *self,
            MeasurementMode::ContinuousAveraged | MeasurementMode::ContinuousInstant
        )
    }
}

impl fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mode = match *self {
            MeasurementMode::Idle => "idle",
            MeasurementMode::Triggered => "waiting for a triggered read",
            MeasurementMode::ContinuousAveraged => "in continuous averaged mode",
            MeasurementMode::ContinuousInstant => "in continuous mode",
        };
        fmt::Display::fmt(mode, f)
    }
}

/// Raw values of one reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub pressure: i16,
    pub temperature: Option<i16>,
    /// Pressure scale factor reported by the sensor itself
    pub scale: Option<u16>,
}

impl Measurement {
    /// Differential pressure in Pa for the given scale (1/Pa)
    pub fn pressure_pa(&self, scale: u8) -> f32 {
        f32::from(self.pressure) / f32::from(scale)
    }

    /// Temperature in °C, if it was read
    pub fn temperature_celsius(&self) -> Option<f32> {
        self.temperature
            .map(|t| f32::from(t) / f32::from(TEMPERATURE_SCALE))
    }
}

/// Identity stored in the sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductIdentity {
    pub product_id: u32,
    pub serial: Option<u64>,
}

/// How to reach and drive one sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SdpConfig {
    address: u8,
    allowed: &'static [u8],
    compensation: TemperatureCompensation,
    reset_delay: time::Duration,
}

impl SdpConfig {
    /// Any SDP3x or SDP8xx address, differential pressure compensation
    /// and a 20 ms start-up time after reset.
    pub fn new(address: u8) -> SdpConfig {
        SdpConfig {
            address,
            allowed: &ALL_ADDRESSES,
            compensation: TemperatureCompensation::default(),
            reset_delay: time::Duration::from_millis(20),
        }
    }

    /// SDP31 or SDP32 on 0x21, 0x22 or 0x23
    pub fn sdp3x(address: u8) -> SdpConfig {
        SdpConfig {
            allowed: &SDP3X_ADDRESSES,
            ..SdpConfig::new(address)
        }
    }

    /// SDP31 or SDP32 on its factory address 0x21
    pub fn sdp3x_default() -> SdpConfig {
        SdpConfig::sdp3x(SDP3X_ADDRESSES[0])
    }

    /// SDP8x0 on 0x25 or SDP8x1 on 0x26
    pub fn sdp8xx(address: u8) -> SdpConfig {
        SdpConfig {
            allowed: &SDP8XX_ADDRESSES,
            ..SdpConfig::new(address)
        }
    }

    pub fn compensation(mut self, compensation: TemperatureCompensation) -> SdpConfig {
        self.compensation = compensation;
        self
    }

    /// Time `begin` waits between the soft reset and the identification.
    pub fn reset_delay(mut self, delay: time::Duration) -> SdpConfig {
        self.reset_delay = delay;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    fn validate<E>(&self) -> Result<(), SdpError<E>> {
        if self.allowed.contains(&self.address) {
            Ok(())
        } else {
            warn!("Rejecting I2C address 0x{:02X}", self.address);
            Err(SdpError::InvalidAddress(self.address))
        }
    }
}

/// SDP sensor handle, generic over the I2C bus it talks through.
///
/// Pass `&mut bus` to share one bus between several sensors.
///
pub struct SdpSensor<I2C> {
    i2c: I2C,
    address: u8,
    compensation: TemperatureCompensation,
    reset_delay: time::Duration,
    model: Option<SensorModel>,
    mode: MeasurementMode,
    buffer: [u8; BUFFER_LEN],
}

impl SdpSensor<I2cdev> {
    /// Opens an i2c-dev device file, e.g. "/dev/i2c-1".
    /// If fails, return an LinuxI2CError from i2cdev wrapped in SdpError
    ///
    pub fn new_linux<P: AsRef<Path>>(
        path: P,
        config: SdpConfig,
    ) -> Result<SdpSensor<I2cdev>, SdpError<LinuxI2CError>> {
        config.validate()?;
        let device = I2cdev::new(path)?;
        Ok(SdpSensor::with_config(device, config))
    }
}

impl<I2C: I2c> SdpSensor<I2C> {
    /// Creates an unidentified sensor handle. No bus traffic happens until
    /// [`begin`](SdpSensor::begin).
    pub fn new(i2c: I2C, config: SdpConfig) -> Result<SdpSensor<I2C>, SdpError<I2C::Error>> {
        config.validate()?;
        Ok(SdpSensor::with_config(i2c, config))
    }

    fn with_config(i2c: I2C, config: SdpConfig) -> SdpSensor<I2C> {
        SdpSensor {
            i2c,
            address: config.address,
            compensation: config.compensation,
            reset_delay: config.reset_delay,
            model: None,
            mode: MeasurementMode::Idle,
            buffer: [0; BUFFER_LEN],
        }
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Resets the sensor, reads its identity and resolves the model.
    ///
    /// On failure the sensor is left unidentified.
    pub fn begin(&mut self) -> Result<PressureRange, SdpError<I2C::Error>> {
        self.model = None;
        self.reset()?;
        if !self.reset_delay.is_zero() {
            thread::sleep(self.reset_delay);
        }
        let identity = self.read_product_id(true)?;
        let model = match SensorModel::from_product_id(identity.product_id) {
            Some(model) => model,
            None => {
                warn!(
                    "Unknown product id 0x{:08X} at 0x{:02X}",
                    identity.product_id, self.address
                );
                return Err(SdpError::UnknownProduct(identity.product_id));
            }
        };
        info!(
            "Found {} at 0x{:02X}, serial {:016X}",
            model,
            self.address,
            identity.serial.unwrap_or_default()
        );
        self.model = Some(model);
        Ok(model.pressure_range())
    }

    /// Begins continuous measurements.
    ///
    /// With `averaging` the sensor averages samples until they are read,
    /// otherwise a read returns the latest sample only.
    pub fn start_continuous(&mut self, averaging: bool) -> Result<(), SdpError<I2C::Error>> {
        self.identified()?;
        if self.mode.is_continuous() {
            return Err(self.invalid_state());
        }
        let (command, mode) = match (self.compensation, averaging) {
            (TemperatureCompensation::MassFlow, true) => {
                (Command::StartContMassFlowAvg, MeasurementMode::ContinuousAveraged)
            }
            (TemperatureCompensation::MassFlow, false) => {
                (Command::StartContMassFlow, MeasurementMode::ContinuousInstant)
            }
            (TemperatureCompensation::DifferentialPressure, true) => (
                Command::StartContDiffPressureAvg,
                MeasurementMode::ContinuousAveraged,
            ),
            (TemperatureCompensation::DifferentialPressure, false) => (
                Command::StartContDiffPressure,
                MeasurementMode::ContinuousInstant,
            ),
        };
        self.write_command(command)?;
        self.mode = mode;
        Ok(())
    }

    /// Stops continuous measurements, e.g. to save power.
    pub fn stop_continuous(&mut self) -> Result<(), SdpError<I2C::Error>> {
        if !self.mode.is_continuous() {
            return Err(self.invalid_state());
        }
        self.write_command(Command::StopCont)?;
        self.mode = MeasurementMode::Idle;
        Ok(())
    }

    /// Starts a one-shot measurement.
    ///
    /// With `stretching` the sensor holds the clock until the result is
    /// ready. Without it, reading sooner than [`TRIGGERED_CONVERSION_TIME`]
    /// after the trigger fails.
    pub fn trigger_measurement(&mut self, stretching: bool) -> Result<(), SdpError<I2C::Error>> {
        self.identified()?;
        if self.mode.is_continuous() {
            return Err(self.invalid_state());
        }
        let command = match (self.compensation, stretching) {
            (TemperatureCompensation::MassFlow, false) => Command::TrigMassFlow,
            (TemperatureCompensation::MassFlow, true) => Command::TrigMassFlowStretch,
            (TemperatureCompensation::DifferentialPressure, false) => Command::TrigDiffPressure,
            (TemperatureCompensation::DifferentialPressure, true) => {
                Command::TrigDiffPressureStretch
            }
        };
        self.write_command(command)?;
        self.mode = MeasurementMode::Triggered;
        Ok(())
    }

    /// Reads the differential pressure only.
    pub fn read_pressure(&mut self) -> Result<i16, SdpError<I2C::Error>> {
        Ok(self.read_measurement(false, false)?.pressure)
    }

    /// Reads a pending measurement.
    ///
    /// Leave `temperature` and `scale` false when not needed, every extra
    /// word makes the read longer. The scale word comes after the
    /// temperature word, so asking for it reads the temperature too.
    pub fn read_measurement(
        &mut self,
        temperature: bool,
        scale: bool,
    ) -> Result<Measurement, SdpError<I2C::Error>> {
        self.identified()?;
        if self.mode == MeasurementMode::Idle {
            return Err(self.invalid_state());
        }
        let words = if scale {
            3
        } else if temperature {
            2
        } else {
            1
        };
        self.read_data(words)?;
        if self.mode == MeasurementMode::Triggered {
            self.mode = MeasurementMode::Idle;
        }
        Ok(Measurement {
            pressure: self.word(0) as i16,
            temperature: if temperature {
                Some(self.word(1) as i16)
            } else {
                None
            },
            scale: if scale { Some(self.word(2)) } else { None },
        })
    }

    /// Reads the product identifier and, if `serial` is set, the 64-bit
    /// serial number.
    pub fn read_product_id(&mut self, serial: bool) -> Result<ProductIdentity, SdpError<I2C::Error>> {
        if self.mode.is_continuous() {
            return Err(self.invalid_state());
        }
        self.write_command(Command::ReadInfo1)?;
        self.write_command(Command::ReadInfo2)?;
        // The sensor drops a pending one-shot result
        self.mode = MeasurementMode::Idle;
        self.read_data(if serial { 6 } else { 2 })?;
        let product_id = (u32::from(self.word(0)) << 16) | u32::from(self.word(1));
        let serial = if serial {
            Some((2..6).fold(0u64, |acc, i| (acc << 16) | u64::from(self.word(i))))
        } else {
            None
        };
        Ok(ProductIdentity { product_id, serial })
    }

    /// Soft resets the sensor to its default settings.
    ///
    /// WARNING: this is a general call. Every device on the bus that
    /// supports it resets too, including other sensors in continuous mode.
    pub fn reset(&mut self) -> Result<(), SdpError<I2C::Error>> {
        // The first command byte is the general call address itself
        let [_, reset] = Command::SoftReset.value();
        debug!("Writing {}", Command::SoftReset);
        self.i2c.write(GENERAL_CALL_ADDRESS, &[reset])?;
        self.mode = MeasurementMode::Idle;
        Ok(())
    }

    /// Model found by `begin`
    pub fn model(&self) -> Option<SensorModel> {
        self.model
    }

    pub fn pressure_range(&self) -> PressureRange {
        self.model
            .map_or(PressureRange::Unknown, |m| m.pressure_range())
    }

    /// Pressure scale in 1/Pa, once identified
    pub fn pressure_scale(&self) -> Option<u8> {
        self.model.map(|m| m.pressure_scale())
    }

    /// Temperature scale in 1/°C, once identified
    pub fn temperature_scale(&self) -> Option<u8> {
        self.model.map(|_| TEMPERATURE_SCALE)
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn compensation(&self) -> TemperatureCompensation {
        self.compensation
    }

    fn identified(&self) -> Result<(), SdpError<I2C::Error>> {
        self.model.map(|_| ()).ok_or(SdpError::NotIdentified)
    }

    fn invalid_state(&self) -> SdpError<I2C::Error> {
        warn!("Sensor at 0x{:02X} is {}", self.address, self.mode);
        SdpError::InvalidState(self.mode)
    }

    /// Writes a command, fails unless every byte is acknowledged.
    fn write_command(&mut self, command: Command) -> Result<(), SdpError<I2C::Error>> {
        debug!("Writing {} to 0x{:02X}", command, self.address);
        self.i2c.write(self.address, &command.value())?;
        Ok(())
    }

    /// Reads `words` word groups into the buffer and checks each checksum.
    /// The buffer content is garbage if this fails, a short read included.
    fn read_data(&mut self, words: usize) -> Result<(), SdpError<I2C::Error>> {
        let expected = words * WORD_LEN;
        debug_assert!(expected <= BUFFER_LEN);
        self.i2c.read(self.address, &mut self.buffer[..expected])?;
        for (i, group) in self.buffer[..expected].chunks(WORD_LEN).enumerate() {
            if !check_word(group) {
                warn!("Checksum mismatch in word {} from 0x{:02X}", i, self.address);
                return Err(SdpError::ChecksumError);
            }
        }
        debug!("Read {:02X?} from 0x{:02X}", &self.buffer[..expected], self.address);
        Ok(())
    }

    fn word(&self, index: usize) -> u16 {
        let start = index * WORD_LEN;
        u16::from_be_bytes([self.buffer[start], self.buffer[start + 1]])
    }
}
