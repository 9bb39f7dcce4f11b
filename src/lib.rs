// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Driver for the Sensirion SDP3x (SDP31, SDP32) and SDP8xx digital
//! differential pressure sensors on I2C.
//!
//! Operations taken from the SDP3x and SDP8xx datasheets. Every word the
//! sensor returns is checked against its CRC-8 before it is handed out.
//! The driver works on any `embedded_hal::i2c::I2c` bus, on Linux through
//! `linux_embedded_hal::I2cdev`.
//!
//! - Identification of the model and pressure scale (`begin`)
//! - Continuous measurements, averaged or not
//! - Triggered measurements, with or without clock stretching
//! - Product identifier and serial number
//! - Soft reset (general call, resets every device that supports it)
//!
//! Values are returned raw. Differential pressure in Pa is
//! `pressure / pressure_scale`, temperature in °C is `temperature / 200`.
//!
//! ## Basic Example
//!
//! Continuous differential pressure and temperature readings
//!
//!```no_run
//!use sdp_sensors_i2c::{SdpConfig, SdpSensor};
//!use std::thread;
//!use std::time::Duration;
//!
//!fn main() {
//!    // Open the I2C device
//!    let mut sdp = SdpSensor::new_linux("/dev/i2c-1", SdpConfig::sdp3x_default()).unwrap();
//!    let range = sdp.begin().unwrap();
//!    println!("Found {:?} ({:?})", sdp.model(), range);
//!    let scale = sdp.pressure_scale().unwrap();
//!
//!    sdp.start_continuous(true).unwrap();
//!
//!    loop {
//!        thread::sleep(Duration::from_millis(100));
//!        match sdp.read_measurement(true, false) {
//!            Ok(m) => {
//!                println!(
//!                    "Pressure: {} Pa Temp: {:?} C",
//!                    m.pressure_pa(scale),
//!                    m.temperature_celsius()
//!                );
//!            }
//!            Err(e) => {
//!                println!("Error obtaining measurements. More details: {}", e);
//!            }
//!        }
//!    }
//!}
//!```
//!

/// Sensor commands
pub mod command;
/// CRC-8 checks on returned words
pub mod crc;
/// Driver error type
pub mod error;
/// Known models and their scales
pub mod model;
/// SDP sensor handle and measurement operations
pub mod sdp;

pub use error::SdpError;
pub use model::{PressureRange, SensorModel};
pub use sdp::{
    Measurement, MeasurementMode, ProductIdentity, SdpConfig, SdpSensor,
    TemperatureCompensation, TRIGGERED_CONVERSION_TIME,
};
