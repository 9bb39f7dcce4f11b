// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Known sensor models, keyed by the 32-bit product identifier.

use std::fmt;

pub const SDP31_500_PID: u32 = 0x0301_0100;
pub const SDP32_125_PID: u32 = 0x0301_0200;
pub const SDP800_500_PID: u32 = 0x0302_0100;
pub const SDP810_500_PID: u32 = 0x0302_0A00;
pub const SDP801_500_PID: u32 = 0x0302_0400;
pub const SDP811_500_PID: u32 = 0x0302_0D00;
pub const SDP800_125_PID: u32 = 0x0302_0200;
pub const SDP810_125_PID: u32 = 0x0302_0B00;

/// The low byte of a product identifier carries the silicon revision.
const PRODUCT_MASK: u32 = 0xFFFF_FF00;

/// Pressure scale of the 500 Pa models, in 1/Pa
pub const DIFF_SCALE_500PA: u8 = 60;
/// Pressure scale of the 125 Pa models, in 1/Pa
pub const DIFF_SCALE_125PA: u8 = 240;
/// Temperature scale shared by every model, in 1/°C
pub const TEMPERATURE_SCALE: u8 = 200;

/// Valid addresses of the SDP31 and SDP32
pub const SDP3X_ADDRESSES: [u8; 3] = [0x21, 0x22, 0x23];
/// Valid addresses of the SDP8xx family, 0x25 for SDP8x0 and 0x26 for SDP8x1
pub const SDP8XX_ADDRESSES: [u8; 2] = [0x25, 0x26];

/// Sensor models this driver can identify
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorModel {
    SDP31_500,
    SDP32_125,
    SDP800_500,
    SDP810_500,
    SDP801_500,
    SDP811_500,
    SDP800_125,
    SDP810_125,
}

/// Full scale range of a sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressureRange {
    /// Not identified yet
    Unknown,
    Range125,
    /// No shipped model uses it yet
    Range250,
    Range500,
}

impl SensorModel {
    /// Looks up the model for a product identifier read from the sensor.
    ///
    /// The revision byte is ignored. Returns `None` for anything else than
    /// the eight known products.
    pub fn from_product_id(pid: u32) -> Option<SensorModel> {
        match pid & PRODUCT_MASK {
            SDP31_500_PID => Some(SensorModel::SDP31_500),
            SDP32_125_PID => Some(SensorModel::SDP32_125),
            SDP800_500_PID => Some(SensorModel::SDP800_500),
            SDP810_500_PID => Some(SensorModel::SDP810_500),
            SDP801_500_PID => Some(SensorModel::SDP801_500),
            SDP811_500_PID => Some(SensorModel::SDP811_500),
            SDP800_125_PID => Some(SensorModel::SDP800_125),
            SDP810_125_PID => Some(SensorModel::SDP810_125),
            _ => None,
        }
    }

    pub fn product_id(&self) -> u32 {
        match *self {
            SensorModel::SDP31_500 => SDP31_500_PID,
            SensorModel::SDP32_125 => SDP32_125_PID,
            SensorModel::SDP800_500 => SDP800_500_PID,
            SensorModel::SDP810_500 => SDP810_500_PID,
            SensorModel::SDP801_500 => SDP801_500_PID,
            SensorModel::SDP811_500 => SDP811_500_PID,
            SensorModel::SDP800_125 => SDP800_125_PID,
            SensorModel::SDP810_125 => SDP810_125_PID,
        }
    }

    pub fn pressure_range(&self) -> PressureRange {
        match *self {
            SensorModel::SDP31_500
            | SensorModel::SDP800_500
            | SensorModel::SDP810_500
            | SensorModel::SDP801_500
            | SensorModel::SDP811_500 => PressureRange::Range500,
            SensorModel::SDP32_125 | SensorModel::SDP800_125 | SensorModel::SDP810_125 => {
                PressureRange::Range125
            }
        }
    }

    /// Divisor turning a raw pressure into Pa.
    pub fn pressure_scale(&self) -> u8 {
        match self.pressure_range() {
            PressureRange::Range125 => DIFF_SCALE_125PA,
            _ => DIFF_SCALE_500PA,
        }
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            SensorModel::SDP31_500 => "SDP31-500Pa",
            SensorModel::SDP32_125 => "SDP32-125Pa",
            SensorModel::SDP800_500 => "SDP800-500Pa",
            SensorModel::SDP810_500 => "SDP810-500Pa",
            SensorModel::SDP801_500 => "SDP801-500Pa",
            SensorModel::SDP811_500 => "SDP811-500Pa",
            SensorModel::SDP800_125 => "SDP800-125Pa",
            SensorModel::SDP810_125 => "SDP810-125Pa",
        };
        fmt::Display::fmt(name, f)
    }
}
