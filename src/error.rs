// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sdp::MeasurementMode;
use std::error::Error;
use std::fmt;

///
///SDP error enum, generic over the error of the
///I2C bus. A read returning fewer bytes than
///requested is reported by the bus as well.
///None of them is fatal, the sensor
///handle stays usable and the caller decides whether
///to try again.
///
#[derive(Debug)]
pub enum SdpError<E> {
    /// The bus failed or the device did not acknowledge
    Io(E),
    /// ChecksumError when a returned word does not match its crc 8 checksum
    ChecksumError,
    /// The product identifier does not belong to a known model
    UnknownProduct(u32),
    /// The operation is not allowed in the current measurement mode
    InvalidState(MeasurementMode),
    /// `begin` has not identified the sensor yet
    NotIdentified,
    /// Address outside the allow-list of the sensor family
    InvalidAddress(u8),
}

impl<E> From<E> for SdpError<E> {
    fn from(e: E) -> Self {
        SdpError::Io(e)
    }
}

impl<E: fmt::Debug> fmt::Display for SdpError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SdpError::Io(ref e) => write!(f, "I2C error: {:?}", e),
            SdpError::ChecksumError => fmt::Display::fmt("Checksum Error found", f),
            SdpError::UnknownProduct(pid) => write!(f, "Unknown product id 0x{:08X}", pid),
            SdpError::InvalidState(mode) => write!(f, "Operation not allowed while {}", mode),
            SdpError::NotIdentified => fmt::Display::fmt("Sensor not identified, call begin first", f),
            SdpError::InvalidAddress(address) => {
                write!(f, "Invalid I2C address 0x{:02X} for this sensor", address)
            }
        }
    }
}

impl<E: fmt::Debug> Error for SdpError<E> {}
