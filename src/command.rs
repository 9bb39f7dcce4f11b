// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Two byte I2C commands understood by SDP3x and SDP8xx sensors.

use std::fmt;

/// Commands sent to the sensor, most significant byte first on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Continuous mass flow sampling, averaged until read
    StartContMassFlowAvg,
    /// Continuous mass flow sampling, latest value only
    StartContMassFlow,
    /// Continuous differential pressure sampling, averaged until read
    StartContDiffPressureAvg,
    /// Continuous differential pressure sampling, latest value only
    StartContDiffPressure,
    StopCont,
    TrigMassFlow,
    /// Triggered mass flow reading with clock stretching
    TrigMassFlowStretch,
    TrigDiffPressure,
    /// Triggered differential pressure reading with clock stretching
    TrigDiffPressureStretch,
    /// First half of the product identifier command pair
    ReadInfo1,
    /// Second half of the product identifier command pair
    ReadInfo2,
    /// General call reset. Reaches every device on the bus that supports it.
    SoftReset,
}

impl Command {
    /// Wire bytes of the command.
    pub fn value(&self) -> [u8; 2] {
        match *self {
            Command::StartContMassFlowAvg => [0x36, 0x03],
            Command::StartContMassFlow => [0x36, 0x08],
            Command::StartContDiffPressureAvg => [0x36, 0x15],
            Command::StartContDiffPressure => [0x36, 0x1E],
            Command::StopCont => [0x3F, 0xF9],
            Command::TrigMassFlow => [0x36, 0x24],
            Command::TrigMassFlowStretch => [0x37, 0x26],
            Command::TrigDiffPressure => [0x36, 0x2F],
            Command::TrigDiffPressureStretch => [0x37, 0x2D],
            Command::ReadInfo1 => [0x36, 0x7C],
            Command::ReadInfo2 => [0xE1, 0x02],
            Command::SoftReset => [0x00, 0x06],
        }
    }
}

impl From<Command> for [u8; 2] {
    fn from(command: Command) -> Self {
        command.value()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [msb, lsb] = self.value();
        write!(f, "{:?} (0x{:02X}{:02X})", self, msb, lsb)
    }
}
