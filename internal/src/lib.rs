#![no_std]

use core::fmt;
use core::ops::Not;

/// Logical output level of a pin.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Level {
    #[default]
    Low = 0,
    High = 1,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Pin numbering schemes.
///
/// `Board` addresses pins by their position on the 40-pin header, `Bcm`
/// addresses them by the SoC line behind the header pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Numbering {
    Board,
    Bcm,
}

impl fmt::Display for Numbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numbering::Board => f.write_str("board"),
            Numbering::Bcm => f.write_str("bcm"),
        }
    }
}

/// Number of pins on the header.
pub const HEADER_PINS: u8 = 40;

/// Highest SoC line routed to the header.
pub const MAX_BCM_LINE: u8 = 27;

/// SoC line behind each header pin, indexed by `pin - 1`. Power and ground
/// pins carry no line.
const HEADER: [Option<u8>; HEADER_PINS as usize] = [
    None,     // 1: 3v3
    None,     // 2: 5v
    Some(2),  // 3
    None,     // 4: 5v
    Some(3),  // 5
    None,     // 6: gnd
    Some(4),  // 7
    Some(14), // 8
    None,     // 9: gnd
    Some(15), // 10
    Some(17), // 11
    Some(18), // 12
    Some(27), // 13
    None,     // 14: gnd
    Some(22), // 15
    Some(23), // 16
    None,     // 17: 3v3
    Some(24), // 18
    Some(10), // 19
    None,     // 20: gnd
    Some(9),  // 21
    Some(25), // 22
    Some(11), // 23
    Some(8),  // 24
    None,     // 25: gnd
    Some(7),  // 26
    Some(0),  // 27
    Some(1),  // 28
    Some(5),  // 29
    None,     // 30: gnd
    Some(6),  // 31
    Some(12), // 32
    Some(13), // 33
    None,     // 34: gnd
    Some(19), // 35
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38
    None,     // 39: gnd
    Some(21), // 40
];

/// Resolve a channel number in the given numbering scheme to a SoC line.
///
/// Returns `None` for channels that do not name a GPIO on the header.
pub fn line_for(numbering: Numbering, channel: u8) -> Option<u32> {
    match numbering {
        Numbering::Board => match channel {
            1..=HEADER_PINS => HEADER[usize::from(channel - 1)].map(u32::from),
            _ => None,
        },
        Numbering::Bcm => (channel <= MAX_BCM_LINE).then_some(u32::from(channel)),
    }
}
