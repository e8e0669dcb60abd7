use enum_ordinalize::Ordinalize;

/// The three sensor lines, numbered by their bit in an `InputCode`.
#[derive(Ordinalize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Sensor {
    East,
    North,
    Walk,
}

impl Sensor {
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/*
 * One sample of all inputs, packed as `(walk << 2) | (north << 1) | east`.
 *
 * The packing is also the index into a state's transition row. Construction
 * drops everything above the low three bits, so an `InputCode` always selects
 * one of the eight entries.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputCode(u8);

impl InputCode {
    pub const COUNT: usize = 8;
    const MASK: u8 = 0b111;

    pub const ALL: [InputCode; InputCode::COUNT] = [
        InputCode(0),
        InputCode(1),
        InputCode(2),
        InputCode(3),
        InputCode(4),
        InputCode(5),
        InputCode(6),
        InputCode(7),
    ];

    pub const fn new(walk: bool, north: bool, east: bool) -> Self {
        InputCode((walk as u8) << 2 | (north as u8) << 1 | east as u8)
    }

    pub const fn from_bits(bits: u8) -> Self {
        InputCode(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_set(self, sensor: Sensor) -> bool {
        self.0 & sensor.bit() != 0
    }

    pub const fn walk(self) -> bool {
        self.is_set(Sensor::Walk)
    }

    pub const fn north(self) -> bool {
        self.is_set(Sensor::North)
    }

    pub const fn east(self) -> bool {
        self.is_set(Sensor::East)
    }

    /// A vehicle waits on either approach.
    pub const fn any_vehicle(self) -> bool {
        self.north() || self.east()
    }
}
