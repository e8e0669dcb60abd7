/*
 * The lamps of the intersection.
 *
 * The controller thinks of its outputs as one byte: a lamp mask where each bit
 * is one lamp, lit or not. This is also exactly what goes into the 74HC595
 * shift register on the board, so one SPI byte plus one latch pulse updates
 * all eight lamps at the same instant. No observer ever sees a half-updated
 * intersection.
 *
 * What the mask does not capture is how the lamps are wired. Some boards drive
 * a lamp by pulling the pin low. That is the job of the `LampLatch`, which
 * turns the logical mask into physical output levels, so that the controller
 * can just use easy to understand `true` for on.
 */

use enum_ordinalize::Ordinalize;

/// The eight lamps, in shift register order (QA..QH = bit 0..7).
#[derive(Ordinalize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Lamp {
    EastGreen,
    EastYellow,
    EastRed,
    NorthGreen,
    NorthYellow,
    NorthRed,
    Walk,
    DontWalk,
}

impl Lamp {
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Approach {
    North,
    East,
}

impl Approach {
    const fn red(self) -> Lamp {
        match self {
            Approach::North => Lamp::NorthRed,
            Approach::East => Lamp::EastRed,
        }
    }

    const fn yellow(self) -> Lamp {
        match self {
            Approach::North => Lamp::NorthYellow,
            Approach::East => Lamp::EastYellow,
        }
    }

    const fn green(self) -> Lamp {
        match self {
            Approach::North => Lamp::NorthGreen,
            Approach::East => Lamp::EastGreen,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LampMask(u8);

impl LampMask {
    pub const ALL_RED: LampMask = LampMask(Lamp::NorthRed.bit() | Lamp::EastRed.bit());

    pub const fn of(lamps: &[Lamp]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < lamps.len() {
            bits |= lamps[i].bit();
            i += 1;
        }
        LampMask(bits)
    }

    pub const fn with(self, lamp: Lamp) -> Self {
        LampMask(self.0 | lamp.bit())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_lit(self, lamp: Lamp) -> bool {
        self.0 & lamp.bit() != 0
    }

    /// Traffic on this approach may move: green or yellow is lit.
    pub const fn proceeds(self, approach: Approach) -> bool {
        self.is_lit(approach.green()) || self.is_lit(approach.yellow())
    }

    /// Traffic on this approach is held: red and nothing else.
    pub const fn holds(self, approach: Approach) -> bool {
        self.is_lit(approach.red()) && !self.proceeds(approach)
    }

    pub const fn is_all_red(self) -> bool {
        self.holds(Approach::North) && self.holds(Approach::East)
    }

    pub const fn shows_pedestrian(self) -> bool {
        self.is_lit(Lamp::Walk) || self.is_lit(Lamp::DontWalk)
    }
}

/// How the lamps are wired to the output stage.
pub struct LampLatch {
    active_lows: [bool; Lamp::VARIANT_COUNT],
}

impl LampLatch {
    pub const fn new(active_lows: [bool; Lamp::VARIANT_COUNT]) -> Self {
        LampLatch { active_lows }
    }

    /// All lamps lit by driving their output high.
    pub const fn active_high() -> Self {
        LampLatch::new([false; Lamp::VARIANT_COUNT])
    }

    pub fn levels(&self, mask: LampMask) -> [bool; Lamp::VARIANT_COUNT] {
        let mut levels = [false; Lamp::VARIANT_COUNT];
        for lamp in Lamp::VARIANTS.iter().copied() {
            let i = lamp.ordinal() as usize;
            levels[i] = mask.is_lit(lamp) != self.active_lows[i];
        }
        levels
    }

    /// The byte to clock into the shift register, bit i drives output Q(i).
    pub fn shift_byte(&self, mask: LampMask) -> u8 {
        self.levels(mask)
            .iter()
            .enumerate()
            .fold(0, |byte, (i, &high)| if high { byte | 1 << i } else { byte })
    }
}
