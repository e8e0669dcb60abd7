use enum_ordinalize::Ordinalize;

use crate::inputs::InputCode;
use crate::lamps::LampMask;

use super::table::STATES;

/// Dwell times, in ticks of `TICK_MILLIS`.
pub mod dwell {
    use super::Dwell;

    pub const GREEN: Dwell = Dwell::from_ticks(300);
    pub const YELLOW: Dwell = Dwell::from_ticks(150);
    pub const ALL_RED: Dwell = Dwell::from_ticks(50);
    pub const WALK: Dwell = Dwell::from_ticks(200);
    // per blink phase, on or off
    pub const HURRY: Dwell = Dwell::from_ticks(40);
    pub const DONT_WALK: Dwell = Dwell::from_ticks(150);
    // per confirm step, the button is held for four of these
    pub const CONFIRM: Dwell = Dwell::from_ticks(30);
}

pub const TICK_MILLIS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dwell(u16);

impl Dwell {
    pub const fn from_ticks(ticks: u16) -> Self {
        Dwell(ticks)
    }

    pub const fn ticks(self) -> u16 {
        self.0
    }

    pub const fn as_millis(self) -> u64 {
        self.0 as u64 * TICK_MILLIS
    }
}

/*
 * Every state of the intersection.
 *
 * The plain traffic states cycle the two approaches on vehicle demand. Once a
 * walk request is confirmed, the controller moves over to the latched ("r")
 * copies of those states, which look the same on the street but ignore the
 * walk button and lead into a pedestrian phase at the all-red boundary. There
 * are two pedestrian phases so that traffic resumes on the approach that did
 * not have green before it.
 */
#[derive(Ordinalize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StateId {
    NorthGreen,
    NorthYellow,
    AllRedNorthToEast,
    EastGreen,
    EastYellow,
    AllRedEastToNorth,

    LatchedNorthGreen,
    LatchedNorthYellow,
    LatchedAllRedNorthToEast,
    LatchedEastGreen,
    LatchedEastYellow,
    LatchedAllRedEastToNorth,

    WalkNorthToEast,
    HurryOn1NorthToEast,
    HurryOff1NorthToEast,
    HurryOn2NorthToEast,
    HurryOff2NorthToEast,
    DontWalkNorthToEast,

    WalkEastToNorth,
    HurryOn1EastToNorth,
    HurryOff1EastToNorth,
    HurryOn2EastToNorth,
    HurryOff2EastToNorth,
    DontWalkEastToNorth,

    ConfirmNorth1,
    ConfirmNorth2,
    ConfirmNorth3,
    ConfirmNorth4,
    ConfirmEast1,
    ConfirmEast2,
    ConfirmEast3,
    ConfirmEast4,
}

impl StateId {
    pub fn record(self) -> &'static State {
        &STATES[self as usize]
    }

    pub fn next(self, input: InputCode) -> StateId {
        self.record().next[input.index()]
    }

    pub fn label(self) -> &'static str {
        self.record().label
    }

    pub fn lamps(self) -> LampMask {
        self.record().lamps
    }

    pub fn dwell(self) -> Dwell {
        self.record().dwell
    }

    /// Green with no request latched, the only states a confirm chain
    /// starts from.
    pub const fn is_plain_green(self) -> bool {
        matches!(self, StateId::NorthGreen | StateId::EastGreen)
    }

    pub const fn is_request_latched(self) -> bool {
        match self {
            StateId::LatchedNorthGreen
            | StateId::LatchedNorthYellow
            | StateId::LatchedAllRedNorthToEast
            | StateId::LatchedEastGreen
            | StateId::LatchedEastYellow
            | StateId::LatchedAllRedEastToNorth => true,
            StateId::NorthGreen
            | StateId::NorthYellow
            | StateId::AllRedNorthToEast
            | StateId::EastGreen
            | StateId::EastYellow
            | StateId::AllRedEastToNorth
            | StateId::WalkNorthToEast
            | StateId::HurryOn1NorthToEast
            | StateId::HurryOff1NorthToEast
            | StateId::HurryOn2NorthToEast
            | StateId::HurryOff2NorthToEast
            | StateId::DontWalkNorthToEast
            | StateId::WalkEastToNorth
            | StateId::HurryOn1EastToNorth
            | StateId::HurryOff1EastToNorth
            | StateId::HurryOn2EastToNorth
            | StateId::HurryOff2EastToNorth
            | StateId::DontWalkEastToNorth
            | StateId::ConfirmNorth1
            | StateId::ConfirmNorth2
            | StateId::ConfirmNorth3
            | StateId::ConfirmNorth4
            | StateId::ConfirmEast1
            | StateId::ConfirmEast2
            | StateId::ConfirmEast3
            | StateId::ConfirmEast4 => false,
        }
    }

    pub const fn is_pedestrian_phase(self) -> bool {
        match self {
            StateId::WalkNorthToEast
            | StateId::HurryOn1NorthToEast
            | StateId::HurryOff1NorthToEast
            | StateId::HurryOn2NorthToEast
            | StateId::HurryOff2NorthToEast
            | StateId::DontWalkNorthToEast
            | StateId::WalkEastToNorth
            | StateId::HurryOn1EastToNorth
            | StateId::HurryOff1EastToNorth
            | StateId::HurryOn2EastToNorth
            | StateId::HurryOff2EastToNorth
            | StateId::DontWalkEastToNorth => true,
            StateId::NorthGreen
            | StateId::NorthYellow
            | StateId::AllRedNorthToEast
            | StateId::EastGreen
            | StateId::EastYellow
            | StateId::AllRedEastToNorth
            | StateId::LatchedNorthGreen
            | StateId::LatchedNorthYellow
            | StateId::LatchedAllRedNorthToEast
            | StateId::LatchedEastGreen
            | StateId::LatchedEastYellow
            | StateId::LatchedAllRedEastToNorth
            | StateId::ConfirmNorth1
            | StateId::ConfirmNorth2
            | StateId::ConfirmNorth3
            | StateId::ConfirmNorth4
            | StateId::ConfirmEast1
            | StateId::ConfirmEast2
            | StateId::ConfirmEast3
            | StateId::ConfirmEast4 => false,
        }
    }

    pub const fn is_confirming(self) -> bool {
        matches!(
            self,
            StateId::ConfirmNorth1
                | StateId::ConfirmNorth2
                | StateId::ConfirmNorth3
                | StateId::ConfirmNorth4
                | StateId::ConfirmEast1
                | StateId::ConfirmEast2
                | StateId::ConfirmEast3
                | StateId::ConfirmEast4
        )
    }
}

/// One row of the transition table.
#[derive(Debug)]
pub struct State {
    pub id: StateId,
    pub label: &'static str,
    pub lamps: LampMask,
    pub dwell: Dwell,
    /// Next state for each `InputCode`, indexed by `InputCode::index`.
    pub next: [StateId; InputCode::COUNT],
}
