/*
 * The transition table of the intersection.
 *
 * This is the whole behaviour of the controller, written as data. Every state
 * has a label for the status line, the lamps it lights, how long it dwells and
 * one next state for each of the eight input codes. Rows with a walk half are
 * written as two groups of four, ordered by the (north, east) sensor pair:
 * 00, 01, 10, 11.
 *
 * The table is checked when the crate is built. A row that lights both
 * approaches, shows a pedestrian aspect without all-red, has no dwell or
 * cannot get back to a green or a walk, fails compilation.
 */

use core::fmt;

use enum_ordinalize::Ordinalize;

use crate::inputs::InputCode;
use crate::lamps::{Approach, Lamp, LampMask};

use super::state::{Dwell, State, StateId, dwell};

const NG_ER: LampMask = LampMask::of(&[Lamp::NorthGreen, Lamp::EastRed]);
const NY_ER: LampMask = LampMask::of(&[Lamp::NorthYellow, Lamp::EastRed]);
const EG_NR: LampMask = LampMask::of(&[Lamp::EastGreen, Lamp::NorthRed]);
const EY_NR: LampMask = LampMask::of(&[Lamp::EastYellow, Lamp::NorthRed]);
const ALL_RED: LampMask = LampMask::ALL_RED;
const WALK: LampMask = LampMask::ALL_RED.with(Lamp::Walk);
const DONT_WALK: LampMask = LampMask::ALL_RED.with(Lamp::DontWalk);

type Row = [StateId; InputCode::COUNT];

const fn always(to: StateId) -> Row {
    [to; InputCode::COUNT]
}

const fn by_walk(released: [StateId; 4], held: [StateId; 4]) -> Row {
    let mut row = always(released[0]);
    let mut i = 0;
    while i < 4 {
        row[i] = released[i];
        row[i + 4] = held[i];
        i += 1;
    }
    row
}

const fn ignoring_walk(by_demand: [StateId; 4]) -> Row {
    by_walk(by_demand, by_demand)
}

const fn state(id: StateId, label: &'static str, lamps: LampMask, dwell: Dwell, next: Row) -> State {
    State {
        id,
        label,
        lamps,
        dwell,
        next,
    }
}

use StateId::*;

pub const TABLE: [State; StateId::VARIANT_COUNT] = [
    // Traffic, no request.
    //
    // The two greens do not yield on the same demand: north green gives way
    // when the east sensor is set, east green gives way when the north sensor
    // is set. Each waits for cross traffic, not for its own.
    state(
        NorthGreen,
        "N_G",
        NG_ER,
        dwell::GREEN,
        by_walk(
            [NorthGreen, NorthYellow, NorthGreen, NorthYellow],
            [ConfirmNorth1; 4],
        ),
    ),
    state(NorthYellow, "N_Y", NY_ER, dwell::YELLOW, always(AllRedNorthToEast)),
    state(AllRedNorthToEast, "AR_N2E", ALL_RED, dwell::ALL_RED, always(EastGreen)),
    state(
        EastGreen,
        "E_G",
        EG_NR,
        dwell::GREEN,
        by_walk(
            [EastGreen, EastGreen, EastYellow, EastYellow],
            [ConfirmEast1; 4],
        ),
    ),
    state(EastYellow, "E_Y", EY_NR, dwell::YELLOW, always(AllRedEastToNorth)),
    state(AllRedEastToNorth, "AR_E2N", ALL_RED, dwell::ALL_RED, always(NorthGreen)),
    // Traffic, request latched. Same lamps, walk is ignored, all-red leads
    // into the pedestrian phase instead of the other green.
    state(
        LatchedNorthGreen,
        "rN_G",
        NG_ER,
        dwell::GREEN,
        ignoring_walk([
            LatchedNorthGreen,
            LatchedNorthYellow,
            LatchedNorthGreen,
            LatchedNorthYellow,
        ]),
    ),
    state(LatchedNorthYellow, "rN_Y", NY_ER, dwell::YELLOW, always(LatchedAllRedNorthToEast)),
    state(LatchedAllRedNorthToEast, "rAR_N2E", ALL_RED, dwell::ALL_RED, always(WalkNorthToEast)),
    state(
        LatchedEastGreen,
        "rE_G",
        EG_NR,
        dwell::GREEN,
        ignoring_walk([
            LatchedEastGreen,
            LatchedEastGreen,
            LatchedEastYellow,
            LatchedEastYellow,
        ]),
    ),
    state(LatchedEastYellow, "rE_Y", EY_NR, dwell::YELLOW, always(LatchedAllRedEastToNorth)),
    state(LatchedAllRedEastToNorth, "rAR_E2N", ALL_RED, dwell::ALL_RED, always(WalkEastToNorth)),
    // Pedestrian phase after north green, traffic resumes on east.
    state(WalkNorthToEast, "WALK_N2E", WALK, dwell::WALK, always(HurryOn1NorthToEast)),
    state(HurryOn1NorthToEast, "H1_ON_N2E", DONT_WALK, dwell::HURRY, always(HurryOff1NorthToEast)),
    state(HurryOff1NorthToEast, "H1_OFF_N2E", ALL_RED, dwell::HURRY, always(HurryOn2NorthToEast)),
    state(HurryOn2NorthToEast, "H2_ON_N2E", DONT_WALK, dwell::HURRY, always(HurryOff2NorthToEast)),
    state(HurryOff2NorthToEast, "H2_OFF_N2E", ALL_RED, dwell::HURRY, always(DontWalkNorthToEast)),
    state(DontWalkNorthToEast, "DONT_N2E", DONT_WALK, dwell::DONT_WALK, always(EastGreen)),
    // Pedestrian phase after east green, traffic resumes on north.
    state(WalkEastToNorth, "WALK_E2N", WALK, dwell::WALK, always(HurryOn1EastToNorth)),
    state(HurryOn1EastToNorth, "H1_ON_E2N", DONT_WALK, dwell::HURRY, always(HurryOff1EastToNorth)),
    state(HurryOff1EastToNorth, "H1_OFF_E2N", ALL_RED, dwell::HURRY, always(HurryOn2EastToNorth)),
    state(HurryOn2EastToNorth, "H2_ON_E2N", DONT_WALK, dwell::HURRY, always(HurryOff2EastToNorth)),
    state(HurryOff2EastToNorth, "H2_OFF_E2N", ALL_RED, dwell::HURRY, always(DontWalkEastToNorth)),
    state(DontWalkEastToNorth, "DONT_E2N", DONT_WALK, dwell::DONT_WALK, always(NorthGreen)),
    // Confirm chains. The lamps stay as they were on green. Releasing the
    // button on any step drops back to plain green, holding it through the
    // last step latches the request. With no vehicle waiting the latch goes
    // straight to yellow.
    state(ConfirmNorth1, "ConfN1", NG_ER, dwell::CONFIRM, by_walk([NorthGreen; 4], [ConfirmNorth2; 4])),
    state(ConfirmNorth2, "ConfN2", NG_ER, dwell::CONFIRM, by_walk([NorthGreen; 4], [ConfirmNorth3; 4])),
    state(ConfirmNorth3, "ConfN3", NG_ER, dwell::CONFIRM, by_walk([NorthGreen; 4], [ConfirmNorth4; 4])),
    state(
        ConfirmNorth4,
        "ConfN4",
        NG_ER,
        dwell::CONFIRM,
        by_walk(
            [NorthGreen; 4],
            [LatchedNorthYellow, LatchedNorthGreen, LatchedNorthGreen, LatchedNorthGreen],
        ),
    ),
    state(ConfirmEast1, "ConfE1", EG_NR, dwell::CONFIRM, by_walk([EastGreen; 4], [ConfirmEast2; 4])),
    state(ConfirmEast2, "ConfE2", EG_NR, dwell::CONFIRM, by_walk([EastGreen; 4], [ConfirmEast3; 4])),
    state(ConfirmEast3, "ConfE3", EG_NR, dwell::CONFIRM, by_walk([EastGreen; 4], [ConfirmEast4; 4])),
    state(
        ConfirmEast4,
        "ConfE4",
        EG_NR,
        dwell::CONFIRM,
        by_walk(
            [EastGreen; 4],
            [LatchedEastYellow, LatchedEastGreen, LatchedEastGreen, LatchedEastGreen],
        ),
    ),
];

pub static STATES: [State; StateId::VARIANT_COUNT] = TABLE;

const _: () = match audit(&TABLE) {
    Ok(()) => {}
    Err(_) => panic!("the transition table violates an intersection invariant"),
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableFault {
    /// The row at this position belongs to another state.
    Misindexed(StateId),
    ZeroDwell(StateId),
    /// Both approaches show green or yellow.
    ConflictingApproaches(StateId),
    /// Walk or don't-walk shown while traffic is not held on both approaches.
    PedestrianWithoutAllRed(StateId),
    /// Holding this input forever never reaches a green or walk state.
    NoProgress(StateId, InputCode),
}

impl fmt::Display for TableFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFault::Misindexed(id) => write!(f, "row of {id:?} is stored at the wrong index"),
            TableFault::ZeroDwell(id) => write!(f, "{id:?} has no dwell"),
            TableFault::ConflictingApproaches(id) => {
                write!(f, "{id:?} lets both approaches proceed")
            }
            TableFault::PedestrianWithoutAllRed(id) => {
                write!(f, "{id:?} shows a pedestrian aspect without all-red")
            }
            TableFault::NoProgress(id, input) => write!(
                f,
                "{id:?} never reaches green or walk with input {:03b} held",
                input.bits()
            ),
        }
    }
}

const fn is_settled(row: &State) -> bool {
    row.lamps.is_lit(Lamp::NorthGreen) || row.lamps.is_lit(Lamp::EastGreen) || row.id.is_pedestrian_phase()
}

/// Check a table against the intersection invariants. Totality and dangling
/// references cannot happen, every row is an array of `StateId`s.
pub const fn audit(table: &[State; StateId::VARIANT_COUNT]) -> Result<(), TableFault> {
    let mut i = 0;
    while i < table.len() {
        let row = &table[i];
        if row.id as usize != i {
            return Err(TableFault::Misindexed(row.id));
        }
        if row.dwell.ticks() == 0 {
            return Err(TableFault::ZeroDwell(row.id));
        }
        if row.lamps.proceeds(Approach::North) && row.lamps.proceeds(Approach::East) {
            return Err(TableFault::ConflictingApproaches(row.id));
        }
        if row.lamps.shows_pedestrian() && !row.lamps.is_all_red() {
            return Err(TableFault::PedestrianWithoutAllRed(row.id));
        }
        i += 1;
    }

    // Only safe to follow `next` once every row sits at its own index.
    let mut i = 0;
    while i < table.len() {
        let mut c = 0;
        while c < InputCode::COUNT {
            let mut at = &table[i];
            let mut steps = 0;
            while !is_settled(at) {
                if steps == table.len() {
                    return Err(TableFault::NoProgress(table[i].id, InputCode::ALL[c]));
                }
                at = &table[at.next[c] as usize];
                steps += 1;
            }
            c += 1;
        }
        i += 1;
    }

    Ok(())
}
