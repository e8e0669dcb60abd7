mod common;

use common::{EAST, IDLE, NORTH, Rig, WALK};
use despi_m02_crossing::crossing::Controller;
use despi_m02_crossing::crossing::state::StateId::{self, *};
use despi_m02_crossing::inputs::InputCode;
use despi_m02_crossing::lamps::{Lamp, LampMask};

const WALK_NORTH: InputCode = InputCode::new(true, true, false);
const WALK_BOTH: InputCode = InputCode::new(true, true, true);

fn lamps(lamps: &[Lamp]) -> LampMask {
    LampMask::of(lamps)
}

#[test]
fn north_green_hands_over_to_east_on_east_demand() {
    let mut rig = Rig::starting_in(NorthGreen);

    let visited = rig.transitions_on(&[EAST, IDLE, IDLE]);
    assert_eq!(visited, vec![NorthYellow, AllRedNorthToEast, EastGreen]);

    assert_eq!(
        rig.street.shown,
        vec![
            lamps(&[Lamp::NorthGreen, Lamp::EastRed]),
            lamps(&[Lamp::NorthYellow, Lamp::EastRed]),
            lamps(&[Lamp::NorthRed, Lamp::EastRed]),
            lamps(&[Lamp::EastGreen, Lamp::NorthRed]),
        ]
    );
    assert_eq!(rig.status.labels, vec!["N_G", "N_Y", "AR_N2E", "E_G"]);
}

#[test]
fn east_green_hands_over_to_north_on_north_demand() {
    let mut rig = Rig::starting_in(EastGreen);

    assert_eq!(rig.transition_on(EAST), EastGreen);
    let visited = rig.transitions_on(&[NORTH, EAST, EAST]);
    assert_eq!(visited, vec![EastYellow, AllRedEastToNorth, NorthGreen]);
}

#[test]
fn greens_yield_to_cross_traffic_only() {
    // north green ignores its own demand, east green ignores its own
    assert_eq!(NorthGreen.next(NORTH), NorthGreen);
    assert_eq!(NorthGreen.next(EAST), NorthYellow);
    assert_eq!(EastGreen.next(EAST), EastGreen);
    assert_eq!(EastGreen.next(NORTH), EastYellow);
    assert_eq!(NorthGreen.next(InputCode::new(false, true, true)), NorthYellow);
    assert_eq!(EastGreen.next(InputCode::new(false, true, true)), EastYellow);
}

#[test]
fn green_without_demand_stays_and_reports_once() {
    let mut rig = Rig::starting_in(NorthGreen);

    let visited = rig.transitions_on(&[IDLE, NORTH, IDLE]);
    assert_eq!(visited, vec![NorthGreen; 3]);

    // the lamps are applied again on every visit, the label only once
    assert_eq!(rig.street.shown.len(), 4);
    assert_eq!(rig.status.labels, vec!["N_G"]);
}

#[test]
fn released_button_aborts_the_confirm_chain() {
    for held_for in 1..=4 {
        let mut rig = Rig::starting_in(NorthGreen);

        let mut script = vec![WALK; held_for];
        script.push(IDLE);
        let visited = rig.transitions_on(&script);

        assert_eq!(visited.last(), Some(&NorthGreen), "held for {held_for}");
        assert!(visited[..held_for].iter().all(|s| s.is_confirming()));
        assert!(
            rig.street
                .shown
                .iter()
                .all(|&shown| shown == NorthGreen.lamps()),
            "lamps changed while confirming"
        );
    }
}

#[test]
fn aborted_request_is_not_latched() {
    let mut rig = Rig::starting_in(NorthGreen);
    rig.transitions_on(&[WALK, WALK, IDLE]);
    assert_eq!(rig.state(), NorthGreen);

    // a single later press starts over at the first confirm step
    assert_eq!(rig.transition_on(WALK), ConfirmNorth1);
    assert_eq!(rig.transition_on(IDLE), NorthGreen);
    assert_eq!(rig.transition_on(EAST), NorthYellow);
    assert_eq!(rig.transition_on(IDLE), AllRedNorthToEast);
    assert_eq!(rig.transition_on(WALK), EastGreen);
}

#[test]
fn confirmed_request_without_traffic_walks_right_away() {
    let mut rig = Rig::starting_in(NorthGreen);

    let confirming = rig.transitions_on(&[WALK; 5]);
    assert_eq!(
        confirming,
        vec![ConfirmNorth1, ConfirmNorth2, ConfirmNorth3, ConfirmNorth4, LatchedNorthYellow]
    );

    let phase = rig.transitions_on(&[WALK; 9]);
    assert_eq!(
        phase,
        vec![
            LatchedAllRedNorthToEast,
            WalkNorthToEast,
            HurryOn1NorthToEast,
            HurryOff1NorthToEast,
            HurryOn2NorthToEast,
            HurryOff2NorthToEast,
            DontWalkNorthToEast,
            EastGreen,
            ConfirmEast1,
        ]
    );

    let all_red = lamps(&[Lamp::NorthRed, Lamp::EastRed]);
    let shown = &rig.street.shown;
    let walk_at = shown.len() - 8;
    assert_eq!(shown[walk_at], all_red.with(Lamp::Walk));
    assert_eq!(shown[walk_at + 1], all_red.with(Lamp::DontWalk));
    assert_eq!(shown[walk_at + 2], all_red);
    assert_eq!(shown[walk_at + 3], all_red.with(Lamp::DontWalk));
    assert_eq!(shown[walk_at + 4], all_red);
    assert_eq!(shown[walk_at + 5], all_red.with(Lamp::DontWalk));
}

#[test]
fn confirmed_request_with_traffic_finishes_the_green() {
    let mut rig = Rig::starting_in(NorthGreen);

    let confirming = rig.transitions_on(&[WALK_NORTH; 5]);
    assert_eq!(confirming.last(), Some(&LatchedNorthGreen));

    // latched green keeps serving north, the button no longer matters
    assert_eq!(rig.transition_on(WALK_NORTH), LatchedNorthGreen);
    assert_eq!(rig.transition_on(NORTH), LatchedNorthGreen);

    let visited = rig.transitions_on(&[WALK_BOTH, IDLE, IDLE]);
    assert_eq!(visited, vec![LatchedNorthYellow, LatchedAllRedNorthToEast, WalkNorthToEast]);
}

#[test]
fn east_side_request_returns_traffic_to_north() {
    let mut rig = Rig::starting_in(EastGreen);

    let confirming = rig.transitions_on(&[InputCode::new(true, false, true); 5]);
    assert_eq!(confirming.last(), Some(&LatchedEastGreen));

    let visited = rig.transitions_on(&[NORTH, IDLE, IDLE]);
    assert_eq!(visited, vec![LatchedEastYellow, LatchedAllRedEastToNorth, WalkEastToNorth]);

    let phase = rig.transitions_on(&[WALK_BOTH; 6]);
    assert_eq!(phase.last(), Some(&NorthGreen));
    assert_eq!(
        rig.status.labels[rig.status.labels.len() - 7..],
        ["WALK_E2N", "H1_ON_E2N", "H1_OFF_E2N", "H2_ON_E2N", "H2_OFF_E2N", "DONT_E2N", "N_G"]
    );
}

#[test]
fn second_request_runs_its_own_confirm_chain() {
    let mut rig = Rig::starting_in(NorthGreen);
    rig.transitions_on(&[WALK; 5]);
    rig.transitions_on(&[IDLE; 8]);
    assert_eq!(rig.state(), EastGreen);

    // plain green, so the next press must confirm again
    assert_eq!(rig.transition_on(WALK), ConfirmEast1);
    assert_eq!(rig.transition_on(IDLE), EastGreen);
}

#[test]
fn each_visit_lasts_its_dwell() {
    let mut rig = Rig::starting_in(NorthGreen);
    let mut expected: u64 = 0;
    let mut state: StateId = NorthGreen;

    for input in [EAST, IDLE, IDLE, WALK, WALK, IDLE] {
        expected += state.dwell().ticks() as u64;
        state = rig.transition_on(input);
    }

    // every tick before the last sample belongs to exactly one visit
    let ticks = expected + 1;
    let mut replay = Rig::starting_in(NorthGreen);
    for input in [EAST, IDLE, IDLE, WALK, WALK, IDLE] {
        replay.sensors.queued.push_back(input);
    }
    for _ in 0..ticks {
        replay.tick();
    }
    assert_eq!(replay.sensors.samples, 6);
    assert_eq!(replay.state(), state);
}

#[test]
fn boot_starts_on_the_waiting_side() {
    let mut rig = Rig::starting_in(NorthGreen);
    rig.sensors.held = EAST;
    let controller = Controller::boot(&mut rig.sensors);
    assert_eq!(controller.state(), EastGreen);

    rig.sensors.held = WALK_NORTH;
    let controller = Controller::boot(&mut rig.sensors);
    assert_eq!(controller.state(), NorthGreen);
}
