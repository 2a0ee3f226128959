use super::fms::resolve_target;
use super::route_string;
use super::{
    AltitudeMode, FlightManagementSystem, FlightPhase, FmsError, HEADING_NO_COMMAND, HeadingMode,
    LegType, MODE_PRESET_LOOKUP, MalformedRouteError, ModeController, RESTRICTION_NONE, SpeedMode,
};
use crate::aircraft::AircraftType;
use crate::navigation::{FixRecord, LookupError, NavigationLibrary, Procedure, ProcedureFix};
use crate::util::Vec2D;
use itertools::Itertools;
use rand::Rng;
use strum::IntoEnumIterator;

const FULL_ROUTE: &str = "cowby..bikkr..dag.kepec3.klas";

fn klas_library() -> NavigationLibrary {
    let fixes = vec![
        FixRecord::new("cowby", (10.0, 10.0)),
        FixRecord::new("bikkr", (20.0, 35.0)),
        FixRecord::new("dag", (30.0, 60.0)),
        FixRecord::new("clarr", (35.0, 70.0)),
        FixRecord::new("skebr", (40.0, 80.0)),
        FixRecord::new("ipumy", (45.0, 90.0)),
        FixRecord::new("kepec", (50.0, 100.0)),
        FixRecord::new("klas", (55.0, 110.0)),
        FixRecord::new("boach", (20.0, 20.0)),
        FixRecord::unresolved("misen"),
    ];
    let procedures = vec![
        Procedure::new("kepec3", FlightPhase::Arrival, vec![
            ProcedureFix::new("dag"),
            ProcedureFix::restricted("clarr", 13000, RESTRICTION_NONE),
            ProcedureFix::restricted("skebr", RESTRICTION_NONE, 280),
            ProcedureFix::restricted("ipumy", 11000, 250),
            ProcedureFix::new("kepec"),
            ProcedureFix::new("klas"),
        ]),
        Procedure::with_runways("cowby6", FlightPhase::Departure, &["25r", "25l"], vec![
            ProcedureFix::new("klas"),
            ProcedureFix::new("boach"),
            ProcedureFix::new("cowby"),
        ]),
    ];
    NavigationLibrary::from_records(fixes, procedures)
}

fn b738() -> AircraftType { AircraftType::new("b738", 41000, 460) }

fn arrival_fms<'a>(
    route: &str,
    aircraft_type: &'a AircraftType,
    library: &'a NavigationLibrary,
) -> FlightManagementSystem<'a> {
    FlightManagementSystem::new(route, FlightPhase::Arrival, "25l", aircraft_type, library)
        .expect("arrival fms should build")
}

#[test]
fn test_parse_splits_and_normalizes_segments() {
    let segments = route_string::parse("COWBY..bikkr..DAG.kepec3.KLAS").unwrap();
    assert_eq!(segments, vec!["cowby", "bikkr", "dag.kepec3.klas"]);
    assert_eq!(route_string::parse("cowby").unwrap(), vec!["cowby"]);
    assert_eq!(route_string::parse("@bikkr").unwrap(), vec!["@bikkr"]);
}

#[test]
fn test_parse_rejects_empty_and_malformed_routes() {
    assert_eq!(route_string::parse(""), Err(MalformedRouteError::EmptyRouteString));
    assert_eq!(route_string::parse("   "), Err(MalformedRouteError::EmptyRouteString));
    assert_eq!(
        route_string::parse("cowby...bikkr"),
        Err(MalformedRouteError::UnrecognizedSegment(".bikkr".to_string()))
    );
    assert_eq!(
        route_string::parse("dag.kepec3"),
        Err(MalformedRouteError::UnrecognizedSegment("dag.kepec3".to_string()))
    );
    assert_eq!(
        route_string::parse("dag.kepec3.klas.extra"),
        Err(MalformedRouteError::UnrecognizedSegment("dag.kepec3.klas.extra".to_string()))
    );
}

#[test]
fn test_construction_round_trips_route() {
    let library = klas_library();
    let b738 = b738();
    for route in [FULL_ROUTE, "cowby", "dag.kepec3.klas", "@bikkr..dag.kepec3.klas"] {
        let fms = arrival_fms(route, &b738, &library);
        assert_eq!(fms.current_route(), route);
    }
    let fms = arrival_fms(FULL_ROUTE, &b738, &library);
    assert_eq!(fms.leg_count(), 3);
    assert_eq!(fms.current_waypoint().name(), "cowby");
    assert_eq!(fms.current_leg().leg_type(), LegType::DirectFix);
}

#[test]
fn test_construction_errors() {
    let library = klas_library();
    let b738 = b738();
    let empty =
        FlightManagementSystem::new("", FlightPhase::Arrival, "25l", &b738, &library);
    assert_eq!(empty.err(), Some(FmsError::InvalidInit));
    let blank =
        FlightManagementSystem::new("   ", FlightPhase::Arrival, "25l", &b738, &library);
    assert_eq!(blank.err(), Some(FmsError::InvalidInit));

    let malformed =
        FlightManagementSystem::new("cowby...bikkr", FlightPhase::Arrival, "25l", &b738, &library);
    assert_eq!(
        malformed.err(),
        Some(FmsError::MalformedRoute(MalformedRouteError::UnrecognizedSegment(
            ".bikkr".to_string()
        )))
    );

    let unknown =
        FlightManagementSystem::new("cowby..zzooo", FlightPhase::Arrival, "25l", &b738, &library);
    assert_eq!(unknown.err(), Some(FmsError::Lookup(LookupError::UnknownFix("zzooo".to_string()))));
}

#[test]
fn test_hold_segment_builds_hold_leg() {
    let library = klas_library();
    let b738 = b738();
    let fms = arrival_fms("@bikkr..dag.kepec3.klas", &b738, &library);
    assert_eq!(fms.current_leg().leg_type(), LegType::Hold);
    assert!(fms.current_waypoint().is_hold());
    assert_eq!(fms.current_waypoint().name(), "bikkr");
    assert_eq!(fms.current_route(), "@bikkr..dag.kepec3.klas");
}

#[test]
fn test_walk_full_route_to_completion() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    let mut visited = vec![fms.current_waypoint().name().to_string()];
    loop {
        let has_next = fms.has_next_waypoint();
        let advanced = fms.next_waypoint();
        assert_eq!(
            has_next,
            advanced.is_ok(),
            "has_next_waypoint and next_waypoint disagree at {visited:?}"
        );
        match advanced {
            Ok(()) => visited.push(fms.current_waypoint().name().to_string()),
            Err(err) => {
                assert_eq!(err, FmsError::EndOfRoute);
                break;
            }
        }
    }

    let expected = ["cowby", "bikkr", "dag", "clarr", "skebr", "ipumy", "kepec", "klas"];
    assert_eq!(visited, expected);
    assert!(visited.iter().all_unique());
    // the boundary condition left the final fix current
    assert_eq!(fms.current_waypoint().name(), "klas");
    assert_eq!(fms.leg_count(), 1);
    assert_eq!(fms.next_waypoint(), Err(FmsError::EndOfRoute));
}

#[test]
fn test_has_next_waypoint_counts_following_legs() {
    let library = klas_library();
    let b738 = b738();
    let fms = arrival_fms("cowby..bikkr", &b738, &library);
    // single-entry current leg, but a following leg exists
    assert!(!fms.current_leg().has_next_waypoint());
    assert!(fms.has_next_waypoint());
}

#[test]
fn test_skip_to_waypoint_discards_preceding_legs() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    fms.skip_to_waypoint("KEPEC").unwrap();
    assert_eq!(fms.current_waypoint().name(), "kepec");
    assert_eq!(fms.leg_count(), 1);
    assert_eq!(fms.current_leg().current_index(), 4);
    assert!(fms.has_next_waypoint());

    fms.next_waypoint().unwrap();
    assert_eq!(fms.current_waypoint().name(), "klas");
    assert_eq!(fms.next_waypoint(), Err(FmsError::EndOfRoute));
}

#[test]
fn test_skip_to_waypoint_within_later_leg_keeps_that_leg() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    fms.skip_to_waypoint("bikkr").unwrap();
    assert_eq!(fms.leg_count(), 2);
    assert_eq!(fms.current_waypoint().name(), "bikkr");

    // skipping to the waypoint already current discards nothing
    fms.skip_to_waypoint("bikkr").unwrap();
    assert_eq!(fms.leg_count(), 2);
}

#[test]
fn test_skip_to_unknown_waypoint_mutates_nothing() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    let miss = fms.skip_to_waypoint("zzooo");
    assert_eq!(miss, Err(FmsError::WaypointNotFound("zzooo".to_string())));
    assert_eq!(fms.leg_count(), 3);
    assert_eq!(fms.current_waypoint().name(), "cowby");
    assert_eq!(fms.current_route(), FULL_ROUTE);
}

#[test]
fn test_altitude_precedence() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    // no restriction, deferring mode: the service ceiling wins
    assert_eq!(fms.mode_controller().altitude_mode(), AltitudeMode::Vnav);
    assert_eq!(fms.get_altitude(), 41000);

    // route restriction wins over the ceiling while deferring
    fms.skip_to_waypoint("ipumy").unwrap();
    assert_eq!(fms.get_altitude(), 11000);

    // the held MCP altitude wins regardless of the restriction
    fms.set_altitude(AltitudeMode::Hold, 9000);
    assert_eq!(fms.get_altitude(), 9000);

    fms.set_altitude(AltitudeMode::Vnav, 9000);
    assert_eq!(fms.get_altitude(), 11000);
}

#[test]
fn test_speed_precedence() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    assert_eq!(fms.get_speed(), 460);

    fms.skip_to_waypoint("skebr").unwrap();
    assert_eq!(fms.get_speed(), 280);

    fms.set_speed(SpeedMode::Hold, 250);
    assert_eq!(fms.get_speed(), 250);

    fms.set_speed(SpeedMode::Vnav, 250);
    assert_eq!(fms.get_speed(), 280);
}

#[test]
fn test_heading_sentinel_and_hold() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    assert_eq!(fms.get_heading(), HEADING_NO_COMMAND);

    fms.set_heading(HeadingMode::Hold, 251.0);
    assert_eq!(fms.get_heading(), 251.0);

    fms.set_heading(HeadingMode::Lnav, 251.0);
    assert_eq!(fms.get_heading(), HEADING_NO_COMMAND);
}

#[test]
fn test_resolve_target_precedence_table() {
    assert_eq!(resolve_target(41000, None, None), 41000);
    assert_eq!(resolve_target(41000, Some(11000), None), 11000);
    assert_eq!(resolve_target(41000, None, Some(9000)), 9000);
    assert_eq!(resolve_target(41000, Some(11000), Some(9000)), 9000);
}

#[test]
fn test_mode_presets_defer_every_axis() {
    for phase in FlightPhase::iter() {
        let preset = MODE_PRESET_LOOKUP[&phase];
        assert_eq!(preset.altitude_mode, AltitudeMode::Vnav, "{phase} altitude preset");
        assert_eq!(preset.heading_mode, HeadingMode::Lnav, "{phase} heading preset");
        assert_eq!(preset.speed_mode, SpeedMode::Vnav, "{phase} speed preset");
    }

    let mut controller = ModeController::new();
    controller.set_altitude(AltitudeMode::Hold, 9000);
    controller.set_modes_for_arrival();
    assert_eq!(controller.altitude_mode(), AltitudeMode::Vnav);
    // the held value survives the preset; it is meaningless until Hold returns
    assert_eq!(controller.altitude(), 9000);
}

#[test]
fn test_next_waypoint_position() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    // next entry lives in the following leg while the current leg is exhausted
    assert_eq!(fms.get_next_waypoint_position(), Some(Vec2D::new(20.0, 35.0)));

    fms.skip_to_waypoint("kepec").unwrap();
    assert_eq!(fms.get_next_waypoint_position(), Some(Vec2D::new(55.0, 110.0)));

    fms.skip_to_waypoint("klas").unwrap();
    assert_eq!(fms.get_next_waypoint_position(), None);
}

#[test]
fn test_next_waypoint_position_unresolved_fix() {
    let library = klas_library();
    let b738 = b738();
    let fms = arrival_fms("cowby..misen", &b738, &library);
    assert!(fms.has_next_waypoint());
    assert_eq!(fms.get_next_waypoint_position(), None);
}

#[test]
fn test_add_leg_to_beginning() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms("dag.kepec3.klas", &b738, &library);

    fms.add_leg_to_beginning("cowby").unwrap();
    assert_eq!(fms.leg_count(), 2);
    assert_eq!(fms.current_waypoint().name(), "cowby");
    assert_eq!(fms.current_route(), "cowby..dag.kepec3.klas");

    // a rejected insertion leaves the collection untouched
    let malformed = fms.add_leg_to_beginning("dag.kepec3");
    assert!(matches!(malformed, Err(FmsError::MalformedRoute(_))));
    let multi = fms.add_leg_to_beginning("cowby..bikkr");
    assert!(matches!(multi, Err(FmsError::MalformedRoute(_))));
    assert_eq!(fms.current_route(), "cowby..dag.kepec3.klas");
}

#[test]
fn test_replace_route() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    fms.replace_route("cowby..bikkr").unwrap();
    assert_eq!(fms.leg_count(), 2);
    assert_eq!(fms.current_route(), "cowby..bikkr");

    // a SID cannot replace an arrival's route; prior state survives
    let mismatch = fms.replace_route("klas.cowby6.cowby");
    assert_eq!(
        mismatch,
        Err(FmsError::Lookup(LookupError::PhaseMismatch {
            procedure: "cowby6".to_string(),
            phase: FlightPhase::Arrival,
        }))
    );
    assert_eq!(fms.current_route(), "cowby..bikkr");
}

#[test]
fn test_departure_procedure_respects_runway() {
    let library = klas_library();
    let b738 = b738();

    let departure = FlightManagementSystem::new(
        "klas.cowby6.cowby",
        FlightPhase::Departure,
        "25r",
        &b738,
        &library,
    )
    .expect("published runway should build");
    assert_eq!(departure.current_waypoint().name(), "klas");
    assert_eq!(departure.current_leg().waypoint_count(), 3);

    let wrong_runway = FlightManagementSystem::new(
        "klas.cowby6.cowby",
        FlightPhase::Departure,
        "01l",
        &b738,
        &library,
    );
    assert_eq!(
        wrong_runway.err(),
        Some(FmsError::Lookup(LookupError::UnknownRunway {
            procedure: "cowby6".to_string(),
            runway: "01l".to_string(),
        }))
    );
}

#[test]
fn test_set_flight_phase_applies_preset() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);

    fms.set_heading(HeadingMode::Hold, 180.0);
    fms.set_flight_phase(FlightPhase::Departure);
    assert_eq!(fms.current_phase(), FlightPhase::Departure);
    assert_eq!(fms.mode_controller().heading_mode(), HeadingMode::Lnav);

    // re-entering the same phase is a no-op
    fms.set_heading(HeadingMode::Hold, 180.0);
    fms.set_flight_phase(FlightPhase::Departure);
    assert_eq!(fms.mode_controller().heading_mode(), HeadingMode::Hold);
}

#[test]
fn test_teardown_clears_legs() {
    let library = klas_library();
    let b738 = b738();
    let mut fms = arrival_fms(FULL_ROUTE, &b738, &library);
    fms.teardown();
    assert_eq!(fms.leg_count(), 0);
}

#[test]
fn test_random_direct_fix_route_walk() {
    let library = klas_library();
    let b738 = b738();
    let pool = ["cowby", "bikkr", "dag", "clarr", "skebr", "ipumy", "kepec"];
    let mut rng = rand::rng();

    for _ in 0..20 {
        let len = rng.random_range(2..=6);
        let segments: Vec<&str> =
            (0..len).map(|_| pool[rng.random_range(0..pool.len())]).collect();
        let route = segments.iter().join("..");
        println!("walking randomized route {route}");

        let mut fms = arrival_fms(&route, &b738, &library);
        assert_eq!(fms.current_route(), route);

        let mut visited = vec![fms.current_waypoint().name().to_string()];
        while fms.has_next_waypoint() {
            fms.next_waypoint().unwrap();
            visited.push(fms.current_waypoint().name().to_string());
        }
        assert_eq!(visited, segments);
        assert_eq!(fms.next_waypoint(), Err(FmsError::EndOfRoute));
    }
}
