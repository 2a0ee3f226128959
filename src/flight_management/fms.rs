use super::flight_phase::FlightPhase;
use super::leg::Leg;
use super::mode_controller::{AltitudeMode, HeadingMode, ModeController, SpeedMode};
use super::route_string::{self, MalformedRouteError};
use super::waypoint::WaypointEntry;
use crate::aircraft::AircraftType;
use crate::navigation::{LookupError, NavigationLibrary};
use crate::util::Vec2D;
use crate::{event, fatal, info, log, warn};
use itertools::Itertools;
use std::collections::VecDeque;
use std::fmt;

/// Commanded-heading sentinel: no heading is commanded and the simulation
/// loop should fly lateral route guidance instead.
pub const HEADING_NO_COMMAND: f64 = -999.0;

/// Errors surfaced by flight management system operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FmsError {
    /// Construction-time: the initialization payload carried no route.
    InvalidInit,
    /// The route text does not parse; the attempted change was rejected.
    MalformedRoute(MalformedRouteError),
    /// A navigation lookup failed; the responsible route build failed as
    /// a whole.
    Lookup(LookupError),
    /// No leg contains a waypoint with the requested name; nothing was
    /// discarded.
    WaypointNotFound(String),
    /// Neither a next waypoint nor a next leg exists.
    EndOfRoute,
}

impl fmt::Display for FmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmsError::InvalidInit => write!(f, "initialization payload is missing a route"),
            FmsError::MalformedRoute(err) => write!(f, "malformed route: {err}"),
            FmsError::Lookup(err) => write!(f, "navigation lookup failed: {err}"),
            FmsError::WaypointNotFound(name) => {
                write!(f, "no waypoint named {name} in any leg")
            }
            FmsError::EndOfRoute => write!(f, "at the end of the route"),
        }
    }
}

impl From<MalformedRouteError> for FmsError {
    fn from(err: MalformedRouteError) -> Self { FmsError::MalformedRoute(err) }
}

impl From<LookupError> for FmsError {
    fn from(err: LookupError) -> Self { FmsError::Lookup(err) }
}

/// Uniform precedence evaluation shared by every axis: the MCP override
/// wins over the route-derived override, which wins over the base value.
pub(crate) fn resolve_target<T>(base: T, route_override: Option<T>, mcp_override: Option<T>) -> T {
    mcp_override.or(route_override).unwrap_or(base)
}

/// Orchestrator owning the ordered leg sequence and the mode controller.
///
/// The head of the leg collection is always the current leg. All
/// operations run synchronously inside one simulation tick; nothing here
/// blocks or suspends. The navigation library and aircraft type are
/// borrowed read-only collaborators and may be shared across many
/// instances.
#[derive(Debug)]
pub struct FlightManagementSystem<'a> {
    leg_collection: VecDeque<Leg>,
    mode_controller: ModeController,
    current_phase: FlightPhase,
    runway_name: String,
    aircraft_type: &'a AircraftType,
    navigation_library: &'a NavigationLibrary,
}

impl<'a> FlightManagementSystem<'a> {
    /// Builds a flight management system from an initial route.
    ///
    /// The route text is parsed into segments, each segment becomes one
    /// leg, and the mode controller starts on the preset row of the given
    /// phase.
    ///
    /// # Arguments
    /// * `route` - The initial route text, e.g. `cowby..bikkr..dag.kepec3.klas`.
    /// * `phase` - The side of the operation the aircraft is flying.
    /// * `runway` - The runway assigned to the aircraft.
    /// * `aircraft_type` - Static performance data for target resolution.
    /// * `navigation_library` - Fix and procedure resolution.
    pub fn new(
        route: &str,
        phase: FlightPhase,
        runway: &str,
        aircraft_type: &'a AircraftType,
        navigation_library: &'a NavigationLibrary,
    ) -> Result<Self, FmsError> {
        if route.trim().is_empty() {
            return Err(FmsError::InvalidInit);
        }
        let leg_collection = Self::build_legs(route, runway, phase, navigation_library)?;
        let mut mode_controller = ModeController::new();
        match phase {
            FlightPhase::Arrival => mode_controller.set_modes_for_arrival(),
            FlightPhase::Departure => mode_controller.set_modes_for_departure(),
        }
        let fms = FlightManagementSystem {
            leg_collection,
            mode_controller,
            current_phase: phase,
            runway_name: runway.to_lowercase(),
            aircraft_type,
            navigation_library,
        };
        info!("fms initialized for {} on runway {} with route {}", phase, fms.runway_name, fms.current_route());
        Ok(fms)
    }

    fn build_legs(
        route: &str,
        runway: &str,
        phase: FlightPhase,
        navigation_library: &NavigationLibrary,
    ) -> Result<VecDeque<Leg>, FmsError> {
        let segments = route_string::parse(route)?;
        let mut legs = VecDeque::with_capacity(segments.len());
        for segment in &segments {
            legs.push_back(Leg::from_route_segment(segment, runway, phase, navigation_library)?);
        }
        Ok(legs)
    }

    /// The head leg of the collection.
    pub fn current_leg(&self) -> &Leg {
        self.leg_collection.front().unwrap_or_else(|| fatal!("fms has no legs left"))
    }

    /// The current leg's entry under its cursor.
    pub fn current_waypoint(&self) -> &WaypointEntry { self.current_leg().current_waypoint() }

    /// The full route re-rendered from the leg collection.
    pub fn current_route(&self) -> String { route_string::format(&self.leg_collection) }

    /// Returns the number of legs remaining in the collection.
    pub fn leg_count(&self) -> usize { self.leg_collection.len() }
    /// Returns the flight phase the aircraft is operating in.
    pub fn current_phase(&self) -> FlightPhase { self.current_phase }
    /// Returns the currently assigned runway.
    pub fn runway_name(&self) -> &str { &self.runway_name }
    /// Read access to the mode control panel.
    pub fn mode_controller(&self) -> &ModeController { &self.mode_controller }

    /// Resolves the target altitude in feet.
    ///
    /// Precedence, lowest to highest: type service ceiling, the current
    /// waypoint's altitude restriction, the held MCP altitude while the
    /// altitude mode is `Hold`. `Vnav` adds nothing beyond the
    /// restriction layer.
    pub fn get_altitude(&self) -> i32 {
        let waypoint = self.current_waypoint();
        let route_override =
            waypoint.has_altitude_restriction().then(|| waypoint.altitude_restriction());
        let mcp_override = (self.mode_controller.altitude_mode() == AltitudeMode::Hold)
            .then(|| self.mode_controller.altitude());
        resolve_target(self.aircraft_type.ceiling(), route_override, mcp_override)
    }

    /// Resolves the commanded heading in degrees.
    ///
    /// [`HEADING_NO_COMMAND`] unless the heading mode is `Hold`, in which
    /// case the held MCP heading is returned exactly. `Lnav` keeps the
    /// sentinel, telling the simulation loop to fly lateral route
    /// guidance.
    pub fn get_heading(&self) -> f64 {
        let mcp_override = (self.mode_controller.heading_mode() == HeadingMode::Hold)
            .then(|| self.mode_controller.heading());
        resolve_target(HEADING_NO_COMMAND, None, mcp_override)
    }

    /// Resolves the target speed in knots.
    ///
    /// Same precedence pattern as [`get_altitude`](Self::get_altitude),
    /// starting from the type's cruise speed.
    pub fn get_speed(&self) -> i32 {
        let waypoint = self.current_waypoint();
        let route_override =
            waypoint.has_speed_restriction().then(|| waypoint.speed_restriction());
        let mcp_override = (self.mode_controller.speed_mode() == SpeedMode::Hold)
            .then(|| self.mode_controller.speed());
        resolve_target(self.aircraft_type.cruise_speed(), route_override, mcp_override)
    }

    /// True when the current leg has a next entry or a subsequent leg
    /// exists. The mere existence of a next leg is sufficient.
    pub fn has_next_waypoint(&self) -> bool {
        self.current_leg().has_next_waypoint() || self.leg_collection.len() > 1
    }

    /// Advances to the next waypoint.
    ///
    /// An exhausted head leg is released and dropped, making the
    /// following leg's first entry current. At the true end of the route
    /// this returns [`FmsError::EndOfRoute`] and leaves the final fix
    /// current; nothing happens silently.
    pub fn next_waypoint(&mut self) -> Result<(), FmsError> {
        if self.current_leg().has_next_waypoint() {
            if let Some(leg) = self.leg_collection.front_mut() {
                leg.move_to_next_waypoint();
            }
            event!("sequenced to waypoint {}", self.current_waypoint().name());
            return Ok(());
        }
        if self.leg_collection.len() > 1 {
            if let Some(mut spent) = self.leg_collection.pop_front() {
                spent.release();
            }
            event!("sequenced onto leg {}", self.current_leg().route_string());
            return Ok(());
        }
        Err(FmsError::EndOfRoute)
    }

    /// Skips ahead to the named waypoint, case-insensitively.
    ///
    /// Every leg strictly before the matching leg is released and
    /// discarded; the matching leg's cursor lands on the match. A miss
    /// returns [`FmsError::WaypointNotFound`] with zero mutation; legs
    /// are never discarded speculatively.
    pub fn skip_to_waypoint(&mut self, name: &str) -> Result<(), FmsError> {
        let target = name.to_lowercase();
        let Some((leg_index, waypoint_index)) = self.find_waypoint(&target) else {
            return Err(FmsError::WaypointNotFound(target));
        };
        if leg_index > 0 {
            warn!("skipping to {target} discards {leg_index} preceding leg(s)");
        }
        for _ in 0..leg_index {
            if let Some(mut spent) = self.leg_collection.pop_front() {
                spent.release();
            }
        }
        if let Some(leg) = self.leg_collection.front_mut() {
            leg.skip_to_waypoint_at_index(waypoint_index);
        }
        Ok(())
    }

    /// Scans legs in flight order for the first entry with the given
    /// lowercase name, returning `(leg index, waypoint index)`.
    fn find_waypoint(&self, name: &str) -> Option<(usize, usize)> {
        self.leg_collection.iter().enumerate().find_map(|(leg_index, leg)| {
            leg.waypoints()
                .iter()
                .find_position(|waypoint| waypoint.name() == name)
                .map(|(waypoint_index, _)| (leg_index, waypoint_index))
        })
    }

    /// Position of the next reachable waypoint: the current leg's next
    /// entry, or the following leg's first entry when the current leg is
    /// exhausted. `None` at the end of the route or when the entry's
    /// position is unresolved.
    pub fn get_next_waypoint_position(&self) -> Option<Vec2D<f64>> {
        if !self.has_next_waypoint() {
            return None;
        }
        if let Some(waypoint) = self.current_leg().next_waypoint() {
            return waypoint.position();
        }
        self.leg_collection
            .get(1)
            .and_then(|leg| leg.waypoints().first())
            .and_then(WaypointEntry::position)
    }

    /// Builds a leg from a single route segment and inserts it at the
    /// front of the collection, making it immediately current. Used for
    /// re-routing and vector insertion ahead of the existing route.
    pub fn add_leg_to_beginning(&mut self, segment: &str) -> Result<(), FmsError> {
        let segments = route_string::parse(segment)?;
        if segments.len() != 1 {
            return Err(FmsError::MalformedRoute(MalformedRouteError::UnrecognizedSegment(
                segment.to_lowercase(),
            )));
        }
        let leg = Leg::from_route_segment(
            &segments[0],
            &self.runway_name,
            self.current_phase,
            self.navigation_library,
        )?;
        info!("inserted leg {} ahead of the current route", leg.route_string());
        self.leg_collection.push_front(leg);
        Ok(())
    }

    /// Replaces the whole route.
    ///
    /// The replacement collection is fully built first; any parse or
    /// lookup failure rejects the change and the prior route stays
    /// untouched.
    pub fn replace_route(&mut self, route: &str) -> Result<(), FmsError> {
        let legs =
            Self::build_legs(route, &self.runway_name, self.current_phase, self.navigation_library)?;
        for leg in &mut self.leg_collection {
            leg.release();
        }
        self.leg_collection = legs;
        info!("route replaced with {}", self.current_route());
        Ok(())
    }

    /// Phase-transition trigger from the simulation loop. Records the
    /// phase and applies the matching mode preset row.
    pub fn set_flight_phase(&mut self, phase: FlightPhase) {
        if phase == self.current_phase {
            return;
        }
        self.current_phase = phase;
        match phase {
            FlightPhase::Arrival => self.mode_controller.set_modes_for_arrival(),
            FlightPhase::Departure => self.mode_controller.set_modes_for_departure(),
        }
        log!("flight phase is now {phase}");
    }

    /// Runway reassignment from the simulation loop.
    pub fn set_runway(&mut self, runway: &str) { self.runway_name = runway.to_lowercase(); }

    /// Atomically sets mode and held value for the altitude axis.
    pub fn set_altitude(&mut self, mode: AltitudeMode, value: i32) {
        self.mode_controller.set_altitude(mode, value);
    }

    /// Atomically sets mode and held value for the heading axis.
    pub fn set_heading(&mut self, mode: HeadingMode, value: f64) {
        self.mode_controller.set_heading(mode, value);
    }

    /// Atomically sets mode and held value for the speed axis.
    pub fn set_speed(&mut self, mode: SpeedMode, value: i32) {
        self.mode_controller.set_speed(mode, value);
    }

    /// Releases every leg and clears the collection. The navigation
    /// library is a borrow and needs no release of its own.
    pub fn teardown(&mut self) {
        for leg in &mut self.leg_collection {
            leg.release();
        }
        self.leg_collection.clear();
        info!("fms torn down");
    }
}
