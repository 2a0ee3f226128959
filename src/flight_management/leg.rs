use super::flight_phase::FlightPhase;
use super::route_string::{HOLD_MARKER, PROCEDURE_DELIMITER};
use super::waypoint::WaypointEntry;
use crate::navigation::{LookupError, NavigationLibrary};
use crate::{event, fatal};
use strum_macros::Display;

/// The kind of route section a leg was built from.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum LegType {
    DirectFix,
    Hold,
    Procedure,
}

/// One contiguous section of the flight route with its own waypoint cursor.
///
/// The waypoint collection is in flight order and never reordered; the
/// cursor always indexes a valid entry. A leg is created from one route
/// segment and released exactly once, by the owning flight management
/// system, when it is sequenced past.
#[derive(Debug)]
pub struct Leg {
    waypoint_collection: Vec<WaypointEntry>,
    current_index: usize,
    leg_type: LegType,
    /// Set for procedure legs only; needed to re-render the route segment.
    procedure_name: Option<String>,
}

impl Leg {
    /// Builds a leg from a single route segment.
    ///
    /// The segment must already be codec-validated. Hold segments resolve
    /// their fix with the hold flag set, procedure segments expand through
    /// the navigation library, bare segments resolve a single fix. A
    /// [`LookupError`] aborts construction; no partially built leg exists.
    ///
    /// # Arguments
    /// * `segment` - One codec-validated route segment.
    /// * `runway` - The runway assigned to the aircraft.
    /// * `phase` - The flight phase the aircraft is operating in.
    /// * `nav` - The navigation library resolving names to waypoints.
    pub fn from_route_segment(
        segment: &str,
        runway: &str,
        phase: FlightPhase,
        nav: &NavigationLibrary,
    ) -> Result<Leg, LookupError> {
        let segment = segment.to_lowercase();
        if let Some(fix) = segment.strip_prefix(HOLD_MARKER) {
            let entry = nav.hold_entry(fix)?;
            return Ok(Leg::from_parts(vec![entry], LegType::Hold, None));
        }
        if segment.contains(PROCEDURE_DELIMITER) {
            let parts: Vec<&str> = segment.split(PROCEDURE_DELIMITER).collect();
            let [entry_fix, procedure, exit_fix] = parts.as_slice() else {
                fatal!("route segment '{segment}' reached leg construction unvalidated");
            };
            let entries = nav.procedure_entries(procedure, entry_fix, exit_fix, runway, phase)?;
            return Ok(Leg::from_parts(
                entries,
                LegType::Procedure,
                Some((*procedure).to_string()),
            ));
        }
        let entry = nav.fix_entry(&segment)?;
        Ok(Leg::from_parts(vec![entry], LegType::DirectFix, None))
    }

    fn from_parts(
        waypoint_collection: Vec<WaypointEntry>,
        leg_type: LegType,
        procedure_name: Option<String>,
    ) -> Leg {
        Leg { waypoint_collection, current_index: 0, leg_type, procedure_name }
    }

    /// True iff an entry exists after the cursor.
    pub fn has_next_waypoint(&self) -> bool {
        self.current_index + 1 < self.waypoint_collection.len()
    }

    /// The entry under the cursor.
    pub fn current_waypoint(&self) -> &WaypointEntry {
        &self.waypoint_collection[self.current_index]
    }

    /// The entry after the cursor, if one exists.
    pub fn next_waypoint(&self) -> Option<&WaypointEntry> {
        self.waypoint_collection.get(self.current_index + 1)
    }

    /// Advances the cursor by one entry; no-op when the leg is exhausted.
    pub fn move_to_next_waypoint(&mut self) {
        if self.has_next_waypoint() {
            self.current_index += 1;
        }
    }

    /// Sets the cursor directly, after a collection-level search located
    /// the target index. The index must be in range.
    pub fn skip_to_waypoint_at_index(&mut self, index: usize) {
        if index >= self.waypoint_collection.len() {
            fatal!("waypoint index {index} out of range for leg {}", self.route_string());
        }
        self.current_index = index;
    }

    /// Re-renders the route segment this leg was built from.
    pub fn route_string(&self) -> String {
        let Some(first) = self.waypoint_collection.first() else {
            fatal!("route string requested for a released leg");
        };
        match self.leg_type {
            LegType::DirectFix => first.name().to_string(),
            LegType::Hold => format!("{HOLD_MARKER}{}", first.name()),
            LegType::Procedure => {
                // from_parts guarantees the name and a non-empty expansion
                let procedure = self.procedure_name.as_deref().unwrap_or_default();
                let last = self.waypoint_collection.last().unwrap_or(first);
                format!(
                    "{}{PROCEDURE_DELIMITER}{procedure}{PROCEDURE_DELIMITER}{}",
                    first.name(),
                    last.name()
                )
            }
        }
    }

    /// Returns the cursor position.
    pub fn current_index(&self) -> usize { self.current_index }
    /// Returns the number of entries in the leg.
    pub fn waypoint_count(&self) -> usize { self.waypoint_collection.len() }
    /// Returns the full entry sequence in flight order.
    pub fn waypoints(&self) -> &[WaypointEntry] { &self.waypoint_collection }
    /// Returns the kind of route section this leg was built from.
    pub fn leg_type(&self) -> LegType { self.leg_type }

    /// Releases the waypoint data. Invoked exactly once, by the owning
    /// flight management system, right before the leg is dropped.
    pub fn release(&mut self) {
        event!("releasing leg {}", self.route_string());
        self.waypoint_collection.clear();
        self.current_index = 0;
    }
}
