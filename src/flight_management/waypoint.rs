use crate::util::Vec2D;

/// Sentinel for an absent altitude or speed restriction.
///
/// External navigation data encodes "no restriction" as `-1`; the value
/// never leaves this module unchecked since callers go through the
/// `has_*_restriction` predicates.
pub const RESTRICTION_NONE: i32 = -1;

/// A navigation fix as it appears inside one leg.
///
/// Immutable once produced by the navigation library; owned by exactly
/// one [`Leg`](super::Leg).
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointEntry {
    /// Lowercase fix identifier, unique within its leg.
    name: String,
    /// Resolved position, `None` when the source data carries none.
    position: Option<Vec2D<f64>>,
    /// Altitude restriction in feet, [`RESTRICTION_NONE`] if absent.
    altitude_restriction: i32,
    /// Speed restriction in knots, [`RESTRICTION_NONE`] if absent.
    speed_restriction: i32,
    /// Whether the aircraft is expected to hold at this fix.
    is_hold: bool,
}

impl WaypointEntry {
    /// Creates an unrestricted waypoint entry.
    pub fn new(name: &str, position: Option<Vec2D<f64>>) -> WaypointEntry {
        WaypointEntry {
            name: name.to_lowercase(),
            position,
            altitude_restriction: RESTRICTION_NONE,
            speed_restriction: RESTRICTION_NONE,
            is_hold: false,
        }
    }

    /// Creates a waypoint entry carrying restrictions.
    pub fn restricted(
        name: &str,
        position: Option<Vec2D<f64>>,
        altitude_restriction: i32,
        speed_restriction: i32,
    ) -> WaypointEntry {
        WaypointEntry {
            name: name.to_lowercase(),
            position,
            altitude_restriction,
            speed_restriction,
            is_hold: false,
        }
    }

    /// Marks this entry as a hold fix.
    pub fn into_hold(mut self) -> WaypointEntry {
        self.is_hold = true;
        self
    }

    /// Returns the fix identifier.
    pub fn name(&self) -> &str { &self.name }
    /// Returns the resolved position, if any.
    pub fn position(&self) -> Option<Vec2D<f64>> { self.position }
    /// Returns the altitude restriction in feet, [`RESTRICTION_NONE`] if absent.
    pub fn altitude_restriction(&self) -> i32 { self.altitude_restriction }
    /// Returns the speed restriction in knots, [`RESTRICTION_NONE`] if absent.
    pub fn speed_restriction(&self) -> i32 { self.speed_restriction }
    /// Whether the aircraft is expected to hold at this fix.
    pub fn is_hold(&self) -> bool { self.is_hold }

    /// True when an altitude restriction is set.
    pub fn has_altitude_restriction(&self) -> bool {
        self.altitude_restriction != RESTRICTION_NONE
    }

    /// True when a speed restriction is set.
    pub fn has_speed_restriction(&self) -> bool { self.speed_restriction != RESTRICTION_NONE }
}
