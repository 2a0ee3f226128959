mod flight_phase;
mod fms;
mod leg;
mod mode_controller;
pub mod route_string;
mod waypoint;
#[cfg(test)]
mod tests;

pub use flight_phase::FlightPhase;
pub use fms::{FlightManagementSystem, FmsError, HEADING_NO_COMMAND};
pub use leg::{Leg, LegType};
pub use mode_controller::{
    AltitudeMode, HeadingMode, MODE_PRESET_LOOKUP, ModeController, ModePreset, SpeedMode,
};
pub use route_string::MalformedRouteError;
pub use waypoint::{RESTRICTION_NONE, WaypointEntry};
