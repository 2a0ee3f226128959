use super::flight_phase::FlightPhase;
use std::collections::HashMap;
use std::sync::LazyLock;
use strum_macros::{Display, EnumIter};

/// Altitude axis modes of the mode control panel.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum AltitudeMode {
    /// Maintain the held altitude value.
    Hold,
    /// Defer to route-derived altitude guidance.
    Vnav,
}

/// Heading axis modes of the mode control panel.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum HeadingMode {
    /// Maintain the held heading value.
    Hold,
    /// Defer to lateral route guidance.
    Lnav,
}

/// Speed axis modes of the mode control panel.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum SpeedMode {
    /// Maintain the held speed value.
    Hold,
    /// Defer to route-derived speed guidance.
    Vnav,
}

/// One row of the phase preset table.
#[derive(Debug, Clone, Copy)]
pub struct ModePreset {
    pub altitude_mode: AltitudeMode,
    pub heading_mode: HeadingMode,
    pub speed_mode: SpeedMode,
}

pub static MODE_PRESET_LOOKUP: LazyLock<HashMap<FlightPhase, ModePreset>> = LazyLock::new(|| {
    let mut lookup = HashMap::new();
    let presets = vec![
        (FlightPhase::Arrival, ModePreset {
            altitude_mode: AltitudeMode::Vnav,
            heading_mode: HeadingMode::Lnav,
            speed_mode: SpeedMode::Vnav,
        }),
        (FlightPhase::Departure, ModePreset {
            altitude_mode: AltitudeMode::Vnav,
            heading_mode: HeadingMode::Lnav,
            speed_mode: SpeedMode::Vnav,
        }),
    ];

    for (phase, preset) in presets {
        lookup.insert(phase, preset);
    }
    lookup
});

/// Per-axis mode and target-value store of the autopilot (MCP).
///
/// A held value is meaningful only while its axis mode is `Hold`; the
/// deferring modes leave target selection to route-derived guidance.
/// Lives exactly as long as the owning flight management system.
#[derive(Debug)]
pub struct ModeController {
    altitude_mode: AltitudeMode,
    /// Held altitude in feet.
    altitude: i32,
    heading_mode: HeadingMode,
    /// Held heading in degrees.
    heading: f64,
    speed_mode: SpeedMode,
    /// Held speed in knots.
    speed: i32,
}

impl Default for ModeController {
    fn default() -> Self { ModeController::new() }
}

impl ModeController {
    pub fn new() -> ModeController {
        ModeController {
            altitude_mode: AltitudeMode::Vnav,
            altitude: 0,
            heading_mode: HeadingMode::Lnav,
            heading: 0.0,
            speed_mode: SpeedMode::Vnav,
            speed: 0,
        }
    }

    /// Atomically sets mode and held value for the altitude axis.
    pub fn set_altitude(&mut self, mode: AltitudeMode, value: i32) {
        self.altitude_mode = mode;
        self.altitude = value;
    }

    /// Atomically sets mode and held value for the heading axis.
    pub fn set_heading(&mut self, mode: HeadingMode, value: f64) {
        self.heading_mode = mode;
        self.heading = value;
    }

    /// Atomically sets mode and held value for the speed axis.
    pub fn set_speed(&mut self, mode: SpeedMode, value: i32) {
        self.speed_mode = mode;
        self.speed = value;
    }

    /// Applies the arrival preset row. Held values are left untouched;
    /// they only regain meaning once an axis returns to `Hold`.
    pub fn set_modes_for_arrival(&mut self) { self.apply_preset(FlightPhase::Arrival); }

    /// Applies the departure preset row.
    pub fn set_modes_for_departure(&mut self) { self.apply_preset(FlightPhase::Departure); }

    fn apply_preset(&mut self, phase: FlightPhase) {
        let preset = MODE_PRESET_LOOKUP[&phase];
        self.altitude_mode = preset.altitude_mode;
        self.heading_mode = preset.heading_mode;
        self.speed_mode = preset.speed_mode;
    }

    /// Returns the altitude axis mode.
    pub fn altitude_mode(&self) -> AltitudeMode { self.altitude_mode }
    /// Returns the held altitude in feet.
    pub fn altitude(&self) -> i32 { self.altitude }
    /// Returns the heading axis mode.
    pub fn heading_mode(&self) -> HeadingMode { self.heading_mode }
    /// Returns the held heading in degrees.
    pub fn heading(&self) -> f64 { self.heading }
    /// Returns the speed axis mode.
    pub fn speed_mode(&self) -> SpeedMode { self.speed_mode }
    /// Returns the held speed in knots.
    pub fn speed(&self) -> i32 { self.speed }
}
