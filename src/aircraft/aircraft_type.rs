use serde::Deserialize;

/// Static performance data for one aircraft type.
///
/// Performance models are delivered by an external asset pipeline; this
/// record only defines the fields the flight management system reads.
#[derive(Debug, Clone, Deserialize)]
pub struct AircraftType {
    /// ICAO type designator, e.g. `b738`.
    icao: String,
    /// Service ceiling in feet.
    ceiling: i32,
    /// Cruise speed in knots.
    cruise_speed: i32,
}

impl AircraftType {
    /// Constructs a new [`AircraftType`] from the provided parameters.
    pub fn new(icao: &str, ceiling: i32, cruise_speed: i32) -> AircraftType {
        AircraftType { icao: icao.to_lowercase(), ceiling, cruise_speed }
    }

    /// Returns the ICAO type designator.
    pub fn icao(&self) -> &str { &self.icao }
    /// Returns the service ceiling in feet.
    pub fn ceiling(&self) -> i32 { self.ceiling }
    /// Returns the cruise speed in knots.
    pub fn cruise_speed(&self) -> i32 { self.cruise_speed }
}
