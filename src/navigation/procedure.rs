use crate::flight_management::{FlightPhase, RESTRICTION_NONE};
use serde::Deserialize;

fn restriction_none() -> i32 { RESTRICTION_NONE }

/// One fix inside a procedure definition, with the restrictions the
/// procedure attaches to it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcedureFix {
    /// Lowercase fix identifier.
    name: String,
    /// Altitude restriction in feet, [`RESTRICTION_NONE`] if absent.
    #[serde(default = "restriction_none")]
    altitude_restriction: i32,
    /// Speed restriction in knots, [`RESTRICTION_NONE`] if absent.
    #[serde(default = "restriction_none")]
    speed_restriction: i32,
}

impl ProcedureFix {
    /// Creates an unrestricted procedure fix.
    pub fn new(name: &str) -> ProcedureFix {
        ProcedureFix {
            name: name.to_lowercase(),
            altitude_restriction: RESTRICTION_NONE,
            speed_restriction: RESTRICTION_NONE,
        }
    }

    /// Creates a procedure fix carrying altitude and/or speed restrictions.
    pub fn restricted(name: &str, altitude_restriction: i32, speed_restriction: i32) -> ProcedureFix {
        ProcedureFix { name: name.to_lowercase(), altitude_restriction, speed_restriction }
    }

    /// Returns the fix identifier.
    pub fn name(&self) -> &str { &self.name }
    /// Returns the altitude restriction in feet.
    pub fn altitude_restriction(&self) -> i32 { self.altitude_restriction }
    /// Returns the speed restriction in knots.
    pub fn speed_restriction(&self) -> i32 { self.speed_restriction }
}

/// A named standard route segment (SID or STAR) expanding to an ordered
/// fix sequence.
///
/// The phase ties a procedure to one side of the operation: a STAR serves
/// arrivals, a SID serves departures. An empty runway list means the
/// procedure serves every runway of its airport.
#[derive(Debug, Clone, Deserialize)]
pub struct Procedure {
    /// Lowercase procedure identifier, e.g. `kepec3`.
    name: String,
    /// The flight phase this procedure serves.
    phase: FlightPhase,
    /// Runways this procedure is published for; empty means all.
    #[serde(default)]
    runways: Vec<String>,
    /// Full ordered fix sequence, entries and exits included.
    fixes: Vec<ProcedureFix>,
}

impl Procedure {
    /// Constructs a procedure serving every runway.
    pub fn new(name: &str, phase: FlightPhase, fixes: Vec<ProcedureFix>) -> Procedure {
        Procedure { name: name.to_lowercase(), phase, runways: Vec::new(), fixes }
    }

    /// Constructs a procedure published for specific runways only.
    pub fn with_runways(
        name: &str,
        phase: FlightPhase,
        runways: &[&str],
        fixes: Vec<ProcedureFix>,
    ) -> Procedure {
        Procedure {
            name: name.to_lowercase(),
            phase,
            runways: runways.iter().map(|r| r.to_lowercase()).collect(),
            fixes,
        }
    }

    /// Returns the procedure identifier.
    pub fn name(&self) -> &str { &self.name }
    /// Returns the flight phase this procedure serves.
    pub fn phase(&self) -> FlightPhase { self.phase }
    /// Returns the full ordered fix sequence.
    pub fn fixes(&self) -> &[ProcedureFix] { &self.fixes }

    /// True when the procedure is published for the given runway.
    pub fn serves_runway(&self, runway: &str) -> bool {
        self.runways.is_empty() || self.runways.iter().any(|r| *r == runway.to_lowercase())
    }

    /// Position of a fix within the procedure's sequence, if present.
    pub(crate) fn index_of(&self, fix: &str) -> Option<usize> {
        self.fixes.iter().position(|f| f.name() == fix)
    }
}
