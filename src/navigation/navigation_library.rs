use super::procedure::Procedure;
use crate::flight_management::{FlightPhase, WaypointEntry};
use crate::util::Vec2D;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Errors raised when resolving fix or procedure names against the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No fix with this name is known.
    UnknownFix(String),
    /// No procedure with this name is known.
    UnknownProcedure(String),
    /// The procedure exists but is not published for the requested runway.
    UnknownRunway { procedure: String, runway: String },
    /// The named fix is not an entry or exit of the procedure, or the
    /// requested entry lies after the requested exit.
    InvalidTransition { procedure: String, fix: String },
    /// The procedure serves the opposite flight phase.
    PhaseMismatch { procedure: String, phase: FlightPhase },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::UnknownFix(name) => write!(f, "unknown fix {name}"),
            LookupError::UnknownProcedure(name) => write!(f, "unknown procedure {name}"),
            LookupError::UnknownRunway { procedure, runway } => {
                write!(f, "procedure {procedure} is not published for runway {runway}")
            }
            LookupError::InvalidTransition { procedure, fix } => {
                write!(f, "{fix} is not a valid transition of {procedure}")
            }
            LookupError::PhaseMismatch { procedure, phase } => {
                write!(f, "procedure {procedure} does not serve {phase} traffic")
            }
        }
    }
}

/// A named navigation fix with an optionally resolved position.
///
/// Positions arrive as `(east, north)` pairs from the data ingestion
/// layer; a record without one stays usable for sequencing and lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct FixRecord {
    /// Lowercase fix identifier.
    name: String,
    /// Resolved position, if the source data carries one.
    #[serde(default)]
    position: Option<(f64, f64)>,
}

impl FixRecord {
    /// Constructs a fix record with a resolved position.
    pub fn new(name: &str, position: (f64, f64)) -> FixRecord {
        FixRecord { name: name.to_lowercase(), position: Some(position) }
    }

    /// Constructs a fix record without a resolved position.
    pub fn unresolved(name: &str) -> FixRecord {
        FixRecord { name: name.to_lowercase(), position: None }
    }

    /// Returns the fix identifier.
    pub fn name(&self) -> &str { &self.name }
    /// Returns the resolved position, if any.
    pub fn position(&self) -> Option<Vec2D<f64>> { self.position.map(Vec2D::from) }
}

/// In-memory fix and procedure index.
///
/// Read-only after construction; many flight management systems may share
/// one library concurrently since every access is a plain read.
#[derive(Debug, Default)]
pub struct NavigationLibrary {
    fixes: HashMap<String, FixRecord>,
    procedures: HashMap<String, Procedure>,
}

impl NavigationLibrary {
    /// Creates an empty library.
    pub fn new() -> NavigationLibrary { NavigationLibrary::default() }

    /// Builds a library from ingested records.
    pub fn from_records(fixes: Vec<FixRecord>, procedures: Vec<Procedure>) -> NavigationLibrary {
        let mut library = NavigationLibrary::new();
        for fix in fixes {
            library.insert_fix(fix);
        }
        for procedure in procedures {
            library.insert_procedure(procedure);
        }
        library
    }

    /// Adds one fix record, replacing any previous record of the same name.
    pub fn insert_fix(&mut self, fix: FixRecord) {
        self.fixes.insert(fix.name().to_string(), fix);
    }

    /// Adds one procedure, replacing any previous one of the same name.
    pub fn insert_procedure(&mut self, procedure: Procedure) {
        self.procedures.insert(procedure.name().to_string(), procedure);
    }

    /// Resolves a fix name into a waypoint entry.
    pub fn fix_entry(&self, name: &str) -> Result<WaypointEntry, LookupError> {
        let key = name.to_lowercase();
        let record = self.fixes.get(&key).ok_or_else(|| LookupError::UnknownFix(key.clone()))?;
        Ok(WaypointEntry::new(&key, record.position()))
    }

    /// Resolves a fix name into a waypoint entry flagged as a hold.
    pub fn hold_entry(&self, name: &str) -> Result<WaypointEntry, LookupError> {
        Ok(self.fix_entry(name)?.into_hold())
    }

    /// Expands a procedure between an entry and an exit fix into the
    /// ordered waypoint entries the aircraft will fly.
    ///
    /// # Arguments
    /// * `procedure` - The procedure identifier, e.g. `kepec3`.
    /// * `entry` - The fix the aircraft joins the procedure at.
    /// * `exit` - The fix the aircraft leaves the procedure at.
    /// * `runway` - The runway assigned to the aircraft.
    /// * `phase` - The flight phase the caller is operating in.
    ///
    /// # Returns
    /// The entries from `entry` to `exit` inclusive, with the procedure's
    /// restrictions attached and positions resolved where known, or a
    /// [`LookupError`] naming the first thing that failed to resolve.
    pub fn procedure_entries(
        &self,
        procedure: &str,
        entry: &str,
        exit: &str,
        runway: &str,
        phase: FlightPhase,
    ) -> Result<Vec<WaypointEntry>, LookupError> {
        let key = procedure.to_lowercase();
        let proc = self
            .procedures
            .get(&key)
            .ok_or_else(|| LookupError::UnknownProcedure(key.clone()))?;
        if proc.phase() != phase {
            return Err(LookupError::PhaseMismatch { procedure: key, phase });
        }
        if !proc.serves_runway(runway) {
            return Err(LookupError::UnknownRunway { procedure: key, runway: runway.to_lowercase() });
        }
        let entry_fix = entry.to_lowercase();
        let exit_fix = exit.to_lowercase();
        let start = proc.index_of(&entry_fix).ok_or_else(|| LookupError::InvalidTransition {
            procedure: key.clone(),
            fix: entry_fix.clone(),
        })?;
        let end = proc.index_of(&exit_fix).ok_or_else(|| LookupError::InvalidTransition {
            procedure: key.clone(),
            fix: exit_fix.clone(),
        })?;
        if start > end {
            return Err(LookupError::InvalidTransition { procedure: key, fix: exit_fix });
        }
        let entries = proc.fixes()[start..=end]
            .iter()
            .map(|fix| {
                WaypointEntry::restricted(
                    fix.name(),
                    self.position_of(fix.name()),
                    fix.altitude_restriction(),
                    fix.speed_restriction(),
                )
            })
            .collect();
        Ok(entries)
    }

    fn position_of(&self, name: &str) -> Option<Vec2D<f64>> {
        self.fixes.get(name).and_then(FixRecord::position)
    }
}
