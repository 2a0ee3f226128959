use super::leg::Leg;
use itertools::Itertools;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Separates two route segments, e.g. `cowby..bikkr`.
pub const SEGMENT_DELIMITER: &str = "..";
/// Separates the parts of a procedure segment, e.g. `dag.kepec3.klas`.
pub const PROCEDURE_DELIMITER: char = '.';
/// Prefix marking a hold fix segment, e.g. `@bikkr`.
pub const HOLD_MARKER: char = '@';

/// A segment is a bare fix, a hold fix, or `entry.procedure.exit`.
static SEGMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@?[a-z0-9]+|[a-z0-9]+\.[a-z0-9]+\.[a-z0-9]+)$").unwrap()
});

/// Errors raised when route text does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRouteError {
    /// The route string was empty or whitespace.
    EmptyRouteString,
    /// A segment matched neither the fix, hold, nor procedure shape.
    UnrecognizedSegment(String),
}

impl fmt::Display for MalformedRouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRouteError::EmptyRouteString => write!(f, "route string is empty"),
            MalformedRouteError::UnrecognizedSegment(segment) => {
                write!(f, "unrecognized route segment '{segment}'")
            }
        }
    }
}

/// Splits a route string into ordered, lowercase route segments.
///
/// Each returned segment later becomes one leg. The input is validated
/// segment by segment, so a single stray delimiter rejects the whole
/// route before any leg is built.
///
/// # Arguments
/// * `route` - The route text, e.g. `cowby..bikkr..dag.kepec3.klas`.
///
/// # Returns
/// The ordered segments, or the [`MalformedRouteError`] describing the
/// first offending piece of the input.
pub fn parse(route: &str) -> Result<Vec<String>, MalformedRouteError> {
    let normalized = route.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(MalformedRouteError::EmptyRouteString);
    }
    let segments: Vec<String> =
        normalized.split(SEGMENT_DELIMITER).map(str::to_string).collect();
    for segment in &segments {
        if !SEGMENT_REGEX.is_match(segment) {
            return Err(MalformedRouteError::UnrecognizedSegment(segment.clone()));
        }
    }
    Ok(segments)
}

/// Joins each leg's route string with the segment delimiter, preserving
/// leg order.
///
/// Formatting a freshly parsed route reproduces the original string for
/// any well-formed input whose procedures resolve unambiguously.
pub fn format<'a, I>(legs: I) -> String
where
    I: IntoIterator<Item = &'a Leg>,
{
    legs.into_iter().map(Leg::route_string).join(SEGMENT_DELIMITER)
}
