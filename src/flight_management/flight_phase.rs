use serde::Deserialize;
use strum_macros::{Display, EnumIter};

/// The side of the operation an aircraft is flying.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightPhase {
    Arrival,
    Departure,
}

impl From<&str> for FlightPhase {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "arrival" => FlightPhase::Arrival,
            "departure" => FlightPhase::Departure,
            _ => FlightPhase::Departure, // TODO: conversion error should be logged
        }
    }
}
