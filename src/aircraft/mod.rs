mod aircraft_type;

pub use aircraft_type::AircraftType;
