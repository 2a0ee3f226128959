mod navigation_library;
mod procedure;

pub use navigation_library::{FixRecord, LookupError, NavigationLibrary};
pub use procedure::{Procedure, ProcedureFix};
