pub mod pricing;
pub mod roster;
pub mod assignment;
pub mod dictionary;

pub use pricing::{FareConfig, FareEngine};
pub use roster::{Helper, Roster, RosterError};
pub use assignment::{Assignment, AssignmentStrategy};
pub use dictionary::{Dictionary, DictionaryTranslator};
