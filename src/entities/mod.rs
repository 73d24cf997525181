// Entity Models - value records read from the data store
//
// Every record is an immutable value: the engine reads them and builds new
// result rows, it never mutates what the store returned.

pub mod entrepreneur;
pub mod firm;
pub mod forecast;
pub mod settings;

pub use entrepreneur::{EntrepreneurRecord, ScoringParameters};
pub use firm::{Firm, FirmId, FirmRecycling, FirmSustainability};
pub use forecast::ForecastRecord;
pub use settings::Settings;
