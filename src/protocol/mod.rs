//! Chemotherapy protocols
//!
//! [`Protocol`] and [`DrugEntry`] describe a regimen as it is kept in the JSON
//! protocol store; [`ProtocolLibrary`] is the read-only repository handed to the dose
//! engine and to front-ends.
//!
//! # Store format
//!
//! ```json
//! {
//!     "R-CHOP (NHL)": {
//!         "cycle_length": "21 days",
//!         "monitoring_labs": "Blood count, Creatinine",
//!         "premedication": "Antihistamine, Paracetamol",
//!         "drugs": [
//!             { "name": "Rituximab", "dose_value": 375, "dose_unit": "mg/m2", "schedule_days": "d1" },
//!             {
//!                 "name": "Prednisolone", "dose_value": 40, "dose_unit": "mg/m2",
//!                 "tablet_strengths": ["40 mg", "20 mg"], "schedule_days": "d1-5"
//!             }
//!         ]
//!     }
//! }
//! ```

mod errors;
pub mod library;
mod types;

pub use errors::ProtocolError;
pub use library::ProtocolLibrary;
pub use types::{DoseUnit, DrugEntry, Protocol};
