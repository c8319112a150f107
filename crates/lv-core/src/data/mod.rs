//! Records, datasets and the numeric domains derived from them

mod dataset;
mod domain;
mod null_handling;
mod record;

use thiserror::Error;

pub use dataset::Dataset;
pub use domain::SharedDomain;
pub use null_handling::NullConfig;
pub use record::{FieldValue, Record, RecordBuilder};

/// Errors that can occur while building the data model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("invalid domain [{min}, {max}]: bounds must be finite")]
    InvalidDomain { min: f64, max: f64 },
}
