pub mod record;
pub mod types;

pub use record::{DeploymentRecord, RECORD_SCHEMA_VERSION, RecordError};
pub use types::*;
