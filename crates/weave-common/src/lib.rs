//! Shared vocabulary for the weave crates: the error taxonomy, window
//! geometry types and id helpers.

pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, PlatformError, WeaveError};
pub use id::new_request_id;
pub use types::{Bounds, SizeHint};

pub type Result<T> = std::result::Result<T, WeaveError>;
