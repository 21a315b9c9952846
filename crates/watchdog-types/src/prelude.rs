pub use crate::error::{Error, WdResult};
pub use crate::identity::Identity;
pub use crate::types::{EventKind, Timestamp};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
