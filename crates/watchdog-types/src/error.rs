//! Error type shared by the engine and every event store.

pub type WdResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// Settings rejected at engine construction
	ConfigError(String),
	/// Neither an IP address nor a session id was available
	InvalidIdentity,
	/// The identity provider could not produce a required key
	IdentityResolution(String),
	/// Persistence failure, details are logged by the adapter
	DbError,
	/// The store did not answer in time
	Timeout,
	/// Malformed value (unknown event kind, corrupt row, bad config document)
	ValidationError(String),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::InvalidIdentity => write!(f, "no lookup method was specified"),
			Error::IdentityResolution(msg) => write!(f, "identity resolution failed: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::Timeout => write!(f, "event store timed out"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}


// vim: ts=4
