//! Client identity used as the counting key.
//!
//! An identity is an IP address, a session id, or both. The "at least one"
//! rule is enforced here, when the value is built, so stores and the engine
//! never have to re-check it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, WdResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentityParts", into = "IdentityParts")]
pub enum Identity {
	Ip(Box<str>),
	Session(Box<str>),
	Both { ip_address: Box<str>, session_id: Box<str> },
}

impl Identity {
	/// Build an identity from optional keys, failing if both are absent
	pub fn new<I, S>(ip_address: Option<I>, session_id: Option<S>) -> WdResult<Self>
	where
		I: Into<Box<str>>,
		S: Into<Box<str>>,
	{
		match (ip_address, session_id) {
			(Some(ip), Some(session)) => {
				Ok(Identity::Both { ip_address: ip.into(), session_id: session.into() })
			}
			(Some(ip), None) => Ok(Identity::Ip(ip.into())),
			(None, Some(session)) => Ok(Identity::Session(session.into())),
			(None, None) => Err(Error::InvalidIdentity),
		}
	}

	pub fn ip_address(&self) -> Option<&str> {
		match self {
			Identity::Ip(ip) | Identity::Both { ip_address: ip, .. } => Some(&**ip),
			Identity::Session(_) => None,
		}
	}

	pub fn session_id(&self) -> Option<&str> {
		match self {
			Identity::Session(session) | Identity::Both { session_id: session, .. } => {
				Some(&**session)
			}
			Identity::Ip(_) => None,
		}
	}

	/// Whether a stored event with the given keys belongs to this identity.
	///
	/// Matching is OR-based: a client is the same if either its IP address or
	/// its session id matches. Keys absent from `self` never match.
	pub fn matches(&self, ip_address: Option<&str>, session_id: Option<&str>) -> bool {
		let ip_match = self.ip_address().is_some_and(|ip| ip_address == Some(ip));
		let session_match = self.session_id().is_some_and(|session| session_id == Some(session));
		ip_match || session_match
	}

	/// Same as [`Identity::matches`], against another identity
	pub fn matches_identity(&self, other: &Identity) -> bool {
		self.matches(other.ip_address(), other.session_id())
	}
}

impl std::fmt::Display for Identity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Identity::Ip(ip) => write!(f, "ip={}", ip),
			Identity::Session(_) => write!(f, "session=<redacted>"),
			Identity::Both { ip_address, .. } => write!(f, "ip={} session=<redacted>", ip_address),
		}
	}
}

/// Flat (ip, session) form used for (de)serialization
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityParts {
	ip_address: Option<Box<str>>,
	session_id: Option<Box<str>>,
}

impl TryFrom<IdentityParts> for Identity {
	type Error = Error;

	fn try_from(parts: IdentityParts) -> Result<Self, Self::Error> {
		Identity::new(parts.ip_address, parts.session_id)
	}
}

impl From<Identity> for IdentityParts {
	fn from(identity: Identity) -> Self {
		IdentityParts {
			ip_address: identity.ip_address().map(Box::from),
			session_id: identity.session_id().map(Box::from),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_requires_a_key() {
		assert_eq!(Identity::new(None::<&str>, None::<&str>), Err(Error::InvalidIdentity));
		assert_eq!(Identity::new(Some("1.1.1.1"), None::<&str>), Ok(Identity::Ip("1.1.1.1".into())));
		assert_eq!(Identity::new(None::<&str>, Some("abc")), Ok(Identity::Session("abc".into())));
		let both = Identity::new(Some("1.1.1.1"), Some("abc")).unwrap();
		assert_eq!(both.ip_address(), Some("1.1.1.1"));
		assert_eq!(both.session_id(), Some("abc"));
	}

	#[test]
	fn test_matches_by_ip_or_session() {
		let both = Identity::new(Some("1.1.1.1"), Some("X")).unwrap();

		// Either key is enough
		assert!(both.matches(Some("1.1.1.1"), None));
		assert!(both.matches(None, Some("X")));
		assert!(both.matches(Some("2.2.2.2"), Some("X")));
		assert!(!both.matches(Some("2.2.2.2"), Some("Y")));
		assert!(!both.matches(None, None));
	}

	#[test]
	fn test_matches_ignores_unsupplied_keys() {
		let ip_only = Identity::Ip("1.1.1.1".into());
		assert!(ip_only.matches(Some("1.1.1.1"), Some("whatever")));
		assert!(!ip_only.matches(None, Some("1.1.1.1")));

		let session_only = Identity::Session("X".into());
		assert!(session_only.matches(Some("9.9.9.9"), Some("X")));
		assert!(!session_only.matches(Some("X"), None));
	}

	#[test]
	fn test_serde_flat_form() {
		let identity = Identity::new(Some("10.0.0.1"), None::<&str>).unwrap();
		let json = serde_json::to_value(&identity).unwrap();
		assert_eq!(json, serde_json::json!({ "ipAddress": "10.0.0.1", "sessionId": null }));

		let res: Result<Identity, _> =
			serde_json::from_value(serde_json::json!({ "ipAddress": null, "sessionId": null }));
		assert!(res.is_err());
	}

	#[test]
	fn test_display_redacts_session() {
		let identity = Identity::new(Some("10.0.0.1"), Some("secret")).unwrap();
		assert_eq!(identity.to_string(), "ip=10.0.0.1 session=<redacted>");
	}
}

// vim: ts=4
