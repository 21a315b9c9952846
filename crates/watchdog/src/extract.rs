//! Client identity extraction for axum handlers.
//!
//! `RequestIdentity` implements [`IdentityProvider`] from the request: the
//! client IP comes from the peer address or, behind a reverse proxy, from
//! the forwarding headers; the session id comes from an [`ActiveSession`]
//! extension set by a session layer, or from the session cookie.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::{COOKIE, HeaderMap};
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use watchdog_types::identity_provider::IdentityProvider;

/// How the server is reached by clients
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyMode {
	/// Clients connect directly, use the peer address
	#[default]
	Direct,
	/// Behind a reverse proxy, trust forwarding headers first
	ReverseProxy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
	pub proxy_mode: ProxyMode,
	/// Name of the cookie carrying the session id
	pub session_cookie: Box<str>,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self { proxy_mode: ProxyMode::Direct, session_cookie: "session".into() }
	}
}

/// Provides the identity extraction config from the application state.
///
/// Implement this on your state type to enable the `RequestIdentity`
/// extractor.
pub trait IdentityConfigSource: Send + Sync {
	fn identity_config(&self) -> &IdentityConfig;
}

impl IdentityConfigSource for IdentityConfig {
	fn identity_config(&self) -> &IdentityConfig {
		self
	}
}

impl<T: IdentityConfigSource> IdentityConfigSource for Arc<T> {
	fn identity_config(&self) -> &IdentityConfig {
		(**self).identity_config()
	}
}

/// Session id of an authenticated session, inserted into the request
/// extensions by the session middleware
#[derive(Clone, Debug)]
pub struct ActiveSession(pub Box<str>);

/// Identity of the client making the current request
#[derive(Clone, Debug, Default)]
pub struct RequestIdentity {
	ip_address: Option<IpAddr>,
	session_id: Option<Box<str>>,
}

impl RequestIdentity {
	pub fn from_parts(parts: &Parts, config: &IdentityConfig) -> Self {
		let peer = parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0.ip());
		let ip_address = match config.proxy_mode {
			ProxyMode::Direct => peer,
			ProxyMode::ReverseProxy => extract_from_xff(&parts.headers)
				.or_else(|| extract_from_x_real_ip(&parts.headers))
				.or_else(|| extract_from_forwarded(&parts.headers))
				.or(peer),
		};

		let session_id = parts
			.extensions
			.get::<ActiveSession>()
			.map(|session| session.0.clone())
			.or_else(|| extract_cookie(&parts.headers, &config.session_cookie));

		Self { ip_address, session_id }
	}

	/// Shared handle for [`crate::Watchdog::with_identity`]
	pub fn into_provider(self) -> Arc<dyn IdentityProvider> {
		Arc::new(self)
	}
}

impl IdentityProvider for RequestIdentity {
	fn ip_address(&self) -> WdResult<IpAddr> {
		self.ip_address
			.ok_or_else(|| Error::IdentityResolution("client address not available".into()))
	}

	fn session_id(&self) -> Option<Box<str>> {
		self.session_id.clone()
	}
}

impl<S> FromRequestParts<S> for RequestIdentity
where
	S: IdentityConfigSource,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		Ok(Self::from_parts(parts, state.identity_config()))
	}
}

/// Extract IP from X-Forwarded-For header
fn extract_from_xff(headers: &HeaderMap) -> Option<IpAddr> {
	headers.get("x-forwarded-for").and_then(|h| h.to_str().ok()).and_then(|s| {
		// "client, proxy1, proxy2": the leftmost entry is the original client
		s.split(',').next().map(str::trim).and_then(|ip| ip.parse().ok())
	})
}

/// Extract IP from X-Real-IP header
fn extract_from_x_real_ip(headers: &HeaderMap) -> Option<IpAddr> {
	headers.get("x-real-ip").and_then(|h| h.to_str().ok()).and_then(|s| s.trim().parse().ok())
}

/// Extract IP from Forwarded header (RFC 7239)
fn extract_from_forwarded(headers: &HeaderMap) -> Option<IpAddr> {
	headers.get("forwarded").and_then(|h| h.to_str().ok()).and_then(|s| {
		// for=192.0.2.60;proto=http;by=203.0.113.43 or for="[2001:db8::1]"
		s.split([';', ','])
			.map(str::trim)
			.find(|part| part.get(..4).is_some_and(|key| key.eq_ignore_ascii_case("for=")))
			.and_then(|for_part| for_part.get(4..))
			.and_then(|value| {
				let cleaned = value.trim_matches('"').trim_matches('[').trim_matches(']');
				cleaned.parse().ok()
			})
	})
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<Box<str>> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|h| h.to_str().ok())
		.flat_map(|s| s.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, value)| *key == name && !value.is_empty())
		.map(|(_, value)| value.into())
}


// vim: ts=4
