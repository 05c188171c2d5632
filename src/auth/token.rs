//! Bearer token obtained once at connect time.

// self
use crate::{_prelude::*, auth::Secret};

/// Access token attached to every admin API request for the rest of the run.
///
/// The token is never refreshed. Its lifetime is recorded only so callers can warn when a
/// long run outlives it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer credential.
	pub secret: Secret,
	/// Instant the token endpoint answered.
	pub issued_at: OffsetDateTime,
	/// Lifetime reported by the token endpoint, if any.
	pub expires_in: Option<Duration>,
}
impl AccessToken {
	/// Creates a token issued at `issued_at`.
	pub fn new(
		secret: impl Into<Secret>,
		issued_at: OffsetDateTime,
		expires_in: Option<Duration>,
	) -> Self {
		Self { secret: secret.into(), issued_at, expires_in }
	}

	/// Instant after which the backend will reject the token, when known.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_in.map(|lifetime| self.issued_at + lifetime)
	}

	/// Returns true once `now` has reached the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expiry| now >= expiry)
	}

	/// Value for the `Authorization` header without the scheme.
	pub fn bearer(&self) -> &str {
		self.secret.expose()
	}
}
