//! Resolved connection parameters, readiness policy, and optional SMTP settings.

// std
use std::{path::PathBuf, time::Duration as StdDuration};
// self
use crate::{
	_prelude::*,
	auth::{AdminCredentials, Secret},
	blueprint::Blueprint,
	error::ConfigError,
	orchestrator::Action,
};

/// Bounded readiness polling performed before authentication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadinessPolicy {
	/// Number of probes before giving up.
	pub attempts: u32,
	/// Fixed delay between failed probes.
	pub interval: StdDuration,
	/// Timeout applied to each individual probe.
	pub probe_timeout: StdDuration,
	/// Probe path relative to the server URL.
	pub path: String,
}
impl ReadinessPolicy {
	/// Default number of probes.
	pub const DEFAULT_ATTEMPTS: u32 = 30;
	/// Default delay between probes.
	pub const DEFAULT_INTERVAL: StdDuration = StdDuration::from_secs(10);
	/// Default per-probe timeout.
	pub const DEFAULT_PROBE_TIMEOUT: StdDuration = StdDuration::from_secs(5);
	/// Default readiness path.
	pub const DEFAULT_PATH: &'static str = "health/ready";

	/// Overrides the number of probes (at least one probe is always issued).
	pub fn with_attempts(mut self, attempts: u32) -> Self {
		self.attempts = attempts.max(1);

		self
	}

	/// Overrides the delay between probes.
	pub fn with_interval(mut self, interval: StdDuration) -> Self {
		self.interval = interval;

		self
	}
}
impl Default for ReadinessPolicy {
	fn default() -> Self {
		Self {
			attempts: Self::DEFAULT_ATTEMPTS,
			interval: Self::DEFAULT_INTERVAL,
			probe_timeout: Self::DEFAULT_PROBE_TIMEOUT,
			path: Self::DEFAULT_PATH.into(),
		}
	}
}

/// Everything the admin client needs to reach and authenticate against the backend.
#[derive(Clone, Debug)]
pub struct ConnectionSettings {
	/// Server root, e.g. `http://localhost:8080`.
	pub server_url: Url,
	/// Administrator credentials.
	pub credentials: AdminCredentials,
	/// Readiness polling policy.
	pub readiness: ReadinessPolicy,
}
impl ConnectionSettings {
	/// Validates the server URL and credentials.
	pub fn new(server_url: &str, credentials: AdminCredentials) -> Result<Self, ConfigError> {
		if credentials.username.trim().is_empty() {
			return Err(ConfigError::MissingParameter { name: "KEYCLOAK_ADMIN_USERNAME" });
		}
		if credentials.password.is_blank() {
			return Err(ConfigError::MissingParameter { name: "KEYCLOAK_ADMIN_PASSWORD" });
		}

		let server_url = Url::parse(server_url.trim())?;

		if server_url.cannot_be_a_base() {
			return Err(ConfigError::NotABaseUrl { url: server_url.to_string() });
		}

		Ok(Self { server_url, credentials, readiness: ReadinessPolicy::default() })
	}

	/// Overrides the readiness policy.
	pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
		self.readiness = readiness;

		self
	}

	/// Appends path segments to the server URL, percent-encoding each segment.
	pub fn url_for<I, S>(&self, segments: I) -> Url
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.server_url.clone();

		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}

		url
	}

	/// Password-grant token endpoint of the administrative realm.
	pub fn token_endpoint(&self) -> Url {
		self.url_for([
			"realms",
			self.credentials.realm.as_str(),
			"protocol",
			"openid-connect",
			"token",
		])
	}

	/// Readiness probe URL.
	pub fn readiness_url(&self) -> Url {
		self.url_for(self.readiness.path.split('/').filter(|segment| !segment.is_empty()))
	}

	/// OIDC discovery document of a realm, for operator hints.
	pub fn discovery_url(&self, realm: &str) -> Url {
		self.url_for(["realms", realm, ".well-known", "openid-configuration"])
	}
}

/// Complete SMTP configuration injected into the realm payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpSettings {
	/// Mail relay host.
	pub host: String,
	/// Mail relay port.
	pub port: u16,
	/// Relay login.
	pub user: String,
	/// Relay password.
	pub password: Secret,
	/// Envelope sender.
	pub from: String,
	/// Sender display name.
	pub from_display_name: String,
}
impl SmtpSettings {
	/// Port used when none is supplied.
	pub const DEFAULT_PORT: u16 = 587;
	/// Sender used when none is supplied.
	pub const DEFAULT_FROM: &'static str = "noreply@padmini.systems";
	/// Display name used when none is supplied.
	pub const DEFAULT_FROM_DISPLAY_NAME: &'static str = "Padmini Systems";

	/// Renders the realm `smtpServer` block.
	pub fn realm_block(&self) -> Value {
		serde_json::json!({
			"host": self.host,
			"port": self.port.to_string(),
			"auth": "true",
			"ssl": "false",
			"starttls": "true",
			"user": self.user,
			"password": self.password.expose(),
			"from": self.from,
			"fromDisplayName": self.from_display_name,
		})
	}
}

/// Raw, possibly partial SMTP parameters as read from the environment.
#[derive(Clone, Debug, Default)]
pub struct SmtpParts {
	/// `SMTP_HOST`.
	pub host: Option<String>,
	/// `SMTP_PORT`.
	pub port: Option<u16>,
	/// `SMTP_USER`.
	pub user: Option<String>,
	/// `SMTP_PASSWORD`.
	pub password: Option<Secret>,
	/// `SMTP_FROM`.
	pub from: Option<String>,
	/// `SMTP_FROM_DISPLAY_NAME`.
	pub from_display_name: Option<String>,
}
impl SmtpParts {
	/// Returns complete settings when host, user, and password are all present.
	///
	/// A partial set is dropped with a warning.
	pub fn resolve(self) -> Option<SmtpSettings> {
		let host = non_blank(self.host);
		let user = non_blank(self.user);
		let password = self.password.filter(|secret| !secret.is_blank());

		match (host, user, password) {
			(Some(host), Some(user), Some(password)) => Some(SmtpSettings {
				host,
				port: self.port.unwrap_or(SmtpSettings::DEFAULT_PORT),
				user,
				password,
				from: non_blank(self.from).unwrap_or_else(|| SmtpSettings::DEFAULT_FROM.into()),
				from_display_name: non_blank(self.from_display_name)
					.unwrap_or_else(|| SmtpSettings::DEFAULT_FROM_DISPLAY_NAME.into()),
			}),
			(None, None, None) => None,
			_ => {
				tracing::warn!(
					"Partial SMTP configuration detected; SMTP_HOST, SMTP_USER, and SMTP_PASSWORD \
					 are all required. Email features are disabled."
				);

				None
			},
		}
	}
}

/// Fully resolved process configuration.
#[derive(Clone, Debug)]
pub struct Settings {
	/// Life-cycle action to run.
	pub action: Action,
	/// Backend connection parameters.
	pub connection: ConnectionSettings,
	/// Optional SMTP configuration for the realm.
	pub smtp: Option<SmtpSettings>,
	/// Optional blueprint file replacing the built-in blueprint.
	pub blueprint_path: Option<PathBuf>,
}
impl Settings {
	/// Loads the blueprint file, or the built-in blueprint when none is configured.
	pub fn load_blueprint(&self) -> Result<Blueprint> {
		match &self.blueprint_path {
			Some(path) => Blueprint::load(path),
			None => Ok(Blueprint::default()),
		}
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn credentials() -> AdminCredentials {
		AdminCredentials::new("admin", "admin")
	}

	#[test]
	fn connection_settings_reject_missing_password() {
		let err =
			ConnectionSettings::new("http://localhost:8080", AdminCredentials::new("admin", ""))
				.expect_err("Blank passwords should be rejected.");

		assert!(matches!(err, ConfigError::MissingParameter { name: "KEYCLOAK_ADMIN_PASSWORD" }));
	}

	#[test]
	fn connection_settings_reject_invalid_urls() {
		let err = ConnectionSettings::new("not a url", credentials())
			.expect_err("Unparseable URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidServerUrl { .. }));
	}

	#[test]
	fn urls_are_built_segment_wise() {
		let settings = ConnectionSettings::new("http://kc.local:8080/auth/", credentials())
			.expect("Connection settings should build.");

		assert_eq!(
			settings.token_endpoint().as_str(),
			"http://kc.local:8080/auth/realms/master/protocol/openid-connect/token"
		);
		assert_eq!(settings.readiness_url().as_str(), "http://kc.local:8080/auth/health/ready");
		assert_eq!(
			settings.url_for(["admin", "realms", "a b"]).as_str(),
			"http://kc.local:8080/auth/admin/realms/a%20b"
		);
	}

	#[test]
	fn smtp_requires_host_user_and_password() {
		let partial = SmtpParts {
			host: Some("smtp.example.com".into()),
			user: Some("mailer".into()),
			..Default::default()
		};

		assert!(partial.resolve().is_none());
		assert!(SmtpParts::default().resolve().is_none());

		let complete = SmtpParts {
			host: Some("smtp.example.com".into()),
			user: Some("mailer".into()),
			password: Some(Secret::new("pw")),
			..Default::default()
		}
		.resolve()
		.expect("Complete SMTP parts should resolve.");

		assert_eq!(complete.port, 587);
		assert_eq!(complete.from, SmtpSettings::DEFAULT_FROM);
		assert_eq!(complete.realm_block()["port"], "587");
		assert_eq!(complete.realm_block()["starttls"], "true");
	}

	#[test]
	fn readiness_policy_keeps_at_least_one_attempt() {
		let policy = ReadinessPolicy::default().with_attempts(0);

		assert_eq!(policy.attempts, 1);
	}
}
