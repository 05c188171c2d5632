//! Process boundary: `.env` loading, argument parsing, and the exit status.

// std
use std::{path::PathBuf, process::ExitCode, time::Duration as StdDuration};
// crates.io
use clap::{Args, Parser};
// self
use crate::{
	_prelude::*,
	auth::{AdminCredentials, Secret},
	blueprint::Blueprint,
	config::{ConnectionSettings, ReadinessPolicy, Settings, SmtpParts},
	error::ConfigError,
	obs,
	orchestrator::{Action, Orchestrator, RunReport},
};

/// Provision, tear down, or verify an identity-provider realm over its admin REST API.
#[derive(Debug, Parser)]
#[command(name = "realm-provisioner", author, version, about, long_about = None)]
pub struct Cli {
	/// Life-cycle action: create, destroy, or validate.
	#[arg(long, env = "ACTION")]
	pub action: Option<String>,

	/// Server root URL.
	#[arg(long, env = "KEYCLOAK_URL", default_value = "http://localhost:8080")]
	pub server_url: String,

	/// Administrator username.
	#[arg(long, env = "KEYCLOAK_ADMIN_USERNAME")]
	pub admin_username: Option<String>,

	/// Administrator password.
	#[arg(long, env = "KEYCLOAK_ADMIN_PASSWORD", hide_env_values = true)]
	pub admin_password: Option<String>,

	/// Realm holding the administrator account.
	#[arg(long, env = "KEYCLOAK_ADMIN_REALM", default_value = AdminCredentials::DEFAULT_REALM)]
	pub admin_realm: String,

	/// Public client used for the password grant.
	#[arg(
		long,
		env = "KEYCLOAK_ADMIN_CLIENT_ID",
		default_value = AdminCredentials::DEFAULT_CLIENT_ID
	)]
	pub admin_client_id: String,

	/// Readiness probes before giving up.
	#[arg(
		long,
		env = "KEYCLOAK_READY_ATTEMPTS",
		default_value_t = ReadinessPolicy::DEFAULT_ATTEMPTS
	)]
	pub readiness_attempts: u32,

	/// Seconds between readiness probes.
	#[arg(
		long,
		env = "KEYCLOAK_READY_INTERVAL_SECS",
		default_value_t = ReadinessPolicy::DEFAULT_INTERVAL.as_secs()
	)]
	pub readiness_interval_secs: u64,

	/// JSON blueprint replacing the built-in one.
	#[arg(long, env = "PROVISIONER_BLUEPRINT")]
	pub blueprint: Option<PathBuf>,

	/// Realm SMTP settings.
	#[command(flatten)]
	pub smtp: SmtpArgs,

	/// Enable debug logging (ignored when `RUST_LOG` is set).
	#[arg(short, long)]
	pub verbose: bool,
}
impl Cli {
	/// Validates the arguments and resolves them into [`Settings`].
	pub fn into_settings(self) -> Result<Settings, ConfigError> {
		let action = self
			.action
			.as_deref()
			.filter(|action| !action.trim().is_empty())
			.ok_or(ConfigError::MissingParameter { name: "ACTION" })?
			.parse::<Action>()?;
		let credentials = AdminCredentials::new(
			self.admin_username.unwrap_or_default(),
			self.admin_password.unwrap_or_default(),
		)
		.with_realm(self.admin_realm)
		.with_client_id(self.admin_client_id);
		let readiness = ReadinessPolicy::default()
			.with_attempts(self.readiness_attempts)
			.with_interval(StdDuration::from_secs(self.readiness_interval_secs));
		let connection =
			ConnectionSettings::new(&self.server_url, credentials)?.with_readiness(readiness);

		Ok(Settings {
			action,
			connection,
			smtp: self.smtp.into_parts().resolve(),
			blueprint_path: self.blueprint,
		})
	}
}

/// SMTP arguments; used only when host, user, and password are all present.
#[derive(Debug, Args)]
pub struct SmtpArgs {
	/// SMTP relay host.
	#[arg(long = "smtp-host", env = "SMTP_HOST")]
	pub host: Option<String>,
	/// SMTP relay port.
	#[arg(long = "smtp-port", env = "SMTP_PORT")]
	pub port: Option<u16>,
	/// SMTP login.
	#[arg(long = "smtp-user", env = "SMTP_USER")]
	pub user: Option<String>,
	/// SMTP password.
	#[arg(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
	pub password: Option<String>,
	/// Envelope sender.
	#[arg(long = "smtp-from", env = "SMTP_FROM")]
	pub from: Option<String>,
	/// Sender display name.
	#[arg(long = "smtp-from-display-name", env = "SMTP_FROM_DISPLAY_NAME")]
	pub from_display_name: Option<String>,
}
impl SmtpArgs {
	fn into_parts(self) -> SmtpParts {
		SmtpParts {
			host: self.host,
			port: self.port,
			user: self.user,
			password: self.password.map(Secret::from),
			from: self.from,
			from_display_name: self.from_display_name,
		}
	}
}

/// Parses the process environment and runs the selected action; the exit code is 0 only on
/// success.
pub fn run() -> ExitCode {
	let dotenv = dotenvy::dotenv();
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			let _ = e.print();

			return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
		},
	};

	obs::init_logging(cli.verbose);

	if let Ok(path) = &dotenv {
		tracing::debug!(path = %path.display(), "Loaded environment file.");
	}

	let settings = match cli.into_settings() {
		Ok(settings) => settings,
		Err(e) => {
			tracing::error!(error = %e, "Invalid configuration.");

			return ExitCode::FAILURE;
		},
	};
	let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
		Ok(runtime) => runtime,
		Err(e) => {
			tracing::error!(error = %e, "Failed to start the async runtime.");

			return ExitCode::FAILURE;
		},
	};
	let action = settings.action;

	match runtime.block_on(execute(&settings)) {
		Ok(report) if report.is_success() => {
			tracing::info!(action = action.as_str(), "Action completed successfully.");

			ExitCode::SUCCESS
		},
		Ok(_) => {
			tracing::error!(action = action.as_str(), "Action failed.");

			ExitCode::FAILURE
		},
		Err(e) => {
			tracing::error!(action = action.as_str(), error = %e, "Action could not start.");

			ExitCode::FAILURE
		},
	}
}

/// Loads the blueprint, initializes the orchestrator, and runs the configured action.
pub async fn execute(settings: &Settings) -> Result<RunReport> {
	let blueprint = settings.load_blueprint()?;
	let orchestrator = Orchestrator::initialize(settings, blueprint.clone()).await?;
	let report = orchestrator.run(settings.action).await;

	if settings.action == Action::Create && report.is_success() {
		log_success_summary(&settings.connection, &blueprint);
	}

	Ok(report)
}

fn log_success_summary(connection: &ConnectionSettings, blueprint: &Blueprint) {
	let realm = &blueprint.realm.realm;
	let scopes =
		blueprint.client_scopes.iter().map(|scope| scope.name.as_str()).collect::<Vec<_>>();
	let claims = blueprint
		.client_scopes
		.iter()
		.flat_map(|scope| &scope.protocol_mappers)
		.map(|mapper| mapper.config.get("claim.name").map_or(mapper.name.as_str(), String::as_str))
		.collect::<Vec<_>>();

	tracing::info!(realm = %realm, "Realm configuration completed.");
	tracing::info!(url = %connection.url_for(["admin"]), "Admin console.");
	tracing::info!(url = %connection.discovery_url(realm), "OIDC discovery.");
	tracing::info!(
		scope = %scopes.join(" "),
		claims = %claims.join(", "),
		"Token claims available."
	);

	if !blueprint.user_profile.attributes.is_empty() {
		tracing::info!(
			"Missing profile attributes can be added under Realm Settings > User Profile."
		);
	}
}
