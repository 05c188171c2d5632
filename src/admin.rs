//! Resource Client for the identity provider's admin REST API.
//!
//! [`AdminClient`] is fail-soft: the verb methods never return errors. Every transport error,
//! unexpected status, or unparseable body is logged at the verb boundary and collapsed into an
//! absent or negative result, so managers only decide policy. The one fallible entry point is
//! [`AdminClient::connect`], which gates every resource operation.

pub mod resources;

// crates.io
use reqwest::{Method, RequestBuilder, StatusCode, header::LOCATION};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::ConnectionSettings,
	error::TransportError,
	http::{ReqwestHttpClient, body_preview},
	oauth::PasswordGrant,
};

/// Remote resource families managed through the admin API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
	/// Realm (its name is its handle).
	Realm,
	/// Client scope.
	ClientScope,
	/// Protocol mapper attached to a client scope.
	ProtocolMapper,
	/// OAuth client.
	Client,
	/// Realm role (its name is its handle).
	Role,
	/// Group.
	Group,
}
impl ResourceKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResourceKind::Realm => "realm",
			ResourceKind::ClientScope => "client_scope",
			ResourceKind::ProtocolMapper => "protocol_mapper",
			ResourceKind::Client => "client",
			ResourceKind::Role => "role",
			ResourceKind::Group => "group",
		}
	}
}
impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Identifier the backend uses for a resource within one run.
///
/// Handles are resolved by natural key on every manager invocation and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RemoteHandle {
	/// Resource family.
	pub kind: ResourceKind,
	/// Remote identifier (UUID, or the name for realms and roles).
	pub id: String,
}
impl RemoteHandle {
	/// Creates a handle from a known identifier.
	pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
		Self { kind, id: id.into() }
	}

	/// Reads the `id` field of a resource representation.
	pub fn from_representation(kind: ResourceKind, representation: &Value) -> Option<Self> {
		representation.get("id").and_then(Value::as_str).map(|id| Self::new(kind, id))
	}
}
impl Display for RemoteHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}:{}", self.kind, self.id)
	}
}

/// Admin API path relative to `{server}/admin`, built segment by segment.
///
/// Segments are percent-encoded only when the final URL is rendered, so names containing `/`,
/// spaces, or `?` never change the path structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminPath {
	segments: Vec<String>,
	query: Vec<(String, String)>,
}
impl AdminPath {
	/// `/realms`.
	pub fn realms() -> Self {
		Self::default().join("realms")
	}

	/// `/realms/{realm}`.
	pub fn realm(realm: &str) -> Self {
		Self::realms().join(realm)
	}

	/// Appends one path segment.
	pub fn join(mut self, segment: impl Into<String>) -> Self {
		self.segments.push(segment.into());

		self
	}

	/// Appends one query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Renders the absolute URL below the server's `admin` root.
	pub fn to_url(&self, settings: &ConnectionSettings) -> Url {
		let segments = self.segments.iter().map(String::as_str);
		let mut url = settings.url_for(std::iter::once("admin").chain(segments));

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(&self.query);
		}

		url
	}
}
impl Display for AdminPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for segment in &self.segments {
			write!(f, "/{segment}")?;
		}
		for (i, (key, value)) in self.query.iter().enumerate() {
			write!(f, "{}{key}={value}", if i == 0 { '?' } else { '&' })?;
		}

		Ok(())
	}
}

/// Result of a POST that creates a resource.
#[derive(Clone, Debug, PartialEq)]
pub enum PostOutcome {
	/// 200/201.
	Created(Created),
	/// 409: the resource already exists; the desired end state already holds.
	AlreadyExists,
	/// Any other status, a transport failure, or a client-side error.
	Failed,
}
impl PostOutcome {
	/// Returns true for [`PostOutcome::Created`] and [`PostOutcome::AlreadyExists`].
	pub fn is_success(&self) -> bool {
		!matches!(self, PostOutcome::Failed)
	}

	/// Identifier reported by a successful creation, when the backend returned one.
	pub fn created_id(&self) -> Option<&str> {
		match self {
			PostOutcome::Created(created) => created.id.as_deref(),
			_ => None,
		}
	}
}

/// Details returned by a successful creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Created {
	/// Identifier from the body's `id` field or the last `Location` segment.
	pub id: Option<String>,
	/// Parsed response body, when one was returned.
	pub body: Option<Value>,
}

/// Result of a DELETE.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
	/// 200/204.
	Deleted,
	/// 404: nothing to delete.
	Absent,
	/// Any other status or a transport failure.
	Failed,
}
impl DeleteOutcome {
	/// Deletion is idempotent: absence counts as success.
	pub fn is_success(self) -> bool {
		!matches!(self, DeleteOutcome::Failed)
	}
}

struct RawResponse {
	status: StatusCode,
	location: Option<String>,
	body: String,
}

/// Authenticated REST client shared by every manager for one run.
#[derive(Debug)]
pub struct AdminClient {
	settings: ConnectionSettings,
	http_client: ReqwestHttpClient,
	token: RwLock<Option<AccessToken>>,
}
impl AdminClient {
	/// Builds an unconnected client with the default transport.
	pub fn new(settings: ConnectionSettings) -> Result<Self> {
		Ok(Self::with_http_client(settings, ReqwestHttpClient::new()?))
	}

	/// Builds an unconnected client on top of an existing transport.
	pub fn with_http_client(settings: ConnectionSettings, http_client: ReqwestHttpClient) -> Self {
		Self { settings, http_client, token: RwLock::new(None) }
	}

	/// Connection parameters the client was built with.
	pub fn settings(&self) -> &ConnectionSettings {
		&self.settings
	}

	/// Returns true once a bearer token is held.
	pub fn is_connected(&self) -> bool {
		self.token.read().is_some()
	}

	/// Waits for readiness, then authenticates.
	///
	/// No token request is issued when the backend never becomes ready.
	pub async fn connect(&self) -> Result<()> {
		self.wait_until_ready().await?;
		self.authenticate().await
	}

	/// Polls the readiness endpoint with the configured attempts and interval.
	pub async fn wait_until_ready(&self) -> Result<()> {
		let policy = &self.settings.readiness;
		let url = self.settings.readiness_url();

		for attempt in 1..=policy.attempts {
			match self.http_client.get(url.clone()).timeout(policy.probe_timeout).send().await {
				Ok(response) if response.status() == StatusCode::OK => {
					tracing::info!(attempt, "Backend is ready.");

					return Ok(());
				},
				Ok(response) => tracing::info!(
					attempt,
					attempts = policy.attempts,
					status = response.status().as_u16(),
					"Backend not ready yet."
				),
				Err(e) => tracing::info!(
					attempt,
					attempts = policy.attempts,
					error = %e,
					"Backend not reachable yet."
				),
			}

			if attempt < policy.attempts {
				tokio::time::sleep(policy.interval).await;
			}
		}

		tracing::error!(attempts = policy.attempts, "Backend failed to become ready.");

		Err(Error::NotReady { attempts: policy.attempts })
	}

	/// Exchanges the administrator credentials for a bearer token and stores it.
	pub async fn authenticate(&self) -> Result<()> {
		let grant = PasswordGrant::new(
			&self.settings.token_endpoint(),
			&self.settings.credentials.client_id,
			self.http_client.clone(),
		)?;
		let token = grant.exchange(&self.settings.credentials).await?;

		tracing::info!(
			realm = %self.settings.credentials.realm,
			expires_at = ?token.expires_at(),
			"Authenticated against the admin API."
		);

		*self.token.write() = Some(token);

		Ok(())
	}

	/// GET: 200 yields the parsed body; 404 and every failure yield `None`.
	pub async fn get(&self, path: &AdminPath) -> Option<Value> {
		let response = match self.send(Method::GET, path, None).await {
			Ok(response) => response,
			Err(e) => {
				log_request_error(&Method::GET, path, &e);

				return None;
			},
		};

		match response.status {
			StatusCode::OK => parse_body(&Method::GET, path, &response.body),
			StatusCode::NOT_FOUND => {
				tracing::debug!(path = %path, "Resource not found.");

				None
			},
			_ => {
				log_unexpected_status(&Method::GET, path, &response);

				None
			},
		}
	}

	/// POST: 200/201 is a creation, 409 means the resource already exists.
	pub async fn post(&self, path: &AdminPath, body: &Value) -> PostOutcome {
		let response = match self.send(Method::POST, path, Some(body)).await {
			Ok(response) => response,
			Err(e) => {
				log_request_error(&Method::POST, path, &e);

				return PostOutcome::Failed;
			},
		};

		match response.status {
			StatusCode::OK | StatusCode::CREATED => {
				let body = if response.body.trim().is_empty() {
					None
				} else {
					serde_json::from_str::<Value>(&response.body).ok()
				};
				let id = body
					.as_ref()
					.and_then(|body| body.get("id"))
					.and_then(Value::as_str)
					.map(str::to_owned)
					.or_else(|| response.location.as_deref().and_then(last_location_segment));

				PostOutcome::Created(Created { id, body })
			},
			StatusCode::CONFLICT => {
				tracing::info!(path = %path, outcome = "skipped", "Resource already exists.");

				PostOutcome::AlreadyExists
			},
			_ => {
				log_unexpected_status(&Method::POST, path, &response);

				PostOutcome::Failed
			},
		}
	}

	/// PUT: 200/204 is success.
	pub async fn put(&self, path: &AdminPath, body: &Value) -> bool {
		match self.send(Method::PUT, path, Some(body)).await {
			Ok(response) if matches!(response.status, StatusCode::OK | StatusCode::NO_CONTENT) =>
				true,
			Ok(response) => {
				log_unexpected_status(&Method::PUT, path, &response);

				false
			},
			Err(e) => {
				log_request_error(&Method::PUT, path, &e);

				false
			},
		}
	}

	/// DELETE: 200/204 deletes, 404 is already absent.
	pub async fn delete(&self, path: &AdminPath) -> DeleteOutcome {
		match self.send(Method::DELETE, path, None).await {
			Ok(response) => match response.status {
				StatusCode::OK | StatusCode::NO_CONTENT => DeleteOutcome::Deleted,
				StatusCode::NOT_FOUND => {
					tracing::debug!(path = %path, "Resource already absent.");

					DeleteOutcome::Absent
				},
				_ => {
					log_unexpected_status(&Method::DELETE, path, &response);

					DeleteOutcome::Failed
				},
			},
			Err(e) => {
				log_request_error(&Method::DELETE, path, &e);

				DeleteOutcome::Failed
			},
		}
	}

	fn request(&self, method: Method, path: &AdminPath) -> Result<RequestBuilder> {
		let guard = self.token.read();
		let token = guard.as_ref().ok_or(Error::NotConnected)?;

		if token.is_expired_at(OffsetDateTime::now_utc()) {
			tracing::warn!(
				path = %path,
				"Access token has expired; the request will likely be rejected."
			);
		}

		Ok(self
			.http_client
			.request(method, path.to_url(&self.settings))
			.bearer_auth(token.bearer()))
	}

	async fn send(
		&self,
		method: Method,
		path: &AdminPath,
		body: Option<&Value>,
	) -> Result<RawResponse> {
		let mut request = self.request(method, path)?;

		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let location = response
			.headers()
			.get(LOCATION)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let body = response.text().await.map_err(TransportError::from)?;

		Ok(RawResponse { status, location, body })
	}
}

fn parse_body(method: &Method, path: &AdminPath, body: &str) -> Option<Value> {
	match serde_json::from_str(body) {
		Ok(value) => Some(value),
		Err(e) => {
			tracing::error!(
				method = %method,
				path = %path,
				error = %e,
				body = %body_preview(body),
				"Admin API returned an unparseable body."
			);

			None
		},
	}
}

fn last_location_segment(location: &str) -> Option<String> {
	location
		.trim_end_matches('/')
		.rsplit('/')
		.next()
		.filter(|segment| !segment.is_empty())
		.map(str::to_owned)
}

fn log_request_error(method: &Method, path: &AdminPath, error: &Error) {
	tracing::error!(method = %method, path = %path, error = %error, "Admin API request failed.");
}

fn log_unexpected_status(method: &Method, path: &AdminPath, response: &RawResponse) {
	tracing::error!(
		method = %method,
		path = %path,
		status = response.status.as_u16(),
		body = %body_preview(&response.body),
		"Admin API returned an unexpected status."
	);
}
