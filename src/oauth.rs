//! Password-grant facade over the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	ClientId, EndpointNotSet, EndpointSet, HttpClientError, RequestTokenError,
	ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AdminCredentials},
	error::{ConfigError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Exchanges administrator credentials for a bearer token.
///
/// The administrative client is public, so no client secret is configured and `oauth2`
/// sends `client_id` in the form body.
pub(crate) struct PasswordGrant {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
}
impl PasswordGrant {
	pub(crate) fn new(
		token_endpoint: &Url,
		client_id: &str,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let token_url = TokenUrl::new(token_endpoint.to_string())
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;
		let oauth_client =
			BasicClient::new(ClientId::new(client_id.to_owned())).set_token_uri(token_url);

		Ok(Self { oauth_client, http_client })
	}

	pub(crate) async fn exchange(&self, credentials: &AdminCredentials) -> Result<AccessToken> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let username = ResourceOwnerUsername::new(credentials.username.clone());
		let password = ResourceOwnerPassword::new(credentials.password.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_password(&username, &password)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;
		let expires_in =
			response.expires_in().and_then(|lifetime| Duration::try_from(lifetime).ok());

		Ok(AccessToken::new(
			response.access_token().secret().to_owned(),
			OffsetDateTime::now_utc(),
			expires_in,
		))
	}
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(error, _body) => Error::Authentication {
			reason: format!("token response could not be parsed ({error})"),
			status,
		},
		RequestTokenError::Other(message) => Error::Authentication {
			reason: format!("unexpected token response ({message})"),
			status,
		},
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let reason = match response.error_description() {
		Some(description) => format!("{} ({description})", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	Error::Authentication { reason, status }
}

fn map_transport_error(err: HttpClientError<ReqwestError>, status: Option<u16>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => Error::Authentication {
			reason: format!("HTTP client error while calling the token endpoint ({message})"),
			status,
		},
		_ => Error::Authentication {
			reason: "HTTP client error while calling the token endpoint".into(),
			status,
		},
	}
}
