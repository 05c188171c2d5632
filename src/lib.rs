//! Idempotent, dependency-ordered provisioning of an identity-provider realm over its admin
//! REST API: the realm itself, client scopes with their protocol mappers, OAuth clients, and
//! the roles, groups, and user-profile attributes that ride on top.
//!
//! The [`orchestrator::Orchestrator`] drives one [`manager::ResourceManager`] per resource
//! family through a single [`admin::AdminClient`], in create, destroy, or validate mode.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod admin;
pub mod auth;
pub mod blueprint;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod oauth;
pub mod obs;
pub mod orchestrator;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// std
	use std::time::Duration as StdDuration;
	// self
	use crate::{
		admin::AdminClient,
		auth::AdminCredentials,
		config::{ConnectionSettings, ReadinessPolicy},
	};

	/// Administrator username used by test fixtures.
	pub const TEST_ADMIN_USERNAME: &str = "admin";
	/// Administrator password used by test fixtures.
	pub const TEST_ADMIN_PASSWORD: &str = "admin";
	/// Bearer token returned by the mocked token endpoint.
	pub const TEST_ACCESS_TOKEN: &str = "test-admin-token";

	/// Builds connection settings pointing at `base_url` with a single, immediate readiness
	/// probe.
	pub fn test_connection_settings(base_url: &str) -> ConnectionSettings {
		ConnectionSettings::new(
			base_url,
			AdminCredentials::new(TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD),
		)
		.expect("Test connection settings should be valid.")
		.with_readiness(
			ReadinessPolicy::default().with_attempts(1).with_interval(StdDuration::ZERO),
		)
	}

	/// Builds an unconnected admin client pointing at `base_url`.
	pub fn test_admin_client(base_url: &str) -> AdminClient {
		AdminClient::new(test_connection_settings(base_url))
			.expect("Test admin client should build.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
