//! Realm descriptor.

// self
use crate::{_prelude::*, config::SmtpSettings};

/// Desired realm configuration.
///
/// The fields the provisioner checks are typed; every other realm setting rides along
/// untouched in [`RealmDescriptor::settings`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmDescriptor {
	/// Realm name; also its remote handle.
	pub realm: String,
	/// Human-readable name.
	pub display_name: String,
	/// Whether the realm accepts logins.
	pub enabled: bool,
	/// `none`, `external`, or `all`.
	pub ssl_required: String,
	/// Whether self-registration is allowed.
	pub registration_allowed: bool,
	/// Whether email addresses must be verified.
	pub verify_email: bool,
	/// Remaining realm representation fields.
	#[serde(flatten)]
	pub settings: Map<String, Value>,
}
impl RealmDescriptor {
	/// Renders the create/update payload, adding an `smtpServer` block when SMTP is configured.
	pub fn payload(&self, smtp: Option<&SmtpSettings>) -> Result<Value> {
		let mut payload = serde_json::to_value(self)?;

		if let Value::Object(fields) = &mut payload {
			fields.insert("id".into(), Value::String(self.realm.clone()));

			if let Some(smtp) = smtp {
				fields.insert("smtpServer".into(), smtp.realm_block());
			}
		}

		Ok(payload)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Secret;

	fn realm() -> RealmDescriptor {
		RealmDescriptor {
			realm: "acme".into(),
			display_name: "Acme".into(),
			enabled: true,
			ssl_required: "external".into(),
			registration_allowed: false,
			verify_email: true,
			settings: Map::from_iter([("rememberMe".to_owned(), Value::Bool(true))]),
		}
	}

	#[test]
	fn payload_flattens_settings_and_sets_id() {
		let payload = realm().payload(None).expect("Realm payload should serialize.");

		assert_eq!(payload["id"], "acme");
		assert_eq!(payload["displayName"], "Acme");
		assert_eq!(payload["sslRequired"], "external");
		assert_eq!(payload["rememberMe"], true);
		assert!(payload.get("smtpServer").is_none());
	}

	#[test]
	fn payload_includes_smtp_when_configured() {
		let smtp = SmtpSettings {
			host: "smtp.acme.test".into(),
			port: 2525,
			user: "mailer".into(),
			password: Secret::new("pw"),
			from: "noreply@acme.test".into(),
			from_display_name: "Acme".into(),
		};
		let payload = realm().payload(Some(&smtp)).expect("Realm payload should serialize.");

		assert_eq!(payload["smtpServer"]["host"], "smtp.acme.test");
		assert_eq!(payload["smtpServer"]["port"], "2525");
		assert_eq!(payload["smtpServer"]["password"], "pw");
	}
}
