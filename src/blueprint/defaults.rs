//! Built-in blueprint for the Padmini Systems realm.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	blueprint::{
		Blueprint, ClientDescriptor, ClientScopeDescriptor, GroupDescriptor,
		ProfileAttributeDescriptor, ProtocolMapperDescriptor, RealmDescriptor, RoleDescriptor,
		UserProfileDescriptor,
	},
};

const REALM_NAME: &str = "padmini-systems";
const REALM_DISPLAY_NAME: &str = "Padmini Systems";
const OIDC: &str = "openid-connect";
const DEFAULT_SCOPES: [&str; 6] = ["openid", "profile", "email", "web-origins", "acr", "roles"];
const OPTIONAL_SCOPES: [&str; 4] = ["mobile", "address", "phone", "offline_access"];
const TOKEN_CLAIMS: [(&str, &str); 3] = [
	("id.token.claim", "true"),
	("access.token.claim", "true"),
	("userinfo.token.claim", "true"),
];

pub(super) fn padmini_systems() -> Blueprint {
	Blueprint {
		realm: realm(),
		client_scopes: vec![openid_scope(), profile_scope(), email_scope(), mobile_scope()],
		clients: vec![ppcs_web_app(), asm_microservices()],
		user_profile: user_profile(),
	}
}

fn realm() -> RealmDescriptor {
	let settings = serde_json::json!({
		"registrationEmailAsUsername": false,
		"rememberMe": true,
		"loginWithEmailAllowed": true,
		"duplicateEmailsAllowed": false,
		"resetPasswordAllowed": true,
		"editUsernameAllowed": false,
		"bruteForceProtected": true,
		"permanentLockout": false,
		"maxFailureWaitSeconds": 900,
		"minimumQuickLoginWaitSeconds": 60,
		"waitIncrementSeconds": 60,
		"quickLoginCheckMilliSeconds": 1000,
		"maxDeltaTimeSeconds": 43200,
		"failureFactor": 30,
		"loginTheme": "keycloak",
		"accountTheme": "keycloak.v2",
		"adminTheme": "keycloak.v2",
		"emailTheme": "keycloak",
		"accessTokenLifespan": 300,
		"accessTokenLifespanForImplicitFlow": 900,
		"ssoSessionIdleTimeout": 1800,
		"ssoSessionMaxLifespan": 36000,
		"offlineSessionIdleTimeout": 2592000,
		"offlineSessionMaxLifespan": 5184000,
		"accessCodeLifespan": 60,
		"accessCodeLifespanUserAction": 300,
		"accessCodeLifespanLogin": 1800,
		"actionTokenGeneratedByAdminLifespan": 43200,
		"actionTokenGeneratedByUserLifespan": 300,
		"internationalizationEnabled": true,
		"supportedLocales": ["en", "hi"],
		"defaultLocale": "en",
	});

	RealmDescriptor {
		realm: REALM_NAME.into(),
		display_name: REALM_DISPLAY_NAME.into(),
		enabled: true,
		ssl_required: "external".into(),
		registration_allowed: true,
		verify_email: true,
		settings: match settings {
			Value::Object(map) => map,
			_ => Map::new(),
		},
	}
}

fn openid_scope() -> ClientScopeDescriptor {
	scope(
		"openid",
		"OpenID Connect built-in scope: openid",
		false,
		vec![mapper(
			"sub",
			"oidc-sub-mapper",
			&[("access.token.claim", "true"), ("id.token.claim", "true")],
		)],
	)
}

fn profile_scope() -> ClientScopeDescriptor {
	scope(
		"profile",
		"OpenID Connect built-in scope: profile",
		true,
		vec![
			property_mapper("username", "username", "preferred_username", "String"),
			property_mapper("given name", "firstName", "given_name", "String"),
			property_mapper("family name", "lastName", "family_name", "String"),
			mapper("full name", "oidc-full-name-mapper", &TOKEN_CLAIMS),
		],
	)
}

fn email_scope() -> ClientScopeDescriptor {
	scope(
		"email",
		"OpenID Connect built-in scope: email",
		true,
		vec![
			property_mapper("email", "email", "email", "String"),
			property_mapper("email verified", "emailVerified", "email_verified", "boolean"),
		],
	)
}

fn mobile_scope() -> ClientScopeDescriptor {
	let mut mobile = property_mapper("mobile number", "mobile", "mobile", "String");

	mobile.protocol_mapper = "oidc-usermodel-attribute-mapper".into();

	scope("mobile", "Mobile number information", true, vec![mobile])
}

fn ppcs_web_app() -> ClientDescriptor {
	ClientDescriptor {
		client_id: "ppcs-web-app".into(),
		name: "PPCS Web Application".into(),
		description: Some("Padmini Private Cloud Service Web Application".into()),
		enabled: true,
		public_client: true,
		standard_flow_enabled: true,
		implicit_flow_enabled: false,
		direct_access_grants_enabled: true,
		service_accounts_enabled: false,
		authorization_services_enabled: false,
		secret: None,
		root_url: None,
		admin_url: None,
		base_url: None,
		redirect_uris: strings(&[
			"http://localhost:3000/api/auth/callback/keycloak",
			"https://ppcs.padmini.systems/api/auth/callback/keycloak",
			"https://app.padmini.systems/api/auth/callback/keycloak",
		]),
		web_origins: strings(&[
			"http://localhost:3000",
			"https://ppcs.padmini.systems",
			"https://app.padmini.systems",
		]),
		attributes: string_map(&[
			("oidc.ciba.grant.enabled", "false"),
			("oauth2.device.authorization.grant.enabled", "false"),
			("backchannel.logout.session.required", "true"),
			("backchannel.logout.revoke.offline.tokens", "false"),
		]),
		default_client_scopes: strings(&DEFAULT_SCOPES),
		optional_client_scopes: strings(&OPTIONAL_SCOPES),
	}
}

fn asm_microservices() -> ClientDescriptor {
	ClientDescriptor {
		client_id: "asm-microservices".into(),
		name: "ASM Microservices".into(),
		description: Some("Asset Management Microservices Client".into()),
		enabled: true,
		public_client: false,
		standard_flow_enabled: true,
		implicit_flow_enabled: false,
		direct_access_grants_enabled: false,
		service_accounts_enabled: true,
		authorization_services_enabled: true,
		secret: Some(Secret::new("asm-microservices-secret-change-me")),
		root_url: Some("https://api.padmini.systems".into()),
		admin_url: Some("https://api.padmini.systems".into()),
		base_url: Some("/".into()),
		redirect_uris: strings(&["https://api.padmini.systems/*", "http://localhost:8080/*"]),
		web_origins: strings(&["https://api.padmini.systems", "http://localhost:8080"]),
		attributes: BTreeMap::new(),
		default_client_scopes: strings(&DEFAULT_SCOPES),
		optional_client_scopes: strings(&OPTIONAL_SCOPES),
	}
}

fn user_profile() -> UserProfileDescriptor {
	let mobile = serde_json::json!({
		"validations": {
			"pattern": {
				"pattern": "^[+]?[1-9]\\d{9,14}$",
				"error-message": "Enter valid mobile with country code",
			},
			"length": { "min": 10, "max": 15 },
		},
		"annotations": { "inputType": "phone" },
		"required": { "roles": ["user"] },
		"permissions": { "view": ["admin", "user"], "edit": ["admin", "user"] },
	});

	UserProfileDescriptor {
		roles: vec![
			RoleDescriptor {
				name: "user".into(),
				description: "Default user role for all authenticated users".into(),
			},
			RoleDescriptor {
				name: "admin".into(),
				description: "Administrator role with full access".into(),
			},
		],
		groups: vec![
			GroupDescriptor { name: "users".into(), path: "/users".into() },
			GroupDescriptor { name: "admins".into(), path: "/admins".into() },
		],
		attributes: vec![ProfileAttributeDescriptor {
			name: "mobile".into(),
			display_name: Some("Mobile Number".into()),
			schema: match mobile {
				Value::Object(map) => map,
				_ => Map::new(),
			},
		}],
	}
}

fn scope(
	name: &str,
	description: &str,
	on_consent_screen: bool,
	protocol_mappers: Vec<ProtocolMapperDescriptor>,
) -> ClientScopeDescriptor {
	ClientScopeDescriptor {
		name: name.into(),
		description: description.into(),
		protocol: OIDC.into(),
		attributes: string_map(&[
			("include.in.token.scope", "true"),
			("display.on.consent.screen", if on_consent_screen { "true" } else { "false" }),
		]),
		protocol_mappers,
	}
}

fn mapper(name: &str, provider: &str, config: &[(&str, &str)]) -> ProtocolMapperDescriptor {
	ProtocolMapperDescriptor {
		name: name.into(),
		protocol: OIDC.into(),
		protocol_mapper: provider.into(),
		consent_required: false,
		config: string_map(config),
	}
}

fn property_mapper(
	name: &str,
	user_attribute: &str,
	claim: &str,
	json_type: &str,
) -> ProtocolMapperDescriptor {
	let mut mapper = mapper(name, "oidc-usermodel-property-mapper", &TOKEN_CLAIMS);

	mapper.config.insert("user.attribute".into(), user_attribute.into());
	mapper.config.insert("claim.name".into(), claim.into());
	mapper.config.insert("jsonType.label".into(), json_type.into());

	mapper
}

fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| (*value).to_owned()).collect()
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
	pairs.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())).collect()
}
