//! Roles, groups, and user-profile attribute descriptors.

// self
use crate::_prelude::*;

/// Realm role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescriptor {
	/// Role name; also its remote handle.
	pub name: String,
	/// Role description.
	#[serde(default)]
	pub description: String,
}

/// Top-level group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptor {
	/// Group name; the natural lookup key.
	pub name: String,
	/// Group path, e.g. `/admins`.
	pub path: String,
}

/// Attribute appended to the realm's user-profile schema.
///
/// Only `name` is interpreted; validations, annotations, and permissions are passed through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributeDescriptor {
	/// Attribute name.
	pub name: String,
	/// Label shown in forms.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Validators, annotations, required roles, and permissions.
	#[serde(flatten)]
	pub schema: Map<String, Value>,
}

/// Everything the user-profile manager provisions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfileDescriptor {
	/// Realm roles.
	#[serde(default)]
	pub roles: Vec<RoleDescriptor>,
	/// Groups.
	#[serde(default)]
	pub groups: Vec<GroupDescriptor>,
	/// Profile attributes.
	#[serde(default)]
	pub attributes: Vec<ProfileAttributeDescriptor>,
}
