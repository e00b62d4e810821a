//! SCIM Resource Construction and Replacement
//!
//! Builds User and Group resources from whatever attribute payload a
//! provisioning client sent, and applies PUT-style full replacements to
//! existing resources.
//!
//! Clients are wildly inconsistent about payload shape (Keycloak, Okta and
//! Azure AD all spell things differently), so construction is deliberately
//! forgiving: canonical attributes win, known aliases fill gaps, and anything
//! missing gets a usable default. A field of the wrong JSON type is treated
//! as absent. Unknown fields are ignored and never stored.

use chrono::Utc;
use serde_json::Value;

use super::types::{SCHEMA_GROUP, SCHEMA_USER, ScimEmail, ScimGroup, ScimMeta, ScimName, ScimUser};

// =============================================================================
// User Construction
// =============================================================================

/// Build a new User from client-supplied attributes.
///
/// Defaulting rules:
/// - userName: `userName`, then `username`, then `user_` + first 8 chars of id
/// - name: the `name` sub-object if present, otherwise synthesized from
///   `givenName`/`firstName` and `familyName`/`lastName`, falling back to
///   "Unknown User"
/// - emails: the `emails` array if present, otherwise a single primary entry
///   from the `email` shorthand, otherwise empty
/// - active: defaults to true
pub fn build_user(id: &str, attrs: &Value, base_url: &str) -> ScimUser {
    let now = Utc::now();

    let user_name = str_field(attrs, "userName")
        .or_else(|| str_field(attrs, "username"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("user_{}", id_prefix(id)));

    let name = match attrs.get("name") {
        Some(Value::Object(_)) => parse_name(&attrs["name"]),
        _ => ScimName::from_names(
            str_field(attrs, "givenName")
                .or_else(|| str_field(attrs, "firstName"))
                .unwrap_or("Unknown"),
            str_field(attrs, "familyName")
                .or_else(|| str_field(attrs, "lastName"))
                .unwrap_or("User"),
        ),
    };

    ScimUser {
        schemas: vec![SCHEMA_USER.to_string()],
        id: id.to_string(),
        user_name,
        name: Some(name),
        emails: parse_emails(attrs),
        active: bool_field(attrs, "active").unwrap_or(true),
        meta: Some(
            ScimMeta::user(now, now).with_location(format!("{}/Users/{}", base_url, id)),
        ),
    }
}

/// Apply a PUT replacement to an existing User.
///
/// Recognized fields (userName, name, emails, active) overwrite the stored
/// value; absent or wrong-typed fields leave it untouched. The create-time
/// aliases do not apply here. Client-sent id, schemas and meta are ignored:
/// meta keeps its created timestamp and location, with lastModified bumped
/// to now.
pub fn merge_user(existing: &ScimUser, attrs: &Value) -> ScimUser {
    let mut user = existing.clone();

    if let Some(user_name) = str_field(attrs, "userName") {
        user.user_name = user_name.to_string();
    }
    if let Some(Value::Object(_)) = attrs.get("name") {
        user.name = Some(parse_name(&attrs["name"]));
    }
    if let Some(Value::Array(entries)) = attrs.get("emails") {
        user.emails = entries.iter().filter_map(parse_email).collect();
    }
    if let Some(active) = bool_field(attrs, "active") {
        user.active = active;
    }
    if let Some(meta) = &mut user.meta {
        meta.last_modified = Utc::now();
    }

    user
}

// =============================================================================
// Group Construction
// =============================================================================

/// Build a new Group from client-supplied attributes.
///
/// displayName falls back to the `name` alias, then to `group_` + first 8
/// chars of id. Member entries are kept verbatim.
pub fn build_group(id: &str, attrs: &Value, base_url: &str) -> ScimGroup {
    let now = Utc::now();

    let display_name = str_field(attrs, "displayName")
        .or_else(|| str_field(attrs, "name"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("group_{}", id_prefix(id)));

    ScimGroup {
        schemas: vec![SCHEMA_GROUP.to_string()],
        id: id.to_string(),
        display_name,
        members: parse_members(attrs),
        meta: Some(
            ScimMeta::group(now, now).with_location(format!("{}/Groups/{}", base_url, id)),
        ),
    }
}

/// Apply a PUT replacement to an existing Group.
///
/// Only displayName and members are recognized; the `name` alias does not
/// apply here. Meta keeps its created timestamp with lastModified bumped.
pub fn merge_group(existing: &ScimGroup, attrs: &Value) -> ScimGroup {
    let mut group = existing.clone();

    if let Some(display_name) = str_field(attrs, "displayName") {
        group.display_name = display_name.to_string();
    }
    if let Some(Value::Array(entries)) = attrs.get("members") {
        group.members = entries.clone();
    }
    if let Some(meta) = &mut group.meta {
        meta.last_modified = Utc::now();
    }

    group
}

// =============================================================================
// Attribute Parsing
// =============================================================================

fn str_field<'a>(attrs: &'a Value, key: &str) -> Option<&'a str> {
    attrs.get(key).and_then(Value::as_str)
}

fn bool_field(attrs: &Value, key: &str) -> Option<bool> {
    attrs.get(key).and_then(Value::as_bool)
}

/// First 8 characters of a generated id, used in placeholder names
fn id_prefix(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn parse_name(name: &Value) -> ScimName {
    ScimName {
        given_name: str_field(name, "givenName").map(str::to_string),
        family_name: str_field(name, "familyName").map(str::to_string),
    }
}

fn parse_emails(attrs: &Value) -> Vec<ScimEmail> {
    match attrs.get("emails") {
        Some(Value::Array(entries)) => entries.iter().filter_map(parse_email).collect(),
        _ => match str_field(attrs, "email") {
            Some(address) => vec![ScimEmail::primary(address)],
            None => Vec::new(),
        },
    }
}

/// Parse one email entry; entries without a string `value` are dropped
fn parse_email(entry: &Value) -> Option<ScimEmail> {
    Some(ScimEmail {
        value: entry.get("value")?.as_str()?.to_string(),
        email_type: str_field(entry, "type").map(str::to_string),
        primary: bool_field(entry, "primary"),
    })
}

fn parse_members(attrs: &Value) -> Vec<Value> {
    match attrs.get("members") {
        Some(Value::Array(entries)) => entries.clone(),
        _ => Vec::new(),
    }
}
