//! SCIM 2.0 Resource and Protocol Types
//!
//! This module defines the core SCIM resource types (User, Group) and
//! protocol types (ListResponse, ServiceProviderConfig, etc.) per RFC 7643/7644.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Schema URIs
// =============================================================================

/// SCIM Core User schema URI
pub const SCHEMA_USER: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// SCIM Core Group schema URI
pub const SCHEMA_GROUP: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// SCIM Enterprise User extension schema URI
pub const SCHEMA_ENTERPRISE_USER: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// SCIM ListResponse schema URI
pub const SCHEMA_LIST_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

/// SCIM Error schema URI
pub const SCHEMA_ERROR: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

/// SCIM ServiceProviderConfig schema URI
pub const SCHEMA_SERVICE_PROVIDER_CONFIG: &str =
    "urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig";

/// SCIM ResourceType schema URI
pub const SCHEMA_RESOURCE_TYPE: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";

/// SCIM Schema schema URI
pub const SCHEMA_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Schema";

// =============================================================================
// Resource Metadata
// =============================================================================

/// SCIM resource metadata (RFC 7643 Section 3.1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimMeta {
    /// Resource type: "User" or "Group"
    pub resource_type: String,

    /// When the resource was created
    pub created: DateTime<Utc>,

    /// When the resource was last modified
    pub last_modified: DateTime<Utc>,

    /// Full URI of the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ScimMeta {
    /// Create metadata for a User resource
    pub fn user(created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            resource_type: "User".to_string(),
            created,
            last_modified,
            location: None,
        }
    }

    /// Create metadata for a Group resource
    pub fn group(created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            resource_type: "Group".to_string(),
            created,
            last_modified,
            location: None,
        }
    }

    /// Set the location URI
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

// =============================================================================
// User Resource
// =============================================================================

/// SCIM User resource (RFC 7643 Section 4.1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    pub schemas: Vec<String>,

    /// Server-assigned unique identifier
    pub id: String,

    /// Unique identifier for the user, typically an email or username
    pub user_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ScimName>,

    /// Email addresses; always serialized, empty when the user has none
    #[serde(default)]
    pub emails: Vec<ScimEmail>,

    /// Whether the user account is active
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

impl ScimUser {
    /// Create a minimal user with the given id and userName
    pub fn new(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            schemas: vec![SCHEMA_USER.to_string()],
            id: id.into(),
            user_name: user_name.into(),
            name: None,
            emails: Vec::new(),
            active: true,
            meta: None,
        }
    }
}

/// User's name components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

impl ScimName {
    /// Build a name from given and family components
    pub fn from_names(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given_name: Some(given.into()),
            family_name: Some(family.into()),
        }
    }
}

/// Email address entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimEmail {
    pub value: String,

    /// Email type label such as "work" or "home"
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

impl ScimEmail {
    /// Primary email without a type label, the shape provisioning clients
    /// most commonly send
    pub fn primary(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            email_type: None,
            primary: Some(true),
        }
    }
}

// =============================================================================
// Group Resource
// =============================================================================

/// SCIM Group resource (RFC 7643 Section 4.2)
///
/// Member entries are held as raw JSON so that whatever shape the client
/// sent (value/display/$ref or otherwise) is echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    pub schemas: Vec<String>,

    /// Server-assigned unique identifier
    pub id: String,

    /// Human-readable name for the group
    pub display_name: String,

    /// Group members; always serialized, empty when the group has none
    #[serde(default)]
    pub members: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

impl ScimGroup {
    /// Create a minimal group with the given id and displayName
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            schemas: vec![SCHEMA_GROUP.to_string()],
            id: id.into(),
            display_name: display_name.into(),
            members: Vec::new(),
            meta: None,
        }
    }
}

// =============================================================================
// List Protocol Types
// =============================================================================

/// SCIM ListResponse envelope (RFC 7644 Section 3.4.2)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimListResponse<T> {
    pub schemas: Vec<String>,

    /// Total number of results matching the query
    pub total_results: u32,

    /// 1-based index of the first result in this page
    pub start_index: u32,

    /// Number of resources returned in this page
    pub items_per_page: u32,

    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}

impl<T> ScimListResponse<T> {
    /// Create a list response; itemsPerPage is derived from the page itself
    pub fn new(resources: Vec<T>, total_results: u32, start_index: u32) -> Self {
        Self {
            schemas: vec![SCHEMA_LIST_RESPONSE.to_string()],
            total_results,
            start_index,
            items_per_page: resources.len() as u32,
            resources,
        }
    }
}

/// Query parameters accepted by the list endpoints (RFC 7644 Section 3.4.2)
///
/// startIndex and count arrive as query strings; values that do not parse
/// as integers are treated as absent so the defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimListParams {
    /// SCIM filter expression
    #[serde(default)]
    pub filter: Option<String>,

    /// 1-based index of the first result to return
    #[serde(default, deserialize_with = "lenient_index")]
    pub start_index: Option<i64>,

    /// Maximum number of results to return
    #[serde(default, deserialize_with = "lenient_index")]
    pub count: Option<i64>,
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

// =============================================================================
// Service Provider Configuration
// =============================================================================

/// ServiceProviderConfig discovery document (RFC 7643 Section 5)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderConfig {
    pub schemas: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,

    pub patch: FeatureSupport,
    pub bulk: BulkSupport,
    pub filter: FilterSupport,
    pub change_password: FeatureSupport,
    pub sort: FeatureSupport,
    pub etag: FeatureSupport,
    pub authentication_schemes: Vec<AuthenticationScheme>,
}

impl Default for ServiceProviderConfig {
    fn default() -> Self {
        Self {
            schemas: vec![SCHEMA_SERVICE_PROVIDER_CONFIG.to_string()],
            documentation_uri: None,
            patch: FeatureSupport { supported: true },
            bulk: BulkSupport::default(),
            filter: FilterSupport::default(),
            change_password: FeatureSupport { supported: false },
            sort: FeatureSupport { supported: true },
            etag: FeatureSupport { supported: false },
            authentication_schemes: vec![AuthenticationScheme::oauth_bearer()],
        }
    }
}

/// Simple supported/unsupported feature flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSupport {
    pub supported: bool,
}

/// Bulk operation support description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSupport {
    pub supported: bool,
    pub max_operations: u32,
    pub max_payload_size: u32,
}

impl Default for BulkSupport {
    fn default() -> Self {
        Self {
            supported: true,
            max_operations: 1000,
            max_payload_size: 1_048_576,
        }
    }
}

/// Filter support description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSupport {
    pub supported: bool,
    pub max_results: u32,
}

impl Default for FilterSupport {
    fn default() -> Self {
        Self {
            supported: true,
            max_results: 200,
        }
    }
}

/// Authentication scheme description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    pub name: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_uri: Option<String>,

    pub primary: bool,
}

impl AuthenticationScheme {
    /// OAuth 2.0 bearer token scheme (RFC 6750)
    pub fn oauth_bearer() -> Self {
        Self {
            scheme_type: "oauthbearertoken".to_string(),
            name: "OAuth Bearer Token".to_string(),
            description: "Authentication scheme using the OAuth Bearer Token Standard"
                .to_string(),
            spec_uri: Some("http://www.rfc-editor.org/info/rfc6750".to_string()),
            documentation_uri: Some("http://example.com/help/oauth.html".to_string()),
            primary: true,
        }
    }
}

// =============================================================================
// Resource Type Discovery
// =============================================================================

/// ResourceType discovery document (RFC 7643 Section 6)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub schemas: Vec<String>,
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub description: String,

    /// Primary schema URI for this resource type
    pub schema: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_extensions: Vec<SchemaExtension>,
}

impl ResourceType {
    /// ResourceType for User resources
    pub fn user() -> Self {
        Self {
            schemas: vec![SCHEMA_RESOURCE_TYPE.to_string()],
            id: "User".to_string(),
            name: "User".to_string(),
            endpoint: "/Users".to_string(),
            description: "User Account".to_string(),
            schema: SCHEMA_USER.to_string(),
            schema_extensions: vec![SchemaExtension {
                schema: SCHEMA_ENTERPRISE_USER.to_string(),
                required: false,
            }],
        }
    }

    /// ResourceType for Group resources
    pub fn group() -> Self {
        Self {
            schemas: vec![SCHEMA_RESOURCE_TYPE.to_string()],
            id: "Group".to_string(),
            name: "Group".to_string(),
            endpoint: "/Groups".to_string(),
            description: "Group".to_string(),
            schema: SCHEMA_GROUP.to_string(),
            schema_extensions: Vec::new(),
        }
    }
}

/// Schema extension reference on a ResourceType
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaExtension {
    pub schema: String,
    pub required: bool,
}

// =============================================================================
// Schema Discovery
// =============================================================================

/// Schema discovery document (RFC 7643 Section 7)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimSchema {
    pub schemas: Vec<String>,
    pub id: String,
    pub name: String,
    pub description: String,
    pub attributes: Vec<SchemaAttribute>,
}

impl ScimSchema {
    /// Core User schema
    pub fn user() -> Self {
        Self {
            schemas: vec![SCHEMA_SCHEMA.to_string()],
            id: SCHEMA_USER.to_string(),
            name: "User".to_string(),
            description: "User Account".to_string(),
            attributes: vec![SchemaAttribute::string(
                "userName",
                "Unique identifier for the User",
                true,
                Uniqueness::Server,
            )],
        }
    }

    /// Core Group schema
    pub fn group() -> Self {
        Self {
            schemas: vec![SCHEMA_SCHEMA.to_string()],
            id: SCHEMA_GROUP.to_string(),
            name: "Group".to_string(),
            description: "Group".to_string(),
            attributes: vec![SchemaAttribute::string(
                "displayName",
                "A human-readable name for the Group",
                false,
                Uniqueness::None,
            )],
        }
    }

    /// Enterprise User extension schema
    pub fn enterprise_user() -> Self {
        Self {
            schemas: vec![SCHEMA_SCHEMA.to_string()],
            id: SCHEMA_ENTERPRISE_USER.to_string(),
            name: "EnterpriseUser".to_string(),
            description: "Enterprise User".to_string(),
            attributes: vec![SchemaAttribute::string(
                "employeeNumber",
                "Numeric or alphanumeric identifier assigned to a person",
                false,
                Uniqueness::None,
            )],
        }
    }
}

/// Attribute definition within a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttribute {
    pub name: String,

    #[serde(rename = "type")]
    pub attribute_type: AttributeType,

    pub multi_valued: bool,
    pub description: String,
    pub required: bool,
    pub case_exact: bool,
    pub mutability: Mutability,
    pub returned: Returned,
    pub uniqueness: Uniqueness,
}

impl SchemaAttribute {
    /// Single-valued string attribute with readWrite mutability
    pub fn string(
        name: &str,
        description: &str,
        required: bool,
        uniqueness: Uniqueness,
    ) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: AttributeType::String,
            multi_valued: false,
            description: description.to_string(),
            required,
            case_exact: false,
            mutability: Mutability::ReadWrite,
            returned: Returned::Default,
            uniqueness,
        }
    }
}

/// SCIM attribute data types (RFC 7643 Section 2.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Boolean,
    Decimal,
    Integer,
    DateTime,
    Reference,
    Complex,
}

/// Attribute mutability (RFC 7643 Section 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    ReadOnly,
    ReadWrite,
    Immutable,
    WriteOnly,
}

/// When an attribute is returned in responses (RFC 7643 Section 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    Always,
    Never,
    Default,
    Request,
}

/// Attribute uniqueness constraint (RFC 7643 Section 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    None,
    Server,
    Global,
}

fn default_true() -> bool {
    true
}
