//! SCIM 2.0 Protocol Support
//!
//! This module implements the SCIM 2.0 (System for Cross-domain Identity
//! Management) pieces the mock server is built from, per RFC 7643/7644:
//!
//! - `types`: User/Group resources, list envelopes, discovery documents
//! - `error`: SCIM error response envelope
//! - `resource`: resource construction and PUT replacement semantics
//! - `filter`: equality filter parsing and evaluation
//! - `pagination`: index-based list pagination

pub mod error;
pub mod filter;
pub mod pagination;
pub mod resource;
pub mod types;

pub use error::ScimErrorResponse;
pub use filter::{apply_group_filter, apply_user_filter};
pub use pagination::paginate;
pub use resource::{build_group, build_user, merge_group, merge_user};
pub use types::{
    ResourceType, ScimGroup, ScimListParams, ScimListResponse, ScimSchema, ScimUser,
    ServiceProviderConfig,
};
