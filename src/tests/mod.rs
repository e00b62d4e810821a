//! Consolidated test modules.
//!
//! End-to-end tests that drive the assembled router over in-process HTTP.

mod http_api;
