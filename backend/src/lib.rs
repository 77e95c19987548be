//! Loan management backend library.
//!
//! The binary in `main.rs` wires these modules into an Actix server; tests
//! and the OpenAPI dump tool use them directly.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
