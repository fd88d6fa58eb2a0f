//! Backend library modules for the maintenance service.

pub mod api;
pub mod doc;
pub mod domain;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
