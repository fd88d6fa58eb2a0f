//! Domain layer: entities, repository, workflow, and their ports.
//!
//! Everything in this module is transport agnostic. Inbound adapters (the
//! HTTP layer) call the repository and the workflow service; driven adapters
//! (record stores, event sinks) implement the traits in [`ports`].
//!
//! Two failure channels exist and never mix:
//! - repository faults travel as [`AppError`] through [`ApiResult`];
//! - business-rule refusals travel as data, inside
//!   [`work_orders::WorkflowOutcome`].

pub mod entity;
pub mod error;
pub mod events;
pub mod ports;
pub mod repository;
pub mod validation;
pub mod work_orders;

pub use self::entity::Entity;
pub use self::error::{AppError, ErrorCode};

/// Convenient result alias for boundary operations.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, AppError};
///
/// fn lookup() -> ApiResult<String> {
///     Err(AppError::not_found("nothing here"))
/// }
/// ```
pub type ApiResult<T> = Result<T, AppError>;
