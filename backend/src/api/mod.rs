//! Inbound HTTP adapters.

pub mod error;
pub mod health;
pub mod work_orders;

pub use self::error::{ApiError, ApiResult};
pub use self::health::HealthState;
