pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::ProjectFinanceError;
pub use types::*;

/// Standard result type for all project-finance operations
pub type ProjectFinanceResult<T> = Result<T, ProjectFinanceError>;
