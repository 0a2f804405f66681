pub mod analysis;
pub mod baseline;
pub mod duration;
pub mod portfolio;
pub mod pricing;
pub mod project;
pub mod random;
