pub mod investment;
pub mod simulation;
