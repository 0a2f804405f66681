pub mod appraisal;
pub mod irr;
pub mod payback;
pub mod sensitivity;
