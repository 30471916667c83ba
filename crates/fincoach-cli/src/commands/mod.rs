pub mod affordability;
pub mod coaches;
pub mod dti;
pub mod plan;
pub mod readiness;
pub mod spending;
