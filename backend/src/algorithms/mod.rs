//! Pure computational core: the PM2.5 estimator and scenario perturbations.

pub mod estimator;
pub mod scenario;

pub use estimator::{classify, estimate, estimate_concentration, source_contributions};
pub use scenario::ScenarioKind;
