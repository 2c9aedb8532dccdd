pub mod air_quality;
pub mod history;

pub use air_quality::*;
pub use history::*;
