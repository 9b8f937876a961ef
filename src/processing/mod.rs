pub mod cache;
pub mod comparison;
pub mod embedding;
pub mod features;
pub mod matcher;
pub mod normalize;
pub mod semantic;
pub mod single_flight;
pub mod veto;
