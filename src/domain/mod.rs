pub mod comparison;
pub mod decision;
pub mod product;
