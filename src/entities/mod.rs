//! Reference-data entities consumed by the cost calculation

pub mod classification;
pub mod material;

pub use classification::{PartClassification, PricingType};
pub use material::{MaterialPricingProfile, Price};
