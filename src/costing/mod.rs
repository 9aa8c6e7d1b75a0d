//! Machining time, raw stock, and cost estimation

pub mod cost;
pub mod machining;
pub mod pipeline;
pub mod stock;

pub use cost::{calculate_cost, CostError, CostEstimate};
pub use machining::{estimate_machining_time, CuttingParameters, EstimationError};
pub use pipeline::{PartEstimate, Pipeline, PipelineError, DEFAULT_MARGIN};
pub use stock::{size_raw_stock, RawStock, StockMargins};
