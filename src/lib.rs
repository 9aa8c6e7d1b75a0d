//! partcost: machined-part cost estimation
//!
//! Extracts geometric descriptors from a solid model, estimates machining
//! time, sizes raw stock, and prices it from material reference data. All
//! values carry their units and are reported in user-configured display
//! units.

pub mod cli;
pub mod core;
pub mod costing;
pub mod entities;
pub mod geometry;
pub mod logging;
pub mod yaml;
