//! Renovation cost estimation
//!
//! A deterministic pricing model: area, tier, service selection and linear joinery runs are
//! combined into an itemized budget with ±15% variance bands and an optional rush surcharge.

pub mod calculator;
pub mod models;
pub mod rates;

pub use calculator::{calculate_costs, estimate_timeline};
pub use models::{
    ComponentCosts, CostCalculation, CostGroup, CostGroupKind, CostItem, CostLineItem,
    EstimateInput, ServiceSelection, Tier, Timeline,
};
pub use rates::{rates_for, RateTable};
