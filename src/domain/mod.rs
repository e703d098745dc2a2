//! Domain layer: simulation types, the pricing engine, report rendering and
//! the ports implemented by storage and notification adapters.

pub mod ports;
pub mod pricing;
pub mod report;
pub mod simulation;
