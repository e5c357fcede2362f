//! Readiness accumulation, the ready queue, and turn-order forecasting.

mod gauge;
mod predict;
mod queue;

pub use gauge::ReadinessGauge;
pub use predict::predict_order;
pub use queue::ReadyQueue;
