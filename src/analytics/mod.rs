pub(crate) mod analytics_model;
pub(crate) mod analytics_service;

pub use analytics_model::{ChartDataPoint, DailySummary, PerformanceMetrics, ProcessedData};
pub use analytics_service::{compute, compute_now};
