pub mod dashboard;
pub mod health;
pub mod hosts;
pub mod ingest;
pub mod thresholds;
