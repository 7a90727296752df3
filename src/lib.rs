pub mod aggregators;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod presenter;
pub mod query;
