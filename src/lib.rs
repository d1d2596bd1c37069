pub mod aggregation_stats;
pub mod api;
pub mod config;
pub mod eth;
pub mod ledger;
pub mod models;
pub mod service;
