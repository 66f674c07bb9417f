pub mod access;
pub mod chart;
pub mod filter;
pub mod load;
pub mod metrics;
pub mod record;
pub mod settings;
pub mod snapshot;
pub mod totals;
pub mod view;
