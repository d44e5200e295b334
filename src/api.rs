pub mod metrics;
pub mod root;
pub mod set;
