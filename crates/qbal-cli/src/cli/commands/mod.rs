mod run;
mod status;

pub use run::run_rebalancer;
pub use status::run_status;
