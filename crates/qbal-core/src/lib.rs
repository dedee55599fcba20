pub mod config;
pub mod logging;

pub mod client;
pub mod control;
pub mod error;
pub mod format;
pub mod history;
pub mod promote;
pub mod queue;
pub mod scheduler;
pub mod stall;
