//! Depuração: macros de log, asserções fatais e estatísticas.

pub mod fatal;
pub mod logging;
pub mod stats;

#[cfg(target_os = "none")]
mod panic;

pub use fatal::fatal;
pub use stats::{KernelStats, StatsSnapshot};
