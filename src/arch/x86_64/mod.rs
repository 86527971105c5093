//! Implementação x86_64

pub mod cpu;
pub mod switch;

pub use cpu::Cpu;
pub use switch::{CpuContext, X64Context};
