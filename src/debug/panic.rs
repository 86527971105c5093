//! Panic Handler - Tratamento de pânicos do kernel
//!
//! Só existe em builds bare-metal; nos testes de host o pânico é o da std.

use core::panic::PanicInfo;

use crate::arch::{Cpu, CpuOps};

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    Cpu::disable_interrupts();

    if let Some(location) = info.location() {
        crate::kerror!("(Panic) PANIC em ");
        crate::kerror!(location.file());
        crate::kerror!("(Panic) linha=", location.line());
    }
    crate::kerror!("(Panic) irq_depth=", crate::sync::irq::depth());

    Cpu::hang()
}
