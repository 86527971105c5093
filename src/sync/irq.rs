//! Contador aninhado de desabilitação de interrupções.
//!
//! Núcleo single-core: o único ator concorrente real é um handler de
//! interrupção. Cada lock adquirido desabilita interrupções e incrementa a
//! profundidade; liberar o último lock aninhado as reabilita.

use crate::arch::{Cpu, CpuOps};

/// Limite de aninhamento; passar disso indica guards vazando.
pub const MAX_DEPTH: usize = 64;

/// Desabilita interrupções e incrementa a profundidade.
#[inline]
pub fn disable() {
    Cpu::disable_interrupts();
    let depth = cpu_local::get();
    crate::kassert!(depth < MAX_DEPTH, "(IRQ) overflow do contador de desabilitação");
    cpu_local::set(depth + 1);
}

/// Decrementa a profundidade; reabilita interrupções ao chegar em zero.
#[inline]
pub fn enable() {
    let depth = cpu_local::get();
    crate::kassert!(depth > 0, "(IRQ) underflow do contador de desabilitação");
    cpu_local::set(depth - 1);
    if depth == 1 {
        Cpu::enable_interrupts();
    }
}

/// Profundidade atual de aninhamento.
#[inline]
pub fn depth() -> usize {
    cpu_local::get()
}

// Em bare-metal há uma única CPU; nos testes de host cada thread de teste é
// uma "CPU" independente para que os testes rodem em paralelo.
#[cfg(not(test))]
mod cpu_local {
    use core::sync::atomic::{AtomicUsize, Ordering};

    static DEPTH: AtomicUsize = AtomicUsize::new(0);

    pub fn get() -> usize {
        DEPTH.load(Ordering::Relaxed)
    }

    pub fn set(v: usize) {
        DEPTH.store(v, Ordering::Relaxed);
    }
}
