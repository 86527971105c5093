//! Plataforma simulada (builds hospedados e testes).
//!
//! O `switch` daqui não troca de pilha: registra a troca e retorna na hora.
//! Do ponto de vista do scheduler, a thread de host "vira" a task escolhida,
//! o que torna as decisões de escalonamento observáveis e determinísticas.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::arch::traits::{BootstrapFrame, ContextOps, CpuOps};
use crate::sync::Spinlock;
use crate::sys::AddressSpace;

/// CPU hospedada: interrupções são só uma flag.
pub struct HostCpu;

static INTERRUPTS: AtomicBool = AtomicBool::new(true);

impl CpuOps for HostCpu {
    fn halt() {
        core::hint::spin_loop();
    }

    fn disable_interrupts() {
        INTERRUPTS.store(false, Ordering::Relaxed);
    }

    fn enable_interrupts() {
        INTERRUPTS.store(true, Ordering::Relaxed);
    }

    fn are_interrupts_enabled() -> bool {
        INTERRUPTS.load(Ordering::Relaxed)
    }
}

pub type Cpu = HostCpu;

/// Contexto salvo de uma task simulada.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimFrame {
    /// Tid da task dona do frame (0 para a thread de boot).
    pub tag: usize,
    pub stack_top: usize,
}

/// Backend de contexto simulado.
pub struct SimContext {
    address_space: AtomicU64,
    loads: AtomicU64,
    log: Spinlock<Vec<(u32, u32)>>,
}

impl SimContext {
    pub fn new() -> Self {
        Self::with_address_space(0x1000)
    }

    pub fn with_address_space(root: AddressSpace) -> Self {
        Self {
            address_space: AtomicU64::new(root),
            loads: AtomicU64::new(0),
            log: Spinlock::new(Vec::new()),
        }
    }

    /// Trocas registradas, como pares `(tid antigo, tid novo)`.
    pub fn switches(&self) -> Vec<(u32, u32)> {
        self.log.lock().clone()
    }

    /// Tid da última task retomada.
    pub fn last_resumed(&self) -> Option<u32> {
        self.log.lock().last().map(|&(_, new)| new)
    }

    /// Quantas vezes `load_address_space` foi chamado.
    pub fn address_space_loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextOps for SimContext {
    type Context = SimFrame;

    fn address_space(&self) -> AddressSpace {
        self.address_space.load(Ordering::Relaxed)
    }

    unsafe fn load_address_space(&self, root: AddressSpace) {
        self.address_space.store(root, Ordering::Relaxed);
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    fn prepare(&self, ctx: &mut SimFrame, stack_top: usize, boot: BootstrapFrame) {
        *ctx = SimFrame {
            tag: boot.arg1,
            stack_top,
        };
    }

    unsafe fn switch(&self, old: *mut SimFrame, new: *const SimFrame) {
        let from = (*old).tag as u32;
        let to = (*new).tag as u32;
        self.log.lock().push((from, to));
    }
}
