//! Implementação x86_64 das operações de CPU (HAL).
//!
//! # Segurança
//! Esta implementação assume que o código está rodando em modo longo (64-bit)
//! e nível de privilégio de kernel (Ring 0).

use crate::arch::traits::cpu::CpuOps;
use core::arch::asm;

pub struct X64Cpu;

impl CpuOps for X64Cpu {
    /// Para a execução da CPU até a próxima interrupção (HLT).
    #[inline]
    fn halt() {
        unsafe {
            asm!("hlt", options(nomem, nostack, preserves_flags));
        }
    }

    /// Desabilita interrupções (CLI).
    #[inline]
    fn disable_interrupts() {
        unsafe {
            asm!("cli", options(nomem, nostack, preserves_flags));
        }
    }

    /// Habilita interrupções (STI). Pode causar preempção imediata.
    #[inline]
    fn enable_interrupts() {
        unsafe {
            asm!("sti", options(nomem, nostack, preserves_flags));
        }
    }

    /// Verifica se as interrupções estão habilitadas (RFLAGS.IF).
    #[inline]
    fn are_interrupts_enabled() -> bool {
        let rflags: u64;
        unsafe {
            asm!("pushfq", "pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        (rflags & (1 << 9)) != 0
    }
}

pub type Cpu = X64Cpu;
