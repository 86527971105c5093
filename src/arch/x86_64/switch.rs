//! Context switch x86_64
//!
//! Salva/restaura apenas os registradores callee-saved da System V ABI e o
//! stack pointer. A troca de CR3 é feita pelo scheduler antes de chamar
//! [`X64Context::switch`](crate::arch::ContextOps::switch).

use core::arch::asm;

use crate::arch::traits::{BootstrapFrame, ContextOps};
use crate::sys::AddressSpace;

/// Contexto de CPU (registradores salvos)
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuContext {
    // Callee-saved registers (SysV ABI)
    pub rbx: u64,
    pub rbp: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,

    // Stack pointer
    pub rsp: u64,

    // Instruction pointer (return address)
    pub rip: u64,
}

/// Backend de troca de contexto para bare-metal x86_64.
#[derive(Debug, Default, Clone, Copy)]
pub struct X64Context;

impl ContextOps for X64Context {
    type Context = CpuContext;

    #[inline]
    fn address_space(&self) -> AddressSpace {
        let cr3: u64;
        unsafe {
            asm!("mov {}, cr3", out(reg) cr3, options(nomem, nostack, preserves_flags));
        }
        cr3
    }

    #[inline]
    unsafe fn load_address_space(&self, root: AddressSpace) {
        asm!("mov cr3, {}", in(reg) root, options(nostack, preserves_flags));
    }

    /// A primeira retomada cai em `task_trampoline`, que move r12/r13 para
    /// rdi/rsi e chama r14.
    fn prepare(&self, ctx: &mut CpuContext, stack_top: usize, boot: BootstrapFrame) {
        let top = (stack_top as u64) & !0xF;
        *ctx = CpuContext {
            rbx: 0,
            rbp: 0,
            r12: boot.arg0 as u64,
            r13: boot.arg1 as u64,
            r14: boot.func as usize as u64,
            r15: 0,
            // O `ret` do switch consome um slot da pilha.
            rsp: top - 16,
            rip: task_trampoline as usize as u64,
        };
    }

    #[inline]
    unsafe fn switch(&self, old: *mut CpuContext, new: *const CpuContext) {
        context_switch_asm(old as u64, new as u64);
    }
}

// RDI = old (mut ptr), RSI = new (ptr)
// Offsets (CpuContext):
// 0:rbx, 8:rbp, 16:r12, 24:r13, 32:r14, 40:r15, 48:rsp, 56:rip
core::arch::global_asm!(
    r#"
.global context_switch_asm
context_switch_asm:
    mov [rdi + 0x00], rbx
    mov [rdi + 0x08], rbp
    mov [rdi + 0x10], r12
    mov [rdi + 0x18], r13
    mov [rdi + 0x20], r14
    mov [rdi + 0x28], r15

    mov [rdi + 0x30], rsp

    // Endereço de retorno
    mov rax, [rsp]
    mov [rdi + 0x38], rax

    mov rbx, [rsi + 0x00]
    mov rbp, [rsi + 0x08]
    mov r12, [rsi + 0x10]
    mov r13, [rsi + 0x18]
    mov r14, [rsi + 0x20]
    mov r15, [rsi + 0x28]

    mov rsp, [rsi + 0x30]

    // 'mov [rsp], rax; ret' em vez de 'push rax; ret': consome o slot
    // de retorno sem vazar 8 bytes da pilha.
    mov rax, [rsi + 0x38]
    mov [rsp], rax
    ret

.global task_trampoline
task_trampoline:
    mov rdi, r12
    mov rsi, r13
    xor rbp, rbp
    and rsp, -16
    call r14
    ud2
"#
);

extern "C" {
    fn context_switch_asm(old: u64, new: u64);
    fn task_trampoline() -> !;
}
