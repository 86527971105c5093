//! Interface de troca de contexto (HAL).
//!
//! Este é o único ponto do núcleo onde código `unsafe` dependente de
//! arquitetura é inevitável. O contrato é mínimo:
//!
//! - `switch` salva e restaura exatamente o conjunto de registradores
//!   callee-saved e o stack pointer. Nada mais.
//! - Trocar o espaço de endereçamento é responsabilidade de quem chama
//!   (o scheduler), antes do `switch`.
//! - `prepare` monta o contexto inicial de uma task nova de forma que a
//!   primeira retomada entre em `BootstrapFrame::func(arg0, arg1)`.

use crate::sys::AddressSpace;

/// Primeira função executada por uma task recém-criada.
///
/// Nunca retorna: ao fim, a task vira zombie e cede a CPU.
pub type BootstrapFn = extern "C" fn(usize, usize) -> !;

/// Dados para a primeira retomada de uma task.
#[derive(Clone, Copy)]
pub struct BootstrapFrame {
    pub func: BootstrapFn,
    pub arg0: usize,
    pub arg1: usize,
}

pub trait ContextOps: Send + Sync + 'static {
    /// Registradores salvos de uma task parada.
    type Context: Default + Send;

    /// Espaço de endereçamento carregado agora (CR3 no x86).
    fn address_space(&self) -> AddressSpace;

    /// Carrega outro espaço de endereçamento (invalida a TLB).
    ///
    /// # Safety
    /// `root` deve ser uma tabela de páginas válida que mapeia o kernel.
    unsafe fn load_address_space(&self, root: AddressSpace);

    /// Monta o contexto inicial de uma task sobre a pilha `stack_top`.
    fn prepare(&self, ctx: &mut Self::Context, stack_top: usize, boot: BootstrapFrame);

    /// Salva o contexto corrente em `old` e retoma `new`.
    ///
    /// Retorna somente quando alguém trocar de volta para `old`.
    ///
    /// # Safety
    /// - Interrupções devem estar desabilitadas.
    /// - `old` e `new` devem apontar para contextos válidos que continuam
    ///   vivos até a próxima retomada.
    unsafe fn switch(&self, old: *mut Self::Context, new: *const Self::Context);
}
