//! # Sincronização
//!
//! Primitivas de exclusão mútua para um núcleo single-core preemptível.
//!
//! ## Disciplina de locks
//! Toda aquisição passa pelo contador de [`irq`]: segurar qualquer lock
//! mantém as interrupções desligadas. Locks são liberados na ordem inversa da
//! aquisição, e a ordem global é:
//!
//! `tabela de handles -> estado do objeto -> fila de execução -> lista de espera do objeto`
//!
//! A lista de espera do objeto é folha: nunca se adquire outro lock com ela presa.

pub mod irq;
pub mod spinlock;

pub use spinlock::{Spinlock, SpinlockGuard};
