//! Forge Wait Core.
//!
//! Núcleo de sincronização e escalonamento do Forge: tabela de handles,
//! objetos de kernel (semáforo, evento), grafo de espera e scheduler
//! round-robin.
//!
//! Em bare-metal (`target_os = "none"`) roda sobre `arch::x86_64`; nos demais
//! alvos usa a plataforma simulada de `arch::sim`, onde os testes rodam.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Baixo nível ---
pub mod arch; // CPU, troca de contexto
pub mod config;
pub mod debug; // Logs, asserts fatais, contadores
pub mod sync; // Spinlock + contador de IRQ
pub mod sys; // Erros e tipos de ABI

// --- Núcleo ---
pub mod kernel;
pub mod klib;
pub mod object; // Handles e objetos
pub mod sched; // Scheduler e tasks
pub mod wait; // Grafo de espera

pub use config::KernelConfig;
pub use kernel::Kernel;

/// Roda todas as suítes de self-test. Devolve `true` se nenhuma falhou.
#[cfg(any(test, feature = "self_test"))]
pub fn run_self_tests() -> bool {
    use klib::test_framework::run_test_suite;

    let suites = [
        ("object", object::test::OBJECT_TESTS),
        ("wait", wait::test::WAIT_TESTS),
        ("sched", sched::test::SCHED_TESTS),
    ];

    let mut ok = true;
    for (name, cases) in suites {
        ok &= run_test_suite(name, cases).is_ok();
    }
    ok
}
