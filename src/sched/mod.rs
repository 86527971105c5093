//! # Multitasking & Scheduler Subsystem
//!
//! Transforma a CPU única em várias tasks "simultâneas".
//!
//! - **Task:** registro de execução (estado, quantum, contexto, stack, esperas).
//! - **RunQueue:** anel de tasks + grafo de espera, sob um único lock.
//! - **Scheduler:** política round-robin, criação, tick, yield, pausa, saída.
//!
//! ## Cooperative + Preemptive
//! 1. **Preemptivo:** o timer chama `tick()`; quantum esgotado troca de task.
//! 2. **Cooperativo:** `yield_now()`, espera sem sinal e `exit_current()`.
//!
//! ## Dívida Técnica
//! - O contexto x86_64 não salva FPU/SSE.
//! - Single-core: um lock global para a fila.

pub mod entry;
pub mod runqueue;
pub mod scheduler;
pub mod task;


pub use runqueue::RunQueue;
pub use scheduler::Scheduler;
pub use task::{Task, TaskEntry, TaskInfo, TaskState, TaskStats};
