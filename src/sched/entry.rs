//! Entrada de tasks novas.
//!
//! Início em duas fases: `create` estaciona a task com um contexto que aponta
//! para cá; a primeira vez que o scheduler troca para ela, o `switch` "retorna"
//! em `task_bootstrap` ainda com o lock da fila preso pela task anterior.

use crate::arch::{ContextOps, Cpu, CpuOps};
use crate::sched::Scheduler;
use crate::sync::irq;
use crate::sys::Tid;

/// Primeira função de toda task criada por `Scheduler::create`.
///
/// `sched` é o endereço do `Scheduler<P>` (que é `'static`), `tid` o id da task.
pub(crate) extern "C" fn task_bootstrap<P: ContextOps>(sched: usize, tid: usize) -> ! {
    // SAFETY: `create` só aceita `&'static Scheduler<P>` e grava o endereço dele.
    let sched = unsafe { &*(sched as *const Scheduler<P>) };

    // Herdamos o lock da fila (e uma unidade do contador de IRQ) da task que
    // chamou o switch.
    unsafe { sched.rq.force_unlock() };
    irq::enable();

    let tid = Tid::new(tid as u32);
    crate::ktrace!("(Sched) primeira execução, tid=", tid.as_u32());

    let code = match sched.entry_of(tid) {
        Some((entry, arg)) => entry(arg),
        None => {
            crate::kerror!("(Sched) task sem entry, tid=", tid.as_u32());
            -1
        }
    };

    if sched.exit_current(code).is_err() {
        crate::kerror!("(Sched) exit_current recusado no bootstrap");
    }

    // Zombie não é escolhido de novo; chegar aqui é bug.
    crate::kerror!("(Sched) zombie voltou a executar, tid=", tid.as_u32());
    Cpu::hang()
}
