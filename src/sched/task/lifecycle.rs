//! Fim de vida de tasks
//!
//! Uma task vira zombie quando sua entry retorna (ou chama `exit_current`).
//! O registro continua no anel até o reaper externo chamar `reap_zombies`,
//! que libera a stack e devolve os códigos de saída.

use alloc::vec::Vec;

use super::state::TaskState;
use crate::arch::ContextOps;
use crate::sched::Scheduler;
use crate::sys::{KError, KResult, Tid};

impl<P: ContextOps> Scheduler<P> {
    /// Finaliza a task corrente e cede a CPU.
    ///
    /// Em hardware real não retorna. A idle não pode sair.
    pub fn exit_current(&self, code: i32) -> KResult<()> {
        let mut rq = self.rq.lock();
        if rq.current == rq.idle {
            return Err(KError::InvalidArgument);
        }

        let task = rq.current_mut();
        crate::kassert!(task.waits.is_empty(), "(Task) saída com esperas pendentes");
        task.state = TaskState::Zombie;
        task.exit_code = code;
        crate::kinfo!("(Task) exit, tid=", task.id.as_u32());
        crate::kdebug!("(Task) exit code=", code as u32);

        self.switch_locked(rq, true);
        Ok(())
    }

    /// Remove os zombies do anel, liberando seus recursos.
    ///
    /// Devolve `(tid, código de saída)` de cada task recolhida.
    pub fn reap_zombies(&self) -> Vec<(Tid, i32)> {
        let mut rq = self.rq.lock();
        let keys: Vec<usize> = rq
            .iter()
            .filter(|(key, task)| task.state == TaskState::Zombie && *key != rq.current)
            .map(|(key, _)| key)
            .collect();

        let mut reaped = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(task) = rq.remove(key) {
                reaped.push((task.id, task.exit_code));
            }
        }
        drop(rq);

        if !reaped.is_empty() {
            crate::kinfo!("(Lifecycle) zombies recolhidos=", reaped.len());
        }
        reaped
    }
}
