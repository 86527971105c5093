//! Lado do scheduler das esperas.
//!
//! Tudo aqui roda com o lock da fila preso. As listas dos objetos são folhas:
//! cada uma é travada só pelo tempo de um `add`/`detach` e nunca duas ao
//! mesmo tempo.

use alloc::sync::Arc;
use slab::Slab;

use super::graph::WaitGraph;
use crate::arch::ContextOps;
use crate::object::KObject;
use crate::sched::task::{Task, TaskState};
use crate::sched::Scheduler;
use crate::sys::{KError, KResult, Tid};

/// Quantos esperadores acordar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCount {
    /// Todos, em ordem FIFO.
    All,
    /// Até `n`, em ordem FIFO.
    Up(u32),
}

impl<P: ContextOps> Scheduler<P> {
    /// Registra a task corrente como esperando `targets` e a marca WAITING.
    ///
    /// Cada alvo é `(índice na lista do chamador, objeto)`. Chamado com os
    /// objetos travados; a troca de contexto fica para depois de soltá-los.
    /// Em erro nada muda.
    pub(crate) fn begin_wait(
        &self,
        targets: &[(usize, &Arc<KObject>)],
        wait_all: bool,
    ) -> KResult<Tid> {
        let now = self.now();
        let mut rq = self.rq.lock();
        if rq.current == rq.idle {
            return Err(KError::InvalidArgument);
        }
        if rq.waits.available() < targets.len() {
            crate::kwarn!("(Wait) sem nós de espera, pedidos=", targets.len());
            return Err(KError::OutOfMemory);
        }

        let cur = rq.current;
        let rq = &mut *rq;
        let task = rq.tasks.get_mut(cur).ok_or(KError::NotFound)?;
        crate::kassert!(task.waits.is_empty(), "(Wait) task já está esperando");

        task.wait_all = wait_all;
        task.wait_result = None;
        for &(index, object) in targets {
            let mut list = object.waiters.lock();
            rq.waits.add(
                cur,
                task.id,
                &mut task.waits,
                Arc::clone(object),
                &mut list,
                index,
                now,
            )?;
        }
        task.state = TaskState::Waiting;

        crate::ktrace!("(Wait) task bloqueada, tid=", task.id.as_u32());
        Ok(task.id)
    }

    /// Acorda esperadores de `object` em ordem FIFO.
    ///
    /// Chamado com o objeto travado. Cada nó retirado consome uma unidade do
    /// sinal em nome da task dona. Devolve a sobra de `count` (0 para `All`).
    pub(crate) fn wake(&self, object: &KObject, count: WakeCount) -> u32 {
        let now = self.now();
        let mut rq = self.rq.lock();
        let rq = &mut *rq;

        let mut left = match count {
            WakeCount::All => u32::MAX,
            WakeCount::Up(n) => n,
        };
        while left > 0 {
            let mut list = object.waiters.lock();
            let Some(key) = list.head() else { break };
            let owner = match rq.waits.node(key) {
                Some(node) => node.task,
                None => crate::debug::fatal("(Wait) cabeça aponta para nó livre", file!(), line!()),
            };
            let task = task_at(&mut rq.tasks, owner);
            let node = rq.waits.detach(key, &mut task.waits, &mut list);
            drop(list);

            self.stats.inc_wakeups();
            left -= 1;

            if task.waits.is_empty() || !task.wait_all {
                account(task, now, node.began);
                satisfy(&mut rq.waits, task, Ok(node.index));
            }
        }

        match count {
            WakeCount::All => 0,
            WakeCount::Up(_) => left,
        }
    }

    /// O objeto foi desmontado: toda task esperando por ele volta com
    /// `WaitAbandoned`, inclusive esperas "all".
    pub(crate) fn abandon(&self, object: &KObject) -> u32 {
        let now = self.now();
        let mut rq = self.rq.lock();
        let rq = &mut *rq;

        let mut abandoned = 0;
        loop {
            let mut list = object.waiters.lock();
            let Some(key) = list.head() else { break };
            let owner = match rq.waits.node(key) {
                Some(node) => node.task,
                None => crate::debug::fatal("(Wait) cabeça aponta para nó livre", file!(), line!()),
            };
            let task = task_at(&mut rq.tasks, owner);
            let node = rq.waits.detach(key, &mut task.waits, &mut list);
            drop(list);

            account(task, now, node.began);
            satisfy(&mut rq.waits, task, Err(KError::WaitAbandoned));
            abandoned += 1;
        }

        if abandoned > 0 {
            crate::kdebug!("(Wait) esperas abandonadas=", abandoned);
        }
        abandoned
    }

    /// Resultado da espera de `tid` depois do `reschedule`.
    ///
    /// Sem resultado significa que a task ainda não foi acordada (só acontece
    /// na plataforma simulada, onde o switch retorna na hora).
    pub(crate) fn finish_wait(&self, tid: Tid) -> KResult<usize> {
        let mut rq = self.rq.lock();
        let key = rq.find(tid).ok_or(KError::NotFound)?;
        rq.task_mut(key)
            .wait_result
            .take()
            .unwrap_or(Err(KError::Interrupted))
    }
}

fn task_at<C>(tasks: &mut Slab<Task<C>>, key: usize) -> &mut Task<C> {
    match tasks.get_mut(key) {
        Some(task) => task,
        None => crate::debug::fatal("(Wait) nó aponta para task inexistente", file!(), line!()),
    }
}

fn account<C>(task: &mut Task<C>, now: u64, began: u64) {
    task.accounting.account_wait(now.saturating_sub(began));
}

/// Cancela as esperas restantes da task e a devolve ao anel.
fn satisfy<C>(graph: &mut WaitGraph, task: &mut Task<C>, result: KResult<usize>) {
    while let Some(key) = task.waits.head() {
        let object = match graph.node(key) {
            Some(node) => Arc::clone(node.object()),
            None => crate::debug::fatal("(Wait) lista da task aponta para nó livre", file!(), line!()),
        };
        let mut list = object.waiters.lock();
        graph.detach(key, &mut task.waits, &mut list);
    }

    task.wait_result = Some(result);
    if task.state == TaskState::Waiting {
        task.state = TaskState::Runnable;
    }
    crate::ktrace!("(Wait) task acordada, tid=", task.id.as_u32());
}
