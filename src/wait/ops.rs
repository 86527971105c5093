//! `wait` e `wait_many` sobre handles.
//!
//! Fluxo:
//! 1. Resolve os handles (lock da tabela, solto em seguida).
//! 2. Trava os objetos em ordem de KOID.
//! 3. Fast path: objeto(s) já sinalizado(s) são consumidos e a chamada volta
//!    sem bloquear.
//! 4. Senão registra os nós de espera, solta os objetos e cede a CPU.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::arch::ContextOps;
use crate::config::MAX_WAIT_OBJECTS;
use crate::kernel::Kernel;
use crate::object::{Handle, KObject, LockedView};
use crate::sys::{KError, KResult, Tid};

enum Outcome {
    Done(usize),
    Blocked(Tid),
}

impl<P: ContextOps> Kernel<P> {
    /// Espera o objeto de `h` sinalizar.
    pub fn wait(&self, h: Handle) -> KResult<()> {
        self.wait_many(&[h], false).map(|_| ())
    }

    /// Espera qualquer um (ou todos, com `wait_for_all`) dos objetos.
    ///
    /// Devolve o índice, em `handles`, do objeto que completou a espera: o
    /// primeiro sinalizado no modo "any", o último a sinalizar no modo "all".
    /// Se no modo "all" tudo já estava sinalizado na entrada, não há "último"
    /// e a resposta é sempre o último índice, `handles.len() - 1`.
    pub fn wait_many(&self, handles: &[Handle], wait_for_all: bool) -> KResult<usize> {
        if handles.is_empty() || handles.len() > MAX_WAIT_OBJECTS {
            return Err(KError::InvalidArgument);
        }

        let mut objects: Vec<Arc<KObject>> = Vec::with_capacity(handles.len());
        for &h in handles {
            let object = self.objects().resolve(h)?;
            if objects.iter().any(|o| Arc::ptr_eq(o, &object)) {
                crate::kdebug!("(Wait) objeto repetido na lista, handle=", h.0);
                return Err(KError::InvalidArgument);
            }
            objects.push(object);
        }

        let caller = self.scheduler().current_task();
        let outcome = self.lock_and_decide(&objects, wait_for_all, caller)?;

        match outcome {
            Outcome::Done(index) => Ok(index),
            Outcome::Blocked(tid) => {
                self.scheduler().reschedule();
                self.scheduler().finish_wait(tid)
            }
        }
    }

    /// Passos 2 a 4 com os objetos travados. Os locks caem na saída, em ordem
    /// inversa de aquisição, em qualquer caminho.
    fn lock_and_decide(
        &self,
        objects: &[Arc<KObject>],
        wait_all: bool,
        caller: Tid,
    ) -> KResult<Outcome> {
        let mut order: Vec<usize> = (0..objects.len()).collect();
        order.sort_by_key(|&i| objects[i].koid());

        let mut held: Vec<(usize, LockedView<'_>)> = Vec::with_capacity(objects.len());
        let outcome = (|| -> KResult<Outcome> {
            for &i in &order {
                held.push((i, objects[i].lock()?));
            }
            self.decide(objects, &mut held, wait_all, caller)
        })();

        while let Some(view) = held.pop() {
            drop(view);
        }
        outcome
    }

    fn decide(
        &self,
        objects: &[Arc<KObject>],
        held: &mut [(usize, LockedView<'_>)],
        wait_all: bool,
        caller: Tid,
    ) -> KResult<Outcome> {
        if !wait_all {
            let first = held
                .iter_mut()
                .filter(|(_, v)| v.is_signalled())
                .min_by_key(|(i, _)| *i);
            if let Some((i, view)) = first {
                view.consume(caller);
                return Ok(Outcome::Done(*i));
            }
            let targets: Vec<(usize, &Arc<KObject>)> = objects.iter().enumerate().collect();
            return self
                .scheduler()
                .begin_wait(&targets, false)
                .map(Outcome::Blocked);
        }

        if held.iter().all(|(_, v)| v.is_signalled()) {
            for (_, view) in held.iter_mut() {
                view.consume(caller);
            }
            return Ok(Outcome::Done(objects.len() - 1));
        }

        let mut targets: Vec<(usize, &Arc<KObject>)> = held
            .iter()
            .filter(|(_, v)| !v.is_signalled())
            .map(|&(i, _)| (i, &objects[i]))
            .collect();
        targets.sort_by_key(|&(i, _)| i);
        let tid = self.scheduler().begin_wait(&targets, true)?;
        for (_, view) in held.iter_mut().filter(|(_, v)| v.is_signalled()) {
            view.consume(caller);
        }
        Ok(Outcome::Blocked(tid))
    }
}
