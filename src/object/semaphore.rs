//! # Semáforo Contador
//!
//! Primeiro tipo concreto sobre o modelo de objetos + grafo de espera.
//! Estado: `current` em `[0, max]`; sinalizado sse `current > 0`.
//!
//! `release(h, n)` acorda até `n` waiters em ordem FIFO. Cada task acordada
//! consome uma unidade; só a sobra volta para `current`.

use super::flags::OpenFlags;
use super::handle::{Disposition, Handle, ObjectType};
use super::kobject::{LockedView, ObjectBody, Waitable};
use crate::arch::ContextOps;
use crate::kernel::Kernel;
use crate::sys::{KError, KResult, Tid};
use crate::wait::WakeCount;

/// Maior contagem aceita por um semáforo.
pub const SEM_MAX_VALUE: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semaphore {
    current: u32,
    max: u32,
}

impl Semaphore {
    /// Valida os parâmetros de `open`: `max >= 1` e `0 <= initial <= max`.
    pub fn new(max: i32, initial: i32) -> KResult<Self> {
        if max < 1 || initial < 0 || initial > max {
            return Err(KError::InvalidArgument);
        }
        Ok(Self {
            current: initial as u32,
            max: max as u32,
        })
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Waitable for Semaphore {
    fn is_signalled(&self) -> bool {
        self.current > 0
    }

    fn unsignal(&mut self, _by: Tid) {
        crate::kassert!(self.current > 0, "(Sem) unsignal com contador zerado");
        self.current -= 1;
    }
}

impl<P: ContextOps> Kernel<P> {
    /// Abre ou cria um semáforo.
    ///
    /// Ao entrar num semáforo existente, `max` e `initial` são validados mas
    /// não alteram o objeto.
    pub fn open_semaphore(
        &self,
        name: Option<&str>,
        flags: OpenFlags,
        max: i32,
        initial: i32,
    ) -> KResult<(Handle, Disposition)> {
        let sem = Semaphore::new(max, initial)?;
        let caller = self.scheduler().current_task();
        self.objects()
            .open(name, ObjectType::Semaphore, flags, caller, || ObjectBody::Semaphore(sem))
    }

    /// Libera `count` unidades, acordando até `count` waiters.
    pub fn release(&self, h: Handle, count: i32) -> KResult<()> {
        let count = u32::try_from(count).map_err(|_| KError::InvalidArgument)?;
        self.objects()
            .with_locked(h, |view| self.release_locked(view, count))
    }

    /// Contador atual e máximo.
    pub fn semaphore_state(&self, h: Handle) -> KResult<(u32, u32)> {
        self.objects().with_locked(h, |view| match view.body() {
            ObjectBody::Semaphore(sem) => Ok((sem.current, sem.max)),
            _ => Err(KError::InvalidArgument),
        })
    }

    pub(crate) fn release_locked(&self, view: &mut LockedView<'_>, count: u32) -> KResult<()> {
        let (current, max) = match view.body() {
            ObjectBody::Semaphore(sem) => (sem.current, sem.max),
            _ => return Err(KError::InvalidArgument),
        };
        match current.checked_add(count) {
            Some(total) if total <= max => {}
            _ => {
                crate::kdebug!("(Sem) release estouraria o máximo, count=", count);
                return Err(KError::InvalidArgument);
            }
        }
        if count == 0 {
            return Ok(());
        }

        let left = self.scheduler().wake(view.object(), WakeCount::Up(count));
        if let ObjectBody::Semaphore(sem) = view.body_mut() {
            sem.current += left;
        }
        view.refresh();
        crate::ktrace!("(Sem) release, sobra=", left);
        Ok(())
    }
}
