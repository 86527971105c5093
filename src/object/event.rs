//! Evento com reset manual ou automático.
//!
//! - Manual: `set` acorda todos os waiters e o evento continua sinalizado até
//!   um `reset` explícito.
//! - Automático: `set` libera exatamente um waiter; se ninguém espera, o evento
//!   fica sinalizado e a próxima espera o consome.

use super::flags::OpenFlags;
use super::handle::{Disposition, Handle, ObjectType};
use super::kobject::{LockedView, ObjectBody, Waitable};
use crate::arch::ContextOps;
use crate::kernel::Kernel;
use crate::sys::{KError, KResult, Tid};
use crate::wait::WakeCount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    manual_reset: bool,
    set: bool,
}

impl Event {
    pub const fn new(manual_reset: bool, initially_set: bool) -> Self {
        Self {
            manual_reset,
            set: initially_set,
        }
    }

    pub fn is_manual_reset(&self) -> bool {
        self.manual_reset
    }

    pub fn is_set(&self) -> bool {
        self.set
    }
}

impl Waitable for Event {
    fn is_signalled(&self) -> bool {
        self.set
    }

    fn unsignal(&mut self, _by: Tid) {
        if !self.manual_reset {
            self.set = false;
        }
    }
}

impl<P: ContextOps> Kernel<P> {
    pub fn open_event(
        &self,
        name: Option<&str>,
        flags: OpenFlags,
        manual_reset: bool,
        initially_set: bool,
    ) -> KResult<(Handle, Disposition)> {
        let caller = self.scheduler().current_task();
        self.objects().open(name, ObjectType::Event, flags, caller, || {
            ObjectBody::Event(Event::new(manual_reset, initially_set))
        })
    }

    pub fn set_event(&self, h: Handle) -> KResult<()> {
        self.objects().with_locked(h, |view| self.set_locked(view))
    }

    pub fn reset_event(&self, h: Handle) -> KResult<()> {
        self.objects().with_locked(h, |view| {
            match view.body_mut() {
                ObjectBody::Event(ev) => ev.set = false,
                _ => return Err(KError::InvalidArgument),
            }
            view.refresh();
            Ok(())
        })
    }

    pub(crate) fn set_locked(&self, view: &mut LockedView<'_>) -> KResult<()> {
        let manual = match view.body() {
            ObjectBody::Event(ev) => ev.manual_reset,
            _ => return Err(KError::InvalidArgument),
        };

        let set = if manual {
            self.scheduler().wake(view.object(), WakeCount::All);
            true
        } else {
            // Sobra 1: ninguém estava esperando.
            self.scheduler().wake(view.object(), WakeCount::Up(1)) > 0
        };

        if let ObjectBody::Event(ev) = view.body_mut() {
            ev.set = set;
        }
        view.refresh();
        Ok(())
    }
}
