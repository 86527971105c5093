//! # Kernel
//!
//! Junta o gerenciador de objetos e o scheduler. É a superfície que a camada
//! de syscalls chama: abrir/fechar/duplicar handles, esperar, sinalizar.
//!
//! As operações por tipo (`open_semaphore`, `release`, `open_event`, ...) e
//! as esperas (`wait`, `wait_many`) ficam nos módulos `object` e `wait`, como
//! blocos `impl Kernel` próprios.

use crate::arch::ContextOps;
use crate::config::KernelConfig;
use crate::object::{Disposition, Handle, ObjectBody, ObjectManager, ObjectType, OpenFlags};
use crate::sched::Scheduler;
use crate::sys::KResult;

pub struct Kernel<P: ContextOps> {
    config: KernelConfig,
    objects: ObjectManager,
    sched: Scheduler<P>,
}

impl<P: ContextOps> Kernel<P> {
    pub fn new(arch: P, config: KernelConfig) -> Self {
        crate::kinfo!("(Kernel) Inicializando núcleo de espera...");
        let kernel = Self {
            config,
            objects: ObjectManager::new(config.handle_capacity),
            sched: Scheduler::new(arch, config),
        };
        crate::kinfo!("(Kernel) handles disponíveis=", config.handle_capacity);
        kernel
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn scheduler(&self) -> &Scheduler<P> {
        &self.sched
    }

    /// Fecha um handle. O último handle desmonta o objeto: quem ainda espera
    /// por ele acorda com `WaitAbandoned`.
    pub fn close(&self, h: Handle) -> KResult<()> {
        let Some(object) = self.objects.close(h)? else {
            return Ok(());
        };

        let mut state = object.lock_state();
        state.close();
        self.sched.abandon(&object);
        drop(state);

        crate::kdebug!("(Kernel) objeto desmontado, koid=", object.koid());
        Ok(())
    }

    /// Novo handle para o mesmo objeto, pertencente à task corrente.
    pub fn duplicate(&self, h: Handle, flags: OpenFlags) -> KResult<Handle> {
        let caller = self.sched.current_task();
        self.objects.duplicate(h, flags, caller)
    }

    pub fn object_type(&self, h: Handle) -> KResult<ObjectType> {
        self.objects.object_type(h)
    }

    /// Sinaliza o objeto da forma natural do tipo: libera uma unidade de
    /// semáforo ou seta um evento.
    pub fn post(&self, h: Handle) -> KResult<()> {
        self.objects.with_locked(h, |view| match view.body() {
            ObjectBody::Semaphore(_) => self.release_locked(view, 1),
            ObjectBody::Event(_) => self.set_locked(view),
        })
    }

    /// Abre um objeto genérico. Só serve para abrir existentes: criar exige o
    /// construtor do tipo (`open_semaphore`, `open_event`).
    pub fn open_existing(&self, name: &str, kind: ObjectType) -> KResult<(Handle, Disposition)> {
        let caller = self.sched.current_task();
        self.objects
            .open(Some(name), kind, OpenFlags::OPEN_EXISTING, caller, || {
                crate::debug::fatal("(Kernel) OPEN_EXISTING criou objeto", file!(), line!())
            })
    }

    pub fn handle_count(&self) -> usize {
        self.objects.handle_count()
    }
}

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
mod global {
    use super::Kernel;
    use crate::arch::x86_64::switch::X64Context;
    use crate::config::KernelConfig;

    static KERNEL: spin::Once<Kernel<X64Context>> = spin::Once::new();

    /// Converte a thread de boot na idle e publica o núcleo.
    ///
    /// Chamadas repetidas devolvem a instância já criada.
    pub fn init(config: KernelConfig) -> &'static Kernel<X64Context> {
        KERNEL.call_once(|| Kernel::new(X64Context, config))
    }

    pub fn kernel() -> Option<&'static Kernel<X64Context>> {
        KERNEL.get()
    }
}

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub use global::{init, kernel};
