/// Arquivo: object/kobject.rs
///
/// Propósito: Registro compartilhado de um objeto de kernel (onode).
/// Todos os handles que apontam para o mesmo objeto compartilham este registro.
///
/// Detalhes de Implementação:
/// - IDs únicos globais (KOID), usados também para ordenar locks em `wait_many`.
/// - O comportamento por tipo é um conjunto fechado de variantes (`ObjectBody`)
///   despachado pelo trait `Waitable`.
/// - Dois locks: o estado (sinal + dados do tipo) e a lista de espera, que é
///   folha e só é tocada com a fila de execução travada.
use alloc::string::String;
use alloc::sync::Arc;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::event::Event;
use super::handle::ObjectType;
use super::semaphore::Semaphore;
use crate::sync::{Spinlock, SpinlockGuard};
use crate::sys::{KError, KResult, Tid};
use crate::wait::WaitList;

/// Kernel Object ID
pub type Koid = u64;

/// Gerador de KOIDs
static KOID_GENERATOR: AtomicU64 = AtomicU64::new(1);

/// Gera um novo KOID único
pub fn generate_koid() -> Koid {
    KOID_GENERATOR.fetch_add(1, Ordering::Relaxed)
}

/// Capacidade comum a todo objeto em que se pode esperar.
pub trait Waitable {
    /// Uma espera seria satisfeita agora.
    fn is_signalled(&self) -> bool;

    /// Consome o sinal em nome de `by` (fast path de `wait`).
    ///
    /// Só é chamado com o objeto sinalizado.
    fn unsignal(&mut self, by: Tid);

    /// Último handle fechado.
    fn on_close(&mut self) {}
}

/// Dados específicos do tipo, guardados junto do registro.
#[derive(Debug)]
pub enum ObjectBody {
    Semaphore(Semaphore),
    Event(Event),
}

impl ObjectBody {
    pub fn kind(&self) -> ObjectType {
        match self {
            ObjectBody::Semaphore(_) => ObjectType::Semaphore,
            ObjectBody::Event(_) => ObjectType::Event,
        }
    }

    fn as_waitable(&self) -> &dyn Waitable {
        match self {
            ObjectBody::Semaphore(s) => s,
            ObjectBody::Event(e) => e,
        }
    }

    fn as_waitable_mut(&mut self) -> &mut dyn Waitable {
        match self {
            ObjectBody::Semaphore(s) => s,
            ObjectBody::Event(e) => e,
        }
    }
}

impl Waitable for ObjectBody {
    fn is_signalled(&self) -> bool {
        self.as_waitable().is_signalled()
    }

    fn unsignal(&mut self, by: Tid) {
        self.as_waitable_mut().unsignal(by)
    }

    fn on_close(&mut self) {
        self.as_waitable_mut().on_close()
    }
}

/// Estado protegido pelo lock do objeto.
#[derive(Debug)]
pub struct ObjectState {
    signalled: bool,
    closed: bool,
    body: ObjectBody,
}

impl ObjectState {
    fn new(body: ObjectBody) -> Self {
        let signalled = body.is_signalled();
        Self {
            signalled,
            closed: false,
            body,
        }
    }

    pub fn is_signalled(&self) -> bool {
        self.signalled
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn body(&self) -> &ObjectBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }

    /// Recalcula a flag de sinal depois de mexer no corpo.
    pub(crate) fn refresh(&mut self) {
        self.signalled = self.body.is_signalled();
    }

    /// Consome o sinal (fast path da espera).
    pub(crate) fn consume(&mut self, by: Tid) {
        crate::kassert!(self.signalled, "(Object) unsignal em objeto não sinalizado");
        self.body.unsignal(by);
        self.refresh();
    }

    /// Marca como fechado e roda o hook do tipo.
    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.body.on_close();
        self.signalled = false;
    }
}

/// Objeto de kernel compartilhado (onode).
pub struct KObject {
    koid: Koid,
    name: Option<String>,
    kind: ObjectType,
    /// Handles abertos. Só muda com a tabela de handles travada.
    handles: AtomicUsize,
    state: Spinlock<ObjectState>,
    pub(crate) waiters: Spinlock<WaitList>,
}

impl KObject {
    /// Cria o registro com uma referência (o primeiro handle).
    pub(crate) fn new(name: Option<&str>, body: ObjectBody) -> Arc<Self> {
        Arc::new(Self {
            koid: generate_koid(),
            name: name.map(String::from),
            kind: body.kind(),
            handles: AtomicUsize::new(1),
            state: Spinlock::new(ObjectState::new(body)),
            waiters: Spinlock::new(WaitList::new()),
        })
    }

    pub fn koid(&self) -> Koid {
        self.koid
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> ObjectType {
        self.kind
    }

    /// Handles abertos para o objeto.
    pub fn ref_count(&self) -> usize {
        self.handles.load(Ordering::Relaxed)
    }

    /// Mais um handle aponta para o objeto (duplicate, join por nome).
    pub(crate) fn add_handle(&self) {
        self.handles.fetch_add(1, Ordering::Relaxed);
    }

    /// Um handle foi fechado. `true` se era o último: quem chamou desmonta.
    #[must_use]
    pub(crate) fn drop_handle(&self) -> bool {
        let prev = self.handles.fetch_sub(1, Ordering::AcqRel);
        crate::kassert!(prev > 0, "(Object) contagem de handles negativa");
        prev == 1
    }

    /// Tasks esperando pelo objeto.
    pub fn wait_count(&self) -> u32 {
        self.waiters.lock().count()
    }

    /// A lista de espera está vazia (cabeça nula).
    pub fn has_no_waiters(&self) -> bool {
        self.waiters.lock().is_empty()
    }

    /// Trava o objeto; falha se ele já foi desmontado.
    pub fn lock(&self) -> KResult<LockedView<'_>> {
        let state = self.state.lock();
        if state.closed {
            return Err(KError::InvalidHandle);
        }
        Ok(LockedView {
            object: self,
            state,
        })
    }

    /// Trava sem checar `closed` (desmontagem).
    pub(crate) fn lock_state(&self) -> SpinlockGuard<'_, ObjectState> {
        self.state.lock()
    }
}

/// Visão travada de um objeto.
///
/// O lock do objeto é solto quando a visão sai de escopo, em qualquer caminho
/// de saída.
pub struct LockedView<'a> {
    object: &'a KObject,
    state: SpinlockGuard<'a, ObjectState>,
}

impl<'a> LockedView<'a> {
    pub fn object(&self) -> &'a KObject {
        self.object
    }
}

impl Deref for LockedView<'_> {
    type Target = ObjectState;

    fn deref(&self) -> &ObjectState {
        &self.state
    }
}

impl DerefMut for LockedView<'_> {
    fn deref_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }
}

/// Visão de um handle sobre um objeto (hnode).
#[derive(Clone)]
pub struct HNode {
    pub(crate) object: Arc<KObject>,
    /// `None` para handles privados do kernel.
    pub(crate) task: Option<Tid>,
    pub(crate) offset: u64,
    pub(crate) flags: super::OpenFlags,
}

impl HNode {
    pub fn object(&self) -> &Arc<KObject> {
        &self.object
    }

    pub fn task(&self) -> Option<Tid> {
        self.task
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn flags(&self) -> super::OpenFlags {
        self.flags
    }
}
