//! # Gerenciador de Objetos
//!
//! Espaço de nomes e ciclo de vida dos objetos de kernel.
//!
//! - `open` cria um objeto novo ou entra em um existente com o mesmo nome e tipo.
//! - `duplicate` cria mais um handle para o mesmo objeto.
//! - `close` solta um handle; o último a sair devolve o objeto para ser
//!   desmontado pelo [`Kernel`](crate::Kernel).
//!
//! O lock da tabela é solto antes de qualquer lock de objeto ser tomado, para
//! que buscas na tabela não serializem operações em objetos não relacionados.

use alloc::sync::Arc;

use super::flags::OpenFlags;
use super::handle::{Disposition, Handle, ObjectType};
use super::kobject::{HNode, KObject, LockedView, ObjectBody};
use super::table::HandleTable;
use crate::sync::Spinlock;
use crate::sys::{KError, KResult, Tid};

pub struct ObjectManager {
    table: Spinlock<HandleTable>,
}

impl ObjectManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: Spinlock::new(HandleTable::new(capacity)),
        }
    }

    /// Abre (ou cria) um objeto.
    ///
    /// `make` só é chamado quando um objeto novo vai ser criado.
    pub fn open<F>(
        &self,
        name: Option<&str>,
        kind: ObjectType,
        flags: OpenFlags,
        caller: Tid,
        make: F,
    ) -> KResult<(Handle, Disposition)>
    where
        F: FnOnce() -> ObjectBody,
    {
        if !flags.is_consistent() || name == Some("") {
            return Err(KError::InvalidArgument);
        }
        let owner = Self::owner(flags, caller);

        let mut table = self.table.lock();

        if let Some(name) = name {
            if let Ok(existing) = table.lookup_by_name_and_type(name, kind) {
                if flags.contains(OpenFlags::CREATE_NEW) {
                    return Err(KError::AlreadyExists);
                }
                let h = Self::dup_locked(&mut table, existing, flags, owner)?;
                crate::ktrace!("(Object) open entrou em objeto existente, handle=", h.0);
                return Ok((h, Disposition::Joined));
            }
        }

        if flags.contains(OpenFlags::OPEN_EXISTING) {
            return Err(KError::NotFound);
        }

        let object = KObject::new(name, make());
        crate::kassert!(object.kind() == kind, "(Object) corpo de tipo diferente do declarado");
        let h = table.alloc(HNode {
            object,
            task: owner,
            offset: 0,
            flags: flags.persistent(),
        })?;
        crate::ktrace!("(Object) objeto criado, handle=", h.0);
        Ok((h, Disposition::Created))
    }

    /// Cria mais um handle para o objeto de `h`.
    pub fn duplicate(&self, h: Handle, flags: OpenFlags, caller: Tid) -> KResult<Handle> {
        let mut table = self.table.lock();
        Self::dup_locked(&mut table, h, flags, Self::owner(flags, caller))
    }

    /// Solta um handle. Devolve o objeto se este era o último handle.
    pub fn close(&self, h: Handle) -> KResult<Option<Arc<KObject>>> {
        let mut table = self.table.lock();
        let hnode = table.free(h)?;
        let last = hnode.object.drop_handle();
        drop(table);

        crate::ktrace!("(Object) handle fechado=", h.0);
        Ok(last.then_some(hnode.object))
    }

    /// Resolve o handle para o objeto (sem travar o objeto).
    pub fn resolve(&self, h: Handle) -> KResult<Arc<KObject>> {
        let table = self.table.lock();
        Ok(Arc::clone(&table.get(h)?.object))
    }

    /// Executa `f` com o objeto de `h` travado.
    ///
    /// O lock da tabela é solto antes de travar o objeto; o lock do objeto é
    /// solto ao fim de `f`, inclusive em erro.
    pub fn with_locked<R, F>(&self, h: Handle, f: F) -> KResult<R>
    where
        F: FnOnce(&mut LockedView<'_>) -> KResult<R>,
    {
        let object = self.resolve(h)?;
        let mut view = object.lock()?;
        f(&mut view)
    }

    /// Cópia do hnode de `h`.
    pub fn hnode(&self, h: Handle) -> KResult<HNode> {
        Ok(self.table.lock().get(h)?.clone())
    }

    pub fn object_type(&self, h: Handle) -> KResult<ObjectType> {
        Ok(self.table.lock().get(h)?.object.kind())
    }

    /// Move o cursor do handle.
    pub fn seek(&self, h: Handle, offset: u64) -> KResult<u64> {
        let mut table = self.table.lock();
        let hnode = table.get_mut(h)?;
        let old = hnode.offset;
        hnode.offset = offset;
        Ok(old)
    }

    /// Handles vivos na tabela.
    pub fn handle_count(&self) -> usize {
        self.table.lock().len()
    }

    fn owner(flags: OpenFlags, caller: Tid) -> Option<Tid> {
        if flags.contains(OpenFlags::KERNEL) {
            None
        } else {
            Some(caller)
        }
    }

    fn dup_locked(
        table: &mut HandleTable,
        h: Handle,
        flags: OpenFlags,
        owner: Option<Tid>,
    ) -> KResult<Handle> {
        let source = table.get(h)?;
        let hnode = HNode {
            object: Arc::clone(&source.object),
            task: owner,
            offset: source.offset,
            flags: flags.persistent(),
        };
        let object = Arc::clone(&hnode.object);
        let dup = table.alloc(hnode)?;
        object.add_handle();
        Ok(dup)
    }
}
