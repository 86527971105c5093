//! Handle Table - Tabela Global de Handles
//!
//! Array de capacidade fixa. Cada slot ou guarda um hnode vivo ou é um elo da
//! lista de livres (lista intrusiva; o último slot livre aponta para
//! [`FREE_END`], fora do intervalo).
//!
//! `alloc` tira da cabeça da lista e `free` devolve na cabeça: um handle
//! recém-liberado é o próximo a ser reutilizado (LIFO).
//!
//! Toda mutação acontece sob o lock da tabela (ver [`ObjectManager`]);
//! o conteúdo dos objetos tem lock próprio.
//!
//! [`ObjectManager`]: super::manager::ObjectManager

use alloc::vec::Vec;

use super::handle::{Handle, ObjectType};
use super::kobject::HNode;
use crate::sys::{KError, KResult};

/// Sentinela de fim da lista de livres.
pub const FREE_END: u32 = u32::MAX;

enum Slot {
    Live(HNode),
    Free { next: u32 },
}

/// Tabela de handles.
pub struct HandleTable {
    slots: Vec<Slot>,
    free_head: u32,
    live: usize,
}

impl HandleTable {
    /// Cria a tabela com todos os slots na lista de livres, em ordem.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(FREE_END as usize);
        let mut slots = Vec::with_capacity(capacity);
        for i in 0..capacity {
            let next = if i + 1 < capacity { (i + 1) as u32 } else { FREE_END };
            slots.push(Slot::Free { next });
        }
        Self {
            slots,
            free_head: if capacity > 0 { 0 } else { FREE_END },
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Handles vivos.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Ocupa o slot da cabeça da lista de livres. O(1).
    pub fn alloc(&mut self, hnode: HNode) -> KResult<Handle> {
        if self.free_head == FREE_END {
            crate::kwarn!("(Handle) tabela cheia, capacidade=", self.slots.len());
            return Err(KError::OutOfHandles);
        }

        let index = self.free_head;
        let next = match self.slots.get(index as usize) {
            Some(Slot::Free { next }) => *next,
            _ => crate::debug::fatal("(Handle) slot vivo na lista de livres", file!(), line!()),
        };
        crate::kassert!(
            next == FREE_END || (next as usize) < self.slots.len(),
            "(Handle) lista de livres corrompida"
        );

        self.slots[index as usize] = Slot::Live(hnode);
        self.free_head = next;
        self.live += 1;
        Ok(Handle(index))
    }

    /// Devolve o slot à cabeça da lista de livres.
    ///
    /// Quem chama garante que ninguém mais usa `h` como índice vivo.
    pub fn free(&mut self, h: Handle) -> KResult<HNode> {
        let index = self.index_of(h)?;
        let old = core::mem::replace(
            &mut self.slots[index],
            Slot::Free {
                next: self.free_head,
            },
        );
        match old {
            Slot::Live(hnode) => {
                self.free_head = h.0;
                self.live -= 1;
                Ok(hnode)
            }
            free @ Slot::Free { .. } => {
                self.slots[index] = free;
                Err(KError::InvalidHandle)
            }
        }
    }

    pub fn get(&self, h: Handle) -> KResult<&HNode> {
        let index = self.index_of(h)?;
        match &self.slots[index] {
            Slot::Live(hnode) => Ok(hnode),
            Slot::Free { .. } => Err(KError::InvalidHandle),
        }
    }

    pub fn get_mut(&mut self, h: Handle) -> KResult<&mut HNode> {
        let index = self.index_of(h)?;
        match &mut self.slots[index] {
            Slot::Live(hnode) => Ok(hnode),
            Slot::Free { .. } => Err(KError::InvalidHandle),
        }
    }

    /// Busca linear por um handle vivo para um objeto com esse nome e tipo.
    pub fn lookup_by_name_and_type(&self, name: &str, kind: ObjectType) -> KResult<Handle> {
        self.iter()
            .find(|(_, hnode)| hnode.object.kind() == kind && hnode.object.name() == Some(name))
            .map(|(h, _)| h)
            .ok_or(KError::NotFound)
    }

    /// Percorre os handles vivos em ordem de índice.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &HNode)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Live(hnode) => Some((Handle(i as u32), hnode)),
            Slot::Free { .. } => None,
        })
    }

    /// Slots livres alcançáveis a partir da cabeça.
    pub fn free_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while cursor != FREE_END {
            match self.slots.get(cursor as usize) {
                Some(Slot::Free { next }) => cursor = *next,
                _ => crate::debug::fatal("(Handle) lista de livres corrompida", file!(), line!()),
            }
            count += 1;
            crate::kassert!(count <= self.slots.len(), "(Handle) ciclo na lista de livres");
        }
        count
    }

    fn index_of(&self, h: Handle) -> KResult<usize> {
        let index = h.as_usize();
        if !h.is_valid() || index >= self.slots.len() {
            return Err(KError::InvalidHandle);
        }
        Ok(index)
    }
}
