//! # Grafo de Espera
//!
//! Malha bidirecional de nós de espera. Cada nó liga UMA task a UM objeto e
//! está, ao mesmo tempo, em duas listas circulares:
//!
//! - a lista da task (todos os objetos pelos quais ela espera);
//! - a lista do objeto (todas as tasks esperando por ele), em ordem FIFO.
//!
//! Os nós vivem numa arena (`Slab`) de capacidade fixa e são referenciados
//! por chave. `detach` é a única operação que tira um nó do grafo: remove das
//! duas listas, verifica os elos recíprocos antes e depois e libera o nó.
//! Qualquer inconsistência é fatal.
//!
//! O grafo é protegido pelo lock da fila de execução; a lista do objeto é
//! passada já travada por quem chama.

use alloc::sync::Arc;
use slab::Slab;

use super::list::{Link, NodeKey, WaitList};
use crate::object::KObject;
use crate::sys::{KError, KResult, Tid};

/// Dimensão de um elo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dim {
    /// Lista dos objetos esperados por uma task.
    Task,
    /// Lista das tasks esperando um objeto.
    Object,
}

/// Junção (task, objeto) de uma espera pendente.
pub struct WaitNode {
    task_link: Link,
    object_link: Link,
    /// Chave da task na fila de execução.
    pub(crate) task: usize,
    pub(crate) tid: Tid,
    pub(crate) object: Arc<KObject>,
    /// Posição do objeto na lista passada a `wait_many`.
    pub(crate) index: usize,
    /// Tick em que a espera começou.
    pub(crate) began: u64,
}

impl WaitNode {
    fn link(&self, dim: Dim) -> &Link {
        match dim {
            Dim::Task => &self.task_link,
            Dim::Object => &self.object_link,
        }
    }

    fn link_mut(&mut self, dim: Dim) -> &mut Link {
        match dim {
            Dim::Task => &mut self.task_link,
            Dim::Object => &mut self.object_link,
        }
    }

    pub fn tid(&self) -> Tid {
        self.tid
    }

    pub fn object(&self) -> &Arc<KObject> {
        &self.object
    }
}

/// Arena de nós de espera.
pub struct WaitGraph {
    nodes: Slab<WaitNode>,
    capacity: usize,
}

impl WaitGraph {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            capacity,
        }
    }

    /// Nós vivos.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Quantos nós ainda cabem.
    pub fn available(&self) -> usize {
        self.capacity - self.nodes.len()
    }

    pub fn node(&self, key: NodeKey) -> Option<&WaitNode> {
        self.nodes.get(key)
    }

    /// Cria um nó e o coloca no fim das duas listas.
    ///
    /// Em caso de erro nada muda.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        task: usize,
        tid: Tid,
        task_list: &mut WaitList,
        object: Arc<KObject>,
        object_list: &mut WaitList,
        index: usize,
        began: u64,
    ) -> KResult<NodeKey> {
        if self.nodes.len() >= self.capacity {
            crate::kwarn!("(Wait) arena de nós de espera cheia");
            return Err(KError::OutOfMemory);
        }

        let entry = self.nodes.vacant_entry();
        let key = entry.key();
        entry.insert(WaitNode {
            task_link: Link::solo(key),
            object_link: Link::solo(key),
            task,
            tid,
            object,
            index,
            began,
        });

        self.push_back(task_list, key, Dim::Task);
        self.push_back(object_list, key, Dim::Object);
        Ok(key)
    }

    /// Remove o nó das duas listas e o libera.
    pub fn detach(
        &mut self,
        key: NodeKey,
        task_list: &mut WaitList,
        object_list: &mut WaitList,
    ) -> WaitNode {
        self.unlink(task_list, key, Dim::Task);
        self.unlink(object_list, key, Dim::Object);
        match self.nodes.try_remove(key) {
            Some(node) => node,
            None => crate::debug::fatal("(Wait) detach de nó inexistente", file!(), line!()),
        }
    }

    /// Percorre uma lista a partir da cabeça.
    pub fn iter(&self, list: &WaitList, dim: Dim) -> ListIter<'_> {
        ListIter {
            graph: self,
            dim,
            start: list.head,
            cursor: list.head,
        }
    }

    /// Confere elos recíprocos e contador de uma lista inteira.
    pub fn verify(&self, list: &WaitList, dim: Dim) {
        Self::check_head(list);
        let mut seen = 0u32;
        for key in self.iter(list, dim) {
            let link = *self.get(key).link(dim);
            crate::kassert!(
                self.get(link.prev).link(dim).next == key && self.get(link.next).link(dim).prev == key,
                "(Wait) elo recíproco quebrado"
            );
            seen += 1;
            crate::kassert!(seen <= list.count, "(Wait) lista maior que o contador");
        }
        crate::kassert!(seen == list.count, "(Wait) contador não bate com a lista");
    }

    fn get(&self, key: NodeKey) -> &WaitNode {
        match self.nodes.get(key) {
            Some(node) => node,
            None => crate::debug::fatal("(Wait) elo aponta para nó livre", file!(), line!()),
        }
    }

    fn get_mut(&mut self, key: NodeKey) -> &mut WaitNode {
        match self.nodes.get_mut(key) {
            Some(node) => node,
            None => crate::debug::fatal("(Wait) elo aponta para nó livre", file!(), line!()),
        }
    }

    fn check_head(list: &WaitList) {
        crate::kassert!(
            list.head.is_none() == (list.count == 0),
            "(Wait) cabeça e contador inconsistentes"
        );
    }

    fn push_back(&mut self, list: &mut WaitList, key: NodeKey, dim: Dim) {
        Self::check_head(list);
        match list.head {
            None => {
                *self.get_mut(key).link_mut(dim) = Link::solo(key);
                list.head = Some(key);
            }
            Some(head) => {
                let tail = self.get(head).link(dim).prev;
                *self.get_mut(key).link_mut(dim) = Link {
                    next: head,
                    prev: tail,
                };
                self.get_mut(tail).link_mut(dim).next = key;
                self.get_mut(head).link_mut(dim).prev = key;
            }
        }
        list.count += 1;
        Self::check_head(list);
    }

    fn unlink(&mut self, list: &mut WaitList, key: NodeKey, dim: Dim) {
        Self::check_head(list);
        crate::kassert!(list.count > 0, "(Wait) detach em lista vazia");

        let Link { next, prev } = *self.get(key).link(dim);
        crate::kassert!(
            self.get(prev).link(dim).next == key && self.get(next).link(dim).prev == key,
            "(Wait) elo recíproco quebrado"
        );

        if next == key {
            crate::kassert!(
                list.count == 1 && list.head == Some(key),
                "(Wait) nó solitário fora da cabeça"
            );
            list.head = None;
        } else {
            self.get_mut(prev).link_mut(dim).next = next;
            self.get_mut(next).link_mut(dim).prev = prev;
            if list.head == Some(key) {
                list.head = Some(next);
            }
        }
        list.count -= 1;
        *self.get_mut(key).link_mut(dim) = Link::solo(key);
        Self::check_head(list);
    }
}

/// Iterador sobre as chaves de uma lista circular.
pub struct ListIter<'a> {
    graph: &'a WaitGraph,
    dim: Dim,
    start: Option<NodeKey>,
    cursor: Option<NodeKey>,
}

impl Iterator for ListIter<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.cursor?;
        let next = self.graph.get(key).link(self.dim).next;
        self.cursor = if Some(next) == self.start { None } else { Some(next) };
        Some(key)
    }
}
