//! Cabeças de lista do grafo de espera.
//!
//! As listas são circulares e duplamente encadeadas, mas os elos moram nos
//! próprios nós (na arena do [`WaitGraph`](super::graph::WaitGraph)); uma
//! `WaitList` guarda só a cabeça e o contador.

/// Chave de um nó de espera na arena.
pub type NodeKey = usize;

/// Par de elos de uma das dimensões de um nó.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub next: NodeKey,
    pub prev: NodeKey,
}

impl Link {
    /// Elo de um nó sozinho na lista (aponta para si mesmo).
    pub const fn solo(key: NodeKey) -> Self {
        Self { next: key, prev: key }
    }
}

/// Cabeça + contador de uma lista de espera.
///
/// Invariante: `head` é `None` se e somente se `count == 0`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WaitList {
    pub(crate) head: Option<NodeKey>,
    pub(crate) count: u32,
}

impl WaitList {
    pub const fn new() -> Self {
        Self {
            head: None,
            count: 0,
        }
    }

    /// Nó mais antigo da lista.
    pub fn head(&self) -> Option<NodeKey> {
        self.head
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
