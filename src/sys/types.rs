//! Tipos fundamentais do sistema

use core::fmt;

/// Thread ID
///
/// O id 0 é sempre a task idle (a thread de boot convertida).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Tid(pub u32);

impl Tid {
    pub const IDLE: Tid = Tid(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn is_idle(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nível de privilégio associado a uma task.
///
/// Apenas uma etiqueta: a separação real de privilégios não é feita aqui.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ring {
    Kernel = 0,
    User = 3,
}

/// Identificador do espaço de endereçamento (raiz da tabela de páginas, CR3 no x86).
pub type AddressSpace = u64;
