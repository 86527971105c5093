//! Handles e tipos de objeto.

use core::fmt;

/// Índice opaco na tabela de handles (o que o resto do kernel vê).
///
/// Só é válido enquanto o slot estiver vivo; não carrega posse alguma.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u32);

impl Handle {
    /// Handle inválido (placeholder).
    pub const INVALID: Handle = Handle(u32::MAX);

    /// Verifica se o handle não é INVALID.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Converte para usize (para retorno de syscall).
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Tipo declarado de um objeto de kernel.
///
/// Nomes são únicos por tipo: um semáforo e um evento podem se chamar "x".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    /// Contador com limite superior
    Semaphore = 3,
    /// Evento com reset manual ou automático
    Event = 6,
}

impl ObjectType {
    pub const fn name(self) -> &'static str {
        match self {
            ObjectType::Semaphore => "semaphore",
            ObjectType::Event => "event",
        }
    }
}

/// Se `open` criou um objeto novo ou entrou em um existente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Created,
    Joined,
}
