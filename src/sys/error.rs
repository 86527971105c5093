//! # Códigos de Erro do Núcleo
//!
//! `KError` é a taxonomia usada por todas as operações do núcleo de espera e
//! escalonamento. Cada variante tem um `Errno` POSIX correspondente para ser
//! devolvido como valor negativo em RAX pela camada de syscalls.
//!
//! Erros recuperáveis sempre voltam para o chamador imediato; nenhuma operação
//! deste crate tenta de novo por conta própria.

use core::fmt;

/// Código de erro no estilo POSIX/Linux.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Errno {
    Success = 0,
    ENOENT = 2,  // No such file or directory
    EINTR = 4,   // Interrupted system call
    EBADF = 9,   // Bad file number
    ENOMEM = 12, // Out of memory
    EEXIST = 17, // File exists
    EINVAL = 22, // Invalid argument
    ENFILE = 23, // File table overflow
    ENOSYS = 38, // Function not implemented

    // Forge
    EWAIT_ABANDONED = 99, // Objeto destruído com a task ainda esperando
}

impl Errno {
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }
}

/// Erro de uma operação do núcleo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KError {
    /// Entrada malformada: contagem, flag ou transição de estado inválida.
    InvalidArgument,
    /// Nome não encontrado (abertura com `OPEN_EXISTING`).
    NotFound,
    /// Nome já existe (abertura com `CREATE_NEW`).
    AlreadyExists,
    OutOfMemory,
    OutOfHandles,
    /// Handle fora da tabela, livre ou apontando para objeto fechado.
    InvalidHandle,
    Unimplemented,
    /// O objeto foi destruído enquanto a task esperava por ele.
    WaitAbandoned,
    /// A espera voltou antes de ser satisfeita (a plataforma não suspendeu a task).
    Interrupted,
}

/// Resultado das operações do núcleo.
pub type KResult<T> = Result<T, KError>;

impl KError {
    pub const fn errno(self) -> Errno {
        match self {
            KError::InvalidArgument => Errno::EINVAL,
            KError::NotFound => Errno::ENOENT,
            KError::AlreadyExists => Errno::EEXIST,
            KError::OutOfMemory => Errno::ENOMEM,
            KError::OutOfHandles => Errno::ENFILE,
            KError::InvalidHandle => Errno::EBADF,
            KError::Unimplemented => Errno::ENOSYS,
            KError::WaitAbandoned => Errno::EWAIT_ABANDONED,
            KError::Interrupted => Errno::EINTR,
        }
    }

    /// Valor negativo pronto para retorno de syscall.
    pub fn as_isize(self) -> isize {
        self.errno().as_isize()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KError::InvalidArgument => "Invalid argument",
            KError::NotFound => "No such file or directory",
            KError::AlreadyExists => "File exists",
            KError::OutOfMemory => "Out of memory",
            KError::OutOfHandles => "Too many open files",
            KError::InvalidHandle => "Bad file descriptor",
            KError::Unimplemented => "Function not implemented",
            KError::WaitAbandoned => "Wait abandoned",
            KError::Interrupted => "Interrupted wait",
        }
    }
}

impl From<KError> for Errno {
    fn from(err: KError) -> Self {
        err.errno()
    }
}

impl fmt::Display for KError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
