//! # Modelo de Objetos de Kernel
//!
//! Tudo em que uma task pode esperar é um objeto acessado por handle.
//!
//! ## Estrutura
//! - **Handle**: índice pequeno numa tabela global de capacidade fixa.
//! - **HNode**: a visão privada de um handle (task dona, cursor, flags).
//! - **KObject** (onode): registro compartilhado, com nome opcional, contagem
//!   de handles, lock, flag de sinal, lista de espera e dados do tipo.
//!
//! Vários handles podem apontar para o mesmo objeto. O objeto é desmontado
//! quando o último handle é fechado: waiters pendentes acordam com
//! `WaitAbandoned` e o nome some junto.
//!
//! ## Tipos
//! - [`Semaphore`]: contador com máximo.
//! - [`Event`]: reset manual ou automático.

pub mod event;
pub mod flags;
pub mod handle;
pub mod kobject;
pub mod manager;
pub mod semaphore;
pub mod table;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

pub use event::Event;
pub use flags::OpenFlags;
pub use handle::{Disposition, Handle, ObjectType};
pub use kobject::{HNode, KObject, Koid, LockedView, ObjectBody, ObjectState, Waitable};
pub use manager::ObjectManager;
pub use semaphore::{Semaphore, SEM_MAX_VALUE};
pub use table::HandleTable;
