//! # Esperas
//!
//! Bloqueio de tasks em objetos de kernel.
//!
//! - `list`/`graph`: a malha de nós (task, objeto).
//! - `wake`: lado do scheduler (registrar, acordar, abandonar).
//! - `ops`: `wait` e `wait_many` sobre handles.
//!
//! Uma espera "any" termina quando qualquer objeto sinaliza; as esperas
//! restantes da task são canceladas na hora. Uma espera "all" termina quando
//! o último objeto pendente sinaliza.

pub mod graph;
pub mod list;
pub mod ops;
pub mod wake;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

pub use graph::{Dim, ListIter, WaitGraph, WaitNode};
pub use list::{Link, NodeKey, WaitList};
pub use wake::WakeCount;
