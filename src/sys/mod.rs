//! System Definitions.
//!
//! Contém os tipos de erro e identificadores compartilhados por todo o núcleo.

pub mod error;
pub mod types;

pub use error::{Errno, KError, KResult};
pub use types::{AddressSpace, Ring, Tid};
