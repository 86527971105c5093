//! Kernel Library (KLib).
//!
//! Utilitários internos. Hoje só o framework das suítes de self-test.

#[cfg(any(test, feature = "self_test"))]
pub mod test_framework;
