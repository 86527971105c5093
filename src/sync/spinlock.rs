//! Spinlock - bloqueio com busy-wait

use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use super::irq;

/// Spinlock - usa busy-wait, NÃO pode dormir
///
/// Adquirir desabilita interrupções (via [`irq`]) antes de girar; soltar o
/// guard libera o lock primeiro e só então reabilita.
///
/// # Quando usar
///
/// - Seções críticas MUITO curtas
/// - Dentro de handlers de interrupção
/// - Quando não pode chamar scheduler
pub struct Spinlock<T> {
    inner: spin::Mutex<T>,
}

impl<T> Spinlock<T> {
    /// Cria novo spinlock
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
        }
    }

    /// Adquire o lock
    pub fn lock(&self) -> SpinlockGuard<'_, T> {
        irq::disable();
        SpinlockGuard {
            guard: ManuallyDrop::new(self.inner.lock()),
        }
    }

    /// Tenta adquirir sem bloquear
    pub fn try_lock(&self) -> Option<SpinlockGuard<'_, T>> {
        irq::disable();
        match self.inner.try_lock() {
            Some(guard) => Some(SpinlockGuard {
                guard: ManuallyDrop::new(guard),
            }),
            None => {
                irq::enable();
                None
            }
        }
    }

    /// Usado em asserções de invariantes.
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Força o desbloqueio do spinlock (USO INTERNO DO SCHEDULER)
    ///
    /// Não mexe no contador de interrupções: quem chama decide quando
    /// reabilitar.
    ///
    /// # Safety
    ///
    /// Só deve ser usado pelo scheduler ao iniciar uma nova task que "herdou"
    /// o lock da task anterior mas não tem o Guard.
    pub unsafe fn force_unlock(&self) {
        self.inner.force_unlock();
    }
}

impl<T: Default> Default for Spinlock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Guard do spinlock - libera ao sair do escopo
pub struct SpinlockGuard<'a, T> {
    guard: ManuallyDrop<spin::MutexGuard<'a, T>>,
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for SpinlockGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: o guard interno é descartado exatamente uma vez, aqui.
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        irq::enable();
    }
}
