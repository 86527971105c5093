//! Condições fatais do núcleo.
//!
//! Invariantes quebradas (listas do grafo de espera inconsistentes, locks
//! presos onde deveriam estar livres, contadores corrompidos) não têm
//! recuperação: registramos o máximo de contexto no log de erro e abortamos.

use core::sync::atomic::{AtomicU32, Ordering};

/// Última task colocada em execução (apenas para diagnóstico).
static LAST_TID: AtomicU32 = AtomicU32::new(0);

/// Registra a task corrente para o bloco de diagnóstico.
#[inline]
pub fn note_current(tid: u32) {
    LAST_TID.store(tid, Ordering::Relaxed);
}

/// Aborta o kernel com diagnóstico completo.
#[cold]
#[inline(never)]
pub fn fatal(msg: &'static str, file: &'static str, line: u32) -> ! {
    crate::kerror!("(Fatal) ==================== OOPS ====================");
    crate::kerror!("(Fatal) ");
    crate::kerror!(msg);
    crate::kerror!(file);
    crate::kerror!("(Fatal) linha=", line);
    crate::kerror!("(Fatal) irq_depth=", crate::sync::irq::depth());
    crate::kerror!("(Fatal) tid=", LAST_TID.load(Ordering::Relaxed));
    crate::kerror!("(Fatal) ================================================");
    panic!("{}", msg);
}

/// Verifica uma invariante; se falhar, chama [`fatal`].
#[macro_export]
macro_rules! kassert {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            $crate::debug::fatal::fatal($msg, file!(), line!());
        }
    };
}
