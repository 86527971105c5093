// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Macros de log do núcleo com custo ZERO quando desligadas.
//
// ARQUITETURA:
// - Usa features do Cargo para filtrar em tempo de compilação
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - Os níveis ativos encaminham para a fachada `log`; quem instala o backend
//   (serial, console) é o colaborador externo de console
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada operação)
//
// COMO USAR:
//   kinfo!("(Sched) Inicializando...");     // Apenas string
//   kinfo!("(Sched) Tid=", 0x10);           // String + hex
//
// =============================================================================

#[doc(hidden)]
pub use log;

// =============================================================================
// kerror! - Sempre ativo (exceto com no_logs)
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => {{
        $crate::debug::logging::log::error!("{}", $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::logging::log::error!("{}{:#x}", $msg, $val as u64);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => {{
        let _ = $msg;
    }};
    ($msg:expr, $val:expr) => {{
        let _ = ($msg, $val);
    }};
}

// =============================================================================
// kwarn! - Ativo em log_error e acima
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {{
        $crate::debug::logging::log::warn!("{}", $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::logging::log::warn!("{}{:#x}", $msg, $val as u64);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {{
        let _ = $msg;
    }};
    ($msg:expr, $val:expr) => {{
        let _ = ($msg, $val);
    }};
}

// =============================================================================
// kinfo! - Ativo em log_info, log_debug, log_trace
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {{
        $crate::debug::logging::log::info!("{}", $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::logging::log::info!("{}{:#x}", $msg, $val as u64);
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {{
        let _ = $msg;
    }};
    ($msg:expr, $val:expr) => {{
        let _ = ($msg, $val);
    }};
}

// =============================================================================
// kdebug! - Ativo em log_debug, log_trace
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {{
        $crate::debug::logging::log::debug!("{}", $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::logging::log::debug!("{}{:#x}", $msg, $val as u64);
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {{
        let _ = $msg;
    }};
    ($msg:expr, $val:expr) => {{
        let _ = ($msg, $val);
    }};
}

// =============================================================================
// ktrace! - Ativo apenas em log_trace
// =============================================================================

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {{
        $crate::debug::logging::log::trace!("{}", $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::logging::log::trace!("{}{:#x}", $msg, $val as u64);
    }};
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {{
        let _ = $msg;
    }};
    ($msg:expr, $val:expr) => {{
        let _ = ($msg, $val);
    }};
}
