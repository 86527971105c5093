/// Arquivo: debug/stats.rs
///
/// Propósito: Contadores estatísticos do escalonador e do grafo de espera.
/// Usado para monitoramento e diagnóstico de comportamento do sistema.
///
/// Detalhes de Implementação:
/// - Usa atômicos (AtomicU64) para permitir atualizações sem locks (baixo overhead).
/// - Contadores monotônicos crescentes.
use core::sync::atomic::{AtomicU64, Ordering};

pub struct KernelStats {
    pub ticks: AtomicU64,
    pub context_switches: AtomicU64,
    pub address_space_loads: AtomicU64,
    pub wakeups: AtomicU64,
    pub tasks_spawned: AtomicU64,
}

/// Cópia dos contadores em um instante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub ticks: u64,
    pub context_switches: u64,
    pub address_space_loads: u64,
    pub wakeups: u64,
    pub tasks_spawned: u64,
}

impl KernelStats {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            context_switches: AtomicU64::new(0),
            address_space_loads: AtomicU64::new(0),
            wakeups: AtomicU64::new(0),
            tasks_spawned: AtomicU64::new(0),
        }
    }

    /// Incrementa o relógio de ticks e devolve o novo valor
    #[inline]
    pub fn inc_ticks(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Incrementa contador de trocas de contexto
    #[inline]
    pub fn inc_context_switches(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Incrementa contador de cargas de CR3
    #[inline]
    pub fn inc_address_space_loads(&self) {
        self.address_space_loads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_wakeups(&self) {
        self.wakeups.fetch_add(1, Ordering::Relaxed);
    }

    /// Incrementa contador de tarefas criadas
    #[inline]
    pub fn inc_tasks_spawned(&self) {
        self.tasks_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            context_switches: self.context_switches.load(Ordering::Relaxed),
            address_space_loads: self.address_space_loads.load(Ordering::Relaxed),
            wakeups: self.wakeups.load(Ordering::Relaxed),
            tasks_spawned: self.tasks_spawned.load(Ordering::Relaxed),
        }
    }

    /// Imprime estatísticas no log
    pub fn dump(&self) {
        let s = self.snapshot();
        crate::kinfo!("--- Estatísticas do Núcleo ---");
        crate::kinfo!("Ticks:            ", s.ticks);
        crate::kinfo!("Trocas Contexto:  ", s.context_switches);
        crate::kinfo!("Cargas de CR3:    ", s.address_space_loads);
        crate::kinfo!("Despertares:      ", s.wakeups);
        crate::kinfo!("Tarefas Criadas:  ", s.tasks_spawned);
        crate::kinfo!("------------------------------");
    }
}

impl Default for KernelStats {
    fn default() -> Self {
        Self::new()
    }
}
