//! Contabilidade de Recursos (Accounting)
//!
//! Quantum, trocas de contexto e tempo de espera de cada tarefa.

/// Estatísticas de uso de recursos de uma tarefa
#[derive(Debug, Clone, Copy, Default)]
pub struct Accounting {
    /// Quantum recarregado quando a fatia expira (em ticks)
    pub quantum: u32,

    /// Quantum restante nesta fatia de tempo (em ticks)
    pub ticks_left: u32,

    /// Número de trocas de contexto voluntárias (yield, wait, exit)
    pub voluntary_switches: u64,

    /// Número de trocas de contexto involuntárias (quantum expirado)
    pub involuntary_switches: u64,

    /// Duração, em ticks, da última espera satisfeita
    pub last_wait_ticks: u64,

    /// Soma de todas as esperas satisfeitas
    pub total_wait_ticks: u64,
}

impl Accounting {
    pub fn new(quantum: u32) -> Self {
        Self {
            quantum,
            ticks_left: quantum,
            ..Self::default()
        }
    }

    /// Reinicia o quantum da task
    pub fn reset_quantum(&mut self) {
        self.ticks_left = self.quantum;
    }

    /// Troca o quantum; a fatia corrente não passa do novo valor.
    pub fn set_quantum(&mut self, quantum: u32) {
        self.quantum = quantum;
        self.ticks_left = self.ticks_left.min(quantum);
    }

    /// Incrementa contadores de troca de contexto
    pub fn account_switch(&mut self, voluntary: bool) {
        if voluntary {
            self.voluntary_switches += 1;
        } else {
            self.involuntary_switches += 1;
        }
    }

    /// Registra o fim de uma espera.
    pub fn account_wait(&mut self, ticks: u64) {
        self.last_wait_ticks = ticks;
        self.total_wait_ticks += ticks;
    }
}
