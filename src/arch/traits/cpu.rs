//! Operações de CPU que o núcleo de espera usa.
//!
//! São primitivas cruas, sem contagem: quem aninha é `sync::irq`, que chama
//! `disable_interrupts` a cada lock e `enable_interrupts` só quando a
//! profundidade volta a zero. Duas implementações:
//! - `x86_64::X64Cpu`: CLI/STI/HLT de verdade (bare-metal).
//! - `sim::HostCpu`: interrupções são uma flag e `halt` só gira.

pub trait CpuOps {
    /// Espera a próxima interrupção. No host pode retornar na hora.
    fn halt();

    /// Mascara interrupções. Idempotente; não conta aninhamento.
    fn disable_interrupts();

    /// Desmascara interrupções.
    fn enable_interrupts();

    fn are_interrupts_enabled() -> bool;

    /// Para a CPU de vez. Usado quando uma task volta de onde não devia.
    fn hang() -> ! {
        Self::disable_interrupts();
        loop {
            Self::halt();
        }
    }
}
