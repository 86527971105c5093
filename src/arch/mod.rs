//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` atua como a **única** ponte entre o núcleo (lógica agnóstica) e o hardware real.
//! Toda interação com registradores, instruções privilegiadas e troca de contexto passa por aqui.
//!
//! ## Arquitetura e Fluxo
//! 1. O núcleo importa `crate::arch::Cpu` para controle de interrupções.
//! 2. `Cpu` é um *type alias* para a implementação concreta (`x86_64::cpu::X64Cpu` em bare-metal,
//!    `sim::HostCpu` em builds hospedados).
//! 3. A troca de contexto é injetada no `Kernel` como um `ContextOps` (dispatch estático).
//!
//! ## Seleção de Plataforma
//! - `target_os = "none"` + `x86_64`: hardware real.
//! - Qualquer outro alvo: plataforma simulada (testes de host).

pub mod traits;

// Seleção de Arquitetura: x86_64 bare-metal
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub mod x86_64;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub use x86_64 as platform;

// Sempre compilada: as suítes de self-test também rodam nela em bare-metal.
pub mod sim;

#[cfg(not(target_os = "none"))]
pub use sim as platform;

// Re-exports globais para o kernel usar
pub use platform::Cpu;
pub use traits::*;
