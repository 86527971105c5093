//! Framework de testes do kernel
//!
//! As suítes são listas estáticas de `TestCase`. Em bare-metal rodam no boot
//! (feature `self_test`); no host, cada módulo as chama de um `#[test]`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::arch::sim::SimContext;
use crate::config::KernelConfig;
use crate::kernel::Kernel;

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Placar de uma suíte.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<&'static str>,
}

impl SuiteReport {
    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite:");
    crate::kinfo!(name);

    let mut report = SuiteReport::default();
    for test in tests {
        match (test.func)() {
            TestResult::Pass => {
                crate::kdebug!("[PASS]");
                crate::kdebug!(test.name);
                report.passed += 1;
            }
            TestResult::Fail => {
                crate::kerror!("[FAIL]");
                crate::kerror!(test.name);
                report.failed += 1;
                report.failures.push(test.name);
            }
            TestResult::Skip => {
                crate::kwarn!("[SKIP]");
                crate::kwarn!(test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if report.failed > 0 {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}

/// Núcleo novo sobre a plataforma simulada, vivo até o fim do processo.
///
/// `Scheduler::create` exige `'static`; cada caso de teste vaza o seu.
pub fn sim_kernel(config: KernelConfig) -> &'static Kernel<SimContext> {
    Box::leak(Box::new(Kernel::new(SimContext::new(), config)))
}

/// Configuração pequena, para exercitar limites sem laços enormes.
pub const fn small_config() -> KernelConfig {
    KernelConfig {
        default_quantum: 2,
        idle_quantum: 1,
        stack_size: 256,
        handle_capacity: 8,
        max_tasks: 6,
        max_wait_nodes: 8,
    }
}

/// Falha o caso de teste (com log) se a condição não vale.
#[macro_export]
macro_rules! kcheck {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            $crate::kerror!($msg);
            return $crate::klib::test_framework::TestResult::Fail;
        }
    };
}
