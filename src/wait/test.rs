//! Testes de espera e despertar
//!
//! Rodam na plataforma simulada: o `switch` volta na hora, então a thread de
//! teste "vira" a task escolhida pelo scheduler. Uma espera que bloqueia
//! devolve `Interrupted` e a task seguinte assume; o resultado real da espera
//! fica guardado na task até `finish_wait`.

use crate::arch::sim::SimContext;
use crate::config::KernelConfig;
use crate::kernel::Kernel;
use crate::klib::test_framework::{sim_kernel, small_config, TestCase, TestResult};
use crate::object::{Handle, OpenFlags};
use crate::sched::TaskState;
use crate::sys::{KError, KResult, Tid};
use crate::wait::Dim;

type SimKernel = Kernel<SimContext>;

/// Testes de espera
pub const WAIT_TESTS: &[TestCase] = &[
    TestCase::new("semaphore_wait_release", test_semaphore_wait_release),
    TestCase::new("wake_is_fifo", test_wake_is_fifo),
    TestCase::new("wait_any_cancels_rest", test_wait_any_cancels_rest),
    TestCase::new("wait_all_consumes_signalled", test_wait_all_consumes_signalled),
    TestCase::new("wait_all_reports_last", test_wait_all_reports_last),
    TestCase::new("wait_many_validation", test_wait_many_validation),
    TestCase::new("close_abandons_waiters", test_close_abandons_waiters),
    TestCase::new("close_abandons_wait_all", test_close_abandons_wait_all),
    TestCase::new("wait_all_abandon_keeps_taken_unit", test_wait_all_abandon_keeps_taken_unit),
    TestCase::new("wait_node_exhaustion", test_wait_node_exhaustion),
    TestCase::new("event_manual_wakes_all", test_event_manual_wakes_all),
    TestCase::new("event_auto_wakes_one", test_event_auto_wakes_one),
];

fn noop(_: usize) -> i32 {
    0
}

fn spawn(k: &'static SimKernel, name: &str) -> Option<Tid> {
    k.scheduler().create(noop, 0, name, TaskState::Runnable).ok()
}

fn state_of(k: &SimKernel, tid: Tid) -> Option<TaskState> {
    k.scheduler().task_info(tid).ok().map(|info| info.state)
}

fn sem(k: &SimKernel, max: i32, initial: i32) -> KResult<Handle> {
    k.open_semaphore(None, OpenFlags::empty(), max, initial).map(|(h, _)| h)
}

fn no_waiters(k: &SimKernel, h: Handle) -> bool {
    k.objects().resolve(h).map(|o| o.has_no_waiters()).unwrap_or(false)
}

fn graph_len(k: &SimKernel) -> usize {
    k.scheduler().rq.lock().waits.len()
}

/// A espera "s" (max 1, initial 0); B libera 1.
fn test_semaphore_wait_release() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    crate::kcheck!(k.scheduler().current_task() == a, "(Wait) yield não escolheu A");

    let Ok((s, _)) = k.open_semaphore(Some("s"), OpenFlags::CREATE_NEW, 1, 0) else {
        return TestResult::Fail;
    };
    crate::kcheck!(k.wait(s) == Err(KError::Interrupted), "(Wait) A não bloqueou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Waiting), "(Wait) A não está WAITING");
    crate::kcheck!(k.scheduler().current_task() == b, "(Wait) B não assumiu");

    let Ok(object) = k.objects().resolve(s) else {
        return TestResult::Fail;
    };
    crate::kcheck!(object.wait_count() == 1, "(Wait) nó de espera ausente");
    {
        let rq = k.scheduler().rq.lock();
        rq.waits.verify(&object.waiters.lock(), Dim::Object);
    }

    crate::kcheck!(k.release(s, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A não acordou");
    crate::kcheck!(k.semaphore_state(s) == Ok((0, 1)), "(Wait) unidade não foi consumida");
    crate::kcheck!(object.has_no_waiters(), "(Wait) lista do objeto não esvaziou");
    crate::kcheck!(
        object.lock().map(|v| v.is_signalled()) == Ok(false),
        "(Wait) objeto ficou sinalizado"
    );
    crate::kcheck!(graph_len(k) == 0, "(Wait) nó vazou no grafo");
    crate::kcheck!(k.scheduler().finish_wait(a) == Ok(0), "(Wait) resultado de A errado");
    TestResult::Pass
}

fn test_wake_is_fifo() -> TestResult {
    let k = sim_kernel(small_config());
    let tids = [spawn(k, "A"), spawn(k, "B"), spawn(k, "C"), spawn(k, "D")];
    let [Some(a), Some(b), Some(c), Some(d)] = tids else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let Ok(s) = sem(k, 3, 0) else {
        return TestResult::Fail;
    };

    for _ in 0..3 {
        crate::kcheck!(k.wait(s) == Err(KError::Interrupted), "(Wait) espera não bloqueou");
    }
    crate::kcheck!(k.scheduler().current_task() == d, "(Wait) D não assumiu");
    let Ok(object) = k.objects().resolve(s) else {
        return TestResult::Fail;
    };
    crate::kcheck!(object.wait_count() == 3, "(Wait) faltam waiters");

    crate::kcheck!(k.release(s, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A não foi o primeiro");
    crate::kcheck!(
        state_of(k, b) == Some(TaskState::Waiting) && state_of(k, c) == Some(TaskState::Waiting),
        "(Wait) acordou mais de um"
    );
    crate::kcheck!(object.wait_count() == 2, "(Wait) contador após wake(1)");

    crate::kcheck!(k.release(s, 3).is_ok(), "(Wait) release falhou");
    crate::kcheck!(
        state_of(k, b) == Some(TaskState::Runnable) && state_of(k, c) == Some(TaskState::Runnable),
        "(Wait) wake não esvaziou a lista"
    );
    crate::kcheck!(object.has_no_waiters(), "(Wait) cabeça não ficou nula");
    // Duas unidades foram para B e C; sobrou uma.
    crate::kcheck!(k.semaphore_state(s) == Ok((1, 3)), "(Wait) sobra do release errada");
    crate::kcheck!(
        k.scheduler().stats().snapshot().wakeups == 3,
        "(Wait) contador de wakeups errado"
    );
    TestResult::Pass
}

fn test_wait_any_cancels_rest() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(_b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let (Ok(s1), Ok(s2)) = (sem(k, 1, 0), sem(k, 1, 0)) else {
        return TestResult::Fail;
    };

    crate::kcheck!(
        k.wait_many(&[s1, s2], false) == Err(KError::Interrupted),
        "(Wait) wait_many não bloqueou"
    );
    crate::kcheck!(
        k.scheduler().task_info(a).map(|i| (i.wait_count, i.wait_all)) == Ok((2, false)),
        "(Wait) nós de A errados"
    );

    crate::kcheck!(k.release(s2, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A não acordou");
    crate::kcheck!(no_waiters(k, s1) && no_waiters(k, s2), "(Wait) espera restante não cancelada");
    crate::kcheck!(graph_len(k) == 0, "(Wait) nó vazou no grafo");
    crate::kcheck!(k.scheduler().finish_wait(a) == Ok(1), "(Wait) índice do objeto errado");
    TestResult::Pass
}

/// No modo "all", objetos já sinalizados são consumidos no registro.
fn test_wait_all_consumes_signalled() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(_b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let (Ok(s1), Ok(s2)) = (sem(k, 1, 1), sem(k, 1, 0)) else {
        return TestResult::Fail;
    };

    crate::kcheck!(
        k.wait_many(&[s1, s2], true) == Err(KError::Interrupted),
        "(Wait) wait_all não bloqueou"
    );
    crate::kcheck!(k.semaphore_state(s1) == Ok((0, 1)), "(Wait) s1 não foi consumido");
    crate::kcheck!(no_waiters(k, s1), "(Wait) nó criado para objeto sinalizado");
    crate::kcheck!(
        k.scheduler().task_info(a).map(|i| (i.wait_count, i.wait_all)) == Ok((1, true)),
        "(Wait) nós de A errados"
    );

    crate::kcheck!(k.release(s2, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A não acordou");
    crate::kcheck!(k.scheduler().finish_wait(a) == Ok(1), "(Wait) índice final errado");

    // Todos sinalizados: nem bloqueia, e o índice é o do último handle.
    let (Ok(s3), Ok(s4), Ok(s5)) = (sem(k, 1, 1), sem(k, 1, 1), sem(k, 1, 1)) else {
        return TestResult::Fail;
    };
    crate::kcheck!(k.wait_many(&[s3, s4, s5], true) == Ok(2), "(Wait) fast path do modo all");
    crate::kcheck!(
        [s3, s4, s5].iter().all(|&s| k.semaphore_state(s) == Ok((0, 1))),
        "(Wait) fast path não consumiu tudo"
    );
    TestResult::Pass
}

fn test_wait_all_reports_last() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(_b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let (Ok(s1), Ok(s2)) = (sem(k, 1, 0), sem(k, 1, 0)) else {
        return TestResult::Fail;
    };

    crate::kcheck!(
        k.wait_many(&[s1, s2], true) == Err(KError::Interrupted),
        "(Wait) wait_all não bloqueou"
    );

    crate::kcheck!(k.release(s2, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Waiting), "(Wait) A acordou cedo");
    crate::kcheck!(k.semaphore_state(s2) == Ok((0, 1)), "(Wait) unidade de s2 não foi para A");
    crate::kcheck!(
        k.scheduler().task_info(a).map(|i| i.wait_count) == Ok(1),
        "(Wait) nó de s2 não saiu"
    );

    crate::kcheck!(k.release(s1, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A não acordou");
    crate::kcheck!(k.scheduler().finish_wait(a) == Ok(0), "(Wait) índice do último errado");
    TestResult::Pass
}

fn test_wait_many_validation() -> TestResult {
    let k = sim_kernel(small_config());
    let Ok(s) = sem(k, 1, 1) else {
        return TestResult::Fail;
    };
    let Ok(dup) = k.duplicate(s, OpenFlags::empty()) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.wait_many(&[], false) == Err(KError::InvalidArgument), "(Wait) lista vazia");
    crate::kcheck!(
        k.wait_many(&[s; crate::config::MAX_WAIT_OBJECTS + 1], false) == Err(KError::InvalidArgument),
        "(Wait) lista longa demais"
    );
    crate::kcheck!(
        k.wait_many(&[s, dup], false) == Err(KError::InvalidArgument),
        "(Wait) objeto repetido aceito"
    );
    crate::kcheck!(
        k.wait_many(&[s, Handle(7)], false) == Err(KError::InvalidHandle),
        "(Wait) handle livre aceito"
    );
    crate::kcheck!(k.semaphore_state(s) == Ok((1, 1)), "(Wait) validação consumiu o sinal");
    TestResult::Pass
}

fn test_close_abandons_waiters() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let Ok(s) = sem(k, 1, 0) else {
        return TestResult::Fail;
    };
    crate::kcheck!(k.wait(s) == Err(KError::Interrupted), "(Wait) A não bloqueou");
    crate::kcheck!(k.scheduler().current_task() == b, "(Wait) B não assumiu");

    crate::kcheck!(k.close(s).is_ok(), "(Wait) close falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A ficou preso");
    crate::kcheck!(
        k.scheduler().finish_wait(a) == Err(KError::WaitAbandoned),
        "(Wait) A não recebeu WaitAbandoned"
    );
    crate::kcheck!(graph_len(k) == 0, "(Wait) nó vazou no grafo");
    TestResult::Pass
}

fn test_close_abandons_wait_all() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(_b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let (Ok(s1), Ok(s2)) = (sem(k, 1, 0), sem(k, 1, 0)) else {
        return TestResult::Fail;
    };
    crate::kcheck!(
        k.wait_many(&[s1, s2], true) == Err(KError::Interrupted),
        "(Wait) wait_all não bloqueou"
    );

    crate::kcheck!(k.close(s1).is_ok(), "(Wait) close falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A ficou preso");
    crate::kcheck!(no_waiters(k, s2), "(Wait) espera em s2 não foi cancelada");
    crate::kcheck!(
        k.scheduler().finish_wait(a) == Err(KError::WaitAbandoned),
        "(Wait) A não recebeu WaitAbandoned"
    );
    TestResult::Pass
}

/// A unidade que uma espera "all" já tirou de s1 não volta quando s2 é
/// desmontado.
fn test_wait_all_abandon_keeps_taken_unit() -> TestResult {
    let k = sim_kernel(small_config());
    let (Some(a), Some(_b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let (Ok(s1), Ok(s2)) = (sem(k, 1, 0), sem(k, 1, 0)) else {
        return TestResult::Fail;
    };
    crate::kcheck!(
        k.wait_many(&[s1, s2], true) == Err(KError::Interrupted),
        "(Wait) wait_all não bloqueou"
    );

    crate::kcheck!(k.release(s1, 1).is_ok(), "(Wait) release falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Waiting), "(Wait) A acordou cedo");
    crate::kcheck!(k.semaphore_state(s1) == Ok((0, 1)), "(Wait) unidade de s1 não foi para A");

    crate::kcheck!(k.close(s2).is_ok(), "(Wait) close falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Wait) A ficou preso");
    crate::kcheck!(
        k.scheduler().finish_wait(a) == Err(KError::WaitAbandoned),
        "(Wait) A não recebeu WaitAbandoned"
    );
    crate::kcheck!(k.semaphore_state(s1) == Ok((0, 1)), "(Wait) unidade de s1 devolvida");
    crate::kcheck!(graph_len(k) == 0, "(Wait) nó vazou no grafo");
    TestResult::Pass
}

/// Sem nós suficientes a espera falha inteira e nada muda.
fn test_wait_node_exhaustion() -> TestResult {
    let config = KernelConfig {
        max_wait_nodes: 2,
        ..small_config()
    };
    let k = sim_kernel(config);
    let (Some(a), Some(_b)) = (spawn(k, "A"), spawn(k, "B")) else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let (Ok(s1), Ok(s2), Ok(s3)) = (sem(k, 1, 0), sem(k, 1, 0), sem(k, 1, 0)) else {
        return TestResult::Fail;
    };

    crate::kcheck!(
        k.wait_many(&[s1, s2, s3], false) == Err(KError::OutOfMemory),
        "(Wait) arena cheia não recusou"
    );
    crate::kcheck!(state_of(k, a) == Some(TaskState::Running), "(Wait) A mudou de estado");
    crate::kcheck!(k.scheduler().current_task() == a, "(Wait) falha trocou de task");
    crate::kcheck!(
        no_waiters(k, s1) && no_waiters(k, s2) && no_waiters(k, s3),
        "(Wait) falha deixou nós"
    );
    crate::kcheck!(graph_len(k) == 0, "(Wait) grafo mudou");

    crate::kcheck!(
        k.wait_many(&[s1, s2], false) == Err(KError::Interrupted),
        "(Wait) espera que cabe falhou"
    );
    crate::kcheck!(graph_len(k) == 2, "(Wait) nós não registrados");
    TestResult::Pass
}

fn test_event_manual_wakes_all() -> TestResult {
    let k = sim_kernel(small_config());
    let tids = [spawn(k, "A"), spawn(k, "B"), spawn(k, "C")];
    let [Some(a), Some(b), Some(c)] = tids else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let Ok((ev, _)) = k.open_event(None, OpenFlags::empty(), true, false) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.wait(ev) == Err(KError::Interrupted), "(Event) A não bloqueou");
    crate::kcheck!(k.wait(ev) == Err(KError::Interrupted), "(Event) B não bloqueou");
    crate::kcheck!(k.scheduler().current_task() == c, "(Event) C não assumiu");

    crate::kcheck!(k.set_event(ev).is_ok(), "(Event) set falhou");
    crate::kcheck!(
        state_of(k, a) == Some(TaskState::Runnable) && state_of(k, b) == Some(TaskState::Runnable),
        "(Event) manual não acordou todos"
    );
    crate::kcheck!(k.wait(ev).is_ok(), "(Event) manual não ficou setado");
    TestResult::Pass
}

fn test_event_auto_wakes_one() -> TestResult {
    let k = sim_kernel(small_config());
    let tids = [spawn(k, "A"), spawn(k, "B"), spawn(k, "C")];
    let [Some(a), Some(b), Some(_c)] = tids else {
        return TestResult::Fail;
    };
    k.scheduler().yield_now();
    let Ok((ev, _)) = k.open_event(None, OpenFlags::empty(), false, false) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.wait(ev) == Err(KError::Interrupted), "(Event) A não bloqueou");
    crate::kcheck!(k.wait(ev) == Err(KError::Interrupted), "(Event) B não bloqueou");

    crate::kcheck!(k.set_event(ev).is_ok(), "(Event) set falhou");
    crate::kcheck!(state_of(k, a) == Some(TaskState::Runnable), "(Event) A não acordou");
    crate::kcheck!(state_of(k, b) == Some(TaskState::Waiting), "(Event) auto acordou dois");
    let Ok(object) = k.objects().resolve(ev) else {
        return TestResult::Fail;
    };
    crate::kcheck!(
        object.lock().map(|v| v.is_signalled()) == Ok(false),
        "(Event) auto ficou setado após acordar"
    );
    TestResult::Pass
}

#[cfg(test)]
mod tests {
    use super::WAIT_TESTS;
    use crate::klib::test_framework::run_test_suite;

    #[test]
    fn wait_suite_passes() {
        let report = run_test_suite("wait", WAIT_TESTS);
        assert!(report.is_ok(), "falhas: {:?}", report.failures);
    }
}
