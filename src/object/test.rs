//! Testes do modelo de objetos (handles, semáforo, evento)
//!
//! Todos rodam na thread de boot (idle), então nenhum caso aqui bloqueia:
//! esperas sem sinal a partir da idle são recusadas.

use crate::klib::test_framework::{sim_kernel, small_config, TestCase, TestResult};
use crate::object::{Disposition, Handle, ObjectType, OpenFlags};
use crate::sys::{KError, Tid};

/// Testes de objetos
pub const OBJECT_TESTS: &[TestCase] = &[
    TestCase::new("handle_lifo_reuse", test_handle_lifo_reuse),
    TestCase::new("handle_exhaustion", test_handle_exhaustion),
    TestCase::new("open_dispositions", test_open_dispositions),
    TestCase::new("names_are_per_type", test_names_are_per_type),
    TestCase::new("close_last_handle_tears_down", test_close_last_handle),
    TestCase::new("semaphore_bounds", test_semaphore_bounds),
    TestCase::new("semaphore_fast_path", test_semaphore_fast_path),
    TestCase::new("event_auto_reset", test_event_auto_reset),
    TestCase::new("event_manual_reset", test_event_manual_reset),
    TestCase::new("post_and_object_type", test_post_and_object_type),
    TestCase::new("hnode_owner_and_cursor", test_hnode_owner_and_cursor),
];

fn anon_sem(k: &crate::Kernel<crate::arch::sim::SimContext>) -> Result<Handle, KError> {
    k.open_semaphore(None, OpenFlags::empty(), 4, 0).map(|(h, _)| h)
}

/// Handle recém-fechado é o próximo a ser entregue.
fn test_handle_lifo_reuse() -> TestResult {
    let k = sim_kernel(small_config());
    let (Ok(a), Ok(b)) = (anon_sem(k), anon_sem(k)) else {
        return TestResult::Fail;
    };
    crate::kcheck!(a != b, "(Handle) dois opens devolveram o mesmo handle");

    crate::kcheck!(k.close(a).is_ok(), "(Handle) close falhou");
    let c = anon_sem(k);
    crate::kcheck!(c == Ok(a), "(Handle) slot liberado não foi reutilizado");

    crate::kcheck!(k.close(b).is_ok(), "(Handle) close falhou");
    crate::kcheck!(k.close(b) == Err(KError::InvalidHandle), "(Handle) close duplo aceito");
    crate::kcheck!(
        k.close(Handle::INVALID) == Err(KError::InvalidHandle),
        "(Handle) handle fora da tabela aceito"
    );
    TestResult::Pass
}

fn test_handle_exhaustion() -> TestResult {
    let config = small_config();
    let k = sim_kernel(config);

    let mut last = Handle::INVALID;
    for _ in 0..config.handle_capacity {
        match anon_sem(k) {
            Ok(h) => last = h,
            Err(_) => return TestResult::Fail,
        }
    }
    crate::kcheck!(
        anon_sem(k) == Err(KError::OutOfHandles),
        "(Handle) tabela cheia não recusou"
    );
    crate::kcheck!(k.handle_count() == config.handle_capacity, "(Handle) contagem errada");

    crate::kcheck!(k.close(last).is_ok(), "(Handle) close falhou");
    crate::kcheck!(anon_sem(k) == Ok(last), "(Handle) slot não voltou à lista");
    TestResult::Pass
}

fn test_open_dispositions() -> TestResult {
    let k = sim_kernel(small_config());

    let Ok((h1, d1)) = k.open_semaphore(Some("x"), OpenFlags::CREATE_NEW, 4, 1) else {
        return TestResult::Fail;
    };
    crate::kcheck!(d1 == Disposition::Created, "(Object) CREATE_NEW não criou");

    let Ok((h2, d2)) = k.open_semaphore(Some("x"), OpenFlags::empty(), 4, 0) else {
        return TestResult::Fail;
    };
    crate::kcheck!(d2 == Disposition::Joined, "(Object) open não entrou no existente");
    crate::kcheck!(h1 != h2, "(Object) join devolveu o mesmo handle");

    let (Ok(o1), Ok(o2)) = (k.objects().resolve(h1), k.objects().resolve(h2)) else {
        return TestResult::Fail;
    };
    crate::kcheck!(o1.koid() == o2.koid(), "(Object) join apontou para outro objeto");
    crate::kcheck!(o1.ref_count() == 2, "(Object) refcount após join");
    // Parâmetros do join não mexem no contador.
    crate::kcheck!(k.semaphore_state(h2) == Ok((1, 4)), "(Sem) join alterou o objeto");

    crate::kcheck!(
        k.open_semaphore(Some("x"), OpenFlags::CREATE_NEW, 4, 0).map(|(_, d)| d)
            == Err(KError::AlreadyExists),
        "(Object) CREATE_NEW aceitou nome existente"
    );
    crate::kcheck!(
        k.open_semaphore(Some("y"), OpenFlags::OPEN_EXISTING, 4, 0).map(|(_, d)| d)
            == Err(KError::NotFound),
        "(Object) OPEN_EXISTING criou objeto"
    );
    crate::kcheck!(
        k.open_semaphore(Some("x"), OpenFlags::DISPOSITION, 4, 0).map(|(_, d)| d)
            == Err(KError::InvalidArgument),
        "(Object) flags contraditórias aceitas"
    );
    crate::kcheck!(
        k.open_semaphore(Some(""), OpenFlags::empty(), 4, 0).map(|(_, d)| d)
            == Err(KError::InvalidArgument),
        "(Object) nome vazio aceito"
    );
    crate::kcheck!(
        k.open_existing("x", ObjectType::Semaphore).map(|(_, d)| d) == Ok(Disposition::Joined),
        "(Object) open_existing não achou o semáforo"
    );
    TestResult::Pass
}

fn test_names_are_per_type() -> TestResult {
    let k = sim_kernel(small_config());

    let sem = k.open_semaphore(Some("x"), OpenFlags::CREATE_NEW, 1, 0);
    let ev = k.open_event(Some("x"), OpenFlags::CREATE_NEW, false, false);
    let (Ok((hs, _)), Ok((he, de))) = (sem, ev) else {
        return TestResult::Fail;
    };
    crate::kcheck!(de == Disposition::Created, "(Object) evento colidiu com semáforo");
    crate::kcheck!(
        k.object_type(hs) == Ok(ObjectType::Semaphore) && k.object_type(he) == Ok(ObjectType::Event),
        "(Object) tipos trocados"
    );
    crate::kcheck!(
        k.open_existing("x", ObjectType::Event).map(|(_, d)| d) == Ok(Disposition::Joined),
        "(Object) lookup por nome ignorou o tipo"
    );
    TestResult::Pass
}

fn test_close_last_handle() -> TestResult {
    let k = sim_kernel(small_config());

    let Ok((h1, _)) = k.open_semaphore(Some("gone"), OpenFlags::CREATE_NEW, 2, 0) else {
        return TestResult::Fail;
    };
    let Ok(h2) = k.duplicate(h1, OpenFlags::SYNC) else {
        return TestResult::Fail;
    };
    let Ok(object) = k.objects().resolve(h1) else {
        return TestResult::Fail;
    };
    crate::kcheck!(object.ref_count() == 2, "(Object) duplicate não contou");

    crate::kcheck!(k.close(h1).is_ok(), "(Object) close falhou");
    crate::kcheck!(k.release(h2, 1).is_ok(), "(Object) objeto morreu com handle vivo");
    crate::kcheck!(object.ref_count() == 1, "(Object) close não descontou");

    crate::kcheck!(k.close(h2).is_ok(), "(Object) close falhou");
    crate::kcheck!(object.ref_count() == 0, "(Object) refcount após desmontagem");
    crate::kcheck!(object.lock().is_err(), "(Object) objeto desmontado ainda trava");
    crate::kcheck!(k.release(h2, 1) == Err(KError::InvalidHandle), "(Object) handle morto aceito");
    crate::kcheck!(
        k.open_existing("gone", ObjectType::Semaphore).map(|(_, d)| d) == Err(KError::NotFound),
        "(Object) nome sobreviveu à desmontagem"
    );
    TestResult::Pass
}

fn test_semaphore_bounds() -> TestResult {
    let k = sim_kernel(small_config());

    crate::kcheck!(
        k.open_semaphore(None, OpenFlags::empty(), 0, 0).map(|(_, d)| d)
            == Err(KError::InvalidArgument),
        "(Sem) max 0 aceito"
    );
    crate::kcheck!(
        k.open_semaphore(None, OpenFlags::empty(), 2, 3).map(|(_, d)| d)
            == Err(KError::InvalidArgument),
        "(Sem) initial > max aceito"
    );

    let Ok((h, _)) = k.open_semaphore(None, OpenFlags::empty(), 2, 1) else {
        return TestResult::Fail;
    };
    crate::kcheck!(k.release(h, 1).is_ok(), "(Sem) release dentro do limite recusado");
    crate::kcheck!(k.semaphore_state(h) == Ok((2, 2)), "(Sem) contador após release");
    crate::kcheck!(k.release(h, 1) == Err(KError::InvalidArgument), "(Sem) estouro aceito");
    crate::kcheck!(k.release(h, -1) == Err(KError::InvalidArgument), "(Sem) count negativo aceito");
    crate::kcheck!(k.release(h, 0).is_ok(), "(Sem) release de zero recusado");
    crate::kcheck!(k.semaphore_state(h) == Ok((2, 2)), "(Sem) erro alterou o contador");
    TestResult::Pass
}

/// Objeto sinalizado: a espera consome sem bloquear, mesmo na idle.
fn test_semaphore_fast_path() -> TestResult {
    let k = sim_kernel(small_config());
    let Ok((h, _)) = k.open_semaphore(None, OpenFlags::empty(), 2, 2) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.wait(h).is_ok(), "(Sem) fast path falhou");
    crate::kcheck!(k.wait(h).is_ok(), "(Sem) fast path falhou");
    crate::kcheck!(k.semaphore_state(h) == Ok((0, 2)), "(Sem) fast path não consumiu");
    crate::kcheck!(
        k.wait(h) == Err(KError::InvalidArgument),
        "(Sem) idle bloqueou em semáforo zerado"
    );
    crate::kcheck!(k.scheduler().stats().snapshot().context_switches == 0, "(Sem) fast path trocou de contexto");
    TestResult::Pass
}

fn test_event_auto_reset() -> TestResult {
    let k = sim_kernel(small_config());
    let Ok((h, _)) = k.open_event(None, OpenFlags::empty(), false, true) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.wait(h).is_ok(), "(Event) evento setado não satisfez");
    crate::kcheck!(k.wait(h) == Err(KError::InvalidArgument), "(Event) auto-reset não limpou");

    crate::kcheck!(k.set_event(h).is_ok(), "(Event) set falhou");
    crate::kcheck!(k.reset_event(h).is_ok(), "(Event) reset falhou");
    crate::kcheck!(k.wait(h) == Err(KError::InvalidArgument), "(Event) reset não limpou");

    crate::kcheck!(k.set_event(h).is_ok(), "(Event) set falhou");
    crate::kcheck!(k.wait(h).is_ok(), "(Event) set sem waiters não ficou setado");
    TestResult::Pass
}

fn test_event_manual_reset() -> TestResult {
    let k = sim_kernel(small_config());
    let Ok((h, _)) = k.open_event(None, OpenFlags::empty(), true, false) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.set_event(h).is_ok(), "(Event) set falhou");
    crate::kcheck!(k.wait(h).is_ok(), "(Event) manual não satisfez");
    crate::kcheck!(k.wait(h).is_ok(), "(Event) manual limpou na espera");
    crate::kcheck!(k.reset_event(h).is_ok(), "(Event) reset falhou");
    crate::kcheck!(k.wait(h) == Err(KError::InvalidArgument), "(Event) reset não limpou");
    TestResult::Pass
}

fn test_post_and_object_type() -> TestResult {
    let k = sim_kernel(small_config());
    let (Ok((sem, _)), Ok((ev, _))) = (
        k.open_semaphore(None, OpenFlags::empty(), 3, 0),
        k.open_event(None, OpenFlags::empty(), false, false),
    ) else {
        return TestResult::Fail;
    };

    crate::kcheck!(k.post(sem).is_ok(), "(Object) post em semáforo falhou");
    crate::kcheck!(k.semaphore_state(sem) == Ok((1, 3)), "(Object) post não liberou 1");
    crate::kcheck!(k.post(ev).is_ok(), "(Object) post em evento falhou");
    crate::kcheck!(k.wait(ev).is_ok(), "(Object) post não setou o evento");

    crate::kcheck!(
        k.semaphore_state(ev) == Err(KError::InvalidArgument),
        "(Object) semaphore_state aceitou evento"
    );
    crate::kcheck!(k.reset_event(sem) == Err(KError::InvalidArgument), "(Object) reset em semáforo");
    TestResult::Pass
}

fn test_hnode_owner_and_cursor() -> TestResult {
    let k = sim_kernel(small_config());
    let (Ok((user, _)), Ok((private, _))) = (
        k.open_semaphore(None, OpenFlags::READ | OpenFlags::CREATE_NEW, 1, 0),
        k.open_semaphore(None, OpenFlags::KERNEL, 1, 0),
    ) else {
        return TestResult::Fail;
    };

    let (Ok(hn_user), Ok(hn_private)) = (k.objects().hnode(user), k.objects().hnode(private)) else {
        return TestResult::Fail;
    };
    crate::kcheck!(hn_user.task() == Some(Tid::IDLE), "(Object) dono do handle errado");
    crate::kcheck!(hn_private.task().is_none(), "(Object) handle de kernel com dono");
    crate::kcheck!(hn_user.flags() == OpenFlags::READ, "(Object) flag de disposição gravada");

    crate::kcheck!(k.objects().seek(user, 42) == Ok(0), "(Object) seek devolveu cursor errado");
    crate::kcheck!(
        k.objects().hnode(user).map(|hn| hn.offset()) == Ok(42),
        "(Object) seek não gravou"
    );
    TestResult::Pass
}

#[cfg(test)]
mod tests {
    use super::OBJECT_TESTS;
    use crate::klib::test_framework::run_test_suite;

    #[test]
    fn object_suite_passes() {
        let report = run_test_suite("object", OBJECT_TESTS);
        assert!(report.is_ok(), "falhas: {:?}", report.failures);
    }
}
