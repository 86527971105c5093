//! # Orquestrador de Agendamento
//!
//! Round-robin preemptivo, single-core.
//!
//! ## Mecanismos de Execução:
//! - **Preemptivo:** `tick()` é chamado a cada interrupção do timer (já
//!   reconhecida no controlador). Enquanto a task corrente tem quantum, só
//!   decrementa; quando expira, recarrega e escolhe a próxima.
//! - **Cooperativo:** `yield_now()`, `wait` sem sinal e `exit_current()`.
//!
//! ## Escolha da próxima task
//! Percorre o anel a partir da corrente procurando uma RUNNABLE, pulando a
//! idle. Se não achar: continua na corrente se ela ainda é RUNNABLE, senão
//! cai para a idle.
//!
//! ## Sincronização:
//! Um único lock (`rq`) protege tasks, anel e grafo de espera. A troca de
//! contexto acontece com ele preso; a task retomada é quem solta (ou, numa
//! task nova, o bootstrap força o unlock).

use super::entry::task_bootstrap;
use super::runqueue::RunQueue;
use super::task::{Task, TaskEntry, TaskInfo, TaskState, TaskStats};
use crate::arch::{BootstrapFrame, ContextOps};
use crate::config::{KernelConfig, MAX_QUANTUM};
use crate::debug::KernelStats;
use crate::sync::{irq, Spinlock, SpinlockGuard};
use crate::sys::{KError, KResult, Tid};

pub struct Scheduler<P: ContextOps> {
    pub(crate) arch: P,
    pub(crate) rq: Spinlock<RunQueue<P::Context>>,
    pub(crate) stats: KernelStats,
    config: KernelConfig,
}

impl<P: ContextOps> Scheduler<P> {
    /// Converte a thread em execução na task 0 ("[idle]").
    pub fn new(arch: P, config: KernelConfig) -> Self {
        let boot = Task::boot("[idle]", arch.address_space(), config.idle_quantum);
        let rq = RunQueue::new(boot, config.max_tasks.max(1), config.max_wait_nodes);
        crate::kinfo!("(Sched) Scheduler inicializado; boot thread virou idle");
        Self {
            arch,
            rq: Spinlock::new(rq),
            stats: KernelStats::new(),
            config,
        }
    }

    pub fn arch(&self) -> &P {
        &self.arch
    }

    pub fn stats(&self) -> &KernelStats {
        &self.stats
    }

    /// Cria uma task e a coloca no fim do anel.
    ///
    /// A primeira retomada entra em `task_bootstrap`, que solta o lock da fila
    /// herdado do scheduler e chama `entry(arg)`.
    pub fn create(
        &'static self,
        entry: TaskEntry,
        arg: usize,
        name: &str,
        initial: TaskState,
    ) -> KResult<Tid> {
        if !matches!(initial, TaskState::Runnable | TaskState::Paused) {
            return Err(KError::InvalidArgument);
        }

        let mut task = Task::new(
            name,
            entry,
            arg,
            self.config.stack_size,
            self.arch.address_space(),
            self.config.default_quantum,
        )?;
        task.state = initial;

        let mut rq = self.rq.lock();
        if rq.is_full() {
            crate::kwarn!("(Sched) limite de tasks atingido");
            return Err(KError::OutOfMemory);
        }
        let id = rq.gen_id();
        task.id = id;

        let boot = BootstrapFrame {
            func: task_bootstrap::<P>,
            arg0: self as *const Self as usize,
            arg1: id.as_u32() as usize,
        };
        let stack_top = task.stack_top();
        self.arch.prepare(&mut task.context, stack_top, boot);
        rq.push(task)?;
        drop(rq);

        self.stats.inc_tasks_spawned();
        crate::kinfo!("(Sched) task criada, tid=", id.as_u32());
        Ok(id)
    }

    /// Tick do timer.
    pub fn tick(&self) {
        self.stats.inc_ticks();

        let mut rq = self.rq.lock();
        let current = rq.current_mut();
        if current.state.is_runnable() {
            if current.accounting.ticks_left > 0 {
                current.accounting.ticks_left -= 1;
                return;
            }
            current.accounting.reset_quantum();
        }
        self.switch_locked(rq, false);
    }

    /// Cede a CPU independentemente do quantum restante.
    pub fn yield_now(&self) {
        let mut rq = self.rq.lock();
        rq.current_mut().accounting.reset_quantum();
        self.switch_locked(rq, true);
    }

    /// Escolhe a próxima task e troca para ela (ou não troca).
    pub(crate) fn reschedule(&self) {
        let rq = self.rq.lock();
        self.switch_locked(rq, true);
    }

    /// Núcleo do escalonador. A troca de contexto é o último passo.
    pub(crate) fn switch_locked(
        &self,
        mut rq: SpinlockGuard<'_, RunQueue<P::Context>>,
        voluntary: bool,
    ) {
        crate::kassert!(
            irq::depth() == 1,
            "(Sched) troca de contexto com outros locks presos"
        );

        let prev = rq.current;
        if rq.task(prev).state == TaskState::Running {
            rq.task_mut(prev).state = TaskState::Runnable;
        }

        let next = match rq.pick_next() {
            Some(key) => key,
            None if rq.task(prev).state == TaskState::Runnable => {
                rq.task_mut(prev).state = TaskState::Running;
                return;
            }
            None => rq.idle,
        };

        rq.task_mut(next).state = TaskState::Running;
        if next == prev {
            return;
        }

        // Só troca de CR3 se for outro espaço (evita flush de TLB à toa).
        let target = rq.task(next).address_space;
        if self.arch.address_space() != target {
            unsafe { self.arch.load_address_space(target) };
            self.stats.inc_address_space_loads();
        }

        rq.task_mut(prev).accounting.account_switch(voluntary);
        rq.current = next;
        let next_id = rq.task(next).id;
        crate::debug::fatal::note_current(next_id.as_u32());
        self.stats.inc_context_switches();
        crate::ktrace!("(Sched) troca para tid=", next_id.as_u32());

        let old = &mut rq.task_mut(prev).context as *mut P::Context;
        let new = &rq.task(next).context as *const P::Context;
        // SAFETY: lock da fila preso (interrupções desligadas); os contextos
        // vivem na arena até a task ser reaped, o que nunca acontece com a
        // corrente.
        unsafe { self.arch.switch(old, new) };

        drop(rq);
    }

    /// Só RUNNABLE <-> PAUSED e RUNNING -> PAUSED.
    ///
    /// Pausar a própria task cede a CPU na hora.
    pub fn set_state(&self, id: Tid, state: TaskState) -> KResult<()> {
        let mut rq = self.rq.lock();
        let key = rq.find(id).ok_or(KError::NotFound)?;
        if key == rq.idle {
            return Err(KError::InvalidArgument);
        }

        let task = rq.task_mut(key);
        if !task.state.can_set(state) {
            crate::kdebug!("(Sched) transição de estado recusada, tid=", id.as_u32());
            return Err(KError::InvalidArgument);
        }
        task.state = state;

        if key == rq.current && state == TaskState::Paused {
            self.switch_locked(rq, true);
        }
        Ok(())
    }

    /// Troca o quantum de recarga de uma task.
    pub fn set_quantum(&self, id: Tid, ticks: u32) -> KResult<()> {
        if ticks > MAX_QUANTUM {
            return Err(KError::InvalidArgument);
        }
        let mut rq = self.rq.lock();
        let key = rq.find(id).ok_or(KError::NotFound)?;
        rq.task_mut(key).accounting.set_quantum(ticks);
        Ok(())
    }

    /// Total de tasks e contagem por estado.
    pub fn get_stats(&self) -> TaskStats {
        let rq = self.rq.lock();
        let mut stats = TaskStats::default();
        for (_, task) in rq.iter() {
            stats.total += 1;
            stats.by_state[task.state.index()] += 1;
        }
        stats
    }

    pub fn task_info(&self, id: Tid) -> KResult<TaskInfo> {
        let rq = self.rq.lock();
        let key = rq.find(id).ok_or(KError::NotFound)?;
        Ok(rq.task(key).info())
    }

    pub fn current_task(&self) -> Tid {
        self.rq.lock().current().id
    }

    /// Ticks desde a inicialização.
    pub fn now(&self) -> u64 {
        self.stats.now()
    }

    /// Lista as tasks no log.
    pub fn dump_tasks(&self) {
        let rq = self.rq.lock();
        crate::kinfo!("--- Tasks ---");
        for (key, task) in rq.iter() {
            crate::kinfo!("(Sched) tid=", task.id.as_u32());
            crate::kinfo!(task.name());
            crate::kinfo!(task.state.name());
            if key == rq.current {
                crate::kinfo!("(Sched) ^ corrente");
            }
        }
        crate::kinfo!("-------------");
    }

    /// Ponto de entrada e argumento (usado pelo bootstrap).
    pub(crate) fn entry_of(&self, id: Tid) -> Option<(TaskEntry, usize)> {
        let rq = self.rq.lock();
        let key = rq.find(id)?;
        let task = rq.task(key);
        task.entry.map(|entry| (entry, task.arg))
    }
}
