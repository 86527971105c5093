//! Thread Control Block

use alloc::string::String;
use alloc::vec::Vec;

use super::accounting::Accounting;
use super::state::TaskState;
use crate::config::TASK_NAME_LEN;
use crate::sys::{AddressSpace, KError, KResult, Ring, Tid};
use crate::wait::WaitList;

/// Ponto de entrada de uma task: recebe o argumento, devolve o código de saída.
pub type TaskEntry = fn(usize) -> i32;

/// Thread Control Block
///
/// Não tem lock próprio: todo acesso passa pelo lock da fila de execução,
/// que já serializa qualquer mutação de task.
pub struct Task<C> {
    /// ID único
    pub(crate) id: Tid,
    /// Nome (debug)
    name: [u8; TASK_NAME_LEN],
    name_len: usize,
    /// Estado atual
    pub(crate) state: TaskState,
    pub(crate) ring: Ring,
    pub(crate) exit_code: i32,
    pub(crate) accounting: Accounting,
    pub(crate) entry: Option<TaskEntry>,
    pub(crate) arg: usize,
    /// Contexto de CPU salvo
    pub(crate) context: C,
    /// Stack de kernel (vazia para a thread de boot, que usa a stack do boot)
    stack: Vec<u8>,
    /// CR3 (raiz da tabela de páginas)
    pub(crate) address_space: AddressSpace,
    /// Objetos pelos quais a task espera
    pub(crate) waits: WaitList,
    /// Espera por todos (true) ou por qualquer um (false)
    pub(crate) wait_all: bool,
    /// Resultado entregue por quem acordou a task
    pub(crate) wait_result: Option<KResult<usize>>,
}

impl<C: Default> Task<C> {
    /// Cria uma task nova com stack própria.
    pub fn new(
        name: &str,
        entry: TaskEntry,
        arg: usize,
        stack_size: usize,
        address_space: AddressSpace,
        quantum: u32,
    ) -> KResult<Self> {
        let mut stack = Vec::new();
        stack
            .try_reserve_exact(stack_size)
            .map_err(|_| KError::OutOfMemory)?;
        stack.resize(stack_size, 0);

        let mut task = Self::bare(name, address_space, quantum);
        task.entry = Some(entry);
        task.arg = arg;
        task.stack = stack;
        Ok(task)
    }

    /// Converte a thread de boot (já em execução) na task idle.
    pub fn boot(name: &str, address_space: AddressSpace, quantum: u32) -> Self {
        let mut task = Self::bare(name, address_space, quantum);
        task.state = TaskState::Running;
        task
    }

    fn bare(name: &str, address_space: AddressSpace, quantum: u32) -> Self {
        // Preparar buffer de nome
        let mut name_buf = [0u8; TASK_NAME_LEN];
        let mut len = name.len().min(TASK_NAME_LEN - 1);
        while !name.is_char_boundary(len) {
            len -= 1;
        }
        name_buf[..len].copy_from_slice(&name.as_bytes()[..len]);

        Self {
            id: Tid::IDLE,
            name: name_buf,
            name_len: len,
            state: TaskState::Runnable,
            ring: Ring::Kernel,
            exit_code: 0,
            accounting: Accounting::new(quantum),
            entry: None,
            arg: 0,
            context: C::default(),
            stack: Vec::new(),
            address_space,
            waits: WaitList::new(),
            wait_all: false,
            wait_result: None,
        }
    }
}

impl<C> Task<C> {
    pub fn id(&self) -> Tid {
        self.id
    }

    pub fn name(&self) -> &str {
        core::str::from_utf8(&self.name[..self.name_len]).unwrap_or("?")
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Topo da stack de kernel (cresce para baixo).
    pub fn stack_top(&self) -> usize {
        self.stack.as_ptr() as usize + self.stack.len()
    }

    pub fn info(&self) -> TaskInfo {
        TaskInfo {
            id: self.id,
            name: String::from(self.name()),
            state: self.state,
            ring: self.ring,
            exit_code: self.exit_code,
            quantum: self.accounting.quantum,
            ticks_left: self.accounting.ticks_left,
            wait_count: self.waits.count(),
            wait_all: self.wait_all,
            last_wait_ticks: self.accounting.last_wait_ticks,
            voluntary_switches: self.accounting.voluntary_switches,
            involuntary_switches: self.accounting.involuntary_switches,
        }
    }
}

/// Retrato de uma task para inspeção.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub id: Tid,
    pub name: String,
    pub state: TaskState,
    pub ring: Ring,
    pub exit_code: i32,
    pub quantum: u32,
    pub ticks_left: u32,
    pub wait_count: u32,
    pub wait_all: bool,
    pub last_wait_ticks: u64,
    pub voluntary_switches: u64,
    pub involuntary_switches: u64,
}

/// Contagem de tasks por estado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: u32,
    pub by_state: [u32; TaskState::COUNT],
}

impl TaskStats {
    pub fn count(&self, state: TaskState) -> u32 {
        self.by_state[state.index()]
    }
}
