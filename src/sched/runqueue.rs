//! # Fila de Execução (RunQueue)
//!
//! Todas as tasks vivas (inclusive idle, waiting e zombies), em ordem de
//! criação, formando um anel. O scheduler percorre o anel a partir da task
//! corrente procurando a próxima RUNNABLE.
//!
//! Os registros moram numa arena (`Slab`) de capacidade fixa; o anel guarda
//! as chaves. O grafo de espera mora aqui também, protegido pelo mesmo lock.

use alloc::vec::Vec;
use slab::Slab;

use super::task::{Task, TaskState};
use crate::sys::{KError, KResult, Tid};
use crate::wait::WaitGraph;

pub struct RunQueue<C> {
    pub(crate) tasks: Slab<Task<C>>,
    /// Chaves em ordem de criação.
    ring: Vec<usize>,
    /// Chave da task em execução.
    pub(crate) current: usize,
    /// Chave da task idle.
    pub(crate) idle: usize,
    next_id: u32,
    capacity: usize,
    pub(crate) waits: WaitGraph,
}

impl<C> RunQueue<C> {
    /// Cria a fila já contendo a thread de boot como task 0.
    pub fn new(boot: Task<C>, capacity: usize, wait_nodes: usize) -> Self {
        let mut tasks = Slab::with_capacity(capacity);
        let mut ring = Vec::with_capacity(capacity);
        let idle = tasks.insert(boot);
        ring.push(idle);
        Self {
            tasks,
            ring,
            current: idle,
            idle,
            next_id: 1,
            capacity,
            waits: WaitGraph::with_capacity(wait_nodes),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    /// Próximo id livre: monotônico, pulando ids ainda em uso.
    pub fn gen_id(&mut self) -> Tid {
        loop {
            let id = Tid::new(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if self.find(id).is_none() {
                return id;
            }
        }
    }

    /// Coloca a task no fim do anel.
    pub fn push(&mut self, task: Task<C>) -> KResult<usize> {
        if self.is_full() {
            return Err(KError::OutOfMemory);
        }
        let key = self.tasks.insert(task);
        self.ring.push(key);
        Ok(key)
    }

    /// Retira a task da fila (o chamador garante que não é a corrente).
    pub fn remove(&mut self, key: usize) -> Option<Task<C>> {
        crate::kassert!(key != self.current, "(Sched) remoção da task corrente");
        let pos = self.ring.iter().position(|&k| k == key)?;
        self.ring.remove(pos);
        self.tasks.try_remove(key)
    }

    /// Busca linear por id.
    pub fn find(&self, id: Tid) -> Option<usize> {
        self.tasks
            .iter()
            .find(|(_, task)| task.id == id)
            .map(|(key, _)| key)
    }

    pub fn task(&self, key: usize) -> &Task<C> {
        match self.tasks.get(key) {
            Some(task) => task,
            None => crate::debug::fatal("(Sched) chave de task inválida", file!(), line!()),
        }
    }

    pub fn task_mut(&mut self, key: usize) -> &mut Task<C> {
        match self.tasks.get_mut(key) {
            Some(task) => task,
            None => crate::debug::fatal("(Sched) chave de task inválida", file!(), line!()),
        }
    }

    pub fn current(&self) -> &Task<C> {
        self.task(self.current)
    }

    pub fn current_mut(&mut self) -> &mut Task<C> {
        let key = self.current;
        self.task_mut(key)
    }

    /// Próxima task RUNNABLE depois da corrente, pulando idle. O(n).
    pub fn pick_next(&self) -> Option<usize> {
        let n = self.ring.len();
        let pos = self.ring.iter().position(|&k| k == self.current)?;
        (1..n)
            .map(|i| self.ring[(pos + i) % n])
            .find(|&key| key != self.idle && self.task(key).state == TaskState::Runnable)
    }

    /// Percorre as tasks em ordem de criação.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Task<C>)> {
        self.ring.iter().map(move |&key| (key, self.task(key)))
    }
}
