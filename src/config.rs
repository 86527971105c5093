//! Constantes de configuração do núcleo

/// Quantum padrão (Timeslice) em ticks do timer
pub const DEFAULT_QUANTUM: u32 = 100;

/// Maior quantum aceito por `set_quantum`
pub const MAX_QUANTUM: u32 = 100;

/// Quantum da task idle: ela cede a CPU no primeiro tick possível
pub const IDLE_QUANTUM: u32 = 1;

/// Tamanho da Stack de Kernel de cada task (em bytes)
pub const TASK_STACK_SIZE: usize = 4096;

/// Slots da tabela de handles (capacidade fixa, sem crescimento)
pub const HANDLE_TABLE_CAPACITY: usize = 4096;

/// Máximo de tasks vivas (incluindo idle e zombies)
pub const MAX_TASKS: usize = 256;

/// Máximo de nós de espera simultâneos no grafo
pub const MAX_WAIT_NODES: usize = 1024;

/// Máximo de handles em uma única chamada a `wait_many`
pub const MAX_WAIT_OBJECTS: usize = 16;

/// Tamanho do buffer de nome de task
pub const TASK_NAME_LEN: usize = 32;

/// Configuração fixada na construção do `Kernel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    pub default_quantum: u32,
    pub idle_quantum: u32,
    pub stack_size: usize,
    pub handle_capacity: usize,
    pub max_tasks: usize,
    pub max_wait_nodes: usize,
}

impl KernelConfig {
    pub const fn new() -> Self {
        Self {
            default_quantum: DEFAULT_QUANTUM,
            idle_quantum: IDLE_QUANTUM,
            stack_size: TASK_STACK_SIZE,
            handle_capacity: HANDLE_TABLE_CAPACITY,
            max_tasks: MAX_TASKS,
            max_wait_nodes: MAX_WAIT_NODES,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new()
    }
}
