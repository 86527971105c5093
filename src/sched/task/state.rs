//! Estados de task

/// Estado de uma task
///
/// ```text
/// RUNNABLE -> RUNNING -> (WAITING | RUNNABLE) -> ... -> ZOMBIE
/// RUNNABLE/RUNNING -> PAUSED -> RUNNABLE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskState {
    /// Pronta para executar
    Runnable = 0,
    /// Executando na CPU
    Running = 1,
    /// Bloqueada em um ou mais objetos
    Waiting = 2,
    /// Parada por pedido explícito
    Paused = 3,
    /// Entry retornou; aguardando o reaper
    Zombie = 4,
}

impl TaskState {
    pub const COUNT: usize = 5;

    /// Verifica se pode ser escalonada
    pub const fn is_runnable(self) -> bool {
        matches!(self, Self::Runnable | Self::Running)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            TaskState::Runnable => "RUNNABLE",
            TaskState::Running => "RUNNING",
            TaskState::Waiting => "WAITING",
            TaskState::Paused => "PAUSED",
            TaskState::Zombie => "ZOMBIE",
        }
    }

    /// Transições aceitas por `set_state`.
    pub const fn can_set(self, to: TaskState) -> bool {
        matches!(
            (self, to),
            (TaskState::Paused, TaskState::Runnable)
                | (TaskState::Runnable, TaskState::Paused)
                | (TaskState::Running, TaskState::Paused)
        )
    }
}
