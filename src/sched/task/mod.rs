//! Task management module

pub mod accounting;
pub mod entity;
pub mod lifecycle;
pub mod state;

pub use crate::sys::Tid;
pub use accounting::Accounting;
pub use entity::{Task, TaskEntry, TaskInfo, TaskStats};
pub use state::TaskState;
