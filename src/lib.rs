pub mod config;
pub mod core;
pub mod input;
pub mod lifecycle;
pub mod store;

use std::sync::atomic::{AtomicBool, Ordering};

pub use self::core::recurrence::{format_recurrence, next_occurrence, parse_recurrence};
pub use input::parser::parse_task_input;
pub use lifecycle::complete_recurring_task;

/// Whether debug logging is active, shared between the logger filter and the config flag.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}
