pub mod project;
pub mod recurrence;
pub mod task;
pub mod temporal;
pub mod validation;
