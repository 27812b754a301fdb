pub mod dates;
pub mod parser;

pub use dates::DueMoment;
pub use parser::{ParsedTaskInput, parse_task_input};
