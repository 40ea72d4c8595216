mod hello;
pub mod program;

pub use program::{Execute, FinalState, Program, Status, Step, StepError};

/// Number of integers the greeting program allocates.
pub const SQUARES_LEN: usize = 5;

impl Program {
    /// The greeting, allocate, fill, print, free smoke test.
    pub fn hello() -> Self {
        hello::build(SQUARES_LEN)
    }
}
