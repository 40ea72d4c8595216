use {
    derive_more::Display,
    heap::{AllocError, Allocator, IntBuffer},
    std::{io::Write, ops::ControlFlow},
};

#[derive(Debug, Display)]
pub enum StepError {
    #[display("`{_0}` needs a live buffer")]
    NoBuffer(&'static str),
    #[display("`allocate` while a buffer is already live")]
    AlreadyAllocated,
    #[display("square of index {_0} does not fit in an i32")]
    Overflow(usize),
}

impl std::error::Error for StepError {}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[display("success")]
    Success,
    #[display("allocation failed")]
    AllocationFailed,
}

impl Status {
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::AllocationFailed => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Allocate { len: usize, on_failure: String },
    FillSquares,
    PrintValues { label: String },
    Free,
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Print(_) => "print",
            Step::Allocate { .. } => "allocate",
            Step::FillSquares => "fill-squares",
            Step::PrintValues { .. } => "print-values",
            Step::Free => "free",
        }
    }

    fn execute(
        &self,
        state: &mut ProgramState,
        allocator: &dyn Allocator,
        stdout: &mut impl Write,
    ) -> anyhow::Result<ControlFlow<Status>> {
        match *self {
            Step::Print(ref text) => writeln!(stdout, "{text}")?,
            Step::Allocate {
                len,
                ref on_failure,
            } => {
                if state.buffer.is_some() {
                    anyhow::bail!(StepError::AlreadyAllocated);
                }
                match allocator.allocate(len) {
                    Ok(buffer) => state.buffer = Some(buffer),
                    Err(e) => {
                        state.alloc_error = Some(e);
                        writeln!(stdout, "{on_failure}")?;
                        return Ok(ControlFlow::Break(Status::AllocationFailed));
                    }
                }
            }
            Step::FillSquares => {
                let buffer = state.live_buffer(self)?;
                for (index, slot) in buffer.as_mut_slice().iter_mut().enumerate() {
                    *slot = i32::try_from(index)
                        .ok()
                        .and_then(|i| i.checked_mul(i))
                        .ok_or(StepError::Overflow(index))?;
                }
            }
            Step::PrintValues { ref label } => {
                let buffer = state.live_buffer(self)?;
                write!(stdout, "{label}")?;
                for value in &*buffer {
                    write!(stdout, "{value} ")?;
                }
                writeln!(stdout)?;
            }
            Step::Free => {
                let buffer = state
                    .buffer
                    .take()
                    .ok_or(StepError::NoBuffer(self.name()))?;
                state.release(buffer, allocator);
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            Step::Print(text) => write!(f, " {text:?}"),
            Step::Allocate { len, on_failure } => write!(f, " {len} else {on_failure:?}"),
            Step::PrintValues { label } => write!(f, " {label:?}"),
            Step::FillSquares | Step::Free => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub steps: Vec<Step>,
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "{index:>3}  {step}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ProgramState {
    buffer: Option<IntBuffer>,
    released: Option<Vec<i32>>,
    alloc_error: Option<AllocError>,
}

impl ProgramState {
    fn live_buffer(&mut self, step: &Step) -> Result<&mut IntBuffer, StepError> {
        self.buffer.as_mut().ok_or(StepError::NoBuffer(step.name()))
    }

    fn release(&mut self, buffer: IntBuffer, allocator: &dyn Allocator) {
        self.released = Some(allocator.release(buffer));
    }
}

pub trait Execute {
    fn execute(
        &self,
        allocator: &dyn Allocator,
        stdout: &mut impl Write,
    ) -> anyhow::Result<FinalState>;
}

impl Execute for Program {
    fn execute(
        &self,
        allocator: &dyn Allocator,
        stdout: &mut impl Write,
    ) -> anyhow::Result<FinalState> {
        let mut state = ProgramState::default();
        let mut status = Status::Success;
        for step in &self.steps {
            match step.execute(&mut state, allocator, stdout) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(halted)) => {
                    status = halted;
                    break;
                }
                Err(e) => {
                    if let Some(buffer) = state.buffer.take() {
                        state.release(buffer, allocator);
                    }
                    return Err(e);
                }
            }
        }
        // a program that never frees still gives its buffer back
        if let Some(buffer) = state.buffer.take() {
            state.release(buffer, allocator);
        }
        stdout.flush()?;
        Ok(FinalState {
            status,
            released: state.released,
            alloc_error: state.alloc_error,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalState {
    pub status: Status,
    /// Buffer contents at the moment of release, if one was allocated.
    pub released: Option<Vec<i32>>,
    /// Why the program halted, when an allocation failed.
    pub alloc_error: Option<AllocError>,
}

impl std::fmt::Display for FinalState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "status: {} (exit code {})",
            self.status,
            self.status.exit_code()
        )?;
        match &self.released {
            Some(values) => write!(f, "released: {values:?}")?,
            None => write!(f, "released: none")?,
        }
        if let Some(e) = &self.alloc_error {
            write!(f, "\nerror: {e}")?;
        }
        Ok(())
    }
}
