use crate::program::{Program, Step};

pub(crate) const GREETING: &str = "Hello, Fil-C World!";
pub(crate) const TAGLINE: &str = "This is a memory-safe C compiler!";
pub(crate) const ALLOC_FAILED: &str = "Memory allocation failed!";
pub(crate) const SQUARES_LABEL: &str = "Squares: ";
pub(crate) const FREED: &str = "Memory freed successfully!";

pub(crate) fn build(len: usize) -> Program {
    Program {
        steps: vec![
            Step::Print(GREETING.into()),
            Step::Print(TAGLINE.into()),
            Step::Allocate {
                len,
                on_failure: ALLOC_FAILED.into(),
            },
            Step::FillSquares,
            Step::PrintValues {
                label: SQUARES_LABEL.into(),
            },
            Step::Free,
            Step::Print(FREED.into()),
        ],
    }
}
