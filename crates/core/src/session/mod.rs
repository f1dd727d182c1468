pub mod machine;
pub mod states;

pub use machine::{Prompt, SessionMachine, StepOutcome};
pub use states::{SessionState, Stage};
