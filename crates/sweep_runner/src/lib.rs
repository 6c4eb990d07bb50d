mod aggregate;
mod context;
mod dispatch;
mod engine;

pub use aggregate::aggregate;
pub use context::{ConfigurationError, DEFAULT_RUNNER_BINARY, RunContext};
pub use dispatch::{Invocation, RunOutcome, TestUnit, dispatch};
pub use engine::{EngineOutcome, SuiteEngine, TestEngine};
