/* -------- Public modules -------- */
pub mod common;
pub mod key;
pub mod timing;

/* -------- Harness -------- */
mod harness;
pub use harness::{Benchmark, Harness, HarnessState};

// Type aliases for convenience
pub type NativeHarness = Harness<key::Native>;
pub type CollidedHarness = Harness<key::Collided>;
pub type NormalHarness = Harness<key::Normal>;

/* -------- Orchestrator -------- */
mod orchestrator;
pub use orchestrator::Orchestrator;

/* -------- Re-exports -------- */
pub use common::BenchConfig;
pub use key::{Collided, Key, KeyKind, KeyStrategy, Native, Normal};
pub use timing::{measure, Reporter, TimingRecord};

/* -------- Error type -------- */
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("cannot construct {kind} key from {field_value:?}: {reason}")]
    Construction {
        kind: KeyKind,
        field_value: String,
        reason: String,
    },
    #[error("{kind} map is already filled")]
    AlreadyFilled { kind: KeyKind },
    #[error("{kind} map has not been filled")]
    NotFilled { kind: KeyKind },
    #[error("fill of the {kind} map was interrupted")]
    InterruptedWait { kind: KeyKind },
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
