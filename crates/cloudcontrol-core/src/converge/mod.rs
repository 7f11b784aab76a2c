// Convergence: waiting for asynchronous provider work to settle.

pub mod engine;
pub mod policy;
pub mod sleeper;

pub use engine::{PollState, Poller, Stateful, WaitTarget};
pub use policy::{FailureStatePolicy, POWER_POLL_CAP, PRE_DELETE_POLL_CAP, WaitPolicy};
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper};
