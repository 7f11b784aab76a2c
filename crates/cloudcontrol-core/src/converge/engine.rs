// ── Poll engine ──
//
// Re-resolves an entity at a fixed cadence until a predicate holds, the
// budget runs out, or the cancellation token fires. Each round is:
// resolve, evaluate, then converge, sleep one interval, or time out. The
// budget is the sum of sleeps, so a run makes at most
// `max_wait / poll_interval + 1` resolve calls and never sleeps after the
// last one.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use cloudcontrol_api::caas::models::ResourceState;

use super::policy::{FailureStatePolicy, WaitPolicy};
use super::sleeper::{Sleeper, TokioSleeper};
use crate::error::CoreError;

/// An entity with a provider lifecycle state.
pub trait Stateful {
    fn state(&self) -> &ResourceState;
}

/// Engine state between rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState<T> {
    Polling { attempt: u32 },
    Converged(T),
    TimedOut,
}

/// What the engine is waiting on, for logs and errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitTarget {
    pub entity_type: &'static str,
    pub identifier: String,
}

impl WaitTarget {
    pub fn new(entity_type: &'static str, identifier: impl Into<String>) -> Self {
        Self {
            entity_type,
            identifier: identifier.into(),
        }
    }
}

enum Step<T> {
    Done(T),
    Pending(ResourceState),
}

/// Drives waits with an injected sleeper and a cancellation token.
#[derive(Debug, Clone)]
pub struct Poller {
    sleeper: Arc<dyn Sleeper>,
    cancel: CancellationToken,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(Arc::new(TokioSleeper), CancellationToken::new())
    }
}

impl Poller {
    pub fn new(sleeper: Arc<dyn Sleeper>, cancel: CancellationToken) -> Self {
        Self { sleeper, cancel }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn sleeper(&self) -> Arc<dyn Sleeper> {
        Arc::clone(&self.sleeper)
    }

    /// Poll `resolve` until `predicate` holds for the resolved entity.
    ///
    /// The entity disappearing mid-wait ends the wait with `NotFound`.
    pub async fn wait_until<T, R, Fut, P>(
        &self,
        target: &WaitTarget,
        policy: &WaitPolicy,
        resolve: R,
        predicate: P,
    ) -> Result<T, CoreError>
    where
        T: Stateful,
        R: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, CoreError>>,
        P: Fn(&T) -> bool,
    {
        self.drive(target, policy, resolve, |observed: Option<T>| match observed {
            Some(entity) if predicate(&entity) => Ok(Step::Done(entity)),
            Some(entity) => Ok(Step::Pending(entity.state().clone())),
            None => Err(CoreError::not_found(
                target.entity_type,
                target.identifier.clone(),
            )),
        })
        .await
    }

    /// Poll `resolve` until the entity is gone; absence is success.
    pub async fn wait_until_absent<T, R, Fut>(
        &self,
        target: &WaitTarget,
        policy: &WaitPolicy,
        resolve: R,
    ) -> Result<(), CoreError>
    where
        T: Stateful,
        R: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, CoreError>>,
    {
        self.drive(target, policy, resolve, |observed: Option<T>| {
            Ok(match observed {
                None => Step::Done(()),
                Some(entity) => Step::Pending(entity.state().clone()),
            })
        })
        .await
    }

    async fn drive<O, T, R, Fut, E>(
        &self,
        target: &WaitTarget,
        policy: &WaitPolicy,
        mut resolve: R,
        mut evaluate: E,
    ) -> Result<T, CoreError>
    where
        R: FnMut() -> Fut,
        Fut: Future<Output = Result<O, CoreError>>,
        E: FnMut(O) -> Result<Step<T>, CoreError>,
    {
        policy.validate()?;
        let mut waited = Duration::ZERO;
        let mut last_state = String::from("unknown");
        let mut state = PollState::Polling { attempt: 1 };

        loop {
            state = match state {
                PollState::Polling { attempt } => {
                    if self.cancel.is_cancelled() {
                        return Err(CoreError::Cancelled);
                    }
                    match evaluate(resolve().await?)? {
                        Step::Done(value) => PollState::Converged(value),
                        Step::Pending(observed) => {
                            trace!(
                                entity = target.entity_type,
                                id = %target.identifier,
                                attempt,
                                state = %observed,
                                "not converged"
                            );
                            if policy.on_failure_state == FailureStatePolicy::FailFast
                                && observed.is_failure()
                            {
                                return Err(CoreError::ConvergenceFailed {
                                    entity_type: target.entity_type.into(),
                                    identifier: target.identifier.clone(),
                                    state: observed.to_string(),
                                });
                            }
                            last_state = observed.to_string();

                            if waited + policy.poll_interval > policy.max_wait {
                                PollState::TimedOut
                            } else {
                                self.pause(policy.poll_interval).await?;
                                waited += policy.poll_interval;
                                PollState::Polling {
                                    attempt: attempt + 1,
                                }
                            }
                        }
                    }
                }
                PollState::Converged(value) => {
                    debug!(
                        entity = target.entity_type,
                        id = %target.identifier,
                        waited_secs = waited.as_secs(),
                        "converged"
                    );
                    return Ok(value);
                }
                PollState::TimedOut => {
                    return Err(CoreError::ConvergenceTimeout {
                        entity_type: target.entity_type.into(),
                        identifier: target.identifier.clone(),
                        waited_secs: waited.as_secs(),
                        last_state,
                    });
                }
            };
        }
    }

    async fn pause(&self, interval: Duration) -> Result<(), CoreError> {
        tokio::select! {
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            () = self.sleeper.sleep(interval) => Ok(()),
        }
    }
}
