//! # Checklist Runtime
//!
//! Runtime implementation for the Checklist architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Observers**: Every reduced action is broadcast so views know when to refresh
//!
//! ## Dispatch Model
//!
//! A dispatch is atomic with respect to other dispatches: the Store reduces
//! the action, runs every effect it produced to completion, reduces any
//! actions those effects feed back, and only then accepts the next action.
//! Effects therefore observe and persist state in the exact order the
//! actions were sent.
//!
//! ## Example
//!
//! ```ignore
//! use checklist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use checklist_core::{effect::Effect, reducer::Reducer};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// A dispatch kept producing feedback actions past the configured limit
        ///
        /// The actions reduced so far are kept; the remaining queue is dropped.
        #[error("Dispatch exceeded {0} feedback actions")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use checklist_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_max_actions_per_dispatch(32);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for observers before slow ones start lagging
    pub broadcast_capacity: usize,
    /// Upper bound on actions reduced by one `send` (the action plus its feedback)
    pub max_actions_per_dispatch: usize,
}

impl StoreConfig {
    /// Set the observer broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the feedback bound for a single dispatch
    #[must_use]
    pub const fn with_max_actions_per_dispatch(mut self, max: usize) -> Self {
        self.max_actions_per_dispatch = max;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            max_actions_per_dispatch: 64,
        }
    }
}

/// Summary of a completed dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Actions reduced, including the one passed to `send`
    pub actions_reduced: usize,
    /// Effects returned by the reducer (excluding `Effect::None`)
    pub effects_executed: usize,
}

/// Execute an effect to completion and collect the actions it feeds back.
///
/// - `None`: No-op
/// - `Future`: Awaits the computation, yields its action if `Some`
/// - `Parallel`: Runs effects concurrently, actions in declaration order
/// - `Sequential`: Runs effects in order, waiting for each to complete
fn execute_effect<A>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                Vec::new()
            },
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                fut.await.into_iter().collect()
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                futures::future::join_all(effects.into_iter().map(execute_effect))
                    .await
                    .into_iter()
                    .flatten()
                    .collect()
            },
            Effect::Sequential(effects) => {
                tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                let mut produced = Vec::new();
                for effect in effects {
                    produced.extend(execute_effect(effect).await);
                }
                produced
            },
        }
    })
}

/// Store module - the runtime coordinator
pub mod store {
    use super::{Arc, DispatchReport, Reducer, RwLock, StoreConfig, StoreError, execute_effect};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::{Mutex, broadcast};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent reads)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Observers (action broadcast)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// Cloning a Store yields another handle to the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        /// Serializes whole dispatches (reduce + effects + feedback)
        dispatch: Arc<Mutex<()>>,
        shutdown: Arc<AtomicBool>,
        /// Every reduced action is sent here after its state change is visible
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                dispatch: Arc::new(Mutex::new(())),
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Waits for any in-flight dispatch to finish
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Broadcasts the action to observers
        /// 4. Executes returned effects to completion
        /// 5. Reduces actions fed back by effects the same way
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`] if the store is shutting down.
        /// - [`StoreError::FeedbackLimitExceeded`] if effects keep feeding
        ///   actions back beyond [`StoreConfig::max_actions_per_dispatch`].
        ///
        /// # Example
        ///
        /// ```ignore
        /// let report = store.send(TodoAction::Toggle { id }).await?;
        /// assert!(report.actions_reduced >= 1);
        /// ```
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<DispatchReport, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let _dispatch = self.dispatch.lock().await;
            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let mut report = DispatchReport::default();
            let mut queue = VecDeque::from([action]);

            while let Some(action) = queue.pop_front() {
                if report.actions_reduced == self.config.max_actions_per_dispatch {
                    tracing::error!(
                        limit = self.config.max_actions_per_dispatch,
                        dropped = queue.len() + 1,
                        "Dispatch exceeded feedback limit"
                    );
                    return Err(StoreError::FeedbackLimitExceeded(
                        self.config.max_actions_per_dispatch,
                    ));
                }

                let effects = {
                    let mut state = self.state.write().await;
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();
                    self.reducer.reduce(&mut *state, action.clone(), &self.environment)
                };
                report.actions_reduced += 1;

                // No receivers is fine: observers are optional
                let _ = self.action_broadcast.send(action);

                for effect in effects {
                    if effect.is_none() {
                        continue;
                    }
                    report.effects_executed += 1;
                    queue.extend(execute_effect(effect).await);
                }
            }

            tracing::debug!(
                actions = report.actions_reduced,
                effects = report.effects_executed,
                "Dispatch completed"
            );
            Ok(report)
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Clone the whole current state
        pub async fn snapshot(&self) -> S
        where
            S: Clone,
        {
            self.state(Clone::clone).await
        }

        /// Subscribe to every action the store reduces
        ///
        /// Actions arrive after their state change is visible through
        /// [`Store::state`]. Receivers that fall more than
        /// [`StoreConfig::broadcast_capacity`] actions behind observe
        /// `RecvError::Lagged` and skip ahead; they never block the store.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Borrow the injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Stop accepting actions
        ///
        /// Waits for the in-flight dispatch (if any) so that its effects,
        /// including persistence, have completed when this returns.
        pub async fn shutdown(&self) {
            tracing::info!("Initiating shutdown");
            self.shutdown.store(true, Ordering::Release);
            let _dispatch = self.dispatch.lock().await;
            tracing::info!("Store shut down");
        }

        /// Returns true once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config,
                dispatch: Arc::clone(&self.dispatch),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
