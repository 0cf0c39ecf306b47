//! # Checklist Testing
//!
//! Testing utilities and helpers for the Checklist architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (clocks)
//! - In-memory and failing key-value stores with write logs
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use checklist_testing::{test_clock, InMemoryStore};
//! use checklist_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_add_flow() {
//!     let slot = InMemoryStore::new();
//!     let env = TodoEnvironment::new(Arc::new(test_clock()), Arc::new(slot.clone()), "todos");
//!     let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//!     store.send(TodoAction::Add { text: "Buy milk".into() }).await?;
//!
//!     assert_eq!(store.state(|s| s.count()).await, 1);
//!     assert_eq!(slot.write_count(), 1);
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use checklist_core::environment::Clock;

mod storage_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use checklist_testing::mocks::FixedClock;
    /// use checklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading
    ///
    /// A negative step models a wall clock being set backwards.
    ///
    /// ```
    /// use checklist_testing::mocks::SteppingClock;
    /// use checklist_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = SteppingClock::new(start, Duration::milliseconds(5));
    /// assert_eq!(clock.now(), start);
    /// assert_eq!(clock.now(), start + Duration::milliseconds(5));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use storage_mocks::{FailingStore, InMemoryStore};
