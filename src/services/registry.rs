//! In-memory test registry.
//!
//! The registry owns the authoritative copy of every test record. All
//! mutations go through [`TestRegistry::update`], which applies a mutator
//! under the write lock so concurrent readers never observe a half-written
//! record and concurrent writers never lose an update.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTestRequest, PerformanceTest};

/// Concurrency-safe keyed store of performance test records.
#[derive(Default)]
pub struct TestRegistry {
    tests: RwLock<HashMap<Uuid, PerformanceTest>>,
}

impl TestRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<Uuid, PerformanceTest>> {
        // Records are always swapped in whole, so a poisoned lock still
        // guards consistent data.
        self.tests.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, PerformanceTest>> {
        self.tests.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new test in `Pending` state and return a snapshot of it.
    ///
    /// The request must already be validated.
    pub fn create(&self, request: CreateTestRequest) -> PerformanceTest {
        let test = PerformanceTest::new(request);
        let snapshot = test.clone();
        self.write_lock().insert(test.id, test);
        snapshot
    }

    /// Fetch a snapshot of a test by ID.
    pub fn get(&self, id: Uuid) -> AppResult<PerformanceTest> {
        self.read_lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Test {}", id)))
    }

    /// Snapshot of all registered tests. No ordering guarantee.
    pub fn list(&self) -> Vec<PerformanceTest> {
        self.read_lock().values().cloned().collect()
    }

    /// Remove a test by ID.
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write_lock()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Test {}", id)))
    }

    /// Apply a transition to a stored record atomically.
    ///
    /// The mutator runs against a copy of the current record under the write
    /// lock; the copy replaces the stored record only if the mutator returns
    /// `Ok`, so a rejected transition leaves the record untouched. Returns a
    /// snapshot of the updated record.
    ///
    /// This is the only mutation path for existing records. A `NotFound` here
    /// means the record was deleted; callers racing a delete should discard
    /// their result rather than re-insert it.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> AppResult<PerformanceTest>
    where
        F: FnOnce(&mut PerformanceTest) -> AppResult<()>,
    {
        let mut tests = self.write_lock();
        let current = tests
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Test {}", id)))?;

        let mut next = current.clone();
        mutate(&mut next)?;
        let snapshot = next.clone();
        tests.insert(id, next);
        Ok(snapshot)
    }

    /// Number of registered tests.
    pub fn len(&self) -> usize {
        self.read_lock().len()
    }

    /// Whether the registry holds no tests.
    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }
}
