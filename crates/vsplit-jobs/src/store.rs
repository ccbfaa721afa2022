//! In-memory job store.
//!
//! Replaces ambient global job state with an explicit owner: a map from job
//! id to record plus insertion order, behind one lock. The processing loop
//! is the only writer for a given job; any number of pollers read cloned
//! snapshots, so no reader can observe a half-updated record.

use std::collections::HashMap;
use std::sync::RwLock;

use vsplit_models::{Job, JobId};

/// Default number of terminal jobs retained for listing.
pub const DEFAULT_MAX_RETAINED: usize = 50;

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, Job>,
    order: Vec<JobId>,
}

/// Thread-safe job table with last-N retention.
pub struct JobStore {
    inner: RwLock<Inner>,
    max_retained: usize,
}

impl JobStore {
    /// Create a store retaining at most `max_retained` jobs.
    pub fn new(max_retained: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_retained: max_retained.max(1),
        }
    }

    /// Insert a new job, evicting the oldest terminal jobs beyond the cap.
    pub fn insert(&self, job: Job) {
        let mut inner = self.inner.write().expect("job store lock poisoned");
        inner.order.push(job.id.clone());
        inner.jobs.insert(job.id.clone(), job);

        while inner.order.len() > self.max_retained {
            // Only terminal jobs are evictable; live jobs always stay.
            let evict = inner
                .order
                .iter()
                .position(|id| inner.jobs.get(id).is_some_and(|j| j.is_terminal()));
            match evict {
                Some(pos) => {
                    let id = inner.order.remove(pos);
                    inner.jobs.remove(&id);
                }
                None => break,
            }
        }
    }

    /// Get a snapshot of a job.
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.inner
            .read()
            .expect("job store lock poisoned")
            .jobs
            .get(id)
            .cloned()
    }

    /// Mutate a job under the write lock. Returns false for unknown ids.
    pub fn update<F>(&self, id: &JobId, f: F) -> bool
    where
        F: FnOnce(&mut Job),
    {
        let mut inner = self.inner.write().expect("job store lock poisoned");
        match inner.jobs.get_mut(id) {
            Some(job) => {
                f(job);
                true
            }
            None => false,
        }
    }

    /// Snapshots of all retained jobs in insertion order (newest last).
    pub fn list(&self) -> Vec<Job> {
        let inner = self.inner.read().expect("job store lock poisoned");
        inner
            .order
            .iter()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect()
    }

    /// Number of retained jobs.
    pub fn len(&self) -> usize {
        self.inner.read().expect("job store lock poisoned").order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETAINED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(total: u32) -> Job {
        Job::new(PathBuf::from("/in/a.mp4"), PathBuf::from("/out"), total)
    }

    #[test]
    fn test_insert_and_get_snapshot() {
        let store = JobStore::default();
        let j = job(3);
        let id = j.id.clone();
        store.insert(j);

        let snapshot = store.get(&id).unwrap();
        assert_eq!(snapshot.segments_total, 3);
        assert!(store.get(&JobId::from_string("nope")).is_none());
    }

    #[test]
    fn test_update_mutates_stored_record_not_snapshots() {
        let store = JobStore::default();
        let j = job(2);
        let id = j.id.clone();
        store.insert(j);

        let before = store.get(&id).unwrap();
        assert!(store.update(&id, |job| job.start()));
        // The earlier snapshot is unaffected; a new read sees the change.
        assert_eq!(before.status.as_str(), "queued");
        assert_eq!(store.get(&id).unwrap().status.as_str(), "processing");
    }

    #[test]
    fn test_update_unknown_id() {
        let store = JobStore::default();
        assert!(!store.update(&JobId::new(), |job| job.start()));
    }

    #[test]
    fn test_list_is_insertion_ordered() {
        let store = JobStore::default();
        let first = job(1);
        let second = job(1);
        let first_id = first.id.clone();
        let second_id = second.id.clone();
        store.insert(first);
        store.insert(second);

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first_id);
        assert_eq!(listed[1].id, second_id);
    }

    #[test]
    fn test_retention_evicts_oldest_terminal_only() {
        let store = JobStore::new(2);

        let mut done = job(1);
        done.start();
        done.complete();
        let done_id = done.id.clone();
        store.insert(done);

        let live = job(1);
        let live_id = live.id.clone();
        store.insert(live);

        // Third insert pushes the store over the cap; the completed job
        // goes, the live one stays.
        let newest = job(1);
        store.insert(newest);

        assert_eq!(store.len(), 2);
        assert!(store.get(&done_id).is_none());
        assert!(store.get(&live_id).is_some());
    }

    #[test]
    fn test_retention_never_evicts_live_jobs() {
        let store = JobStore::new(1);
        let a = job(1);
        let b = job(1);
        let a_id = a.id.clone();
        store.insert(a);
        store.insert(b);

        // Both jobs are queued; neither can be evicted.
        assert_eq!(store.len(), 2);
        assert!(store.get(&a_id).is_some());
    }
}
