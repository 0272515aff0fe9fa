//! Job System Module
//!
//! Tracks the lifecycle of backend-bound requests (transcribe / translate /
//! render). At most one job exists per kind; starting a new request replaces
//! the previous record and invalidates its ticket, so a late response from a
//! superseded request is provably dropped instead of silently winning.
//!
//! Progress is advisory and display-only; nothing treats it as a
//! correctness signal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::JobId;

// =============================================================================
// Job Types
// =============================================================================

/// The three backend-bound request kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobKind {
    /// AI transcription of the selected video
    Transcribe,
    /// Translation of the original-language subtitles
    Translate,
    /// Burned-subtitle video render
    Render,
}

/// Job status
///
/// `Pending` and `Processing` are both in-flight; `Completed` and `Error`
/// are terminal and never transitioned out of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    /// Created, request not yet dispatched
    #[default]
    Pending,
    /// Request in flight
    Processing,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Error,
}

/// Tracked lifecycle of one backend request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job ID
    pub id: JobId,
    /// Request kind
    pub kind: JobKind,
    /// Current status
    pub status: JobStatus,
    /// Progress percentage (0-100), monotonically non-decreasing
    pub progress: u8,
    /// Error message, set only in the `Error` state
    pub error: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Completion timestamp (ISO 8601)
    pub completed_at: Option<String>,
}

impl Job {
    /// Creates a new pending job
    pub fn new(kind: JobKind) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            kind,
            status: JobStatus::Pending,
            progress: 0,
            error: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Moves a pending job to processing
    pub fn start(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Processing;
        }
    }

    /// Raises the progress percentage. Progress never decreases and is
    /// ignored once the job is terminal.
    pub fn set_progress(&mut self, progress: u8) {
        if self.is_terminal() {
            return;
        }
        self.progress = self.progress.max(progress.min(100));
    }

    /// Marks the job completed; progress is fixed at 100
    pub fn complete(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.completed_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Marks the job failed; progress stays frozen at its last value
    pub fn fail(&mut self, error: &str) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Error;
        self.error = Some(error.to_string());
        self.completed_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Returns true while the job is pending or processing
    pub fn is_in_flight(&self) -> bool {
        matches!(self.status, JobStatus::Pending | JobStatus::Processing)
    }

    /// Returns true once the job is completed or failed
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Error)
    }
}

// =============================================================================
// Job Ticket
// =============================================================================

/// Proof of ownership of the current job of a kind.
///
/// A ticket turns stale the moment a newer job of the same kind begins;
/// tracker methods called with a stale ticket return `false` and change
/// nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JobTicket {
    kind: JobKind,
    generation: u64,
}

impl JobTicket {
    /// Request kind this ticket belongs to
    pub fn kind(&self) -> JobKind {
        self.kind
    }
}

// =============================================================================
// Job Tracker
// =============================================================================

/// Tracks the current job per kind with generation counters
#[derive(Clone, Debug, Default)]
pub struct JobTracker {
    jobs: HashMap<JobKind, Job>,
    generations: HashMap<JobKind, u64>,
}

impl JobTracker {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new job of the given kind, discarding any previous record
    /// and invalidating its tickets.
    pub fn begin(&mut self, kind: JobKind) -> JobTicket {
        let generation = self.generations.entry(kind).or_insert(0);
        *generation += 1;

        self.jobs.insert(kind, Job::new(kind));
        JobTicket {
            kind,
            generation: *generation,
        }
    }

    /// Returns true if the ticket still refers to the current job of its kind
    pub fn is_current(&self, ticket: &JobTicket) -> bool {
        self.generations.get(&ticket.kind) == Some(&ticket.generation)
    }

    /// Moves the ticket's job to processing. Returns false if stale.
    pub fn start(&mut self, ticket: &JobTicket) -> bool {
        self.with_current(ticket, |job| job.start())
    }

    /// Raises the ticket's job progress. Returns false if stale.
    pub fn set_progress(&mut self, ticket: &JobTicket, progress: u8) -> bool {
        self.with_current(ticket, |job| job.set_progress(progress))
    }

    /// Completes the ticket's job. Returns false if stale.
    pub fn complete(&mut self, ticket: &JobTicket) -> bool {
        self.with_current(ticket, |job| job.complete())
    }

    /// Fails the ticket's job with a message. Returns false if stale.
    pub fn fail(&mut self, ticket: &JobTicket, error: &str) -> bool {
        self.with_current(ticket, |job| job.fail(error))
    }

    /// Returns the current job record for a kind, if one exists
    pub fn get(&self, kind: JobKind) -> Option<&Job> {
        self.jobs.get(&kind)
    }

    /// Returns true while a job of the kind is pending or processing
    pub fn is_in_flight(&self, kind: JobKind) -> bool {
        self.jobs.get(&kind).is_some_and(|job| job.is_in_flight())
    }

    /// Discards all job records and invalidates all tickets
    pub fn clear(&mut self) {
        self.jobs.clear();
        for generation in self.generations.values_mut() {
            *generation += 1;
        }
    }

    fn with_current(&mut self, ticket: &JobTicket, apply: impl FnOnce(&mut Job)) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(kind = ?ticket.kind, "Dropping update for superseded job");
            return false;
        }
        match self.jobs.get_mut(&ticket.kind) {
            Some(job) => {
                apply(job);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Job Lifecycle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_job_creation() {
        let job = Job::new(JobKind::Transcribe);

        assert!(!job.id.is_empty());
        assert_eq!(job.kind, JobKind::Transcribe);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.error.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_job_lifecycle_success() {
        let mut job = Job::new(JobKind::Translate);

        job.start();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.is_in_flight());

        job.complete();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.completed_at.is_some());
        assert!(job.is_terminal());
    }

    #[test]
    fn test_job_lifecycle_error_freezes_progress() {
        let mut job = Job::new(JobKind::Render);
        job.start();
        job.set_progress(45);

        job.fail("backend exploded");
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.progress, 45);
        assert_eq!(job.error.as_deref(), Some("backend exploded"));
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut job = Job::new(JobKind::Transcribe);
        job.start();

        job.set_progress(60);
        job.set_progress(40);
        assert_eq!(job.progress, 60);

        job.set_progress(150);
        assert_eq!(job.progress, 100);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut job = Job::new(JobKind::Transcribe);
        job.start();
        job.complete();

        job.fail("too late");
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error.is_none());

        job.set_progress(5);
        assert_eq!(job.progress, 100);
    }

    // -------------------------------------------------------------------------
    // Tracker Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tracker_begin_replaces_previous_job() {
        let mut tracker = JobTracker::new();

        let first = tracker.begin(JobKind::Transcribe);
        tracker.start(&first);
        let first_id = tracker.get(JobKind::Transcribe).unwrap().id.clone();

        let second = tracker.begin(JobKind::Transcribe);
        let second_id = tracker.get(JobKind::Transcribe).unwrap().id.clone();

        assert_ne!(first_id, second_id);
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let mut tracker = JobTracker::new();

        let first = tracker.begin(JobKind::Translate);
        tracker.start(&first);
        let second = tracker.begin(JobKind::Translate);
        tracker.start(&second);

        // The superseded request's completion must not touch the new job
        assert!(!tracker.complete(&first));
        assert_eq!(
            tracker.get(JobKind::Translate).unwrap().status,
            JobStatus::Processing
        );

        assert!(tracker.complete(&second));
        assert_eq!(
            tracker.get(JobKind::Translate).unwrap().status,
            JobStatus::Completed
        );
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut tracker = JobTracker::new();

        let transcribe = tracker.begin(JobKind::Transcribe);
        let render = tracker.begin(JobKind::Render);

        assert!(tracker.complete(&transcribe));
        assert!(tracker.is_current(&render));
        assert_eq!(
            tracker.get(JobKind::Render).unwrap().status,
            JobStatus::Pending
        );
    }

    #[test]
    fn test_is_in_flight() {
        let mut tracker = JobTracker::new();
        assert!(!tracker.is_in_flight(JobKind::Render));

        let ticket = tracker.begin(JobKind::Render);
        tracker.start(&ticket);
        assert!(tracker.is_in_flight(JobKind::Render));

        tracker.fail(&ticket, "no backend");
        assert!(!tracker.is_in_flight(JobKind::Render));
    }

    #[test]
    fn test_clear_invalidates_tickets() {
        let mut tracker = JobTracker::new();
        let ticket = tracker.begin(JobKind::Transcribe);

        tracker.clear();
        assert!(tracker.get(JobKind::Transcribe).is_none());
        assert!(!tracker.complete(&ticket));
    }
}
