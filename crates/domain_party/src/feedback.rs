//! Feedback threads
//!
//! A simple append-only log of notes raised by a customer or collector.
//! Status changes append an annotation note so the thread reads as a full
//! history. Feedback carries no financial invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::FeedbackId;

use crate::error::PartyError;

/// Who raised the feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Customer,
    Collector,
}

/// Thread status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

/// A single note in a feedback thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackNote {
    pub id: Uuid,
    pub author: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackNote {
    fn new(author: Uuid, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// A feedback thread with an append-only note list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub source: FeedbackSource,
    pub author: Uuid,
    pub subject: String,
    pub status: FeedbackStatus,
    pub notes: Vec<FeedbackNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Opens a new thread with the initial message as its first note
    pub fn open(
        source: FeedbackSource,
        author: Uuid,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, PartyError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(PartyError::validation("feedback subject must not be empty"));
        }
        let now = Utc::now();
        Ok(Self {
            id: FeedbackId::new_v7(),
            source,
            author,
            subject,
            status: FeedbackStatus::New,
            notes: vec![FeedbackNote::new(author, message)],
            created_at: now,
            updated_at: now,
        })
    }

    /// Appends a note to the thread
    pub fn add_note(&mut self, author: Uuid, body: impl Into<String>) -> Result<(), PartyError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(PartyError::validation("note body must not be empty"));
        }
        if self.status == FeedbackStatus::Closed {
            return Err(PartyError::Conflict(
                "cannot add notes to a closed thread".to_string(),
            ));
        }
        self.notes.push(FeedbackNote::new(author, body));
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the thread to a new status, appending an annotation note
    pub fn change_status(
        &mut self,
        author: Uuid,
        status: FeedbackStatus,
    ) -> Result<(), PartyError> {
        if status == self.status {
            return Err(PartyError::Conflict(format!(
                "thread is already {:?}",
                status
            )));
        }
        let annotation = format!("status changed: {:?} -> {:?}", self.status, status);
        self.status = status;
        self.notes.push(FeedbackNote::new(author, annotation));
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_starts_new_with_initial_note() {
        let author = Uuid::new_v4();
        let thread = Feedback::open(
            FeedbackSource::Customer,
            author,
            "Passbook not updated",
            "My passbook shows an old balance.",
        )
        .unwrap();

        assert_eq!(thread.status, FeedbackStatus::New);
        assert_eq!(thread.notes.len(), 1);
        assert_eq!(thread.notes[0].author, author);
    }

    #[test]
    fn test_status_change_appends_annotation() {
        let author = Uuid::new_v4();
        let mut thread = Feedback::open(FeedbackSource::Collector, author, "Route change", "x")
            .unwrap();

        thread
            .change_status(author, FeedbackStatus::InProgress)
            .unwrap();

        assert_eq!(thread.status, FeedbackStatus::InProgress);
        assert_eq!(thread.notes.len(), 2);
        assert!(thread.notes[1].body.contains("New -> InProgress"));
    }

    #[test]
    fn test_no_op_status_change_rejected() {
        let author = Uuid::new_v4();
        let mut thread = Feedback::open(FeedbackSource::Customer, author, "s", "m").unwrap();
        assert!(matches!(
            thread.change_status(author, FeedbackStatus::New),
            Err(PartyError::Conflict(_))
        ));
    }

    #[test]
    fn test_closed_thread_rejects_notes() {
        let author = Uuid::new_v4();
        let mut thread = Feedback::open(FeedbackSource::Customer, author, "s", "m").unwrap();
        thread.change_status(author, FeedbackStatus::Closed).unwrap();
        assert!(matches!(
            thread.add_note(author, "late note"),
            Err(PartyError::Conflict(_))
        ));
    }
}
