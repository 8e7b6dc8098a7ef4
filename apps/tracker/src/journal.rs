//! Journal store: study sessions, Feynman notes and weekly reflections.

use std::time::Duration;

use study_core::{FeynmanNote, Reflection, StudySession};
use tokio::sync::{Mutex, MutexGuard};

use crate::db::{JournalRepository, SqliteRepository, StoreError};

type Result<T> = std::result::Result<T, StoreError>;

pub struct Journal {
    repo: Mutex<SqliteRepository>,
    lock_timeout: Duration,
}

impl Journal {
    pub fn new(repo: SqliteRepository, lock_timeout: Duration) -> Self {
        Self {
            repo: Mutex::new(repo),
            lock_timeout,
        }
    }

    async fn lock(&self) -> Result<MutexGuard<'_, SqliteRepository>> {
        tokio::time::timeout(self.lock_timeout, self.repo.lock())
            .await
            .map_err(|_| {
                StoreError::Concurrency(format!(
                    "journal lock not acquired within {:?}",
                    self.lock_timeout
                ))
            })
    }

    pub async fn log_session(&self, session: StudySession) -> Result<StudySession> {
        let session = session.validated()?;
        let repo = self.lock().await?;
        repo.write(|r| r.insert_session(&session))?;
        Ok(session)
    }

    /// All sessions, oldest first.
    pub async fn sessions(&self) -> Result<Vec<StudySession>> {
        self.lock().await?.sessions()
    }

    pub async fn add_feynman(&self, note: FeynmanNote) -> Result<FeynmanNote> {
        let note = note.validated()?;
        let repo = self.lock().await?;
        repo.write(|r| r.insert_feynman_note(&note))?;
        Ok(note)
    }

    /// Most recent notes first.
    pub async fn feynman_notes(&self, limit: usize) -> Result<Vec<FeynmanNote>> {
        self.lock().await?.feynman_notes(Some(limit))
    }

    /// Every note, newest first.
    pub async fn all_feynman_notes(&self) -> Result<Vec<FeynmanNote>> {
        self.lock().await?.feynman_notes(None)
    }

    pub async fn add_reflection(&self, reflection: Reflection) -> Result<Reflection> {
        let reflection = reflection.trimmed();
        let repo = self.lock().await?;
        repo.write(|r| r.insert_reflection(&reflection))?;
        Ok(reflection)
    }

    /// Most recent week first.
    pub async fn reflections(&self) -> Result<Vec<Reflection>> {
        self.lock().await?.reflections()
    }

    /// Insert a batch of sessions. All or nothing.
    pub async fn import_sessions(&self, sessions: Vec<StudySession>) -> Result<usize> {
        let sessions = sessions
            .into_iter()
            .map(StudySession::validated)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let repo = self.lock().await?;
        repo.write(|r| {
            for session in &sessions {
                r.insert_session(session)?;
            }
            Ok(sessions.len())
        })
    }

    /// Insert a batch of Feynman notes. All or nothing.
    pub async fn import_feynman_notes(&self, notes: Vec<FeynmanNote>) -> Result<usize> {
        let notes = notes
            .into_iter()
            .map(FeynmanNote::validated)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let repo = self.lock().await?;
        repo.write(|r| {
            for note in &notes {
                r.insert_feynman_note(note)?;
            }
            Ok(notes.len())
        })
    }

    /// Insert a batch of reflections in one transaction.
    pub async fn import_reflections(&self, reflections: Vec<Reflection>) -> Result<usize> {
        let reflections: Vec<Reflection> =
            reflections.into_iter().map(Reflection::trimmed).collect();
        let repo = self.lock().await?;
        repo.write(|r| {
            for reflection in &reflections {
                r.insert_reflection(reflection)?;
            }
            Ok(reflections.len())
        })
    }
}
