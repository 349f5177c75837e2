pub mod aggregate;
pub mod memory;
pub mod mysql;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;

use crate::error::FingerLogError;
use crate::model::fingerlog::{FingerLogResult, NoteResponse};

pub use memory::InMemoryFingerLogRepository;
pub use mysql::MySqlFingerLogRepository;

pub type RepoResult<T> = Result<T, FingerLogError>;

/// Store access for punches and daily notes.
///
/// Every method issues exactly one statement; nothing is retried.
pub trait FingerLogRepository: Send + Sync {
    /// Records a punch at the store's current time.
    fn add_finger_log<'a>(&'a self, nik: &'a str) -> BoxFuture<'a, RepoResult<()>>;

    fn add_manual_finger_log<'a>(
        &'a self,
        nik: &'a str,
        timestamp: DateTime<Utc>,
    ) -> BoxFuture<'a, RepoResult<()>>;

    /// Punches of `date` (service zone), grouped per person, ordered by nik.
    fn get_finger_log(&self, date: NaiveDate) -> BoxFuture<'_, RepoResult<Vec<FingerLogResult>>>;

    /// Inserts the note or overwrites the existing one for `(nik, date)`.
    fn save_user_note<'a>(
        &'a self,
        nik: &'a str,
        date: NaiveDate,
        note: &'a str,
    ) -> BoxFuture<'a, RepoResult<()>>;

    fn get_notes_by_date(&self, date: NaiveDate) -> BoxFuture<'_, RepoResult<Vec<NoteResponse>>>;

    /// Deletes the punch matching `nik` and `timestamp` exactly.
    fn delete_finger_log<'a>(
        &'a self,
        nik: &'a str,
        timestamp: DateTime<Utc>,
    ) -> BoxFuture<'a, RepoResult<()>>;
}
