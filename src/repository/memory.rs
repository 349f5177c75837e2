use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use futures::future::BoxFuture;

use super::aggregate::aggregate;
use super::{FingerLogRepository, RepoResult};
use crate::error::FingerLogError;
use crate::model::fingerlog::{FingerLogResult, NoteResponse, RawFingerLog};
use crate::utils::time_parse::Zone;

#[derive(Debug, Default)]
struct Tables {
    // nik -> full_name
    users: HashMap<String, String>,
    // (nik, timestamp), insertion order, millisecond precision like TIMESTAMP(3)
    fingerlog: Vec<(String, DateTime<Utc>)>,
    // (nik, date) -> detail
    detaillog: BTreeMap<(String, NaiveDate), String>,
}

/// Process-local store with the same semantics as the MySQL tables.
///
/// Punches for a nik missing from `users` are rejected, mirroring the
/// foreign key on `fingerlog.nik`.
#[derive(Clone)]
pub struct InMemoryFingerLogRepository {
    zone: Zone,
    inner: Arc<Mutex<Tables>>,
}

impl InMemoryFingerLogRepository {
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            inner: Arc::new(Mutex::new(Tables::default())),
        }
    }

    /// Registers a roster entry; the `users` table is otherwise read-only.
    pub fn with_user(self, nik: impl Into<String>, full_name: impl Into<String>) -> RepoResult<Self> {
        self.lock()?.users.insert(nik.into(), full_name.into());
        Ok(self)
    }

    #[cfg(test)]
    pub fn punch_count(&self) -> RepoResult<usize> {
        Ok(self.lock()?.fingerlog.len())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|_| FingerLogError::Query("in-memory store lock poisoned".into()))
    }

    fn insert(&self, nik: &str, timestamp: DateTime<Utc>) -> RepoResult<()> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(nik) {
            tracing::warn!(nik, "Insert finger log rejected: unknown nik");
            return Err(FingerLogError::InsertRejected { nik: nik.to_string() });
        }
        tables
            .fingerlog
            .push((nik.to_string(), timestamp.trunc_subsecs(3)));
        Ok(())
    }
}

impl FingerLogRepository for InMemoryFingerLogRepository {
    fn add_finger_log<'a>(&'a self, nik: &'a str) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move { self.insert(nik, Utc::now()) })
    }

    fn add_manual_finger_log<'a>(
        &'a self,
        nik: &'a str,
        timestamp: DateTime<Utc>,
    ) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move { self.insert(nik, timestamp) })
    }

    fn get_finger_log(&self, date: NaiveDate) -> BoxFuture<'_, RepoResult<Vec<FingerLogResult>>> {
        Box::pin(async move {
            let (start, end) = self
                .zone
                .day_bounds(date)
                .ok_or_else(|| FingerLogError::validation("Date has no midnight in service zone"))?;

            let tables = self.lock()?;
            let mut rows: Vec<RawFingerLog> = tables
                .fingerlog
                .iter()
                .filter(|(_, ts)| *ts >= start && *ts < end)
                .filter_map(|(nik, ts)| {
                    tables.users.get(nik).map(|full_name| RawFingerLog {
                        nik: nik.clone(),
                        full_name: full_name.clone(),
                        timestamp: *ts,
                    })
                })
                .collect();
            rows.sort_by(|a, b| a.nik.cmp(&b.nik).then(a.timestamp.cmp(&b.timestamp)));

            Ok(aggregate(rows))
        })
    }

    fn save_user_note<'a>(
        &'a self,
        nik: &'a str,
        date: NaiveDate,
        note: &'a str,
    ) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move {
            self.lock()?
                .detaillog
                .insert((nik.to_string(), date), note.to_string());
            Ok(())
        })
    }

    fn get_notes_by_date(&self, date: NaiveDate) -> BoxFuture<'_, RepoResult<Vec<NoteResponse>>> {
        Box::pin(async move {
            let tables = self.lock()?;
            Ok(tables
                .detaillog
                .iter()
                .filter(|((_, d), _)| *d == date)
                .map(|((nik, _), note)| NoteResponse {
                    nik: nik.clone(),
                    note: note.clone(),
                })
                .collect())
        })
    }

    fn delete_finger_log<'a>(
        &'a self,
        nik: &'a str,
        timestamp: DateTime<Utc>,
    ) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move {
            let mut tables = self.lock()?;
            let before = tables.fingerlog.len();
            tables
                .fingerlog
                .retain(|(n, ts)| !(n == nik && *ts == timestamp));

            if tables.fingerlog.len() == before {
                return Err(FingerLogError::NotFound);
            }
            Ok(())
        })
    }
}
