use chrono::{DateTime, NaiveDate, Utc};
use futures::TryStreamExt;
use futures::future::BoxFuture;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlQueryResult;
use tracing::{debug, error, warn};

use super::aggregate::DayLogAggregator;
use super::{FingerLogRepository, RepoResult};
use crate::error::FingerLogError;
use crate::model::fingerlog::{FingerLogResult, NoteResponse, RawFingerLog};
use crate::utils::time_parse::Zone;

// Integrity constraint violation (duplicate key, unknown nik).
const SQLSTATE_INTEGRITY: &str = "23000";

pub struct MySqlFingerLogRepository {
    pool: MySqlPool,
    zone: Zone,
}

impl MySqlFingerLogRepository {
    pub fn new(pool: MySqlPool, zone: Zone) -> Self {
        Self { pool, zone }
    }
}

fn insert_outcome(
    nik: &str,
    result: Result<MySqlQueryResult, sqlx::Error>,
) -> RepoResult<()> {
    match result {
        Ok(done) if done.rows_affected() == 0 => {
            warn!(nik, "Insert finger log affected 0 rows");
            Err(FingerLogError::InsertRejected { nik: nik.to_string() })
        }
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some(SQLSTATE_INTEGRITY) =>
        {
            warn!(error = %db_err, nik, "Insert finger log rejected by constraint");
            Err(FingerLogError::InsertRejected { nik: nik.to_string() })
        }
        Err(e) => {
            error!(error = %e, nik, "Insert finger log failed");
            Err(e.into())
        }
    }
}

impl FingerLogRepository for MySqlFingerLogRepository {
    fn add_finger_log<'a>(&'a self, nik: &'a str) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move {
            let result = sqlx::query("INSERT INTO fingerlog (nik) VALUES (?)")
                .bind(nik)
                .execute(&self.pool)
                .await;

            insert_outcome(nik, result)
        })
    }

    fn add_manual_finger_log<'a>(
        &'a self,
        nik: &'a str,
        timestamp: DateTime<Utc>,
    ) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move {
            let result = sqlx::query("INSERT INTO fingerlog (nik, `timestamp`) VALUES (?, ?)")
                .bind(nik)
                .bind(timestamp)
                .execute(&self.pool)
                .await;

            insert_outcome(nik, result)
        })
    }

    fn get_finger_log(&self, date: NaiveDate) -> BoxFuture<'_, RepoResult<Vec<FingerLogResult>>> {
        Box::pin(async move {
            let (start, end) = self
                .zone
                .day_bounds(date)
                .ok_or_else(|| FingerLogError::validation("Date has no midnight in service zone"))?;

            let mut rows = sqlx::query_as::<_, RawFingerLog>(
                r#"
                SELECT
                    u.nik,
                    u.full_name,
                    f.`timestamp`
                FROM fingerlog f
                JOIN users u ON f.nik = u.nik
                WHERE f.`timestamp` >= ?
                AND f.`timestamp` < ?
                ORDER BY u.nik ASC, f.`timestamp` ASC
                "#,
            )
            .bind(start)
            .bind(end)
            .fetch(&self.pool);

            let mut aggregator = DayLogAggregator::new();
            while let Some(row) = rows.try_next().await.map_err(|e| {
                error!(error = %e, %date, "Fetch finger log failed");
                FingerLogError::from(e)
            })? {
                aggregator.push(row);
            }

            debug!(%date, people = aggregator.len(), "Finger log aggregated");
            Ok(aggregator.finish())
        })
    }

    fn save_user_note<'a>(
        &'a self,
        nik: &'a str,
        date: NaiveDate,
        note: &'a str,
    ) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move {
            sqlx::query(
                r#"
                INSERT INTO detaillog (nik, `date`, detail)
                VALUES (?, ?, ?)
                ON DUPLICATE KEY UPDATE detail = VALUES(detail)
                "#,
            )
            .bind(nik)
            .bind(date)
            .bind(note)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, nik, %date, "Save note failed");
                FingerLogError::from(e)
            })?;

            Ok(())
        })
    }

    fn get_notes_by_date(&self, date: NaiveDate) -> BoxFuture<'_, RepoResult<Vec<NoteResponse>>> {
        Box::pin(async move {
            sqlx::query_as::<_, NoteResponse>(
                "SELECT nik, detail AS note FROM detaillog WHERE `date` = ? ORDER BY nik ASC",
            )
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, %date, "Fetch notes failed");
                FingerLogError::from(e)
            })
        })
    }

    fn delete_finger_log<'a>(
        &'a self,
        nik: &'a str,
        timestamp: DateTime<Utc>,
    ) -> BoxFuture<'a, RepoResult<()>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM fingerlog WHERE nik = ? AND `timestamp` = ?")
                .bind(nik)
                .bind(timestamp)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, nik, %timestamp, "Delete finger log failed");
                    FingerLogError::from(e)
                })?;

            // 0 rows: wrong second or millisecond, or already deleted
            if result.rows_affected() == 0 {
                return Err(FingerLogError::NotFound);
            }

            Ok(())
        })
    }
}
