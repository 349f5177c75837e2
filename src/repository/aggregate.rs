use std::collections::HashMap;

use crate::model::fingerlog::{FingerLogResult, RawFingerLog};

/// Groups joined punch rows into one [`FingerLogResult`] per nik.
///
/// Rows must arrive ordered by `(nik, timestamp)`. Groups come out in
/// first-seen order and timestamps keep their arrival order; nothing is
/// re-sorted here, so unsorted input produces groups in arbitrary order with
/// non-chronological timestamps.
#[derive(Debug, Default)]
pub struct DayLogAggregator {
    logs: Vec<FingerLogResult>,
    // nik -> position in `logs`
    indices: HashMap<String, usize>,
}

impl DayLogAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: RawFingerLog) {
        if let Some(&idx) = self.indices.get(&row.nik) {
            self.logs[idx].timestamps.push(row.timestamp);
            return;
        }

        self.indices.insert(row.nik.clone(), self.logs.len());
        self.logs.push(FingerLogResult {
            nik: row.nik,
            full_name: row.full_name,
            timestamps: vec![row.timestamp],
        });
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn finish(self) -> Vec<FingerLogResult> {
        self.logs
    }
}

pub fn aggregate<I>(rows: I) -> Vec<FingerLogResult>
where
    I: IntoIterator<Item = RawFingerLog>,
{
    let mut aggregator = DayLogAggregator::new();
    for row in rows {
        aggregator.push(row);
    }
    aggregator.finish()
}
