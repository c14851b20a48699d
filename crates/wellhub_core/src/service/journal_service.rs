//! Journal streak and mood/energy averages.

use crate::analytics::{format_one_decimal, streak_from_days};
use crate::model::journal::JournalEntry;
use crate::model::record::Record;
use crate::service::tracker_service::newest_first;
use crate::service::ServiceResult;
use crate::store::{Repository, StoreHandle};

/// Mean mood and energy, one decimal each (`"0"` without entries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalAverages {
    pub entries: usize,
    pub mood: String,
    pub energy: String,
}

pub struct JournalService<'h> {
    entries: Repository<'h, JournalEntry>,
}

impl<'h> JournalService<'h> {
    pub fn new(handle: &'h StoreHandle) -> Self {
        Self {
            entries: handle.repository(),
        }
    }

    pub fn add(&self, entry: &JournalEntry) -> ServiceResult<Record<JournalEntry>> {
        Ok(self.entries.add(entry)?)
    }

    /// Entries newest first.
    pub fn history(&self) -> ServiceResult<Vec<Record<JournalEntry>>> {
        let mut entries = self.entries.get_all()?;
        newest_first(&mut entries);
        Ok(entries)
    }

    pub fn favorites(&self) -> ServiceResult<Vec<Record<JournalEntry>>> {
        let mut entries = self.history()?;
        entries.retain(|entry| entry.fields.favorite);
        Ok(entries)
    }

    /// Consecutive-day streak over entry dates.
    ///
    /// Several entries on one day end the streak there, like a gap.
    pub fn streak(&self) -> ServiceResult<u32> {
        let entries = self.entries.get_all()?;
        Ok(streak_from_days(entries.iter().map(|entry| entry.fields.date)))
    }

    pub fn averages(&self) -> ServiceResult<JournalAverages> {
        Ok(averages(&self.entries.get_all()?))
    }
}

fn averages(entries: &[Record<JournalEntry>]) -> JournalAverages {
    let mean = |value_of: fn(&JournalEntry) -> u8| {
        if entries.is_empty() {
            return None;
        }
        let sum: u32 = entries
            .iter()
            .map(|entry| u32::from(value_of(&entry.fields)))
            .sum();
        Some(f64::from(sum) / entries.len() as f64)
    };

    JournalAverages {
        entries: entries.len(),
        mood: format_one_decimal(mean(|entry| entry.mood)),
        energy: format_one_decimal(mean(|entry| entry.energy)),
    }
}
