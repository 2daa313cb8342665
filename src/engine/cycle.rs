use chrono::NaiveDate;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleIndex {
    pub cycle: u32,
    pub position: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("date {date} is before the epoch {epoch}")]
    BeforeEpoch { date: NaiveDate, epoch: NaiveDate },
    #[error("cycle length must be non-zero")]
    EmptyCycle,
}

/// Whole calendar days from `epoch` to `date`. Negative when `date` is
/// earlier. `NaiveDate` has no time-of-day, so DST never shifts the count.
pub fn day_index(epoch: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(epoch).num_days()
}

pub fn index_for(
    date: NaiveDate,
    epoch: NaiveDate,
    cycle_length: usize,
) -> Result<CycleIndex, CycleError> {
    if cycle_length == 0 {
        return Err(CycleError::EmptyCycle);
    }
    let days = day_index(epoch, date);
    if days < 0 {
        return Err(CycleError::BeforeEpoch { date, epoch });
    }

    let days = days as u64;
    let len = cycle_length as u64;
    Ok(CycleIndex {
        cycle: (days / len) as u32,
        position: (days % len) as usize,
    })
}
