//! Timeline attributes: time-indexed record sequences with floor semantics.
//!
//! A `Timeline` answers "what was the value at time t" for every attribute
//! that changes over the course of a match (position segments, health,
//! energy, cloud charge). Records are kept sorted by timestamp and are never
//! edited in place; a change is always expressed as a new record.

use serde::{Deserialize, Serialize};

/// One timestamped entry of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub time: f64,
    pub value: T,
}

impl<T> Record<T> {
    pub fn new(time: f64, value: T) -> Self {
        Self { time, value }
    }
}

/// A non-empty, time-sorted sequence of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline<T> {
    records: Vec<Record<T>>,
}

impl<T: Clone> Timeline<T> {
    /// Start a timeline with a single record.
    pub fn new(time: f64, value: T) -> Self {
        Self {
            records: vec![Record::new(time, value)],
        }
    }

    pub fn records(&self) -> &[Record<T>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; a timeline holds at least one record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record in effect at `time`: the latest one stamped at or before it,
    /// or the earliest record when `time` precedes them all.
    pub fn record_at(&self, time: f64) -> &Record<T> {
        let idx = self.records.partition_point(|r| r.time <= time);
        if idx == 0 {
            &self.records[0]
        } else {
            &self.records[idx - 1]
        }
    }

    /// The value in effect at `time`.
    pub fn value_at(&self, time: f64) -> &T {
        &self.record_at(time).value
    }

    /// Drop every record stamped at or after `time`, then push a new one.
    ///
    /// This is how a newer order cancels whatever an older order had planned
    /// for the future.
    pub fn append(&mut self, time: f64, value: T) {
        let keep = self.records.partition_point(|r| r.time < time);
        self.records.truncate(keep);
        self.records.push(Record::new(time, value));
    }

    /// Pure form of truncate-then-append: a copy of this timeline with every
    /// record at or after `time` replaced by `tail`.
    ///
    /// Records in `tail` must be sorted and stamped at or after `time`. If the
    /// result would be empty the original first record is kept.
    pub fn spliced(&self, time: f64, tail: impl IntoIterator<Item = Record<T>>) -> Self {
        let keep = self.records.partition_point(|r| r.time < time);
        let mut records: Vec<Record<T>> = self.records[..keep].to_vec();
        records.extend(tail.into_iter().filter(|r| r.time >= time));
        if records.is_empty() {
            records.push(self.records[0].clone());
        }
        Self { records }
    }
}

impl Timeline<f64> {
    /// Scalar value at `time`.
    pub fn at(&self, time: f64) -> f64 {
        *self.value_at(time)
    }

    /// Lowest value in effect anywhere from `time` onward.
    pub fn min_from(&self, time: f64) -> f64 {
        let later = self.records.partition_point(|r| r.time <= time);
        self.records[later..]
            .iter()
            .map(|r| r.value)
            .fold(self.at(time), f64::min)
    }

    /// Apply a signed change effective from `time` onward.
    ///
    /// Inserts a record at `time` and shifts every later record by the same
    /// amount, so a change that arrives late still lands underneath the ones
    /// recorded after it. Adjustments commute.
    pub fn adjust(&mut self, time: f64, delta: f64) {
        let idx = self.records.partition_point(|r| r.time <= time);
        let base = self.at(time);
        self.records.insert(idx, Record::new(time, base + delta));
        for record in &mut self.records[idx + 1..] {
            record.value += delta;
        }
    }
}
