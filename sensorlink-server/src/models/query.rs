use std::collections::BTreeMap;

use chrono::{Days, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

use super::StoredReading;

pub const INPUT_DATE_FORMAT: &str = "%m/%d/%Y";
const MILLIS_PER_SECOND: i64 = 1000;

/// Parses a dashboard date such as `05/30/2014`.
pub fn parse_input_date(input: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| QueryError::InvalidDate(input.to_string()))
}

/// Calendar-day bounds of a query, interpreted in a local timezone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// The `days` days leading up to and including `today`.
    pub fn trailing(days: u64, today: NaiveDate) -> Self {
        Self {
            start: today.checked_sub_days(Days::new(days)),
            end: Some(today),
        }
    }

    /// Resolves the range to inclusive unix-second bounds in the process timezone.
    pub fn local_bounds(&self) -> Result<(Option<i64>, Option<i64>), QueryError> {
        self.bounds_in(&Local)
    }

    /// `start` becomes midnight of that day. `end` becomes midnight of the following day,
    /// so the whole end date and the first second of the next one are covered.
    pub fn bounds_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<(Option<i64>, Option<i64>), QueryError> {
        let start = self.start.map(|date| midnight(tz, date)).transpose()?;
        let end = self
            .end
            .map(|date| {
                let next = date
                    .checked_add_days(Days::new(1))
                    .ok_or(QueryError::UnrepresentableDate(date))?;
                midnight(tz, next)
            })
            .transpose()?;

        Ok((start, end))
    }
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<i64, QueryError> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|moment| moment.timestamp())
        .ok_or(QueryError::UnrepresentableDate(date))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub sensor_type: String,
    pub value_type: String,
    pub value_unit: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesGroup {
    pub meta: SeriesMeta,
    /// `(timestamp_millis, value)` pairs in scan order
    #[serde(rename = "data")]
    pub series: Vec<(i64, i64)>,
}

/// Readings grouped by value type, ready to be serialized for a chart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResult(BTreeMap<String, SeriesGroup>);

impl QueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to its value type's series. The group's meta always
    /// reflects the most recently pushed row.
    pub fn push(&mut self, row: StoredReading) {
        let meta = SeriesMeta {
            sensor_type: row.sensor_type,
            value_type: row.value_type.clone(),
            value_unit: row.value_unit,
        };
        let point = (row.timestamp * MILLIS_PER_SECOND, row.value);

        match self.0.get_mut(&row.value_type) {
            Some(group) => {
                group.meta = meta;
                group.series.push(point);
            }
            None => {
                self.0.insert(row.value_type, SeriesGroup { meta, series: vec![point] });
            }
        }
    }

    pub fn get(&self, value_type: &str) -> Option<&SeriesGroup> {
        self.0.get(value_type)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn value_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.0.values().map(|group| group.series.len()).sum()
    }
}
