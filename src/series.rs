use std::fmt;
use std::num::ParseIntError;

use chrono::naive::NaiveDate;

use enum_map::{Enum, EnumMap};

use super::tencent::RawDayRecord;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Metric {
	Confirmed,
	Suspect,
	Dead,
	Healed,
}

impl Metric {
	pub const ALL: [Metric; 4] = [Metric::Confirmed, Metric::Suspect, Metric::Dead, Metric::Healed];
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Confirmed => f.write_str("confirm"),
			Self::Suspect => f.write_str("suspect"),
			Self::Dead => f.write_str("dead"),
			Self::Healed => f.write_str("heal"),
		}
	}
}


#[derive(Debug)]
pub enum SeriesError {
	MissingDateSeparator(String),
	InvalidDateNumber(ParseIntError),
	InvalidCalendarDate(String),
}

impl fmt::Display for SeriesError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::MissingDateSeparator(s) => write!(f, "day record date {:?} has no dot separator", s),
			Self::InvalidDateNumber(e) => fmt::Display::fmt(e, f),
			Self::InvalidCalendarDate(s) => write!(f, "day record date {:?} is not a calendar date", s),
		}
	}
}

impl From<ParseIntError> for SeriesError {
	fn from(other: ParseIntError) -> Self {
		Self::InvalidDateNumber(other)
	}
}

impl std::error::Error for SeriesError {}


fn parse_short_date(s: &str, year: i32) -> Result<NaiveDate, SeriesError> {
	let (month, day) = match s.split_once('.') {
		Some(v) => v,
		None => return Err(SeriesError::MissingDateSeparator(s.into())),
	};
	let month = month.parse::<u32>()?;
	let day = day.parse::<u32>()?;
	NaiveDate::from_ymd_opt(year, month, day)
		.ok_or_else(|| SeriesError::InvalidCalendarDate(s.into()))
}


/// Per-day national counters, index-aligned by date. Built once per fetch
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DailySeries {
	dates: Vec<NaiveDate>,
	values: EnumMap<Metric, Vec<i64>>,
}

impl DailySeries {
	pub fn len(&self) -> usize {
		self.dates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.dates.is_empty()
	}

	pub fn dates(&self) -> &[NaiveDate] {
		&self.dates
	}

	pub fn line(&self, metric: Metric) -> &[i64] {
		&self.values[metric]
	}

	/// Confirmed minus healed minus dead per day, approximating the number
	/// of currently active cases when applied to the cumulative list.
	pub fn net_active(&self) -> Vec<i64> {
		let confirmed = &self.values[Metric::Confirmed];
		let healed = &self.values[Metric::Healed];
		let dead = &self.values[Metric::Dead];
		confirmed.iter()
			.zip(healed.iter())
			.zip(dead.iter())
			.map(|((c, h), d)| c - h - d)
			.collect()
	}
}

/// Build a [`DailySeries`] from raw day records, resolving the year-less
/// `"M.D"` dates against `year`.
///
/// Any malformed record fails the whole build; the remote emits whole
/// well-formed lists or nothing.
pub fn build_daily_series(records: &[RawDayRecord], year: i32) -> Result<DailySeries, SeriesError> {
	let mut dates = Vec::with_capacity(records.len());
	let mut values: EnumMap<Metric, Vec<i64>> = EnumMap::new();
	for rec in records.iter() {
		dates.push(parse_short_date(&rec.date, year)?);
		values[Metric::Confirmed].push(rec.confirmed);
		values[Metric::Suspect].push(rec.suspect);
		values[Metric::Dead].push(rec.dead);
		values[Metric::Healed].push(rec.healed);
	}
	Ok(DailySeries{dates, values})
}


#[cfg(test)]
mod tests {
	use super::*;

	fn rec(date: &str, confirmed: i64, suspect: i64, dead: i64, healed: i64) -> RawDayRecord {
		RawDayRecord{date: date.into(), confirmed, suspect, dead, healed}
	}

	#[test]
	fn test_build_single_record() {
		let series = build_daily_series(&[rec("1.23", 10, 2, 0, 0)], 2020).unwrap();
		assert_eq!(series.len(), 1);
		assert_eq!(series.dates()[0], NaiveDate::from_ymd(2020, 1, 23));
		assert_eq!(series.line(Metric::Confirmed), &[10]);
		assert_eq!(series.line(Metric::Suspect), &[2]);
	}

	#[test]
	fn test_build_keeps_alignment() {
		let series = build_daily_series(&[
			rec("1.23", 10, 2, 0, 0),
			rec("1.24", 25, 3, 1, 2),
			rec("2.1", 40, 0, 2, 9),
		], 2020).unwrap();
		assert_eq!(series.len(), 3);
		assert_eq!(series.dates()[2], NaiveDate::from_ymd(2020, 2, 1));
		for metric in Metric::ALL.iter() {
			assert_eq!(series.line(*metric).len(), series.len());
		}
		assert_eq!(series.line(Metric::Healed), &[0, 2, 9]);
	}

	#[test]
	fn test_build_fails_whole_batch_on_bad_date() {
		let records = [rec("1.23", 10, 0, 0, 0), rec("123", 11, 0, 0, 0)];
		assert!(matches!(
			build_daily_series(&records, 2020),
			Err(SeriesError::MissingDateSeparator(_))
		));
		let records = [rec("2.30", 10, 0, 0, 0)];
		assert!(matches!(
			build_daily_series(&records, 2020),
			Err(SeriesError::InvalidCalendarDate(_))
		));
		let records = [rec("x.1", 10, 0, 0, 0)];
		assert!(matches!(
			build_daily_series(&records, 2020),
			Err(SeriesError::InvalidDateNumber(_))
		));
	}

	#[test]
	fn test_net_active() {
		let series = build_daily_series(&[
			rec("1.23", 10, 0, 1, 2),
			rec("1.24", 20, 0, 2, 5),
		], 2020).unwrap();
		assert_eq!(series.net_active(), vec![7, 13]);
	}
}
