use std::fmt;
use std::io;

use serde::Deserialize;


#[derive(Debug, Clone, Deserialize)]
pub struct RawRegionRow {
	pub province: String,
	pub city: String,
}


#[derive(Debug)]
pub enum GeoIndexError {
	Io(io::Error),
	Csv(csv::Error),
}

impl fmt::Display for GeoIndexError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Io(e) => fmt::Display::fmt(e, f),
			Self::Csv(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl From<io::Error> for GeoIndexError {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<csv::Error> for GeoIndexError {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err)
	}
}

impl std::error::Error for GeoIndexError {}


// Queries frequently omit the administrative suffix (吉林 for 吉林市), and
// occasionally the reference value is the shorter one.
fn name_matches(reference: &str, query: &str) -> bool {
	reference == query || reference.starts_with(query) || query.starts_with(reference)
}


/// Canonicalization index over the administrative province/city hierarchy.
///
/// Rows are kept in file order; `search` scans them front to back, so the
/// result for a given query never changes within a process run.
#[derive(Debug, Clone)]
pub struct GeoIndex {
	rows: Vec<RawRegionRow>,
}

impl GeoIndex {
	pub fn from_reader<R: io::Read>(r: R) -> Result<Self, GeoIndexError> {
		let mut rows = Vec::new();
		let mut r = csv::Reader::from_reader(r);
		for row in r.deserialize() {
			let rec: RawRegionRow = row?;
			rows.push(rec);
		}
		Ok(Self{rows})
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Look up the canonical city name of the first row matching both
	/// filters. An omitted filter matches every row.
	pub fn search(&self, province: Option<&str>, city: Option<&str>) -> Option<&str> {
		for row in self.rows.iter() {
			if let Some(p) = province {
				if !name_matches(&row.province, p) {
					continue
				}
			}
			if let Some(c) = city {
				if !name_matches(&row.city, c) {
					continue
				}
			}
			return Some(row.city.as_str())
		}
		None
	}
}
