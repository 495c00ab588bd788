use std::fmt;


/// Severity band of a case count, used to pick the fill color of a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
	Empty,
	Band1,
	Band2,
	Band3,
	Band4,
}

impl Severity {
	pub fn rgb(&self) -> (u8, u8, u8) {
		match self {
			Self::Empty => (0xf0, 0xf0, 0xf0),
			Self::Band1 => (0xff, 0xaa, 0x85),
			Self::Band2 => (0xff, 0x7b, 0x69),
			Self::Band3 => (0xbf, 0x21, 0x21),
			Self::Band4 => (0x7f, 0x18, 0x18),
		}
	}

	pub fn legend_label(&self) -> Option<&'static str> {
		match self {
			Self::Empty => None,
			Self::Band1 => Some("1-9"),
			Self::Band2 => Some("10-99"),
			Self::Band3 => Some("100-999"),
			Self::Band4 => Some(">1000"),
		}
	}
}

impl fmt::Display for Severity {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("empty"),
			Self::Band1 => f.write_str("band1"),
			Self::Band2 => f.write_str("band2"),
			Self::Band3 => f.write_str("band3"),
			Self::Band4 => f.write_str("band4"),
		}
	}
}

/// Map a case count to its severity band.
///
/// Counts at or below zero map to [`Severity::Empty`]; net counts can go
/// negative when healed cases outrun confirmations due to reporting lag.
pub fn bucket(count: i64) -> Severity {
	if count <= 0 {
		Severity::Empty
	} else if count < 10 {
		Severity::Band1
	} else if count < 100 {
		Severity::Band2
	} else if count < 1000 {
		Severity::Band3
	} else {
		Severity::Band4
	}
}
