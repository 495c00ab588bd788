use std::collections::BTreeMap;
use std::fmt;

use geo_types::LineString;

use log::warn;

use plotters::prelude::*;

use shapefile::dbase::FieldValue;
use shapefile::Shape;

use smartstring::alias::{String as SmartString};

use super::aliases::{DIAMOND_PRINCESS, JAPAN_MAINLAND, MAP_LABEL_ALIASES, TAIWAN_COUNTIES};
use super::bucket::{bucket, Severity};
use super::flatten::{FlattenedRegionMap, RegionCount};
use super::region::GeoIndex;
use super::tencent::RegionNode;


#[derive(Debug)]
pub enum MapError {
	Shape(shapefile::Error),
	MissingField(String),
	Draw(String),
}

impl fmt::Display for MapError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Shape(e) => fmt::Display::fmt(e, f),
			Self::MissingField(name) => write!(f, "attribute field {:?} missing from shapefile record", name),
			Self::Draw(msg) => write!(f, "drawing failed: {}", msg),
		}
	}
}

impl From<shapefile::Error> for MapError {
	fn from(err: shapefile::Error) -> Self {
		Self::Shape(err)
	}
}

impl std::error::Error for MapError {}

fn draw_err<E: fmt::Display>(err: E) -> MapError {
	MapError::Draw(err.to_string())
}


/// One labeled region polygon from a geometry source, rings in lon/lat.
#[derive(Debug, Clone)]
pub struct Boundary {
	pub label: String,
	pub rings: Vec<LineString<f64>>,
}

/// Load all polygon records of a shapefile, labeling each with the given
/// dbase attribute. Character attributes come NUL-padded out of the dbase
/// reader; the padding is stripped. Non-polygon records are skipped.
pub fn load_boundaries(path: &str, name_field: &str) -> Result<Vec<Boundary>, MapError> {
	let mut reader = shapefile::Reader::from_path(path)?;
	let mut result = Vec::new();
	for (shape, record) in reader.read()? {
		let label = match record.get(name_field) {
			Some(FieldValue::Character(value)) => {
				value.as_deref().unwrap_or("").trim_end_matches('\u{0}').trim().to_string()
			},
			_ => return Err(MapError::MissingField(name_field.into())),
		};
		let polygon = match shape {
			Shape::Polygon(p) => p,
			_ => continue,
		};
		let rings = polygon.rings().iter()
			.map(|ring| {
				LineString::from(ring.points().iter().map(|p| (p.x, p.y)).collect::<Vec<(f64, f64)>>())
			})
			.collect();
		result.push(Boundary{label, rings});
	}
	Ok(result)
}


fn substring_match(a: &str, b: &str) -> bool {
	!a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Find the case count for a geometry label in the flattened map.
///
/// First match wins, scanning provinces in map order: an exact label match
/// on a municipality entry, otherwise a substring match of each city key
/// against the raw label and against its index-resolved form. The order is
/// load-bearing: several keys can substring-match one label.
pub fn match_cell(label: &str, data: &FlattenedRegionMap, index: &GeoIndex) -> Option<i64> {
	let resolved = index.search(None, Some(label)).unwrap_or("");
	for (province, value) in data.iter() {
		match value {
			RegionCount::Direct(count) => {
				if province == label {
					return Some(*count)
				}
			},
			RegionCount::Cities(cities) => {
				for (city, count) in cities.iter() {
					if substring_match(label, city) || substring_match(resolved, city) {
						return Some(*count)
					}
				}
			},
		}
	}
	None
}

/// Severity of one China city cell. Taiwanese counties render at a fixed
/// band, labels go through the shapefile alias fixups, and anything still
/// unmatched is logged and rendered as background.
pub fn china_cell_severity(label: &str, data: &FlattenedRegionMap, index: &GeoIndex) -> Severity {
	if TAIWAN_COUNTIES.iter().any(|c| *c == label) {
		return Severity::Band2
	}
	let label = MAP_LABEL_ALIASES.get(label).copied().unwrap_or(label);
	match match_cell(label, data, index) {
		Some(count) => bucket(count),
		None => {
			warn!("no case data matched map label {:?}", label);
			Severity::Empty
		},
	}
}

/// Per-country confirmed totals from the top-level area tree. The Diamond
/// Princess entry is folded into the Japan mainland count; duplicate
/// country names accumulate.
pub fn world_case_totals(area_tree: &[RegionNode]) -> BTreeMap<SmartString, i64> {
	let mut totals: BTreeMap<SmartString, i64> = BTreeMap::new();
	for node in area_tree.iter() {
		let key: SmartString = if node.name == DIAMOND_PRINCESS {
			JAPAN_MAINLAND.into()
		} else {
			node.name.clone()
		};
		*totals.entry(key).or_insert(0) += node.total.confirmed;
	}
	totals
}

pub fn world_cell_severity(label: &str, totals: &BTreeMap<SmartString, i64>) -> Severity {
	for (name, count) in totals.iter() {
		if substring_match(label, name) {
			return bucket(*count)
		}
	}
	warn!("no case data matched country label {:?}", label);
	Severity::Empty
}


fn lonlat_extent(cells: &[(Boundary, Severity)]) -> Option<((f64, f64), (f64, f64))> {
	let mut extent: Option<((f64, f64), (f64, f64))> = None;
	for (boundary, _) in cells.iter() {
		for ring in boundary.rings.iter() {
			for c in ring.0.iter() {
				extent = Some(match extent {
					None => ((c.x, c.x), (c.y, c.y)),
					Some(((x0, x1), (y0, y1))) => {
						((x0.min(c.x), x1.max(c.x)), (y0.min(c.y), y1.max(c.y)))
					},
				});
			}
		}
	}
	extent
}

/// Render pre-bucketed boundary cells as a choropleth to `<title>.png`.
///
/// Coordinates are drawn as raw lon/lat (plate carrée); the severity legend
/// lists the four non-empty bands.
pub fn render_choropleth(
		title: &str,
		update_time: &str,
		cells: &[(Boundary, Severity)],
) -> Result<(), MapError> {
	let ((lon_min, lon_max), (lat_min, lat_max)) = match lonlat_extent(cells) {
		Some(v) => v,
		None => return Err(MapError::Draw("no polygons to draw".into())),
	};

	let path = format!("{}.png", title);
	let root = BitMapBackend::new(&path, (1600, 1200)).into_drawing_area();
	root.fill(&WHITE).map_err(draw_err)?;

	let caption = format!("{} (updated {})", title, update_time);
	let mut chart = ChartBuilder::on(&root)
		.caption(&caption, ("sans-serif", 32))
		.margin(10)
		.x_label_area_size(30)
		.y_label_area_size(40)
		.build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)
		.map_err(draw_err)?;

	chart.configure_mesh()
		.disable_mesh()
		.draw()
		.map_err(draw_err)?;

	for (boundary, severity) in cells.iter() {
		let (r, g, b) = severity.rgb();
		let color = RGBColor(r, g, b);
		for ring in boundary.rings.iter() {
			let points: Vec<(f64, f64)> = ring.0.iter().map(|c| (c.x, c.y)).collect();
			chart.draw_series(std::iter::once(Polygon::new(points.clone(), color.filled())))
				.map_err(draw_err)?;
			chart.draw_series(std::iter::once(PathElement::new(points, color.stroke_width(1))))
				.map_err(draw_err)?;
		}
	}

	for severity in [Severity::Band1, Severity::Band2, Severity::Band3, Severity::Band4].iter() {
		let (r, g, b) = severity.rgb();
		let color = RGBColor(r, g, b);
		let label = match severity.legend_label() {
			Some(l) => l,
			None => continue,
		};
		chart.draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
			.map_err(draw_err)?
			.label(label)
			.legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
	}
	chart.configure_series_labels()
		.background_style(&WHITE.mix(0.8))
		.border_style(&BLACK)
		.draw()
		.map_err(draw_err)?;
	root.present().map_err(draw_err)?;
	Ok(())
}
