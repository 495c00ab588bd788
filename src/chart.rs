use std::fmt;

use chrono::naive::NaiveDate;

use plotters::prelude::*;


#[derive(Debug)]
pub enum ChartError {
	NoData,
	Draw(String),
}

impl fmt::Display for ChartError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::NoData => f.write_str("nothing to chart"),
			Self::Draw(msg) => write!(f, "drawing failed: {}", msg),
		}
	}
}

impl std::error::Error for ChartError {}

fn draw_err<E: fmt::Display>(err: E) -> ChartError {
	ChartError::Draw(err.to_string())
}


fn value_extent(lines: &[(&str, &[i64])]) -> (i64, i64) {
	let mut min = 0;
	let mut max = 1;
	for (_, values) in lines.iter() {
		for v in values.iter() {
			if *v < min {
				min = *v;
			}
			if *v > max {
				max = *v;
			}
		}
	}
	(min, max)
}


/// Render a set of index-aligned time series lines to `<title>.png`.
///
/// The x axis is the record index, labeled with the matching date as
/// month-day; all lines must have the same length as `dates`.
pub fn render_lines(
		title: &str,
		update_time: &str,
		dates: &[NaiveDate],
		lines: &[(&str, &[i64])],
) -> Result<(), ChartError> {
	if dates.is_empty() || lines.is_empty() {
		return Err(ChartError::NoData)
	}
	for (label, values) in lines.iter() {
		if values.len() != dates.len() {
			return Err(ChartError::Draw(format!("line {:?} has {} values for {} dates", label, values.len(), dates.len())))
		}
	}

	let path = format!("{}.png", title);
	let root = BitMapBackend::new(&path, (1000, 800)).into_drawing_area();
	root.fill(&WHITE).map_err(draw_err)?;

	let (y_min, y_max) = value_extent(lines);
	let x_max = dates.len() - 1;
	let caption = format!("{} (updated {})", title, update_time);
	let mut chart = ChartBuilder::on(&root)
		.caption(&caption, ("sans-serif", 28))
		.margin(20)
		.x_label_area_size(50)
		.y_label_area_size(70)
		.build_cartesian_2d(0usize..x_max.max(1), y_min..y_max)
		.map_err(draw_err)?;

	chart.configure_mesh()
		.x_labels(12)
		.x_label_formatter(&|i| {
			dates.get(*i).map(|d| d.format("%m-%d").to_string()).unwrap_or_default()
		})
		.y_desc("population")
		.draw()
		.map_err(draw_err)?;

	for (i, (label, values)) in lines.iter().enumerate() {
		let color = Palette99::pick(i).to_rgba();
		chart.draw_series(LineSeries::new(
			values.iter().enumerate().map(|(x, v)| (x, *v)),
			color.stroke_width(2),
		))
			.map_err(draw_err)?
			.label(*label)
			.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
	}

	chart.configure_series_labels()
		.background_style(&WHITE.mix(0.8))
		.border_style(&BLACK)
		.draw()
		.map_err(draw_err)?;
	root.present().map_err(draw_err)?;
	Ok(())
}


/// Render index-aligned projection lines to `<title>.png`, with the x axis
/// in days from the start of the simulation.
pub fn render_projection(
		title: &str,
		update_time: &str,
		lines: &[(&str, &[i64])],
) -> Result<(), ChartError> {
	let len = match lines.first() {
		Some((_, values)) if !values.is_empty() => values.len(),
		_ => return Err(ChartError::NoData),
	};
	for (label, values) in lines.iter() {
		if values.len() != len {
			return Err(ChartError::Draw(format!("line {:?} has {} values, expected {}", label, values.len(), len)))
		}
	}

	let path = format!("{}.png", title);
	let root = BitMapBackend::new(&path, (1000, 800)).into_drawing_area();
	root.fill(&WHITE).map_err(draw_err)?;

	let (y_min, y_max) = value_extent(lines);
	let caption = format!("{} (updated {})", title, update_time);
	let mut chart = ChartBuilder::on(&root)
		.caption(&caption, ("sans-serif", 28))
		.margin(20)
		.x_label_area_size(50)
		.y_label_area_size(70)
		.build_cartesian_2d(0usize..(len - 1).max(1), y_min..y_max)
		.map_err(draw_err)?;

	chart.configure_mesh()
		.x_desc("day")
		.y_desc("population")
		.draw()
		.map_err(draw_err)?;

	for (i, (label, values)) in lines.iter().enumerate() {
		let color = Palette99::pick(i).to_rgba();
		chart.draw_series(LineSeries::new(
			values.iter().enumerate().map(|(x, v)| (x, *v)),
			color.stroke_width(2),
		))
			.map_err(draw_err)?
			.label(*label)
			.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
	}

	chart.configure_series_labels()
		.background_style(&WHITE.mix(0.8))
		.border_style(&BLACK)
		.draw()
		.map_err(draw_err)?;
	root.present().map_err(draw_err)?;
	Ok(())
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_value_extent_spans_all_lines() {
		let a = [1i64, 5, 3];
		let b = [0i64, -4, 900];
		let lines: [(&str, &[i64]); 2] = [("a", &a), ("b", &b)];
		assert_eq!(value_extent(&lines), (-4, 900));
	}

	#[test]
	fn test_value_extent_never_degenerate() {
		let a = [0i64, 0];
		let lines: [(&str, &[i64]); 1] = [("a", &a)];
		// lower bound stays at zero, upper is forced positive
		assert_eq!(value_extent(&lines), (0, 1));
	}

	#[test]
	fn test_render_rejects_empty_input() {
		assert!(matches!(render_lines("t", "now", &[], &[]), Err(ChartError::NoData)));
	}

	#[test]
	fn test_render_rejects_misaligned_line() {
		let dates = [NaiveDate::from_ymd(2020, 1, 23), NaiveDate::from_ymd(2020, 1, 24)];
		let values = [1i64];
		let lines: [(&str, &[i64]); 1] = [("confirm", &values)];
		assert!(matches!(render_lines("t", "now", &dates, &lines), Err(ChartError::Draw(_))));
	}

	#[test]
	fn test_projection_rejects_empty_input() {
		let empty: [(&str, &[i64]); 0] = [];
		assert!(matches!(render_projection("t", "now", &empty), Err(ChartError::NoData)));
		let hollow: [(&str, &[i64]); 1] = [("susceptible", &[])];
		assert!(matches!(render_projection("t", "now", &hollow), Err(ChartError::NoData)));
	}

	#[test]
	fn test_projection_rejects_misaligned_line() {
		let a = [1i64, 2];
		let b = [1i64];
		let lines: [(&str, &[i64]); 2] = [("susceptible", &a), ("dead", &b)];
		assert!(matches!(render_projection("t", "now", &lines), Err(ChartError::Draw(_))));
	}
}
