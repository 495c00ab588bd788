use log::{debug, info};

use epimap::{
	AggregationPolicy, Boundary, DailySeries, Metric, NegativeHandling, SeirParams,
	SeirState, Severity,
};


fn metric_lines<'x>(series: &'x DailySeries) -> Vec<(&'static str, &'x [i64])> {
	vec![
		("confirm", series.line(Metric::Confirmed)),
		("suspect", series.line(Metric::Suspect)),
		("dead", series.line(Metric::Dead)),
		("heal", series.line(Metric::Healed)),
	]
}

fn projection_lines(states: &[SeirState]) -> Vec<(&'static str, Vec<i64>)> {
	let line = |f: fn(&SeirState) -> f64| -> Vec<i64> {
		states.iter().map(|s| f(s).round() as i64).collect()
	};
	vec![
		("susceptible", line(|s| s.susceptible)),
		("exposed", line(|s| s.exposed)),
		("infectious", line(|s| s.infectious)),
		("recovered", line(|s| s.recovered)),
		("dead", line(|s| s.dead)),
	]
}

fn bucketed_cells<F: Fn(&str) -> Severity>(boundaries: &[Boundary], f: F) -> Vec<(Boundary, Severity)> {
	boundaries.iter().map(|b| {
		let severity = f(&b.label);
		(b.clone(), severity)
	}).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	pretty_env_logger::init();
	let argv: Vec<String> = std::env::args().collect();
	if argv.len() < 4 {
		eprintln!("usage: {} <region csv[.gz]> <china city shapefile> <world country shapefile>", argv[0]);
		std::process::exit(1);
	}
	let region_csv = &argv[1];
	let china_shp = &argv[2];
	let world_shp = &argv[3];

	println!("loading geographic reference ...");
	let index = {
		let r = epimap::magic_open(region_csv)?;
		epimap::GeoIndex::from_reader(r)?
	};
	info!("geographic reference has {} rows", index.len());

	println!("fetching remote data ...");
	let client = epimap::Client::new();
	let snapshot = client.fetch_snapshot()?;
	let daily = client.fetch_daily()?;
	let overview = client.fetch_overview()?;
	let update = &snapshot.last_update_time;
	info!("upstream last updated at {}", update);
	info!(
		"china totals: {} confirmed, {} suspect, {} dead, {} healed",
		snapshot.china_total.confirmed,
		snapshot.china_total.suspect,
		snapshot.china_total.dead,
		snapshot.china_total.healed,
	);
	info!("overview lists {} continents", overview.continents.len());
	for continent in overview.continents.iter() {
		debug!(
			"overview {}: {} confirmed, {} dead, {} healed",
			continent.name, continent.confirmed, continent.dead, continent.healed,
		);
	}

	println!("building daily series ...");
	let year = epimap::assumed_year();
	let cumulative = epimap::build_daily_series(&daily.day_list, year)?;
	let daily_new = epimap::build_daily_series(&daily.day_add_list, year)?;

	println!("rendering time series charts ...");
	epimap::render_lines("COVID-19 Daily Data", update, daily_new.dates(), &metric_lines(&daily_new))?;
	epimap::render_lines("COVID-19 Accumulated Tracing", update, cumulative.dates(), &metric_lines(&cumulative))?;
	let net = cumulative.net_active();
	let mut net_lines = metric_lines(&cumulative);
	net_lines[0] = ("net active", &net[..]);
	epimap::render_lines("COVID-19 Accumulated Net", update, cumulative.dates(), &net_lines)?;

	println!("rendering china maps ...");
	let china = snapshot.china()?;
	let boundaries = epimap::load_boundaries(china_shp, "NAME")?;
	info!("china shapefile has {} boundaries", boundaries.len());
	let total_map = epimap::flatten(china, AggregationPolicy::Total, NegativeHandling::Clamp, &index);
	let cells = bucketed_cells(&boundaries, |label| {
		epimap::china_cell_severity(label, &total_map, &index)
	});
	epimap::render_choropleth("COVID-19 map", update, &cells)?;
	let net_map = epimap::flatten(china, AggregationPolicy::Net, NegativeHandling::Clamp, &index);
	let cells = bucketed_cells(&boundaries, |label| {
		epimap::china_cell_severity(label, &net_map, &index)
	});
	epimap::render_choropleth("COVID-19 map net", update, &cells)?;

	println!("rendering world map ...");
	let world_boundaries = epimap::load_boundaries(world_shp, "FCNAME")?;
	info!("world shapefile has {} boundaries", world_boundaries.len());
	let totals = epimap::world_case_totals(&snapshot.area_tree);
	let cells = bucketed_cells(&world_boundaries, |label| {
		epimap::world_cell_severity(label, &totals)
	});
	epimap::render_choropleth("COVID-19 world map", update, &cells)?;

	println!("rendering outbreak projection ...");
	let params = SeirParams::default();
	let states = epimap::simulate_seir(&params, SeirState::initial(&params, 1.0), 90, 24);
	let owned = projection_lines(&states);
	let lines: Vec<(&str, &[i64])> = owned.iter().map(|(label, values)| (*label, &values[..])).collect();
	epimap::render_projection("COVID-19 SEIR Projection", update, &lines)?;

	println!("done");
	Ok(())
}
