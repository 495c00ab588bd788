/// Compartment sizes of the outbreak projection at one point in time.
/// Values are fractional populations; round only for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeirState {
	pub susceptible: f64,
	pub exposed: f64,
	pub infectious: f64,
	pub recovered: f64,
	pub dead: f64,
}

impl SeirState {
	/// Population split at day zero: `infectious` seed cases, everyone
	/// else susceptible.
	pub fn initial(params: &SeirParams, infectious: f64) -> Self {
		Self{
			susceptible: params.population - infectious,
			exposed: 0.0,
			infectious,
			recovered: 0.0,
			dead: 0.0,
		}
	}

	fn add_scaled(&self, d: &SeirState, h: f64) -> Self {
		Self{
			susceptible: self.susceptible + d.susceptible * h,
			exposed: self.exposed + d.exposed * h,
			infectious: self.infectious + d.infectious * h,
			recovered: self.recovered + d.recovered * h,
			dead: self.dead + d.dead * h,
		}
	}
}


/// Rate constants of the five-compartment model. The defaults describe a
/// ten-million-person population seeded with a single case.
#[derive(Debug, Clone, Copy)]
pub struct SeirParams {
	pub population: f64,
	/// Rate at which exposed cases become infectious (1/incubation days).
	pub incubation_rate: f64,
	/// Per-contact transmission rate, already divided by population.
	pub transmission_rate: f64,
	/// Recovery rate of exposed cases that never turn infectious.
	pub exposed_recovery_rate: f64,
	/// Recovery rate of infectious cases.
	pub infectious_recovery_rate: f64,
	pub death_rate: f64,
}

impl Default for SeirParams {
	fn default() -> Self {
		let population = 10_000_000.0;
		Self{
			population,
			incubation_rate: 1.0 / 7.0,
			transmission_rate: 2.1 / population,
			exposed_recovery_rate: 100.0 / population,
			infectious_recovery_rate: 0.67,
			death_rate: 0.02,
		}
	}
}


// New transmissions split 60/40 between the exposed compartment and cases
// that turn infectious without a detectable incubation period.
fn derivative(p: &SeirParams, x: &SeirState) -> SeirState {
	let contact = p.transmission_rate * x.infectious * x.susceptible;
	SeirState{
		susceptible: -p.transmission_rate * x.susceptible * (x.infectious + x.exposed),
		exposed: contact * 0.6 - (p.incubation_rate + p.exposed_recovery_rate) * x.exposed,
		infectious: p.incubation_rate * x.exposed
			- p.infectious_recovery_rate * x.infectious
			+ contact * 0.4,
		recovered: p.exposed_recovery_rate * x.exposed
			+ p.infectious_recovery_rate * x.infectious,
		dead: p.death_rate * x.infectious,
	}
}


/// Integrate the model over `days` days with classic fixed-step RK4,
/// sampling the state once per day starting at day zero.
pub fn simulate_seir(params: &SeirParams, initial: SeirState, days: usize, steps_per_day: u32) -> Vec<SeirState> {
	let mut out = Vec::with_capacity(days);
	if days == 0 {
		return out
	}
	let h = 1.0 / f64::from(steps_per_day.max(1));
	let mut state = initial;
	out.push(state);
	for _ in 1..days {
		for _ in 0..steps_per_day.max(1) {
			let k1 = derivative(params, &state);
			let k2 = derivative(params, &state.add_scaled(&k1, h / 2.0));
			let k3 = derivative(params, &state.add_scaled(&k2, h / 2.0));
			let k4 = derivative(params, &state.add_scaled(&k3, h));
			state = state
				.add_scaled(&k1, h / 6.0)
				.add_scaled(&k2, h / 3.0)
				.add_scaled(&k3, h / 3.0)
				.add_scaled(&k4, h / 6.0);
		}
		out.push(state);
	}
	out
}


#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn test_initial_state_accounts_for_everyone() {
		let params = SeirParams::default();
		let s0 = SeirState::initial(&params, 1.0);
		assert!(close(s0.susceptible + s0.infectious, params.population));
		assert!(close(s0.exposed, 0.0));
		assert!(close(s0.recovered, 0.0));
		assert!(close(s0.dead, 0.0));
	}

	#[test]
	fn test_derivative_hand_computed() {
		let params = SeirParams{
			population: 1000.0,
			incubation_rate: 0.5,
			transmission_rate: 0.01,
			exposed_recovery_rate: 0.1,
			infectious_recovery_rate: 0.2,
			death_rate: 0.05,
		};
		let x = SeirState{susceptible: 100.0, exposed: 10.0, infectious: 4.0, recovered: 0.0, dead: 0.0};
		let y = derivative(&params, &x);
		assert!(close(y.susceptible, -14.0), "dS = {}", y.susceptible);
		assert!(close(y.exposed, -3.6), "dE = {}", y.exposed);
		assert!(close(y.infectious, 5.8), "dI = {}", y.infectious);
		assert!(close(y.recovered, 1.8), "dR = {}", y.recovered);
		assert!(close(y.dead, 0.2), "dD = {}", y.dead);
	}

	#[test]
	fn test_simulate_sample_count() {
		let params = SeirParams::default();
		let s0 = SeirState::initial(&params, 1.0);
		assert!(simulate_seir(&params, s0, 0, 24).is_empty());
		assert_eq!(simulate_seir(&params, s0, 1, 24).len(), 1);
		assert_eq!(simulate_seir(&params, s0, 90, 24).len(), 90);
	}

	#[test]
	fn test_simulate_outbreak_progression() {
		let params = SeirParams::default();
		let s0 = SeirState::initial(&params, 1.0);
		let states = simulate_seir(&params, s0, 90, 24);
		// the seed case sets off an outbreak before herd depletion
		assert!(states[30].infectious > states[0].infectious);
		let mut prev_dead = 0.0;
		let mut prev_susceptible = params.population;
		for s in states.iter() {
			assert!(s.dead >= prev_dead);
			assert!(s.susceptible <= prev_susceptible);
			assert!(s.infectious.is_finite() && s.infectious >= 0.0);
			prev_dead = s.dead;
			prev_susceptible = s.susceptible;
		}
	}
}
