use std::collections::BTreeMap;

use smartstring::alias::{String as SmartString};

use super::aliases::{is_unresolved_sentinel, resolve_city, DIRECT_CITIES, TIBET, TIBET_CAPITAL};
use super::region::GeoIndex;
use super::tencent::{CaseTotals, RegionNode};


/// Which count a flattened map cell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPolicy {
	/// Cumulative confirmed cases.
	Total,
	/// Confirmed minus healed, approximating currently-active cases.
	Net,
}

impl AggregationPolicy {
	pub fn deduction(&self, total: &CaseTotals) -> i64 {
		match self {
			Self::Total => 0,
			Self::Net => total.healed,
		}
	}
}


/// What to do when a net count goes below zero due to reporting lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeHandling {
	Clamp,
	AsIs,
}

impl NegativeHandling {
	pub fn apply(&self, count: i64) -> i64 {
		match self {
			Self::Clamp => count.max(0),
			Self::AsIs => count,
		}
	}
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionCount {
	/// A municipality or SAR: the province itself is the map key.
	Direct(i64),
	/// Counts keyed by canonical city name.
	Cities(BTreeMap<SmartString, i64>),
}

/// Flat per-province view of the region tree. Kept ordered so that the map
/// cell matcher scans it in a stable order across runs.
pub type FlattenedRegionMap = BTreeMap<SmartString, RegionCount>;


/// Flatten the province/city tree under the China node into canonical map
/// keys.
///
/// The policy deduction is applied at every level; city entries resolving
/// to the same canonical name are summed, and unresolved-region sentinel
/// children are dropped.
pub fn flatten(
		china: &RegionNode,
		policy: AggregationPolicy,
		negatives: NegativeHandling,
		index: &GeoIndex,
) -> FlattenedRegionMap {
	let mut result = FlattenedRegionMap::new();
	for province in china.children.iter() {
		let province_count = negatives.apply(province.total.confirmed - policy.deduction(&province.total));
		if let Some(canonical) = DIRECT_CITIES.get(&*province.name) {
			result.insert((*canonical).into(), RegionCount::Direct(province_count));
			continue
		}
		if province.name == TIBET {
			// reported without city subdivisions; attribute everything to
			// the capital so the city shapefile can still be colored
			let mut cities = BTreeMap::new();
			cities.insert(TIBET_CAPITAL.into(), province_count);
			result.insert(province.name.clone(), RegionCount::Cities(cities));
			continue
		}
		let mut cities: BTreeMap<SmartString, i64> = BTreeMap::new();
		for city in province.children.iter() {
			if is_unresolved_sentinel(&city.name) {
				continue
			}
			let count = negatives.apply(city.total.confirmed - policy.deduction(&city.total));
			let key = resolve_city(index, Some(&*province.name), &city.name);
			*cities.entry(key).or_insert(0) += count;
		}
		result.insert(province.name.clone(), RegionCount::Cities(cities));
	}
	result
}


#[cfg(test)]
mod tests {
	use super::*;

	fn totals(confirmed: i64, healed: i64) -> CaseTotals {
		CaseTotals{confirmed, suspect: 0, dead: 0, healed}
	}

	fn leaf(name: &str, confirmed: i64, healed: i64) -> RegionNode {
		RegionNode{name: name.into(), total: totals(confirmed, healed), children: Vec::new()}
	}

	fn tree(provinces: Vec<RegionNode>) -> RegionNode {
		RegionNode{name: "中国".into(), total: totals(0, 0), children: provinces}
	}

	fn empty_index() -> GeoIndex {
		GeoIndex::from_reader("province,city\n".as_bytes()).unwrap()
	}

	fn two_province_tree() -> RegionNode {
		tree(vec![
			leaf("北京", 50, 10),
			RegionNode{
				name: "乙省".into(),
				total: totals(5, 0),
				children: vec![
					leaf("c1", 5, 0),
					leaf("地区待确认", 3, 0),
				],
			},
		])
	}

	fn city_count(map: &FlattenedRegionMap, province: &str, city: &str) -> i64 {
		match map.get(province).unwrap() {
			RegionCount::Cities(cities) => *cities.get(city).unwrap(),
			other => panic!("expected city map for {}, got {:?}", province, other),
		}
	}

	#[test]
	fn test_total_policy_scenario() {
		let map = flatten(&two_province_tree(), AggregationPolicy::Total, NegativeHandling::Clamp, &empty_index());
		assert_eq!(map.get("北京市"), Some(&RegionCount::Direct(50)));
		assert_eq!(city_count(&map, "乙省", "c1"), 5);
		assert_eq!(map.len(), 2);
	}

	#[test]
	fn test_net_policy_scenario() {
		let map = flatten(&two_province_tree(), AggregationPolicy::Net, NegativeHandling::Clamp, &empty_index());
		assert_eq!(map.get("北京市"), Some(&RegionCount::Direct(40)));
		assert_eq!(city_count(&map, "乙省", "c1"), 5);
	}

	#[test]
	fn test_sentinel_children_always_excluded() {
		let map = flatten(&two_province_tree(), AggregationPolicy::Total, NegativeHandling::Clamp, &empty_index());
		match map.get("乙省").unwrap() {
			RegionCount::Cities(cities) => {
				assert_eq!(cities.len(), 1);
				assert!(cities.get("地区待确认").is_none());
			},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn test_net_deduction_applies_at_city_level() {
		let t = tree(vec![RegionNode{
			name: "丙省".into(),
			total: totals(30, 12),
			children: vec![leaf("c2", 30, 12)],
		}]);
		let total = flatten(&t, AggregationPolicy::Total, NegativeHandling::Clamp, &empty_index());
		let net = flatten(&t, AggregationPolicy::Net, NegativeHandling::Clamp, &empty_index());
		assert_eq!(city_count(&total, "丙省", "c2"), 30);
		assert_eq!(city_count(&net, "丙省", "c2"), 18);
		assert_ne!(total, net);
	}

	#[test]
	fn test_tibet_synthesizes_capital_entry() {
		let t = tree(vec![leaf("西藏", 7, 2)]);
		let map = flatten(&t, AggregationPolicy::Net, NegativeHandling::Clamp, &empty_index());
		assert_eq!(city_count(&map, "西藏", "拉萨市"), 5);
	}

	#[test]
	fn test_duplicate_aliases_accumulate() {
		// two corps districts resolving to the same canonical city must sum
		let t = tree(vec![RegionNode{
			name: "新疆".into(),
			total: totals(9, 0),
			children: vec![
				leaf("兵团第九师", 4, 0),
				leaf("沙湾县", 0, 0),
				leaf("塔城市", 5, 0),
			],
		}]);
		let map = flatten(&t, AggregationPolicy::Total, NegativeHandling::Clamp, &empty_index());
		assert_eq!(city_count(&map, "新疆", "塔城市"), 9);
	}

	#[test]
	fn test_negative_handling() {
		let t = tree(vec![leaf("上海", 3, 8)]);
		let clamped = flatten(&t, AggregationPolicy::Net, NegativeHandling::Clamp, &empty_index());
		let raw = flatten(&t, AggregationPolicy::Net, NegativeHandling::AsIs, &empty_index());
		assert_eq!(clamped.get("上海市"), Some(&RegionCount::Direct(0)));
		assert_eq!(raw.get("上海市"), Some(&RegionCount::Direct(-5)));
	}
}
