use std::fmt;

use log::debug;

use reqwest;

use serde::{de, Deserialize, Deserializer};

use smartstring::alias::{String as SmartString};


#[derive(Debug)]
pub enum SourceError {
	Request(reqwest::Error),
	Decode(serde_json::Error),
	MissingData(&'static str),
}

impl fmt::Display for SourceError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Request(e) => fmt::Display::fmt(e, f),
			Self::Decode(e) => fmt::Display::fmt(e, f),
			Self::MissingData(what) => write!(f, "missing data in response: {}", what),
		}
	}
}

impl From<reqwest::Error> for SourceError {
	fn from(err: reqwest::Error) -> Self {
		Self::Request(err)
	}
}

impl From<serde_json::Error> for SourceError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(err)
	}
}

impl std::error::Error for SourceError {}


/// Cumulative case counters of one region node.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CaseTotals {
	#[serde(rename = "confirm", default)]
	pub confirmed: i64,
	#[serde(rename = "suspect", default)]
	pub suspect: i64,
	#[serde(rename = "dead", default)]
	pub dead: i64,
	#[serde(rename = "heal", default)]
	pub healed: i64,
}


/// One node of the region tree: a country at the top level, then provinces,
/// then cities. Leaves carry no children.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionNode {
	pub name: SmartString,
	pub total: CaseTotals,
	#[serde(default)]
	pub children: Vec<RegionNode>,
}


fn stringly_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
	where D: Deserializer<'de>
{
	let s = String::deserialize(deserializer)?;
	s.parse::<i64>().map_err(de::Error::custom)
}


/// One day entry of the national time series; the remote encodes every
/// count as a decimal string and the date as "M.D" without a year.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDayRecord {
	pub date: String,
	#[serde(rename = "confirm", deserialize_with = "stringly_count")]
	pub confirmed: i64,
	#[serde(rename = "suspect", deserialize_with = "stringly_count")]
	pub suspect: i64,
	#[serde(rename = "dead", deserialize_with = "stringly_count")]
	pub dead: i64,
	#[serde(rename = "heal", deserialize_with = "stringly_count")]
	pub healed: i64,
}


// The endpoints wrap their actual payload in a JSON string field, so each
// response has to be parsed twice.
#[derive(Debug, Deserialize)]
struct Envelope {
	data: String,
}


#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
	#[serde(rename = "lastUpdateTime")]
	pub last_update_time: String,
	#[serde(rename = "chinaTotal")]
	pub china_total: CaseTotals,
	#[serde(rename = "areaTree")]
	pub area_tree: Vec<RegionNode>,
}

impl Snapshot {
	/// The China node with its province/city subtree. The remote puts it
	/// first in the area tree.
	pub fn china(&self) -> Result<&RegionNode, SourceError> {
		self.area_tree.first().ok_or(SourceError::MissingData("area tree is empty"))
	}
}


#[derive(Debug, Clone, Deserialize)]
pub struct DailyLists {
	#[serde(rename = "chinaDayList")]
	pub day_list: Vec<RawDayRecord>,
	#[serde(rename = "chinaDayAddList")]
	pub day_add_list: Vec<RawDayRecord>,
}


/// One continent entry of the global overview summary. Every field is
/// defaulted; the feed reshuffles its schema without notice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContinentRecord {
	#[serde(alias = "continent", default)]
	pub name: SmartString,
	#[serde(rename = "confirm", alias = "confirmedCount", default)]
	pub confirmed: i64,
	#[serde(rename = "dead", alias = "deadCount", default)]
	pub dead: i64,
	#[serde(rename = "heal", alias = "curedCount", default)]
	pub healed: i64,
}


#[derive(Debug, Clone, Deserialize)]
pub struct GlobalOverview {
	#[serde(rename = "continentDataList", default)]
	pub continents: Vec<ContinentRecord>,
}


/// Strip a JSONP `callback(...)` wrapper down to the inner JSON document.
pub fn strip_jsonp(raw: &str) -> Result<&str, SourceError> {
	let start = raw.find('(').ok_or(SourceError::MissingData("jsonp opening parenthesis"))?;
	let end = raw.rfind(')').ok_or(SourceError::MissingData("jsonp closing parenthesis"))?;
	if end <= start {
		return Err(SourceError::MissingData("jsonp parentheses out of order"))
	}
	Ok(&raw[start+1..end])
}

pub fn parse_snapshot(raw: &str) -> Result<Snapshot, SourceError> {
	let envelope: Envelope = serde_json::from_str(raw)?;
	Ok(serde_json::from_str(&envelope.data)?)
}

pub fn parse_daily(raw: &str) -> Result<DailyLists, SourceError> {
	let envelope: Envelope = serde_json::from_str(raw)?;
	Ok(serde_json::from_str(&envelope.data)?)
}

pub fn parse_overview(raw: &str) -> Result<GlobalOverview, SourceError> {
	Ok(serde_json::from_str(strip_jsonp(raw)?)?)
}


/// Endpoint set of one upstream provider; swapping this out is the only
/// thing distinguishing the fetch variants.
#[derive(Debug, Clone)]
pub struct SourceConfig {
	pub snapshot_url: String,
	pub daily_url: String,
	pub overview_url: String,
}

impl Default for SourceConfig {
	fn default() -> Self {
		Self{
			snapshot_url: "https://view.inews.qq.com/g2/getOnsInfo?name=disease_h5".into(),
			daily_url: "https://view.inews.qq.com/g2/getOnsInfo?name=disease_other".into(),
			overview_url: "https://cdn.mdeer.com/data/yqstaticdata.js?callback=callbackstaticdata".into(),
		}
	}
}


pub struct Client {
	client: reqwest::blocking::Client,
	config: SourceConfig,
}

impl Client {
	pub fn new() -> Self {
		Self::with_config(SourceConfig::default())
	}

	pub fn with_config(config: SourceConfig) -> Self {
		Self{
			client: reqwest::blocking::Client::new(),
			config,
		}
	}

	fn get_text(&self, url: &str) -> Result<String, SourceError> {
		debug!("fetching {}", url);
		let resp = self.client.get(url).send()?;
		Ok(resp.error_for_status()?.text()?)
	}

	pub fn fetch_snapshot(&self) -> Result<Snapshot, SourceError> {
		parse_snapshot(&self.get_text(&self.config.snapshot_url)?)
	}

	pub fn fetch_daily(&self) -> Result<DailyLists, SourceError> {
		parse_daily(&self.get_text(&self.config.daily_url)?)
	}

	pub fn fetch_overview(&self) -> Result<GlobalOverview, SourceError> {
		parse_overview(&self.get_text(&self.config.overview_url)?)
	}
}
