use std::collections::HashMap;

use once_cell::sync::Lazy;

use smartstring::alias::{String as SmartString};

use super::region::GeoIndex;


/// Placeholder child names meaning "cases not yet attributed to a city".
pub const UNRESOLVED_SENTINELS: [&str; 2] = ["地区待确认", "地区待确定"];

/// The one province reported without city subdivisions in the source data.
pub const TIBET: &str = "西藏";
pub const TIBET_CAPITAL: &str = "拉萨市";

/// Cruise ship entry in the world tree, folded into the Japan mainland count.
pub const DIAMOND_PRINCESS: &str = "钻石号邮轮";
pub const JAPAN_MAINLAND: &str = "日本本土";

/// Province-level names that are themselves cities (municipalities and SARs).
pub static DIRECT_CITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert("重庆", "重庆市");
	m.insert("北京", "北京市");
	m.insert("天津", "天津市");
	m.insert("上海", "上海市");
	m.insert("香港", "香港");
	m.insert("澳门", "澳门");
	m.insert("台湾", "台湾");
	m
});

/// Irregular source names (corps districts, renamed or abbreviated cities)
/// mapped to the canonical city carrying their counts.
pub static SPECIAL_CITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert("兵团第四师", "伊犁州");
	m.insert("兵团第九师", "塔城市");
	m.insert("兴安盟乌兰浩特", "乌兰浩特市");
	m.insert("济源示范区", "济源市");
	m.insert("湘西自治州", "吉首市");
	m.insert("普洱", "思茅市");
	m.insert("黔西南州", "兴义市");
	m.insert("第八师石河子", "石河子市");
	m.insert("兵团第十二师", "乌鲁木齐");
	m.insert("六师五家渠", "五家渠市");
	m.insert("第七师", "胡杨河市");
	m.insert("宁东管委会", "银川市");
	m.insert("赣江新区", "南昌市");
	m.insert("菏泽", "菏泽市");
	m
});

/// Fixups for labels as they appear in the China city shapefile. The
/// geometry source predates several renamings and carries a few typos.
pub static MAP_LABEL_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert("大庸市", "张家界市");
	m.insert("株州市", "株洲市");
	m.insert("浑江市", "白城市");
	m.insert("巢湖市", "合肥市");
	m.insert("莱芜市", "济南市");
	m.insert("崇明県", "上海市");
	m.insert("丽江纳西族自治县", "丽江市");
	m.insert("达川市", "达州市");
	m.insert("库尔勒市", "巴州");
	m.insert("叶鲁番市", "吐鲁番地区");
	m.insert("阿勒泰市", "伊犁州");
	m.insert("烏海市", "乌海市");
	m.insert("沙湾县", "塔城市");
	m
});

/// Taiwanese county labels in the shapefile; no per-city counts exist for
/// these, they are rendered at a fixed band instead.
pub static TAIWAN_COUNTIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
	vec![
		"基隆市", "台北市", "桃园县", "宜兰县", "新竹县", "苗栗县", "台中县",
		"莲花县", "金门县", "南投县", "台中市", "彰化县", "云林县", "嘉义县",
		"台东县", "凤山县", "诏安县", "台南县", "南澳县", "台南市", "屏东县",
		"高雄市", "台北县",
	]
});


pub fn is_unresolved_sentinel(name: &str) -> bool {
	UNRESOLVED_SENTINELS.iter().any(|s| *s == name)
}

/// Resolve a free-text city name to its canonical map key.
///
/// Resolution order: the static exception table, then the geographic
/// reference index, then the raw name unmodified. Idempotent for names
/// that are already canonical.
pub fn resolve_city(index: &GeoIndex, province: Option<&str>, city: &str) -> SmartString {
	if let Some(canonical) = SPECIAL_CITIES.get(city) {
		return (*canonical).into()
	}
	match index.search(province, Some(city)) {
		Some(canonical) => canonical.into(),
		None => city.into(),
	}
}
