mod aliases;
mod bucket;
mod chart;
mod flatten;
mod ioutil;
mod map;
mod region;
mod seir;
mod series;
mod tencent;

pub use aliases::*;
pub use bucket::*;
pub use chart::*;
pub use flatten::*;
pub use ioutil::magic_open;
pub use map::*;
pub use region::*;
pub use seir::*;
pub use series::*;
pub use tencent::*;


/// Year the remote's year-less "M.D" day records are resolved against.
pub fn assumed_year() -> i32 {
	2020
}
