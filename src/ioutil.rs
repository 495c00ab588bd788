use std::io;
use std::io::Read;
use std::fs;
use std::path::Path;

use flate2;


/// Open a local data file, transparently gunzipping by extension. The
/// geographic reference CSV is usually shipped compressed.
pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	let f = fs::File::open(path)?;
	if path.extension().map_or(false, |x| x == "gz") {
		Ok(Box::new(flate2::read::GzDecoder::new(f)))
	} else {
		Ok(Box::new(f))
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_open_plain_and_gz() {
		let dir = std::env::temp_dir();
		let contents = b"province,city\n\xe5\x90\x89\xe6\x9e\x97\xe7\x9c\x81,\xe5\x90\x89\xe6\x9e\x97\xe5\xb8\x82\n";

		let plain = dir.join("epimap_regions.csv");
		fs::write(&plain, &contents[..]).unwrap();
		let mut buf = Vec::new();
		magic_open(&plain).unwrap().read_to_end(&mut buf).unwrap();
		assert_eq!(buf, contents);

		let gz = dir.join("epimap_regions.csv.gz");
		let mut enc = flate2::write::GzEncoder::new(
			fs::File::create(&gz).unwrap(),
			flate2::Compression::default(),
		);
		enc.write_all(&contents[..]).unwrap();
		enc.finish().unwrap();
		let mut buf = Vec::new();
		magic_open(&gz).unwrap().read_to_end(&mut buf).unwrap();
		assert_eq!(buf, contents);
	}

	#[test]
	fn test_open_missing_file_fails() {
		assert!(magic_open(std::env::temp_dir().join("epimap_no_such_file.csv")).is_err());
	}
}
