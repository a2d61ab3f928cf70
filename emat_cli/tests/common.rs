#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn emat_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("emat"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub const VMT_REPORT: &str = "\
==Chicago==
--Weekday--
Expressway VMT: 1234.5
Arterial VMT: 987.25
==Cook balance==
--Weekday--
Ramp/Toll VMT: 42
";

pub const BATCH_FILE: &str = "global_loops: 3  # max 4\nland_use: base  # or alt1\n";

/// Write `content` to `root/path`, creating parent directories.
pub fn write(root: &Path, path: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(path);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}
