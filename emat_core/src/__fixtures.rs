use crate::ReportMapping;
use crate::template::ParameterSet;

pub fn vmt_report() -> &'static str {
	"\
Run VMT statistics
==Chicago==
--Weekday--
  Expressway VMT: 1234.5
  Arterial VMT:   987.25
--Weekend--
  Expressway VMT: 1000.0
==Cook balance==
--Weekday--
  Ramp/Toll VMT: 42
"
}

pub fn ej_report() -> &'static str {
	"\
==EJ==
--Work--
minority 0.25
low_income   0.125
==Regional==
total\t10
"
}

pub fn vht_report() -> &'static str {
	"\
Total VHT: 99.0
==Chicago==
--AM Peak--
Expressway VHT: 512.0
Arterial VHT: 256.5
==Cook balance==
--Midday--
Expressway VHT: 128.0
"
}

pub fn interchange_report() -> &'static str {
	"\
c Interchange travel times
Matrix mf44 amtime AM peak auto travel time
311 24:1.0 125:2.0 511:3.0 2049:4.0
312   24: 5.5   125: 6.25   511: 7.0   2049: 8.75  extra
Matrix mf45 mdtime midday auto travel time
311 24:10.0 125:20.0 511:30.0 2049:40.0
311 24:10.0 125:20.0 511:30.0
"
}

pub fn init_macro_template() -> &'static str {
	"\
~# EMAT initialization macro
~z=__EMAT_PROVIDES__parking__pricing__factor__
~y=__EMAT_PROVIDES__transit__fare__factor__
~x=__EMAT_PROVIDES__transit__fare__factor__
"
}

pub fn batch_file() -> &'static str {
	"\
global_loops: 3  # max 4 before the model crashes
land_use: base
"
}

pub fn project_config() -> &'static str {
	r#"
[[reports]]
path = "reports/run_vmt_statistics.rpt"
format = "tiered-colon"

[reports.measures]
Chicago_Expressway_VMT = "Chicago.Weekday.Expressway VMT"
Cook_balance_RampToll_VMT = "Cook balance.Weekday.Ramp/Toll VMT"

[[reports]]
path = "reports/interchange.txt"
format = "interchange"

[reports.measures]
AM_Time_311_to_24 = "mf44_amtime_311_to_24"

[[templates]]
source = "templates/init.mac.template"
destination = "macros/init.mac"
tokens = ["__parking__pricing__factor__", "__transit__fare__factor__"]

[[assignments]]
file = "batch_file.yml"
variable = "global_loops"
parameter = "global_loops"

[[assignments]]
file = "batch_file.yml"
variable = "land_use"
kind = "text"
parameter = "land_use"
"#
}

pub fn project_params() -> ParameterSet {
	ParameterSet::new()
		.with("__parking__pricing__factor__", 1.5)
		.with("__transit__fare__factor__", 0.75)
		.with("global_loops", 5)
		.with("land_use", "alt1")
}

pub fn mapping(entries: &[(&str, f64)]) -> ReportMapping {
	entries
		.iter()
		.map(|(key, value)| ((*key).to_string(), *value))
		.collect()
}

/// Write `files` under a fresh temporary directory.
pub fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	for (path, content) in files {
		let path = tmp.path().join(path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir: {e}"));
		}
		std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	}
	tmp
}
