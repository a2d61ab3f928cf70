use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::EmatError;
use crate::EmatResult;
use crate::measures::MeasureMap;
use crate::replacement::AssignmentKind;
use crate::replacement::DEFAULT_OPERATOR;
use crate::template::DEFAULT_TOKEN_PREFIX;
use crate::template::OrderedFloat;
use crate::template::ParamValue;
use crate::template::ParameterSet;
use crate::tiers::MarkerSet;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["emat.toml", ".emat.toml", ".config/emat.toml"];

/// Configuration loaded from an `emat.toml` file.
///
/// ```toml
/// markers = ["==", "--"]
/// token_prefix = "__EMAT_PROVIDES"
///
/// [[reports]]
/// path = "Database/report/run_vmt_statistics.rpt"
/// format = "tiered-colon"
///
/// [reports.measures]
/// Chicago_Expressway_VMT = "Chicago.Expressway VMT"
///
/// [[templates]]
/// source = "templates/skim.transit.all.template"
/// destination = "Database/macros/call/skim.transit.all"
/// tokens = ["__base__fare__cta__", "__base__fare__pace__"]
///
/// [[assignments]]
/// file = "Database/batch_file.yml"
/// variable = "global_loops"
/// parameter = "global_loops"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmatConfig {
	/// Section markers from outermost to innermost. Defaults to `==` then
	/// `--`.
	#[serde(default)]
	pub markers: MarkerSet,
	/// Prefix that marks template placeholders.
	#[serde(default = "default_token_prefix")]
	pub token_prefix: String,
	/// Report files to scrape after a model run.
	#[serde(default)]
	pub reports: Vec<ReportConfig>,
	/// Templates to instantiate before a model run.
	#[serde(default)]
	pub templates: Vec<TemplateConfig>,
	/// Assignments to rewrite in place before a model run.
	#[serde(default)]
	pub assignments: Vec<AssignmentConfig>,
}

impl Default for EmatConfig {
	fn default() -> Self {
		Self {
			markers: MarkerSet::default(),
			token_prefix: default_token_prefix(),
			reports: Vec::new(),
			templates: Vec::new(),
			assignments: Vec::new(),
		}
	}
}

fn default_token_prefix() -> String {
	DEFAULT_TOKEN_PREFIX.to_string()
}

fn default_operator() -> String {
	DEFAULT_OPERATOR.to_string()
}

/// The layout of a report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ReportFormat {
	/// Marker-outlined sections with `key: value` leaves.
	TieredColon,
	/// Marker-outlined sections with `key value` leaves.
	TieredSpace,
	/// Two adjacent heading lines per group with `key: value` leaves.
	DoubleTier,
	/// Named matrices of origin/destination values.
	Interchange,
}

impl std::fmt::Display for ReportFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::TieredColon => write!(f, "tiered-colon"),
			Self::TieredSpace => write!(f, "tiered-space"),
			Self::DoubleTier => write!(f, "double-tier"),
			Self::Interchange => write!(f, "interchange"),
		}
	}
}

/// A report to scrape and the measures it provides.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
	/// Path relative to the project root.
	pub path: PathBuf,
	pub format: ReportFormat,
	#[serde(default)]
	pub measures: MeasureMap,
}

/// A template and the file it is rendered into.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
	/// Template path relative to the project root.
	pub source: PathBuf,
	/// Output path relative to the project root.
	pub destination: PathBuf,
	/// Every token the template requires.
	pub tokens: Vec<String>,
}

/// An assignment rewritten in a model input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentConfig {
	/// File path relative to the project root.
	pub file: PathBuf,
	/// Variable name as written in the file.
	pub variable: String,
	#[serde(default = "default_operator")]
	pub operator: String,
	#[serde(default)]
	pub kind: AssignmentKind,
	/// Name of the parameter that supplies the new value.
	pub parameter: String,
}

impl EmatConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> EmatResult<Option<EmatConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = crate::read_file(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse config file content.
	pub fn parse(content: &str) -> EmatResult<EmatConfig> {
		let config: EmatConfig =
			toml::from_str(content).map_err(|e| EmatError::ConfigParse(e.to_string()))?;
		config.validate()?;

		Ok(config)
	}

	/// Check that every measure name is provided by exactly one report.
	pub fn validate(&self) -> EmatResult<()> {
		let mut seen: BTreeMap<&str, &Path> = BTreeMap::new();

		for report in &self.reports {
			for measure in report.measures.keys() {
				if let Some(first) = seen.insert(measure.as_str(), report.path.as_path()) {
					return Err(EmatError::DuplicateMeasure {
						measure: measure.clone(),
						first: first.display().to_string(),
						second: report.path.display().to_string(),
					});
				}
			}
		}

		Ok(())
	}
}

/// Load a parameter file into a [`ParameterSet`]. The format is chosen by
/// extension: `json`, `toml`, `yaml` or `yml`.
pub fn load_parameters(path: &Path) -> EmatResult<ParameterSet> {
	let path_display = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		EmatError::ParameterFile {
			path: path_display.clone(),
			reason: e.to_string(),
		}
	})?;
	let format = path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();

	parse_parameters(&content, &format, &path_display)
}

/// Parse parameter file content in the given format. The top level must be a
/// table of integers, floats and strings.
pub fn parse_parameters(
	content: &str,
	format: &str,
	path_display: &str,
) -> EmatResult<ParameterSet> {
	let file_error = |reason: String| {
		EmatError::ParameterFile {
			path: path_display.to_string(),
			reason,
		}
	};

	let table: serde_json::Map<String, serde_json::Value> = match format {
		"json" => serde_json::from_str(content).map_err(|e| file_error(e.to_string()))?,
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| file_error(e.to_string()))?,
		"toml" => {
			let table: toml::Table =
				toml::from_str(content).map_err(|e| file_error(e.to_string()))?;
			return table
				.into_iter()
				.map(|(name, value)| {
					let value = toml_to_param(&name, value, path_display)?;
					Ok((name, value))
				})
				.collect::<EmatResult<Vec<_>>>()
				.map(ParameterSet::from_iter);
		}
		other => return Err(EmatError::UnsupportedParameterFormat(other.to_string())),
	};

	table
		.into_iter()
		.map(|(name, value)| {
			let value = json_to_param(&name, value, path_display)?;
			Ok((name, value))
		})
		.collect::<EmatResult<Vec<_>>>()
		.map(ParameterSet::from_iter)
}

fn json_to_param(
	name: &str,
	value: serde_json::Value,
	path_display: &str,
) -> EmatResult<ParamValue> {
	match value {
		serde_json::Value::String(s) => Ok(ParamValue::Text(s)),
		serde_json::Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Ok(ParamValue::Integer(i))
			} else if let Some(f) = n.as_f64() {
				Ok(ParamValue::Number(OrderedFloat(f)))
			} else {
				Err(unsupported_value(name, &n.to_string(), path_display))
			}
		}
		other => Err(unsupported_value(name, &other.to_string(), path_display)),
	}
}

fn toml_to_param(name: &str, value: toml::Value, path_display: &str) -> EmatResult<ParamValue> {
	match value {
		toml::Value::String(s) => Ok(ParamValue::Text(s)),
		toml::Value::Integer(i) => Ok(ParamValue::Integer(i)),
		toml::Value::Float(f) => Ok(ParamValue::Number(OrderedFloat(f))),
		other => Err(unsupported_value(name, &other.to_string(), path_display)),
	}
}

fn unsupported_value(name: &str, value: &str, path_display: &str) -> EmatError {
	EmatError::UnsupportedParameterValue {
		path: path_display.to_string(),
		name: name.to_string(),
		value: value.to_string(),
	}
}
