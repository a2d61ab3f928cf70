use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum EmatError {
	#[error(transparent)]
	#[diagnostic(code(emat::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(emat::config_parse),
		help("check that emat.toml is valid TOML with [[reports]], [[templates]] and/or [[assignments]] tables")
	)]
	ConfigParse(String),

	#[error("invalid section marker set: {0}")]
	#[diagnostic(
		code(emat::invalid_markers),
		help("markers must be unique two-character strings, e.g. [\"==\", \"--\"]")
	)]
	InvalidMarkers(String),

	#[error("line {line_number}: `{value}` is not a number in `{line}`")]
	#[diagnostic(
		code(emat::invalid_number),
		help("every line containing the separator must end in a numeric value")
	)]
	InvalidNumber {
		line_number: usize,
		line: String,
		value: String,
	},

	#[error("failed to parse report `{path}`")]
	#[diagnostic(code(emat::report))]
	Report {
		path: String,
		#[source]
		source: Box<EmatError>,
	},

	#[error("failed to read `{path}`")]
	#[diagnostic(code(emat::read_file))]
	ReadFile {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to write `{path}`")]
	#[diagnostic(code(emat::write_file))]
	WriteFile {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to render template `{path}`")]
	#[diagnostic(code(emat::template))]
	Template {
		path: String,
		#[source]
		source: Box<EmatError>,
	},

	#[error("measure `{measure}` is defined by more than one report (`{first}` and `{second}`)")]
	#[diagnostic(
		code(emat::duplicate_measure),
		help("measure names must be unique across all [[reports]] tables")
	)]
	DuplicateMeasure {
		measure: String,
		first: String,
		second: String,
	},

	#[error("missing required parameter `{0}`")]
	#[diagnostic(
		code(emat::missing_parameter),
		help("add `{0}` to the parameter file passed to `emat render`")
	)]
	MissingParameter(String),

	#[error("invalid template token name: `{0}`")]
	#[diagnostic(code(emat::invalid_token), help("token names must not be empty"))]
	InvalidTokenName(String),

	#[error("invalid assignment pattern for variable `{variable}`: {reason}")]
	#[diagnostic(code(emat::invalid_pattern))]
	InvalidPattern { variable: String, reason: String },

	#[error("measure `{measure}` refers to missing report key `{key}`")]
	#[diagnostic(
		code(emat::missing_report_key),
		help("run `emat parse` on the report to list the keys it provides")
	)]
	MissingReportKey { measure: String, key: String },

	#[error("failed to load parameter file `{path}`: {reason}")]
	#[diagnostic(code(emat::parameter_file))]
	ParameterFile { path: String, reason: String },

	#[error("unsupported parameter file format: `{0}`")]
	#[diagnostic(
		code(emat::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedParameterFormat(String),

	#[error("unsupported value for parameter `{name}` in `{path}`: {value}")]
	#[diagnostic(
		code(emat::unsupported_value),
		help("parameters must be integers, floats, or strings")
	)]
	UnsupportedParameterValue {
		path: String,
		name: String,
		value: String,
	},
}

pub type EmatResult<T> = Result<T, EmatError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
