use std::sync::LazyLock;

use regex::Regex;

use crate::EmatError;
use crate::EmatResult;
use crate::report::ReportMapping;

const MATRIX_HEADER: &str = r"^Matrix\s+(\S+)\s+(\S+)";

/// An origin followed by exactly four `destination:value` pairs.
const ORIGIN_DESTINATION_VALUES: &str = r"(?x)
	^\s*
	([0-9]+)                                  # origin
	\s+([0-9]+)\s*:\s*([0-9]+\.[0-9]+)        # destination:value
	\s+([0-9]+)\s*:\s*([0-9]+\.[0-9]+)
	\s+([0-9]+)\s*:\s*([0-9]+\.[0-9]+)
	\s+([0-9]+)\s*:\s*([0-9]+\.[0-9]+)
";

static HEADER: LazyLock<Regex> = LazyLock::new(|| compile(MATRIX_HEADER));
static ROW: LazyLock<Regex> = LazyLock::new(|| compile(ORIGIN_DESTINATION_VALUES));

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|e| panic!("invalid interchange pattern: {e}"))
}

/// Parser for interchange reports made of named matrices:
///
/// ```text
/// Matrix mf44 amtime  AM peak travel time
/// 311 24:1.0 125:2.0 511:3.0 2049:4.0
/// ```
///
/// Every data line yields four entries keyed
/// `<id>_<label>_<origin>_to_<destination>`. Lines of any other shape are
/// skipped, and data seen before the first header is keyed with an empty
/// matrix name.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterchangeParser;

impl InterchangeParser {
	pub fn new() -> Self {
		Self
	}

	pub fn parse_lines<I, S>(&self, lines: I) -> EmatResult<ReportMapping>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut result = ReportMapping::new();
		let mut matrix = String::new();

		for (index, line) in lines.into_iter().enumerate() {
			let line = line.as_ref().trim();

			if let Some(header) = HEADER.captures(line) {
				matrix = format!("{}_{}", &header[1], &header[2]);
			}

			let Some(row) = ROW.captures(line) else {
				continue;
			};
			let origin = &row[1];
			for pair in 0..4 {
				let destination = &row[2 + pair * 2];
				let value = parse_value(&row[3 + pair * 2], line, index + 1)?;
				result.insert(format!("{matrix}_{origin}_to_{destination}"), value);
			}
		}

		Ok(result)
	}

	pub fn parse(&self, content: impl AsRef<str>) -> EmatResult<ReportMapping> {
		self.parse_lines(content.as_ref().lines())
	}
}

fn parse_value(value: &str, line: &str, line_number: usize) -> EmatResult<f64> {
	value.parse().map_err(|_| {
		EmatError::InvalidNumber {
			line_number,
			line: line.to_string(),
			value: value.to_string(),
		}
	})
}
