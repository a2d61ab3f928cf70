use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

use crate::EmatError;
use crate::EmatResult;
use crate::tiers::MarkerSet;
use crate::tiers::TierStack;

/// A flat mapping from dotted report keys to numeric values.
///
/// Keys are unique; a later line with the same key overwrites the earlier
/// value.
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportMapping(pub BTreeMap<String, f64>);

impl ReportMapping {
	pub fn new() -> Self {
		Self::default()
	}
}

impl FromIterator<(String, f64)> for ReportMapping {
	fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// How a leaf line separates its key from its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Separator {
	/// `Total VMT: 1234.5`
	#[default]
	Colon,
	/// `minority 0.25`, split on the first whitespace character.
	Whitespace,
}

impl Separator {
	/// Split on the first occurrence of the separator.
	pub fn split(self, line: &str) -> Option<(&str, &str)> {
		let index = match self {
			Self::Colon => line.find(':')?,
			Self::Whitespace => line.find(char::is_whitespace)?,
		};
		let separator_len = line[index..].chars().next().map_or(1, char::len_utf8);

		Some((&line[..index], &line[index + separator_len..]))
	}
}

impl std::fmt::Display for Separator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Colon => write!(f, "colon"),
			Self::Whitespace => write!(f, "whitespace"),
		}
	}
}

/// Split a leaf line and parse its value. `None` when the line has no
/// separator.
fn leaf<'a>(
	line: &'a str,
	separator: Separator,
	line_number: usize,
) -> EmatResult<Option<(&'a str, f64)>> {
	let Some((key, value)) = separator.split(line) else {
		return Ok(None);
	};
	let value = value.trim();
	let parsed = value
		.parse::<f64>()
		.map_err(|_| EmatError::InvalidNumber {
			line_number,
			line: line.to_string(),
			value: value.to_string(),
		})?;

	Ok(Some((key.trim(), parsed)))
}

/// Parser for reports that outline their sections with repeated marker
/// characters:
///
/// ```text
/// ==Chicago==
/// --Weekday--
/// Expressway VMT: 1234.5
/// ```
///
/// produces `Chicago.Weekday.Expressway VMT = 1234.5`.
#[derive(Debug, Clone, Default)]
pub struct TieredParser {
	markers: MarkerSet,
	separator: Separator,
}

impl TieredParser {
	pub fn new(markers: MarkerSet, separator: Separator) -> Self {
		Self { markers, separator }
	}

	/// Parser for `key: value` reports such as `run_vmt_statistics.rpt`.
	pub fn colon(markers: MarkerSet) -> Self {
		Self::new(markers, Separator::Colon)
	}

	/// Parser for `key value` reports such as `report_ej.txt`.
	pub fn whitespace(markers: MarkerSet) -> Self {
		Self::new(markers, Separator::Whitespace)
	}

	pub fn separator(&self) -> Separator {
		self.separator
	}

	/// Parse a sequence of lines. Any line containing the separator must carry
	/// a numeric value; the first that does not aborts the parse.
	pub fn parse_lines<I, S>(&self, lines: I) -> EmatResult<ReportMapping>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut stack = TierStack::new();
		let mut result = ReportMapping::new();

		for (index, line) in lines.into_iter().enumerate() {
			let line = line.as_ref().trim();

			if let Some(section) = self.markers.section(line) {
				stack.enter(section);
			}

			// A heading can also hold the separator, so both checks apply.
			if let Some((key, value)) = leaf(line, self.separator, index + 1)? {
				result.insert(stack.key(key), value);
			}
		}

		Ok(result)
	}

	pub fn parse(&self, content: impl AsRef<str>) -> EmatResult<ReportMapping> {
		self.parse_lines(content.as_ref().lines())
	}
}

/// Parser for reports that head each group with exactly two marker lines, a
/// category followed by a subcategory:
///
/// ```text
/// ==Chicago==
/// --AM Peak--
/// VHT: 512.0
/// ```
///
/// produces `Chicago.AM Peak.VHT = 512.0`. The prefix is only set when two
/// heading lines are adjacent, and leaf lines before the first such pair are
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct DoubleTierParser {
	markers: MarkerSet,
	separator: Separator,
}

impl DoubleTierParser {
	pub fn new(markers: MarkerSet, separator: Separator) -> Self {
		Self { markers, separator }
	}

	pub fn parse_lines<I, S>(&self, lines: I) -> EmatResult<ReportMapping>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut result = ReportMapping::new();
		let mut prefix: Option<String> = None;
		let mut previous = String::new();

		for (index, line) in lines.into_iter().enumerate() {
			let line = line.as_ref().trim();

			if let Some(current) = self.markers.section(line) {
				if let Some(category) = self.markers.section(&previous) {
					prefix = Some(format!("{}.{}", category.name, current.name));
				}
			}

			if let Some(prefix) = &prefix {
				if let Some((key, value)) = leaf(line, self.separator, index + 1)? {
					result.insert(format!("{prefix}.{key}"), value);
				}
			}

			line.clone_into(&mut previous);
		}

		Ok(result)
	}

	pub fn parse(&self, content: impl AsRef<str>) -> EmatResult<ReportMapping> {
		self.parse_lines(content.as_ref().lines())
	}
}
