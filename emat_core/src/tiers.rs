use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::EmatError;
use crate::EmatResult;

/// The section markers used by the regional model's `.rpt` reports, from
/// outermost to innermost.
pub const DEFAULT_MARKERS: [&str; 2] = ["==", "--"];

/// An ordered set of two-character section markers, outermost first.
///
/// A report line such as `== Chicago ==` is a section heading when its
/// stripped content starts and ends with the same marker from this set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MarkerSet {
	markers: Vec<String>,
}

impl MarkerSet {
	/// Build a marker set, rejecting empty sets, markers that are not exactly
	/// two characters long, and duplicates.
	pub fn new<I, S>(markers: I) -> EmatResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let markers: Vec<String> = markers.into_iter().map(Into::into).collect();

		if markers.is_empty() {
			return Err(EmatError::InvalidMarkers(
				"at least one marker is required".to_string(),
			));
		}

		let mut seen = HashSet::new();
		for marker in &markers {
			if marker.chars().count() != 2 {
				return Err(EmatError::InvalidMarkers(format!(
					"`{marker}` is not exactly two characters"
				)));
			}
			if !seen.insert(marker.as_str()) {
				return Err(EmatError::InvalidMarkers(format!(
					"`{marker}` appears more than once"
				)));
			}
		}

		Ok(Self { markers })
	}

	/// The markers in depth order.
	pub fn markers(&self) -> &[String] {
		&self.markers
	}

	/// Classify a stripped line. Returns the heading when the line opens and
	/// closes with the same configured marker.
	pub fn section<'a>(&'a self, line: &'a str) -> Option<SectionMarker<'a>> {
		let marker = self
			.markers
			.iter()
			.find(|marker| line.starts_with(marker.as_str()) && line.ends_with(marker.as_str()))?;

		// Lines such as `===` share their delimiters and carry no name.
		let name = if line.len() >= marker.len() * 2 {
			line[marker.len()..line.len() - marker.len()].trim()
		} else {
			""
		};

		Some(SectionMarker { marker, name })
	}
}

impl Default for MarkerSet {
	fn default() -> Self {
		Self {
			markers: DEFAULT_MARKERS.iter().map(ToString::to_string).collect(),
		}
	}
}

impl TryFrom<Vec<String>> for MarkerSet {
	type Error = EmatError;

	fn try_from(markers: Vec<String>) -> EmatResult<Self> {
		Self::new(markers)
	}
}

impl From<MarkerSet> for Vec<String> {
	fn from(set: MarkerSet) -> Self {
		set.markers
	}
}

/// A section heading line: the marker that delimits it and the trimmed name
/// between the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarker<'a> {
	pub marker: &'a str,
	pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tier {
	/// `None` only for the root sentinel.
	marker: Option<String>,
	name: String,
}

/// The path of nested section names from the document root to the current
/// line.
///
/// The bottom entry is a sentinel root with no marker and no name; it is never
/// popped and never contributes to keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierStack {
	tiers: Vec<Tier>,
}

impl Default for TierStack {
	fn default() -> Self {
		Self::new()
	}
}

impl TierStack {
	pub fn new() -> Self {
		Self {
			tiers: vec![Tier {
				marker: None,
				name: String::new(),
			}],
		}
	}

	/// Number of named tiers above the root sentinel.
	pub fn depth(&self) -> usize {
		self.tiers.len() - 1
	}

	/// Marker of the innermost tier, `None` at the root.
	pub fn top_marker(&self) -> Option<&str> {
		self.tiers.last().and_then(|tier| tier.marker.as_deref())
	}

	/// Whether any open tier uses `marker`.
	pub fn contains(&self, marker: &str) -> bool {
		self.tiers
			.iter()
			.any(|tier| tier.marker.as_deref() == Some(marker))
	}

	/// Push a new innermost tier.
	pub fn descend(&mut self, marker: &str, name: &str) {
		self.tiers.push(Tier {
			marker: Some(marker.to_string()),
			name: name.to_string(),
		});
	}

	/// Replace the innermost tier's name: a sibling section at the same depth.
	/// Does nothing at the root.
	pub fn rename(&mut self, name: &str) {
		if self.depth() == 0 {
			return;
		}
		if let Some(top) = self.tiers.last_mut() {
			top.name = name.to_string();
		}
	}

	/// Pop tiers until the innermost one uses `marker`, then rename it. When no
	/// open tier uses `marker` the stack unwinds to the root and the section is
	/// pushed as a new tier.
	pub fn return_to_tier(&mut self, marker: &str, name: &str) {
		while self.depth() > 0 && self.top_marker() != Some(marker) {
			self.tiers.pop();
		}

		if self.top_marker() == Some(marker) {
			self.rename(name);
		} else {
			self.descend(marker, name);
		}
	}

	/// Apply a heading line to the stack.
	pub fn enter(&mut self, section: SectionMarker<'_>) {
		if self.top_marker() == Some(section.marker) {
			self.rename(section.name);
		} else if self.contains(section.marker) {
			self.return_to_tier(section.marker, section.name);
		} else {
			self.descend(section.marker, section.name);
		}
	}

	/// The named tiers root-to-current followed by `leaf`, joined by dots.
	pub fn key(&self, leaf: &str) -> String {
		self.tiers
			.iter()
			.skip(1)
			.map(|tier| tier.name.as_str())
			.chain(std::iter::once(leaf))
			.collect::<Vec<_>>()
			.join(".")
	}
}
