use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

use crate::EmatError;
use crate::EmatResult;
use crate::report::ReportMapping;

/// Performance measure values keyed by measure name.
pub type MeasureValues = BTreeMap<String, f64>;

/// Maps performance measure names onto keys of a parsed report.
///
/// ```toml
/// [reports.measures]
/// Chicago_Expressway_VMT = "Chicago.Expressway VMT"
/// Cook_balance_RampToll_VMT = "Cook balance.Ramp/Toll VMT"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureMap(pub BTreeMap<String, String>);

impl MeasureMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Look up every measure in `report`. A measure whose key is absent fails
	/// the whole extraction.
	pub fn extract(&self, report: &ReportMapping) -> EmatResult<MeasureValues> {
		self.iter()
			.map(|(measure, key)| {
				report
					.get(key)
					.map(|value| (measure.clone(), *value))
					.ok_or_else(|| {
						EmatError::MissingReportKey {
							measure: measure.clone(),
							key: key.clone(),
						}
					})
			})
			.collect()
	}
}

impl<K, V> FromIterator<(K, V)> for MeasureMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(measure, key)| (measure.into(), key.into()))
				.collect(),
		)
	}
}
