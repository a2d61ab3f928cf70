use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

use crate::EmatError;
use crate::EmatResult;

/// The prefix that marks a placeholder in model input templates, e.g.
/// `__EMAT_PROVIDES__transit__fare__factor__`.
pub const DEFAULT_TOKEN_PREFIX: &str = "__EMAT_PROVIDES";

/// A parameter value stamped into a template.
///
/// ```toml
/// __transit__fare__factor__ = 1.25
/// __base__fare__cta__ = 188
/// land_use = "alt1"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ParamValue {
	/// Integers print without a decimal point, e.g. `188`.
	Integer(i64),
	/// Floats print in their shortest round-trip form, e.g. `0.53`.
	Number(OrderedFloat),
	/// Text is substituted verbatim.
	Text(String),
}

impl std::fmt::Display for ParamValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Integer(value) => write!(f, "{value}"),
			Self::Number(value) => write!(f, "{value}"),
			Self::Text(value) => write!(f, "{value}"),
		}
	}
}

impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<i32> for ParamValue {
	fn from(value: i32) -> Self {
		Self::Integer(i64::from(value))
	}
}

impl From<f64> for ParamValue {
	fn from(value: f64) -> Self {
		Self::Number(OrderedFloat(value))
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// A float wrapper that implements `PartialEq` via approximate comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
	fn eq(&self, other: &Self) -> bool {
		float_cmp::approx_eq!(f64, self.0, other.0)
	}
}

impl std::fmt::Display for OrderedFloat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Parameter values keyed by token name, supplied fresh for every render.
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(pub BTreeMap<String, ParamValue>);

impl ParameterSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value, returning `self` for chaining.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.0.insert(name.into(), value.into());
		self
	}
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
	K: Into<String>,
	V: Into<ParamValue>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}

/// Stamps parameter values into a template by literal replacement of
/// `<prefix><token>` placeholders.
///
/// Every listed token is required. Rendering stops at the first token missing
/// from the parameter set and returns no text, so an un-substituted
/// placeholder never reaches the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTemplate {
	prefix: String,
	tokens: Vec<String>,
}

impl TokenTemplate {
	/// Create an engine for the given required tokens using
	/// [`DEFAULT_TOKEN_PREFIX`].
	pub fn new<I, S>(tokens: I) -> EmatResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::with_prefix(DEFAULT_TOKEN_PREFIX, tokens)
	}

	pub fn with_prefix<I, S>(prefix: impl Into<String>, tokens: I) -> EmatResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
		if let Some(empty) = tokens.iter().find(|token| token.trim().is_empty()) {
			return Err(EmatError::InvalidTokenName(empty.clone()));
		}

		Ok(Self {
			prefix: prefix.into(),
			tokens,
		})
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// The literal placeholder text for `token`.
	pub fn placeholder(&self, token: &str) -> String {
		format!("{}{token}", self.prefix)
	}

	/// Replace every placeholder in `template`.
	pub fn render(&self, template: &str, params: &ParameterSet) -> EmatResult<String> {
		let mut output = template.to_string();

		for token in &self.tokens {
			let Some(value) = params.get(token) else {
				return Err(EmatError::MissingParameter(token.clone()));
			};

			output = output.replace(&self.placeholder(token), &value.to_string());
		}

		Ok(output)
	}
}
