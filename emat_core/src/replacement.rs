use regex::Captures;
use regex::Regex;

use crate::EmatError;
use crate::EmatResult;

/// The assignment operator used by the model's batch and cost files.
pub const DEFAULT_OPERATOR: &str = ":";

/// Signed integers, decimals with optional exponent, and `n/d` fractions.
const NUMBER: &str = r"[-+]?(?:[0-9]+/[0-9]+|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?)";

/// Result of rewriting assignments in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
	/// The rewritten text.
	pub text: String,
	/// How many assignments were rewritten. Zero usually means the variable
	/// name is misspelled.
	pub count: usize,
}

impl Substitution {
	pub fn is_noop(&self) -> bool {
		self.count == 0
	}
}

fn assignment_prefix(variable: &str, operator: &str) -> EmatResult<String> {
	if variable.trim().is_empty() {
		return Err(EmatError::InvalidPattern {
			variable: variable.to_string(),
			reason: "variable name is empty".to_string(),
		});
	}
	if operator.is_empty() {
		return Err(EmatError::InvalidPattern {
			variable: variable.to_string(),
			reason: "assignment operator is empty".to_string(),
		});
	}

	Ok(format!(
		"({}[ \\t]*{}[ \\t]*)",
		regex::escape(variable),
		regex::escape(operator)
	))
}

fn compile(variable: &str, pattern: &str) -> EmatResult<Regex> {
	Regex::new(pattern).map_err(|e| {
		EmatError::InvalidPattern {
			variable: variable.to_string(),
			reason: e.to_string(),
		}
	})
}

/// Rewrites the number assigned to a variable, e.g. `global_loops: 3`.
#[derive(Debug, Clone)]
pub struct NumberReplacement {
	variable: String,
	regex: Regex,
}

impl NumberReplacement {
	pub fn new(variable: &str, operator: &str) -> EmatResult<Self> {
		let prefix = assignment_prefix(variable, operator)?;
		let regex = compile(variable, &format!("{prefix}({NUMBER})"))?;

		Ok(Self {
			variable: variable.to_string(),
			regex,
		})
	}

	pub fn variable(&self) -> &str {
		&self.variable
	}

	/// Replace every assigned number in `text` with `value`.
	pub fn substitute(&self, value: impl std::fmt::Display, text: &str) -> Substitution {
		let value = value.to_string();
		let mut count = 0;
		let text = self
			.regex
			.replace_all(text, |caps: &Captures<'_>| {
				count += 1;
				format!("{}{value}", &caps[1])
			})
			.into_owned();

		tracing::info!(variable = %self.variable, count, "substitutions made");
		Substitution { text, count }
	}
}

/// Rewrites the free-text value assigned to a variable while keeping any
/// trailing `#` comment, e.g. `land_use: base  # or alt1`.
#[derive(Debug, Clone)]
pub struct TextReplacement {
	variable: String,
	regex: Regex,
}

impl TextReplacement {
	pub fn new(variable: &str, operator: &str) -> EmatResult<Self> {
		let prefix = assignment_prefix(variable, operator)?;
		let regex = compile(variable, &format!("{prefix}([^#\\r\\n]*)(#[^\\r\\n]*)?"))?;

		Ok(Self {
			variable: variable.to_string(),
			regex,
		})
	}

	pub fn variable(&self) -> &str {
		&self.variable
	}

	/// Replace every assigned value in `text` with `value`. A trailing comment
	/// is kept, separated from the new value by two spaces.
	pub fn substitute(&self, value: impl std::fmt::Display, text: &str) -> Substitution {
		let value = value.to_string();
		let mut count = 0;
		let text = self
			.regex
			.replace_all(text, |caps: &Captures<'_>| {
				count += 1;
				match caps.get(3) {
					Some(comment) => format!("{}{value}  {}", &caps[1], comment.as_str()),
					None => format!("{}{value}", &caps[1]),
				}
			})
			.into_owned();

		tracing::info!(variable = %self.variable, count, "substitutions made");
		Substitution { text, count }
	}
}

/// Which kind of value an assignment holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentKind {
	#[default]
	Number,
	Text,
}

/// Either replacement, chosen at runtime from configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Replacement {
	Number(NumberReplacement),
	Text(TextReplacement),
}

impl Replacement {
	pub fn new(kind: AssignmentKind, variable: &str, operator: &str) -> EmatResult<Self> {
		Ok(match kind {
			AssignmentKind::Number => Self::Number(NumberReplacement::new(variable, operator)?),
			AssignmentKind::Text => Self::Text(TextReplacement::new(variable, operator)?),
		})
	}

	pub fn substitute(&self, value: impl std::fmt::Display, text: &str) -> Substitution {
		match self {
			Self::Number(replacement) => replacement.substitute(value, text),
			Self::Text(replacement) => replacement.substitute(value, text),
		}
	}
}
