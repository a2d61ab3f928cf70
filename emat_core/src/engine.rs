use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use crate::EmatError;
use crate::EmatResult;
use crate::config::EmatConfig;
use crate::config::ReportFormat;
use crate::interchange::InterchangeParser;
use crate::measures::MeasureValues;
use crate::replacement::Replacement;
use crate::report::DoubleTierParser;
use crate::report::ReportMapping;
use crate::report::Separator;
use crate::report::TieredParser;
use crate::template::ParameterSet;
use crate::template::TokenTemplate;
use crate::tiers::MarkerSet;

/// A project root together with its loaded configuration.
#[derive(Debug)]
pub struct ProjectContext {
	pub root: PathBuf,
	pub config: EmatConfig,
}

impl ProjectContext {
	pub fn new(root: impl Into<PathBuf>, config: EmatConfig) -> Self {
		Self {
			root: root.into(),
			config,
		}
	}

	/// Load `emat.toml` (or another candidate) from `root`, falling back to
	/// the default configuration when none exists.
	pub fn load(root: impl Into<PathBuf>) -> EmatResult<Self> {
		let root = root.into();
		let config = EmatConfig::load(&root)?.unwrap_or_default();
		Ok(Self { root, config })
	}
}

/// An assignment rewrite that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentWarning {
	/// File the assignment was applied to.
	pub file: PathBuf,
	/// The variable that was not found.
	pub variable: String,
}

/// Outputs computed for a model run, not yet written to disk.
#[derive(Debug, Default)]
pub struct RenderResult {
	/// Files to write and their new content.
	pub files: BTreeMap<PathBuf, String>,
	/// Number of assignments rewritten across all files.
	pub substitution_count: usize,
	/// Assignment rewrites that matched nothing.
	pub warnings: Vec<AssignmentWarning>,
}

impl RenderResult {
	pub fn has_warnings(&self) -> bool {
		!self.warnings.is_empty()
	}
}

/// Parse report text in the given format.
pub fn parse_report(
	format: ReportFormat,
	content: &str,
	markers: &MarkerSet,
) -> EmatResult<ReportMapping> {
	match format {
		ReportFormat::TieredColon => TieredParser::colon(markers.clone()).parse(content),
		ReportFormat::TieredSpace => TieredParser::whitespace(markers.clone()).parse(content),
		ReportFormat::DoubleTier => {
			DoubleTierParser::new(markers.clone(), Separator::Colon).parse(content)
		}
		ReportFormat::Interchange => InterchangeParser::new().parse(content),
	}
}

/// Read a file to a string. Errors name the file.
pub fn read_file(path: &Path) -> EmatResult<String> {
	std::fs::read_to_string(path).map_err(|source| {
		EmatError::ReadFile {
			path: path.display().to_string(),
			source,
		}
	})
}

/// Read and parse a report file. Errors are wrapped with the file's path.
pub fn parse_report_file(
	path: &Path,
	format: ReportFormat,
	markers: &MarkerSet,
) -> EmatResult<ReportMapping> {
	let wrap = |source: EmatError| {
		EmatError::Report {
			path: path.display().to_string(),
			source: Box::new(source),
		}
	};

	let content = std::fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
	let mapping = parse_report(format, &content, markers).map_err(wrap)?;
	tracing::debug!(path = %path.display(), %format, keys = mapping.len(), "parsed report");

	Ok(mapping)
}

/// Parse every configured report and collect its measures. Measure names
/// are unique across reports once the config has passed
/// [`EmatConfig::validate`].
pub fn load_measures(ctx: &ProjectContext) -> EmatResult<MeasureValues> {
	let mut values = MeasureValues::new();

	for report in &ctx.config.reports {
		let path = ctx.root.join(&report.path);
		let mapping = parse_report_file(&path, report.format, &ctx.config.markers)?;
		values.extend(report.measures.extract(&mapping)?);
	}

	Ok(values)
}

/// Render every configured template and apply every configured assignment.
/// Nothing is written; see [`write_outputs`].
pub fn compute_outputs(ctx: &ProjectContext, params: &ParameterSet) -> EmatResult<RenderResult> {
	let mut result = RenderResult::default();

	for template in &ctx.config.templates {
		let engine =
			TokenTemplate::with_prefix(ctx.config.token_prefix.as_str(), &template.tokens)?;
		let source_path = ctx.root.join(&template.source);
		let source = read_file(&source_path)?;
		let rendered = engine.render(&source, params).map_err(|source| {
			EmatError::Template {
				path: source_path.display().to_string(),
				source: Box::new(source),
			}
		})?;
		let destination = ctx.root.join(&template.destination);

		tracing::debug!(
			source = %template.source.display(),
			destination = %template.destination.display(),
			"rendered template"
		);
		result.files.insert(destination, rendered);
	}

	for assignment in &ctx.config.assignments {
		let Some(value) = params.get(&assignment.parameter) else {
			return Err(EmatError::MissingParameter(assignment.parameter.clone()));
		};
		let replacement =
			Replacement::new(assignment.kind, &assignment.variable, &assignment.operator)?;
		let file = ctx.root.join(&assignment.file);
		let current = match result.files.get(&file) {
			Some(pending) => pending.clone(),
			None => read_file(&file)?,
		};

		let substitution = replacement.substitute(value, &current);
		if substitution.is_noop() {
			tracing::warn!(
				file = %assignment.file.display(),
				variable = %assignment.variable,
				"assignment matched nothing"
			);
			result.warnings.push(AssignmentWarning {
				file: file.clone(),
				variable: assignment.variable.clone(),
			});
		}
		result.substitution_count += substitution.count;
		result.files.insert(file, substitution.text);
	}

	Ok(result)
}

/// Write computed outputs to disk, creating parent directories as needed.
pub fn write_outputs(result: &RenderResult) -> EmatResult<()> {
	for (path, content) in &result.files {
		let wrap = |source: std::io::Error| {
			EmatError::WriteFile {
				path: path.display().to_string(),
				source,
			}
		};
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).map_err(wrap)?;
		}
		std::fs::write(path, content).map_err(wrap)?;
	}
	Ok(())
}
