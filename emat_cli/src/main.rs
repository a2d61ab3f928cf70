use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use emat_cli::Commands;
use emat_cli::EmatCli;
use emat_cli::OutputFormat;
use emat_cli::ReportFormatArg;
use emat_core::EmatError;
use emat_core::ProjectContext;
use emat_core::compute_outputs;
use emat_core::config::CONFIG_FILE_CANDIDATES;
use emat_core::config::EmatConfig;
use emat_core::config::load_parameters;
use emat_core::load_measures;
use emat_core::parse_report_file;
use emat_core::read_file;
use emat_core::replacement::AssignmentKind;
use emat_core::replacement::Replacement;
use emat_core::write_outputs;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = EmatCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Parse {
			file,
			format,
			output,
		}) => run_parse(&args, file, *format, *output),
		Some(Commands::Measures { output }) => run_measures(&args, *output),
		Some(Commands::Render {
			params,
			dry_run,
			diff,
		}) => run_render(&args, params, *dry_run, *diff),
		Some(Commands::Replace {
			file,
			variable,
			value,
			operator,
			text,
			dry_run,
		}) => {
			let kind = if *text {
				AssignmentKind::Text
			} else {
				AssignmentKind::Number
			};
			run_replace(file, kind, variable, value, operator, *dry_run)
		}
		None => {
			eprintln!("No subcommand specified. Run `emat --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<EmatError>() {
			Ok(emat_err) => {
				let report: miette::Report = (*emat_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "emat_core=debug" } else { "error" };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &EmatCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &EmatCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = EmatConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	let sample_config = "# emat configuration\n\n# Section markers from outermost to \
	                     innermost.\n# markers = [\"==\", \"--\"]\n\n# Prefix of template \
	                     placeholders.\n# token_prefix = \"__EMAT_PROVIDES\"\n\n# Reports to \
	                     scrape after a model run.\n# [[reports]]\n# path = \
	                     \"Database/report/run_vmt_statistics.rpt\"\n# format = \
	                     \"tiered-colon\"\n#\n# [reports.measures]\n# Chicago_Expressway_VMT = \
	                     \"Chicago.Expressway VMT\"\n\n# Templates rendered before a model \
	                     run.\n# [[templates]]\n# source = \"templates/init.mac.template\"\n# \
	                     destination = \"Database/macros/init.mac\"\n# tokens = \
	                     [\"__transit__fare__factor__\"]\n\n# Assignments rewritten in place \
	                     before a model run.\n# [[assignments]]\n# file = \
	                     \"Database/batch_file.yml\"\n# variable = \"global_loops\"\n# parameter \
	                     = \"global_loops\"\n";

	std::fs::write(&config_path, sample_config).map_err(|source| {
		EmatError::WriteFile {
			path: config_path.display().to_string(),
			source,
		}
	})?;
	println!("Created {}", CONFIG_FILE_CANDIDATES[0]);
	println!();
	println!("Next steps:");
	println!("  1. Describe your reports, templates and assignments in emat.toml");
	println!("  2. Run `emat parse <report>` to list the keys a report provides");
	println!("  3. Run `emat render --params <file>` before each model run");

	Ok(())
}

fn run_parse(
	args: &EmatCli,
	file: &Path,
	format: ReportFormatArg,
	output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = ProjectContext::load(resolve_root(args))?;
	let mapping = parse_report_file(file, format.into(), &ctx.config.markers)?;

	print_values(&mapping, output)
}

fn run_measures(args: &EmatCli, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = ProjectContext::load(resolve_root(args))?;

	if ctx.config.reports.is_empty() {
		eprintln!(
			"{} no reports configured. Add a [[reports]] table to emat.toml.",
			colored!("warning:", yellow)
		);
	}

	let values = load_measures(&ctx)?;
	print_values(&values, output)
}

fn print_values(
	values: &BTreeMap<String, f64>,
	output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	match output {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(values)?);
		}
		OutputFormat::Text => {
			let width = values.keys().map(String::len).max().unwrap_or(0);
			for (key, value) in values {
				println!("{key:<width$} = {value}");
			}
		}
	}

	Ok(())
}

fn run_render(
	args: &EmatCli,
	params: &Path,
	dry_run: bool,
	diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = ProjectContext::load(&root)?;
	let params = load_parameters(params)?;
	let result = compute_outputs(&ctx, &params)?;

	for warning in &result.warnings {
		eprintln!(
			"{} `{}` was not found in {}",
			colored!("warning:", yellow),
			warning.variable,
			make_relative(&warning.file, &root)
		);
	}

	if diff {
		for (path, content) in &result.files {
			let current = std::fs::read_to_string(path).unwrap_or_default();
			if current != *content {
				eprintln!("{}:", make_relative(path, &root));
				print_diff(&current, content);
			}
		}
	}

	if dry_run {
		println!("Dry run: would write {} file(s):", result.files.len());
		for path in result.files.keys() {
			println!("  {}", make_relative(path, &root));
		}
		return Ok(());
	}

	write_outputs(&result)?;
	println!(
		"{} Wrote {} file(s), {} assignment(s) rewritten.",
		colored!("✓", green),
		result.files.len(),
		result.substitution_count
	);

	Ok(())
}

fn run_replace(
	file: &Path,
	kind: AssignmentKind,
	variable: &str,
	value: &str,
	operator: &str,
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let replacement = Replacement::new(kind, variable, operator)?;
	let content = read_file(file)?;
	let substitution = replacement.substitute(value, &content);

	if substitution.is_noop() {
		eprintln!(
			"{} `{variable}` was not found in {}",
			colored!("warning:", yellow),
			file.display()
		);
		process::exit(1);
	}

	if dry_run {
		print!("{}", substitution.text);
		return Ok(());
	}

	std::fs::write(file, &substitution.text).map_err(|source| {
		EmatError::WriteFile {
			path: file.display().to_string(),
			source,
		}
	})?;
	println!(
		"{} Rewrote {} assignment(s) of `{variable}` in {}",
		colored!("✓", green),
		substitution.count,
		file.display()
	);

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
