use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use emat_core::config::ReportFormat;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Scrape simulation reports and stamp experiment parameters into model inputs.",
	long_about = "emat reads the human-readable reports a travel demand model writes and turns \
	              them into flat key/value measures. Before a run it stamps experiment parameters \
	              into templates and rewrites assignments in the model's input files.\n\nQuick \
	              start:\n  emat init                     Create a sample emat.toml\n  emat parse \
	              report.rpt      Print the keys a report provides\n  emat render --params \
	              p.toml  Write model inputs for one experiment\n  emat measures                 \
	              Collect configured measures after a run"
)]
pub struct EmatCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `emat.toml` in the project root.
	///
	/// If a config file already exists this command leaves it untouched and
	/// exits successfully.
	Init,
	/// Parse a single report file and print every key it provides.
	///
	/// Useful when writing the `[reports.measures]` table: the printed keys
	/// are exactly what a measure can refer to.
	Parse {
		/// The report file to parse.
		file: PathBuf,

		/// The layout of the report.
		#[arg(long, short, value_enum, default_value_t = ReportFormatArg::TieredColon)]
		format: ReportFormatArg,

		/// Output format. Use `text` for aligned `key = value` lines or
		/// `json` for a flat object.
		#[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
		output: OutputFormat,
	},
	/// Parse every configured report and print the named measures.
	Measures {
		/// Output format. Use `text` for aligned `name = value` lines or
		/// `json` for a flat object.
		#[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
		output: OutputFormat,
	},
	/// Render configured templates and apply configured assignments for one
	/// set of parameters.
	///
	/// Every template token and assignment parameter must be present in the
	/// parameter file. Nothing is written when any of them is missing.
	Render {
		/// Parameter file (`json`, `toml`, `yaml` or `yml`).
		#[arg(long)]
		params: PathBuf,

		/// Preview which files would be written without touching the disk.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Show a line diff between each file on disk and its new content.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Rewrite the value assigned to one variable in a file.
	///
	/// Exits with status 1 when the variable was not found.
	Replace {
		/// The file to rewrite in place.
		file: PathBuf,

		/// The variable name as written in the file.
		#[arg(long)]
		variable: String,

		/// The new value.
		#[arg(long)]
		value: String,

		/// The assignment operator between the variable and its value.
		#[arg(long, default_value = emat_core::replacement::DEFAULT_OPERATOR)]
		operator: String,

		/// Treat the value as free text and keep any trailing `#` comment.
		#[arg(long, default_value_t = false)]
		text: bool,

		/// Print the rewritten file instead of writing it.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
	/// Marker-outlined sections with `key: value` lines.
	TieredColon,
	/// Marker-outlined sections with `key value` lines.
	TieredSpace,
	/// Category and subcategory heading pairs with `key: value` lines.
	DoubleTier,
	/// Named origin/destination matrices.
	Interchange,
}

impl From<ReportFormatArg> for ReportFormat {
	fn from(format: ReportFormatArg) -> Self {
		match format {
			ReportFormatArg::TieredColon => Self::TieredColon,
			ReportFormatArg::TieredSpace => Self::TieredSpace,
			ReportFormatArg::DoubleTier => Self::DoubleTier,
			ReportFormatArg::Interchange => Self::Interchange,
		}
	}
}
