mod common;

use emat_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

const CONFIG: &str = r#"
[[templates]]
source = "templates/init.mac.template"
destination = "macros/init.mac"
tokens = ["__transit__fare__factor__"]

[[assignments]]
file = "batch_file.yml"
variable = "global_loops"
parameter = "global_loops"

[[assignments]]
file = "batch_file.yml"
variable = "land_use"
kind = "text"
parameter = "land_use"
"#;

const TEMPLATE: &str = "~x=__EMAT_PROVIDES__transit__fare__factor__\n";

fn project() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "emat.toml", CONFIG)?;
	common::write(tmp.path(), "templates/init.mac.template", TEMPLATE)?;
	common::write(tmp.path(), "batch_file.yml", common::BATCH_FILE)?;
	common::write(
		tmp.path(),
		"params.toml",
		"__transit__fare__factor__ = 1.25\nglobal_loops = 4\nland_use = \"alt1\"\n",
	)?;
	Ok(tmp)
}

#[test]
fn render_writes_outputs() -> AnyEmptyResult {
	let tmp = project()?;

	common::emat_cmd()
		.arg("render")
		.arg("--params")
		.arg(tmp.path().join("params.toml"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Wrote 2 file(s), 2 assignment(s) rewritten",
		));

	let rendered = std::fs::read_to_string(tmp.path().join("macros/init.mac"))?;
	assert_eq!(rendered, "~x=1.25\n");

	let batch = std::fs::read_to_string(tmp.path().join("batch_file.yml"))?;
	assert_eq!(batch, "global_loops: 4  # max 4\nland_use: alt1  # or alt1\n");

	Ok(())
}

#[test]
fn render_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = project()?;

	common::emat_cmd()
		.arg("render")
		.arg("--params")
		.arg(tmp.path().join("params.toml"))
		.arg("--dry-run")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would write 2 file(s)"))
		.stdout(predicates::str::contains("macros/init.mac"))
		.stderr(predicates::str::contains("-global_loops: 3  # max 4"))
		.stderr(predicates::str::contains("+global_loops: 4  # max 4"));

	assert!(!tmp.path().join("macros/init.mac").exists());
	let batch = std::fs::read_to_string(tmp.path().join("batch_file.yml"))?;
	assert_eq!(batch, common::BATCH_FILE);

	Ok(())
}

#[test]
fn render_missing_parameter_fails() -> AnyEmptyResult {
	let tmp = project()?;
	common::write(tmp.path(), "params.json", "{\"global_loops\": 4, \"land_use\": \"alt1\"}")?;

	common::emat_cmd()
		.arg("render")
		.arg("--params")
		.arg(tmp.path().join("params.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(
			predicates::str::contains("failed to render template")
				.and(predicates::str::contains("init.mac.template"))
				.and(predicates::str::contains("missing required parameter")),
		);

	assert!(!tmp.path().join("macros/init.mac").exists());
	let batch = std::fs::read_to_string(tmp.path().join("batch_file.yml"))?;
	assert_eq!(batch, common::BATCH_FILE);

	Ok(())
}

#[test]
fn render_warns_on_unmatched_assignment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(
		tmp.path(),
		"emat.toml",
		"[[assignments]]\nfile = \"batch_file.yml\"\nvariable = \"max_loops\"\nparameter = \
		 \"loops\"\n",
	)?;
	common::write(tmp.path(), "batch_file.yml", common::BATCH_FILE)?;
	common::write(tmp.path(), "params.yaml", "loops: 2\n")?;

	common::emat_cmd()
		.arg("render")
		.arg("--params")
		.arg(tmp.path().join("params.yaml"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("`max_loops` was not found in batch_file.yml"))
		.stdout(predicates::str::contains("0 assignment(s) rewritten"));

	Ok(())
}

#[test]
fn render_unsupported_parameter_file_fails() -> AnyEmptyResult {
	let tmp = project()?;
	common::write(tmp.path(), "params.ini", "global_loops=4\n")?;

	common::emat_cmd()
		.arg("render")
		.arg("--params")
		.arg(tmp.path().join("params.ini"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("unsupported parameter file format").and(
			predicates::str::contains("ini"),
		));

	Ok(())
}

#[test]
fn render_missing_template_names_the_file() -> AnyEmptyResult {
	let tmp = project()?;
	std::fs::remove_file(tmp.path().join("templates/init.mac.template"))?;

	common::emat_cmd()
		.arg("render")
		.arg("--params")
		.arg(tmp.path().join("params.toml"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(
			predicates::str::contains("failed to read")
				.and(predicates::str::contains("init.mac.template")),
		);

	Ok(())
}
