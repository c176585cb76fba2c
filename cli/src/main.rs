use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use jval_core::{JvalError, ValidateOptions, catch_validate, ensure_json_object};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");
const CRASH_TITLE: &str = "Unexpected crash in JVAL validator";

#[derive(Debug, Parser)]
#[command(name = "jval")]
#[command(about = "Validate JSON data against a JVAL schema.")]
#[command(version)]
struct Cli {
    /// Path to the JSON file to validate.
    json_path: PathBuf,
    /// Path to the JVAL schema file.
    jval_path: PathBuf,
    /// Drop extra keys in the JSON data that are not defined in the JVAL schema.
    #[arg(long)]
    drop_extra_keys: bool,
    /// YAML or JSON file with validation options.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Emit debug logs on stderr.
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(validated) => println!("{validated}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads inputs, validates, and returns the pretty-printed result.
fn run(cli: &Cli) -> Result<String, String> {
    let mut options = match &cli.options {
        Some(path) => ValidateOptions::load(path)
            .map_err(|err| format!("Failed to load options '{}': {err}", path.display()))?,
        None => ValidateOptions::default(),
    };
    options.drop_extra_keys |= cli.drop_extra_keys;

    let document = read_json(&cli.json_path)?;
    let schema = read_json(&cli.jval_path)?;
    debug!(
        document = %cli.json_path.display(),
        schema = %cli.jval_path.display(),
        drop_extra_keys = options.drop_extra_keys,
        "Loaded inputs"
    );

    // Keep the default hook from printing over the crash report.
    std::panic::set_hook(Box::new(|info| {
        debug!(%info, "Validator panicked");
    }));

    let validated = catch_validate(&document, &schema, &options)
        .map_err(|err| describe_failure(err, &document, &schema, &options))?;

    serde_json::to_string_pretty(&validated)
        .map_err(|err| format!("Failed to serialize validated data: {err}"))
}

fn read_json(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| format!("Error decoding JSON: {err}"))
}

/// Turns an engine error into the text shown to the user.
///
/// Validation and input errors are shown as-is. For internal failures the
/// inputs are re-checked first, since a malformed input is the likelier
/// cause; otherwise the report includes a link to file an issue.
fn describe_failure(
    err: JvalError,
    document: &Value,
    schema: &Value,
    options: &ValidateOptions,
) -> String {
    let detail = match err {
        JvalError::Internal(detail) => detail,
        other => return other.to_string(),
    };

    let recheck = ensure_json_object(document, "json_dict", options.max_depth)
        .and_then(|_| ensure_json_object(schema, "jval_schema", options.max_depth));
    if let Err(input_err) = recheck {
        return input_err.to_string();
    }

    crash_report(&detail)
}

fn crash_report(detail: &str) -> String {
    let body = format!(
        "**Error:**\n{detail}\n\n\
         -- If possible, please include the JSON data and JVAL schema here. --\n"
    );
    let link = issue_link(&body);
    format!(
        "{detail}\n\n\
         Oh no! The validator crashed unexpectedly!\n\
         Please click the following link to submit the issue:\n\
         {link}"
    )
}

/// Pre-filled "new issue" URL on the project's repository.
fn issue_link(body: &str) -> String {
    let base = format!("{}/issues/new", PACKAGE_REPOSITORY.trim_end_matches('/'));
    match url::Url::parse_with_params(&base, &[("title", CRASH_TITLE), ("body", body)]) {
        Ok(url) => url.to_string(),
        Err(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_issue_link_encodes_title_and_body() {
        let link = issue_link("line one\nline two & more");
        let url = url::Url::parse(&link).unwrap();
        assert!(url.path().ends_with("/issues/new"));
        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("title".to_string(), CRASH_TITLE.to_string()),
                ("body".to_string(), "line one\nline two & more".to_string()),
            ]
        );
    }

    #[test]
    fn test_crash_report_mentions_detail_and_link() {
        let report = crash_report("validator panicked: boom");
        assert!(report.starts_with("validator panicked: boom\n\n"));
        assert!(report.contains("Oh no! The validator crashed unexpectedly!"));
        assert!(report.contains("/issues/new?title="));
    }

    #[test]
    fn test_validation_failures_are_shown_verbatim() {
        let options = ValidateOptions::default();
        let err = jval_core::validate(&json!({}), &json!({"name": "<str>"}), false).unwrap_err();
        let text = describe_failure(err, &json!({}), &json!({}), &options);
        assert_eq!(text, "Validation error at root: missing value for key 'name'");
    }

    #[test]
    fn test_internal_failure_prefers_input_errors() {
        let options = ValidateOptions::default();
        let err = JvalError::Internal("validator panicked: boom".into());
        let text = describe_failure(err.clone(), &json!([1]), &json!({}), &options);
        assert_eq!(text, "'json_dict' must be a valid JSON object.");

        let text = describe_failure(err, &json!({}), &json!({}), &options);
        assert!(text.contains("Oh no! The validator crashed unexpectedly!"));
    }
}
