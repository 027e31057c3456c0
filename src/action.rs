//! The SOAR platform seam and the end-to-end action pipeline.
//!
//! A hosting SOAR platform supplies action parameters, receives log lines
//! and attachments, and is told how the run ended. All of that goes through
//! the [`SoarAction`] trait so the pipeline is independent of any concrete
//! platform and fully testable with a recording fake.
//!
//! The pipeline itself is a three-stage sequential flow:
//! 1. Export the account list as CSV and collect the "Account Name" column.
//! 2. Look up each name's account details and record its active-agent count.
//! 3. Write the dated CSV report and attach it to the result.
//!
//! Run lifecycle:
//! `Start → ExportFetched → {EarlyExit(no names) | NamesResolved}
//! → {EarlyExit(no data) | ReportWritten} → End(status)`.
//! Both early exits and the normal path converge on exactly one
//! [`SoarAction::end`] call carrying (message, result value, status). The
//! early exits are normal COMPLETED outcomes, not failures.
//!
//! Every error surfaces at this single boundary: request-level failures
//! (non-2xx responses, transport errors) and unexpected failures (malformed
//! JSON, file I/O) both terminate the run as FAILED with an empty result
//! value, differing only in the terminal message.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::accounts::{export_account_names, get_account};
use crate::client::S1Client;
use crate::error::Result;
use crate::report::{write_report, AccountRecord, Report, DEFAULT_OUTPUT_DIR, REPORT_MIME_TYPE};

/// Action parameter carrying the SentinelOne API token. Never logged.
pub const PARAM_API_KEY: &str = "API Key";

/// Action parameter carrying the management console base URL. Never logged.
pub const PARAM_BASE_URL: &str = "Base URL";

/// Optional action parameter overriding the report directory.
/// Defaults to [`DEFAULT_OUTPUT_DIR`] when absent.
pub const PARAM_OUTPUT_DIR: &str = "Output Directory";

/// Terminal status of an action run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// The run finished normally, including the no-data early exits.
    Completed,
    /// The run was aborted by an error.
    Failed,
}

/// The hosting platform's surface, as seen by the pipeline.
///
/// One implementation per host: the CLI binary implements it over
/// stdout/stderr, tests implement it as a recorder. Methods take `&mut self`
/// so recording implementations need no interior mutability.
pub trait SoarAction {
    /// Returns the named action parameter, or `None` when the platform has
    /// no value for it.
    fn parameter(&self, name: &str) -> Option<String>;

    /// Emits an informational log line.
    fn log_info(&mut self, message: &str);

    /// Emits an error log line.
    fn log_error(&mut self, message: &str);

    /// Attaches a named blob to the action result.
    fn add_attachment(&mut self, filename: &str, mime_type: &str, content: &str);

    /// Terminates the run. Called exactly once per run, on every path.
    /// `result_value` is the report's absolute path on success and empty
    /// otherwise.
    fn end(&mut self, message: &str, result_value: &str, state: ExecutionState);
}

/// Validated action inputs, extracted from the platform before the
/// pipeline starts.
struct ActionConfig {
    base_url: String,
    api_key: String,
    output_dir: PathBuf,
}

impl ActionConfig {
    /// Extracts and validates the action parameters.
    ///
    /// Returns a human-readable description of the problem when a mandatory
    /// parameter is absent. Parameter values are never logged.
    fn from_platform(platform: &impl SoarAction) -> std::result::Result<Self, String> {
        let base_url = platform
            .parameter(PARAM_BASE_URL)
            .ok_or_else(|| format!("missing mandatory action parameter: {PARAM_BASE_URL}"))?;
        let api_key = platform
            .parameter(PARAM_API_KEY)
            .ok_or_else(|| format!("missing mandatory action parameter: {PARAM_API_KEY}"))?;
        let output_dir = platform
            .parameter(PARAM_OUTPUT_DIR)
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        Ok(ActionConfig {
            base_url,
            api_key,
            output_dir: PathBuf::from(output_dir),
        })
    }
}

/// How the pipeline finished when no error occurred.
enum Outcome {
    /// The export produced zero account names; nothing else ran.
    NoNames,
    /// Every name resolved to an empty `data` array; no file was written.
    NoData,
    /// The report was written and is ready to attach.
    Written(Report),
}

/// The three pipeline stages, with all fallible work behind `?` so the
/// caller maps every error at one boundary.
async fn execute(
    platform: &mut impl SoarAction,
    config: &ActionConfig,
    date: NaiveDate,
) -> Result<Outcome> {
    let client = S1Client::new(&config.base_url, &config.api_key);

    // Step 1: export accounts and collect the name column.
    let names = export_account_names(&client).await?;
    if names.is_empty() {
        return Ok(Outcome::NoNames);
    }

    // Step 2: resolve details one name at a time, in export order.
    // A name with no match is logged and skipped; a request failure
    // aborts the whole run with no partial result.
    let mut records = Vec::new();
    for name in &names {
        match get_account(&client, name).await? {
            Some(account) => records.push(AccountRecord {
                name: name.clone(),
                active_agents: account.active_agent_count(),
            }),
            None => platform.log_info(&format!("No account found with name: {name}")),
        }
    }
    if records.is_empty() {
        return Ok(Outcome::NoData);
    }

    // Step 3: write the dated report.
    let report = write_report(&config.output_dir, date, &records)?;
    platform.log_info(&format!(
        "Data successfully written to {}",
        report.path.display()
    ));

    Ok(Outcome::Written(report))
}

/// Runs the action end to end against the given platform, using today's
/// local date for the report filename.
///
/// Always calls [`SoarAction::end`] exactly once and returns the terminal
/// state it reported.
pub async fn run_action(platform: &mut impl SoarAction) -> ExecutionState {
    run_action_on_date(platform, Local::now().date_naive()).await
}

/// Runs the action with an explicit report date. [`run_action`] delegates
/// here; tests use it directly to pin the report filename.
pub async fn run_action_on_date(
    platform: &mut impl SoarAction,
    date: NaiveDate,
) -> ExecutionState {
    let config = match ActionConfig::from_platform(platform) {
        Ok(config) => config,
        Err(problem) => {
            platform.log_error(&problem);
            platform.end(
                &format!("An unexpected error occurred: {problem}"),
                "",
                ExecutionState::Failed,
            );
            return ExecutionState::Failed;
        }
    };

    match execute(platform, &config, date).await {
        Ok(Outcome::NoNames) => {
            platform.end(
                "No account names found in the export.",
                "",
                ExecutionState::Completed,
            );
            ExecutionState::Completed
        }
        Ok(Outcome::NoData) => {
            platform.end(
                "No valid account data found.",
                "",
                ExecutionState::Completed,
            );
            ExecutionState::Completed
        }
        Ok(Outcome::Written(report)) => {
            platform.add_attachment(&report.filename, REPORT_MIME_TYPE, &report.content);
            let result_value = report.path.display().to_string();
            platform.end(
                "Successfully extracted account names and active agent counts.",
                &result_value,
                ExecutionState::Completed,
            );
            ExecutionState::Completed
        }
        Err(err) if err.is_transport() => {
            platform.log_error(&format!("Error occurred during API requests: {err}"));
            platform.end(
                &format!("Failed to retrieve account data: {err}"),
                "",
                ExecutionState::Failed,
            );
            ExecutionState::Failed
        }
        Err(err) => {
            platform.log_error(&format!("An unexpected error occurred: {err}"));
            platform.end(
                &format!("An unexpected error occurred: {err}"),
                "",
                ExecutionState::Failed,
            );
            ExecutionState::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Minimal recording platform for parameter-validation tests. The
    /// full pipeline fake lives in the integration tests.
    #[derive(Default)]
    struct RecordingPlatform {
        parameters: HashMap<String, String>,
        errors: Vec<String>,
        ended: Option<(String, String, ExecutionState)>,
    }

    impl SoarAction for RecordingPlatform {
        fn parameter(&self, name: &str) -> Option<String> {
            self.parameters.get(name).cloned()
        }

        fn log_info(&mut self, _message: &str) {}

        fn log_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }

        fn add_attachment(&mut self, _filename: &str, _mime_type: &str, _content: &str) {}

        fn end(&mut self, message: &str, result_value: &str, state: ExecutionState) {
            assert!(self.ended.is_none(), "end must be called exactly once");
            self.ended = Some((message.to_string(), result_value.to_string(), state));
        }
    }

    #[tokio::test]
    async fn missing_base_url_fails_without_any_request() {
        let mut platform = RecordingPlatform::default();
        platform
            .parameters
            .insert(PARAM_API_KEY.to_string(), "tok".to_string());

        let state = run_action(&mut platform).await;

        assert_eq!(state, ExecutionState::Failed);
        let (message, result_value, state) = platform.ended.unwrap();
        assert!(
            message.contains("Base URL"),
            "message should name the missing parameter, got: {message}"
        );
        assert!(result_value.is_empty(), "failed runs carry no result value");
        assert_eq!(state, ExecutionState::Failed);
        assert_eq!(platform.errors.len(), 1, "the problem should be logged");
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_any_request() {
        let mut platform = RecordingPlatform::default();
        platform
            .parameters
            .insert(PARAM_BASE_URL.to_string(), "https://console.example.net".to_string());

        let state = run_action(&mut platform).await;

        assert_eq!(state, ExecutionState::Failed);
        let (message, _, _) = platform.ended.unwrap();
        assert!(message.contains("API Key"));
        assert!(
            !message.contains("https://console.example.net"),
            "parameter values must not leak into messages"
        );
    }

    #[test]
    fn output_dir_defaults_to_tmp() {
        let mut platform = RecordingPlatform::default();
        platform
            .parameters
            .insert(PARAM_BASE_URL.to_string(), "https://c.example.net".to_string());
        platform
            .parameters
            .insert(PARAM_API_KEY.to_string(), "tok".to_string());

        let config = ActionConfig::from_platform(&platform).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn output_dir_parameter_overrides_default() {
        let mut platform = RecordingPlatform::default();
        platform
            .parameters
            .insert(PARAM_BASE_URL.to_string(), "https://c.example.net".to_string());
        platform
            .parameters
            .insert(PARAM_API_KEY.to_string(), "tok".to_string());
        platform
            .parameters
            .insert(PARAM_OUTPUT_DIR.to_string(), "/var/reports".to_string());

        let config = ActionConfig::from_platform(&platform).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/var/reports"));
    }
}
