pub mod config;
pub mod explain;
pub mod matching;
pub mod trends;

use std::path::Path;

use serde::Serialize;
use trendfit_core::config::AppConfig;
use trendfit_core::errors::ApplicationError;
use trendfit_core::{load_products, ProductSummary, TrendLibrary};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            hint: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            hint: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Pretty-printed JSON document as the command's whole output.
    pub fn data<T: Serialize>(command: &str, data: &T) -> Self {
        match serde_json::to_string_pretty(data) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    pub fn from_error(command: &str, error: ApplicationError) -> Self {
        let (error_class, exit_code) = match &error {
            ApplicationError::Configuration(_) => ("config_validation", 2),
            ApplicationError::Input(_) => ("input", 3),
            ApplicationError::Integration(_) => ("integration", 1),
            ApplicationError::Domain(_) => ("domain", 1),
        };
        let message = error.to_string();
        let hint = error.into_interface(command).user_message();

        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message,
            hint: Some(hint.to_string()),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

pub(crate) fn load_catalog(path: &Path) -> Result<Vec<ProductSummary>, ApplicationError> {
    load_products(path).map_err(|error| ApplicationError::Input(error.to_string()))
}

pub(crate) fn load_library(config: &AppConfig) -> Result<TrendLibrary, ApplicationError> {
    TrendLibrary::load(&config.matching.trends_path)
        .map_err(|error| ApplicationError::Input(error.to_string()))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use trendfit_core::errors::ApplicationError;

    use super::CommandResult;

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).expect("command output should be json")
    }

    #[test]
    fn input_errors_exit_with_code_three_and_carry_a_hint() {
        let result =
            CommandResult::from_error("match", ApplicationError::Input("missing file".into()));

        assert_eq!(result.exit_code, 3);
        let payload = parse(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
        assert_eq!(payload["message"], "input failure: missing file");
        assert_eq!(
            payload["hint"],
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn configuration_errors_exit_with_code_two() {
        let result =
            CommandResult::from_error("config", ApplicationError::Configuration("bad".into()));

        assert_eq!(result.exit_code, 2);
        assert_eq!(parse(&result.output)["error_class"], "config_validation");
    }

    #[test]
    fn success_envelope_omits_hint() {
        let payload = parse(&CommandResult::success("trends", "done").output);

        assert_eq!(payload["status"], "ok");
        assert!(payload.get("hint").is_none());
    }
}
