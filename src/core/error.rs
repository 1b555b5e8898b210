use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationMissingArgument,
    ValidationInvalidArgument,

    TaskDuplicateParam,
    TaskUnknownParam,
    TaskDuplicateStep,
    TaskInvalidParamName,
    TaskNotFound,

    InternalIoError,
    InternalYamlError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::TaskDuplicateParam => "task.duplicate_param",
            ErrorCode::TaskUnknownParam => "task.unknown_param",
            ErrorCode::TaskDuplicateStep => "task.duplicate_step",
            ErrorCode::TaskInvalidParamName => "task.invalid_param_name",
            ErrorCode::TaskNotFound => "task.not_found",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalYamlError => "internal.yaml_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateParamDetails {
    pub task: String,
    pub param: String,
    pub first_default: Option<String>,
    pub second_default: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownParamDetails {
    pub task: String,
    pub step: String,
    pub param: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateStepDetails {
    pub task: String,
    pub step: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidParamNameDetails {
    pub task: String,
    pub param: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: hint.into(),
        });
        self
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        let details = serde_json::to_value(MissingArgumentDetails { args })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn duplicate_param(
        task: impl Into<String>,
        param: impl Into<String>,
        first_default: Option<String>,
        second_default: Option<String>,
    ) -> Self {
        let task = task.into();
        let param = param.into();
        let message = format!(
            "Task '{}' declares parameter '{}' twice with diverging defaults",
            task, param
        );
        let details = serde_json::to_value(DuplicateParamDetails {
            task,
            param,
            first_default,
            second_default,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::TaskDuplicateParam, message, details)
            .with_hint("Reuse one NamedParam instance wherever the same logical parameter recurs")
    }

    pub fn unknown_param(
        task: impl Into<String>,
        step: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        let task = task.into();
        let step = step.into();
        let param = param.into();
        let message = format!(
            "Step '{}' of task '{}' references parameter '{}' which is not declared by the task",
            step, task, param
        );
        let details = serde_json::to_value(UnknownParamDetails { task, step, param })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::TaskUnknownParam, message, details)
    }

    pub fn duplicate_step(task: impl Into<String>, step: impl Into<String>) -> Self {
        let task = task.into();
        let step = step.into();
        let message = format!("Task '{}' contains two steps named '{}'", task, step);
        let details = serde_json::to_value(DuplicateStepDetails { task, step })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::TaskDuplicateStep, message, details)
    }

    pub fn invalid_param_name(task: impl Into<String>, param: impl Into<String>) -> Self {
        let task = task.into();
        let param = param.into();
        let message = if param.is_empty() {
            format!("Task '{}' declares a parameter with an empty name", task)
        } else {
            format!(
                "Task '{}' declares parameter '{}' which is not a valid Tekton parameter name",
                task, param
            )
        };
        let details = serde_json::to_value(InvalidParamNameDetails { task, param })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::TaskInvalidParamName, message, details)
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        let details = serde_json::to_value(NotFoundDetails { id: id.into() })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(ErrorCode::TaskNotFound, "Task not found", details)
            .with_hint("Run 'glci tasks' to see available task definitions")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_yaml(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalYamlError, "YAML serialization error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalJsonError, "JSON serialization error", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_param_carries_both_defaults() {
        let err = Error::duplicate_param(
            "build-gardenlinux-task",
            "giturl",
            Some("ssh://a".to_string()),
            Some("https://b".to_string()),
        );
        assert_eq!(err.code, ErrorCode::TaskDuplicateParam);
        assert_eq!(err.details["param"], "giturl");
        assert_eq!(err.details["firstDefault"], "ssh://a");
        assert_eq!(err.details["secondDefault"], "https://b");
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn unknown_param_names_step_and_task() {
        let err = Error::unknown_param("notify-task", "notify", "status_dict_str");
        assert_eq!(err.code.as_str(), "task.unknown_param");
        assert!(err.message.contains("'notify'"));
        assert!(err.message.contains("'notify-task'"));
    }

    #[test]
    fn task_not_found_has_hint() {
        let err = Error::task_not_found("no-such-task");
        assert_eq!(err.code, ErrorCode::TaskNotFound);
        assert_eq!(err.hints.len(), 1);
    }
}
