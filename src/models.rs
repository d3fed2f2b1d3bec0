use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A command template as served by the backend catalog.
///
/// `command_template` may contain `{name}` placeholders; every occurrence is
/// an independent parameter slot, in left-to-right order, even when the same
/// name repeats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub command_name: String,
    #[serde(default)]
    pub description: String,
    pub command_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_options: Option<HashMap<String, String>>,
}

/// The catalog endpoint is loose about its envelope: it may answer with a
/// bare array, a `{"commands": [...]}` wrapper, or a single descriptor
/// object (exact-name searches). Anything else is an invalid data format.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    List(Vec<CommandDescriptor>),
    Wrapped { commands: Vec<CommandDescriptor> },
    Single(CommandDescriptor),
}

impl CatalogPayload {
    pub fn into_commands(self) -> Vec<CommandDescriptor> {
        match self {
            CatalogPayload::List(list) => list,
            CatalogPayload::Wrapped { commands } => commands,
            CatalogPayload::Single(descriptor) => vec![descriptor],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Environment {
    pub hack_environment: u32,
    #[serde(default)]
    pub goal_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnvironmentsPayload {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// Canvas-local block coordinates, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canonical per-block snapshot returned by `WorkflowCanvas::collect_all`,
/// used for bulk execution and external export.
#[derive(Clone, Debug, Serialize)]
pub struct BlockSnapshot {
    pub id: u64,
    pub name: String,
    pub template: String,
    pub parameter_values: Vec<String>,
    pub command: String,
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Wire shapes for the execution backend
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ExecuteCommandRequest {
    pub user_id: String,
    pub environment_number: String,
    pub command_name: String,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteCommandResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
}

impl ExecuteCommandResponse {
    /// Collapse the `{success, output}` pair into a single outcome. The
    /// backend sometimes reports `success: true` with no usable output
    /// (`null`, the literal string `"None"`, or blank); all of those count
    /// as failures.
    pub fn into_outcome(self) -> Result<String, String> {
        match self.output {
            Some(output) if !output.trim().is_empty() && output.trim() != "None" => {
                if self.success {
                    Ok(output)
                } else {
                    Err(output)
                }
            }
            _ => Err("command produced no output".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginSshRequest {
    pub level: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerRequest {
    pub user_id: String,
    pub level: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct UserIdRequest {
    pub user_id: String,
}

/// Recommended command-name sequence from the pattern endpoint.
#[derive(Debug, Deserialize)]
pub struct PatternResponse {
    #[serde(default, alias = "commands")]
    pub pattern: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandSearchRequest {
    pub search_term: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_payload_accepts_bare_array() {
        let json = r#"[{"command_name":"ls","description":"list","command_template":"ls {path}"}]"#;
        let payload: CatalogPayload = serde_json::from_str(json).unwrap();
        let commands = payload.into_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command_name, "ls");
    }

    #[test]
    fn catalog_payload_accepts_wrapped_object() {
        let json = r#"{"commands":[{"command_name":"cat","description":"","command_template":"cat {file}"}]}"#;
        let payload: CatalogPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.into_commands()[0].command_name, "cat");
    }

    #[test]
    fn catalog_payload_accepts_single_descriptor() {
        let json = r#"{"command_name":"pwd","description":"","command_template":"pwd"}"#;
        let payload: CatalogPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.into_commands().len(), 1);
    }

    #[test]
    fn catalog_payload_rejects_other_shapes() {
        assert!(serde_json::from_str::<CatalogPayload>(r#"{"foo": 1}"#).is_err());
        assert!(serde_json::from_str::<CatalogPayload>("42").is_err());
    }

    #[test]
    fn execution_outcome_treats_empty_output_as_failure() {
        let cases = [None, Some("".to_string()), Some("  ".to_string()), Some("None".to_string())];
        for output in cases {
            let resp = ExecuteCommandResponse { success: true, output };
            assert!(resp.into_outcome().is_err());
        }
    }

    #[test]
    fn execution_outcome_respects_success_flag() {
        let ok = ExecuteCommandResponse { success: true, output: Some("bandit0".into()) };
        assert_eq!(ok.into_outcome().unwrap(), "bandit0");

        let failed = ExecuteCommandResponse { success: false, output: Some("permission denied".into()) };
        assert_eq!(failed.into_outcome().unwrap_err(), "permission denied");
    }
}
