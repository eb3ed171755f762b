// ABOUTME: Request validation for agent and tool-metadata endpoints
// ABOUTME: Field rules plus optional allow-lists of tools and deployments

use std::collections::HashSet;

use toolkit_agents::{
    AgentCreateInput, AgentUpdateInput, ToolMetadataCreateInput, ToolMetadataInput,
    ToolMetadataUpdateInput,
};

use crate::error::ApiError;

/// Maximum length of an agent name, in characters
pub const MAX_NAME_LENGTH: usize = 256;

/// A single failed rule
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ApiError::Validation(errors.iter().map(ToString::to_string).collect())
    }
}

/// Validates agent requests against field rules and the configured allow-lists.
///
/// An allow-list of `None` accepts any value.
#[derive(Debug, Clone, Default)]
pub struct AgentValidator {
    available_tools: Option<HashSet<String>>,
    available_deployments: Option<HashSet<String>>,
}

impl AgentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_available_tools<I, T>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.available_tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_available_deployments<I, T>(mut self, deployments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.available_deployments = Some(deployments.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate_create(&self, input: &AgentCreateInput) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        self.check_name(&input.name, &mut errors);
        check_required("model", &input.model, &mut errors);
        self.check_deployment(&input.deployment, &mut errors);
        if let Some(temperature) = input.temperature {
            check_temperature(temperature, &mut errors);
        }
        if let Some(version) = input.version {
            check_version(version, &mut errors);
        }
        self.check_tools(&input.tools, &mut errors);
        if let Some(tools_metadata) = &input.tools_metadata {
            check_tools_metadata(tools_metadata, &mut errors);
        }

        into_result(errors)
    }

    pub fn validate_update(&self, input: &AgentUpdateInput) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if let Some(name) = &input.name {
            self.check_name(name, &mut errors);
        }
        if let Some(model) = &input.model {
            check_required("model", model, &mut errors);
        }
        if let Some(deployment) = &input.deployment {
            self.check_deployment(deployment, &mut errors);
        }
        if let Some(temperature) = input.temperature {
            check_temperature(temperature, &mut errors);
        }
        if let Some(version) = input.version {
            check_version(version, &mut errors);
        }
        if let Some(tools) = &input.tools {
            self.check_tools(tools, &mut errors);
        }
        if let Some(tools_metadata) = &input.tools_metadata {
            check_tools_metadata(tools_metadata, &mut errors);
        }

        into_result(errors)
    }

    fn check_name(&self, name: &str, errors: &mut Vec<ValidationError>) {
        check_required("name", name, errors);
        if name.chars().count() > MAX_NAME_LENGTH {
            errors.push(ValidationError::new(
                "name",
                format!("must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }
    }

    fn check_deployment(&self, deployment: &str, errors: &mut Vec<ValidationError>) {
        if !check_required("deployment", deployment, errors) {
            return;
        }
        if let Some(available) = &self.available_deployments {
            if !available.contains(deployment) {
                errors.push(ValidationError::new(
                    "deployment",
                    format!("Deployment {} not found or is not available", deployment),
                ));
            }
        }
    }

    fn check_tools(&self, tools: &[String], errors: &mut Vec<ValidationError>) {
        let mut seen = HashSet::new();
        for tool in tools {
            if tool.trim().is_empty() {
                errors.push(ValidationError::new("tools", "Tool names cannot be empty"));
                continue;
            }
            if !seen.insert(tool.as_str()) {
                errors.push(ValidationError::new(
                    "tools",
                    format!("Tool {} is listed more than once", tool),
                ));
            }
            if let Some(available) = &self.available_tools {
                if !available.contains(tool) {
                    errors.push(ValidationError::new(
                        "tools",
                        format!("Tool {} not found", tool),
                    ));
                }
            }
        }
    }
}

pub fn validate_tool_metadata_create(input: &ToolMetadataCreateInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    check_required("tool_name", &input.tool_name, &mut errors);
    into_result(errors)
}

pub fn validate_tool_metadata_update(input: &ToolMetadataUpdateInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if let Some(tool_name) = &input.tool_name {
        check_required("tool_name", tool_name, &mut errors);
    }
    into_result(errors)
}

/// Returns false when the value is blank
fn check_required(field: &str, value: &str, errors: &mut Vec<ValidationError>) -> bool {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "is required"));
        return false;
    }
    true
}

fn check_temperature(temperature: f64, errors: &mut Vec<ValidationError>) {
    if !temperature.is_finite() || !(0.0..=1.0).contains(&temperature) {
        errors.push(ValidationError::new(
            "temperature",
            "must be between 0.0 and 1.0",
        ));
    }
}

fn check_version(version: i64, errors: &mut Vec<ValidationError>) {
    if version < 1 {
        errors.push(ValidationError::new("version", "must be at least 1"));
    }
}

fn check_tools_metadata(entries: &[ToolMetadataInput], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.tool_name.trim().is_empty() {
            errors.push(ValidationError::new(
                "tools_metadata",
                "Tool names cannot be empty",
            ));
            continue;
        }
        if !seen.insert(entry.tool_name.as_str()) {
            errors.push(ValidationError::new(
                "tools_metadata",
                format!("Tool name {} is listed more than once", entry.tool_name),
            ));
        }
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}
