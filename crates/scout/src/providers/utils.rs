use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::errors::AgentError;
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

use super::base::Usage;

lazy_static! {
    static ref INVALID_NAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    static ref VALID_NAME: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Convert internal Message format to Gemini's `contents` specification
///
/// Gemini pairs function responses with calls by name rather than id, so the names of
/// earlier tool requests are tracked while walking the history.
pub fn messages_to_gemini_spec(messages: &[Message]) -> Vec<Value> {
    let mut contents = Vec::new();
    let mut call_names: HashMap<&str, String> = HashMap::new();

    for message in messages {
        let mut parts = Vec::new();

        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.text.is_empty() {
                        parts.push(json!({ "text": text.text }));
                    }
                }
                MessageContent::ToolRequest(request) => match &request.tool_call {
                    Ok(tool_call) => {
                        let sanitized_name = sanitize_function_name(&tool_call.name);
                        call_names.insert(&request.id, sanitized_name.clone());
                        parts.push(json!({
                            "functionCall": {
                                "name": sanitized_name,
                                "args": tool_call.arguments,
                            }
                        }));
                    }
                    // The matching response carries the error back to the model
                    Err(_) => continue,
                },
                MessageContent::ToolResponse(response) => {
                    let Some(name) = call_names.get(response.id.as_str()) else {
                        let text = match &response.tool_result {
                            Ok(contents) => join_text(contents.iter().filter_map(|c| c.as_text())),
                            Err(e) => format!("The tool call returned the following error:\n{}", e),
                        };
                        parts.push(json!({ "text": text }));
                        continue;
                    };

                    let payload = match &response.tool_result {
                        Ok(contents) => {
                            json!({ "content": join_text(contents.iter().filter_map(|c| c.as_text())) })
                        }
                        // A tool result error is shown as output so the model can interpret the error message
                        Err(e) => json!({ "error": e.to_string() }),
                    };
                    parts.push(json!({
                        "functionResponse": {
                            "name": name,
                            "response": payload,
                        }
                    }));
                }
            }
        }

        if !parts.is_empty() {
            contents.push(json!({
                "role": gemini_role(message.role),
                "parts": parts,
            }));
        }
    }

    contents
}

fn join_text<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts.collect::<Vec<_>>().join("\n")
}

/// Convert internal Tool format to Gemini's `tools` specification
pub fn tools_to_gemini_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut declarations = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        declarations.push(json!({
            "name": sanitize_function_name(&tool.name),
            "description": tool.description,
            "parameters": tool.input_schema,
        }));
    }

    if declarations.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![json!({ "functionDeclarations": declarations })])
}

/// Convert Gemini's generateContent response to internal Message format
pub fn gemini_response_to_message(response: Value) -> Result<Message> {
    let candidate = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| {
            let reason = response["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("unknown");
            anyhow!("No candidates in response (block reason: {})", reason)
        })?;

    let mut content = Vec::new();
    let parts = candidate["content"]["parts"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    for part in parts {
        if part.get("thought").and_then(|t| t.as_bool()).unwrap_or(false) {
            continue;
        }

        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            content.push(MessageContent::text(text));
            continue;
        }

        if let Some(function_call) = part.get("functionCall") {
            let id = function_call["id"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let function_name = function_call["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();

            if !is_valid_function_name(&function_name) {
                let error = AgentError::InvalidToolName(function_name);
                content.push(MessageContent::tool_request(id, Err(error)));
                continue;
            }

            match function_call.get("args") {
                None | Some(Value::Null) => {
                    content.push(MessageContent::tool_request(
                        id,
                        Ok(ToolCall::new(&function_name, json!({}))),
                    ));
                }
                Some(args) if args.is_object() => {
                    content.push(MessageContent::tool_request(
                        id,
                        Ok(ToolCall::new(&function_name, args.clone())),
                    ));
                }
                Some(args) => {
                    let error = AgentError::InvalidParameters(format!(
                        "Could not interpret tool use parameters for id {}: expected an object, got {}",
                        id, args
                    ));
                    content.push(MessageContent::tool_request(id, Err(error)));
                }
            }
        }
    }

    Ok(Message {
        role: Role::Assistant,
        created: chrono::Utc::now().timestamp(),
        content,
    })
}

pub fn get_gemini_usage(data: &Value) -> Usage {
    let usage = &data["usageMetadata"];
    let as_i32 = |key: &str| usage.get(key).and_then(|v| v.as_i64()).map(|v| v as i32);

    let input_tokens = as_i32("promptTokenCount");
    let output_tokens = as_i32("candidatesTokenCount");
    let total_tokens = as_i32("totalTokenCount").or(match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

pub fn sanitize_function_name(name: &str) -> String {
    INVALID_NAME_CHARS.replace_all(name, "_").to_string()
}

pub fn is_valid_function_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}
