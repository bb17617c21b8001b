use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};
use crate::systems::System;

pub const SEARCH_HOST: &str = "https://api.tavily.com";
pub const SEARCH_MAX_RESULTS: u32 = 2;

/// Where and how the web search system queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_search_host")]
    pub host: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host: default_search_host(),
            api_key: None,
            max_results: default_max_results(),
        }
    }
}

fn default_search_host() -> String {
    SEARCH_HOST.to_string()
}

fn default_max_results() -> u32 {
    SEARCH_MAX_RESULTS
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Web search backed by the Tavily search API, capped at a fixed number of results
pub struct SearchSystem {
    tools: Vec<Tool>,
    client: Client,
    config: SearchConfig,
}

impl SearchSystem {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let search_tool = Tool::new(
            "search",
            format!(
                "Search the web for current information. Returns at most {} results, \
                each with a title, url and a content snippet.",
                config.max_results
            ),
            json!({
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query."
                    }
                }
            }),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            tools: vec![search_tool],
            client,
            config,
        })
    }

    async fn search(&self, params: Value) -> AgentResult<Vec<Content>> {
        let query = params
            .get("query")
            .and_then(|q| q.as_str())
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AgentError::InvalidParameters("The query string is required".into()))?;

        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AgentError::ExecutionError("No search API key configured".to_string())
        })?;

        let url = format!("{}/search", self.config.host.trim_end_matches('/'));
        tracing::info!(query, max_results = self.config.max_results, "running web search");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({
                "query": query,
                "max_results": self.config.max_results,
            }))
            .send()
            .await
            .map_err(|e| AgentError::ExecutionError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AgentError::ExecutionError(format!(
                "Search request failed: {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ExecutionError(e.to_string()))?;

        if body.results.is_empty() {
            return Ok(vec![Content::text(format!("No results found for: {}", query))]);
        }

        // Capped locally too; the service may return more
        Ok(body
            .results
            .into_iter()
            .take(self.config.max_results as usize)
            .map(|hit| Content::text(format!("**{}**\n{}\nURL: {}", hit.title, hit.content, hit.url)))
            .collect())
    }
}

#[async_trait]
impl System for SearchSystem {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Look up current information on the web"
    }

    fn instructions(&self) -> &str {
        "Use the search tool when the question depends on recent events or facts you are unsure of."
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>> {
        match tool_call.name.as_str() {
            "search" => self.search(tool_call.arguments).await,
            _ => Err(AgentError::ToolNotFound(tool_call.name)),
        }
    }
}
