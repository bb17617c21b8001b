use anyhow::Result;
use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::content::Content;
use crate::models::tool::{Tool, ToolCall};

pub mod search;

pub use search::{SearchConfig, SearchSystem};

/// Core trait that defines a system that can be operated by an AI agent
#[async_trait]
pub trait System: Send + Sync {
    /// Get the name of the system
    fn name(&self) -> &str;

    /// Get the system description
    fn description(&self) -> &str;

    /// Get system instructions
    fn instructions(&self) -> &str;

    /// Get available tools
    fn tools(&self) -> &[Tool];

    /// Call a tool with the given parameters
    async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>>;
}

/// Build the tool systems for one invocation: nothing, or a single bounded web search.
///
/// No network traffic happens here; the search system only talks to its host once the
/// agent dispatches a call to it. Fails only if the HTTP client cannot be built.
pub fn build_tools(allow_search: bool, config: &SearchConfig) -> Result<Vec<Box<dyn System>>> {
    if allow_search {
        Ok(vec![Box::new(SearchSystem::new(config.clone())?)])
    } else {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tools_without_search_is_empty() -> Result<()> {
        let systems = build_tools(false, &SearchConfig::default())?;
        assert!(systems.is_empty());
        Ok(())
    }

    #[test]
    fn test_build_tools_with_search_has_one_bounded_tool() -> Result<()> {
        let config = SearchConfig::default();
        let systems = build_tools(true, &config)?;

        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].name(), "search");
        assert_eq!(systems[0].tools().len(), 1);
        assert!(systems[0].tools()[0]
            .description
            .contains("at most 2 results"));
        Ok(())
    }

    #[test]
    fn test_build_tools_respects_configured_bound() -> Result<()> {
        let config = SearchConfig {
            max_results: 4,
            ..SearchConfig::default()
        };
        let systems = build_tools(true, &config)?;
        assert!(systems[0].tools()[0]
            .description
            .contains("at most 4 results"));
        Ok(())
    }

    #[test]
    fn test_build_tools_builds_search_client_for_any_host() -> Result<()> {
        // Construction never touches the network, even for an unreachable host
        let config = SearchConfig {
            host: "http://127.0.0.1:9".to_string(),
            api_key: Some("tvly-test".to_string()),
            max_results: 1,
        };
        let systems = build_tools(true, &config)?;
        assert_eq!(systems[0].tools()[0].name, "search");
        Ok(())
    }
}
