//! These models represent the objects passed around by the agent
//!
//! There are a few related formats we need to interact with:
//! - chat payloads, sent from the client to the backend (plain strings or role/content pairs)
//! - gemini contents/function declarations, sent from the agent to the LLM
//! - search requests, sent from the agent to the search system
//!
//! We always immediately convert those data models into the internal structs using
//! to/from helpers, so the internal models are not an exact match to any of these formats.
pub mod content;
pub mod conversation;
pub mod message;
pub mod role;
pub mod tool;
