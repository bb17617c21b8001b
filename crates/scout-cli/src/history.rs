use scout::models::role::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

/// What was said in this session, oldest first. Lost on exit.
#[derive(Debug, Default)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, role: Role, content: S) {
        self.entries.push(ChatEntry {
            role,
            content: content.into(),
        });
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markdown transcript of the session
    pub fn transcript(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let speaker = match entry.role {
                    Role::User => "You",
                    Role::Assistant => "Scout",
                };
                format!("**{}:** {}", speaker, entry.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
