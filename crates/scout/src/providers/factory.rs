use super::{base::Provider, configs::ProviderConfig, gemini::GeminiProvider};
use anyhow::Result;
use strum_macros::{Display, EnumIter, EnumString};

/// Model families a caller can ask for by name
#[derive(EnumIter, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
}

impl ProviderType {
    /// Models offered to chat clients for this provider
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            ProviderType::Gemini => &["gemini-1.5-flash", "gemini-1.5-pro"],
        }
    }
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider + Send + Sync>> {
    match config {
        ProviderConfig::Gemini(gemini_config) => Ok(Box::new(GeminiProvider::new(gemini_config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_provider_names_are_exact() {
        assert_eq!(ProviderType::from_str("Gemini").unwrap(), ProviderType::Gemini);
        assert!(ProviderType::from_str("gemini").is_err());
        assert!(ProviderType::from_str("OpenAI").is_err());
        assert_eq!(ProviderType::Gemini.to_string(), "Gemini");
    }

    #[test]
    fn test_every_provider_offers_models() {
        for provider in ProviderType::iter() {
            assert!(!provider.models().is_empty());
        }
    }
}
