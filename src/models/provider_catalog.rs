use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::ContentCategory;

/// A streaming provider known to the catalog API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderEntry {
    /// Watch provider id in the catalog API
    pub provider_id: u32,
    /// Name written into snapshot rows (e.g., "Netflix", "Hulu")
    pub display_name: String,
}

impl ProviderEntry {
    pub fn new(provider_id: u32, display_name: impl Into<String>) -> Self {
        Self {
            provider_id,
            display_name: display_name.into(),
        }
    }
}

/// Static set of providers and categories covered by one aggregation pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderCatalog {
    providers: Vec<ProviderEntry>,
    categories: Vec<ContentCategory>,
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderEntry::new(8, "Netflix"),
                ProviderEntry::new(2, "Apple TV"),
                ProviderEntry::new(9, "Amazon Prime"),
                ProviderEntry::new(337, "Disney+"),
                ProviderEntry::new(384, "HBO Max"),
                ProviderEntry::new(15, "Hulu"),
            ],
            categories: vec![ContentCategory::Movie, ContentCategory::TvShow],
        }
    }
}

impl ProviderCatalog {
    /// Creates a catalog, rejecting duplicate provider ids
    pub fn new(
        providers: Vec<ProviderEntry>,
        categories: Vec<ContentCategory>,
    ) -> AppResult<Self> {
        for (idx, entry) in providers.iter().enumerate() {
            if providers[..idx]
                .iter()
                .any(|other| other.provider_id == entry.provider_id)
            {
                return Err(AppError::Configuration(format!(
                    "Duplicate provider id {}",
                    entry.provider_id
                )));
            }
        }

        Ok(Self {
            providers,
            categories,
        })
    }

    pub fn providers(&self) -> &[ProviderEntry] {
        &self.providers
    }

    pub fn categories(&self) -> &[ContentCategory] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = ProviderCatalog::default();
        assert_eq!(catalog.providers().len(), 6);
        assert_eq!(
            catalog.categories(),
            &[ContentCategory::Movie, ContentCategory::TvShow]
        );

        let disney = catalog
            .providers()
            .iter()
            .find(|entry| entry.provider_id == 337)
            .unwrap();
        assert_eq!(disney.display_name, "Disney+");
    }

    #[test]
    fn test_duplicate_provider_rejected() {
        let result = ProviderCatalog::new(
            vec![ProviderEntry::new(8, "Netflix"), ProviderEntry::new(8, "Also Netflix")],
            vec![ContentCategory::Movie],
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
