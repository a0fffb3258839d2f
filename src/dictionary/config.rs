use serde::{Deserialize, Serialize};

/// Settings of a [`crate::Dictionary`]
///
/// # Examples
/// ```
/// use category_dictionary::DictionaryConfig;
/// let config = DictionaryConfig::named("news").case_sensitive(true);
/// assert_eq!(config.name, "news");
/// assert!(config.read_from_index_for_update);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// dictionary name, also used to name index files
    pub name: String,
    /// keep terms as given instead of lower casing them
    pub case_sensitive: bool,
    /// Read the stored entries of a term before updating it.
    /// When false every update is written as a first sighting, which skips
    /// a read per update but counts every call towards category frequency.
    pub read_from_index_for_update: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        DictionaryConfig {
            name: "dictionary".to_string(),
            case_sensitive: false,
            read_from_index_for_update: true,
        }
    }
}

impl DictionaryConfig {
    pub fn named(name: impl Into<String>) -> Self {
        DictionaryConfig {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn read_from_index_for_update(mut self, read: bool) -> Self {
        self.read_from_index_for_update = read;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: DictionaryConfig = serde_json::from_str(r#"{"name":"spam"}"#).unwrap();
        assert_eq!(config.name, "spam");
        assert!(!config.case_sensitive);
        assert!(config.read_from_index_for_update);
    }
}
