use serde::Serialize;
use std::collections::BTreeMap;

/// How a write treats values that are already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// First writer wins: only fill what is missing.
    FillIfAbsent,
    /// Overwrite content and conflicting metadata keys.
    Authoritative,
}

impl WriteMode {
    pub fn authoritative(is_authoritative: bool) -> Self {
        if is_authoritative {
            Self::Authoritative
        } else {
            Self::FillIfAbsent
        }
    }
}

/// One named metadata field and its second-level sub-keys
/// (`image` with `width`, `height`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merges `incoming` into `self`. Metadata keys present on only one side
    /// are always kept; content and conflicting keys follow `mode`.
    pub fn merge(&mut self, incoming: Property, mode: WriteMode) {
        if let Some(content) = incoming.content
            && (self.content.is_none() || mode == WriteMode::Authoritative)
        {
            self.content = Some(content);
        }

        for (key, value) in incoming.metadata {
            match mode {
                WriteMode::Authoritative => {
                    self.metadata.insert(key, value);
                }
                WriteMode::FillIfAbsent => {
                    self.metadata.entry(key).or_insert(value);
                }
            }
        }
    }
}
