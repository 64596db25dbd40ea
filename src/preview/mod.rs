//! The extraction result and its name-indexed property store.
//!
//! Properties are stored as strings so that independently written
//! processors can merge into the same field. Typed reads and writes go
//! through [`PropertyName`] descriptors, which parse on the way out and
//! serialize on the way in.

pub mod names;
pub mod property;

pub use names::{
    AUDIO_URL, CANONICAL_URL, DESCRIPTION, FAVICON_URL, IMAGE_URL, PropertyName, PropertyValue,
    TITLE, VIDEO_URL,
};
pub use property::{Property, WriteMode};

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use url::Url;

const DESCRIPTION_DISPLAY_LIMIT: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct LinkPreview {
    url: Url,
    properties: HashMap<String, Property>,
}

impl LinkPreview {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            properties: HashMap::new(),
        }
    }

    /// The URL the preview was requested for.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn properties(&self) -> &HashMap<String, Property> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Inserts `property`, or merges it into the existing entry of the same
    /// name according to `mode`.
    pub fn set_property(&mut self, property: Property, mode: WriteMode) {
        match self.properties.get_mut(&property.name) {
            Some(existing) => existing.merge(property, mode),
            None => {
                self.properties.insert(property.name.clone(), property);
            }
        }
    }

    /// Typed read. Missing content and unparsable content both read as `None`.
    pub fn get<T: PropertyValue>(&self, name: PropertyName<T>) -> Option<T> {
        let content = self.properties.get(name.as_str())?.content.as_deref()?;
        T::parse(content, &self.url)
    }

    /// Typed read of a metadata sub-key, e.g. `image` / `width`.
    pub fn metadata<T: PropertyValue>(&self, name: &str, key: &str) -> Option<T> {
        let value = self.properties.get(name)?.metadata.get(key)?;
        T::parse(value, &self.url)
    }

    /// Typed write that replaces any existing content.
    pub fn set<T: PropertyValue>(&mut self, name: PropertyName<T>, value: &T) {
        self.write(name, value, WriteMode::Authoritative);
    }

    /// Typed write that only takes effect when the field has no content yet.
    pub fn fill<T: PropertyValue>(&mut self, name: PropertyName<T>, value: &T) {
        self.write(name, value, WriteMode::FillIfAbsent);
    }

    pub fn contains<T>(&self, name: PropertyName<T>) -> bool {
        self.properties
            .get(name.as_str())
            .is_some_and(|property| property.content.is_some())
    }

    fn write<T: PropertyValue>(&mut self, name: PropertyName<T>, value: &T, mode: WriteMode) {
        let property = Property::new(name.as_str()).with_content(value.to_content());
        self.set_property(property, mode);
    }

    pub fn title(&self) -> Option<String> {
        self.get(TITLE)
    }

    pub fn description(&self) -> Option<String> {
        self.get(DESCRIPTION)
    }

    pub fn canonical_url(&self) -> Option<Url> {
        self.get(CANONICAL_URL)
    }

    pub fn image_url(&self) -> Option<Url> {
        self.get(IMAGE_URL)
    }

    pub fn video_url(&self) -> Option<Url> {
        self.get(VIDEO_URL)
    }

    pub fn audio_url(&self) -> Option<Url> {
        self.get(AUDIO_URL)
    }

    pub fn favicon_url(&self) -> Option<Url> {
        self.get(FAVICON_URL)
    }

    /// `/favicon.ico` at the origin of the preview URL.
    pub fn host_favicon_url(&self) -> Option<Url> {
        self.url.host_str()?;
        self.url.join("/favicon.ico").ok()
    }
}

/// One line per property with content, sorted by name, each followed by its
/// indented metadata sorted by key.
impl fmt::Display for LinkPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.properties.keys().collect();
        names.sort();

        let mut first = true;
        for name in names {
            let property = &self.properties[name];
            let Some(content) = property.content.as_deref() else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            first = false;

            if property.name == DESCRIPTION.as_str()
                && content.chars().count() > DESCRIPTION_DISPLAY_LIMIT
            {
                let prefix: String = content.chars().take(DESCRIPTION_DISPLAY_LIMIT).collect();
                write!(f, "{}: \"{}\" [truncated]", property.name, prefix)?;
            } else {
                write!(f, "{}: \"{}\"", property.name, content)?;
            }

            for (key, value) in &property.metadata {
                write!(f, "\n  {key}: {value}")?;
            }
        }
        Ok(())
    }
}
