use std::sync::Arc;

use crate::processors::{
    GenericHtmlProcessor, MetadataProcessor, OpenGraphProcessor, WikipediaProcessor,
};

/// Ordered set of processors, keyed by [`MetadataProcessor::id`].
#[derive(Clone)]
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn MetadataProcessor>>,
}

impl ProcessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// OpenGraph first so its authoritative writes land before the
    /// fill-if-absent fallbacks look at the preview.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(OpenGraphProcessor);
        registry.register(GenericHtmlProcessor);
        registry.register(WikipediaProcessor::new());
        registry
    }

    /// Appends `processor`. Returns `false` (and keeps the existing entry)
    /// if a processor with the same id is already registered.
    pub fn register<P: MetadataProcessor>(&mut self, processor: P) -> bool {
        if self.contains(processor.id()) {
            return false;
        }
        self.processors.push(Arc::new(processor));
        true
    }

    /// Removes the processor with `id`. Returns `false` if there was none.
    pub fn unregister(&mut self, id: &str) -> bool {
        match self.processors.iter().position(|p| p.id() == id) {
            Some(index) => {
                self.processors.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.processors.iter().any(|p| p.id() == id)
    }

    /// Registered ids in run order.
    pub fn registered_ids(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MetadataProcessor>> {
        self.processors.iter()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::LinkPreview;
    use crate::processors::ProcessingContext;
    use async_trait::async_trait;

    struct TestProcessor;

    #[async_trait(?Send)]
    impl MetadataProcessor for TestProcessor {
        fn id(&self) -> &'static str {
            "test_processor"
        }

        async fn update_preview(&self, _preview: &mut LinkPreview, _cx: &ProcessingContext<'_>) {}
    }

    #[test]
    fn test_default_order() {
        let registry = ProcessorRegistry::with_defaults();
        assert_eq!(
            registry.registered_ids(),
            vec!["open_graph", "generic_html", "wikipedia"]
        );
    }

    #[test]
    fn test_register_appends_once() {
        let mut registry = ProcessorRegistry::with_defaults();
        assert!(registry.register(TestProcessor));
        assert!(!registry.register(TestProcessor));

        let ids = registry.registered_ids();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids.last(), Some(&"test_processor"));
    }

    #[test]
    fn test_unregister() {
        let mut registry = ProcessorRegistry::with_defaults();
        assert!(!registry.unregister("test_processor"));
        assert_eq!(registry.registered_ids().len(), 3);

        assert!(registry.unregister(OpenGraphProcessor::ID));
        assert!(!registry.contains(OpenGraphProcessor::ID));

        // Re-registering moves it to the end.
        registry.register(OpenGraphProcessor);
        assert_eq!(
            registry.registered_ids(),
            vec!["generic_html", "wikipedia", "open_graph"]
        );
    }
}
