//! Named content producers and route content resolution.

use std::{collections::HashMap, fmt, sync::Arc};

use ssr_gateway_core::{Content, ContentProducer};

use crate::{
    config::{ContentDescriptor, RouteConfig},
    error::{Result, SetupError},
};

/// Producers that routes can reference by name.
#[derive(Clone, Default)]
pub struct ProducerRegistry {
    producers: HashMap<String, Arc<dyn ContentProducer>>,
}

impl ProducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, producer: impl ContentProducer + 'static) {
        self.producers.insert(name.into(), Arc::new(producer));
    }

    pub fn with_producer(
        mut self,
        name: impl Into<String>,
        producer: impl ContentProducer + 'static,
    ) -> Self {
        self.register(name, producer);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ContentProducer>> {
        self.producers.get(name).cloned()
    }

    /// Turn a route's descriptor into the content it renders.
    ///
    /// Exactly one of inline `content` or `producer` must be set.
    pub fn resolve(&self, route: &RouteConfig) -> Result<Content> {
        match (&route.content, &route.producer) {
            (Some(_), Some(_)) => Err(SetupError::AmbiguousContent(route.path.clone())),
            (None, None) => Err(SetupError::MissingContent(route.path.clone())),
            (Some(ContentDescriptor::Markup(html)), None) => Ok(Content::Markup(html.clone())),
            (Some(ContentDescriptor::Result(result)), None) => Ok(Content::Result(result.clone())),
            (None, Some(name)) => self
                .get(name)
                .map(Content::Producer)
                .ok_or_else(|| SetupError::UnknownProducer {
                    path: route.path.clone(),
                    producer: name.clone(),
                }),
        }
    }
}

impl fmt::Debug for ProducerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.producers.keys().collect();
        names.sort();
        f.debug_struct("ProducerRegistry")
            .field("producers", &names)
            .finish()
    }
}
