//! Stream filter chains.
//!
//! A recipe is a comma-separated list of filter names, e.g.
//! `"prefetch,cache_read"`. Each named filter wraps the stream built so far,
//! left to right. A filter that is unknown or declines is skipped and the
//! stream below it is kept, so a recipe never makes a stream unusable.

use tracing::debug;

use super::Stream;

/// Builds decorated streams from recipes.
pub trait FilterChain: Send + Sync {
    /// Wrap `source` with the filters named by `recipe`.
    fn wrap(&self, source: Box<dyn Stream>, recipe: &str) -> Box<dyn Stream>;
}

/// One named stream filter.
pub trait StreamFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Wrap `source`, or hand it back unchanged when the filter does not
    /// apply to it.
    fn open(&self, source: Box<dyn Stream>) -> Result<Box<dyn Stream>, Box<dyn Stream>>;
}

/// Filter chain backed by a list of registered filters.
///
/// The default registry has no filters and returns every stream as is.
#[derive(Default)]
pub struct FilterRegistry {
    filters: Vec<Box<dyn StreamFilter>>,
}

impl FilterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn StreamFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    fn find(&self, name: &str) -> Option<&dyn StreamFilter> {
        self.filters
            .iter()
            .find(|filter| filter.name() == name)
            .map(|filter| &**filter)
    }
}

impl FilterChain for FilterRegistry {
    fn wrap(&self, source: Box<dyn Stream>, recipe: &str) -> Box<dyn Stream> {
        let mut stream = source;

        for name in recipe.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let Some(filter) = self.find(name) else {
                debug!("stream filter '{name}' not available, skipped");
                continue;
            };
            stream = match filter.open(stream) {
                Ok(wrapped) => {
                    debug!("stream filter '{name}' attached to {}", wrapped.url());
                    wrapped
                }
                Err(unchanged) => {
                    debug!("stream filter '{name}' declined {}", unchanged.url());
                    unchanged
                }
            };
        }

        stream
    }
}
