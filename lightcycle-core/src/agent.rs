//! Agents and the decision provider contract

use std::fmt;
use std::sync::Arc;

use crate::board::Direction;
use crate::view::BoardView;

/// Anything that can steer a light-cycle.
///
/// Requirements:
/// - Must not depend on hidden state for its output: the same visible view
///   has to produce the same direction. Private caches are fine.
/// - May be called from a worker thread, once per turn, with a fresh view.
///
/// Returning `Err` (or panicking) counts as a runtime fault and eliminates
/// the agent that turn.
pub trait DecisionProvider: Send + Sync {
    fn decide(&self, view: &BoardView) -> anyhow::Result<Direction>;
}

impl<F> DecisionProvider for F
where
    F: Fn(&BoardView) -> anyhow::Result<Direction> + Send + Sync,
{
    fn decide(&self, view: &BoardView) -> anyhow::Result<Direction> {
        self(view)
    }
}

/// Pass a closure through unchanged, pinning its signature so the
/// compiler can infer argument and error types.
pub fn provider_fn<F>(f: F) -> F
where
    F: Fn(&BoardView) -> anyhow::Result<Direction> + Send + Sync,
{
    f
}

/// A registered participant. Cheap to clone; the provider is shared.
#[derive(Clone)]
pub struct Agent {
    name: String,
    author: String,
    provider: Arc<dyn DecisionProvider>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        provider: impl DecisionProvider + 'static,
    ) -> Self {
        Self::from_shared(name, author, Arc::new(provider))
    }

    pub fn from_shared(
        name: impl Into<String>,
        author: impl Into<String>,
        provider: Arc<dyn DecisionProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            provider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn provider(&self) -> &Arc<dyn DecisionProvider> {
        &self.provider
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("author", &self.author)
            .finish_non_exhaustive()
    }
}
