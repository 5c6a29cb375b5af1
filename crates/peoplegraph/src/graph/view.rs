//! Published layout state
//!
//! A [`GraphView`] owns the most recent successful layout. Loading a new
//! document replaces it in one step; a failed load leaves it untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, span, warn, Level};

use super::{layout, DocumentSource, GraphDocument, GraphLayout, LayoutConfig};
use crate::core::GraphError;

/// Whether anyone still wants the result of a load
///
/// Clones share one flag. The consumer calls [`Interest::withdraw`] when it
/// goes away; a load in flight then throws its result away.
#[derive(Debug, Clone)]
pub struct Interest {
    active: Arc<AtomicBool>,
}

impl Interest {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn withdraw(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for Interest {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a load that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The new layout replaced the previous one
    Published(Arc<GraphLayout>),
    /// The consumer went away before the document arrived
    Discarded,
}

/// Holder of the currently displayed layout
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    config: LayoutConfig,
    current: Option<Arc<GraphLayout>>,
}

impl GraphView {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// The last published layout, if any
    pub fn current(&self) -> Option<Arc<GraphLayout>> {
        self.current.clone()
    }

    /// Fetch, parse and lay out a document, then publish it
    ///
    /// Interest is checked once the fetch returns. Errors leave the previous
    /// layout in place. There are no retries.
    pub fn load(
        &mut self,
        source: &dyn DocumentSource,
        interest: &Interest,
    ) -> Result<LoadOutcome, GraphError> {
        let load_span = span!(Level::INFO, "load", source = %source.name());
        let _enter = load_span.enter();

        let body = source.fetch().map_err(|e| {
            warn!(error = %e, "Fetch failed, keeping previous layout");
            e
        })?;

        if !interest.is_active() {
            info!("Consumer went away, discarding document");
            return Ok(LoadOutcome::Discarded);
        }

        let document = GraphDocument::from_json(&body).map_err(|e| {
            warn!(error = %e, "Parse failed, keeping previous layout");
            e
        })?;

        let layout = Arc::new(layout(&document.nodes, &document.edges, &self.config));
        self.current = Some(Arc::clone(&layout));
        info!(node_count = layout.nodes.len(), "Published layout");
        Ok(LoadOutcome::Published(layout))
    }
}
