//! Graph document loading
//!
//! A [`DocumentSource`] hands back the raw text of a graph document; parsing
//! turns it into a [`GraphDocument`]. Retrieval failures and shape failures
//! are reported as distinct errors so callers can tell "network issue" from
//! "corrupt data".

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, span, Level};

use crate::core::{Edge, GraphError, Node};

/// The JSON document describing a graph
///
/// ```json
/// { "nodes": [{"id": "p1", "label": "Alice", "type": "person"}],
///   "edges": [{"id": "r1", "source": "p1", "target": "e1", "label": "owns"}] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Parse a document from JSON text
    ///
    /// The original text is kept in the error when parsing fails.
    pub fn from_json(body: &str) -> Result<Self, GraphError> {
        let parse_span = span!(Level::DEBUG, "parse_document", body_len = body.len());
        let _enter = parse_span.enter();

        let document: GraphDocument = serde_json::from_str(body)
            .map_err(|e| GraphError::parse_error(e.to_string(), body))?;
        debug!(
            node_count = document.nodes.len(),
            edge_count = document.edges.len(),
            "Parsed graph document"
        );
        Ok(document)
    }
}

/// Where a graph document comes from
pub trait DocumentSource {
    /// Human readable name used in logs and errors
    fn name(&self) -> String;

    /// Retrieve the raw document text
    fn fetch(&self) -> Result<String, GraphError>;

    /// Retrieve and parse the document
    fn load(&self) -> Result<GraphDocument, GraphError> {
        let body = self.fetch()?;
        info!(source = %self.name(), bytes = body.len(), "Fetched graph document");
        GraphDocument::from_json(&body)
    }
}

/// A document held in memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    body: String,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl DocumentSource for StaticSource {
    fn name(&self) -> String {
        "<memory>".to_string()
    }

    fn fetch(&self) -> Result<String, GraphError> {
        Ok(self.body.clone())
    }
}

/// A document stored on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, GraphError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| GraphError::fetch_error(self.name(), e.to_string()))
    }
}

/// A document piped in on standard input
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

impl DocumentSource for StdinSource {
    fn name(&self) -> String {
        "<stdin>".to_string()
    }

    fn fetch(&self) -> Result<String, GraphError> {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| GraphError::fetch_error(self.name(), e.to_string()))?;
        Ok(content)
    }
}

/// A document served over HTTP, e.g. `/data/graphdata.json`
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "http")]
impl DocumentSource for HttpSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, GraphError> {
        let fail = |e: reqwest::Error| GraphError::fetch_error(self.name(), e.to_string());
        reqwest::blocking::get(&self.url)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(fail)
    }
}
