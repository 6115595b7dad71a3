use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sanitize::sanitize_name;

/// Description used when a flow does not carry one.
pub const DEFAULT_DESCRIPTION: &str = "A service generated from a flow";

/// A stored flow, as handed over by the persistence layer.
///
/// flowpack never mutates a flow; it only reads its identity and the
/// serialized graph payload.
///
/// # Examples
///
/// ```
/// use flowpack_core::Flow;
///
/// let flow = Flow::new("42", "Test Flow");
/// assert_eq!(flow.slug(), "test_flow");
/// assert!(flow.graph().unwrap().is_empty_graph());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Serialized graph payload (nodes and edges), opaque to flowpack
    pub data: Option<String>,
}

/// Shape of a flow file on disk. `data` may be a JSON string holding the
/// serialized graph or the graph object itself.
#[derive(Deserialize)]
struct FlowFile {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    data: Option<serde_json::Value>,
}

impl Flow {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            data: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Read a flow record from a JSON file.
    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::FlowRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let parsed: FlowFile =
            serde_json::from_str(&content).map_err(|e| crate::Error::FlowParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let id = parsed.id.ok_or(crate::Error::MissingFlowField("id"))?;
        let name = parsed.name.ok_or(crate::Error::MissingFlowField("name"))?;

        let data = match parsed.data {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Some(text),
            Some(inline) => Some(inline.to_string()),
        };

        let flow = Self {
            id,
            name,
            description: parsed.description,
            data,
        };
        flow.validate()?;
        Ok(flow)
    }

    /// Check the fields generation depends on.
    pub fn validate(&self) -> crate::Result<()> {
        if self.id.trim().is_empty() {
            return Err(crate::Error::MissingFlowField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(crate::Error::MissingFlowField("name"));
        }
        if self.slug().is_empty() {
            return Err(crate::Error::InvalidName(self.name.clone()));
        }
        Ok(())
    }

    /// Sanitized name, used for bundle directories and default image names.
    pub fn slug(&self) -> String {
        sanitize_name(&self.name)
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => DEFAULT_DESCRIPTION,
        }
    }

    /// Validated graph payload; an absent payload is the empty graph.
    pub fn graph(&self) -> crate::Result<GraphPayload> {
        GraphPayload::parse(self.data.as_deref())
    }
}

/// A graph payload that is known to be a JSON object.
///
/// Keeps the caller's text verbatim so the generated loader embeds exactly
/// what the persistence layer stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPayload {
    text: String,
}

impl GraphPayload {
    const EMPTY: &'static str = "{}";

    pub fn parse(raw: Option<&str>) -> crate::Result<Self> {
        let text = raw.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Ok(Self::empty());
        }

        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| crate::Error::MalformedGraph { source: e })?;

        match value {
            serde_json::Value::Object(_) => Ok(Self {
                text: text.to_owned(),
            }),
            serde_json::Value::Null => Ok(Self::empty()),
            other => Err(crate::Error::GraphNotObject {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn empty() -> Self {
        Self {
            text: Self::EMPTY.to_owned(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty_graph(&self) -> bool {
        self.text == Self::EMPTY
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
