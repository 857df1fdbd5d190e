use serde_json::Value;

use crate::host::Surface;
use crate::overlay::error::OverlayError;
use crate::surface::surface_model::RawElement;

/// A fixed element walk, e.g. one captured to a file.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSurface {
    pub elements: Vec<RawElement>,
}

impl SnapshotSurface {
    pub fn new(elements: Vec<RawElement>) -> Self {
        Self { elements }
    }

    /// Accepts either a bare array of nodes or an object with an `elements` array.
    pub fn from_json(raw: &Value) -> Result<Self, OverlayError> {
        let nodes = match raw {
            Value::Array(_) => raw,
            _ => raw.get("elements").filter(|v| v.is_array()).ok_or_else(|| {
                OverlayError::Input("surface snapshot has no 'elements' array".into())
            })?,
        };

        let elements: Vec<RawElement> =
            serde_json::from_value(nodes.clone()).map_err(|e| OverlayError::JsonParse {
                context: "surface snapshot".into(),
                source: e,
            })?;
        Ok(Self { elements })
    }
}

impl Surface for SnapshotSurface {
    fn walk(&mut self) -> Result<Vec<RawElement>, OverlayError> {
        Ok(self.elements.clone())
    }
}
