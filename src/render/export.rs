use std::io::BufWriter;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{SingularityError, SingularityResult};
use crate::material::fingerprint::{GraphFingerprint, fingerprint_graph};
use crate::material::graph::MaterialGraph;
use crate::material::registry::MaterialId;
use crate::render::delegate::RenderRequest;
use crate::render::process::ensure_parent_dir;
use crate::scene::context::{Collection, SceneContext};
use crate::scene::object::SceneObject;
use crate::scene::registry::ObjectId;

/// Format version written into every document.
pub const SCENE_DOCUMENT_VERSION: &str = "1";

/// A material graph with its id and structural fingerprint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialEntry {
    /// Registry id.
    pub id: MaterialId,
    /// Structural fingerprint of `graph`.
    pub fingerprint: GraphFingerprint,
    /// The graph.
    pub graph: MaterialGraph,
}

/// An object with its id.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectEntry {
    /// Registry id.
    pub id: ObjectId,
    /// The object.
    pub object: SceneObject,
}

/// Self-contained, serializable snapshot of a built scene.
///
/// This is what a renderer receives. Ids inside objects refer to the `id` fields of the entries.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDocument {
    /// Document format version.
    pub version: String,
    /// Material graphs in registration order.
    pub materials: Vec<MaterialEntry>,
    /// Objects in creation order.
    pub objects: Vec<ObjectEntry>,
    /// Collections in creation order.
    pub collections: Vec<Collection>,
    /// World background material.
    pub world: Option<MaterialId>,
    /// Active camera.
    pub active_camera: Option<ObjectId>,
    /// Render target configured on the scene.
    pub render: Option<RenderRequest>,
}

impl SceneDocument {
    /// Snapshot `ctx`.
    pub fn capture(ctx: &SceneContext) -> Self {
        Self {
            version: SCENE_DOCUMENT_VERSION.to_string(),
            materials: ctx
                .materials()
                .iter()
                .map(|(id, graph)| MaterialEntry {
                    id,
                    fingerprint: fingerprint_graph(graph),
                    graph: graph.clone(),
                })
                .collect(),
            objects: ctx
                .objects()
                .iter()
                .map(|(id, object)| ObjectEntry {
                    id,
                    object: object.clone(),
                })
                .collect(),
            collections: ctx.collections().to_vec(),
            world: ctx.world(),
            active_camera: ctx.active_camera(),
            render: ctx.render_target().cloned(),
        }
    }

    /// Object entry by name.
    pub fn object(&self, name: &str) -> Option<&ObjectEntry> {
        self.objects.iter().find(|o| o.object.name == name)
    }

    /// Material entry by name.
    pub fn material(&self, name: &str) -> Option<&MaterialEntry> {
        self.materials.iter().find(|m| m.graph.name() == name)
    }

    /// Pretty JSON.
    pub fn to_json_pretty(&self) -> SingularityResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SingularityError::serde(format!("serialize scene document: {e}")))
    }

    /// Parse a document.
    pub fn from_json(s: &str) -> SingularityResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| SingularityError::serde(format!("parse scene document: {e}")))
    }

    /// Write pretty JSON to `path`, creating parent directories.
    pub fn write_json(&self, path: &Path) -> SingularityResult<()> {
        ensure_parent_dir(path)?;
        let f = std::fs::File::create(path)
            .with_context(|| format!("create scene document '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), self)
            .map_err(|e| SingularityError::serde(format!("write scene document: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
