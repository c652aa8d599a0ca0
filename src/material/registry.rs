use std::collections::BTreeMap;

use crate::material::graph::{GraphDomain, MaterialGraph};

/// Stable handle to a graph owned by a [`MaterialRegistry`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MaterialId(pub u32);

/// Name-keyed store of material graphs with lookup-or-create semantics.
///
/// Asking for a name that is already present returns the existing id; nothing is ever
/// duplicated by name.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    by_name: BTreeMap<String, MaterialId>,
    graphs: Vec<MaterialGraph>,
}

impl MaterialRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id registered under `name`, creating an empty graph if absent.
    pub fn lookup_or_create(&mut self, name: &str, domain: GraphDomain) -> MaterialId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = MaterialId(self.graphs.len() as u32);
        self.graphs.push(MaterialGraph::new(name, domain));
        self.by_name.insert(name.to_string(), id);
        tracing::debug!(material = name, id = id.0, "registered material");
        id
    }

    /// Id registered under `name`, if any.
    pub fn id_for(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a graph.
    pub fn get(&self, id: MaterialId) -> Option<&MaterialGraph> {
        self.graphs.get(id.0 as usize)
    }

    /// Mutably borrow a graph.
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut MaterialGraph> {
        self.graphs.get_mut(id.0 as usize)
    }

    /// Borrow a graph by name.
    pub fn by_name(&self, name: &str) -> Option<&MaterialGraph> {
        self.id_for(name).and_then(|id| self.get(id))
    }

    /// Number of registered graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Graphs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialGraph)> {
        self.graphs
            .iter()
            .enumerate()
            .map(|(i, g)| (MaterialId(i as u32), g))
    }

    /// Forget every graph.
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.graphs.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/registry.rs"]
mod tests;
