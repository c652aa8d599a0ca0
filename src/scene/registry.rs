use std::collections::BTreeMap;

use crate::scene::object::{Primitive, SceneObject};

/// Stable handle to an object owned by an [`ObjectRegistry`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u32);

/// Name-keyed object store. Same lookup-or-create contract as the material registry.
#[derive(Clone, Debug, Default)]
pub struct ObjectRegistry {
    by_name: BTreeMap<String, ObjectId>,
    objects: Vec<SceneObject>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id registered under `name`, creating a fresh object from `primitive` if
    /// absent. An existing object is returned untouched.
    pub fn lookup_or_create(&mut self, name: &str, primitive: Primitive) -> ObjectId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject::new(name, primitive));
        self.by_name.insert(name.to_string(), id);
        tracing::debug!(object = name, id = id.0, "registered object");
        id
    }

    /// Id registered under `name`, if any.
    pub fn id_for(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    /// Borrow an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    /// Mutably borrow an object.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0 as usize)
    }

    /// Borrow an object by name.
    pub fn by_name(&self, name: &str) -> Option<&SceneObject> {
        self.id_for(name).and_then(|id| self.get(id))
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Return `true` when the registry holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.objects.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
