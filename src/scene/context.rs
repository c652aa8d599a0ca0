use crate::foundation::core::{DVec3, FrameIndex};
use crate::foundation::error::{SingularityError, SingularityResult};
use crate::material::registry::{MaterialId, MaterialRegistry};
use crate::render::delegate::RenderRequest;
use crate::scene::object::SceneObject;
use crate::scene::registry::{ObjectId, ObjectRegistry};

/// Named group of objects.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Collection {
    /// Collection name.
    pub name: String,
    /// Members in link order.
    pub objects: Vec<ObjectId>,
}

/// The one mutable scene a build writes into.
///
/// Owns both registries, the collections, the world material, the active camera, and the render
/// target. Nothing outside this value is touched by a build.
#[derive(Clone, Debug, Default)]
pub struct SceneContext {
    pub(crate) materials: MaterialRegistry,
    pub(crate) objects: ObjectRegistry,
    collections: Vec<Collection>,
    world: Option<MaterialId>,
    active_camera: Option<ObjectId>,
    render_target: Option<RenderRequest>,
}

impl SceneContext {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every object, material, collection, and setting.
    pub fn clear(&mut self) {
        self.materials.clear();
        self.objects.clear();
        self.collections.clear();
        self.world = None;
        self.active_camera = None;
        self.render_target = None;
    }

    /// Material registry.
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Object registry.
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// Borrow an object by id.
    pub fn object(&self, id: ObjectId) -> SingularityResult<&SceneObject> {
        self.objects
            .get(id)
            .ok_or_else(|| SingularityError::binding(format!("unknown object id {}", id.0)))
    }

    /// Mutably borrow an object by id.
    pub fn object_mut(&mut self, id: ObjectId) -> SingularityResult<&mut SceneObject> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| SingularityError::binding(format!("unknown object id {}", id.0)))
    }

    /// Collections in creation order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Collection by name.
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Link `id` into the collection `name`, creating the collection on first use.
    ///
    /// An object lives in at most one collection; relinking moves it.
    pub fn link_to_collection(&mut self, name: &str, id: ObjectId) -> SingularityResult<()> {
        let obj = self.object_mut(id)?;
        let previous = obj.collection.replace(name.to_string());
        if let Some(prev) = previous
            && prev != name
            && let Some(c) = self.collections.iter_mut().find(|c| c.name == prev)
        {
            c.objects.retain(|&o| o != id);
        }

        let idx = match self.collections.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.collections.push(Collection {
                    name: name.to_string(),
                    objects: Vec::new(),
                });
                self.collections.len() - 1
            }
        };
        let members = &mut self.collections[idx].objects;
        if !members.contains(&id) {
            members.push(id);
        }
        Ok(())
    }

    /// World background material.
    pub fn world(&self) -> Option<MaterialId> {
        self.world
    }

    /// Set the world background material.
    pub fn set_world(&mut self, id: MaterialId) {
        self.world = Some(id);
    }

    /// Camera the scene is rendered through.
    pub fn active_camera(&self) -> Option<ObjectId> {
        self.active_camera
    }

    /// Make `id` the active camera.
    pub fn set_active_camera(&mut self, id: ObjectId) -> SingularityResult<()> {
        if self.object(id)?.camera().is_none() {
            return Err(SingularityError::binding(format!(
                "object '{}' is not a camera",
                self.object(id)?.name
            )));
        }
        self.active_camera = Some(id);
        Ok(())
    }

    /// Configured render target.
    pub fn render_target(&self) -> Option<&RenderRequest> {
        self.render_target.as_ref()
    }

    /// Mutable render target.
    pub fn render_target_mut(&mut self) -> Option<&mut RenderRequest> {
        self.render_target.as_mut()
    }

    /// Replace the render target.
    pub fn set_render_target(&mut self, request: RenderRequest) {
        self.render_target = Some(request);
    }

    /// Copy `source` under a new name, rotated and moved by the given deltas.
    ///
    /// The copy keeps the source's primitive, material, modifiers, constraints, and
    /// collection. `material` overrides the copied material when set. Calling this again with the
    /// same name overwrites the previous copy under the same id.
    pub fn clone_with_transform(
        &mut self,
        source: ObjectId,
        name: &str,
        rotation_delta: DVec3,
        translation_delta: DVec3,
        material: Option<MaterialId>,
    ) -> SingularityResult<ObjectId> {
        let mut copy = self.object(source)?.clone();
        copy.name = name.to_string();
        copy.transform.rotation += rotation_delta;
        copy.transform.location += translation_delta;
        if material.is_some() {
            copy.material = material;
        }
        let collection = copy.collection.take();

        let id = self.objects.lookup_or_create(name, copy.primitive.clone());
        *self.object_mut(id)? = copy;
        if let Some(c) = collection {
            self.link_to_collection(&c, id)?;
        }
        Ok(id)
    }

    /// World-space location of `id` at `frame`.
    ///
    /// Objects bound to a curve by a follow-path constraint are placed on the curve at the
    /// keyed offset, with their own location added on top. Everything else sits at its rest
    /// location.
    pub fn world_location(&self, id: ObjectId, frame: FrameIndex) -> SingularityResult<DVec3> {
        let obj = self.object(id)?;
        let Some(follow) = obj.first_follow_path() else {
            return Ok(obj.transform.location);
        };

        let target = self.object(follow.target)?;
        let path = target.primitive.as_curve().ok_or_else(|| {
            SingularityError::binding(format!(
                "'{}' follows '{}', which is not a curve",
                obj.name, target.name
            ))
        })?;
        let t = if follow.offset.is_empty() {
            0.0
        } else {
            follow.offset.evaluate(frame)?
        };
        let local = path.point_at(t).ok_or_else(|| {
            SingularityError::binding(format!("curve '{}' has no points", target.name))
        })?;
        Ok(target.transform.transform_point(local) + obj.transform.location)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/context.rs"]
mod tests;
