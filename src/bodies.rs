//! The black hole system: horizon, photon ring, accretion disk, dust, jets, and lensing shell.

use crate::foundation::core::{DVec3, euler_degrees};
use crate::foundation::error::SingularityResult;
use crate::material::builder::{
    DUST_RADIUS_FACTOR, JET_DEPTH_FACTOR, MaterialGraphBuilder, MaterialKind,
};
use crate::material::registry::MaterialId;
use crate::scene::context::SceneContext;
use crate::scene::object::{Axis, DeformMethod, DisplayMode, ModifierKind, Primitive, SimpleDeform};
use crate::scene::registry::ObjectId;
use crate::settings::BlackHoleParams;

/// Collection every celestial body is linked into.
pub const BLACK_HOLE_COLLECTION: &str = "BlackHole_System";

const PHOTON_RING_MAJOR: f64 = 1.15;
const PHOTON_RING_MINOR: f64 = 0.12;
const DISK_MAJOR: f64 = 3.0;
const DISK_MINOR: f64 = 1.2;
const DISK_THICKNESS_SCALE: f64 = 0.1;
const FAR_DISK_TILT_DEG: f64 = 178.0;
const FAR_DISK_LIFT: f64 = 0.45;
const FAR_DISK_BEND_DEG: f64 = 165.0;
const FAR_DISK_TAPER: f64 = -0.35;
const JET_BASE_RADIUS: f64 = 0.35;
const LENS_RADIUS: f64 = 2.4;

/// Handles to every body created by [`CelestialBodyFactory::build`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CelestialBodies {
    /// Event horizon sphere.
    pub event_horizon: ObjectId,
    /// Photon ring torus.
    pub photon_ring: ObjectId,
    /// Front accretion disk.
    pub disk_near: ObjectId,
    /// Lensed back disk.
    pub disk_far: ObjectId,
    /// Dust envelope.
    pub dust: ObjectId,
    /// Jet along `+Z`.
    pub jet_north: ObjectId,
    /// Jet along `-Z`.
    pub jet_south: ObjectId,
    /// Lensing portal shell.
    pub lensing_shell: ObjectId,
}

/// Builds the bodies of the black hole system in a fixed order.
pub struct CelestialBodyFactory;

impl CelestialBodyFactory {
    /// Create (or rebuild in place) every body. All sizes scale with `params.radius`.
    #[tracing::instrument(skip_all, fields(radius = params.radius))]
    pub fn build(
        ctx: &mut SceneContext,
        params: &BlackHoleParams,
    ) -> SingularityResult<CelestialBodies> {
        let r = params.radius;

        let event_horizon = body(
            ctx,
            params,
            "BH_EventHorizon",
            Primitive::UvSphere { radius: r },
            "BH_EventHorizon_MAT",
            MaterialKind::EventHorizon,
        )?;

        let photon_ring = body(
            ctx,
            params,
            "BH_PhotonRing",
            Primitive::Torus {
                major_radius: PHOTON_RING_MAJOR * r,
                minor_radius: PHOTON_RING_MINOR * r,
            },
            "BH_PhotonRing_MAT",
            MaterialKind::PhotonRing,
        )?;

        let disk_near = body(
            ctx,
            params,
            "BH_AccretionDisk",
            Primitive::Torus {
                major_radius: DISK_MAJOR * r,
                minor_radius: DISK_MINOR * r,
            },
            "BH_AccretionDisk_MAT",
            MaterialKind::AccretionDiskNear,
        )?;
        ctx.object_mut(disk_near)?.transform.scale.z = DISK_THICKNESS_SCALE;

        let far_mat = material(
            ctx,
            params,
            "BH_AccretionDisk_Far_MAT",
            MaterialKind::AccretionDiskFar,
        )?;
        let disk_far = ctx.clone_with_transform(
            disk_near,
            "BH_AccretionDisk_Far",
            euler_degrees(FAR_DISK_TILT_DEG, 0.0, 0.0),
            DVec3::new(0.0, 0.0, FAR_DISK_LIFT * r),
            Some(far_mat),
        )?;
        {
            let far = ctx.object_mut(disk_far)?;
            far.add_modifier(
                "DiskBend",
                ModifierKind::SimpleDeform(SimpleDeform::new(
                    DeformMethod::Bend,
                    Axis::X,
                    FAR_DISK_BEND_DEG.to_radians(),
                )),
            );
            far.add_modifier(
                "DiskTaper",
                ModifierKind::SimpleDeform(SimpleDeform::new(
                    DeformMethod::Taper,
                    Axis::Z,
                    FAR_DISK_TAPER,
                )),
            );
        }

        let dust = body(
            ctx,
            params,
            "BH_DustEnvelope",
            Primitive::UvSphere {
                radius: DUST_RADIUS_FACTOR * r,
            },
            "BH_DustVolume_MAT",
            MaterialKind::DustVolume,
        )?;

        // Flipped so the cone base (local +Z) sits on the horizon and the tip points away.
        let depth = JET_DEPTH_FACTOR * r;
        let jet_north = body(
            ctx,
            params,
            "BH_Jet_North",
            Primitive::Cone {
                base_radius: JET_BASE_RADIUS * r,
                depth,
            },
            "BH_Jet_MAT",
            MaterialKind::Jet,
        )?;
        {
            let t = &mut ctx.object_mut(jet_north)?.transform;
            t.location = DVec3::new(0.0, 0.0, depth * 0.5);
            t.rotation = euler_degrees(180.0, 0.0, 0.0);
        }
        let jet_south = ctx.clone_with_transform(
            jet_north,
            "BH_Jet_South",
            euler_degrees(180.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -depth),
            None,
        )?;

        let lensing_shell = body(
            ctx,
            params,
            "BH_LensingShell",
            Primitive::UvSphere {
                radius: LENS_RADIUS * r,
            },
            "BH_LensingShell_MAT",
            MaterialKind::LensingShell,
        )?;
        {
            let lens = ctx.object_mut(lensing_shell)?;
            lens.display = DisplayMode::Wire;
            lens.portal = true;
        }

        tracing::debug!(objects = ctx.objects().len(), "celestial bodies built");
        Ok(CelestialBodies {
            event_horizon,
            photon_ring,
            disk_near,
            disk_far,
            dust,
            jet_north,
            jet_south,
            lensing_shell,
        })
    }
}

fn material(
    ctx: &mut SceneContext,
    params: &BlackHoleParams,
    name: &str,
    kind: MaterialKind,
) -> SingularityResult<MaterialId> {
    MaterialGraphBuilder::build(&mut ctx.materials, name, &kind, params)
}

fn body(
    ctx: &mut SceneContext,
    params: &BlackHoleParams,
    name: &str,
    primitive: Primitive,
    material_name: &str,
    kind: MaterialKind,
) -> SingularityResult<ObjectId> {
    let mat = material(ctx, params, material_name, kind)?;
    let id = ctx.objects.lookup_or_create(name, primitive.clone());
    {
        let obj = ctx.object_mut(id)?;
        obj.primitive = primitive;
        obj.material = Some(mat);
    }
    ctx.link_to_collection(BLACK_HOLE_COLLECTION, id)?;
    Ok(id)
}

#[cfg(test)]
#[path = "../tests/unit/bodies.rs"]
mod tests;
