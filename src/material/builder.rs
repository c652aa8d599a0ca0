use std::path::PathBuf;

use crate::foundation::core::{DVec3, Rgba};
use crate::foundation::error::{SingularityError, SingularityResult};
use crate::material::graph::{
    BlendType, ColorStop, GradientType, GraphDomain, MaterialGraph, MathOp, NodeId, NodeKind,
    RampInterpolation, VectorMathOp, VoronoiFeature,
};
use crate::material::registry::{MaterialId, MaterialRegistry};
use crate::settings::BlackHoleParams;

/// Emission strength of a freshly built placeholder or image plane.
pub const PLANE_EMISSION_STRENGTH: f64 = 3.0;
/// Emission strength once an ingested plane has been placed in the scene.
pub const PLACED_EMISSION_STRENGTH: f64 = 3.5;

const EVENT_HORIZON_CORE_STRENGTH: f64 = 0.02;
const EVENT_HORIZON_RIM_STRENGTH: f64 = 1.2;
const PHOTON_RING_STRENGTH: f64 = 65.0;
const FAR_DISK_EMISSION_MULTIPLIER: f64 = 0.65;
const DUST_ANISOTROPY: f64 = 0.35;
const JET_STRENGTH: f64 = 28.0;
const LENS_IOR: f64 = 1.45;

/// Jet length in units of the event horizon radius; the jet material normalizes its local Z
/// over half of it.
pub(crate) const JET_DEPTH_FACTOR: f64 = 10.0;
/// Dust envelope radius in units of the event horizon radius; the dust material normalizes
/// object-space distance by it.
pub(crate) const DUST_RADIUS_FACTOR: f64 = 5.0;

const DISK_WARM_HIGHLIGHT: Rgba = Rgba::rgb(1.0, 0.78, 0.45);
const JET_BASE_BLUE: Rgba = Rgba::rgb(0.1, 0.3, 0.9);
const LENS_EMISSION: Rgba = Rgba::rgb(0.2, 0.3, 0.45);

/// Surface type a graph is built for.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    /// Near-black sphere with a grazing-angle rim glow.
    EventHorizon,
    /// Bright noisy torus hugging the horizon.
    PhotonRing,
    /// Front accretion disk.
    AccretionDiskNear,
    /// Lensed back side of the disk, dimmer than the front.
    AccretionDiskFar,
    /// Scattering dust envelope (volume).
    DustVolume,
    /// Polar jet.
    Jet,
    /// Transparent portal shell with a faint Fresnel glow.
    LensingShell,
    /// Solid emissive stand-in for a missing image.
    Placeholder {
        /// Emitted color.
        color: Rgba,
    },
    /// Emissive plane textured from an image file.
    ImagePlane {
        /// Image on disk.
        path: PathBuf,
    },
    /// Nebula and star field background.
    WorldBackground,
}

impl MaterialKind {
    /// Domain of the graph this kind produces.
    pub fn domain(&self) -> GraphDomain {
        match self {
            Self::WorldBackground => GraphDomain::World,
            _ => GraphDomain::Object,
        }
    }
}

/// Assembles the fixed node topology for each [`MaterialKind`].
///
/// Only per-node parameters depend on [`BlackHoleParams`]. Every call clears the target graph
/// first, so the result is a pure function of `(kind, params)`.
pub struct MaterialGraphBuilder;

impl MaterialGraphBuilder {
    /// Build (or rebuild in place) the graph registered under `name`.
    #[tracing::instrument(skip(registry, params))]
    pub fn build(
        registry: &mut MaterialRegistry,
        name: &str,
        kind: &MaterialKind,
        params: &BlackHoleParams,
    ) -> SingularityResult<MaterialId> {
        let domain = kind.domain();
        let id = registry.lookup_or_create(name, domain);
        let graph = registry
            .get_mut(id)
            .ok_or_else(|| SingularityError::graph(format!("material '{name}' vanished")))?;
        graph.clear();
        graph.set_domain(domain);

        match kind {
            MaterialKind::EventHorizon => event_horizon(graph, params)?,
            MaterialKind::PhotonRing => photon_ring(graph, params)?,
            MaterialKind::AccretionDiskNear => accretion_disk(graph, params, 1.0)?,
            MaterialKind::AccretionDiskFar => {
                accretion_disk(graph, params, FAR_DISK_EMISSION_MULTIPLIER)?
            }
            MaterialKind::DustVolume => dust_volume(graph, params)?,
            MaterialKind::Jet => jet(graph, params)?,
            MaterialKind::LensingShell => lensing_shell(graph)?,
            MaterialKind::Placeholder { color } => placeholder(graph, *color)?,
            MaterialKind::ImagePlane { path } => image_plane(graph, path.clone())?,
            MaterialKind::WorldBackground => world_background(graph)?,
        }

        graph.validate()?;
        Ok(id)
    }
}

fn disk_color(params: &BlackHoleParams) -> Rgba {
    Rgba::from_rgb(params.disk_color)
}

fn mapping(rotation_z: f64, scale: DVec3) -> NodeKind {
    NodeKind::Mapping {
        location: DVec3::ZERO,
        rotation: DVec3::new(0.0, 0.0, rotation_z),
        scale,
    }
}

fn ramp(interpolation: RampInterpolation, stops: &[(f64, Rgba)]) -> NodeKind {
    NodeKind::ColorRamp {
        interpolation,
        stops: stops.iter().map(|&(p, c)| ColorStop::new(p, c)).collect(),
    }
}

fn mix_rgb(blend: BlendType, factor: f64) -> NodeKind {
    NodeKind::MixRgb {
        blend,
        factor,
        color1: Rgba::WHITE,
        color2: Rgba::WHITE,
    }
}

fn emission(color: Rgba, strength: f64) -> NodeKind {
    NodeKind::Emission { color, strength }
}

fn math(op: MathOp, a: f64, b: f64) -> NodeKind {
    NodeKind::Math { op, a, b }
}

fn surface_out(g: &mut MaterialGraph, shader: NodeId, socket: &str) -> SingularityResult<()> {
    let out = g.add(NodeKind::MaterialOutput);
    g.link(shader, socket, out, "Surface")
}

fn event_horizon(g: &mut MaterialGraph, params: &BlackHoleParams) -> SingularityResult<()> {
    let core = g.add(emission(
        Rgba::rgb(0.01, 0.01, 0.01),
        EVENT_HORIZON_CORE_STRENGTH,
    ));
    let weight = g.add(NodeKind::LayerWeight { blend: 0.2 });
    let rim_ramp = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.55, Rgba::BLACK), (1.0, disk_color(params))],
    ));
    let rim = g.add(emission(Rgba::WHITE, EVENT_HORIZON_RIM_STRENGTH));
    let sum = g.add(NodeKind::AddShader);

    g.link(weight, "Facing", rim_ramp, "Fac")?;
    g.link(rim_ramp, "Color", rim, "Color")?;
    g.link(core, "Emission", sum, "Shader1")?;
    g.link(rim, "Emission", sum, "Shader2")?;
    surface_out(g, sum, "Shader")
}

fn photon_ring(g: &mut MaterialGraph, params: &BlackHoleParams) -> SingularityResult<()> {
    let coords = g.add(NodeKind::TexCoord);
    let map = g.add(mapping(params.spin * 7.5, DVec3::ONE));
    let noise = g.add(NodeKind::NoiseTexture {
        scale: 45.0,
        detail: 0.25,
        roughness: 0.6,
    });
    let color = g.add(ramp(
        RampInterpolation::Ease,
        &[(0.2, disk_color(params)), (1.0, Rgba::WHITE)],
    ));
    let glow = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.35, Rgba::BLACK), (1.0, Rgba::WHITE)],
    ));
    let mix = g.add(mix_rgb(BlendType::Multiply, 0.65));
    let em = g.add(emission(Rgba::WHITE, PHOTON_RING_STRENGTH));

    g.link(coords, "Object", map, "Vector")?;
    g.link(map, "Vector", noise, "Vector")?;
    g.link(noise, "Fac", color, "Fac")?;
    g.link(noise, "Fac", glow, "Fac")?;
    g.link(color, "Color", mix, "Color1")?;
    g.link(glow, "Color", mix, "Color2")?;
    g.link(mix, "Color", em, "Color")?;
    surface_out(g, em, "Emission")
}

fn accretion_disk(
    g: &mut MaterialGraph,
    params: &BlackHoleParams,
    emission_multiplier: f64,
) -> SingularityResult<()> {
    let coords = g.add(NodeKind::TexCoord);
    let map = g.add(mapping(params.spin * 1.5, DVec3::new(1.0, 0.18, 1.0)));
    let gradient = g.add(NodeKind::GradientTexture {
        gradient: GradientType::Radial,
    });
    let bands = g.add(ramp(
        RampInterpolation::Linear,
        &[
            (0.0, Rgba::rgb(0.02, 0.005, 0.0)),
            (0.22, Rgba::rgb(0.55, 0.12, 0.01)),
            (0.45, disk_color(params)),
            (0.7, Rgba::rgb(1.0, 0.62, 0.2)),
            (1.0, Rgba::rgb(1.0, 0.93, 0.78)),
        ],
    ));
    let noise = g.add(NodeKind::NoiseTexture {
        scale: 55.0,
        detail: 1.25 * params.spin.max(0.1),
        roughness: 0.45,
    });
    let overlay = g.add(mix_rgb(BlendType::Overlay, 0.65));
    let highlight = g.add(NodeKind::MixRgb {
        blend: BlendType::Add,
        factor: 0.4,
        color1: Rgba::WHITE,
        color2: DISK_WARM_HIGHLIGHT,
    });
    let em = g.add(emission(
        Rgba::WHITE,
        params.disk_intensity * emission_multiplier,
    ));

    g.link(coords, "Object", map, "Vector")?;
    g.link(map, "Vector", gradient, "Vector")?;
    g.link(gradient, "Fac", bands, "Fac")?;
    g.link(map, "Vector", noise, "Vector")?;
    g.link(bands, "Color", overlay, "Color1")?;
    g.link(noise, "Color", overlay, "Color2")?;
    g.link(overlay, "Color", highlight, "Color1")?;
    g.link(highlight, "Color", em, "Color")?;
    surface_out(g, em, "Emission")
}

fn dust_volume(g: &mut MaterialGraph, params: &BlackHoleParams) -> SingularityResult<()> {
    let envelope = (params.radius * DUST_RADIUS_FACTOR).max(f64::EPSILON);
    let coords = g.add(NodeKind::TexCoord);
    let distance = g.add(NodeKind::VectorMath {
        op: VectorMathOp::Length,
    });
    let normalized = g.add(math(MathOp::Multiply, 0.0, 1.0 / envelope));
    let radial = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.0, Rgba::WHITE), (0.7, Rgba::BLACK)],
    ));
    let noise = g.add(NodeKind::NoiseTexture {
        scale: 9.0,
        detail: 2.2,
        roughness: 0.65,
    });
    let high_pass = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.3, Rgba::BLACK), (0.85, Rgba::WHITE)],
    ));
    let radial_weight = g.add(math(MathOp::Multiply, 0.0, 0.7));
    let noise_weight = g.add(math(MathOp::Multiply, 0.0, 0.3));
    let sum = g.add(math(MathOp::Add, 0.0, 0.0));
    let density = g.add(math(MathOp::Multiply, 0.0, 0.45));
    let volume = g.add(NodeKind::PrincipledVolume {
        color: disk_color(params),
        density: 1.0,
        anisotropy: DUST_ANISOTROPY,
        emission_strength: 0.5,
    });
    let out = g.add(NodeKind::MaterialOutput);

    g.link(coords, "Object", distance, "A")?;
    g.link(distance, "Value", normalized, "A")?;
    g.link(normalized, "Value", radial, "Fac")?;
    g.link(coords, "Object", noise, "Vector")?;
    g.link(noise, "Fac", high_pass, "Fac")?;
    g.link(radial, "Color", radial_weight, "A")?;
    g.link(high_pass, "Color", noise_weight, "A")?;
    g.link(radial_weight, "Value", sum, "A")?;
    g.link(noise_weight, "Value", sum, "B")?;
    g.link(sum, "Value", density, "A")?;
    g.link(density, "Value", volume, "Density")?;
    g.link(volume, "Volume", out, "Volume")
}

fn jet(g: &mut MaterialGraph, params: &BlackHoleParams) -> SingularityResult<()> {
    // Local Z runs from the base (+half depth) to the tip (-half depth); remap to base 0, tip 1.
    let half_depth = (params.radius * JET_DEPTH_FACTOR * 0.5).max(f64::EPSILON);
    let coords = g.add(NodeKind::TexCoord);
    let split = g.add(NodeKind::SeparateXyz);
    let inverted = g.add(math(MathOp::Multiply, 0.0, -0.5 / half_depth));
    let shifted = g.add(math(MathOp::Add, 0.0, 0.5));
    let gradient = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.0, JET_BASE_BLUE), (1.0, Rgba::WHITE)],
    ));
    let noise = g.add(NodeKind::NoiseTexture {
        scale: 15.0,
        detail: 3.0,
        roughness: 0.4,
    });
    let mix = g.add(mix_rgb(BlendType::Multiply, 0.5));
    let em = g.add(emission(Rgba::WHITE, JET_STRENGTH));

    g.link(coords, "Object", split, "Vector")?;
    g.link(split, "Z", inverted, "A")?;
    g.link(inverted, "Value", shifted, "A")?;
    g.link(shifted, "Value", gradient, "Fac")?;
    g.link(coords, "Object", noise, "Vector")?;
    g.link(gradient, "Color", mix, "Color1")?;
    g.link(noise, "Color", mix, "Color2")?;
    g.link(mix, "Color", em, "Color")?;
    surface_out(g, em, "Emission")
}

fn lensing_shell(g: &mut MaterialGraph) -> SingularityResult<()> {
    let fresnel = g.add(NodeKind::Fresnel { ior: LENS_IOR });
    let clear = g.add(NodeKind::TransparentBsdf);
    let glow = g.add(emission(LENS_EMISSION, 0.15));
    let mix = g.add(NodeKind::MixShader { factor: 0.5 });

    g.link(fresnel, "Fac", mix, "Fac")?;
    g.link(clear, "BSDF", mix, "Shader1")?;
    g.link(glow, "Emission", mix, "Shader2")?;
    surface_out(g, mix, "Shader")
}

fn placeholder(g: &mut MaterialGraph, color: Rgba) -> SingularityResult<()> {
    let em = g.add(emission(color, PLANE_EMISSION_STRENGTH));
    surface_out(g, em, "Emission")
}

fn image_plane(g: &mut MaterialGraph, path: PathBuf) -> SingularityResult<()> {
    let coords = g.add(NodeKind::TexCoord);
    let image = g.add(NodeKind::ImageTexture { path });
    let em = g.add(emission(Rgba::WHITE, PLANE_EMISSION_STRENGTH));

    g.link(coords, "UV", image, "Vector")?;
    g.link(image, "Color", em, "Color")?;
    surface_out(g, em, "Emission")
}

fn world_background(g: &mut MaterialGraph) -> SingularityResult<()> {
    let coords = g.add(NodeKind::TexCoord);
    let map = g.add(mapping(0.5, DVec3::ONE));
    let noise = g.add(NodeKind::NoiseTexture {
        scale: 5.0,
        detail: 2.0,
        roughness: 0.5,
    });
    let nebula = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.0, Rgba::BLACK), (1.0, Rgba::rgb(0.4, 0.4, 0.6))],
    ));
    let cells = g.add(NodeKind::VoronoiTexture {
        feature: VoronoiFeature::SmoothF1,
        scale: 180.0,
    });
    let closeness = g.add(math(MathOp::Subtract, 1.0, 0.0));
    let stars = g.add(ramp(
        RampInterpolation::Linear,
        &[(0.96, Rgba::BLACK), (1.0, Rgba::WHITE)],
    ));
    let sum = g.add(mix_rgb(BlendType::Add, 1.0));
    let background = g.add(NodeKind::Background {
        color: Rgba::rgb(0.02, 0.02, 0.05),
        strength: 0.3,
    });
    let out = g.add(NodeKind::WorldOutput);

    g.link(coords, "Generated", map, "Vector")?;
    g.link(map, "Vector", noise, "Vector")?;
    g.link(noise, "Fac", nebula, "Fac")?;
    g.link(coords, "Generated", cells, "Vector")?;
    g.link(cells, "Distance", closeness, "B")?;
    g.link(closeness, "Value", stars, "Fac")?;
    g.link(nebula, "Color", sum, "Color1")?;
    g.link(stars, "Color", sum, "Color2")?;
    g.link(sum, "Color", background, "Color")?;
    g.link(background, "Background", out, "Surface")
}

#[cfg(test)]
#[path = "../../tests/unit/material/builder.rs"]
mod tests;
