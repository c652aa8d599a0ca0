use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{DVec3, Rgba};
use crate::material::graph::{
    BlendType, GradientType, GraphDomain, MaterialGraph, MathOp, NodeKind, RampInterpolation,
    VectorMathOp, VoronoiFeature,
};

const XXH3_SEED: u64 = 0x5b1d_3a7c_e402_9f61;

/// Stable structural fingerprint of a material graph.
///
/// Two graphs with equal fingerprints have the same topology and the same parameters. The
/// graph name is not hashed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GraphFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint `graph`.
pub fn fingerprint_graph(graph: &MaterialGraph) -> GraphFingerprint {
    let mut h = StableHasher::new();
    h.write_u8(match graph.domain() {
        GraphDomain::Object => 0,
        GraphDomain::World => 1,
    });

    h.write_u32(graph.nodes().len() as u32);
    for node in graph.nodes() {
        write_kind(&mut h, &node.kind);
    }

    h.write_u32(graph.links().len() as u32);
    for link in graph.links() {
        h.write_u32(link.from.0);
        h.write_str(&link.from_socket);
        h.write_u32(link.to.0);
        h.write_str(&link.to_socket);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn write_vec3(&mut self, v: DVec3) {
        self.write_f64(v.x);
        self.write_f64(v.y);
        self.write_f64(v.z);
    }

    fn write_rgba(&mut self, c: Rgba) {
        self.write_f64(c.r);
        self.write_f64(c.g);
        self.write_f64(c.b);
        self.write_f64(c.a);
    }

    fn finish(self) -> GraphFingerprint {
        let v = self.inner.digest128();
        GraphFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_kind(h: &mut StableHasher, kind: &NodeKind) {
    match kind {
        NodeKind::TexCoord => h.write_u8(0),
        NodeKind::Mapping {
            location,
            rotation,
            scale,
        } => {
            h.write_u8(1);
            h.write_vec3(*location);
            h.write_vec3(*rotation);
            h.write_vec3(*scale);
        }
        NodeKind::NoiseTexture {
            scale,
            detail,
            roughness,
        } => {
            h.write_u8(2);
            h.write_f64(*scale);
            h.write_f64(*detail);
            h.write_f64(*roughness);
        }
        NodeKind::GradientTexture { gradient } => {
            h.write_u8(3);
            h.write_u8(match gradient {
                GradientType::Radial => 2,
            });
        }
        NodeKind::VoronoiTexture { feature, scale } => {
            h.write_u8(4);
            h.write_u8(match feature {
                VoronoiFeature::SmoothF1 => 1,
            });
            h.write_f64(*scale);
        }
        NodeKind::ImageTexture { path } => {
            h.write_u8(5);
            h.write_str(&path.to_string_lossy());
        }
        NodeKind::LayerWeight { blend } => {
            h.write_u8(6);
            h.write_f64(*blend);
        }
        NodeKind::Fresnel { ior } => {
            h.write_u8(7);
            h.write_f64(*ior);
        }
        NodeKind::SeparateXyz => h.write_u8(8),
        NodeKind::Math { op, a, b } => {
            h.write_u8(9);
            h.write_u8(match op {
                MathOp::Add => 0,
                MathOp::Subtract => 1,
                MathOp::Multiply => 2,
            });
            h.write_f64(*a);
            h.write_f64(*b);
        }
        NodeKind::VectorMath { op } => {
            h.write_u8(10);
            h.write_u8(match op {
                VectorMathOp::Length => 0,
            });
        }
        NodeKind::ColorRamp {
            interpolation,
            stops,
        } => {
            h.write_u8(11);
            h.write_u8(match interpolation {
                RampInterpolation::Linear => 0,
                RampInterpolation::Ease => 1,
            });
            h.write_u32(stops.len() as u32);
            for stop in stops {
                h.write_f64(stop.position);
                h.write_rgba(stop.color);
            }
        }
        NodeKind::MixRgb {
            blend,
            factor,
            color1,
            color2,
        } => {
            h.write_u8(12);
            h.write_u8(match blend {
                BlendType::Add => 1,
                BlendType::Multiply => 2,
                BlendType::Overlay => 3,
            });
            h.write_f64(*factor);
            h.write_rgba(*color1);
            h.write_rgba(*color2);
        }
        NodeKind::Emission { color, strength } => {
            h.write_u8(13);
            h.write_rgba(*color);
            h.write_f64(*strength);
        }
        NodeKind::Background { color, strength } => {
            h.write_u8(14);
            h.write_rgba(*color);
            h.write_f64(*strength);
        }
        NodeKind::TransparentBsdf => h.write_u8(15),
        NodeKind::PrincipledVolume {
            color,
            density,
            anisotropy,
            emission_strength,
        } => {
            h.write_u8(16);
            h.write_rgba(*color);
            h.write_f64(*density);
            h.write_f64(*anisotropy);
            h.write_f64(*emission_strength);
        }
        NodeKind::AddShader => h.write_u8(17),
        NodeKind::MixShader { factor } => {
            h.write_u8(18);
            h.write_f64(*factor);
        }
        NodeKind::MaterialOutput => h.write_u8(19),
        NodeKind::WorldOutput => h.write_u8(20),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/fingerprint.rs"]
mod tests;
