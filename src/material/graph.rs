use std::path::PathBuf;

use crate::foundation::core::{DVec3, Rgba};
use crate::foundation::error::{SingularityError, SingularityResult};

/// Index of a node inside its [`MaterialGraph`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

/// What a graph shades: an object surface/volume or the world background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphDomain {
    /// Object material, terminated by [`NodeKind::MaterialOutput`].
    Object,
    /// World shader, terminated by [`NodeKind::WorldOutput`].
    World,
}

/// Gradient texture profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientType {
    /// Angular sweep around Z.
    Radial,
}

/// Voronoi output feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoronoiFeature {
    /// Smoothed distance to the closest feature point.
    SmoothF1,
}

/// Scalar math operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOp {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
}

/// Vector math operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorMathOp {
    /// Euclidean length of `a` (written to the `Value` output).
    Length,
}

/// Color blend mode of a [`NodeKind::MixRgb`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendType {
    /// `color1 + color2 * fac`
    Add,
    /// Multiply blend.
    Multiply,
    /// Overlay blend.
    Overlay,
}

/// Interpolation between color ramp stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampInterpolation {
    /// Linear blend between stops.
    Linear,
    /// Smoothstep between stops.
    Ease,
}

/// One stop of a color ramp.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub position: f64,
    /// Color at `position`.
    pub color: Rgba,
}

impl ColorStop {
    /// Convenience constructor.
    pub fn new(position: f64, color: Rgba) -> Self {
        Self { position, color }
    }
}

/// A shading operator together with its unlinked parameter values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Texture coordinate source.
    TexCoord,
    /// Vector transform (translate, XYZ Euler rotate in radians, scale).
    Mapping {
        /// Translation.
        location: DVec3,
        /// Rotation in radians.
        rotation: DVec3,
        /// Per-axis scale.
        scale: DVec3,
    },
    /// Fractal noise pattern.
    NoiseTexture {
        /// Pattern frequency.
        scale: f64,
        /// Octave count.
        detail: f64,
        /// Octave falloff.
        roughness: f64,
    },
    /// Gradient pattern.
    GradientTexture {
        /// Gradient profile.
        gradient: GradientType,
    },
    /// Cellular pattern.
    VoronoiTexture {
        /// Output feature.
        feature: VoronoiFeature,
        /// Pattern frequency.
        scale: f64,
    },
    /// Raster image lookup.
    ImageTexture {
        /// Source image on disk.
        path: PathBuf,
    },
    /// Grazing-angle weight.
    LayerWeight {
        /// Blend toward the edge.
        blend: f64,
    },
    /// Dielectric Fresnel factor.
    Fresnel {
        /// Index of refraction.
        ior: f64,
    },
    /// Split a vector into components.
    SeparateXyz,
    /// Scalar math; `a`/`b` are used where the input is not linked.
    Math {
        /// Operation.
        op: MathOp,
        /// Default for input `A`.
        a: f64,
        /// Default for input `B`.
        b: f64,
    },
    /// Vector math.
    VectorMath {
        /// Operation.
        op: VectorMathOp,
    },
    /// Scalar-to-color mapping.
    ColorRamp {
        /// Interpolation between stops.
        interpolation: RampInterpolation,
        /// Stops ordered by position.
        stops: Vec<ColorStop>,
    },
    /// Two-color combinator.
    MixRgb {
        /// Blend mode.
        blend: BlendType,
        /// Mix factor.
        factor: f64,
        /// Default for `Color1`.
        color1: Rgba,
        /// Default for `Color2`.
        color2: Rgba,
    },
    /// Emissive shader.
    Emission {
        /// Default emitted color.
        color: Rgba,
        /// Emission strength.
        strength: f64,
    },
    /// World background shader.
    Background {
        /// Default color.
        color: Rgba,
        /// Strength.
        strength: f64,
    },
    /// Fully transparent BSDF.
    TransparentBsdf,
    /// Scattering and emitting volume.
    PrincipledVolume {
        /// Scatter color.
        color: Rgba,
        /// Default density.
        density: f64,
        /// Henyey-Greenstein anisotropy.
        anisotropy: f64,
        /// Volume emission strength.
        emission_strength: f64,
    },
    /// Sum of two shaders.
    AddShader,
    /// Factor-weighted mix of two shaders.
    MixShader {
        /// Default factor.
        factor: f64,
    },
    /// Object material terminal.
    MaterialOutput,
    /// World terminal.
    WorldOutput,
}

impl NodeKind {
    /// Input socket names.
    pub fn inputs(&self) -> &'static [&'static str] {
        match self {
            Self::TexCoord => &[],
            Self::Mapping { .. }
            | Self::NoiseTexture { .. }
            | Self::GradientTexture { .. }
            | Self::VoronoiTexture { .. }
            | Self::ImageTexture { .. }
            | Self::SeparateXyz => &["Vector"],
            Self::LayerWeight { .. } => &["Blend"],
            Self::Fresnel { .. } => &["IOR"],
            Self::Math { .. } | Self::VectorMath { .. } => &["A", "B"],
            Self::ColorRamp { .. } => &["Fac"],
            Self::MixRgb { .. } => &["Fac", "Color1", "Color2"],
            Self::Emission { .. } | Self::Background { .. } => &["Color", "Strength"],
            Self::TransparentBsdf => &["Color"],
            Self::PrincipledVolume { .. } => {
                &["Color", "Density", "Anisotropy", "Emission Strength"]
            }
            Self::AddShader => &["Shader1", "Shader2"],
            Self::MixShader { .. } => &["Fac", "Shader1", "Shader2"],
            Self::MaterialOutput => &["Surface", "Volume"],
            Self::WorldOutput => &["Surface"],
        }
    }

    /// Output socket names.
    pub fn outputs(&self) -> &'static [&'static str] {
        match self {
            Self::TexCoord => &["Generated", "Normal", "UV", "Object"],
            Self::Mapping { .. } => &["Vector"],
            Self::NoiseTexture { .. } => &["Fac", "Color"],
            Self::GradientTexture { .. } => &["Color", "Fac"],
            Self::VoronoiTexture { .. } => &["Distance", "Color", "Position"],
            Self::ImageTexture { .. } => &["Color", "Alpha"],
            Self::LayerWeight { .. } => &["Fresnel", "Facing"],
            Self::Fresnel { .. } => &["Fac"],
            Self::SeparateXyz => &["X", "Y", "Z"],
            Self::Math { .. } => &["Value"],
            Self::VectorMath { .. } => &["Vector", "Value"],
            Self::ColorRamp { .. } => &["Color", "Alpha"],
            Self::MixRgb { .. } => &["Color"],
            Self::Emission { .. } => &["Emission"],
            Self::Background { .. } => &["Background"],
            Self::TransparentBsdf => &["BSDF"],
            Self::PrincipledVolume { .. } => &["Volume"],
            Self::AddShader | Self::MixShader { .. } => &["Shader"],
            Self::MaterialOutput | Self::WorldOutput => &[],
        }
    }

    /// Return `true` for output terminals.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MaterialOutput | Self::WorldOutput)
    }
}

/// A node placed in a graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShaderNode {
    /// Position in creation order.
    pub id: NodeId,
    /// Operator and parameters.
    pub kind: NodeKind,
}

/// Directed edge from an output socket to an input socket.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    /// Upstream node.
    pub from: NodeId,
    /// Output socket on `from`.
    pub from_socket: String,
    /// Downstream node.
    pub to: NodeId,
    /// Input socket on `to`.
    pub to_socket: String,
}

/// A named DAG of shading operators rooted at one output terminal.
///
/// Nodes are appended in topological order and links may only point from an earlier node to a
/// later one, so a graph is acyclic by construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialGraph {
    name: String,
    domain: GraphDomain,
    nodes: Vec<ShaderNode>,
    links: Vec<Link>,
}

impl MaterialGraph {
    pub(crate) fn new(name: impl Into<String>, domain: GraphDomain) -> Self {
        Self {
            name: name.into(),
            domain,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Surface/volume material or world shader.
    pub fn domain(&self) -> GraphDomain {
        self.domain
    }

    /// Nodes in creation (topological) order.
    pub fn nodes(&self) -> &[ShaderNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Borrow a node by id.
    pub fn node(&self, id: NodeId) -> Option<&ShaderNode> {
        self.nodes.get(id.0 as usize)
    }

    /// The single output terminal, once the graph is populated.
    pub fn output(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.kind.is_terminal())
            .map(|n| n.id)
    }

    /// Links feeding `node`.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.to == node)
    }

    /// First node matching `pred`.
    pub fn find(&self, pred: impl Fn(&NodeKind) -> bool) -> Option<&ShaderNode> {
        self.nodes.iter().find(|n| pred(&n.kind))
    }

    /// Set the strength of every emission node. Returns how many were changed.
    pub fn set_emission_strength(&mut self, value: f64) -> usize {
        let mut changed = 0;
        for node in &mut self.nodes {
            if let NodeKind::Emission { strength, .. } = &mut node.kind {
                *strength = value;
                changed += 1;
            }
        }
        changed
    }

    /// Drop every node and link so the graph can be repopulated.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    pub(crate) fn set_domain(&mut self, domain: GraphDomain) {
        self.domain = domain;
    }

    /// Append a node.
    pub(crate) fn add(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ShaderNode { id, kind });
        id
    }

    /// Connect `from.out` to `to.input`.
    ///
    /// Re-linking an identical edge is a no-op. Linking a second source into an already
    /// connected input is an error.
    pub(crate) fn link(
        &mut self,
        from: NodeId,
        out: &str,
        to: NodeId,
        input: &str,
    ) -> SingularityResult<()> {
        if from.0 >= to.0 {
            return Err(SingularityError::graph(format!(
                "'{}': link {} -> {} does not follow creation order",
                self.name, from.0, to.0
            )));
        }
        let (Some(src), Some(dst)) = (self.node(from), self.node(to)) else {
            return Err(SingularityError::graph(format!(
                "'{}': link references an unknown node",
                self.name
            )));
        };
        if !src.kind.outputs().contains(&out) {
            return Err(SingularityError::graph(format!(
                "'{}': node {} has no output socket '{out}'",
                self.name, from.0
            )));
        }
        if !dst.kind.inputs().contains(&input) {
            return Err(SingularityError::graph(format!(
                "'{}': node {} has no input socket '{input}'",
                self.name, to.0
            )));
        }

        if let Some(existing) = self
            .links
            .iter()
            .find(|l| l.to == to && l.to_socket == input)
        {
            if existing.from == from && existing.from_socket == out {
                return Ok(());
            }
            return Err(SingularityError::graph(format!(
                "'{}': input '{input}' on node {} is already linked",
                self.name, to.0
            )));
        }

        self.links.push(Link {
            from,
            from_socket: out.to_string(),
            to,
            to_socket: input.to_string(),
        });
        Ok(())
    }

    /// Check the graph has exactly one terminal of the right domain and that it is fed.
    pub fn validate(&self) -> SingularityResult<()> {
        let terminals: Vec<&ShaderNode> =
            self.nodes.iter().filter(|n| n.kind.is_terminal()).collect();
        let [terminal] = terminals.as_slice() else {
            return Err(SingularityError::graph(format!(
                "'{}': expected exactly one output terminal, found {}",
                self.name,
                terminals.len()
            )));
        };
        let domain_ok = match self.domain {
            GraphDomain::Object => matches!(terminal.kind, NodeKind::MaterialOutput),
            GraphDomain::World => matches!(terminal.kind, NodeKind::WorldOutput),
        };
        if !domain_ok {
            return Err(SingularityError::graph(format!(
                "'{}': output terminal does not match the graph domain",
                self.name
            )));
        }
        if self.incoming(terminal.id).next().is_none() {
            return Err(SingularityError::graph(format!(
                "'{}': output terminal has no incoming link",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/graph.rs"]
mod tests;
