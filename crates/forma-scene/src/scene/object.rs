//! Scene object definition.

use forma_cad::{AssembledShape, PlaneBasis, ShapeKind, SolidProfile, TessellatedMesh};
use forma_core::BoundingBox;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{SceneError, SceneResult};

/// Identifier of a top-level scene object.
pub type ObjectId = Uuid;

/// A committed, top-level object in the scene.
///
/// Geometry is stored in plane-local coordinates; `frame` and `scale` place
/// it in the world. The parts are inserted, removed and undone as one unit.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Unique identifier for this object.
    pub id: ObjectId,

    /// Display name.
    pub name: String,

    /// Placement of the local geometry.
    pub frame: PlaneBasis,

    /// Footprint scale (x, y in the plane) and height scale (z).
    pub scale: Vec3,

    /// Parametric description used to rebuild the parts.
    pub profile: Option<SolidProfile>,

    /// Renderable parts (fill surface and border).
    pub parts: Vec<ObjectPart>,

    /// Whether this object is visible.
    pub visible: bool,

    /// Which resize tools may act on this object.
    pub tags: ObjectTags,
}

impl SceneObject {
    /// Creates an empty object placed at `frame`.
    pub fn new(name: impl Into<String>, frame: PlaneBasis) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            frame,
            scale: Vec3::ONE,
            profile: None,
            parts: Vec::new(),
            visible: true,
            tags: ObjectTags::default(),
        }
    }

    /// Builds the fill and border parts of an assembled shape.
    pub fn from_assembled(shape: AssembledShape, style: &ShapeStyle) -> Self {
        let kind = shape.profile.kind;
        let mut object = Self::new(kind.name(), shape.frame);
        object.tags = ObjectTags::for_kind(kind);
        object.parts = vec![
            ObjectPart::fill(shape.fill, style),
            ObjectPart::border(shape.profile.border_loop(), style),
        ];
        object.profile = Some(shape.profile);
        object
    }

    /// Sets the visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Local-to-world transform.
    pub fn transform(&self) -> Mat4 {
        self.frame.transform() * Mat4::from_scale(self.scale)
    }

    /// World position used for screen-space selection.
    pub fn world_position(&self) -> Vec3 {
        self.frame.origin
    }

    /// Local bounding box of all parts (before transform).
    pub fn local_bounds(&self) -> BoundingBox {
        self.parts
            .iter()
            .fold(BoundingBox::empty(), |acc, part| acc.union(&part.bounds()))
    }

    /// Returns the world-space bounding box.
    pub fn world_bounds(&self) -> BoundingBox {
        let local = self.local_bounds();
        if local.is_empty() {
            return local;
        }
        local.transform(&self.transform())
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.profile.as_ref().map(|p| p.kind)
    }

    /// Extrusion height, for volumetric objects.
    pub fn height(&self) -> Option<f32> {
        self.profile
            .as_ref()
            .filter(|p| p.kind.is_volumetric())
            .map(|p| p.height)
    }

    /// Rebuilds the geometry with a new extrusion height.
    ///
    /// Part ids are kept so the scene's owner index stays valid.
    pub fn set_height(&mut self, height: f32) -> SceneResult<()> {
        let profile = self.profile.as_ref().ok_or(SceneError::NotASolid(self.id))?;
        let profile = profile.with_height(height)?;

        let surface = profile.tessellate();
        let border = profile.border_loop();
        for part in &mut self.parts {
            match &mut part.geometry {
                PartGeometry::Mesh(mesh) => *mesh = surface.clone(),
                PartGeometry::Lines { points } => *points = border.clone(),
            }
        }
        self.profile = Some(profile);
        Ok(())
    }

    /// Sets the footprint and height scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Iterate mesh triangles in world space.
    pub fn world_triangles(&self) -> impl Iterator<Item = (Uuid, [Vec3; 3])> + '_ {
        let transform = self.transform();
        self.parts
            .iter()
            .filter_map(|part| match &part.geometry {
                PartGeometry::Mesh(mesh) => Some((part.id, mesh)),
                PartGeometry::Lines { .. } => None,
            })
            .flat_map(move |(id, mesh)| {
                mesh.triangles()
                    .map(move |tri| (id, tri.map(|v| transform.transform_point3(v))))
            })
    }
}

/// Which resize tools accept an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTags {
    /// Height can be changed by the extrude tool
    pub extrudable: bool,
    /// Footprint scale can be changed by the extend tool
    pub extendable: bool,
}

impl ObjectTags {
    pub fn for_kind(kind: ShapeKind) -> Self {
        Self {
            extrudable: kind.is_volumetric(),
            extendable: true,
        }
    }
}

/// Colors applied to newly committed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (RGBA, semi-transparent)
    pub fill_color: [f32; 4],
    /// Border color (RGBA)
    pub border_color: [f32; 4],
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: [0.35, 0.6, 0.9, 0.5],
            border_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

/// Part geometry in object-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PartGeometry {
    /// Triangle surface
    Mesh(TessellatedMesh),
    /// Connected line strip
    Lines { points: Vec<Vec3> },
}

/// Surface appearance of a part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color (RGBA).
    pub color: [f32; 4],
    /// Render both faces.
    pub double_sided: bool,
}

/// One renderable piece of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPart {
    pub id: Uuid,
    pub geometry: PartGeometry,
    pub material: Material,
    pub layer: RenderLayer,
    /// Draw priority within the layer (higher draws later)
    pub render_order: i32,
}

impl ObjectPart {
    /// Semi-transparent, double-sided surface.
    pub fn fill(mesh: TessellatedMesh, style: &ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry: PartGeometry::Mesh(mesh),
            material: Material {
                color: style.fill_color,
                double_sided: true,
            },
            layer: RenderLayer::Transparent,
            render_order: 0,
        }
    }

    /// Border drawn over the fill.
    pub fn border(points: Vec<Vec3>, style: &ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry: PartGeometry::Lines { points },
            material: Material {
                color: style.border_color,
                double_sided: false,
            },
            layer: RenderLayer::Overlay,
            render_order: 1,
        }
    }

    /// Local bounding box of the part geometry.
    pub fn bounds(&self) -> BoundingBox {
        match &self.geometry {
            PartGeometry::Mesh(mesh) => mesh.bounds(),
            PartGeometry::Lines { points } => BoundingBox::from_points(points.iter()),
        }
    }

    /// Sort key combining layer and draw priority.
    pub fn draw_key(&self) -> (i32, i32) {
        (self.layer.sort_order(), self.render_order)
    }
}

/// Render layer for sorting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderLayer {
    /// Default opaque geometry layer.
    #[default]
    Default,
    /// Transparent geometry (rendered back-to-front).
    Transparent,
    /// Overlay elements (rendered on top).
    Overlay,
}

impl RenderLayer {
    /// Returns the sort order for this layer (lower = rendered first).
    pub fn sort_order(&self) -> i32 {
        match self {
            RenderLayer::Default => 0,
            RenderLayer::Transparent => 100,
            RenderLayer::Overlay => 200,
        }
    }

    /// Returns true if this layer uses alpha blending.
    pub fn uses_blending(&self) -> bool {
        matches!(self, RenderLayer::Transparent | RenderLayer::Overlay)
    }
}
