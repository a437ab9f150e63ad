//! Material definitions
//!
//! Only the surface parameters the scene adapters touch are modelled:
//! diffuse contents, the contents transform used for texture tiling, the
//! lighting model and the fill mode.

use crate::foundation::math::{Mat4, Vec3};

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Create a color from channel values
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from an `[r, g, b, a]` array
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

/// Shading model used when rendering a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingModel {
    /// Classic Blinn-Phong shading
    #[default]
    Blinn,
    /// Physically based metallic-roughness shading
    PhysicallyBased,
    /// Unlit, color written as-is
    Constant,
}

/// How triangles are rasterised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Solid triangles
    #[default]
    Fill,
    /// Triangle edges only
    Lines,
}

/// What a material property samples
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialContents {
    /// Nothing bound
    None,
    /// Constant color
    Color(Color),
    /// Named texture resource
    Texture(String),
}

/// One material slot (diffuse, normal, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    /// Bound contents
    pub contents: MaterialContents,
    /// Texture coordinate transform applied when sampling
    pub contents_transform: Mat4,
}

impl Default for MaterialProperty {
    fn default() -> Self {
        Self {
            contents: MaterialContents::None,
            contents_transform: Mat4::identity(),
        }
    }
}

/// Surface material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    /// Optional name for debugging
    pub name: Option<String>,
    /// Base color slot
    pub diffuse: MaterialProperty,
    /// Shading model
    pub lighting_model: LightingModel,
    /// Rasterisation mode
    pub fill_mode: FillMode,
    /// Render both faces
    pub double_sided: bool,
}

impl Material {
    /// Material with a constant diffuse color
    pub fn with_color(color: Color) -> Self {
        Self {
            diffuse: MaterialProperty {
                contents: MaterialContents::Color(color),
                ..MaterialProperty::default()
            },
            ..Self::default()
        }
    }

    /// Material sampling the named texture
    pub fn with_texture(texture: impl Into<String>) -> Self {
        Self {
            diffuse: MaterialProperty {
                contents: MaterialContents::Texture(texture.into()),
                ..MaterialProperty::default()
            },
            ..Self::default()
        }
    }

    /// Set the debug name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Scale texture coordinates so a tiling texture keeps its aspect on a
    /// `width` x `height` surface
    pub fn tile_to(&mut self, width: f32, height: f32) {
        self.diffuse.contents_transform = Mat4::new_nonuniform_scaling(&Vec3::new(width, height, 1.0));
    }

    /// Diffuse alpha, 1.0 for non-color contents
    pub fn alpha(&self) -> f32 {
        match &self.diffuse.contents {
            MaterialContents::Color(color) => color.a,
            _ => 1.0,
        }
    }
}
