//! Lighting system

use crate::config::CubemapConfig;
use std::path::PathBuf;
use thiserror::Error;

/// Default intensity of a freshly created light, in lumens
pub const DEFAULT_INTENSITY: f32 = 1000.0;

/// Default color temperature of a freshly created light, in kelvin
pub const DEFAULT_TEMPERATURE: f32 = 6500.0;

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Uniform light from every direction
    Ambient,
    /// Parallel rays along the owning node's -Z axis
    Directional,
}

/// Light attached to a scene node
///
/// Position and orientation come from the node; the light only carries
/// its photometric parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub kind: LightKind,
    /// Luminous intensity in lumens
    pub intensity: f32,
    /// Color temperature in kelvin
    pub temperature: f32,
    /// Nodes whose category mask shares a bit with this mask are lit
    pub category_mask: u32,
}

impl Light {
    /// Create a light of the given kind with default parameters
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            intensity: DEFAULT_INTENSITY,
            temperature: DEFAULT_TEMPERATURE,
            category_mask: u32::MAX,
        }
    }

    /// Create an ambient light
    pub fn ambient(intensity: f32, temperature: f32) -> Self {
        Self {
            intensity,
            temperature,
            ..Self::new(LightKind::Ambient)
        }
    }

    /// Create a directional light
    pub fn directional(intensity: f32, temperature: f32) -> Self {
        Self {
            intensity,
            temperature,
            ..Self::new(LightKind::Directional)
        }
    }

    /// Restrict the light to the given categories
    pub fn with_category_mask(mut self, mask: u32) -> Self {
        self.category_mask = mask;
        self
    }
}

/// Errors raised while preparing the lighting environment
#[derive(Error, Debug)]
pub enum LightingError {
    /// A cubemap face could not be decoded
    #[error("failed to load cubemap face {path}: {source}")]
    CubemapFace {
        /// Offending image
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// Faces of a cubemap must be square and of equal size
    #[error("cubemap face {path} is {width}x{height}, expected {expected}x{expected}")]
    CubemapSize {
        /// Offending image
        path: PathBuf,
        /// Actual width
        width: u32,
        /// Actual height
        height: u32,
        /// Size of the first face
        expected: u32,
    },
}

/// Six decoded cube faces
#[derive(Debug, Clone)]
pub struct Cubemap {
    faces: Vec<image::RgbaImage>,
}

impl Cubemap {
    /// Decode every face listed in `config`
    pub fn load(config: &CubemapConfig) -> Result<Self, LightingError> {
        let mut faces = Vec::with_capacity(config.faces.len());
        let mut expected = None;

        for path in &config.faces {
            let face = image::open(path)
                .map_err(|source| LightingError::CubemapFace {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();

            let (width, height) = face.dimensions();
            let size = *expected.get_or_insert(width);
            if width != size || height != size {
                return Err(LightingError::CubemapSize {
                    path: path.clone(),
                    width,
                    height,
                    expected: size,
                });
            }
            faces.push(face);
        }

        log::info!("Loaded cubemap with {} faces", faces.len());
        Ok(Self { faces })
    }

    /// Build a cubemap from already decoded faces
    pub fn from_faces(faces: Vec<image::RgbaImage>) -> Self {
        Self { faces }
    }

    /// Edge length of each face in pixels
    pub fn face_size(&self) -> u32 {
        self.faces.first().map_or(0, image::RgbaImage::width)
    }

    /// Decoded faces
    pub fn faces(&self) -> &[image::RgbaImage] {
        &self.faces
    }
}

/// Scene-wide lighting environment
#[derive(Debug, Clone, Default)]
pub struct LightingEnvironment {
    /// Image based lighting contents
    pub cubemap: Option<Cubemap>,
    /// Whether the renderer should derive lights from its own estimate
    pub automatically_updates_lighting: bool,
}

impl LightingEnvironment {
    /// Environment lit only by explicit light nodes
    pub fn manual() -> Self {
        Self::default()
    }

    /// Environment for the given optional cubemap configuration
    pub fn from_config(cubemap: Option<&CubemapConfig>) -> Result<Self, LightingError> {
        let cubemap = cubemap.map(Cubemap::load).transpose()?;
        Ok(Self {
            cubemap,
            automatically_updates_lighting: false,
        })
    }

    /// True when image based lighting replaces the ambient light
    pub fn uses_cubemap(&self) -> bool {
        self.cubemap.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_keep_parameters() {
        let light = Light::ambient(820.0, 5400.0).with_category_mask(42);
        assert_eq!(light.kind, LightKind::Ambient);
        assert_eq!(light.category_mask, 42);
        assert!((light.intensity - 820.0).abs() < f32::EPSILON);
        assert!((light.temperature - 5400.0).abs() < f32::EPSILON);
    }

    #[test]
    fn manual_environment_has_no_cubemap() {
        let environment = LightingEnvironment::from_config(None).unwrap();
        assert!(!environment.uses_cubemap());
        assert!(!environment.automatically_updates_lighting);
    }

    #[test]
    fn missing_cubemap_face_reports_path() {
        let config = CubemapConfig {
            faces: std::array::from_fn(|i| PathBuf::from(format!("/nonexistent/{i}.png"))),
        };
        match Cubemap::load(&config) {
            Err(LightingError::CubemapFace { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/0.png"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn cubemap_faces_report_size() {
        let faces = (0..6).map(|_| image::RgbaImage::new(8, 8)).collect();
        let cubemap = Cubemap::from_faces(faces);
        assert_eq!(cubemap.face_size(), 8);
        assert_eq!(cubemap.faces().len(), 6);
    }
}
