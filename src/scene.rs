use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::geometry::{Fp, Ray, Shape3D, Vec3f};

pub const DEFAULT_SHININESS: Fp = 20.0;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scene has no valid camera")]
    MissingCamera,
}

#[derive(Error, Debug, PartialEq)]
pub enum FieldError {
    #[error("unknown object kind '{0}'")]
    UnknownKind(String),

    #[error("missing field '{0}'")]
    Missing(&'static str),

    #[error("field '{field}' has invalid value '{value}'")]
    Invalid { field: &'static str, value: String },

    #[error("field '{0}' must be positive")]
    NonPositive(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub width: Fp,
    pub height: Fp,
    pub position: Vec3f,
}

#[derive(Clone, Debug)]
pub struct Surface {
    pub diffuse_color: Vec3f,
    pub specular_color: Vec3f,
    pub reflectivity: Fp,
    // carried into the illumination weight only; no transmitted ray is traced
    pub refractivity: Fp,
    pub shininess: Fp,
}

#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape3D,
    pub surface: Surface,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LightKind {
    Point,
    Spot {
        direction: Vec3f,
        theta: Fp,
        angular_a0: Fp,
    },
}

#[derive(Clone, Debug)]
pub struct LightSource {
    pub position: Vec3f,
    pub color: Vec3f,
    // a0, a1, a2
    pub radial: [Fp; 3],
    pub kind: LightKind,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub primitives: Vec<Primitive>,
    pub lights: Vec<LightSource>,
}

impl Scene {
    // ties keep the earlier primitive
    pub fn intersect(&self, ray: &Ray) -> Option<(Fp, &Primitive)> {
        let mut closest: Option<(Fp, &Primitive)> = None;
        for primitive in &self.primitives {
            if let Some(t) = primitive.shape.intersect(ray) {
                if closest.map_or(true, |(best, _)| t < best) {
                    closest = Some((t, primitive));
                }
            }
        }
        closest
    }
}

pub fn load_scene(path: &Path) -> Result<Scene, SceneError> {
    let content = fs::read_to_string(path)?;
    parse_file_content(&content)
}

pub fn parse_file_content(content: &str) -> Result<Scene, SceneError> {
    let mut camera = None;
    let mut primitives = vec![];
    let mut lights = vec![];

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let kind: String = line
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        let fields = Fields::parse(&line[kind.len()..]);

        let parsed = match kind.as_str() {
            "camera" => parse_camera(&fields).map(|c| camera = Some(c)),
            "light" => parse_light(&fields).map(|l| lights.push(l)),
            "sphere" => parse_sphere(&fields).map(|p| primitives.push(p)),
            "plane" => parse_plane(&fields).map(|p| primitives.push(p)),
            _ => Err(FieldError::UnknownKind(kind.clone())),
        };
        match parsed {
            Ok(()) => debug!("line {}: parsed {}", index + 1, kind),
            Err(e) => warn!("invalid object on line {} of scene: {}", index + 1, e),
        }
    }

    let camera = camera.ok_or(SceneError::MissingCamera)?;
    Ok(Scene {
        camera,
        primitives,
        lights,
    })
}

struct Fields<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    fn parse(mut rest: &'a str) -> Self {
        let mut values = HashMap::new();
        loop {
            rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
            let Some(colon) = rest.find(':') else { break };
            let key = rest[..colon].trim();
            rest = rest[colon + 1..].trim_start();
            let end = if rest.starts_with('[') {
                rest.find(']').map_or(rest.len(), |i| i + 1)
            } else {
                rest.find(',').unwrap_or(rest.len())
            };
            // first occurrence of a key wins
            values.entry(key).or_insert(rest[..end].trim());
            rest = &rest[end..];
        }
        Fields { values }
    }

    fn scalar(&self, field: &'static str) -> Result<Fp, FieldError> {
        let raw = self.values.get(field).ok_or(FieldError::Missing(field))?;
        raw.parse().map_err(|_| FieldError::Invalid {
            field,
            value: raw.to_string(),
        })
    }

    fn scalar_or(&self, field: &'static str, default: Fp) -> Result<Fp, FieldError> {
        if self.values.contains_key(field) {
            self.scalar(field)
        } else {
            Ok(default)
        }
    }

    fn vector(&self, field: &'static str) -> Result<Vec3f, FieldError> {
        let raw = self.values.get(field).ok_or(FieldError::Missing(field))?;
        let invalid = || FieldError::Invalid {
            field,
            value: raw.to_string(),
        };
        let inner = raw
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| invalid())?;
        let components = inner
            .split(',')
            .map(|x| x.trim().parse::<Fp>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match components.as_slice() {
            [x, y, z] => Ok(Vec3f::new(*x, *y, *z)),
            _ => Err(invalid()),
        }
    }

    fn vector_or(&self, field: &'static str, default: Vec3f) -> Result<Vec3f, FieldError> {
        if self.values.contains_key(field) {
            self.vector(field)
        } else {
            Ok(default)
        }
    }
}

fn parse_camera(fields: &Fields) -> Result<Camera, FieldError> {
    let width = fields.scalar("width")?;
    let height = fields.scalar("height")?;
    if width <= 0.0 {
        return Err(FieldError::NonPositive("width"));
    }
    if height <= 0.0 {
        return Err(FieldError::NonPositive("height"));
    }
    Ok(Camera {
        width,
        height,
        position: fields.vector("position").unwrap_or_else(|_| Vec3f::zeros()),
    })
}

fn parse_light(fields: &Fields) -> Result<LightSource, FieldError> {
    let position = fields.vector("position")?;
    let color = fields.vector("color")?;
    let radial = [
        fields.scalar("radial-a0")?,
        fields.scalar("radial-a1")?,
        fields.scalar("radial-a2")?,
    ];
    // an unreadable theta counts as 0
    let theta = fields.scalar("theta").unwrap_or(0.0);
    let kind = if theta == 0.0 {
        LightKind::Point
    } else {
        LightKind::Spot {
            direction: fields.vector("direction")?.normalize(),
            theta,
            angular_a0: fields.scalar("angular-a0")?,
        }
    };
    Ok(LightSource {
        position,
        color,
        radial,
        kind,
    })
}

fn parse_surface(fields: &Fields, specular_color: Vec3f) -> Result<Surface, FieldError> {
    Ok(Surface {
        diffuse_color: fields.vector("diffuse_color")?,
        specular_color,
        reflectivity: fields.scalar_or("reflectivity", 0.0)?,
        refractivity: fields.scalar_or("refractivity", 0.0)?,
        shininess: fields.scalar_or("ns", DEFAULT_SHININESS)?,
    })
}

fn parse_sphere(fields: &Fields) -> Result<Primitive, FieldError> {
    let surface = parse_surface(fields, fields.vector("specular_color")?)?;
    let center = fields.vector("position")?;
    let radius = fields.scalar("radius")?;
    if radius <= 0.0 {
        return Err(FieldError::NonPositive("radius"));
    }
    Ok(Primitive {
        shape: Shape3D::Sphere { center, radius },
        surface,
    })
}

fn parse_plane(fields: &Fields) -> Result<Primitive, FieldError> {
    let surface = parse_surface(fields, fields.vector_or("specular_color", Vec3f::zeros())?)?;
    Ok(Primitive {
        shape: Shape3D::Plane {
            position: fields.vector("position")?,
            normal: fields.vector("normal")?.normalize(),
        },
        surface,
    })
}
