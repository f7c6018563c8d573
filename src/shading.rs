use crate::geometry::{Fp, Vec3f};
use crate::scene::{LightKind, LightSource};

// unclamped, can be inf
pub fn radial_attenuation(light: &LightSource, distance: Fp) -> Fp {
    let [a0, a1, a2] = light.radial;
    1.0 / (a0 + a1 * distance + a2 * distance.powi(2))
}

pub fn angular_attenuation(light: &LightSource, to_light: &Vec3f) -> Fp {
    match &light.kind {
        LightKind::Point => 1.0,
        LightKind::Spot {
            direction,
            theta,
            angular_a0,
        } => {
            let cos_angle = (-to_light).dot(direction);
            if cos_angle.acos().to_degrees() > *theta {
                0.0
            } else {
                cos_angle.powf(*angular_a0)
            }
        }
    }
}

pub fn diffuse_reflection(
    object_color: &Vec3f,
    light_color: &Vec3f,
    normal: &Vec3f,
    to_light: &Vec3f,
) -> Vec3f {
    let product = normal.dot(to_light);
    if product > 0.0 {
        object_color.component_mul(light_color) * product
    } else {
        Vec3f::zeros()
    }
}

// exponent applied twice: p^(shininess^2)
pub fn specular_reflection(
    object_color: &Vec3f,
    light_color: &Vec3f,
    to_viewer: &Vec3f,
    light_reflection: &Vec3f,
    shininess: Fp,
) -> Vec3f {
    let product = to_viewer.dot(light_reflection);
    if product > 0.0 {
        let highlight = product.powf(shininess).powf(shininess);
        object_color.component_mul(light_color) * highlight
    } else {
        Vec3f::zeros()
    }
}

pub fn clamp(value: Fp, min: Fp, max: Fp) -> Fp {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}
