use image::{Rgb, RgbImage};
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::info;
use rayon::prelude::*;

use crate::geometry::{reflect, Fp, Ray, Vec3f};
use crate::scene::Scene;
use crate::shading::{
    angular_attenuation, clamp, diffuse_reflection, radial_attenuation, specular_reflection,
};

pub const VOID_COLOR: Vec3f = Vec3f::new(0.0, 0.0, 0.0);

#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    // deeper rays return the void color
    pub max_depth: u32,
    pub ray_offset: Fp,
    pub focal_length: Fp,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 100,
            height: 100,
            max_depth: 5,
            ray_offset: 0.000125,
            focal_length: 1.0,
        }
    }
}

pub fn trace(scene: &Scene, ray: &Ray, depth: u32, settings: &RenderSettings) -> Vec3f {
    if depth > settings.max_depth {
        return VOID_COLOR;
    }
    let Some((t, primitive)) = scene.intersect(ray) else {
        return VOID_COLOR;
    };
    let surface = &primitive.surface;
    let illumination = 1.0 - surface.reflectivity - surface.refractivity;

    let to_viewer = -ray.direction;
    let point = ray.at(t);
    let normal = primitive.shape.normal_at(&point);
    let offset_point = point + normal * settings.ray_offset;

    let reflected_ray = Ray {
        origin: offset_point,
        direction: reflect(&ray.direction, &normal).normalize(),
    };
    let reflected_color = trace(scene, &reflected_ray, depth + 1, settings);

    // no ambient term
    let mut color = Vec3f::zeros();
    for light in &scene.lights {
        let to_light = light.position - point;
        let distance = to_light.norm();
        let to_light = to_light / distance;

        let shadow_ray = Ray {
            origin: offset_point,
            direction: to_light,
        };
        let lit = match scene.intersect(&shadow_ray) {
            None => true,
            Some((shadow_t, _)) => shadow_t > distance,
        };
        if !lit {
            continue;
        }

        let light_reflection = reflect(&-to_light, &normal).normalize();
        let diffuse = diffuse_reflection(&surface.diffuse_color, &light.color, &normal, &to_light);
        let specular = specular_reflection(
            &surface.specular_color,
            &light.color,
            &to_viewer,
            &light_reflection,
            surface.shininess,
        );
        let attenuation = radial_attenuation(light, distance) * angular_attenuation(light, &to_light);
        color += (diffuse + specular) * attenuation;
    }

    (color * illumination + reflected_color * surface.reflectivity).map(|c| clamp(c, 0.0, 1.0))
}

pub fn primary_ray(scene: &Scene, settings: &RenderSettings, row: u32, column: u32) -> Ray {
    let camera = &scene.camera;
    let pixel_width = camera.width / settings.width as Fp;
    let pixel_height = camera.height / settings.height as Fp;
    let direction = Vec3f::new(
        -camera.width / 2.0 + pixel_width * (column as Fp + 0.5),
        camera.height / 2.0 - pixel_height * (row as Fp + 0.5),
        -settings.focal_length,
    );
    Ray {
        origin: camera.position,
        direction: direction.normalize(),
    }
}

pub fn color_to_pixel(color: &Vec3f) -> Rgb<u8> {
    // `as` truncates, and saturates NaN to 0
    Rgb([
        (color.x * 255.0) as u8,
        (color.y * 255.0) as u8,
        (color.z * 255.0) as u8,
    ])
}

pub fn render_scene(scene: &Scene, settings: &RenderSettings) -> RgbImage {
    render_scene_with_progress(scene, settings, ProgressBar::hidden())
}

pub fn render_scene_with_progress(
    scene: &Scene,
    settings: &RenderSettings,
    progress: ProgressBar,
) -> RgbImage {
    let start = std::time::Instant::now();
    let mut img = RgbImage::new(settings.width, settings.height);
    let row_len = settings.width as usize * 3;
    if row_len > 0 {
        progress.set_length(settings.height as u64);
        img.par_chunks_mut(row_len)
            .enumerate()
            .progress_with(progress)
            .for_each(|(row, pixels)| {
                for (column, pixel) in pixels.chunks_exact_mut(3).enumerate() {
                    let ray = primary_ray(scene, settings, row as u32, column as u32);
                    let color = trace(scene, &ray, 0, settings);
                    pixel.copy_from_slice(&color_to_pixel(&color).0);
                }
            });
    }
    info!(
        "rendered {}x{} in {:.2?}",
        settings.width,
        settings.height,
        start.elapsed()
    );
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Camera;

    fn empty_scene(width: Fp, height: Fp) -> Scene {
        Scene {
            camera: Camera {
                width,
                height,
                position: Vec3f::zeros(),
            },
            primitives: vec![],
            lights: vec![],
        }
    }

    #[test]
    fn single_pixel_looks_down_negative_z() {
        let scene = empty_scene(1.0, 1.0);
        let settings = RenderSettings {
            width: 1,
            height: 1,
            ..Default::default()
        };
        let ray = primary_ray(&scene, &settings, 0, 0);
        assert!((ray.direction - Vec3f::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn row_zero_is_the_top_of_the_view_plane() {
        let scene = empty_scene(2.0, 2.0);
        let settings = RenderSettings {
            width: 2,
            height: 2,
            ..Default::default()
        };
        let top_left = primary_ray(&scene, &settings, 0, 0);
        let bottom_right = primary_ray(&scene, &settings, 1, 1);
        let expected = Vec3f::new(-0.5, 0.5, -1.0).normalize();
        assert!((top_left.direction - expected).norm() < 1e-12);
        assert!(top_left.direction.y > 0.0 && top_left.direction.x < 0.0);
        assert!(bottom_right.direction.y < 0.0 && bottom_right.direction.x > 0.0);
    }

    #[test]
    fn pixel_conversion_floors() {
        assert_eq!(color_to_pixel(&Vec3f::new(1.0, 0.5, 0.0)), Rgb([255, 127, 0]));
        assert_eq!(color_to_pixel(&Vec3f::new(0.999, 0.0039, Fp::NAN)), Rgb([254, 0, 0]));
    }

    #[test]
    fn miss_returns_void_color() {
        let scene = empty_scene(1.0, 1.0);
        let settings = RenderSettings::default();
        let ray = primary_ray(&scene, &settings, 0, 0);
        assert_eq!(trace(&scene, &ray, 0, &settings), VOID_COLOR);
    }

    #[test]
    fn render_fills_requested_raster() {
        let scene = empty_scene(1.0, 1.0);
        let settings = RenderSettings {
            width: 4,
            height: 3,
            ..Default::default()
        };
        let img = render_scene(&scene, &settings);
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
