use arrayvec::ArrayVec;
use na::Vector3;

pub type Fp = f64;
pub type Vec3f = Vector3<Fp>;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
}

impl Ray {
    pub fn at(&self, t: Fp) -> Vec3f {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Debug)]
pub enum Shape3D {
    Sphere { center: Vec3f, radius: Fp },
    // `normal` is unit length, the parser normalizes it
    Plane { position: Vec3f, normal: Vec3f },
}

impl Shape3D {
    pub fn intersect(&self, ray: &Ray) -> Option<Fp> {
        match self {
            Shape3D::Sphere { center, radius } => intersect_sphere(ray, center, *radius),
            Shape3D::Plane { position, normal } => intersect_plane(ray, position, normal),
        }
    }

    pub fn normal_at(&self, point: &Vec3f) -> Vec3f {
        match self {
            Shape3D::Sphere { center, .. } => (point - center).normalize(),
            Shape3D::Plane { normal, .. } => *normal,
        }
    }
}

pub fn reflect(incident: &Vec3f, normal: &Vec3f) -> Vec3f {
    let projection = -incident.dot(normal);
    incident + normal * projection * 2.0
}

fn sphere_roots(ray: &Ray, center: &Vec3f, radius: Fp) -> ArrayVec<Fp, 2> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&oc);
    let c = oc.dot(&oc) - radius * radius;
    let discr = b * b - 4.0 * a * c;
    let mut result = ArrayVec::new();
    if discr >= 0.0 {
        result.push((-b - discr.sqrt()) / (2.0 * a));
        result.push((-b + discr.sqrt()) / (2.0 * a));
    }
    result
}

pub fn intersect_sphere(ray: &Ray, center: &Vec3f, radius: Fp) -> Option<Fp> {
    // roots come smaller first for a > 0; t == 0 would re-hit the surface we start on
    sphere_roots(ray, center, radius)
        .into_iter()
        .find(|t| *t > 0.0)
}

pub fn intersect_plane(ray: &Ray, position: &Vec3f, normal: &Vec3f) -> Option<Fp> {
    let x = ray.direction.dot(normal);
    if x == 0.0 {
        return None;
    }
    let offset = (position - ray.origin).dot(normal) / x;
    if offset > 0.0 {
        Some(offset)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Vec3f, direction: Vec3f) -> Ray {
        Ray { origin, direction }
    }

    #[test]
    fn sphere_in_front_returns_near_root() {
        let r = ray(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -1.0));
        let t = intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-12);
    }

    #[test]
    fn sphere_from_inside_returns_far_root() {
        let r = ray(Vec3f::new(0.0, 0.0, -5.0), Vec3f::new(0.0, 0.0, -1.0));
        let t = intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).unwrap();
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sphere_behind_is_missed() {
        let r = ray(Vec3f::zeros(), Vec3f::new(0.0, 0.0, 1.0));
        assert!(intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn sphere_off_axis_is_missed() {
        let r = ray(Vec3f::new(3.0, 0.0, 0.0), Vec3f::new(0.0, 0.0, -1.0));
        assert!(intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn sphere_does_not_need_unit_direction() {
        let r = ray(Vec3f::zeros(), Vec3f::new(0.0, 0.0, -2.0));
        let t = intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).unwrap();
        assert!((t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ray_starting_on_sphere_surface_skips_zero_root() {
        // origin on the near surface, pointing inward: t = 0 is rejected, the far side is returned
        let r = ray(Vec3f::new(0.0, 0.0, -4.0), Vec3f::new(0.0, 0.0, -1.0));
        let t = intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).unwrap();
        assert!((t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let normal = Vec3f::new(0.0, 1.0, 0.0);
        for origin in [Vec3f::zeros(), Vec3f::new(0.0, -1.0, 0.0), Vec3f::new(4.0, 7.0, -2.0)] {
            let r = ray(origin, Vec3f::new(1.0, 0.0, 0.0));
            assert!(intersect_plane(&r, &Vec3f::new(0.0, -1.0, 0.0), &normal).is_none());
        }
    }

    #[test]
    fn plane_hit_and_plane_behind() {
        let position = Vec3f::new(0.0, -1.0, 0.0);
        let normal = Vec3f::new(0.0, 1.0, 0.0);
        let down = ray(Vec3f::zeros(), Vec3f::new(0.0, -1.0, 0.0));
        assert_eq!(intersect_plane(&down, &position, &normal), Some(1.0));
        let up = ray(Vec3f::zeros(), Vec3f::new(0.0, 1.0, 0.0));
        assert!(intersect_plane(&up, &position, &normal).is_none());
    }

    #[test]
    fn ray_starting_on_plane_is_missed() {
        let r = ray(Vec3f::new(2.0, -1.0, 3.0), Vec3f::new(0.0, -1.0, 0.0));
        let position = Vec3f::new(0.0, -1.0, 0.0);
        assert!(intersect_plane(&r, &position, &Vec3f::new(0.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn tangent_ray_touches_sphere_once() {
        // discriminant is exactly zero, both roots are 5
        let r = ray(Vec3f::new(1.0, 0.0, 0.0), Vec3f::new(0.0, 0.0, -1.0));
        assert_eq!(sphere_roots(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0).as_slice(), &[5.0, 5.0]);
        assert_eq!(intersect_sphere(&r, &Vec3f::new(0.0, 0.0, -5.0), 1.0), Some(5.0));
    }

    #[test]
    fn reflect_flips_normal_component() {
        let incident = Vec3f::new(1.0, -1.0, 0.0);
        let reflected = reflect(&incident, &Vec3f::new(0.0, 1.0, 0.0));
        assert_eq!(reflected, Vec3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn normalizing_zero_vector_is_not_guarded() {
        let n = Vec3f::zeros().normalize();
        assert!(n.x.is_nan());
    }
}
