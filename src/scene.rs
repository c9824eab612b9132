use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    camera::{Camera, Resolution, Screen},
    frame::Frame,
    lighting::{Incidence, Light},
    material::{Color, Material},
    math::{Ray, EPSILON},
    object::{self, Hit, Object},
};

/// Render options. Defaults are provided.
///
/// Shadows and reflections are extensions on top of the basic local shading
/// model and are both off by default.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// The size of the image to produce.
    pub resolution: Resolution,

    /// The maximum number of times a ray can reflect from an initial ray.
    pub depth: u32,

    /// Reflections contributing less than this fraction of a pixel are not traced.
    pub min_weight: f64,

    /// Whether point and spot lights dim with the square of their distance.
    pub light_attenuation: bool,

    /// Whether to probe for objects between a hit and each light.
    pub shadows: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            depth: 0,
            min_weight: 0.01,
            light_attenuation: true,
            shadows: false,
        }
    }
}

/// A scene, which contains a list of objects, lights, and a camera to render from.
/// It is never modified while rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<Object>,
    pub lights: Vec<Light>,

    /// Baseline illumination applied to every surface, independent of the lights.
    pub ambient: f64,

    /// The color of rays that strike nothing.
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: 0.,
            background: Color::black(),
        }
    }
}

impl Scene {
    /// Find the nearest object struck by a ray.
    pub fn closest_hit(&self, ray: &Ray) -> Option<(&Object, Hit)> {
        object::closest_hit(&self.objects, ray)
    }

    /// Whether anything lies between a hit and the light arriving along `incidence`.
    pub fn is_shadowed(&self, hit: &Hit, incidence: &Incidence) -> bool {
        let probe = Ray::new(hit.point + hit.normal * EPSILON, incidence.direction);
        match self.closest_hit(&probe) {
            Some((_, blocker)) => blocker.t < incidence.distance,
            None => false,
        }
    }

    /// Local illumination at a hit: ambient plus every light's contribution.
    pub fn shade(&self, ray: &Ray, hit: &Hit, material: &Material, options: &RenderOptions) -> Color {
        let ambient = material.color * self.ambient;

        self.lights.iter().fold(ambient, |color, light| {
            color + light.shading(ray, hit, material, self, options).color(material)
        })
    }

    /// Trace out a ray, getting its color. `weight` is how much this ray
    /// contributes to the final pixel.
    pub fn trace_ray(&self, ray: &Ray, depth: u32, weight: f64, options: &RenderOptions) -> Color {
        let (object, hit) = match self.closest_hit(ray) {
            Some(r) => r,
            None => return self.background,
        };

        let material = object.material();
        let color = self.shade(ray, &hit, material, options);

        let reflectiveness = material.reflectiveness;
        if reflectiveness <= 0. || depth >= options.depth {
            return color;
        }

        let weight = weight * reflectiveness;
        if weight < options.min_weight {
            return color;
        }

        // reflect just off the surface so the bounce doesn't strike its own origin
        let reflected = self.trace_ray(
            &ray.reflect(hit.point + hit.normal * EPSILON, hit.normal),
            depth + 1,
            weight,
            options,
        );

        color * (1. - reflectiveness) + reflected * reflectiveness
    }

    /// Trace out a pixel, where top-left of the image is (0, 0).
    /// This function is run many times in parallel.
    pub fn trace_pixel(&self, screen: &Screen, x: u32, y: u32, options: &RenderOptions) -> Color {
        self.trace_ray(&screen.ray_at(x, y), 0, 1., options)
    }

    /// Render the whole image. Pixels are independent, so they are traced in
    /// parallel; the result is laid out row by row from the top of the screen.
    pub fn render(&self, options: &RenderOptions) -> Frame {
        let screen = Screen::new(&self.camera, options.resolution);
        let resolution = screen.resolution();
        let vw = resolution.width as usize;

        debug!(
            "rendering {}x{} with {} objects and {} lights",
            resolution.width,
            resolution.height,
            self.objects.len(),
            self.lights.len()
        );
        trace!("render options: {:?}", options);

        let pixels = (0..resolution.pixel_count())
            .into_par_iter()
            .map(|i| self.trace_pixel(&screen, (i % vw) as u32, (i / vw) as u32, options))
            .collect::<Vec<_>>();

        Frame::new(resolution.width, resolution.height, pixels)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::{
        lighting::{Directed, Point, Spot},
        math::Vector3,
        object::Sphere,
    };

    fn red_sphere(diffuse: f64) -> Object {
        Sphere::new(
            Vector3::new(10., 0., 0.),
            3.,
            Material::new(Color::red(), diffuse),
        )
        .unwrap()
        .into()
    }

    fn simple_scene() -> Scene {
        Scene {
            camera: Camera::new(Vector3::new(10., 0., 0.), Vector3::new(0., 0., 10.), FRAC_PI_2)
                .unwrap(),
            objects: vec![red_sphere(1.)],
            lights: vec![],
            ambient: 0.1,
            background: Color::green(),
        }
    }

    /// The hit at the top of the sphere, as if seen from above.
    fn pole() -> (Ray, Hit) {
        let ray = Ray::new(Vector3::new(10., 0., 20.), -Vector3::unit_z());
        let hit = Hit::new(Vector3::new(10., 0., 3.), Vector3::unit_z(), 17.);
        (ray, hit)
    }

    fn assert_color_eq(a: Color, b: Color) {
        assert_relative_eq!(a.r, b.r, epsilon = 1e-12);
        assert_relative_eq!(a.g, b.g, epsilon = 1e-12);
        assert_relative_eq!(a.b, b.b, epsilon = 1e-12);
    }

    #[test]
    fn no_lights_leaves_only_ambient() {
        let scene = simple_scene();
        let (ray, hit) = pole();
        let material = scene.objects[0].material();

        let color = scene.shade(&ray, &hit, material, &RenderOptions::default());
        assert_eq!(color, Color::red() * 0.1);
    }

    #[test]
    fn point_light_at_the_pole() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.objects = vec![red_sphere(0.8)];
        scene.lights.push(Point::new(Vector3::new(10., 0., 10.), 120.).into());

        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &RenderOptions::default());

        assert_color_eq(color, Color::red() * (0.8 * 120. / (PI * 49.)));
    }

    #[test]
    fn attenuation_can_be_switched_off() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.lights.push(Point::new(Vector3::new(10., 0., 10.), 0.5).into());

        let options = RenderOptions {
            light_attenuation: false,
            ..Default::default()
        };
        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &options);

        assert_color_eq(color, Color::red() * 0.5);
    }

    #[test]
    fn spot_light_on_axis_matches_point_light() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.lights.push(
            Spot::new(Vector3::new(10., 0., 10.), Vector3::new(10., 0., 0.), 0.3, 120.)
                .unwrap()
                .into(),
        );

        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &RenderOptions::default());

        assert_color_eq(color, Color::red() * (120. / (PI * 49.)));
    }

    #[test]
    fn spot_light_aimed_away_adds_nothing() {
        let mut scene = simple_scene();
        scene.lights.push(
            Spot::new(Vector3::new(10., 0., 10.), Vector3::new(10., 10., 10.), 0.3, 120.)
                .unwrap()
                .into(),
        );

        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &RenderOptions::default());

        assert_eq!(color, Color::red() * 0.1);
    }

    #[test]
    fn directed_light_uses_cosine_and_raw_brightness() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        // 60 degrees off the pole normal
        let direction = Vector3::new(-(PI / 3.).sin(), 0., -(PI / 3.).cos());
        scene.lights.push(Directed::new(direction, 2.).unwrap().into());

        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &RenderOptions::default());

        assert_color_eq(color, Color::red() * (2. * 0.5));
    }

    #[test]
    fn light_behind_the_surface_adds_nothing() {
        let mut scene = simple_scene();
        scene.lights.push(Point::new(Vector3::new(10., 0., -10.), 500.).into());

        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &RenderOptions::default());

        assert_eq!(color, Color::red() * 0.1);
    }

    #[test]
    fn shadows_only_when_enabled() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.lights.push(Point::new(Vector3::new(10., 0., 10.), 120.).into());
        // a small blocker hovering between the pole and the light
        scene.objects.push(
            Sphere::new(Vector3::new(10., 0., 6.), 1., Material::default())
                .unwrap()
                .into(),
        );

        let (ray, hit) = pole();
        let material = scene.objects[0].material();

        let lit = scene.shade(&ray, &hit, material, &RenderOptions::default());
        assert!(lit.r > 0.);

        let shadowed = RenderOptions {
            shadows: true,
            ..Default::default()
        };
        assert_eq!(scene.shade(&ray, &hit, material, &shadowed), Color::black());
    }

    #[test]
    fn objects_beyond_the_light_cast_no_shadow() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.lights.push(Point::new(Vector3::new(10., 0., 10.), 120.).into());
        scene.objects.push(
            Sphere::new(Vector3::new(10., 0., 20.), 2., Material::default())
                .unwrap()
                .into(),
        );

        let (ray, hit) = pole();
        let options = RenderOptions {
            shadows: true,
            ..Default::default()
        };
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &options);

        assert_color_eq(color, Color::red() * (120. / (PI * 49.)));
    }

    #[test]
    fn directed_light_is_blocked_by_anything_in_its_path() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.lights.push(Directed::new(-Vector3::unit_z(), 1.).unwrap().into());
        scene.objects.push(
            Sphere::new(Vector3::new(10., 0., 1000.), 1., Material::default())
                .unwrap()
                .into(),
        );

        let (ray, hit) = pole();
        let options = RenderOptions {
            shadows: true,
            ..Default::default()
        };
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &options);

        assert_eq!(color, Color::black());
    }

    #[test]
    fn missed_rays_take_the_background() {
        let scene = simple_scene();
        let ray = Ray::new(Vector3::zero(), -Vector3::unit_x());
        assert_eq!(
            scene.trace_ray(&ray, 0, 1., &RenderOptions::default()),
            Color::green()
        );
    }

    #[test]
    fn reflections_need_depth() {
        let mut scene = simple_scene();
        scene.ambient = 1.;
        scene.background = Color::blue();
        scene.objects = vec![Sphere::new(
            Vector3::new(10., 0., 0.),
            3.,
            Material {
                color: Color::red(),
                reflectiveness: 0.5,
                ..Default::default()
            },
        )
        .unwrap()
        .into()];

        let ray = Ray::new(Vector3::zero(), Vector3::unit_x());
        let flat = scene.trace_ray(&ray, 0, 1., &RenderOptions::default());
        assert_eq!(flat, Color::red());

        let options = RenderOptions {
            depth: 1,
            ..Default::default()
        };
        // the head-on bounce heads straight back out into the background
        let mirrored = scene.trace_ray(&ray, 0, 1., &options);
        assert_color_eq(mirrored, Color::new(0.5, 0., 0.5));
    }

    #[test]
    fn weak_reflections_are_pruned() {
        let mut scene = simple_scene();
        scene.ambient = 1.;
        scene.objects = vec![Sphere::new(
            Vector3::new(10., 0., 0.),
            3.,
            Material {
                color: Color::red(),
                reflectiveness: 0.005,
                ..Default::default()
            },
        )
        .unwrap()
        .into()];

        let options = RenderOptions {
            depth: 4,
            ..Default::default()
        };
        let ray = Ray::new(Vector3::zero(), Vector3::unit_x());
        assert_eq!(scene.trace_ray(&ray, 0, 1., &options), Color::red());
    }

    #[test]
    fn specular_highlight_is_white() {
        let mut scene = simple_scene();
        scene.ambient = 0.;
        scene.objects = vec![Sphere::new(
            Vector3::new(10., 0., 0.),
            3.,
            Material {
                color: Color::red(),
                diffuse: 0.,
                specular: 1.,
                ..Default::default()
            },
        )
        .unwrap()
        .into()];
        scene.lights.push(
            Directed::new(-Vector3::unit_z(), 1.).unwrap().into(),
        );

        // viewer and light both straight above the pole
        let (ray, hit) = pole();
        let color = scene.shade(&ray, &hit, scene.objects[0].material(), &RenderOptions::default());
        assert_color_eq(color, Color::white());
    }

    #[test]
    fn centre_pixel_hits_and_edge_pixel_misses() {
        let scene = simple_scene();
        let options = RenderOptions {
            resolution: Resolution::new(64, 48).unwrap(),
            ..Default::default()
        };
        let screen = Screen::new(&scene.camera, options.resolution);

        assert_eq!(
            scene.trace_pixel(&screen, 32, 24, &options),
            Color::red() * 0.1
        );
        assert_eq!(scene.trace_pixel(&screen, 0, 0, &options), Color::green());
    }

    #[test]
    fn render_matches_per_pixel_tracing() {
        let mut scene = simple_scene();
        scene.lights.push(Point::new(Vector3::new(0., 5., 5.), 300.).into());
        let options = RenderOptions {
            resolution: Resolution::new(20, 10).unwrap(),
            shadows: true,
            ..Default::default()
        };

        let frame = scene.render(&options);
        let screen = Screen::new(&scene.camera, options.resolution);

        assert_eq!(frame.width(), 20);
        assert_eq!(frame.height(), 10);
        for y in 0..10 {
            for x in 0..20 {
                assert_eq!(frame.get(x, y), scene.trace_pixel(&screen, x, y, &options));
            }
        }
    }
}
