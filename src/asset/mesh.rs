/// Parametric description of a primitive mesh.
///
/// The scene core never tessellates these; they are forwarded untouched to
/// whatever draws the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeshDesc {
    Sphere {
        radius: f32,
        segments: u32,
        rings: u32,
    },
    Torus {
        loop_radius: f32,
        circle_radius: f32,
        loop_samples: u32,
        circle_samples: u32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        samples: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        samples: u32,
    },
}

impl MeshDesc {
    /// Radius of the smallest origin-centred sphere enclosing the primitive.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            MeshDesc::Sphere { radius, .. } => radius,
            MeshDesc::Torus {
                loop_radius,
                circle_radius,
                ..
            } => loop_radius + circle_radius,
            MeshDesc::Cylinder { radius, height, .. } | MeshDesc::Cone { radius, height, .. } => {
                (radius * radius + height * height * 0.25).sqrt()
            }
        }
    }
}
