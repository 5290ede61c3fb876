use nalgebra::{Matrix4, Orthographic3, Point3, Vector3};

// the camera holds still in this demo; the model does the spinning.
// two viewpoints matter per frame: the eye for the scene pass and the
// light for the shadow map pass

pub struct Viewpoints {
    pub eye: Point3<f32>,
    pub light: Point3<f32>,
    pub target: Point3<f32>,
}

impl Viewpoints {
    pub fn eye_view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &Vector3::y())
    }

    pub fn light_view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.light, &self.target, &Vector3::y())
    }
}

// directional-ish light: an ortho box wide enough to hold the model and
// its floor. gl clips z to -1..1 but wgpu clips to 0..1, so the ortho
// gets squished into the half range or half the box would clip away
pub fn light_proj(half_size: f32) -> Matrix4<f32> {
    #[rustfmt::skip]
    let squish = Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    );
    let h = half_size;
    squish * Orthographic3::new(-h, h, -h, h, -3.0 * h, 3.0 * h).to_homogeneous()
}

// degrees per tick; 45 a second at the fixed frame rate
const SPIN_RATE: f32 = 0.75;

pub struct Spin {
    angle: f32,
}

impl Spin {
    pub fn create() -> Self {
        Self { angle: 0.0 }
    }

    // fps tied
    pub fn update(&mut self) {
        self.angle += SPIN_RATE.to_radians();
        if self.angle >= std::f32::consts::TAU {
            self.angle -= std::f32::consts::TAU;
        }
    }

    // spin around the model's own vertical axis, not the world origin
    pub fn matrix(&self, center: [f32; 3]) -> Matrix4<f32> {
        let axis = Vector3::new(center[0], 0.0, center[2]);
        Matrix4::new_translation(&axis)
            * Matrix4::from_euler_angles(0.0, self.angle, 0.0)
            * Matrix4::new_translation(&-axis)
    }
}
