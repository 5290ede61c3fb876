use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

// no input handling here; the viewer orbits the eye around the model on
// its own so you can put the keyboard down and squint at the mesh

// degrees per tick; about 40 a second at the fixed frame rate
const ORBIT_RATE: f32 = 0.66;

pub struct OrbitCamera {
    // where the eye started; the current eye is this spun around y
    pub home: Point3<f32>,
    pub target: Point3<f32>,
    angle: f32,
}

impl OrbitCamera {
    pub fn create(home: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            home,
            target,
            angle: 0.0,
        }
    }

    // fps tied, same as the controller this replaced
    pub fn update(&mut self) {
        self.angle += ORBIT_RATE.to_radians();
        if self.angle >= std::f32::consts::TAU {
            self.angle -= std::f32::consts::TAU;
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        let eye = Rotation3::from_axis_angle(&Vector3::y_axis(), self.angle) * self.home;
        // moving the eye moves the look direction with it
        Matrix4::look_at_rh(&eye, &self.target, &Vector3::y())
    }
}
