// copied over from obj-viewer

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

// degrees per tick; about 40 a second at the fixed frame rate
const ORBIT_RATE: f32 = 0.66;

pub struct OrbitCamera {
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

    // fps tied
    pub fn update(&mut self) {
        self.angle += ORBIT_RATE.to_radians();
        if self.angle >= std::f32::consts::TAU {
            self.angle -= std::f32::consts::TAU;
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        // the orbit is around the target, not the origin, since models
        // don't all sit at 0,0,0
        let spun = Rotation3::from_axis_angle(&Vector3::y_axis(), self.angle)
            * (self.home - self.target);
        let eye = self.target + spun;
        Matrix4::look_at_rh(&eye, &self.target, &Vector3::y())
    }
}
