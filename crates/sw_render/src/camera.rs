//! Screen-space camera for a fixed virtual playfield.
//!
//! The game simulates against a constant virtual resolution; the projection
//! maps that rectangle to the full surface no matter how the window is sized,
//! so gameplay coordinates never depend on the OS window. The axis convention
//! is Y-down with the origin at the top-left corner, the classic sprite layout.

use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct Camera2D {
    pub virtual_width: f32,
    pub virtual_height: f32,
}

impl Camera2D {
    pub fn new(virtual_width: f32, virtual_height: f32) -> Self {
        Self {
            virtual_width,
            virtual_height,
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        // bottom > top flips the Y axis so +Y points down the screen.
        let proj = Mat4::orthographic_rh(
            0.0,
            self.virtual_width,
            self.virtual_height,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
