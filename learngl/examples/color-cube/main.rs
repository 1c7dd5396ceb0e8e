use std::f32::consts::FRAC_PI_4;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use glow::{
    Context, HasContext, NativeBuffer, NativeVertexArray, ARRAY_BUFFER, COLOR_BUFFER_BIT,
    DEPTH_BUFFER_BIT, DEPTH_TEST, FLOAT, STATIC_DRAW, TRIANGLES,
};
use learngl::{check_gl_error, elapsed_time, Error, LearnGL, ShaderProgram};
use sdl2::keyboard::{Keycode, Mod, Scancode};
use sdl2::video::Window;

// Corners of a unit cube centered on the origin, indexed by the bit pattern zyx.
fn corner(i: usize) -> Vec3 {
    let side = |bit: usize| if i & bit == 0 { -0.5 } else { 0.5 };
    Vec3::new(side(1), side(2), side(4))
}

// Each face as a quad of corner indices, split into two triangles by cube().
const FACES: [[usize; 4]; 6] = [
    [0, 2, 3, 1], // back
    [4, 5, 7, 6], // front
    [0, 4, 6, 2], // left
    [1, 3, 7, 5], // right
    [2, 6, 7, 3], // top
    [0, 1, 5, 4], // bottom
];

fn cube() -> (Vec<Vec3>, Vec<Vec3>) {
    let red = Vec3::X;
    let green = Vec3::Y;
    let blue = Vec3::Z;
    let face_colors = [red, green, blue, green + blue, red + blue, red + green];

    let mut positions = Vec::with_capacity(36);
    let mut colors = Vec::with_capacity(36);
    for (face, color) in FACES.iter().zip(face_colors) {
        for i in [0, 1, 2, 0, 2, 3] {
            positions.push(corner(face[i]));
            colors.push(color);
        }
    }
    (positions, colors)
}

struct Demo {
    gl: Rc<Context>,
    shader: ShaderProgram,
    vao: NativeVertexArray,
    vbos: [NativeBuffer; 2],
    aspect: f32,
    brightness: f32,
}

impl LearnGL for Demo {
    fn init(gl: &Rc<Context>, window: &Window) -> learngl::Result<Self> {
        let shader = ShaderProgram::from_paths(
            gl,
            concat!(env!("CARGO_MANIFEST_DIR"), "/examples/color-cube/colorcube.vert"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/examples/color-cube/colorcube.frag"),
        )?;
        let (positions, colors) = cube();

        let vao;
        let mut vbos = Vec::new();
        unsafe {
            gl.enable(DEPTH_TEST);

            vao = gl.create_vertex_array().map_err(Error::Object)?;
            gl.bind_vertex_array(Some(vao));

            for (location, data) in [positions, colors].iter().enumerate() {
                let vbo = gl.create_buffer().map_err(Error::Object)?;
                gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
                gl.buffer_data_u8_slice(
                    ARRAY_BUFFER,
                    bytemuck::cast_slice(data.as_slice()),
                    STATIC_DRAW,
                );
                gl.vertex_attrib_pointer_f32(location as u32, 3, FLOAT, false, 0, 0);
                gl.enable_vertex_attrib_array(location as u32);
                vbos.push(vbo);
            }
            gl.bind_vertex_array(None);
        }

        shader.set_mat4("view", &Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)))?;
        check_gl_error(gl, "init")?;

        let (width, height) = window.drawable_size();
        Ok(Demo {
            gl: Rc::clone(gl),
            shader,
            vao,
            vbos: [vbos[0], vbos[1]],
            aspect: width as f32 / height.max(1) as f32,
            brightness: 1.0,
        })
    }

    fn resized(&mut self, gl: &Context, width: i32, height: i32) {
        unsafe { gl.viewport(0, 0, width, height) };
        self.aspect = width as f32 / height.max(1) as f32;
    }

    fn display(&mut self, gl: &Context, _window: &Window) {
        let t = elapsed_time();
        let model = Mat4::from_rotation_y(t) * Mat4::from_rotation_x(t / 2.0);
        let projection = Mat4::perspective_rh_gl(FRAC_PI_4, self.aspect, 0.1, 100.0);

        unsafe {
            gl.clear_color(0.2, 0.2, 0.5, 1.0);
            gl.clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);
        }

        let uniforms = self
            .shader
            .activate()
            .and_then(|_| self.shader.set_mat4("model", &model))
            .and_then(|_| self.shader.set_mat4("projection", &projection))
            .and_then(|_| self.shader.set_float("brightness", self.brightness));
        if let Err(e) = uniforms {
            log::error!("{e}");
            return;
        }

        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(TRIANGLES, 0, 36);
        }
    }

    fn key_down(
        &mut self,
        keycode: Option<Keycode>,
        _scancode: Option<Scancode>,
        _keymod: Mod,
        _repeat: bool,
    ) {
        match keycode {
            Some(Keycode::Plus | Keycode::KpPlus) => {
                self.brightness = (self.brightness + 0.1).min(1.0)
            }
            Some(Keycode::Minus | Keycode::KpMinus) => {
                self.brightness = (self.brightness - 0.1).max(0.0)
            }
            _ => {}
        }
    }
}

impl Drop for Demo {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            for vbo in self.vbos {
                self.gl.delete_buffer(vbo);
            }
        }
    }
}

fn main() {
    env_logger::init();
    let result = Demo::sdl2_window("Color cube")
        .debug_message_callback(learngl::log_debug_message)
        .start();
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
