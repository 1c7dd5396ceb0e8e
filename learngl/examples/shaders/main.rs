use std::rc::Rc;

use glam::Vec3;
use glow::{
    Context, HasContext, NativeBuffer, NativeVertexArray, ARRAY_BUFFER, COLOR_BUFFER_BIT, FLOAT,
    STATIC_DRAW, TRIANGLES,
};
use learngl::{check_gl_error, delta_time, Error, LearnGL, ShaderProgram};
use sdl2::keyboard::{Keycode, Mod, Scancode};
use sdl2::video::Window;

const SPEED: f32 = 0.6;

struct Demo {
    gl: Rc<Context>,
    shader: ShaderProgram,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    offset: f32,
    forward: bool,
    grayscale: bool,
}

impl LearnGL for Demo {
    fn init(gl: &Rc<Context>, _window: &Window) -> learngl::Result<Self> {
        let shader = ShaderProgram::from_paths(
            gl,
            concat!(env!("CARGO_MANIFEST_DIR"), "/examples/shaders/vertex.glsl"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/examples/shaders/fragment.glsl"),
        )?;

        // position, color
        let vertices = [
            [Vec3::new(-0.5, -0.5, 0.0), Vec3::X],
            [Vec3::new(0.5, -0.5, 0.0), Vec3::Y],
            [Vec3::new(0.0, 0.5, 0.0), Vec3::Z],
        ];
        let stride = std::mem::size_of::<[Vec3; 2]>() as i32;

        unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Object)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(Error::Object)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, bytemuck::cast_slice(&vertices), STATIC_DRAW);

            gl.vertex_attrib_pointer_f32(0, 3, FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            let color_offset = std::mem::size_of::<Vec3>() as i32;
            gl.vertex_attrib_pointer_f32(1, 3, FLOAT, false, stride, color_offset);
            gl.enable_vertex_attrib_array(1);

            gl.bind_buffer(ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);

            check_gl_error(gl, "init")?;

            Ok(Demo {
                gl: Rc::clone(gl),
                shader,
                vao,
                vbo,
                offset: 0.0,
                forward: true,
                grayscale: false,
            })
        }
    }

    fn display(&mut self, gl: &Context, _window: &Window) {
        if self.offset + 0.5 >= 1.0 {
            self.forward = false;
        } else if self.offset - 0.5 <= -1.0 {
            self.forward = true;
        }
        let step = SPEED * delta_time();
        self.offset += if self.forward { step } else { -step };

        unsafe {
            gl.clear_color(1.0, 1.0, 1.0, 1.0);
            gl.clear(COLOR_BUFFER_BIT);
        }

        let uniforms = self
            .shader
            .activate()
            .and_then(|_| self.shader.set_float("offset", self.offset))
            .and_then(|_| self.shader.set_bool("grayscale", self.grayscale));
        if let Err(e) = uniforms {
            log::error!("{e}");
            return;
        }

        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(TRIANGLES, 0, 3);
        }
    }

    fn key_down(
        &mut self,
        keycode: Option<Keycode>,
        _scancode: Option<Scancode>,
        _keymod: Mod,
        repeat: bool,
    ) {
        if keycode == Some(Keycode::Space) && !repeat {
            self.grayscale ^= true;
        }
    }
}

impl Drop for Demo {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
        }
        self.shader.release();
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = Demo::sdl2_window("Shaders").start() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
