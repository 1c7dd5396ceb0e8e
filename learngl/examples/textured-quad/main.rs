use std::rc::Rc;

use glam::{Vec2, Vec3};
use glow::{
    Context, HasContext, NativeBuffer, NativeVertexArray, ARRAY_BUFFER, COLOR_BUFFER_BIT, FLOAT,
    STATIC_DRAW, TRIANGLES,
};
use learngl::{check_gl_error, elapsed_time, Error, LearnGL, ShaderProgram, Texture};
use sdl2::video::Window;

struct Demo {
    gl: Rc<Context>,
    shader: ShaderProgram,
    texture: Texture,
    vao: NativeVertexArray,
    vbos: [NativeBuffer; 2],
}

impl LearnGL for Demo {
    fn init(gl: &Rc<Context>, _window: &Window) -> learngl::Result<Self> {
        let vertices = [
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        ];
        let tex_coords = vertices.map(|v| Vec2::new(v.x + 0.5, v.y + 0.5));

        let shader = ShaderProgram::from_paths(
            gl,
            concat!(env!("CARGO_MANIFEST_DIR"), "/examples/textured-quad/textured.vert"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/examples/textured-quad/textured.frag"),
        )?;
        let texture = Texture::load(gl, include_bytes!("checker.tga"), true)?;

        unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Object)?;
            gl.bind_vertex_array(Some(vao));

            let vertex_vbo = gl.create_buffer().map_err(Error::Object)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vertex_vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, bytemuck::cast_slice(&vertices), STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(0, 3, FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(0);

            let tex_coord_vbo = gl.create_buffer().map_err(Error::Object)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(tex_coord_vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, bytemuck::cast_slice(&tex_coords), STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(1, 2, FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(1);

            gl.bind_vertex_array(None);

            // sampler reads texture unit 0
            shader.set_int("tex", 0)?;
            check_gl_error(gl, "init")?;

            Ok(Demo {
                gl: Rc::clone(gl),
                shader,
                texture,
                vao,
                vbos: [vertex_vbo, tex_coord_vbo],
            })
        }
    }

    fn display(&mut self, gl: &Context, _window: &Window) {
        let mix_amount = (elapsed_time().sin() + 1.0) / 4.0;

        unsafe {
            gl.clear_color(0.2, 0.2, 0.5, 1.0);
            gl.clear(COLOR_BUFFER_BIT);
        }

        self.texture.bind(0);
        let uniforms = self
            .shader
            .activate()
            .and_then(|_| self.shader.set_float("mix_amount", mix_amount));
        if let Err(e) = uniforms {
            log::error!("{e}");
            return;
        }

        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(TRIANGLES, 0, 6);
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
    if let Err(e) = Demo::sdl2_window("Textured quad").start() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
