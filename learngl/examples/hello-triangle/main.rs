use std::rc::Rc;

use glam::Vec3;
use glow::{
    Context, HasContext, NativeBuffer, NativeVertexArray, ARRAY_BUFFER, COLOR_BUFFER_BIT, FLOAT,
    STATIC_DRAW, TRIANGLES,
};
use learngl::{check_gl_error, LearnGL, ShaderProgram};
use sdl2::video::Window;

const VERTEX_SHADER: &str = "#version 330 core
layout (location = 0) in vec3 a_pos;
void main()
{
    gl_Position = vec4(a_pos, 1.0);
}
";

const FRAGMENT_SHADER_RED: &str = "#version 330 core
out vec4 frag_color;
void main()
{
    frag_color = vec4(1.0, 0.2, 0.2, 1.0);
}
";

const FRAGMENT_SHADER_YELLOW: &str = "#version 330 core
out vec4 frag_color;
void main()
{
    frag_color = vec4(1.0, 1.0, 0.0, 1.0);
}
";

struct Triangle {
    vao: NativeVertexArray,
    vbo: NativeBuffer,
}

impl Triangle {
    fn new(gl: &Context, vertices: &[Vec3; 3]) -> learngl::Result<Self> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(learngl::Error::Object)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(learngl::Error::Object)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, bytemuck::cast_slice(vertices), STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(0, 3, FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(0);

            gl.bind_buffer(ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
            Ok(Triangle { vao, vbo })
        }
    }

    fn draw(&self, gl: &Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(TRIANGLES, 0, 3);
        }
    }

    fn delete(&self, gl: &Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

struct Demo {
    gl: Rc<Context>,
    red: ShaderProgram,
    yellow: ShaderProgram,
    left: Triangle,
    right: Triangle,
}

impl LearnGL for Demo {
    fn init(gl: &Rc<Context>, _window: &Window) -> learngl::Result<Self> {
        let red = ShaderProgram::from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER_RED)?;
        let yellow = ShaderProgram::from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER_YELLOW)?;

        let left = Triangle::new(
            gl,
            &[
                Vec3::new(-0.8, -0.8, 0.0),
                Vec3::new(-0.3, -0.8, 0.0),
                Vec3::new(-0.55, -0.3, 0.0),
            ],
        )?;
        let right = Triangle::new(
            gl,
            &[
                Vec3::new(-0.3, -0.8, 0.0),
                Vec3::new(0.0, -0.8, 0.0),
                Vec3::new(-0.15, -0.3, 0.0),
            ],
        )?;

        // glPolygonMode(GL_FRONT_AND_BACK, GL_LINE) for wireframe
        check_gl_error(gl, "init")?;

        Ok(Demo {
            gl: Rc::clone(gl),
            red,
            yellow,
            left,
            right,
        })
    }

    fn display(&mut self, gl: &Context, _window: &Window) {
        unsafe {
            gl.clear_color(0.2, 0.3, 0.3, 1.0);
            gl.clear(COLOR_BUFFER_BIT);
        }

        if self.red.activate().is_ok() {
            self.left.draw(gl);
        }
        if self.yellow.activate().is_ok() {
            self.right.draw(gl);
        }
    }
}

impl Drop for Demo {
    fn drop(&mut self) {
        self.left.delete(&self.gl);
        self.right.delete(&self.gl);
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = Demo::sdl2_window("Hello triangle").start() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
