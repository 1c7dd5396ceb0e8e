use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use glow::Context;

use crate::driver::{ShaderDriver, ShaderStage};
use crate::error::ShaderError;

/// A linked program built from a vertex and a fragment stage.
///
/// The program is deleted on [ShaderProgram::release] or when dropped,
/// whichever comes first. The GL context must still be alive at that point.
pub struct ShaderProgram<D: ShaderDriver = Context> {
    gl: Rc<D>,
    program: Option<D::Program>,
}

impl<D: ShaderDriver> ShaderProgram<D> {
    pub fn from_paths(
        gl: &Rc<D>,
        vertex_shader_path: impl AsRef<Path>,
        fragment_shader_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = read_source(vertex_shader_path.as_ref())?;
        let fragment = read_source(fragment_shader_path.as_ref())?;
        Self::from_sources(gl, &vertex, &fragment)
    }

    pub fn from_sources(
        gl: &Rc<D>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let program = unsafe {
            compile_program(
                &**gl,
                &[
                    (ShaderStage::Vertex, vertex_source),
                    (ShaderStage::Fragment, fragment_source),
                ],
            )?
        };
        log::debug!("linked shader program {program:?}");
        Ok(ShaderProgram {
            gl: Rc::clone(gl),
            program: Some(program),
        })
    }

    /// The raw program, for lookups this wrapper doesn't cover (attribute locations).
    pub fn id(&self) -> Option<D::Program> {
        self.program
    }

    pub fn is_released(&self) -> bool {
        self.program.is_none()
    }

    pub fn is_active(&self) -> bool {
        match self.program {
            Some(program) => unsafe { self.gl.current_program() == Some(program) },
            None => false,
        }
    }

    pub fn activate(&self) -> Result<(), ShaderError> {
        let program = self.linked()?;
        unsafe { self.gl.use_program(Some(program)) };
        Ok(())
    }

    /// Delete the program. Releasing twice is a no-op.
    pub fn release(&mut self) {
        if let Some(program) = self.program.take() {
            unsafe { self.gl.delete_program(program) };
            log::debug!("released shader program {program:?}");
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) -> Result<(), ShaderError> {
        self.set_int(name, value as i32)
    }

    pub fn set_int(&self, name: &str, value: i32) -> Result<(), ShaderError> {
        self.with_uniform(name, |gl, location| unsafe {
            gl.uniform_1_i32(Some(location), value)
        })
    }

    pub fn set_float(&self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.with_uniform(name, |gl, location| unsafe {
            gl.uniform_1_f32(Some(location), value)
        })
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) -> Result<(), ShaderError> {
        self.with_uniform(name, |gl, location| unsafe {
            gl.uniform_3_f32(Some(location), value.x, value.y, value.z)
        })
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) -> Result<(), ShaderError> {
        self.with_uniform(name, |gl, location| unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, &value.to_cols_array())
        })
    }

    fn linked(&self) -> Result<D::Program, ShaderError> {
        self.program.ok_or(ShaderError::Released)
    }

    // Uniform writes go to the current program. Bind ours for the write and
    // hand the slot back to whichever program held it.
    fn with_uniform(
        &self,
        name: &str,
        write: impl FnOnce(&D, &D::UniformLocation),
    ) -> Result<(), ShaderError> {
        let program = self.linked()?;
        unsafe {
            let Some(location) = self.gl.get_uniform_location(program, name) else {
                log::trace!("uniform `{name}` is not active in {program:?}");
                return Ok(());
            };
            let previous = self.gl.current_program();
            if previous != Some(program) {
                self.gl.use_program(Some(program));
            }
            write(&*self.gl, &location);
            if previous != Some(program) {
                self.gl.use_program(previous);
            }
        }
        Ok(())
    }
}

impl<D: ShaderDriver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .finish()
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.release();
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_owned(),
        source,
    })
}

unsafe fn compile_program<D: ShaderDriver>(
    gl: &D,
    stages: &[(ShaderStage, &str)],
) -> Result<D::Program, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::Create)?;

    let mut shaders = Vec::with_capacity(stages.len());
    let mut result = Ok(());
    for &(stage, source) in stages {
        match compile_shader(gl, stage, source) {
            Ok(shader) => {
                gl.attach_shader(program, shader);
                shaders.push(shader);
            }
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    if result.is_ok() {
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            result = Err(ShaderError::Link {
                log: gl.get_program_info_log(program),
            });
        }
    }

    for shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }

    match result {
        Ok(()) => Ok(program),
        Err(e) => {
            gl.delete_program(program);
            Err(e)
        }
    }
}

unsafe fn compile_shader<D: ShaderDriver>(
    gl: &D,
    stage: ShaderStage,
    source: &str,
) -> Result<D::Shader, ShaderError> {
    let shader = gl.create_shader(stage).map_err(ShaderError::Create)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if gl.get_shader_compile_status(shader) {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        Err(ShaderError::Compile { stage, log })
    }
}
