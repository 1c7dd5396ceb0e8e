//! The slice of the GL API that [ShaderProgram](crate::ShaderProgram) needs.
//!
//! Mirrors the shape of [glow::HasContext] so the real implementation is a
//! straight delegation, while tests can swap in an in-memory driver.

use std::fmt;
use std::num::NonZeroU32;

use glow::{
    Context, HasContext, NativeProgram, NativeShader, NativeUniformLocation, CURRENT_PROGRAM,
    FRAGMENT_SHADER, VERTEX_SHADER,
};

#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER,
            ShaderStage::Fragment => FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// All methods require the driver's context to be current on the calling thread.
#[allow(clippy::missing_safety_doc)]
pub trait ShaderDriver {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + PartialEq + fmt::Debug;
    type UniformLocation;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn delete_shader(&self, shader: Self::Shader);

    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String;
    unsafe fn delete_program(&self, program: Self::Program);

    unsafe fn use_program(&self, program: Option<Self::Program>);
    unsafe fn current_program(&self) -> Option<Self::Program>;

    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    unsafe fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, x: i32);
    unsafe fn uniform_1_f32(&self, location: Option<&Self::UniformLocation>, x: f32);
    unsafe fn uniform_3_f32(
        &self,
        location: Option<&Self::UniformLocation>,
        x: f32,
        y: f32,
        z: f32,
    );
    unsafe fn uniform_matrix_4_f32_slice(
        &self,
        location: Option<&Self::UniformLocation>,
        transpose: bool,
        v: &[f32],
    );
}

impl ShaderDriver for Context {
    type Shader = NativeShader;
    type Program = NativeProgram;
    type UniformLocation = NativeUniformLocation;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<NativeShader, String> {
        HasContext::create_shader(self, stage.gl_enum())
    }

    unsafe fn shader_source(&self, shader: NativeShader, source: &str) {
        HasContext::shader_source(self, shader, source)
    }

    unsafe fn compile_shader(&self, shader: NativeShader) {
        HasContext::compile_shader(self, shader)
    }

    unsafe fn get_shader_compile_status(&self, shader: NativeShader) -> bool {
        HasContext::get_shader_compile_status(self, shader)
    }

    unsafe fn get_shader_info_log(&self, shader: NativeShader) -> String {
        HasContext::get_shader_info_log(self, shader)
    }

    unsafe fn delete_shader(&self, shader: NativeShader) {
        HasContext::delete_shader(self, shader)
    }

    unsafe fn create_program(&self) -> Result<NativeProgram, String> {
        HasContext::create_program(self)
    }

    unsafe fn attach_shader(&self, program: NativeProgram, shader: NativeShader) {
        HasContext::attach_shader(self, program, shader)
    }

    unsafe fn detach_shader(&self, program: NativeProgram, shader: NativeShader) {
        HasContext::detach_shader(self, program, shader)
    }

    unsafe fn link_program(&self, program: NativeProgram) {
        HasContext::link_program(self, program)
    }

    unsafe fn get_program_link_status(&self, program: NativeProgram) -> bool {
        HasContext::get_program_link_status(self, program)
    }

    unsafe fn get_program_info_log(&self, program: NativeProgram) -> String {
        HasContext::get_program_info_log(self, program)
    }

    unsafe fn delete_program(&self, program: NativeProgram) {
        HasContext::delete_program(self, program)
    }

    unsafe fn use_program(&self, program: Option<NativeProgram>) {
        HasContext::use_program(self, program)
    }

    unsafe fn current_program(&self) -> Option<NativeProgram> {
        let id = HasContext::get_parameter_i32(self, CURRENT_PROGRAM);
        NonZeroU32::new(id as u32).map(NativeProgram)
    }

    unsafe fn get_uniform_location(
        &self,
        program: NativeProgram,
        name: &str,
    ) -> Option<NativeUniformLocation> {
        HasContext::get_uniform_location(self, program, name)
    }

    unsafe fn uniform_1_i32(&self, location: Option<&NativeUniformLocation>, x: i32) {
        HasContext::uniform_1_i32(self, location, x)
    }

    unsafe fn uniform_1_f32(&self, location: Option<&NativeUniformLocation>, x: f32) {
        HasContext::uniform_1_f32(self, location, x)
    }

    unsafe fn uniform_3_f32(
        &self,
        location: Option<&NativeUniformLocation>,
        x: f32,
        y: f32,
        z: f32,
    ) {
        HasContext::uniform_3_f32(self, location, x, y, z)
    }

    unsafe fn uniform_matrix_4_f32_slice(
        &self,
        location: Option<&NativeUniformLocation>,
        transpose: bool,
        v: &[f32],
    ) {
        HasContext::uniform_matrix_4_f32_slice(self, location, transpose, v)
    }
}
