//! In-memory driver for unit tests.
//!
//! Compiles anything that has a `main` and balanced braces, links a vertex
//! and a fragment stage whose `in`/`out` varyings match, and treats a
//! declared uniform as active only if its name is used again in the same
//! stage (otherwise it counts as optimized out). Uniform writes land in the
//! current program, like they do in GL.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{ShaderDriver, ShaderStage};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    info_log: String,
    // index is the uniform location
    uniforms: Vec<String>,
    values: HashMap<u32, UniformValue>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    current: Option<u32>,
    use_program_calls: usize,
    invalid_operations: usize,
    refuse_programs: bool,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn write_uniform(&mut self, location: Option<&u32>, value: UniformValue) {
        let Some(&location) = location else {
            return;
        };
        let Some(program) = self.current.and_then(|p| self.programs.get_mut(&p)) else {
            self.invalid_operations += 1;
            return;
        };
        if (location as usize) < program.uniforms.len() {
            program.values.insert(location, value);
        } else {
            self.invalid_operations += 1;
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeDriver {
    state: RefCell<State>,
}

impl FakeDriver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `create_program` fail, as if the driver ran out of names.
    pub(crate) fn refuse_programs(&self) {
        self.state.borrow_mut().refuse_programs = true;
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub(crate) fn current(&self) -> Option<u32> {
        self.state.borrow().current
    }

    pub(crate) fn use_program_calls(&self) -> usize {
        self.state.borrow().use_program_calls
    }

    pub(crate) fn invalid_operations(&self) -> usize {
        self.state.borrow().invalid_operations
    }

    pub(crate) fn uniform(&self, program: u32, name: &str) -> Option<UniformValue> {
        let state = self.state.borrow();
        let program = state.programs.get(&program)?;
        let location = program.uniforms.iter().position(|u| u == name)? as u32;
        program.values.get(&location).copied()
    }

    pub(crate) fn uniform_values(&self, program: u32) -> HashMap<u32, UniformValue> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.values.clone())
            .unwrap_or_default()
    }
}

fn compiles(source: &str) -> bool {
    source.contains("void main") && source.matches('{').count() == source.matches('}').count()
}

fn declared<'a>(source: &'a str, qualifier: &str) -> impl Iterator<Item = &'a str> + 'a {
    let prefix = format!("{qualifier} ");
    source.lines().filter_map(move |line| {
        let line = line.trim();
        let rest = line.strip_prefix(prefix.as_str())?;
        rest.trim_end_matches(';').split_whitespace().last()
    })
}

fn compiled_stage<'a>(
    shaders: &'a HashMap<u32, FakeShader>,
    attached: &[u32],
    stage: ShaderStage,
) -> Option<&'a FakeShader> {
    attached
        .iter()
        .filter_map(|id| shaders.get(id))
        .find(|s| s.stage == stage && s.compiled)
}

fn identifiers(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
}

fn active_uniforms(source: &str) -> impl Iterator<Item = &str> {
    declared(source, "uniform")
        .filter(move |&name| identifiers(source).filter(|&word| word == name).count() > 1)
}

impl ShaderDriver for FakeDriver {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = u32;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            shader.source = source.to_owned();
        }
    }

    unsafe fn compile_shader(&self, shader: u32) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            shader.compiled = compiles(&shader.source);
        }
    }

    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    unsafe fn get_shader_info_log(&self, shader: u32) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(s) if !s.compiled => "0:1(1): error: syntax error, unexpected end of file".into(),
            _ => String::new(),
        }
    }

    unsafe fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.refuse_programs {
            return Err("out of program names".into());
        }
        let id = state.next_id();
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.push(shader);
        }
    }

    unsafe fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.retain(|&s| s != shader);
        }
    }

    unsafe fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let State {
            shaders, programs, ..
        } = &mut *state;
        let Some(program) = programs.get_mut(&program) else {
            return;
        };
        let vertex = compiled_stage(shaders, &program.attached, ShaderStage::Vertex);
        let fragment = compiled_stage(shaders, &program.attached, ShaderStage::Fragment);
        let (Some(vertex), Some(fragment)) = (vertex, fragment) else {
            program.linked = false;
            program.info_log = "error: program needs a compiled vertex and fragment shader".into();
            return;
        };

        let outputs: Vec<_> = declared(&vertex.source, "out").collect();
        if let Some(missing) = declared(&fragment.source, "in").find(|i| !outputs.contains(i)) {
            program.linked = false;
            program.info_log =
                format!("error: fragment shader input `{missing}` has no matching vertex output");
            return;
        }

        let mut uniforms: Vec<String> = Vec::new();
        for name in active_uniforms(&vertex.source).chain(active_uniforms(&fragment.source)) {
            if !uniforms.iter().any(|u| u == name) {
                uniforms.push(name.to_owned());
            }
        }
        program.uniforms = uniforms;
        program.values.clear();
        program.info_log.clear();
        program.linked = true;
    }

    unsafe fn get_program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    unsafe fn get_program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    unsafe fn delete_program(&self, program: u32) {
        self.state.borrow_mut().programs.remove(&program);
    }

    unsafe fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.use_program_calls += 1;
        match program {
            Some(p) if !state.programs.get(&p).is_some_and(|p| p.linked) => {
                state.invalid_operations += 1;
            }
            _ => state.current = program,
        }
    }

    unsafe fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    unsafe fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let program = state.programs.get(&program).filter(|p| p.linked)?;
        program
            .uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| i as u32)
    }

    unsafe fn uniform_1_i32(&self, location: Option<&u32>, x: i32) {
        self.state
            .borrow_mut()
            .write_uniform(location, UniformValue::Int(x));
    }

    unsafe fn uniform_1_f32(&self, location: Option<&u32>, x: f32) {
        self.state
            .borrow_mut()
            .write_uniform(location, UniformValue::Float(x));
    }

    unsafe fn uniform_3_f32(&self, location: Option<&u32>, x: f32, y: f32, z: f32) {
        self.state
            .borrow_mut()
            .write_uniform(location, UniformValue::Vec3([x, y, z]));
    }

    unsafe fn uniform_matrix_4_f32_slice(
        &self,
        location: Option<&u32>,
        transpose: bool,
        v: &[f32],
    ) {
        let mut state = self.state.borrow_mut();
        let Ok(mut m) = <[f32; 16]>::try_from(v.get(..16).unwrap_or(v)) else {
            state.invalid_operations += 1;
            return;
        };
        if transpose {
            for row in 0..4 {
                for col in 0..4 {
                    m[col * 4 + row] = v[row * 4 + col];
                }
            }
        }
        state.write_uniform(location, UniformValue::Mat4(m));
    }
}
