use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::driver::ShaderStage;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("cannot read shader source {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
    #[error("driver could not create object: {0}")]
    Create(String),
    #[error("shader program has already been released")]
    Released,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("cannot create gl object: {0}")]
    Object(String),
    #[error("texture: {0}")]
    Texture(String),
    #[error("window: {0}")]
    Window(String),
    #[error("gl error {0:#06x}")]
    Gl(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
