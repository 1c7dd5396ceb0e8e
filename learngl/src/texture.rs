use std::fmt;
use std::rc::Rc;

use glow::{
    Context, HasContext as _, NativeTexture, LINEAR, LINEAR_MIPMAP_LINEAR, RGBA, TEXTURE0,
    TEXTURE_2D, TEXTURE_MAG_FILTER, TEXTURE_MIN_FILTER, UNSIGNED_BYTE,
};

use crate::{check_gl_error, Error, Result};

pub struct Texture {
    gl: Rc<Context>,
    id: NativeTexture,
}

impl Texture {
    /// Decode an image (anything stb_image reads) and upload it as RGBA8.
    pub fn load(gl: &Rc<Context>, data: &[u8], gen_mipmap: bool) -> Result<Self> {
        use stb_image::image::{load_from_memory_with_depth, LoadResult};
        let image = match load_from_memory_with_depth(data, 4, false) {
            LoadResult::Error(e) => return Err(Error::Texture(e)),
            LoadResult::ImageU8(image) => image,
            LoadResult::ImageF32(_) => {
                return Err(Error::Texture("HDR images are not supported".into()))
            }
        };

        unsafe {
            let id = gl.create_texture().map_err(Error::Object)?;
            let texture = Texture {
                gl: Rc::clone(gl),
                id,
            };
            gl.bind_texture(TEXTURE_2D, Some(id));
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MAG_FILTER, LINEAR as i32);
            gl.tex_image_2d(
                TEXTURE_2D,
                0,
                RGBA as _,
                image.width as _,
                image.height as _,
                0,
                RGBA,
                UNSIGNED_BYTE,
                Some(&image.data),
            );
            check_gl_error(gl, "texture image_2d")?;
            if gen_mipmap {
                gl.generate_mipmap(TEXTURE_2D);
                gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR_MIPMAP_LINEAR as _);
                check_gl_error(gl, "texture mipmap")?;
            }
            log::debug!(
                "loaded {}x{} texture {:?}",
                image.width,
                image.height,
                id
            );
            Ok(texture)
        }
    }

    /// Bind to texture unit `unit` (0 for `TEXTURE0`).
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(TEXTURE0 + unit);
            self.gl.bind_texture(TEXTURE_2D, Some(self.id));
        }
    }

    pub fn id(&self) -> NativeTexture {
        self.id
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture").field("id", &self.id).finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { self.gl.delete_texture(self.id) };
    }
}
