use glow::{
    Context, HasContext, DEBUG_OUTPUT, DEBUG_SEVERITY_HIGH, DEBUG_SEVERITY_LOW,
    DEBUG_SEVERITY_MEDIUM, NO_ERROR,
};
use log::Level;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Mod, Scancode};
use sdl2::mouse::MouseButton;

use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Instant;

pub use glam;
pub use glow;
pub use sdl2::{self, video::Window};

pub mod driver;
pub mod error;
mod shader;
mod texture;
pub mod time;

pub use driver::{ShaderDriver, ShaderStage};
pub use error::{Error, Result, ShaderError};
pub use shader::ShaderProgram;
pub use texture::Texture;
pub use time::{delta_time, elapsed_time, frame_count};

/// Drain the GL error queue, logging every pending error.
pub fn check_gl_error(gl: &Context, what: &str) -> Result<()> {
    let mut result = Ok(());
    unsafe {
        let mut error = gl.get_error();
        while error != NO_ERROR {
            log::error!("{what}: gl error {error:#06x}");
            if result.is_ok() {
                result = Err(Error::Gl(error));
            }
            error = gl.get_error();
        }
    }
    result
}

/// Debug message callback that forwards driver messages to `log`.
pub fn log_debug_message(source: u32, typ: u32, id: u32, severity: u32, message: String) {
    let level = match severity {
        DEBUG_SEVERITY_HIGH => Level::Error,
        DEBUG_SEVERITY_MEDIUM => Level::Warn,
        DEBUG_SEVERITY_LOW => Level::Debug,
        _ => Level::Trace,
    };
    log::log!(
        level,
        "gl: source = {source:#x}, type = {typ:#x}, id = {id}: {message}"
    );
}

#[allow(unused)]
pub trait LearnGL: Sized {
    fn init(gl: &Rc<Context>, window: &Window) -> Result<Self>;
    fn display(&mut self, gl: &Context, window: &Window);

    fn resized(&mut self, gl: &Context, width: i32, height: i32) {
        unsafe { gl.viewport(0, 0, width, height) };
    }

    fn mouse_up(&mut self, button: MouseButton, x: i32, y: i32) {}
    fn mouse_down(&mut self, button: MouseButton, x: i32, y: i32) {}
    fn mouse_moved_to(&mut self, x: i32, y: i32) {}

    fn key_down(
        &mut self,
        keycode: Option<Keycode>,
        scancode: Option<Scancode>,
        keymod: Mod,
        repeat: bool,
    ) {
    }

    fn key_up(
        &mut self,
        keycode: Option<Keycode>,
        scancode: Option<Scancode>,
        keymod: Mod,
        repeat: bool,
    ) {
    }

    fn sdl2_window(window_title: impl Into<String>) -> StartBuilder<Self> {
        StartBuilder::new(window_title.into())
    }
}

pub type DebugMessageCallback = dyn Fn(u32, u32, u32, u32, String) + Send + Sync;

pub struct StartBuilder<T: LearnGL> {
    window_title: String,
    window_width: Option<u32>,
    window_height: Option<u32>,
    gl_version: Option<(u8, u8)>,
    vsync: bool,
    app: PhantomData<T>,
    debug_message_callback: Option<Box<DebugMessageCallback>>,
}

impl<T: LearnGL> StartBuilder<T> {
    pub fn new(window_title: String) -> Self {
        StartBuilder {
            window_title,
            window_width: None,
            window_height: None,
            gl_version: None,
            vsync: true,
            app: PhantomData,
            debug_message_callback: None,
        }
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = Some(width);
        self.window_height = Some(height);
        self
    }

    pub fn gl_version(mut self, major: u8, minor: u8) -> Self {
        self.gl_version = Some((major, minor));
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Needs a GL 4.3 context (or KHR_debug) to have any effect.
    pub fn debug_message_callback(
        mut self,
        callback: impl Fn(u32, u32, u32, u32, String) + Send + Sync + 'static,
    ) -> Self {
        self.debug_message_callback = Some(Box::new(callback));
        self
    }

    /// Open the window and run the render loop until it is closed or Escape is pressed.
    pub fn start(mut self) -> Result<()> {
        time::initialize();

        let (gl_major_version, gl_minor_version) = self.gl_version.unwrap_or((3, 3));

        let sdl = sdl2::init().map_err(Error::Window)?;
        let video = sdl.video().map_err(Error::Window)?;
        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(gl_major_version, gl_minor_version);
        let window = video
            .window(
                &self.window_title,
                self.window_width.unwrap_or(800),
                self.window_height.unwrap_or(600),
            )
            .allow_highdpi()
            .opengl()
            .resizable()
            .build()
            .map_err(|e| Error::Window(e.to_string()))?;
        let gl_context = window.gl_create_context().map_err(Error::Window)?;
        window.gl_make_current(&gl_context).map_err(Error::Window)?;
        let swap_interval = if self.vsync { 1 } else { 0 };
        if let Err(e) = window.subsystem().gl_set_swap_interval(swap_interval) {
            log::warn!("cannot set swap interval: {e}");
        }

        let mut gl =
            unsafe { Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _) };
        let version = gl.version();
        let (major, minor) = (version.major, version.minor);
        log::info!(
            "OpenGL {major}.{minor} context ({}) for \"{}\"",
            version.vendor_info,
            self.window_title
        );

        if let Some(callback) = self.debug_message_callback.take() {
            if (major, minor) >= (4, 3)
                || gl.supported_extensions().contains("GL_KHR_debug")
            {
                unsafe {
                    gl.enable(DEBUG_OUTPUT);
                    gl.debug_message_callback(move |source, typ, id, severity, message| {
                        callback(source, typ, id, severity, message.to_string())
                    });
                }
            } else {
                log::warn!("debug output is not supported by this context");
            }
        }

        let gl = Rc::new(gl);
        let mut app = T::init(&gl, &window)?;
        let (width, height) = window.drawable_size();
        app.resized(&gl, width as i32, height as i32);

        let mut prev_frame = Instant::now();
        let mut running = true;
        let mut event_loop = sdl.event_pump().map_err(Error::Window)?;
        while running {
            for event in event_loop.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => running = false,
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(..),
                        ..
                    } => {
                        let (width, height) = window.drawable_size();
                        app.resized(&gl, width as i32, height as i32);
                    }
                    Event::MouseButtonUp {
                        mouse_btn, x, y, ..
                    } => app.mouse_up(mouse_btn, x, y),
                    Event::MouseButtonDown {
                        mouse_btn, x, y, ..
                    } => app.mouse_down(mouse_btn, x, y),
                    Event::MouseMotion { x, y, .. } => app.mouse_moved_to(x, y),
                    Event::KeyDown {
                        keycode,
                        scancode,
                        keymod,
                        repeat,
                        ..
                    } => app.key_down(keycode, scancode, keymod, repeat),
                    Event::KeyUp {
                        keycode,
                        scancode,
                        keymod,
                        repeat,
                        ..
                    } => app.key_up(keycode, scancode, keymod, repeat),
                    _ => {}
                }
            }

            app.display(&gl, &window);

            window.gl_swap_window();

            let now = Instant::now();
            time::end_frame(now.duration_since(prev_frame).as_secs_f32());
            prev_frame = now;
        }

        // GPU objects owned by the app are released while the context is still current.
        drop(app);
        Ok(())
    }
}
