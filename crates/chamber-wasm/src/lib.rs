use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Once;

use chamber_core::render::PointVertex;
use chamber_core::{AnimationDriver, ChamberConfig, HoldOptions, HolographicChamber, Hsla, RenderTarget};
use glam::Vec2;
use tracing::{info, warn, Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// One formatted tracing event, handed to the browser console on drop.
struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }

    /// Buffered event text without the trailing newline, if any.
    fn line(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.buf);
        let text = text.trim_end();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn is_warning(&self) -> bool {
        self.level <= Level::WARN
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.line() else { return };
        let message = JsValue::from_str(&line);
        if self.is_warning() {
            web_sys::console::warn_1(&message);
        } else {
            web_sys::console::log_1(&message);
        }
    }
}

struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter::new(*meta.level())
    }
}

static LOGGING: Once = Once::new();

/// Route the chamber's tracing output to the browser console.
fn init_tracing() {
    LOGGING.call_once(|| {
        // no system clock on wasm32-unknown-unknown
        let installed = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_writer(Console)
            .without_time()
            .with_target(false)
            .try_init();
        if installed.is_err() {
            web_sys::console::warn_1(&"tracing subscriber already installed".into());
        }
    });
}

/// [`RenderTarget`] backed by a 2D canvas context.
struct Canvas2d {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
    }
}

impl RenderTarget for Canvas2d {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla) {
        if self.circle_path(center, radius) {
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Hsla) {
        if self.circle_path(center, radius) {
            self.ctx.set_line_width(line_width as f64);
            self.ctx.set_stroke_style_str(&color.css());
            self.ctx.stroke();
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Hsla) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.stroke();
    }
}

struct ChamberState {
    chamber: HolographicChamber,
    canvas: Canvas2d,
    vertices: Vec<PointVertex>,
}

thread_local! {
    /// The chamber bound to each canvas started so far.
    static ACTIVE: RefCell<Vec<(HtmlCanvasElement, ChamberHandle)>> = RefCell::new(Vec::new());
}

/// Start the chamber on `canvas`. Calling it again with the same canvas
/// returns the chamber already running there.
#[wasm_bindgen]
pub fn start_holographic_chamber(canvas: HtmlCanvasElement) -> Option<ChamberHandle> {
    init_tracing();
    start(canvas, ChamberConfig::default())
}

/// Like [`start_holographic_chamber`] with a JSON configuration. A config
/// that does not parse falls back to the defaults.
#[wasm_bindgen]
pub fn start_holographic_chamber_with_config(canvas: HtmlCanvasElement, config_json: &str) -> Option<ChamberHandle> {
    init_tracing();
    let config = ChamberConfig::from_json(config_json).unwrap_or_else(|e| {
        warn!(error = %e, "chamber config rejected, using defaults");
        ChamberConfig::default()
    });
    start(canvas, config)
}

/// A chamber needs both a usable canvas size and a surface to draw on.
fn build<T: RenderTarget>(
    width: u32,
    height: u32,
    config: ChamberConfig,
    surface: Option<T>,
) -> Option<(HolographicChamber, T)> {
    let Some(surface) = surface else {
        warn!("holographic chamber not started: no 2d context");
        return None;
    };
    match HolographicChamber::new(width as f32, height as f32, config) {
        Ok(chamber) => Some((chamber, surface)),
        Err(e) => {
            warn!(error = %e, "holographic chamber not started");
            None
        }
    }
}

fn start(canvas: HtmlCanvasElement, config: ChamberConfig) -> Option<ChamberHandle> {
    let existing = ACTIVE.with(|active| {
        active
            .borrow()
            .iter()
            .find(|(c, _)| js_sys::Object::is(c, &canvas))
            .map(|(_, handle)| handle.clone())
    });
    if existing.is_some() {
        return existing;
    }

    let surface = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .map(|ctx| Canvas2d { ctx });
    let (mut chamber, canvas2d) = build(canvas.width(), canvas.height(), config, surface)?;
    chamber.set_epoch_origin(js_sys::Date::now());
    info!(particles = chamber.particles().len(), "holographic chamber started");

    let handle = ChamberHandle {
        state: Rc::new(RefCell::new(ChamberState {
            chamber,
            canvas: canvas2d,
            vertices: Vec::new(),
        })),
    };
    ACTIVE.with(|active| active.borrow_mut().push((canvas, handle.clone())));
    Some(handle)
}

#[wasm_bindgen]
#[derive(Clone)]
pub struct ChamberHandle {
    state: Rc<RefCell<ChamberState>>,
}

#[wasm_bindgen]
impl ChamberHandle {
    #[wasm_bindgen]
    pub fn set_mode(&self, mode: &str) {
        self.state.borrow_mut().chamber.set_mode(mode);
    }

    #[wasm_bindgen]
    pub fn morph_to_formation(&self, formation: &str) {
        self.state.borrow_mut().chamber.morph_to_formation(formation);
    }

    #[wasm_bindgen]
    pub fn morph_to_formation_with_hold(&self, formation: &str, hold_ms: f64, post_drift_ms: f64) {
        let options = HoldOptions {
            hold_ms,
            post_drift_ms,
        };
        self.state
            .borrow_mut()
            .chamber
            .morph_to_formation_with_hold(formation, options);
    }

    /// `{ "name": ..., "properties": { ... } }`
    #[wasm_bindgen]
    pub fn create_mathematical_shape(&self, payload_json: &str) {
        self.state
            .borrow_mut()
            .chamber
            .create_mathematical_shape_json(payload_json);
    }

    #[wasm_bindgen]
    pub fn start_shape_rotation(&self) {
        self.state.borrow_mut().chamber.start_shape_rotation();
    }

    #[wasm_bindgen]
    pub fn resize(&self, width: f32, height: f32) {
        self.state.borrow_mut().chamber.resize(width, height);
    }

    #[wasm_bindgen]
    pub fn on_pointer_move(&self, x: f32, y: f32) {
        self.state.borrow_mut().chamber.on_pointer_move(x, y);
    }

    #[wasm_bindgen]
    pub fn on_pointer_leave(&self) {
        self.state.borrow_mut().chamber.on_pointer_leave();
    }

    #[wasm_bindgen]
    pub fn spawn_energy_wave(&self, x: f32, y: f32) {
        self.state.borrow_mut().chamber.spawn_energy_wave(x, y);
    }

    #[wasm_bindgen]
    pub fn spawn_magnetic_field(&self, x: f32, y: f32, strength: f32) {
        self.state.borrow_mut().chamber.spawn_magnetic_field(x, y, strength);
    }

    #[wasm_bindgen]
    pub fn spawn_lightning(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.state
            .borrow_mut()
            .chamber
            .spawn_lightning(Vec2::new(x1, y1), Vec2::new(x2, y2));
    }

    /// Advance one animation frame and draw it. Returns the time spent in ms.
    #[wasm_bindgen]
    pub fn frame(&self, dt_ms: f64) -> f32 {
        let start = js_sys::Date::now();
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.chamber.tick(dt_ms);
        state.chamber.render(&mut state.canvas);
        state.chamber.pack_vertices(&mut state.vertices);
        (js_sys::Date::now() - start) as f32
    }

    #[wasm_bindgen]
    pub fn status_json(&self) -> String {
        self.state.borrow().chamber.status().to_json()
    }

    #[wasm_bindgen]
    pub fn coherence(&self) -> f32 {
        self.state.borrow().chamber.status().coherence
    }

    #[wasm_bindgen]
    pub fn energy(&self) -> f32 {
        self.state.borrow().chamber.status().energy
    }

    #[wasm_bindgen]
    pub fn mode(&self) -> String {
        self.state.borrow().chamber.mode().name().to_string()
    }

    #[wasm_bindgen]
    pub fn formation(&self) -> String {
        self.state.borrow().chamber.current_formation().name().to_string()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.state.borrow().chamber.particles().len()
    }

    /// Pointer to the packed [`PointVertex`] buffer written by the last frame.
    #[wasm_bindgen]
    pub fn vertex_buffer_ptr(&self) -> *const f32 {
        let state = self.state.borrow();
        let floats: &[f32] = bytemuck::cast_slice(&state.vertices);
        floats.as_ptr()
    }

    #[wasm_bindgen]
    pub fn vertex_buffer_byte_length(&self) -> usize {
        bytemuck::cast_slice::<PointVertex, u8>(&self.state.borrow().vertices).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_core::render::Recorder;
    use std::io::Write;

    #[test]
    fn test_build_needs_a_surface() {
        assert!(build::<Recorder>(800, 600, ChamberConfig::default(), None).is_none());
        assert!(build(0, 600, ChamberConfig::default(), Some(Recorder::default())).is_none());
        let (chamber, _) = build(800, 600, ChamberConfig::default(), Some(Recorder::default())).unwrap();
        assert_eq!(chamber.particles().len(), 150);
    }

    #[test]
    fn test_console_writer_buffers_one_event() {
        let mut w = ConsoleWriter::new(Level::WARN);
        write!(w, "WARN ignoring mode change").unwrap();
        writeln!(w, " error=unknown mode").unwrap();
        assert_eq!(w.line().as_deref(), Some("WARN ignoring mode change error=unknown mode"));
        assert!(w.is_warning());
        // nothing reaches the console for an empty event
        w.buf.clear();
        assert_eq!(w.line(), None);
    }

    #[test]
    fn test_only_warnings_and_errors_go_to_console_warn() {
        assert!(ConsoleWriter::new(Level::ERROR).is_warning());
        assert!(!ConsoleWriter::new(Level::INFO).is_warning());
        assert!(!ConsoleWriter::new(Level::DEBUG).is_warning());
    }
}
