use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation,
};
use yew::prelude::*;

use crate::hero::{
    model_view_projection, Polyhedron, Spin, Viewport, BASE_COLOR, DETAIL, POINT_OPACITY,
    POINT_SIZE, RADIUS, WIREFRAME_OPACITY,
};
use crate::telemetry::{log_event, LogLevel};

const VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_mvp;
uniform float u_point_size;
void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    gl_PointSize = u_point_size;
}
";

const FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = u_color;
}
";

struct HeroRenderer {
    gl: Gl,
    program: WebGlProgram,
    _vertices: WebGlBuffer,
    _edges: WebGlBuffer,
    mvp_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    point_size_location: WebGlUniformLocation,
    vertex_count: i32,
    edge_index_count: i32,
    canvas: HtmlCanvasElement,
    viewport: Viewport,
    spin: Spin,
}

fn current_viewport() -> Viewport {
    let Some(win) = window() else {
        return Viewport::new(1280.0, 720.0, 1.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    Viewport::new(width, height, win.device_pixel_ratio())
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        Err(JsValue::from_str(&format!("shader compile failed: {log}")))
    }
}

fn link_program(gl: &Gl) -> Result<WebGlProgram, JsValue> {
    let vertex = compile_shader(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("unable to create program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(JsValue::from_str(&format!("program link failed: {log}")))
    }
}

fn uniform(gl: &Gl, program: &WebGlProgram, name: &str) -> Result<WebGlUniformLocation, JsValue> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| JsValue::from_str(&format!("missing uniform {name}")))
}

impl HeroRenderer {
    fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let gl: Gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("webgl2 unavailable"))?
            .dyn_into()?;

        let program = link_program(&gl)?;
        let solid = Polyhedron::icosahedron(RADIUS, DETAIL);

        let vertices = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("unable to create vertex buffer"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertices));
        let positions = js_sys::Float32Array::from(solid.flat_vertices().as_slice());
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &positions, Gl::STATIC_DRAW);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, 0, 0);

        let edges = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("unable to create index buffer"))?;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&edges));
        let indices = js_sys::Uint16Array::from(solid.flat_edges().as_slice());
        gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &indices, Gl::STATIC_DRAW);

        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        let mut renderer = Self {
            mvp_location: uniform(&gl, &program, "u_mvp")?,
            color_location: uniform(&gl, &program, "u_color")?,
            point_size_location: uniform(&gl, &program, "u_point_size")?,
            vertex_count: solid.vertices.len() as i32,
            edge_index_count: (solid.edges.len() * 2) as i32,
            gl,
            program,
            _vertices: vertices,
            _edges: edges,
            canvas,
            viewport: current_viewport(),
            spin: Spin::default(),
        };
        renderer.resize(current_viewport());
        Ok(renderer)
    }

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.buffer_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let _ = self
            .canvas
            .style()
            .set_property("width", &format!("{}px", viewport.css_width));
        let _ = self
            .canvas
            .style()
            .set_property("height", &format!("{}px", viewport.css_height));
        self.gl.viewport(0, 0, width as i32, height as i32);
        self.viewport = viewport;
    }

    fn frame(&mut self) {
        self.spin.advance();

        let gl = &self.gl;
        let mvp = model_view_projection(self.spin, self.viewport.aspect());
        let [r, g, b] = BASE_COLOR;
        let ratio = self.viewport.pixel_ratio as f32;

        gl.clear(Gl::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, &mvp);
        gl.uniform1f(Some(&self.point_size_location), POINT_SIZE * ratio);

        gl.uniform4f(Some(&self.color_location), r, g, b, WIREFRAME_OPACITY);
        gl.draw_elements_with_i32(Gl::LINES, self.edge_index_count, Gl::UNSIGNED_SHORT, 0);

        gl.uniform4f(Some(&self.color_location), r, g, b, POINT_OPACITY);
        gl.draw_arrays(Gl::POINTS, 0, self.vertex_count);
    }
}

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

fn schedule_frame(renderer: Rc<RefCell<HeroRenderer>>, slot: FrameSlot) {
    let next_slot = slot.clone();
    let handle = request_animation_frame(move |_| {
        next_slot.borrow_mut().take();
        renderer.borrow_mut().frame();
        schedule_frame(renderer, next_slot);
    });
    *slot.borrow_mut() = Some(handle);
}

/// Full-viewport canvas with the rotating wireframe solid.
#[function_component(HeroBackground)]
pub fn hero_background() -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with((), move |_| {
            let slot: FrameSlot = Rc::new(RefCell::new(None));
            let mut resize_listener = None;

            match canvas_ref.cast::<HtmlCanvasElement>().map(HeroRenderer::new) {
                Some(Ok(renderer)) => {
                    let renderer = Rc::new(RefCell::new(renderer));
                    if let Some(win) = window() {
                        let renderer = renderer.clone();
                        resize_listener = Some(EventListener::new(&win, "resize", move |_| {
                            renderer.borrow_mut().resize(current_viewport());
                        }));
                    }
                    schedule_frame(renderer, slot.clone());
                }
                Some(Err(err)) => {
                    log_event(
                        LogLevel::Warn,
                        "hero_renderer_unavailable",
                        json!({ "error": err.as_string().unwrap_or_else(|| format!("{err:?}")) }),
                    );
                }
                None => {}
            }

            move || {
                slot.borrow_mut().take();
                drop(resize_listener);
            }
        });
    }

    html! {
        <canvas id="hero-canvas" class="hero-canvas" ref={canvas_ref} aria-hidden="true"></canvas>
    }
}
