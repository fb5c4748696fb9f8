//! Lotto Drum entry point
//!
//! Handles platform-specific initialization and runs the draw loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement};

    use lotto_drum::consts::*;
    use lotto_drum::renderer::{Color, Label, MeshSurface, Palette, RenderState, Surface};
    use lotto_drum::{DrawEvent, DrawSet, DrumMachine, Settings};

    /// App instance holding all state
    struct App {
        machine: DrumMachine,
        settings: Settings,
        render_state: Option<RenderState>,
        mesh: MeshSurface,
        canvas: HtmlCanvasElement,
        overlay: Option<CanvasRenderingContext2d>,
        rng: Pcg32,
        last_time: f64,
        dpr: f64,
        /// Sets finished in the running session, for the results list
        finished: Vec<DrawSet>,
    }

    impl App {
        fn new(seed: u64, canvas: HtmlCanvasElement, settings: Settings) -> Self {
            let width = container_width(&canvas);
            let machine = DrumMachine::new(seed, width);
            let size = Vec2::splat(machine.drum().size);
            Self {
                machine,
                settings,
                render_state: None,
                mesh: MeshSurface::new(size),
                canvas,
                overlay: None,
                rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
                last_time: 0.0,
                dpr: 1.0,
                finished: Vec::new(),
            }
        }

        /// Match canvas backing stores to the drum size
        fn layout(&mut self) {
            self.machine.resize(container_width(&self.canvas));
            let css = self.machine.drum().size;
            let px = (css as f64 * self.dpr).round().max(1.0) as u32;

            let style = format!("width:{}px;height:{}px", css, css);
            let _ = self.canvas.set_attribute("style", &style);
            self.canvas.set_width(px);
            self.canvas.set_height(px);
            if let Some(ctx) = &self.overlay {
                if let Some(labels) = ctx.canvas() {
                    let _ = labels.set_attribute("style", &style);
                    labels.set_width(px);
                    labels.set_height(px);
                }
                let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
            }
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(px, px);
            }
            self.mesh.resize(Vec2::splat(css));
        }

        fn start_draw(&mut self) {
            if self.machine.is_drawing() {
                log::debug!("Draw already running, ignoring click");
                return;
            }
            let sets: Vec<DrawSet> = (0..self.settings.set_count)
                .map(|_| DrawSet::random(&mut self.rng))
                .collect();
            self.finished.clear();
            match self.machine.start(sets, self.settings.effective_quick_mode()) {
                Ok(events) => self.handle_events(events),
                Err(e) => log::warn!("Draw rejected: {}", e),
            }
        }

        fn reset(&mut self) {
            self.machine.reset();
            self.finished.clear();
            if let Some(document) = document() {
                set_text(&document, "results", "");
            }
        }

        fn handle_events(&mut self, events: Vec<DrawEvent>) {
            for event in events {
                log::debug!("{:?}", event);
                if let DrawEvent::RoundComplete { set_index } = event {
                    let set = self
                        .machine
                        .scheduler()
                        .session()
                        .and_then(|s| s.sets().get(set_index).copied());
                    if let Some(set) = set {
                        self.finished.push(set);
                    }
                }
            }
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                TICK_MS
            };
            self.last_time = time;
            let events = self.machine.update(dt);
            self.handle_events(events);
        }

        /// Render the current frame
        fn render(&mut self) {
            self.mesh.clear();
            self.machine.render(&mut self.mesh, self.settings.is_dark());

            let palette = Palette::for_theme(self.settings.is_dark());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.mesh, palette.background) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            if let Some(ctx) = &self.overlay {
                let size = self.mesh.size();
                ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
                for label in &self.mesh.labels {
                    draw_label(ctx, label);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else {
                return;
            };

            let status = match self.machine.progress() {
                Some(p) if p.complete => format!("Done: {} set(s)", p.set_count),
                Some(p) if p.revealed_count == 0 => {
                    let wait = self.machine.next_action_in().unwrap_or(0);
                    format!(
                        "Set {}/{}: starting in {:.1} s",
                        p.set_index + 1,
                        p.set_count,
                        wait as f64 / 1000.0
                    )
                }
                Some(p) => format!(
                    "Set {}/{}: {} of {}",
                    p.set_index + 1,
                    p.set_count,
                    p.revealed_count,
                    NUMBERS_PER_DRAW
                ),
                None => "Ready".to_string(),
            };
            set_text(&document, "status", &status);

            if let Some(p) = self.machine.progress() {
                let current: Vec<String> = p.revealed.iter().map(u8::to_string).collect();
                set_text(&document, "revealed", &current.join(" "));
            }

            let results: Vec<String> = self
                .finished
                .iter()
                .enumerate()
                .map(|(i, set)| {
                    let nums: Vec<String> = set.sorted().iter().map(u8::to_string).collect();
                    format!("{}. {}", i + 1, nums.join(" "))
                })
                .collect();
            set_text(&document, "results", &results.join("\n"));

            if let Some(btn) = document.get_element_by_id("draw-button") {
                if self.machine.is_drawing() {
                    let _ = btn.set_attribute("disabled", "");
                } else {
                    let _ = btn.remove_attribute("disabled");
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Width available to the drum: the canvas container, else the canvas
    fn container_width(canvas: &HtmlCanvasElement) -> f32 {
        canvas
            .parent_element()
            .map(|p| p.client_width())
            .unwrap_or_else(|| canvas.client_width()) as f32
    }

    fn css_color(c: Color) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (c[0] * 255.0).round(),
            (c[1] * 255.0).round(),
            (c[2] * 255.0).round(),
            c[3]
        )
    }

    fn draw_label(ctx: &CanvasRenderingContext2d, label: &Label) {
        ctx.set_font(&format!("bold {}px sans-serif", label.size.round().max(1.0)));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let (x, y) = (label.pos.x as f64, label.pos.y as f64);
        if let Some(shadow) = label.shadow {
            ctx.set_fill_style_str(&css_color(shadow));
            let _ = ctx.fill_text(&label.text, x + 1.0, y + 1.0);
        }
        ctx.set_fill_style_str(&css_color(label.color));
        let _ = ctx.fill_text(&label.text, x, y);
    }

    fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map(|mq| mq.matches())
            .unwrap_or(false)
    }

    fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lotto Drum starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let mut settings = Settings::load();
        if prefers_reduced_motion() {
            settings.reduced_motion = true;
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, canvas.clone(), settings)));
        log::info!("Drum initialized with seed: {}", seed);

        {
            let mut a = app.borrow_mut();
            a.dpr = window.device_pixel_ratio();
            a.overlay = document
                .get_element_by_id("labels")
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
                .and_then(|c| c.get_context("2d").ok().flatten())
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
            if a.overlay.is_none() {
                log::warn!("No label overlay canvas; ball numbers will not be drawn");
            }
            a.layout();
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (w, h) = (canvas.width(), canvas.height());
        let render_state = RenderState::new(surface, &adapter, w, h)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        app.borrow_mut().render_state = Some(render_state);

        sync_controls(&document, &app.borrow().settings);
        setup_controls(&document, app.clone());
        setup_resize(app.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(app);

        log::info!("Lotto Drum running!");
        Ok(())
    }

    /// Reflect stored settings in the form controls
    fn sync_controls(document: &Document, settings: &Settings) {
        if let Some(el) = input(document, "set-count") {
            el.set_value(&settings.set_count.to_string());
        }
        if let Some(el) = input(document, "quick-mode") {
            el.set_checked(settings.effective_quick_mode());
            el.set_disabled(settings.reduced_motion);
        }
        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-theme", &settings.theme.as_str().to_lowercase());
        }
    }

    fn on_click(document: &Document, id: &str, mut f: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| f());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing #{}", id);
        }
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) {
        // Draw button reads the form, persists it, then starts a session
        {
            let app = app.clone();
            let doc = document.clone();
            on_click(document, "draw-button", move || {
                let mut a = app.borrow_mut();
                if let Some(el) = input(&doc, "set-count") {
                    if let Ok(count) = el.value().trim().parse::<usize>() {
                        a.settings.set_set_count(count);
                    }
                    el.set_value(&a.settings.set_count.to_string());
                }
                if let Some(el) = input(&doc, "quick-mode") {
                    a.settings.quick_mode = el.checked();
                }
                a.settings.save();
                a.start_draw();
            });
        }

        {
            let app = app.clone();
            on_click(document, "reset-button", move || {
                app.borrow_mut().reset();
                log::info!("Drum reset");
            });
        }

        {
            let doc = document.clone();
            on_click(document, "theme-button", move || {
                let mut a = app.borrow_mut();
                a.settings.theme = a.settings.theme.toggled();
                a.settings.save();
                sync_controls(&doc, &a.settings);
            });
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            if let Some(window) = web_sys::window() {
                a.dpr = window.device_pixel_ratio();
            }
            a.layout();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            draw_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn draw_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Lotto Drum failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lotto Drum (native) starting...");
    log::info!("Native mode runs one headless session - build for wasm32 for the animated drum");

    run_headless(std::env::args().nth(1).and_then(|s| s.parse().ok()));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Draw one session on the virtual clock and print the results
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seed: Option<u64>) {
    use glam::Vec2;
    use lotto_drum::consts::{MAX_DRUM_SIZE, TICK_MS};
    use lotto_drum::renderer::MeshSurface;
    use lotto_drum::{DrawEvent, DrawSet, DrumMachine, Settings};
    use rand::SeedableRng;

    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let settings = Settings::load();
    let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
    let sets: Vec<DrawSet> = (0..settings.set_count)
        .map(|_| DrawSet::random(&mut rng))
        .collect();

    let mut machine = DrumMachine::new(seed, MAX_DRUM_SIZE);
    let mut events = match machine.start(sets.clone(), settings.effective_quick_mode()) {
        Ok(events) => events,
        Err(e) => {
            log::error!("Draw rejected: {}", e);
            return;
        }
    };
    while machine.is_drawing() {
        events.extend(machine.update(TICK_MS));
    }

    for event in &events {
        if let DrawEvent::Revealed {
            set_index,
            number,
            revealed_count,
        } = event
        {
            log::info!("Set {} ball {}: {}", set_index + 1, revealed_count, number);
        }
    }
    log::info!(
        "Session finished at {} ms after {} ticks",
        machine.now_ms(),
        machine.ticks()
    );

    let mut mesh = MeshSurface::new(Vec2::splat(machine.drum().size));
    machine.render(&mut mesh, settings.is_dark());
    log::debug!(
        "Final frame: {} vertices, {} labels",
        mesh.vertices.len(),
        mesh.labels.len()
    );

    for (i, set) in sets.iter().enumerate() {
        println!("Set {}: {}", i + 1, set);
    }
}
