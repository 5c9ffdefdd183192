//! Motion Track entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, HtmlSelectElement};

    use motion_track::sim::{Controller, FrameOutcome, FrameTicket, Level};
    use motion_track::{GraphKind, Settings};

    /// App instance holding all state
    struct App {
        controller: Controller,
        settings: Settings,
        /// requestAnimationFrame id of the scheduled frame
        raf_id: Option<i32>,
    }

    impl App {
        fn new(settings: Settings) -> Self {
            Self {
                controller: settings.start_session(),
                settings,
                raf_id: None,
            }
        }

        /// Drop the browser-side callback (the controller has already
        /// invalidated its ticket)
        fn cancel_frame(&mut self) {
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }

        fn document() -> Option<Document> {
            web_sys::window()?.document()
        }

        /// Update dashboard values and visibility in the DOM
        fn update_hud(&self) {
            let Some(document) = Self::document() else { return };
            let r = self.controller.readout();
            let level = self.controller.level();

            let cards = [
                ("time", r.time, true),
                ("distance", r.distance, true),
                ("displacement", r.displacement, level.shows_displacement()),
                ("speed", r.speed, level.shows_speed()),
                ("velocity", r.velocity, level.shows_displacement()),
                ("average-speed", r.average_speed, level.shows_speed()),
                ("average-velocity", r.average_velocity, level.shows_displacement()),
            ];
            for (id, value, visible) in cards {
                if let Some(card) = document.get_element_by_id(&format!("card-{}", id)) {
                    let _ = card.class_list().toggle_with_force("hidden", !visible);
                }
                if let Some(el) = document
                    .query_selector(&format!("#card-{} .card-value", id))
                    .ok()
                    .flatten()
                {
                    el.set_text_content(Some(&format!("{:.1}", value)));
                }
            }

            if let Some(btn) = document.get_element_by_id("play-btn") {
                let _ = btn.class_list().toggle_with_force("playing", r.moving);
            }

            // Vehicle and track overlays, as percentages of the track
            if let Some(el) = document.get_element_by_id("vehicle") {
                let left = r.track_fraction(r.position) * 100.0;
                let _ = el.set_attribute("style", &format!("left: {:.2}%", left));
            }
            if let Some(el) = document.get_element_by_id("traveled") {
                let (start, width) = r.traveled_span();
                let _ = el.set_attribute(
                    "style",
                    &format!("left: {:.2}%; width: {:.2}%", start * 100.0, width * 100.0),
                );
            }
            if let Some(el) = document.get_element_by_id("displacement-bar") {
                let (start, width) = r.displacement_span();
                let _ = el.class_list().toggle_with_force("hidden", !level.shows_displacement());
                let _ = el.set_attribute(
                    "style",
                    &format!("left: {:.2}%; width: {:.2}%", start * 100.0, width * 100.0),
                );
            }

            // Keep sliders in step with clamped / auto-stopped values
            if let Some(input) = input_by_id(&document, "velocity-slider") {
                input.set_value_as_number(r.velocity);
            }
            if let Some(input) = input_by_id(&document, "position-slider") {
                input.set_value_as_number(r.position);
            }

            self.publish_series(&document);
        }

        /// Hand chart data to the external chart renderer via data attributes
        fn publish_series(&self, document: &Document) {
            let state = self.controller.state();
            let initial = self.controller.profile().initial_position;
            let level = self.controller.level();

            for kind in [GraphKind::Distance, GraphKind::Displacement, GraphKind::Velocity] {
                let Some(el) = document.get_element_by_id(&format!("graph-{}", kind.as_str()))
                else {
                    continue;
                };
                let shown = level.graphs().contains(&kind);
                let _ = el.class_list().toggle_with_force("hidden", !shown);
                if !shown {
                    continue;
                }
                if let Ok(json) = serde_json::to_string(&kind.series(state.history(), initial)) {
                    let _ = el.set_attribute("data-series", &json);
                }
            }
        }

        /// Reconfigure level-dependent controls
        fn apply_level_controls(&self) {
            let Some(document) = Self::document() else { return };
            let level = self.controller.level();
            let profile = level.profile();

            if let Some(input) = input_by_id(&document, "velocity-slider") {
                input.set_min(&profile.vel_min.to_string());
                input.set_max(&profile.vel_max.to_string());
            }
            if let Some(input) = input_by_id(&document, "position-slider") {
                input.set_min(&profile.track_min.to_string());
                input.set_max(&profile.track_max.to_string());
            }
            if let Some(el) = document.get_element_by_id("position-control") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !level.allows_position_edit());
            }
            if let Some(el) = document.get_element_by_id("level-description") {
                el.set_text_content(Some(profile.description));
            }
        }

        fn apply_language(&self) {
            if let Some(root) = Self::document().and_then(|d| d.document_element()) {
                let _ = root.set_attribute("lang", self.settings.language.as_str());
            }
        }
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Motion Track starting...");

        let settings = Settings::default();
        let app = Rc::new(RefCell::new(App::new(settings)));
        {
            let a = app.borrow();
            a.apply_language();
            a.apply_level_controls();
            a.update_hud();
        }

        setup_controls(app.clone());
        setup_level_select(app.clone());
        setup_language_buttons(app);

        log::info!("Motion Track running!");
    }

    /// Schedule the next frame if the controller wants one
    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(ticket) = app.borrow_mut().controller.request_frame() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(handle, ticket, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            app.borrow_mut().raf_id = Some(id);
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, ticket: FrameTicket, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.raf_id = None;
            let outcome = a.controller.on_frame(ticket, time);
            match outcome {
                FrameOutcome::Stale => return,
                FrameOutcome::Advanced { sampled: false }
                | FrameOutcome::Primed
                | FrameOutcome::Skipped => {}
                FrameOutcome::Advanced { sampled: true } | FrameOutcome::BoundaryStop => {
                    a.update_hud()
                }
            }
        }

        request_animation_frame(app);
    }

    /// Run a controller edit, then resync the frame loop and HUD
    fn with_app(app: &Rc<RefCell<App>>, edit: impl FnOnce(&mut App)) {
        {
            let mut a = app.borrow_mut();
            edit(&mut a);
            if !a.controller.is_moving() {
                a.cancel_frame();
            }
            a.update_hud();
        }
        request_animation_frame(app.clone());
    }

    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, edit: fn(&mut App)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                with_app(&app, edit);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_slider(document: &Document, id: &str, app: Rc<RefCell<App>>, edit: fn(&mut App, f64)) {
        if let Some(input) = input_by_id(document, id) {
            let source = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = source.value_as_number();
                if value.is_finite() {
                    with_app(&app, |a| edit(a, value));
                }
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let document = App::document().expect("no document");

        on_click(&document, "play-btn", app.clone(), |a| {
            a.controller.toggle_play_pause();
        });
        on_click(&document, "reset-btn", app.clone(), |a| {
            a.cancel_frame();
            a.controller.reset();
        });
        on_slider(&document, "velocity-slider", app.clone(), |a, v| {
            a.controller.set_velocity(v);
        });
        on_slider(&document, "position-slider", app, |a, x| {
            a.controller.set_position(x);
        });
    }

    fn setup_level_select(app: Rc<RefCell<App>>) {
        let document = App::document().expect("no document");
        let Some(select) = document
            .get_element_by_id("level-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        select.set_value(app.borrow().controller.level().as_str());

        let source = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(level) = Level::from_str(&source.value()) else {
                log::warn!("Unknown level: {}", source.value());
                return;
            };
            with_app(&app, |a| {
                a.cancel_frame();
                a.controller.set_level(level);
                a.settings.level = level;
                a.apply_level_controls();
            });
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_language_buttons(app: Rc<RefCell<App>>) {
        let document = App::document().expect("no document");
        on_click(&document, "lang-btn", app, |a| {
            a.settings.language = a.settings.language.toggled();
            a.apply_language();
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use motion_track::Settings;
    use motion_track::sim::Level;

    env_logger::init();
    log::info!("Motion Track (native) starting...");

    let level = std::env::args()
        .nth(1)
        .and_then(|arg| Level::from_str(&arg))
        .unwrap_or(Level::Level2);

    let settings = Settings {
        level,
        ..Default::default()
    };
    let mut controller = settings.start_session();
    run_headless(&mut controller);

    match serde_json::to_string_pretty(&controller.readout()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize readout: {}", e),
    }
    println!("history samples: {}", controller.state().history().len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session at 60 fps: drive forward, reverse, then stop
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(controller: &mut motion_track::sim::Controller) {
    const FRAME_MS: f64 = 1000.0 / 60.0;
    let mut now = 0.0;
    let mut drive = |controller: &mut motion_track::sim::Controller, seconds: f64| {
        let frames = (seconds * 1000.0 / FRAME_MS).round() as usize;
        for _ in 0..frames {
            let Some(ticket) = controller.request_frame() else {
                break;
            };
            controller.on_frame(ticket, now);
            now += FRAME_MS;
        }
    };

    let profile = controller.profile();
    controller.set_velocity(profile.vel_max / 2.0);
    controller.play();
    drive(controller, 3.0);

    controller.set_velocity(profile.vel_min / 2.0);
    if !controller.is_moving() {
        controller.play();
    }
    drive(controller, 2.0);

    if controller.level().allows_position_edit() {
        controller.set_position(profile.initial_position);
    }
    controller.pause();
    log::info!("Headless run finished at t={:.2}s", controller.state().time);
}
