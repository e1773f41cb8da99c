//! Migration Journey entry point
//!
//! Browser builds drive the session from `requestAnimationFrame`; native
//! builds run a headless autopilot journey and print the stats report.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, PointerEvent};

    use migration_journey::consts::FRAME_MS;
    use migration_journey::sim::{Entity, GameEvent, GamePhase, Session, ShareOutcome, TickInput};
    use migration_journey::{Direction, DirectionSet};

    /// Browser game instance
    struct Game {
        session: Session,
        held: DirectionSet,
        last_time: f64,
        /// A frame callback is scheduled
        running: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(seed),
                held: DirectionSet::new(),
                last_time: 0.0,
                running: false,
            }
        }

        fn update(&mut self, time: f64) -> GamePhase {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                FRAME_MS
            };
            self.last_time = time;
            self.session.tick(&TickInput::held(self.held), dt)
        }

        fn render(&mut self, document: &Document) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::LevelStarted { .. } => rebuild_board(document, &self.session),
                    GameEvent::ResourceCollected { resource_id } => {
                        if let Some(el) = document.get_element_by_id(&format!("res-{}", resource_id)) {
                            el.remove();
                        }
                    }
                    GameEvent::Victory => render_report(document, &self.session),
                    _ => {}
                }
            }

            let size = self.session.tuning().player_size;
            if let Some(el) = document.get_element_by_id("player") {
                let _ = el.set_attribute("style", &box_style(self.session.player(), size));
            }

            let hud = self.session.hud();
            set_text(document, "hud-level", &hud.level_name);
            set_text(document, "hud-score", &format!("{} / {}", hud.score, hud.min_to_win));
            set_text(
                document,
                "hud-progress-label",
                &format!("LEVEL {}/{}", hud.level_number, hud.level_total),
            );
            if let Some(el) = document.get_element_by_id("hud-progress") {
                let _ = el.set_attribute("style", &format!("width: {}%", hud.progress * 100.0));
            }
            if let Some(el) = document.get_element_by_id("destination-lock") {
                set_hidden(&el, !hud.needs_resources);
            }

            if let Some(el) = document.get_element_by_id("message") {
                match self.session.message() {
                    Some(message) => {
                        el.set_text_content(Some(&message.text));
                        let _ = el.set_attribute("class", &format!("message {}", message.tone.as_str()));
                    }
                    None => {
                        let _ = el.set_attribute("class", "message hidden");
                    }
                }
            }

            let phase = self.session.phase();
            for (id, visible) in [
                ("start-screen", phase == GamePhase::Start),
                ("board", phase != GamePhase::Start),
                ("level-complete", phase == GamePhase::LevelComplete),
                ("victory", phase == GamePhase::Victory),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    set_hidden(&el, !visible);
                }
            }
        }
    }

    fn box_style(pos: glam::Vec2, size: f32) -> String {
        format!(
            "left: {}%; top: {}%; width: {}%; height: {}%",
            pos.x, pos.y, size, size
        )
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let _ = if hidden {
            el.class_list().add_1("hidden")
        } else {
            el.class_list().remove_1("hidden")
        };
    }

    fn rebuild_board(document: &Document, session: &Session) {
        let Some(layer) = document.get_element_by_id("entities") else {
            return;
        };
        layer.set_inner_html("");

        let level = session.level();
        if let Some(el) = document.get_element_by_id("destination") {
            let _ = el.set_attribute(
                "style",
                &box_style(level.destination, session.tuning().destination_size),
            );
        }

        let entities: Vec<&Entity> = session.resources().iter().chain(session.obstacles()).collect();
        for entity in entities {
            let Ok(el) = document.create_element("div") else {
                continue;
            };
            el.set_id(&entity.key());
            let class = match entity.kind {
                migration_journey::sim::EntityKind::Obstacle => "entity obstacle",
                migration_journey::sim::EntityKind::Resource => "entity resource",
            };
            let _ = el.set_attribute("class", class);
            let _ = el.set_attribute("style", &box_style(entity.pos, entity.size));
            let _ = layer.append_child(&el);
        }
    }

    fn render_report(document: &Document, session: &Session) {
        let Some(list) = document.get_element_by_id("stats-report") else {
            return;
        };
        let report = session.report();
        let rows: String = report
            .rows
            .iter()
            .map(|row| {
                format!(
                    "<li class=\"{}\">{}: {} resources, {} events, {}s</li>",
                    if row.highlighted { "good" } else { "warn" },
                    row.label,
                    row.resources,
                    row.events,
                    row.seconds
                )
            })
            .collect();
        list.set_inner_html(&rows);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Migration Journey starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        setup_keyboard(game.clone());
        setup_touch_controls(game.clone());
        setup_buttons(game.clone());

        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        game.borrow_mut().render(&document);

        log::info!("Migration Journey ready");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(dir) = Direction::from_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().held.press(dir);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(dir) = Direction::from_key(&event.key()) {
                    game.borrow_mut().held.release(dir);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen hold buttons feed the same direction set as the keyboard
    fn setup_touch_controls(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for (id, dir) in [
            ("btn-up", Direction::Up),
            ("btn-down", Direction::Down),
            ("btn-left", Direction::Left),
            ("btn-right", Direction::Right),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, held) in [
                ("pointerdown", true),
                ("pointerup", false),
                ("pointerleave", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    event.prevent_default();
                    game.borrow_mut().held.set(dir, held);
                });
                let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let actions: [(&str, fn(&mut Session) -> bool); 3] = [
            ("start-btn", Session::start),
            ("continue-btn", Session::continue_journey),
            ("restart-btn", Session::restart),
        ];
        for (id, action) in actions {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let accepted = action(&mut game.borrow_mut().session);
                if accepted {
                    start_loop(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for id in ["share-btn", "share-btn-victory"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let outcome = share();
                game.borrow_mut().session.share_finished(outcome);
                // The copied notice needs frames to expire on overlay screens
                start_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Invoke the platform share sheet, or copy the page URL when unavailable
    fn share() -> ShareOutcome {
        let window = web_sys::window().unwrap();
        let navigator = window.navigator();
        let href = window.location().href().unwrap_or_default();

        let can_share = js_sys::Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false);
        if can_share {
            let data = web_sys::ShareData::new();
            data.set_title("Hemispheric Immigration Journey");
            data.set_text("Can you survive the journey? Play this migration strategy game!");
            data.set_url(&href);
            let _ = navigator.share_with_data(&data);
            ShareOutcome::Shared
        } else {
            let _ = navigator.clipboard().write_text(&href);
            ShareOutcome::Copied
        }
    }

    /// Begin scheduling frames if none are pending
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
            g.last_time = 0.0;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            let phase = g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.render(&document);
            }
            // Overlay screens keep pumping until their message expires
            let keep_running = g.session.needs_frames();
            if !keep_running {
                g.running = false;
                log::info!("Loop halted ({:?})", phase);
            }
            keep_running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use migration_journey::consts::FRAME_MS;
    use migration_journey::sim::{GameEvent, GamePhase, Session, TickInput};
    use migration_journey::{LevelCatalog, Tuning};

    /// Give up on a demo journey after this many frames (~10 minutes at 60 Hz)
    const MAX_DEMO_TICKS: u64 = 60 * 60 * 10;

    /// Usage: `migration-journey [seed] [levels.json] [tuning.json]`
    pub fn run() {
        env_logger::init();
        log::info!("Migration Journey (native) starting...");

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random::<u64>);
        let catalog = args
            .next()
            .and_then(|path| load(&path, LevelCatalog::from_json))
            .unwrap_or_default();
        let tuning = args
            .next()
            .and_then(|path| load(&path, Tuning::from_json))
            .unwrap_or_default();

        let mut session = match Session::with_config(catalog, tuning, seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot build session: {}", e);
                std::process::exit(1);
            }
        };
        session.start();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut ticks = 0;
        loop {
            match session.tick(&input, FRAME_MS) {
                GamePhase::Playing => {}
                GamePhase::LevelComplete => {
                    session.continue_journey();
                }
                GamePhase::Victory => break,
                phase => {
                    log::error!("Unexpected phase {:?}", phase);
                    break;
                }
            }
            for event in session.drain_events() {
                match event {
                    GameEvent::Caught { obstacle_id } => log::info!("Caught by patrol {}", obstacle_id),
                    GameEvent::RandomEvent(e) => log::info!("{}", e.message()),
                    _ => log::debug!("{:?}", event),
                }
            }

            ticks += 1;
            if ticks >= MAX_DEMO_TICKS {
                log::warn!(
                    "Autopilot gave up on level {} after {} ticks",
                    session.level().id,
                    ticks
                );
                break;
            }
        }

        match session.report().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize report: {}", e),
        }
    }

    fn load<T, E: std::fmt::Display>(path: &str, parse: fn(&str) -> Result<T, E>) -> Option<T> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to read {}: {}", path, e);
                return None;
            }
        };
        match parse(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("{}: {}, using defaults", path, e);
                None
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
