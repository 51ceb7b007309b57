//! Holiday Whack entry point
//!
//! On the web this binds the page's DOM to the game controller and drives it
//! from requestAnimationFrame. Natively it plays one headless demo round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

    use holiday_whack::game::{Command, DisplayEvent, Game, GameView};
    use holiday_whack::leaderboard::escape_html;
    use holiday_whack::platform::{LocalStore, SystemCalendar};
    use holiday_whack::GameConfig;

    /// How long the hit sparkle stays in the hole
    const SPARKLE_MS: i32 = 500;
    /// Delay before focusing the name input (lets the modal become visible)
    const FOCUS_DELAY_MS: i32 = 100;

    /// Page bindings plus the controller
    struct App {
        game: Game<LocalStore, SystemCalendar>,
        document: Document,
        holes: Vec<Element>,
        last_view: Option<GameView>,
    }

    impl App {
        fn now() -> u64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now() as u64)
                .unwrap_or(0)
        }

        fn dispatch(&mut self, command: Command) {
            self.game.handle(command, Self::now());
            self.flush();
        }

        fn frame(&mut self, time: f64) {
            self.game.update(time as u64);
            self.flush();
        }

        /// Apply pending display events, then re-render if anything changed
        fn flush(&mut self) {
            for event in self.game.drain_events() {
                self.apply_event(event);
            }
            let view = self.game.view();
            if self.last_view.as_ref() != Some(&view) {
                self.render(&view);
                self.last_view = Some(view);
            }
        }

        fn apply_event(&self, event: DisplayEvent) {
            match event {
                DisplayEvent::HitEffect { slot } => {
                    if let Some(hole) = self.holes.get(slot) {
                        show_hit_effect(&self.document, hole);
                    }
                }
                DisplayEvent::PromptName {
                    score,
                    default_name,
                    potential_rank,
                } => {
                    set_text(&self.document, "modal-score-value", &score.to_string());
                    if let Some(input) = name_input(&self.document) {
                        input.set_value(&default_name);
                    }
                    if let Some(modal) = self.document.get_element_by_id("name-modal") {
                        let _ = modal.class_list().remove_1("hidden");
                    }
                    focus_name_input_later();
                    log::info!("Prompting for name (rank {:?})", potential_rank);
                }
                DisplayEvent::PromptClosed => {
                    if let Some(modal) = self.document.get_element_by_id("name-modal") {
                        let _ = modal.class_list().add_1("hidden");
                    }
                    if let Some(input) = name_input(&self.document) {
                        input.set_value("");
                    }
                }
                DisplayEvent::RoundEnded { score, reason } => {
                    log::info!("Round over: {} ({:?})", score, reason);
                }
                DisplayEvent::NewBest { score } => {
                    log::info!("New best: {}", score);
                }
            }
        }

        fn render(&self, view: &GameView) {
            let doc = &self.document;
            set_text(doc, "game-score", &view.score.to_string());
            set_text(doc, "game-timer", &view.time_remaining.to_string());
            set_text(doc, "game-best", &view.best_score.to_string());
            set_text(doc, "game-message", view.message.as_deref().unwrap_or(""));

            if let Some(btn) = doc
                .get_element_by_id("start-game")
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(!view.start_enabled);
                btn.set_text_content(Some(view.start_label));
            }
            if let Some(btn) = doc.get_element_by_id("stop-game") {
                let _ = btn.class_list().toggle_with_force("hidden", !view.stop_visible);
            }

            for (slot, hole) in view.slots.iter().zip(&self.holes) {
                if let Some(character) = hole.query_selector(".character").ok().flatten() {
                    character.set_class_name(&slot.css_class());
                }
            }

            if let Some(body) = doc.get_element_by_id("leaderboard-body") {
                body.set_inner_html(&leaderboard_html(view));
            }
        }
    }

    fn leaderboard_html(view: &GameView) -> String {
        if view.leaderboard.is_empty() {
            return r#"<tr class="empty-row"><td colspan="3">No scores yet - be the first!</td></tr>"#
                .to_string();
        }
        view.leaderboard
            .iter()
            .map(|row| {
                format!(
                    r#"<tr class="{}"><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    if row.highlighted { "new-entry" } else { "" },
                    row.rank_label,
                    escape_html(&row.name),
                    row.score
                )
            })
            .collect()
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn name_input(doc: &Document) -> Option<HtmlInputElement> {
        doc.get_element_by_id("player-name-input")?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn focus_name_input_later() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
                if let Some(input) = name_input(&doc) {
                    let _ = input.focus();
                }
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            FOCUS_DELAY_MS,
        );
        closure.forget();
    }

    /// Sparkle that floats up out of a hole
    fn show_hit_effect(doc: &Document, hole: &Element) {
        let Ok(sparkle) = doc.create_element("div") else {
            return;
        };
        sparkle.set_class_name("hit-sparkle");
        sparkle.set_text_content(Some("✨"));
        let _ = sparkle.set_attribute(
            "style",
            "position: absolute; top: 20%; left: 50%; transform: translateX(-50%); \
             font-size: 2rem; z-index: 10; animation: sparkleUp 0.5s ease-out forwards; \
             pointer-events: none;",
        );
        let _ = hole.append_child(&sparkle);

        if let Some(window) = web_sys::window() {
            let closure = Closure::once(move || sparkle.remove());
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                SPARKLE_MS,
            );
            closure.forget();
        }
    }

    /// Listen for both touch and mouse presses; touch must not scroll the page
    fn on_press(
        target: &Element,
        app: Rc<RefCell<App>>,
        command: impl Fn() -> Command + 'static,
    ) {
        let command = Rc::new(command);
        {
            let app = app.clone();
            let command = command.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                app.borrow_mut().dispatch(command());
            });
            let opts = web_sys::AddEventListenerOptions::new();
            opts.set_passive(false);
            let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &opts,
            );
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().dispatch(command());
            });
            let _ = target
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(
        doc: &Document,
        id: &str,
        app: Rc<RefCell<App>>,
        command: impl Fn() -> Command + 'static,
    ) {
        let Some(el) = doc.get_element_by_id(id) else {
            log::warn!("Missing #{} element", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow_mut().dispatch(command());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn submitted_name() -> Command {
        let name = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| name_input(&doc))
            .map(|input| input.value())
            .unwrap_or_default();
        Command::NameSubmitted(name)
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let (doc, holes) = {
            let a = app.borrow();
            (a.document.clone(), a.holes.clone())
        };

        // Holes
        for (index, hole) in holes.iter().enumerate() {
            let slot = hole
                .get_attribute("data-hole")
                .and_then(|s| s.parse().ok())
                .unwrap_or(index);
            on_press(hole, app.clone(), move || Command::TargetActivated(slot));
        }

        // Start / stop buttons
        for (id, command) in [
            ("start-game", Command::StartRequested),
            ("stop-game", Command::StopRequested),
        ] {
            match doc.get_element_by_id(id) {
                Some(btn) => on_press(&btn, app.clone(), move || command.clone()),
                None => log::warn!("Missing #{} element", id),
            }
        }

        // Name prompt
        on_click(&doc, "submit-score", app.clone(), submitted_name);
        on_click(&doc, "skip-score", app.clone(), || Command::NameSkipped);
        if let Some(input) = doc.get_element_by_id("player-name-input") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    app.borrow_mut().dispatch(submitted_name());
                }
            });
            let _ = input
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Holiday Whack starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let config = document
            .get_element_by_id("whack-game")
            .and_then(|root| root.get_attribute("data-config"))
            .map(|json| GameConfig::from_json(&json))
            .unwrap_or_default();

        let node_list = document.query_selector_all(".mole-hole")?;
        let holes: Vec<Element> = (0..node_list.length())
            .filter_map(|i| node_list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();
        if holes.len() != config.slot_count {
            log::warn!(
                "Page has {} holes but config expects {}",
                holes.len(),
                config.slot_count
            );
        }

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(config, LocalStore::open(), SystemCalendar, seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            document,
            holes,
            last_view: None,
        }));
        app.borrow_mut().flush();

        setup_input_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Holiday Whack running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Holiday Whack (native) starting...");
    log::info!("The playable version runs in the browser - build with `trunk serve`");

    // Optional args: seed, miss rate (0.0 - 1.0)
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);
    let miss_rate = demo::parse_miss_rate(args.next().as_deref());

    demo::play_round(seed, miss_rate);
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use holiday_whack::game::{Command, DisplayEvent, Game, RoundPhase};
    use holiday_whack::platform::{MemoryStore, SystemCalendar};
    use holiday_whack::GameConfig;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Frame period of a 60 Hz display
    const FRAME_MS: u64 = 16;
    /// Bot reaction time after a target appears
    const REACTION_MS: u64 = 250;
    /// Miss rate used when the argument is absent or unusable
    const DEFAULT_MISS_RATE: f64 = 0.3;

    /// Parse a miss-rate argument into [0, 1]. Non-finite values and
    /// garbage fall back to the default.
    pub fn parse_miss_rate(arg: Option<&str>) -> f64 {
        arg.and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|rate| rate.is_finite())
            .unwrap_or(DEFAULT_MISS_RATE)
            .clamp(0.0, 1.0)
    }

    /// Play one round with a bot that whacks targets after a short delay
    pub fn play_round(seed: u64, miss_rate: f64) {
        let mut game = Game::new(
            GameConfig::default(),
            MemoryStore::new(),
            SystemCalendar,
            seed,
        );
        let mut bot = Pcg32::seed_from_u64(seed ^ 0x5eed);
        // (slot, when it was first seen popped)
        let mut seen: Vec<Option<u64>> = vec![None; game.config().slot_count];

        let mut now = 0;
        game.handle(Command::StartRequested, now);
        while game.is_running() {
            now += FRAME_MS;
            game.update(now);

            for (slot, state) in game.slots().to_vec().iter().enumerate() {
                if !state.is_popped() {
                    seen[slot] = None;
                    continue;
                }
                let first_seen = *seen[slot].get_or_insert(now);
                if now - first_seen >= REACTION_MS {
                    seen[slot] = None;
                    if !bot.random_bool(miss_rate) {
                        game.handle(Command::TargetActivated(slot), now);
                    }
                }
            }

            for event in game.drain_events() {
                match event {
                    DisplayEvent::HitEffect { slot } => {
                        log::debug!("Hit slot {} at {}ms", slot, now)
                    }
                    DisplayEvent::PromptName { score, .. } => {
                        log::info!("Round complete with {} points", score)
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        if matches!(game.phase(), RoundPhase::AwaitingName { .. }) {
            game.handle(Command::NameSubmitted("Demo Bot".to_string()), now);
        }

        println!("Score: {}  Best: {}", game.score(), game.best_score());
        for row in game.view().leaderboard {
            println!("{:>3}  {:<12} {}", row.rank_label, row.name, row.score);
        }
    }

}
