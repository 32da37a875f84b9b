//! Cube Runner entry point
//!
//! On the web: runs the game in a canvas. Natively: exports the synthesized
//! sounds as WAV files.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement};

    use cube_runner::audio::{AudioDirector, AudioSink, SoundBank, WebAudioSink};
    use cube_runner::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use cube_runner::platform::{FrameClock, InputEvent};
    use cube_runner::renderer::draw::rgba;
    use cube_runner::renderer::{DrawCmd, RenderState, TextAlign, tessellate};
    use cube_runner::{FrameOutcome, Game, Settings};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Browser-side state around the game
    struct Host {
        game: Game,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        document: Document,
        pacing: FrameClock,
        /// Inputs collected since the last frame
        pending: Vec<InputEvent>,
        /// Reused HUD text elements
        labels: Vec<Element>,
        blurred: bool,
        quit: bool,
    }

    impl Host {
        fn render(&mut self, cmds: &[DrawCmd]) {
            let clear = rgba(self.game.session().background.color(), 1.0);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&tessellate(cmds), clear) {
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
        }

        /// Mirror text commands into positioned DOM labels over the canvas
        fn update_hud(&mut self, cmds: &[DrawCmd]) {
            let Some(hud) = self.document.get_element_by_id("hud") else {
                return;
            };

            // Same letterboxing as the GPU pass, in CSS pixels
            let w = self.canvas.client_width() as f32;
            let h = self.canvas.client_height() as f32;
            let scale = (w / SCREEN_WIDTH).min(h / SCREEN_HEIGHT);
            let offset_x = (w - SCREEN_WIDTH * scale) / 2.0;
            let offset_y = (h - SCREEN_HEIGHT * scale) / 2.0;

            let mut used = 0;
            for cmd in cmds {
                let DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                    align,
                } = cmd
                else {
                    continue;
                };

                if used == self.labels.len() {
                    let Ok(el) = self.document.create_element("div") else {
                        return;
                    };
                    if hud.append_child(&el).is_err() {
                        return;
                    }
                    self.labels.push(el);
                }
                let el = &self.labels[used];
                used += 1;

                let translate = match align {
                    TextAlign::Left => "none",
                    TextAlign::Center => "translateX(-50%)",
                };
                let style = format!(
                    "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;\
                     color:rgba({},{},{},{});transform:{};white-space:nowrap;",
                    offset_x + pos.x * scale,
                    offset_y + pos.y * scale,
                    size * scale,
                    (color[0] * 255.0) as u8,
                    (color[1] * 255.0) as u8,
                    (color[2] * 255.0) as u8,
                    color[3],
                    translate,
                );
                let _ = el.set_attribute("style", &style);
                if el.text_content().as_deref() != Some(text.as_str()) {
                    el.set_text_content(Some(text));
                }
            }

            for el in &self.labels[used..] {
                let _ = el.set_attribute("style", "display:none");
            }

            if let Some(el) = self.document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.game.fps().to_string()));
            }
            if let Some(el) = self.document.get_element_by_id("hud-fps") {
                let class = if self.game.settings().show_fps {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Mute or restore audio around focus changes
        fn set_blurred(&mut self, blurred: bool) {
            if self.blurred == blurred || !self.game.settings().mute_on_blur {
                return;
            }
            self.blurred = blurred;
            let mut settings = self.game.settings().clone();
            settings.muted |= blurred;
            self.game.audio_mut().apply_settings(&settings);
            log::info!("Audio {} (focus change)", if blurred { "muted" } else { "restored" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cube Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Audio is optional; the game runs silently without it
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let bank = SoundBank::synthesize(settings.music_style, &mut Pcg32::seed_from_u64(seed));
        let sink: Option<Box<dyn AudioSink>> = match WebAudioSink::new() {
            Ok(sink) => Some(Box::new(sink)),
            Err(e) => {
                log::warn!("{} - audio disabled", e);
                None
            }
        };
        let audio = AudioDirector::new(bank, sink);
        let game = Game::new(seed, audio, settings);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .expect("Failed to create device");

        let host = Rc::new(RefCell::new(Host {
            game,
            render_state: Some(render_state),
            canvas,
            document: document.clone(),
            pacing: FrameClock::new(),
            pending: Vec::new(),
            labels: Vec::new(),
            blurred: false,
            quit: false,
        }));

        setup_input_handlers(host.clone());
        setup_focus_handlers(host.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        host.borrow_mut().game.start(js_sys::Date::now());

        // Start game loop
        request_animation_frame(host);

        log::info!("Cube Runner running!");
    }

    fn setup_input_handlers(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let Some(input) = InputEvent::from_key(&event.key()) else {
                return;
            };
            // Keep Space/ArrowUp from scrolling the page
            event.prevent_default();
            if event.repeat() {
                return;
            }
            let mut h = host.borrow_mut();
            // First key press unlocks browser audio
            h.game.audio_mut().resume();
            h.pending.push(input);
        });
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_handlers(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let document = host.borrow().document.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                host.borrow_mut().set_blurred(hidden);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                host.borrow_mut().set_blurred(true);
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                host.borrow_mut().set_blurred(false);
            });
            let _ = window
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            let dt = h.pacing.delta(time);
            let events = std::mem::take(&mut h.pending);

            // The beat clock runs on wall time like the game start
            let now = js_sys::Date::now();
            match h.game.frame(now, dt, &events) {
                FrameOutcome::Continue(cmds) => {
                    h.render(&cmds);
                    h.update_hud(&cmds);
                }
                FrameOutcome::Quit => {
                    h.quit = true;
                    h.render_state = None;
                    if let Some(hud) = h.document.get_element_by_id("hud") {
                        let _ = hud.set_attribute("class", "hidden");
                    }
                    if let Some(el) = h.document.get_element_by_id("quit-message") {
                        let _ = el.set_attribute("class", "");
                    }
                    log::info!("Cube Runner stopped");
                }
            }
            if h.quit {
                return;
            }
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use cube_runner::audio::wav::{load_or_synthesize, save_wav};
    use cube_runner::audio::{MusicStyle, SoundEffect, sounds};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Cube Runner (native) starting...");
    log::info!("Native mode exports sounds only - run with `trunk serve` for the game");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut rng = Pcg32::seed_from_u64(seed);
    let dir = Path::new("sounds");

    for effect in SoundEffect::ALL {
        let samples = match effect {
            SoundEffect::Jump => sounds::jump_sound(),
            SoundEffect::Crash => sounds::crash_sound(&mut rng),
            SoundEffect::SpeedUp => sounds::speed_up_sound(),
        };
        let path = dir.join(format!("{}.wav", effect.name()));
        match save_wav(&path, &samples) {
            Ok(()) => log::info!("Wrote {} ({} samples)", path.display(), samples.len()),
            Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
        }
    }

    for (style, file) in [
        (MusicStyle::Classic, "music_loop.wav"),
        (MusicStyle::Dash, "music_loop_dash.wav"),
    ] {
        let music = load_or_synthesize(&dir.join(file), || sounds::music_loop(style, &mut rng));
        log::info!(
            "{:?} music loop ready: {:.1}s",
            style,
            music.len() as f32 / cube_runner::audio::synth::SAMPLE_RATE as f32
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
