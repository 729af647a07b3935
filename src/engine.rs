use crate::browser;
use crate::sim::collision::Rect;
use crate::sim::{Point, Size};
use anyhow::{anyhow, Context, Error, Result};
// web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use futures::future::{self, Either};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - we create the closures and know their exact signature
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use self::input::KeyState;

/// TABLE
/// ┌───────────────────── Frame Flow ───────────────────────────────────────┐
/// │                                                                        │
/// │   requestAnimationFrame ──► process_input ──► update (0..n × 60 Hz)    │
/// │                                                  │                     │
/// │                                                  ▼                     │
/// │                                     draw (&self, once per frame)       │
/// └────────────────────────────────────────────────────────────────────────┘
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, keystate: &KeyState);
    fn draw(&self, renderer: &Renderer);
}

// length of a logical frame in milliseconds
const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// after a long stall (hidden tab) only catch up this many frames
const MAX_CATCH_UP_FRAMES: f32 = 8.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut keyevent_receiver = input::prepare_input()?;
        let context = browser::context().context("GameLoop: no 2d canvas to draw on")?;

        // the uninitialized game draws its own loading frame meanwhile
        let game = Rc::new(game);
        let loading = Self::draw_while_loading(game.clone(), Renderer::new(context.clone()))?;
        let initialized = game.initialize().await;
        loading.set(false);

        let mut game = initialized?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer::new(context);
        let mut keystate = KeyState::new();

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            input::process_input(&mut keystate, &mut keyevent_receiver);

            game_loop.accumulated_delta += (perf - game_loop.last_frame) as f32;
            game_loop.accumulated_delta = game_loop
                .accumulated_delta
                .min(FRAME_SIZE * MAX_CATCH_UP_FRAMES);
            while game_loop.accumulated_delta > FRAME_SIZE {
                game.update(&keystate);
                game_loop.accumulated_delta -= FRAME_SIZE;
            }
            game_loop.last_frame = perf;
            game.draw(&renderer);

            if let Some(closure) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(closure) {
                    error!("GameLoop: could not schedule next frame : {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// Draws `game` once per animation frame until the returned flag drops
    fn draw_while_loading(game: Rc<dyn Game>, renderer: Renderer) -> Result<Rc<Cell<bool>>> {
        let loading = Rc::new(Cell::new(true));
        let still_loading = loading.clone();

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |_perf: f64| {
            if !still_loading.get() {
                return;
            }
            game.draw(&renderer);
            if let Some(closure) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(closure) {
                    error!("GameLoop: could not schedule loading frame : {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loading loop is None"))?,
        )?;
        Ok(loading)
    }
}

/// Text appearance for `Renderer::draw_text`
pub struct TextStyle<'a> {
    pub font: &'a str,
    pub color: &'a str,
    pub align: &'a str,
    /// outline color and width
    pub outline: Option<(&'a str, f64)>,
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        context.set_image_smoothing_enabled(true);
        Renderer { context }
    }

    // a failed draw call skips that element for one frame, nothing more
    fn report(result: std::result::Result<(), JsValue>) {
        if let Err(err) = result {
            error!("Renderer: draw call failed : {:#?}", err);
        }
    }

    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x,
            rect.position.y,
            rect.size.width,
            rect.size.height,
        );
    }

    pub fn save(&self) {
        self.context.save();
    }

    pub fn restore(&self) {
        self.context.restore();
    }

    pub fn translate(&self, offset: Point) {
        Self::report(self.context.translate(offset.x, offset.y));
    }

    pub fn set_glow(&self, color: &str, blur: f64) {
        self.context.set_shadow_color(color);
        self.context.set_shadow_blur(blur);
    }

    pub fn draw_line(&self, from: Point, to: Point, color: &str, width: f64) {
        self.context.set_stroke_style_str(color);
        self.context.set_line_width(width);
        self.context.begin_path();
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context.stroke();
    }

    pub fn draw_image(&self, image: &HtmlImageElement, destination: &Rect) {
        Self::report(
            self.context
                .draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    destination.position.x,
                    destination.position.y,
                    destination.size.width,
                    destination.size.height,
                ),
        );
    }

    /// Draw one `frame` of a sprite sheet, optionally facing left
    pub fn draw_sprite(
        &self,
        image: &HtmlImageElement,
        frame: &Rect,
        destination: &Rect,
        mirrored: bool,
    ) {
        self.context.save();
        let x = if mirrored {
            Self::report(self.context.scale(-1.0, 1.0));
            -(destination.position.x + destination.size.width)
        } else {
            destination.position.x
        };
        Self::report(
            self.context
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    image,
                    frame.position.x,
                    frame.position.y,
                    frame.size.width,
                    frame.size.height,
                    x,
                    destination.position.y,
                    destination.size.width,
                    destination.size.height,
                ),
        );
        self.context.restore();
    }

    /// Whole image, optionally facing left
    pub fn draw_image_facing(&self, image: &HtmlImageElement, destination: &Rect, mirrored: bool) {
        let frame = Rect::new(
            Point::default(),
            Size {
                width: f64::from(image.natural_width()),
                height: f64::from(image.natural_height()),
            },
        );
        self.draw_sprite(image, &frame, destination, mirrored);
    }

    /// Only the part of the image inside `clip` shows up
    pub fn draw_image_clipped(&self, image: &HtmlImageElement, destination: &Rect, clip: &Rect) {
        self.context.save();
        self.context.begin_path();
        self.context
            .rect(clip.position.x, clip.position.y, clip.size.width, clip.size.height);
        self.context.clip();
        self.draw_image(image, destination);
        self.context.restore();
    }

    /// Rotate around the destination center
    pub fn draw_image_rotated(&self, image: &HtmlImageElement, destination: &Rect, radians: f64) {
        let half_width = destination.size.width / 2.0;
        let half_height = destination.size.height / 2.0;
        self.context.save();
        Self::report(self.context.translate(
            destination.position.x + half_width,
            destination.position.y + half_height,
        ));
        Self::report(self.context.rotate(radians));
        self.draw_image(
            image,
            &Rect::new(
                Point {
                    x: -half_width,
                    y: -half_height,
                },
                destination.size,
            ),
        );
        self.context.restore();
    }

    pub fn draw_text(&self, text: &str, position: Point, style: &TextStyle) {
        self.context.set_font(style.font);
        self.context.set_text_align(style.align);
        if let Some((color, width)) = style.outline {
            self.context.set_stroke_style_str(color);
            self.context.set_line_width(width);
            Self::report(self.context.stroke_text(text, position.x, position.y));
        }
        self.context.set_fill_style_str(style.color);
        Self::report(self.context.fill_text(text, position.x, position.y));
    }

    pub fn fill_circle(&self, center: Point, radius: f64, color: &str, alpha: f64) {
        self.context.save();
        self.context.set_global_alpha(alpha);
        self.context.set_fill_style_str(color);
        self.context.begin_path();
        Self::report(self.context.arc(center.x, center.y, radius, 0.0, 2.0 * PI));
        self.context.fill();
        self.context.restore();
    }

    /// Square rotated around its center, `rotation` in degrees
    pub fn fill_square(&self, center: Point, side: f64, rotation: f64, color: &str, alpha: f64) {
        self.context.save();
        self.context.set_global_alpha(alpha);
        self.context.set_fill_style_str(color);
        Self::report(self.context.translate(center.x, center.y));
        Self::report(self.context.rotate(rotation.to_radians()));
        self.context.fill_rect(-side / 2.0, -side / 2.0, side, side);
        self.context.restore();
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    // images come from another origin and must stay drawable
    image.set_cross_origin(Some("anonymous"));
    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields the channel result
    // - second ? yields the image load result
    rx.await??;

    Ok(image)
}

/// `load_image` that gives up after `timeout_ms`
pub async fn load_image_with_timeout(source: &str, timeout_ms: i32) -> Result<HtmlImageElement> {
    let load = Box::pin(load_image(source));
    let timeout = Box::pin(browser::sleep(timeout_ms));

    match future::select(load, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right((timer, _)) => {
            timer?;
            Err(anyhow!("Timed out after {}ms loading {}", timeout_ms, source))
        }
    }
}

/// How many image loads have settled (loaded, failed or timed out) out of
/// how many were started. Clones share the same counters, so a loading
/// screen can read what `load_images` writes.
#[derive(Debug, Default, Clone)]
pub struct LoadProgress {
    settled: Rc<Cell<usize>>,
    total: Rc<Cell<usize>>,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, total: usize) {
        self.total.set(total);
        self.settled.set(0);
    }

    pub fn settle_one(&self) {
        self.settled
            .set((self.settled.get() + 1).min(self.total.get()));
    }

    pub fn settled(&self) -> usize {
        self.settled.get()
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    /// Rounded percentage, 0 until the total is known
    pub fn percent(&self) -> u32 {
        match self.total.get() {
            0 => 0,
            total => (self.settled.get() as f64 / total as f64 * 100.0).round() as u32,
        }
    }
}

/// Load every `(key, url)` pair concurrently. Best effort : a failed or
/// timed out image is logged and left out of the returned map.
pub async fn load_images<K>(
    sources: impl IntoIterator<Item = (K, String)>,
    timeout_ms: i32,
    progress: &LoadProgress,
) -> HashMap<K, HtmlImageElement>
where
    K: Copy + Eq + Hash + Debug,
{
    let sources: Vec<(K, String)> = sources.into_iter().collect();
    progress.begin(sources.len());

    let loads = sources.into_iter().map(|(key, url)| async move {
        let result = load_image_with_timeout(&url, timeout_ms).await;
        progress.settle_one();
        (key, url, result)
    });

    let mut images = HashMap::new();
    for (key, url, result) in future::join_all(loads).await {
        match result {
            Ok(image) => {
                images.insert(key, image);
            }
            Err(err) => error!("Skipping {:?} ({}) : {:#?}", key, url, err),
        }
    }
    images
}


pub mod input {
    use crate::browser;
    use crate::sim::Keys;
    use anyhow::{anyhow, Result};
    use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
    use std::collections::HashSet;
    use wasm_bindgen::JsCast;
    use web_sys::{Event, EventTarget, KeyboardEvent, TouchEvent};

    /// On-page buttons, each with the pseudo key code it holds down
    const TOUCH_BUTTONS: [(&str, &str); 3] = [
        ("left-button", "TouchLeft"),
        ("right-button", "TouchRight"),
        ("jump-button", "TouchJump"),
    ];
    const PRESS_EVENTS: [&str; 2] = ["touchstart", "mousedown"];
    const RELEASE_EVENTS: [&str; 4] = ["touchend", "touchcancel", "mouseup", "mouseleave"];

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum KeyPress {
        KeyDown(String),
        KeyUp(String),
    }

    /// Codes currently held, from every input source
    #[derive(Debug, Default)]
    pub struct KeyState {
        pressed_keys: HashSet<String>,
    }

    impl KeyState {
        pub fn new() -> Self {
            KeyState {
                pressed_keys: HashSet::new(),
            }
        }

        pub fn is_pressed(&self, code: &str) -> bool {
            self.pressed_keys.contains(code)
        }

        pub fn apply(&mut self, press: KeyPress) {
            match press {
                KeyPress::KeyDown(code) => {
                    self.pressed_keys.insert(code);
                }
                KeyPress::KeyUp(code) => {
                    self.pressed_keys.remove(&code);
                }
            }
        }

        /// Merge keyboard and touch into the simulation's input vector
        pub fn keys(&self) -> Keys {
            let any = |codes: &[&str]| codes.iter().any(|code| self.is_pressed(code));
            Keys {
                left: any(&["ArrowLeft", "KeyA", "TouchLeft"]),
                right: any(&["ArrowRight", "KeyD", "TouchRight"]),
                jump: any(&["Space", "TouchJump"]),
            }
        }
    }

    pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
        let (sender, receiver) = unbounded();
        let window = browser::window()?;

        let keydown_sender = sender.clone();
        let onkeydown = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
            // Space would scroll the page
            if event.code() == "Space" {
                event.prevent_default();
            }
            let _ = keydown_sender.unbounded_send(KeyPress::KeyDown(event.code()));
        }) as Box<dyn FnMut(KeyboardEvent)>);

        let keyup_sender = sender.clone();
        let onkeyup = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
            let _ = keyup_sender.unbounded_send(KeyPress::KeyUp(event.code()));
        }) as Box<dyn FnMut(KeyboardEvent)>);

        window.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
        window.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
        onkeydown.forget();
        onkeyup.forget();

        for (id, code) in TOUCH_BUTTONS {
            if let Some(element) = browser::element_by_id(id) {
                bind_button(element.unchecked_ref::<EventTarget>(), code, &sender)?;
            }
        }

        Ok(receiver)
    }

    fn bind_button(target: &EventTarget, code: &'static str, sender: &UnboundedSender<KeyPress>) -> Result<()> {
        let bindings = PRESS_EVENTS
            .iter()
            .map(|name| (*name, KeyPress::KeyDown(code.to_string())))
            .chain(
                RELEASE_EVENTS
                    .iter()
                    .map(|name| (*name, KeyPress::KeyUp(code.to_string()))),
            );

        for (name, press) in bindings {
            let sender = sender.clone();
            let listener = browser::closure_wrap(Box::new(move |event: Event| {
                if event.dyn_ref::<TouchEvent>().is_some() {
                    event.prevent_default();
                }
                let _ = sender.unbounded_send(press.clone());
            }) as Box<dyn FnMut(Event)>);
            target
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .map_err(|err| anyhow!("Could not listen to {} : {:#?}", name, err))?;
            listener.forget();
        }
        Ok(())
    }

    /// Drain every queued event into `state` without blocking
    pub fn process_input(state: &mut KeyState, receiver: &mut UnboundedReceiver<KeyPress>) {
        while let Ok(press) = receiver.try_recv() {
            state.apply(press);
        }
    }

}
