use crate::assets::{self, AssetName, Assets};
use crate::config::animation::{BIG_SPRITE_THRESHOLD, CUP_FALL_FRAMES};
use crate::config::game::*;
use crate::confetti::{self, ConfettiParticle, Shape};
use crate::engine::input::KeyState;
use crate::engine::{Game, LoadProgress, Renderer, TextStyle};
use crate::hud;
use crate::sim::collision::Rect;
use crate::sim::{CupAnimation, Mode, Point, Rookie, RookieContext, Size, TransformationPhase};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f64::consts::PI;
use web_sys::HtmlImageElement;

/// TABLE
/// ┌───────────────────── Game Architecture Overview ────────────────────────┐
/// │                                                                         │
/// │    ┌─────────────┐          ┌─────────────┐          ┌─────────────┐    │
/// │    │  engine.rs  │   keys   │   game.rs   │   Keys   │   sim/      │    │
/// │    │  GameLoop   ├─────────►│ RookieGame  ├─────────►│   Rookie    │    │
/// │    │  KeyState   │          │  update()   │          │  update()   │    │
/// │    └──────┬──────┘          └──────┬──────┘          └──────┬──────┘    │
/// │           │                        │ milestones             │           │
/// │           │ draw                   ▼ (console log)          │ context   │
/// │           └─────────────────► Playground::draw ◄────────────┘           │
/// │                                                                         │
/// ├──────────────────────── Draw Order ─────────────────────────────────────┤
/// │  clear ─► shake ─► ground ─► box ─► cup ─► player ─► restore ─► HUD     │
/// │                                                    └─► confetti         │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum RookieGame {
    /// Manifest and images are still on their way
    Loading(LoadProgress),

    /// Simulation running with whatever images arrived
    Loaded(Playground),
}

impl RookieGame {
    pub fn new() -> Self {
        RookieGame::Loading(LoadProgress::new())
    }
}

impl Default for RookieGame {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for RookieGame {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            RookieGame::Loading(progress) => {
                let manifest = assets::load_manifest().await;
                let assets = Assets::load(&manifest, progress).await;
                log!(
                    "Loaded {} of {} images",
                    assets.len(),
                    manifest.images.len()
                );
                Ok(Box::new(RookieGame::Loaded(Playground::new(assets))))
            }
            RookieGame::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        if let RookieGame::Loaded(playground) = self {
            let before = *playground.rookie.context();
            let before_mode = playground.rookie.mode();
            playground.rookie.update(&keystate.keys());
            log_milestones(&before, before_mode, &playground.rookie);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        match self {
            RookieGame::Loading(progress) => draw_loading(renderer, progress),
            RookieGame::Loaded(playground) => playground.draw(renderer),
        }
    }
}

fn draw_loading(renderer: &Renderer, progress: &LoadProgress) {
    renderer.clear(&Rect::new(Point::default(), canvas_size()));
    let x = CANVAS_WIDTH / 2.0;
    let percent = progress.percent();

    renderer.draw_text(hud::LOADING_TITLE, Point { x, y: 120.0 }, &TITLE);
    renderer.draw_text(hud::LOADING_TEXT, Point { x, y: 180.0 }, &SUBTITLE);
    for (row, line) in hud::loading_bar(percent).iter().enumerate() {
        renderer.draw_text(
            line,
            Point {
                x,
                y: 230.0 + row as f64 * 20.0,
            },
            &LOADING_BAR,
        );
    }
    renderer.draw_text(&format!("{}%", percent), Point { x, y: 330.0 }, &TITLE);
    renderer.draw_text(hud::LOADING_STATUS, Point { x, y: 380.0 }, &INSTRUCTION);
}

fn log_milestones(before: &RookieContext, before_mode: Mode, rookie: &Rookie) {
    let after = rookie.context();
    if after.box_hits > before.box_hits {
        log!("Box hit {}/{}", after.box_hits, BOX_HITS_FOR_CUP);
        if after.is_wall() {
            log!("Box became a wall, the cup is rising");
        }
    }
    if after.cup.animation == CupAnimation::Landed && before.cup.animation != CupAnimation::Landed {
        log!(
            "Cup landed at ({:.0}, {:.0})",
            after.cup.position.x,
            after.cup.position.y
        );
    }
    match (before_mode, rookie.mode()) {
        (Mode::Normal, Mode::Drinking) => log!("Drinking started"),
        (Mode::Drinking, Mode::Transforming) => log!("Transformation started"),
        (Mode::Transforming, Mode::Normal) => log!("Transformation complete"),
        _ => {}
    }
}

// ==================== Text Styles ====================
const GOLD: &str = "#FFD700";
const TITLE: TextStyle<'static> = TextStyle {
    font: "bold 36px VT323, monospace",
    color: "#000",
    align: "center",
    outline: None,
};
const SUBTITLE: TextStyle<'static> = TextStyle {
    font: "bold 22px VT323, monospace",
    color: "#000",
    align: "center",
    outline: None,
};
const INSTRUCTION: TextStyle<'static> = TextStyle {
    font: "bold 18px VT323, monospace",
    color: "#000",
    align: "center",
    outline: None,
};
const LOADING_BAR: TextStyle<'static> = TextStyle {
    font: "18px monospace",
    color: "#000",
    align: "center",
    outline: None,
};
const HIT_COUNTER: TextStyle<'static> = TextStyle {
    font: "bold 18px VT323",
    color: "#FF0000",
    align: "center",
    outline: Some(("#FFFFFF", 3.0)),
};

fn sparkle_style(size: u8, color: &str) -> TextStyle<'_> {
    TextStyle {
        font: match size {
            8 => "8px VT323",
            10 => "10px VT323",
            _ => "14px VT323",
        },
        color,
        align: "center",
        outline: None,
    }
}

pub struct Playground {
    rookie: Rookie,
    assets: Assets,
    // drawn once per session, the frame counter varies each scatter
    confetti_seed: u64,
}

impl Playground {
    fn new(assets: Assets) -> Self {
        Playground {
            rookie: Rookie::new(),
            assets,
            confetti_seed: Pcg32::from_entropy().gen(),
        }
    }

    fn confetti(&self) -> Vec<ConfettiParticle> {
        confetti::for_frame(
            self.confetti_seed,
            self.rookie.context().frame_counter,
            canvas_size(),
        )
    }

    fn draw(&self, renderer: &Renderer) {
        let context = self.rookie.context();
        renderer.clear(&Rect::new(Point::default(), canvas_size()));

        renderer.save();
        renderer.translate(context.screen_shake);
        renderer.draw_line(
            Point { x: 0.0, y: GROUND_Y },
            Point {
                x: CANVAS_WIDTH,
                y: GROUND_Y,
            },
            "#000",
            2.0,
        );
        self.draw_box(renderer, context);
        self.draw_cup(renderer, context);
        self.draw_player(renderer, context);
        renderer.restore();

        draw_hud(renderer, context);
        if context.show_celebration {
            self.draw_confetti(renderer);
        }
    }

    fn draw_box(&self, renderer: &Renderer, context: &RookieContext) {
        let mut position = Point { x: BOX_X, y: BOX_Y };
        if context.box_hit_animation > 0 {
            let t = f64::from(context.box_hit_animation);
            position.x += (t * 0.8).sin() * 3.0;
            position.y += (t * 1.2).sin() * 2.0;
        }

        if let Some(image) = self.assets.get(AssetName::Box) {
            // two columns : question box, wall
            let frame_width = f64::from(image.natural_width()) / 2.0;
            let column = if context.is_wall() { 1.0 } else { 0.0 };
            let frame = Rect::new(
                Point {
                    x: column * frame_width,
                    y: 0.0,
                },
                Size {
                    width: frame_width,
                    height: f64::from(image.natural_height()),
                },
            );
            let destination = Rect::new(
                position,
                Size {
                    width: BOX_WIDTH,
                    height: BOX_HEIGHT,
                },
            );
            renderer.draw_sprite(image, &frame, &destination, false);
        }

        if let Some(label) = hud::hit_counter_label(context.box_hits) {
            renderer.draw_text(
                &label,
                Point {
                    x: position.x + BOX_WIDTH / 2.0,
                    y: position.y - 8.0,
                },
                &HIT_COUNTER,
            );
        }
    }

    fn draw_cup(&self, renderer: &Renderer, context: &RookieContext) {
        let cup = &context.cup;
        let Some(image) = self.assets.get(AssetName::Cup) else {
            return;
        };
        let destination = Rect::new(
            cup.position,
            Size {
                width: CUP_SIZE,
                height: CUP_SIZE,
            },
        );
        let at = |dx: f64, dy: f64| Point {
            x: cup.position.x + dx,
            y: cup.position.y + dy,
        };

        match cup.animation {
            CupAnimation::None => {}
            CupAnimation::Rising => {
                // only the part above the box lid is visible
                let reveal_height = (BOX_Y - cup.position.y).max(0.0);
                renderer.save();
                renderer.set_glow(GOLD, 15.0);
                renderer.draw_image_clipped(
                    image,
                    &destination,
                    &Rect::new(
                        cup.position,
                        Size {
                            width: CUP_SIZE,
                            height: reveal_height,
                        },
                    ),
                );
                renderer.restore();
                if reveal_height > 10.0 {
                    let style = sparkle_style(10, GOLD);
                    renderer.draw_text("\u{2728}", at(10.0, reveal_height - 5.0), &style);
                    renderer.draw_text("\u{2728}", at(34.0, reveal_height - 8.0), &style);
                }
            }
            CupAnimation::Falling => {
                let spin = f64::from(cup.counter) / f64::from(CUP_FALL_FRAMES) * 2.0 * PI;
                renderer.save();
                renderer.set_glow(GOLD, 15.0);
                renderer.draw_image_rotated(image, &destination, spin);
                renderer.restore();
                let trail = sparkle_style(8, "rgba(255, 215, 0, 0.4)");
                for i in 1..=3 {
                    renderer.draw_text("\u{2728}", at(CUP_SIZE / 2.0, f64::from(i) * 15.0), &trail);
                }
            }
            CupAnimation::Landed => {
                if !cup.visible {
                    return;
                }
                renderer.save();
                renderer.set_glow(GOLD, 15.0);
                renderer.draw_image(image, &destination);
                renderer.restore();
                let style = sparkle_style(14, GOLD);
                renderer.draw_text("\u{2728}", at(8.0, 12.0), &style);
                renderer.draw_text("\u{2728}", at(36.0, 18.0), &style);
                renderer.draw_text("\u{2615}", at(CUP_SIZE / 2.0, -8.0), &style);
            }
        }
    }

    /// Which image to use and whether it is a 4-column walk sheet
    fn player_image(&self) -> Option<(&HtmlImageElement, bool)> {
        let (name, sheet) = match self.rookie.transformation_phase() {
            TransformationPhase::Transforming => {
                if self.rookie.player_size() > BIG_SPRITE_THRESHOLD {
                    (AssetName::BigBoy, true)
                } else {
                    (AssetName::ShortBoyIdle, true)
                }
            }
            TransformationPhase::None if self.rookie.is_drinking() => (AssetName::BoyDrink, false),
            TransformationPhase::Complete => (AssetName::BigBoy, true),
            TransformationPhase::None => (AssetName::ShortBoyIdle, true),
        };
        self.assets.get(name).map(|image| (image, sheet))
    }

    fn draw_player(&self, renderer: &Renderer, context: &RookieContext) {
        let Some((image, sheet)) = self.player_image() else {
            return;
        };
        let destination = Rect::new(
            Point {
                x: context.position.x,
                y: context.position.y + self.rookie.sprite_offset(),
            },
            self.rookie.player_dimensions(),
        );
        let mirrored = context.is_moving_left();

        if sheet {
            let frame_width = f64::from(image.natural_width()) / 4.0;
            let frame = Rect::new(
                Point {
                    x: f64::from(context.animation_frame) * frame_width,
                    y: 0.0,
                },
                Size {
                    width: frame_width,
                    height: f64::from(image.natural_height()),
                },
            );
            renderer.draw_sprite(image, &frame, &destination, mirrored);
        } else {
            renderer.draw_image_facing(image, &destination, mirrored);
        }
    }

    fn draw_confetti(&self, renderer: &Renderer) {
        for particle in self.confetti() {
            let center = Point {
                x: particle.x + particle.size / 2.0,
                y: particle.y + particle.size / 2.0,
            };
            match particle.shape {
                Shape::Circle => {
                    renderer.fill_circle(center, particle.size / 2.0, particle.color, particle.opacity)
                }
                Shape::Square => renderer.fill_square(
                    center,
                    particle.size,
                    particle.rotation,
                    particle.color,
                    particle.opacity,
                ),
            }
        }
    }
}

fn canvas_size() -> Size {
    Size {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    }
}

fn draw_hud(renderer: &Renderer, context: &RookieContext) {
    let headline = hud::headline(context);
    let center_x = CANVAS_WIDTH / 2.0;
    renderer.draw_text(headline.title, Point { x: center_x, y: 44.0 }, &TITLE);
    renderer.draw_text(headline.subtitle, Point { x: center_x, y: 76.0 }, &SUBTITLE);

    let [primary, secondary] = hud::instructions(context);
    renderer.draw_text(primary, Point { x: center_x, y: 476.0 }, &INSTRUCTION);
    renderer.draw_text(secondary, Point { x: center_x, y: 494.0 }, &INSTRUCTION);
}
