// ==================== Modules ====================
// browser first : its log!/error! macros are used everywhere below
#[macro_use]
pub mod browser;
pub mod assets;
pub mod config;
pub mod confetti;
pub mod engine;
mod game;
pub mod hud;
pub mod sim;

use engine::GameLoop;
use game::RookieGame;
use wasm_bindgen::prelude::*;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - starts the game loop once assets are in
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(RookieGame::new()).await {
            error!("Could not start game : {:#?}", err);
        }
    });

    Ok(())
}
