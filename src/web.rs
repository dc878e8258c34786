//! JS-facing wrapper around the turn controller. The page owns every DOM
//! element; it forwards button presses here and renders the events returned
//! from `tick`.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::catalog::ImageCatalog;
use crate::config::GameConfig;
use crate::controller::TurnController;
use crate::rng::GameRng;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct FindMeow {
    inner: TurnController<GameRng>,
}

#[wasm_bindgen]
impl FindMeow {
    /// `point_info` is the pointInfo.json text; `config` is optional game config JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(point_info: &str, config: Option<String>) -> Result<FindMeow, JsValue> {
        let config = match config {
            Some(json) => GameConfig::from_json(&json).map_err(js_err)?,
            None => GameConfig::default(),
        };
        let catalog = ImageCatalog::from_point_info_json(point_info, Some(config.max_channel_images))
            .map_err(js_err)?;
        let inner = TurnController::new(config, Arc::new(catalog), GameRng::from_entropy())
            .map_err(js_err)?;
        Ok(FindMeow { inner })
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, total_players: usize) -> Result<(), JsValue> {
        self.inner.start_game(total_players).map_err(js_err)
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(js_name = pressNumber)]
    pub fn press_number(&mut self, digit: u8) {
        self.inner.submit_digit(digit);
    }

    pub fn backspace(&mut self) {
        self.inner.backspace();
    }

    #[wasm_bindgen(js_name = randomChannel)]
    pub fn random_channel(&mut self) -> bool {
        self.inner.randomize_channel()
    }

    /// Returns the assigned image id; the error string is user-facing.
    #[wasm_bindgen(js_name = changeChannel)]
    pub fn change_channel(&mut self) -> Result<String, JsValue> {
        self.inner.submit_channel().map(|req| req.image_id).map_err(js_err)
    }

    /// Returns true when this was the last player (results are ready).
    #[wasm_bindgen(js_name = confirmPlayer)]
    pub fn confirm_player(&mut self, name: &str) -> Result<bool, JsValue> {
        self.inner
            .confirm_turn(name)
            .map(|advance| matches!(advance, crate::session::TurnAdvance::Finished))
            .map_err(js_err)
    }

    /// Advance the game clock and return every pending event as a JSON array.
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        self.inner.tick(now_ms.max(0.0) as u64);
        serde_json::to_string(&self.inner.drain_events()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = channelDisplay)]
    pub fn channel_display(&self) -> String {
        self.inner.channel_display()
    }

    #[wasm_bindgen(js_name = playerNumber)]
    pub fn player_number(&self) -> usize {
        self.inner.player_number()
    }

    #[wasm_bindgen(js_name = totalPlayers)]
    pub fn total_players(&self) -> usize {
        self.inner.session().total_players()
    }

    #[wasm_bindgen(js_name = isLastPlayer)]
    pub fn is_last_player(&self) -> bool {
        self.inner.is_last_player()
    }

    #[wasm_bindgen(js_name = suggestedName)]
    pub fn suggested_name(&self) -> String {
        self.inner.suggested_player_name()
    }

    #[wasm_bindgen(js_name = usedChannels)]
    pub fn used_channels(&self) -> String {
        self.inner
            .used_channels()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[wasm_bindgen(js_name = standingsJson)]
    pub fn standings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.standings()).map_err(js_err)
    }
}

/// `performance.now()` for the page's frame loop, 0 outside a browser.
#[wasm_bindgen(js_name = performanceNow)]
pub fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(directive: &str) -> bool {
    crate::logging::init(directive)
}
