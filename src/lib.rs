//! Find Meow core crate.
//!
//! Players take turns tuning a TV to a channel; the channel lands on a random
//! unused image, a scan line sweeps it and reveals the hidden cats, and after
//! everyone has played the player who found the most cats wins.
//!
//! The crate is the round engine only. Rendering, audio and host-platform
//! glue stay in the page, which talks to [`web::FindMeow`] and renders the
//! [`GameEvent`]s it receives.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod logging;
pub mod name;
pub mod ranking;
pub mod rng;
pub mod round;
pub mod scan;
pub mod session;
pub mod web;

pub use catalog::{CatMarker, ImageCatalog, ImageEntry};
pub use clock::{TimerId, Timeline};
pub use config::GameConfig;
pub use controller::{GamePhase, TurnController};
pub use error::{ChannelError, CatalogError, ConfigError, NameError, SessionError, TurnError};
pub use events::{EventSink, GameEvent};
pub use name::validate_player_name;
pub use ranking::{RankedPlayer, rank};
pub use rng::{GameRng, RandomSource};
pub use round::{Channel, RoundState};
pub use scan::{DetectionEvent, ScanPhase, ScanRequest, ScanResult, ScanSequencer, ScanSignal};
pub use session::{Player, SessionState, TurnAdvance};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
