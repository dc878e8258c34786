//! Turn controller: owns the session, the current round, the scan sequencer
//! and the timeline, and routes every host action through them.
//!
//! Flow per turn: digits (or randomize) -> `submit_channel` picks an unused
//! image and starts the scan -> `tick` drives detections -> confirm unlocks ->
//! `confirm_turn` commits the player and either hands over to the next player
//! or ranks everyone.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::ImageCatalog;
use crate::clock::Timeline;
use crate::config::GameConfig;
use crate::error::{ChannelError, ConfigError, SessionError, TurnError};
use crate::events::{EventSink, GameEvent};
use crate::name::validate_player_name;
use crate::ranking::{RankedPlayer, rank};
use crate::rng::{GameRng, RandomSource};
use crate::round::{Channel, MAX_CHANNEL_DIGITS, RoundState};
use crate::scan::{ScanPhase, ScanRequest, ScanResult, ScanSequencer, ScanSignal, ScanTimer};
use crate::session::{Player, SessionState, TurnAdvance};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for `start_game`.
    Setup,
    Playing,
    /// Everyone played; standings are available.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerEvent {
    RevealDigit(char),
    PressChannelAction,
    AutoSubmit,
    Scan(ScanTimer),
    ConfirmReady,
}

impl From<ScanTimer> for TimerEvent {
    fn from(t: ScanTimer) -> Self {
        TimerEvent::Scan(t)
    }
}

pub struct TurnController<R: RandomSource = GameRng> {
    config: GameConfig,
    catalog: Arc<ImageCatalog>,
    rng: R,
    phase: GamePhase,
    session: SessionState,
    round: RoundState,
    scan: ScanSequencer,
    timeline: Timeline<TimerEvent>,
    standings: Vec<RankedPlayer>,
    events: Vec<GameEvent>,
}

impl<R: RandomSource> TurnController<R> {
    pub fn new(config: GameConfig, catalog: Arc<ImageCatalog>, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = SessionState::new(config.default_total_players, config.max_players)
            .map_err(|_| ConfigError::Invalid("default_total_players must be within 1..=max_players"))?;
        Ok(Self {
            config,
            catalog,
            rng,
            phase: GamePhase::Setup,
            session,
            round: RoundState::new(),
            scan: ScanSequencer::new(),
            timeline: Timeline::new(),
            standings: Vec::new(),
            events: Vec::new(),
        })
    }

    // --- Lifecycle -----------------------------------------------------------

    pub fn start_game(&mut self, total_players: usize) -> Result<(), SessionError> {
        let session = SessionState::new(total_players, self.config.max_players)?;
        self.session = session;
        self.clear_round_state();
        self.standings.clear();
        self.phase = GamePhase::Playing;
        info!(total_players, images = self.catalog.len(), "game started");
        self.emit(GameEvent::GameStarted {
            total_players,
            suggested_name: self.config.default_player_name(0),
        });
        self.emit_channel_display();
        Ok(())
    }

    /// Back to setup with the default player count. Pending timers are dropped.
    pub fn reset(&mut self) {
        if let Ok(session) =
            SessionState::new(self.config.default_total_players, self.config.max_players)
        {
            self.session = session;
        }
        self.clear_round_state();
        self.standings.clear();
        self.phase = GamePhase::Setup;
        info!("game reset");
        self.emit(GameEvent::GameReset);
    }

    fn clear_round_state(&mut self) {
        self.scan.cancel(&mut self.timeline);
        let dropped = self.timeline.clear();
        if dropped > 0 {
            debug!(dropped, "cancelled pending timers");
        }
        self.round = RoundState::new();
    }

    // --- Remote control input --------------------------------------------------

    pub fn submit_digit(&mut self, digit: u8) {
        if self.phase == GamePhase::Playing && self.round.push_digit(digit) {
            self.emit_channel_display();
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == GamePhase::Playing && self.round.pop_digit() {
            self.emit_channel_display();
        }
    }

    /// Pick a random channel and type it digit by digit, then submit it.
    /// Returns false (and does nothing) while input is locked.
    pub fn randomize_channel(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.round.is_locked() {
            return false;
        }
        self.round.lock();
        self.round.clear_digits();
        self.emit_channel_display();

        let number = self.rng.next_int(u32::from(Channel::MAX)) + 1;
        let target = format!("{number:03}");
        let interval = self.config.digit_reveal_interval_ms;
        for (i, digit) in target.chars().enumerate() {
            self.timeline.after(interval.saturating_mul(i as u64), TimerEvent::RevealDigit(digit));
        }
        let press_at = interval.saturating_mul(MAX_CHANNEL_DIGITS as u64);
        self.timeline.after(press_at, TimerEvent::PressChannelAction);
        debug!(channel = %target, "randomizing channel");
        true
    }

    /// Validate the entered channel, assign an unused image and start the scan.
    pub fn submit_channel(&mut self) -> Result<ScanRequest, ChannelError> {
        if self.phase != GamePhase::Playing {
            return Err(ChannelError::GameNotActive);
        }
        if self.round.is_locked() || self.scan.phase() == ScanPhase::Scanning {
            return Err(ChannelError::InputLocked);
        }
        let channel = self.round.channel()?;
        if self.session.is_channel_used(channel) {
            info!(%channel, "channel already used");
            return Err(ChannelError::ChannelAlreadyUsed(channel));
        }

        // Only the first `max_channel_images` catalog entries are playable
        let available: Vec<&str> = self
            .catalog
            .ids()
            .take(self.config.max_channel_images)
            .filter(|id| !self.session.is_image_used(id))
            .collect();
        let image_id = match self.rng.pick(&available) {
            Some(id) => id.to_string(),
            None => {
                warn!("no channel images remaining");
                return Err(ChannelError::NoImagesRemaining);
            }
        };
        let entry = self.catalog.get(&image_id).inspect_err(|err| {
            warn!(%err, "assigned image missing from catalog");
        })?;
        let request = ScanRequest { image_id, cat_markers: entry.cat_markers.clone() };

        self.scan
            .start(&request.cat_markers, self.config.scan_duration_ms, &mut self.timeline)
            .map_err(|_| ChannelError::InputLocked)?;
        self.round.lock();
        self.round.assign_image(request.image_id.clone());
        info!(%channel, image = %request.image_id, cats = request.cat_markers.len(), "channel accepted");
        self.emit(GameEvent::ScanStarted {
            request: request.clone(),
            duration_ms: self.config.scan_duration_ms,
        });
        Ok(request)
    }

    /// Commit the current player. Requires a finished (or fully detected) scan.
    pub fn confirm_turn(&mut self, name: &str) -> Result<TurnAdvance, TurnError> {
        if self.phase != GamePhase::Playing {
            return Err(TurnError::GameNotActive);
        }
        let name = validate_player_name(name)?.to_string();
        let Some(image_id) = self.round.assigned_image_id().map(str::to_string) else {
            return Err(TurnError::NoChannelSelected);
        };
        let channel = self.round.channel().map_err(|_| TurnError::NoChannelSelected)?;
        if !self.round.is_confirm_ready() {
            return Err(TurnError::ScanPending);
        }

        let player = Player { name, channel, image_id, cat_count: self.scan.detected_count() };
        self.clear_round_state();
        let advance = self.session.commit(player.clone());
        info!(player = %player.name, %channel, cats = player.cat_count, "turn confirmed");

        match advance {
            TurnAdvance::Next(index) => {
                self.emit(GameEvent::TurnConfirmed {
                    player,
                    next_player_index: Some(index),
                    suggested_name: Some(self.config.default_player_name(index)),
                });
                self.emit_channel_display();
            }
            TurnAdvance::Finished => {
                self.emit(GameEvent::TurnConfirmed {
                    player,
                    next_player_index: None,
                    suggested_name: None,
                });
                self.standings = rank(self.session.players());
                self.phase = GamePhase::Finished;
                info!(players = self.standings.len(), "all players done, standings ranked");
                self.emit(GameEvent::GameFinished { standings: self.standings.clone() });
            }
        }
        Ok(advance)
    }

    // --- Time --------------------------------------------------------------------

    /// Advance to `now_ms` (host frame time), running every timer due by then.
    pub fn tick(&mut self, now_ms: u64) {
        while let Some((due_ms, event)) = self.timeline.pop_due(now_ms) {
            self.dispatch(event, due_ms);
        }
    }

    fn dispatch(&mut self, event: TimerEvent, due_ms: u64) {
        match event {
            TimerEvent::RevealDigit(digit) => {
                self.round.reveal_digit(digit);
                self.emit(GameEvent::RandomDigit { digit });
                self.emit_channel_display();
            }
            TimerEvent::PressChannelAction => {
                self.emit(GameEvent::ChannelActionPressed);
                self.timeline.after(self.config.channel_submit_delay_ms, TimerEvent::AutoSubmit);
            }
            TimerEvent::AutoSubmit => {
                self.round.unlock();
                if let Err(err) = self.submit_channel() {
                    info!(%err, "random channel rejected");
                    self.emit(GameEvent::ChannelRejected { reason: err.to_string() });
                }
            }
            TimerEvent::Scan(timer) => {
                for signal in self.scan.on_timer(timer, due_ms) {
                    self.on_scan_signal(signal);
                }
            }
            TimerEvent::ConfirmReady => self.mark_confirm_ready(),
        }
    }

    fn on_scan_signal(&mut self, signal: ScanSignal) {
        match signal {
            ScanSignal::CatDetected { cat_index, marker, detected_count, elapsed_ms } => {
                self.emit(GameEvent::CatDetected {
                    cat_index,
                    x: marker.x,
                    y: marker.y,
                    detected_count,
                    elapsed_ms,
                });
            }
            ScanSignal::AllCatsDetected { total } => {
                self.emit(GameEvent::AllCatsDetected { total });
                self.timeline.after(self.config.confirm_grace_ms, TimerEvent::ConfirmReady);
            }
            ScanSignal::NoCatsFound => {
                self.emit(GameEvent::NoCatsFound);
                self.mark_confirm_ready();
            }
            ScanSignal::Completed(result) => self.on_scan_complete(result),
        }
    }

    /// Input stays locked after the scan; only `confirm_turn` moves the game on.
    fn on_scan_complete(&mut self, result: ScanResult) {
        debug!(detected = result.detected_count, total = result.total_cats, "scan finished");
        self.emit(GameEvent::ScanCompleted { result });
    }

    fn mark_confirm_ready(&mut self) {
        if self.round.is_confirm_ready() {
            return;
        }
        self.round.mark_confirm_ready();
        let last_player = self.session.is_last_player();
        self.emit(GameEvent::ConfirmReady { last_player });
    }

    // --- Events ------------------------------------------------------------------

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn emit_channel_display(&mut self) {
        let active = !self.round.entered().is_empty();
        self.emit(GameEvent::ChannelDisplay { text: self.round.display(), active });
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn forward_events(&mut self, sink: &mut dyn EventSink) {
        for event in self.events.drain(..) {
            sink.emit(event);
        }
    }

    // --- Queries -----------------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn scan_phase(&self) -> ScanPhase {
        self.scan.phase()
    }

    pub fn standings(&self) -> &[RankedPlayer] {
        &self.standings
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// 1-based number of the player whose turn it is.
    pub fn player_number(&self) -> usize {
        self.session.current_player_index() + 1
    }

    pub fn is_last_player(&self) -> bool {
        self.session.is_last_player()
    }

    pub fn suggested_player_name(&self) -> String {
        self.config.default_player_name(self.session.current_player_index())
    }

    pub fn channel_display(&self) -> String {
        self.round.display()
    }

    pub fn used_channels(&self) -> Vec<Channel> {
        self.session.used_channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatMarker, ImageEntry};

    /// Always returns the queued values, falling back to 0.
    struct Scripted(Vec<u32>);

    impl RandomSource for Scripted {
        fn next_int(&mut self, max_exclusive: u32) -> u32 {
            if self.0.is_empty() { 0 } else { self.0.remove(0).min(max_exclusive.saturating_sub(1)) }
        }
    }

    fn catalog() -> Arc<ImageCatalog> {
        Arc::new(
            ImageCatalog::new(vec![
                ImageEntry::new("a.jpg", vec![CatMarker::new(0.25, 0.5), CatMarker::new(0.5, 0.1)]),
                ImageEntry::new("b.jpg", vec![]),
            ])
            .unwrap(),
        )
    }

    fn controller(script: Vec<u32>) -> TurnController<Scripted> {
        TurnController::new(GameConfig::default(), catalog(), Scripted(script)).unwrap()
    }

    fn enter(c: &mut TurnController<Scripted>, digits: &[u8]) {
        for &d in digits {
            c.submit_digit(d);
        }
    }

    #[test]
    fn test_input_ignored_before_start() {
        let mut c = controller(vec![]);
        c.submit_digit(1);
        assert_eq!(c.round().entered(), "");
        assert!(!c.randomize_channel());
        assert!(matches!(c.submit_channel(), Err(ChannelError::GameNotActive)));
        assert_eq!(c.confirm_turn("Tom"), Err(TurnError::GameNotActive));
    }

    #[test]
    fn test_submit_validates_range() {
        let mut c = controller(vec![]);
        c.start_game(2).unwrap();
        assert!(matches!(c.submit_channel(), Err(ChannelError::InvalidRange)));
        assert!(!c.round().is_locked());
    }

    #[test]
    fn test_submit_locks_and_starts_scan() {
        let mut c = controller(vec![0]);
        c.start_game(2).unwrap();
        enter(&mut c, &[4, 2]);
        let req = c.submit_channel().unwrap();
        assert_eq!(req.image_id, "a.jpg");
        assert!(c.round().is_locked());
        assert_eq!(c.scan_phase(), ScanPhase::Scanning);
        // Keypad and resubmission are blocked while locked
        c.submit_digit(1);
        c.backspace();
        assert_eq!(c.round().entered(), "42");
        assert!(matches!(c.submit_channel(), Err(ChannelError::InputLocked)));
        assert!(!c.randomize_channel());
    }

    #[test]
    fn test_confirm_gating() {
        let mut c = controller(vec![0]);
        c.start_game(2).unwrap();
        assert_eq!(c.confirm_turn("Tom"), Err(TurnError::NoChannelSelected));
        enter(&mut c, &[7]);
        c.submit_channel().unwrap();
        assert_eq!(c.confirm_turn("Tom"), Err(TurnError::ScanPending));
        // Both cats found by 1000ms, confirm unlocks 500ms later
        c.tick(1499);
        assert_eq!(c.confirm_turn("Tom"), Err(TurnError::ScanPending));
        c.tick(1500);
        assert!(c.round().is_confirm_ready());
        assert_eq!(c.scan_phase(), ScanPhase::Scanning);
        assert_eq!(
            c.confirm_turn("x"),
            Err(TurnError::Name(crate::error::NameError::LengthOutOfRange { len: 1, min: 2, max: 20 }))
        );
        assert_eq!(c.confirm_turn("Tom"), Ok(TurnAdvance::Next(1)));
        assert_eq!(c.session().players()[0].cat_count, 2);
        assert!(!c.round().is_locked());
        assert_eq!(c.scan_phase(), ScanPhase::Idle);
        // The unfired finish timer of the old scan was cancelled
        c.drain_events();
        c.tick(10_000);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn test_randomize_reveals_then_submits() {
        // 6 + 1 -> channel 007; then image index 1 -> b.jpg
        let mut c = controller(vec![6, 1]);
        c.start_game(1).unwrap();
        assert!(c.randomize_channel());
        assert!(c.round().is_locked());
        assert!(!c.randomize_channel());
        c.tick(0);
        assert_eq!(c.round().entered(), "0");
        c.tick(1200);
        assert_eq!(c.round().entered(), "007");
        c.tick(2299);
        assert_eq!(c.scan_phase(), ScanPhase::Idle);
        c.tick(2300);
        assert_eq!(c.scan_phase(), ScanPhase::Scanning);
        assert_eq!(c.round().assigned_image_id(), Some("b.jpg"));
        let events = c.drain_events();
        let digits: Vec<char> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::RandomDigit { digit } => Some(*digit),
                _ => None,
            })
            .collect();
        assert_eq!(digits, vec!['0', '0', '7']);
        assert!(events.contains(&GameEvent::ChannelActionPressed));
    }

    #[test]
    fn test_randomize_rejection_unlocks() {
        let mut c = controller(vec![0, 0, 0, 0]);
        c.start_game(2).unwrap();
        enter(&mut c, &[1]);
        c.submit_channel().unwrap();
        c.tick(2500);
        c.confirm_turn("Tom").unwrap();
        // Random channel 001 collides with the first player's channel
        assert!(c.randomize_channel());
        c.tick(10_000);
        assert!(!c.round().is_locked());
        let events = c.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ChannelRejected { .. })));
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut c = controller(vec![]);
        c.start_game(4).unwrap();
        c.randomize_channel();
        c.reset();
        assert_eq!(c.phase(), GamePhase::Setup);
        assert_eq!(c.session().total_players(), 3);
        assert!(!c.round().is_locked());
        c.drain_events();
        c.tick(60_000);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn test_huge_reveal_interval_saturates() {
        let config = GameConfig { digit_reveal_interval_ms: u64::MAX, ..GameConfig::default() };
        let mut c = TurnController::new(config, catalog(), Scripted(vec![6])).unwrap();
        c.start_game(1).unwrap();
        assert!(c.randomize_channel());
        c.tick(1_000_000);
        // Only the first digit is due; the rest sit at the end of time
        assert_eq!(c.round().entered(), "0");
        assert!(c.round().is_locked());
    }

    #[test]
    fn test_confirm_leaves_no_pending_timers() {
        let mut c = controller(vec![0]);
        c.start_game(2).unwrap();
        enter(&mut c, &[7]);
        c.submit_channel().unwrap();
        c.tick(1500);
        // Finish timer at 2000 is still queued
        assert!(!c.timeline.is_empty());
        c.confirm_turn("Tom").unwrap();
        assert!(c.timeline.is_empty());
    }

    #[test]
    fn test_image_cap_limits_assignment() {
        let config = GameConfig { max_channel_images: 1, ..GameConfig::default() };
        let mut c = TurnController::new(config, catalog(), Scripted(vec![])).unwrap();
        c.start_game(2).unwrap();
        enter(&mut c, &[1]);
        assert_eq!(c.submit_channel().unwrap().image_id, "a.jpg");
        c.tick(3000);
        c.confirm_turn("Tom").unwrap();
        // b.jpg is in the catalog but past the cap
        enter(&mut c, &[2]);
        assert!(matches!(c.submit_channel(), Err(ChannelError::NoImagesRemaining)));
    }

    #[test]
    fn test_start_game_rejects_bad_player_count() {
        let mut c = controller(vec![]);
        assert!(c.start_game(0).is_err());
        assert!(c.start_game(21).is_err());
        assert_eq!(c.phase(), GamePhase::Setup);
    }

    #[test]
    fn test_suggested_names_follow_turns() {
        let mut c = controller(vec![]);
        c.start_game(2).unwrap();
        assert_eq!(c.player_number(), 1);
        assert_eq!(c.suggested_player_name(), "냥콩이");
        enter(&mut c, &[3]);
        c.submit_channel().unwrap();
        c.tick(3000);
        let name = c.suggested_player_name();
        c.confirm_turn(&name).unwrap();
        assert_eq!(c.player_number(), 2);
        assert!(c.is_last_player());
        assert_eq!(c.suggested_player_name(), "몽글냥");
    }
}
