//! Tick driver
//!
//! Owns everything the pure simulation does not: the direction queue, the
//! seeded RNG, settings, the leaderboard and the outbound message diffing.
//! The platform layer calls `step` on a timer of `tick_interval_ms`.

use rand_pcg::Pcg32;

use crate::highscores::{HighScoreEntry, HighScores};
use crate::protocol::{GameMessage, HostMessage, parse_host_message};
use crate::settings::Settings;
use crate::sim::{
    Direction, DirectionQueue, EnqueueResult, GameEvent, GameState, PowerUpKind, RngState,
    TickInput, advance_trivia, create_new_game, submit_trivia_answer, tick,
};

/// Fields the host is told about
type Broadcast = (bool, bool, u32);

pub struct GameSession {
    state: GameState,
    queue: DirectionQueue,
    rng: Pcg32,
    settings: Settings,
    high_scores: HighScores,
    ready_pending: bool,
    last_broadcast: Option<Broadcast>,
    /// Final score of the current game already offered to the leaderboard
    recorded: bool,
    /// Timestamp of the latest `step`
    last_timestamp: f64,
}

impl GameSession {
    /// New session waiting for START_GAME
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = RngState::new(seed).to_rng();
        let mut state = create_new_game(Vec::new(), &mut rng);
        state.game_started = false;
        log::info!("Session created (seed {})", seed);

        Self {
            state,
            queue: DirectionQueue::new(),
            rng,
            settings,
            high_scores: HighScores::load(),
            ready_pending: true,
            last_broadcast: None,
            recorded: false,
            last_timestamp: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Heading the snake will have once the queue drains
    pub fn effective_direction(&self) -> Direction {
        self.queue.effective()
    }

    pub fn change_direction(&mut self, direction: Direction) -> EnqueueResult {
        if self.state.game_over {
            return EnqueueResult::Rejected;
        }
        self.queue.enqueue(direction)
    }

    /// Begin play; after a finished game this starts a fresh one
    pub fn start_game(&mut self) {
        if self.state.game_over {
            self.reset_game();
        }
        if !self.state.game_started {
            log::info!("Game started");
            self.state.game_started = true;
        }
    }

    /// Replace the game with a fresh running one. A finished game not yet
    /// on the leaderboard is recorded first; open trivia counts as declined.
    pub fn reset_game(&mut self) {
        if self.state.game_over && !self.recorded {
            self.record_final(self.last_timestamp);
        }
        self.state = create_new_game(Vec::new(), &mut self.rng);
        self.queue.reset();
        self.recorded = false;
    }

    /// Answer the open trivia question; `false` if none was waiting
    pub fn answer_trivia(&mut self, index: usize) -> bool {
        let before = self.state.trivia;
        self.state = submit_trivia_answer(&self.state, index);
        self.state.trivia != before
    }

    /// One timer tick: move while alive, count the trivia result down while
    /// dead
    pub fn step(&mut self, timestamp: f64) {
        if !self.state.game_started {
            return;
        }
        self.state.events.clear();
        self.last_timestamp = timestamp;

        if !self.state.game_over {
            let input = TickInput {
                direction: self.queue.dequeue(),
                immortal: self.settings.immortal,
            };
            self.state = tick(&self.state, &input, &mut self.rng);
        } else if self.state.trivia.is_pending() {
            self.state = advance_trivia(&self.state, &mut self.rng);
            if !self.state.game_over {
                self.queue.reset_to(self.state.direction);
            }
        }

        if self.state.game_over && !self.settings.trivia_enabled && self.state.trivia.is_pending() {
            self.state.trivia = self.state.trivia.decline();
        }

        self.log_events();
        self.record_if_final(timestamp);
    }

    /// Milliseconds until the next `step`
    pub fn tick_interval_ms(&self) -> u32 {
        self.settings
            .interval_ms(self.state.has_power_up(PowerUpKind::Speed))
    }

    pub fn handle_host_message(&mut self, msg: &HostMessage) {
        match msg {
            HostMessage::DirectionChange { direction, .. } => {
                self.change_direction(*direction);
            }
            HostMessage::StartGame { .. } => self.start_game(),
            HostMessage::ResetGame { .. } => self.reset_game(),
        }
    }

    /// Parse and apply raw JSON from the host; malformed input is ignored
    pub fn handle_host_json(&mut self, json: &str) -> bool {
        match parse_host_message(json) {
            Some(msg) => {
                self.handle_host_message(&msg);
                true
            }
            None => false,
        }
    }

    /// Messages owed to the host: GAME_READY once, then GAME_STATE whenever
    /// started/over/score changed since the last drain
    pub fn drain_messages(&mut self, timestamp: f64) -> Vec<GameMessage> {
        let mut out = Vec::new();
        if self.ready_pending {
            self.ready_pending = false;
            out.push(GameMessage::GameReady { timestamp });
        }
        let current = (self.state.game_started, self.state.game_over, self.state.score);
        if self.last_broadcast != Some(current) {
            self.last_broadcast = Some(current);
            out.push(GameMessage::snapshot(&self.state, timestamp));
        }
        out
    }

    fn log_events(&self) {
        for event in &self.state.events {
            match event {
                GameEvent::Died(_) | GameEvent::Revived | GameEvent::PoliceCatch { .. } => {
                    log::info!("tick {}: {:?}", self.state.tick_count, event)
                }
                _ => log::debug!("tick {}: {:?}", self.state.tick_count, event),
            }
        }
    }

    fn record_if_final(&mut self, timestamp: f64) {
        if self.recorded || !self.state.game_over || self.state.trivia.is_pending() {
            return;
        }
        self.record_final(timestamp);
    }

    fn record_final(&mut self, timestamp: f64) {
        self.recorded = true;

        let entry = HighScoreEntry {
            score: self.state.score,
            food_eaten: self.state.food_eaten,
            length: self.state.snake.len(),
            timestamp,
        };
        if let Some(rank) = self.high_scores.add(entry) {
            log::info!("New high score #{}: {}", rank, self.state.score);
            self.high_scores.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DeathReason, TriviaPhase};
    use crate::sim::trivia::TRIVIA_QUESTIONS;

    fn session() -> GameSession {
        GameSession::new(Settings::default(), 42)
    }

    /// Steer straight right until the wall
    fn run_into_wall(session: &mut GameSession) {
        for i in 0..40 {
            if session.state().game_over {
                return;
            }
            session.step(i as f64);
        }
        panic!("snake never hit the wall");
    }

    #[test]
    fn test_waits_for_start() {
        let mut s = session();
        let head = s.state().head();
        s.step(0.0);
        assert_eq!(s.state().head(), head);
        assert_eq!(s.state().tick_count, 0);

        s.start_game();
        s.step(1.0);
        assert_eq!(s.state().tick_count, 1);
        assert_eq!(s.state().head(), head.step(Direction::Right));
    }

    #[test]
    fn test_one_turn_per_tick() {
        let mut s = session();
        s.start_game();
        assert_eq!(s.change_direction(Direction::Up), EnqueueResult::Accepted);
        assert_eq!(s.change_direction(Direction::Left), EnqueueResult::Accepted);
        assert_eq!(s.change_direction(Direction::Left), EnqueueResult::SameDirection);
        assert_eq!(s.change_direction(Direction::Right), EnqueueResult::Rejected);
        s.step(0.0);
        assert_eq!(s.state().direction, Direction::Up);
        s.step(1.0);
        assert_eq!(s.state().direction, Direction::Left);
    }

    #[test]
    fn test_ready_then_state_messages() {
        let mut s = session();
        let first = s.drain_messages(1.0);
        assert_eq!(first.len(), 2);
        assert!(matches!(first[0], GameMessage::GameReady { .. }));
        assert!(matches!(
            first[1],
            GameMessage::GameState {
                game_started: false,
                ..
            }
        ));
        assert!(s.drain_messages(2.0).is_empty());

        s.start_game();
        let msgs = s.drain_messages(3.0);
        assert!(matches!(
            msgs.as_slice(),
            [GameMessage::GameState {
                game_started: true,
                game_over: false,
                ..
            }]
        ));
    }

    #[test]
    fn test_host_json() {
        let mut s = session();
        assert!(s.handle_host_json(r#"{"type":"START_GAME","timestamp":0}"#));
        assert!(s.state().game_started);
        assert!(s.handle_host_json(r#"{"type":"DIRECTION_CHANGE","direction":"DOWN","timestamp":1}"#));
        assert_eq!(s.effective_direction(), Direction::Down);
        assert!(!s.handle_host_json(r#"{"type":"DIRECTION_CHANGE","direction":"SIDEWAYS"}"#));
        assert_eq!(s.effective_direction(), Direction::Down);
    }

    #[test]
    fn test_death_opens_trivia_and_stops_input() {
        let mut s = session();
        s.start_game();
        run_into_wall(&mut s);
        assert_eq!(s.state().death_reason, Some(DeathReason::Wall));
        assert!(matches!(s.state().trivia.phase, TriviaPhase::Active { .. }));
        assert_eq!(s.change_direction(Direction::Up), EnqueueResult::Rejected);
        assert!(s.high_scores().is_empty());
    }

    #[test]
    fn test_correct_answer_revives() {
        let mut s = session();
        s.start_game();
        run_into_wall(&mut s);
        let question = s.state().trivia.question().map(|q| q.answer);
        let answer = question.unwrap_or(TRIVIA_QUESTIONS[0].answer);
        assert!(s.answer_trivia(answer));
        assert!(!s.answer_trivia(answer));
        for i in 0..crate::consts::TRIVIA_RESULT_TICKS {
            s.step(100.0 + i as f64);
        }
        assert!(!s.state().game_over);
        assert_eq!(s.state().trivia.phase, TriviaPhase::Resolved { revived: true });
        assert_eq!(s.effective_direction(), s.state().direction);
    }

    #[test]
    fn test_final_score_recorded_once() {
        let settings = Settings {
            trivia_enabled: false,
            ..Settings::default()
        };
        let mut s = GameSession::new(settings, 7);
        s.start_game();
        s.state.score = 30;
        run_into_wall(&mut s);
        assert_eq!(s.state().trivia.phase, TriviaPhase::Resolved { revived: false });
        assert_eq!(s.high_scores().entries.len(), 1);
        assert!(s.high_scores().top_score().is_some_and(|top| top >= 30));
        s.step(99.0);
        assert_eq!(s.high_scores().entries.len(), 1);
    }

    #[test]
    fn test_reset_during_trivia_records_score() {
        let mut s = GameSession::new(Settings::default(), 5);
        s.start_game();
        s.state.score = 90;
        run_into_wall(&mut s);
        assert!(matches!(s.state().trivia.phase, TriviaPhase::Active { .. }));
        assert!(s.high_scores().is_empty());

        s.reset_game();
        assert!(!s.state().game_over);
        assert_eq!(s.high_scores().entries.len(), 1);
        assert!(s.high_scores().top_score().is_some_and(|top| top >= 90));

        // A game that never ended adds nothing
        s.reset_game();
        assert_eq!(s.high_scores().entries.len(), 1);
    }

    #[test]
    fn test_start_during_trivia_records_score() {
        let mut s = GameSession::new(Settings::default(), 9);
        s.start_game();
        s.state.score = 40;
        run_into_wall(&mut s);
        s.start_game();
        assert_eq!(s.state().tick_count, 0);
        assert_eq!(s.high_scores().entries.len(), 1);
    }

    #[test]
    fn test_start_after_game_over_resets() {
        let settings = Settings {
            trivia_enabled: false,
            ..Settings::default()
        };
        let mut s = GameSession::new(settings, 3);
        s.start_game();
        run_into_wall(&mut s);
        s.start_game();
        assert!(!s.state().game_over);
        assert!(s.state().game_started);
        assert_eq!(s.state().tick_count, 0);
    }

    #[test]
    fn test_immortal_setting_wraps() {
        let settings = Settings {
            immortal: true,
            ..Settings::default()
        };
        let mut s = GameSession::new(settings, 11);
        s.start_game();
        for i in 0..15 {
            s.step(i as f64);
        }
        assert!(!s.state().game_over);
        assert!(s.state().immortal_saves >= 1);
    }

    #[test]
    fn test_interval_follows_speed() {
        let mut s = session();
        assert_eq!(s.tick_interval_ms(), crate::consts::BASE_TICK_MS);
        s.state.active_power_ups = crate::sim::powerup::activate_power_up(&[], PowerUpKind::Speed, 0, 10);
        assert_eq!(s.tick_interval_ms(), crate::consts::SPEED_TICK_MS);
    }
}
