use rand::{self, Rng};
use rand::rngs::ThreadRng;

use device::{Clock, Joystick, Screen, Sensors};
use display::{colors, SIZE};
use font::BwFont;
use imu::Vector3;
use scroll::{ScrollConfig, ScrollText};

use std::time::Duration;

/// Tunables of the side scroller.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Tick interval at the start of a round.
    pub initial_speed: Duration,
    /// How much faster a tick gets on each ramp.
    pub speed_step: Duration,
    /// Ticks never get shorter than this.
    pub min_speed: Duration,
    /// The speed ramps every time the score reaches a multiple of this.
    pub ramp_every: u32,
    /// Column enemies come back at after leaving the screen.
    pub respawn_x: i32,
    /// Vertical tilt in g needed to move the player.
    pub tilt_threshold: f64,
    /// Where the player appears at the start of a round.
    pub player_start: (i32, i32),
    /// Where the enemies appear at the start of a round.
    pub enemy_starts: Vec<(i32, i32)>,
    /// Green/red flashes when the player dies.
    pub blink_count: u32,
    /// Time each flash stays on screen.
    pub blink_interval: Duration,
    /// How often the joystick is polled while paused.
    pub pause_poll: Duration,
    /// How the score is scrolled after a round.
    pub scroll: ScrollConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            initial_speed: Duration::from_millis(800),
            speed_step: Duration::from_millis(100),
            min_speed: Duration::from_millis(100),
            ramp_every: 5,
            respawn_x: 20,
            tilt_threshold: 0.1,
            player_start: (0, 4),
            enemy_starts: vec![(8, 3), (12, 5), (16, 7), (20, 3), (24, 6), (28, 2)],
            blink_count: 4,
            blink_interval: Duration::from_millis(300),
            pause_poll: Duration::from_millis(10),
            scroll: ScrollConfig::default(),
        }
    }
}

/// The dot the player steers. It stays in column 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Player { x, y }
    }

    /// Moves one row along the tilt, if the tilt is past `threshold`.
    pub fn apply_tilt(&mut self, tilt: &Vector3, threshold: f64) {
        if tilt.y >= threshold {
            self.y += 1;
        } else if tilt.y <= -threshold {
            self.y -= 1;
        }
        self.y = clamp_row(self.y);
    }

    pub fn is_dead(&self, enemies: &[Enemy]) -> bool {
        is_dead(self, enemies)
    }
}

fn clamp_row(y: i32) -> i32 {
    if y < 0 {
        0
    } else if y > SIZE as i32 - 1 {
        SIZE as i32 - 1
    } else {
        y
    }
}

/// True if an enemy sits exactly on the player.
pub fn is_dead(player: &Player, enemies: &[Enemy]) -> bool {
    enemies.iter().any(|e| e.x == player.x && e.y == player.y)
}

/// An obstacle flying right to left.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32) -> Self {
        Enemy { x, y }
    }

    /// Moves one column left. An enemy that leaves the screen comes back at
    /// `respawn_x` on a random row, and this returns true.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, respawn_x: i32) -> bool {
        self.x -= 1;
        if self.x < 0 {
            self.x = respawn_x;
            self.y = rng.random_range(0..SIZE as i32);
            true
        } else {
            false
        }
    }

    pub fn is_visible(&self) -> bool {
        self.x >= 0 && self.x < SIZE as i32
    }
}

/// Counters that live for the whole run of the program.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    score: u32,
    speed: Duration,
    high_score: u32,
    initial_speed: Duration,
    speed_step: Duration,
    min_speed: Duration,
    ramp_every: u32,
}

/// How a round ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub score: u32,
    pub new_high_score: bool,
}

impl GameOver {
    /// The text scrolled after the round.
    pub fn message(&self) -> String {
        let mut message = format!("Game Over! Score: {}!", self.score);
        if self.new_high_score {
            message.push_str(" New High Score !!!");
        }
        message
    }
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Session {
            score: 0,
            speed: config.initial_speed,
            high_score: 0,
            initial_speed: config.initial_speed,
            speed_step: config.speed_step,
            min_speed: config.min_speed,
            ramp_every: config.ramp_every.max(1),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current tick interval.
    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Resets score and speed. The high score is kept.
    pub fn start_round(&mut self) {
        self.score = 0;
        self.speed = self.initial_speed;
    }

    /// Counts an enemy that made it past the player, speeding up the game on
    /// every `ramp_every` points.
    pub fn record_respawn(&mut self) {
        self.score += 1;
        if self.score % self.ramp_every == 0 && self.speed > self.min_speed {
            self.speed = self.speed
                .checked_sub(self.speed_step)
                .map_or(self.min_speed, |s| s.max(self.min_speed));
            debug!("score {}: tick is now {:?}", self.score, self.speed);
        }
    }

    /// Closes the round, updating the high score.
    pub fn finish_round(&mut self) -> GameOver {
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        GameOver { score: self.score, new_high_score }
    }
}

/// The entities of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub player: Player,
    pub enemies: Vec<Enemy>,
}

impl Round {
    pub fn new(config: &GameConfig) -> Self {
        let (px, py) = config.player_start;
        Round {
            player: Player::new(px, py),
            enemies: config.enemy_starts.iter().map(|&(x, y)| Enemy::new(x, y)).collect(),
        }
    }
}

/// Where the game is between rounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    NewRound,
    Playing,
    Dying,
    ScoreDisplay,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Alive,
    Dead,
}

/// Dodge the red dots by tilting the board.
pub struct SideScroller<H, R = ThreadRng> {
    hat: H,
    rng: R,
    font: BwFont,
    config: GameConfig,
    session: Session,
    round: Round,
}

impl<H> SideScroller<H, ThreadRng>
    where H: Screen + Joystick + Sensors + Clock
{
    pub fn new(hat: H, font: BwFont) -> Self {
        SideScroller::with_rng(hat, font, GameConfig::default(), rand::rng())
    }
}

impl<H, R> SideScroller<H, R>
    where H: Screen + Joystick + Sensors + Clock,
          R: Rng
{
    pub fn with_rng(hat: H, font: BwFont, config: GameConfig, rng: R) -> Self {
        SideScroller {
            hat,
            rng,
            font,
            session: Session::new(&config),
            round: Round::new(&config),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Plays round after round, forever.
    pub fn run(&mut self) -> ! {
        let mut phase = Phase::NewRound;
        loop {
            phase = self.step(phase);
        }
    }

    /// Runs one phase and returns the next.
    pub fn step(&mut self, phase: Phase) -> Phase {
        match phase {
            Phase::NewRound => {
                self.start_round();
                Phase::Playing
            }
            Phase::Playing => match self.tick() {
                TickOutcome::Alive => Phase::Playing,
                TickOutcome::Dead => Phase::Dying,
            },
            Phase::Dying => {
                self.blink_player();
                Phase::ScoreDisplay
            }
            Phase::ScoreDisplay => {
                self.show_score();
                Phase::NewRound
            }
        }
    }

    /// Plays a single round to the end and returns its score. The high score
    /// is not updated.
    pub fn play_round(&mut self) -> u32 {
        let mut phase = self.step(Phase::NewRound);
        while phase == Phase::Playing {
            phase = self.step(phase);
        }
        self.session.score()
    }

    fn start_round(&mut self) {
        self.session.start_round();
        self.round = Round::new(&self.config);
        self.hat.clear();
        info!("new round, high score {}", self.session.high_score());
    }

    /// Samples the tilt, moves everything one step, draws and waits.
    pub fn tick(&mut self) -> TickOutcome {
        let tilt = self.hat.acceleration().unwrap_or_default();

        self.hat.clear();
        self.round.player.apply_tilt(&tilt, self.config.tilt_threshold);
        let player = self.round.player;
        self.hat.set_pixel(player.x, player.y, colors::GREEN);

        for enemy in self.round.enemies.iter_mut() {
            if enemy.advance(&mut self.rng, self.config.respawn_x) {
                self.session.record_respawn();
            }
            if !enemy.is_visible() {
                continue;
            }
            self.hat.set_pixel(enemy.x, enemy.y, colors::RED);
        }

        self.hat.update();
        self.hat.sleep(self.session.speed());

        if self.round.player.is_dead(&self.round.enemies) {
            info!("player hit at row {} with score {}", player.y, self.session.score());
            return TickOutcome::Dead;
        }

        if self.hat.poll_enter() {
            self.pause();
        }
        TickOutcome::Alive
    }

    /// Blocks until the middle button is pressed again.
    fn pause(&mut self) {
        info!("paused");
        while !self.hat.poll_enter() {
            self.hat.sleep(self.config.pause_poll);
        }
        info!("resumed");
    }

    fn blink_player(&mut self) {
        let player = self.round.player;
        let interval = self.config.blink_interval;

        self.hat.clear();
        self.hat.update();
        self.hat.sleep(interval);

        for _ in 0..self.config.blink_count {
            for &color in &[colors::GREEN, colors::RED] {
                self.hat.set_pixel(player.x, player.y, color);
                self.hat.update();
                self.hat.sleep(interval);
            }
        }
    }

    fn show_score(&mut self) -> GameOver {
        let over = self.session.finish_round();
        if over.new_high_score {
            info!("new high score {}", over.score);
        }
        ScrollText::new(&mut self.hat, &self.font, self.config.scroll).run(&over.message());
        self.hat.clear();
        self.hat.update();
        over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use display::Frame;
    use mock::MockHat;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn game(hat: MockHat, config: GameConfig) -> SideScroller<MockHat, StdRng> {
        SideScroller::with_rng(hat, BwFont::builtin().unwrap(), config, StdRng::seed_from_u64(7))
    }

    fn flat() -> Vector3 {
        Vector3::new(0.0, 0.0, 1.0)
    }

    #[test]
    fn player_moves_one_row_per_tilt() {
        let mut player = Player::new(0, 4);
        player.apply_tilt(&Vector3::new(0.0, 0.1, 1.0), 0.1);
        assert_eq!(player.y, 5);
        player.apply_tilt(&Vector3::new(0.0, -0.5, 1.0), 0.1);
        assert_eq!(player.y, 4);
        player.apply_tilt(&Vector3::new(0.0, 0.09, 1.0), 0.1);
        assert_eq!(player.y, 4);
        player.apply_tilt(&flat(), 0.1);
        assert_eq!(player, Player::new(0, 4));
    }

    #[test]
    fn player_is_clamped_to_the_screen() {
        let mut player = Player::new(0, 7);
        player.apply_tilt(&Vector3::new(0.0, 1.0, 0.0), 0.1);
        assert_eq!(player.y, 7);
        let mut player = Player::new(0, 0);
        player.apply_tilt(&Vector3::new(0.0, -1.0, 0.0), 0.1);
        assert_eq!(player.y, 0);
    }

    #[test]
    fn enemy_on_the_player_kills() {
        let player = Player::new(0, 3);
        assert!(is_dead(&player, &[Enemy::new(0, 3)]));
        assert!(player.is_dead(&[Enemy::new(5, 1), Enemy::new(0, 3)]));
        assert!(!player.is_dead(&[Enemy::new(1, 3), Enemy::new(0, 2)]));
        assert!(!player.is_dead(&[]));
    }

    #[test]
    fn speed_ramps_every_five_points() {
        let mut session = Session::new(&GameConfig::default());
        let mut speeds = Vec::new();
        for _ in 0..50 {
            session.record_respawn();
            if session.score() % 5 == 0 {
                speeds.push(session.speed().as_millis());
            }
        }
        assert_eq!(speeds, vec![700, 600, 500, 400, 300, 200, 100, 100, 100, 100]);
    }

    #[test]
    fn high_score_survives_rounds() {
        let mut session = Session::new(&GameConfig::default());
        for _ in 0..7 {
            session.record_respawn();
        }
        let first = session.finish_round();
        assert_eq!(first, GameOver { score: 7, new_high_score: true });
        assert_eq!(first.message(), "Game Over! Score: 7! New High Score !!!");

        session.start_round();
        assert_eq!(session.score(), 0);
        assert_eq!(session.speed(), Duration::from_millis(800));
        session.record_respawn();
        let second = session.finish_round();
        assert_eq!(second.message(), "Game Over! Score: 1!");
        assert_eq!(session.high_score(), 7);

        session.start_round();
        for _ in 0..7 {
            session.record_respawn();
        }
        assert!(!session.finish_round().new_high_score);
    }

    #[test]
    fn collision_ends_the_round_on_the_first_tick() {
        let config = GameConfig {
            player_start: (0, 3),
            enemy_starts: vec![(1, 3)],
            ..GameConfig::default()
        };
        let mut game = game(MockHat::new(), config);

        assert_eq!(game.play_round(), 0);
        assert_eq!(game.round().enemies, vec![Enemy::new(0, 3)]);
        assert_eq!(game.hat.sleeps, vec![Duration::from_millis(800)]);
        // The joystick is not polled on the tick the player dies.
        assert_eq!(game.hat.polls, 0);
    }

    #[test]
    fn tick_draws_player_and_visible_enemies() {
        let mut hat = MockHat::new();
        hat.tilt(0.5);
        let mut game = game(hat, GameConfig::default());
        game.step(Phase::NewRound);

        assert_eq!(game.tick(), TickOutcome::Alive);

        let frame = game.hat.frames[0];
        assert_eq!(frame.pixel(0, 5), Some(colors::GREEN));
        assert_eq!(frame.pixel(7, 3), Some(colors::RED));
        let lit = (0..8)
            .flat_map(|x| (0..8).map(move |y| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) != Some(colors::BLACK))
            .count();
        assert_eq!(lit, 2);
        assert_eq!(game.round().enemies[5], Enemy::new(27, 2));
    }

    #[test]
    fn passing_enemies_score_and_respawn() {
        let config = GameConfig {
            player_start: (0, 0),
            enemy_starts: vec![(1, 5)],
            ..GameConfig::default()
        };
        let mut hat = MockHat::new();
        // Keep the player pinned to the top row.
        for _ in 0..4 {
            hat.tilt(-1.0);
        }
        let mut game = game(hat, config);
        game.step(Phase::NewRound);

        game.tick();
        assert_eq!(game.round().enemies[0].x, 0);
        assert_eq!(game.session().score(), 0);
        game.tick();
        let enemy = game.round().enemies[0];
        assert_eq!(enemy.x, 20);
        assert!(enemy.y >= 0 && enemy.y < 8);
        assert_eq!(game.session().score(), 1);
    }

    #[test]
    fn middle_button_pauses_until_pressed_again() {
        let mut hat = MockHat::new();
        hat.press_on_poll(1);
        hat.press_on_poll(5);
        let mut game = game(hat, GameConfig::default());
        game.step(Phase::NewRound);

        assert_eq!(game.tick(), TickOutcome::Alive);

        assert_eq!(game.hat.polls, 5);
        let pause = Duration::from_millis(10);
        assert_eq!(game.hat.sleeps, vec![Duration::from_millis(800), pause, pause, pause]);
    }

    #[test]
    fn dying_blinks_the_player_four_times() {
        let config = GameConfig {
            player_start: (0, 3),
            enemy_starts: vec![(1, 3)],
            ..GameConfig::default()
        };
        let mut game = game(MockHat::new(), config);
        let mut phase = game.step(Phase::NewRound);
        phase = game.step(phase);
        assert_eq!(phase, Phase::Dying);

        let before = game.hat.frames.len();
        assert_eq!(game.step(phase), Phase::ScoreDisplay);

        let frames = &game.hat.frames[before..];
        assert_eq!(frames.len(), 9);
        assert_eq!(frames[0], Frame::new());
        for (i, frame) in frames[1..].iter().enumerate() {
            let expected = if i % 2 == 0 { colors::GREEN } else { colors::RED };
            assert_eq!(frame.pixel(0, 3), Some(expected));
        }
        assert_eq!(&game.hat.sleeps[1..], &[Duration::from_millis(300); 9]);
    }

    #[test]
    fn score_display_scrolls_until_pressed_then_starts_over() {
        let config = GameConfig {
            player_start: (0, 3),
            enemy_starts: vec![(1, 3)],
            ..GameConfig::default()
        };
        let mut game = game(MockHat::new(), config);
        let mut phase = Phase::NewRound;
        while phase != Phase::ScoreDisplay {
            phase = game.step(phase);
        }
        // Pressed during the death blink: must not cut the score short.
        game.hat.queued_press = true;
        game.hat.press_on_poll(3);
        let before = game.hat.frames.len();

        assert_eq!(game.step(phase), Phase::NewRound);

        // Three scrolled frames, then the cleared screen.
        let frames = &game.hat.frames[before..];
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[3], Frame::new());
        assert_eq!(game.session().high_score(), 0);
    }

    #[test]
    fn rounds_end_with_a_seeded_rng() {
        let mut game = game(MockHat::new(), GameConfig::default());
        let score = game.play_round();
        assert_eq!(game.session().score(), score);
        assert!(game.round().player.is_dead(&game.round().enemies));
        assert_eq!(game.round().player, Player::new(0, 4));
    }

    proptest! {
        #[test]
        fn tilt_moves_at_most_one_row(y in 0i32..8, tilt in -2.0f64..2.0) {
            let mut player = Player::new(0, y);
            player.apply_tilt(&Vector3::new(0.0, tilt, 1.0), 0.1);
            let expected = if tilt >= 0.1 {
                (y + 1).min(7)
            } else if tilt <= -0.1 {
                (y - 1).max(0)
            } else {
                y
            };
            prop_assert_eq!(player.y, expected);
            prop_assert_eq!(player.x, 0);
        }

        #[test]
        fn enemies_move_one_column_or_respawn(x in 0i32..30, y in 0i32..8, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut enemy = Enemy::new(x, y);
            let respawned = enemy.advance(&mut rng, 20);
            if x == 0 {
                prop_assert!(respawned);
                prop_assert_eq!(enemy.x, 20);
                prop_assert!(enemy.y >= 0 && enemy.y < 8);
            } else {
                prop_assert!(!respawned);
                prop_assert_eq!(enemy, Enemy::new(x - 1, y));
            }
        }

        #[test]
        fn speed_only_ramps_down_on_multiples_of_five(respawns in 1u32..200) {
            let config = GameConfig::default();
            let mut session = Session::new(&config);
            let mut last = session.speed();
            for _ in 0..respawns {
                session.record_respawn();
                let speed = session.speed();
                prop_assert!(speed <= last);
                prop_assert!(speed >= config.min_speed);
                if speed < last {
                    prop_assert_eq!(session.score() % 5, 0);
                    prop_assert_eq!(last - speed, config.speed_step);
                }
                last = speed;
            }
        }
    }
}
