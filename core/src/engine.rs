use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No round has been started yet.
    #[default]
    Start,
    /// The first cells of the sequence are being revealed.
    Showing,
    /// Reveal finished, waiting for the player to start guessing.
    ReadyToGuess,
    Guessing,
    Won,
    /// A wrong cell was selected.
    GameOver,
    /// The guess countdown ran out.
    TimeOver,
    /// The last level was won and progress was reset.
    GameCompleted,
}

impl Phase {
    pub const fn is_finished(self) -> bool {
        matches!(
            self,
            Self::Won | Self::GameOver | Self::TimeOver | Self::GameCompleted
        )
    }

    pub const fn is_failure(self) -> bool {
        matches!(self, Self::GameOver | Self::TimeOver)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintState {
    #[default]
    Idle,
    /// Hint requested, the guess countdown is frozen while this runs down.
    Pending { remaining_secs: u32 },
    /// Hint text is visible; the countdown stays frozen until it is closed.
    Shown,
}

impl HintState {
    pub const fn freezes_countdown(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Result of [`RoundEngine::submit_guess`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not guessing right now, nothing happened.
    Ignored,
    Correct,
    /// The final cell was guessed and the round is won.
    Completed,
    Wrong,
}

impl GuessOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct RoundState {
    phase: Phase,
    level_index: usize,
    revealed: Sequence,
    guessed: Sequence,
    guess_cursor: usize,
    time_remaining: u32,
    countdown: u32,
    wrong_cell: Option<Cell>,
    hint: HintState,
}

impl RoundState {
    fn new(level_index: usize, guess_time_secs: u32) -> Self {
        Self {
            level_index,
            time_remaining: guess_time_secs,
            ..Self::default()
        }
    }
}

/// Read-only view of the round, produced after every transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub level_index: usize,
    pub display_number: u32,
    pub level_count: usize,
    pub grid_size: u8,
    pub revealed_cells: Sequence,
    pub guessed_cells: Sequence,
    pub guess_cursor: usize,
    pub time_remaining: u32,
    pub guess_time: u32,
    /// Seconds until the next level starts, meaningful in [`Phase::Won`].
    pub countdown: u32,
    pub wrong_cell: Option<Cell>,
    pub hint: HintState,
    /// Only present while the hint is shown.
    pub hint_text: Option<String>,
    pub hints_enabled: bool,
}

impl RoundSnapshot {
    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.revealed_cells.contains(&cell)
    }

    pub fn is_guessed(&self, cell: Cell) -> bool {
        self.guessed_cells.contains(&cell)
    }
}

type Listener = Box<dyn FnMut(&RoundSnapshot)>;

/// Round state machine for one screen.
///
/// The engine never touches a clock. It emits [`TimerCommand`]s, the host
/// runs them, and elapsed timers come back through [`TimerTarget::fire`].
pub struct RoundEngine<S> {
    ladder: Ladder<S>,
    config: EngineConfig,
    round: RoundState,
    generation: u32,
    next_serial: u32,
    /// Live timers and whether they repeat.
    active: HashMap<TimerToken, bool>,
    commands: Vec<TimerCommand>,
    listeners: Vec<Listener>,
}

impl<S: ProgressStore> RoundEngine<S> {
    pub fn new(ladder: Ladder<S>, config: EngineConfig) -> Self {
        let config = config.sanitized();
        let round = RoundState::new(ladder.unlocked_index(), config.guess_time_secs);
        Self {
            ladder,
            config,
            round,
            generation: 0,
            next_serial: 0,
            active: HashMap::new(),
            commands: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn ladder(&self) -> &Ladder<S> {
        &self.ladder
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    pub fn level_index(&self) -> usize {
        self.round.level_index
    }

    pub fn level(&self) -> &Level {
        self.ladder.level(self.round.level_index)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Registers a callback that receives a snapshot after every transition.
    pub fn subscribe(&mut self, listener: impl FnMut(&RoundSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let level = self.level();
        let round = &self.round;
        RoundSnapshot {
            phase: round.phase,
            level_index: round.level_index,
            display_number: level.display_number(),
            level_count: self.ladder.len(),
            grid_size: level.grid_size(),
            revealed_cells: round.revealed.clone(),
            guessed_cells: round.guessed.clone(),
            guess_cursor: round.guess_cursor,
            time_remaining: round.time_remaining,
            guess_time: self.config.guess_time_secs,
            countdown: round.countdown,
            wrong_cell: round.wrong_cell,
            hint: round.hint,
            hint_text: matches!(round.hint, HintState::Shown).then(|| level.hint().into()),
            hints_enabled: self.config.hints_enabled(),
        }
    }

    /// Starts the level the player has unlocked.
    pub fn resume(&mut self) -> bool {
        self.start_round(self.ladder.unlocked_index())
    }

    /// Starts a fresh round, cancelling everything left over from the
    /// previous one. Out of range indices are clamped onto the ladder.
    pub fn start_round(&mut self, level_index: usize) -> bool {
        let level_index = self.ladder.clamp_index(level_index);
        self.cancel_all();
        self.generation = self.generation.wrapping_add(1);
        self.round = RoundState::new(level_index, self.config.guess_time_secs);
        self.round.phase = Phase::Showing;
        log::debug!(
            "round {} started on level {}",
            self.generation,
            self.level().display_number()
        );
        self.schedule(TimerKind::RevealStep, self.config.reveal_delay_ms, false);
        self.emit();
        true
    }

    pub fn start_guessing(&mut self) -> bool {
        if self.round.phase != Phase::ReadyToGuess {
            return false;
        }
        self.set_phase(Phase::Guessing);
        self.schedule(TimerKind::GuessTick, TICK_MS, true);
        self.emit();
        true
    }

    /// Judges one selected cell. Only meaningful while guessing; anything
    /// that is not the next cell of the sequence counts as wrong.
    pub fn submit_guess(&mut self, cell: Cell) -> GuessOutcome {
        if self.round.phase != Phase::Guessing {
            log::trace!("guess {} ignored in {:?}", cell, self.round.phase);
            return GuessOutcome::Ignored;
        }

        let target = self.level().guess_target(self.round.guess_cursor);
        let outcome = if target == Some(cell) {
            let round = &mut self.round;
            round.revealed.push(cell);
            round.guessed.push(cell);
            round.guess_cursor += 1;
            round.time_remaining = self.config.guess_time_secs;

            if round.guess_cursor == GUESS_DOTS {
                self.complete_round();
                GuessOutcome::Completed
            } else {
                GuessOutcome::Correct
            }
        } else {
            self.round.wrong_cell = Some(cell);
            self.schedule(
                TimerKind::WrongCellClear,
                self.config.wrong_cell_display_ms,
                false,
            );
            self.end_guessing(Phase::GameOver);
            GuessOutcome::Wrong
        };

        self.emit();
        outcome
    }

    /// Asks for the level hint. The countdown freezes while the hint delay
    /// runs; requests while a hint is pending or shown are ignored.
    pub fn request_hint(&mut self) -> bool {
        if !self.config.hints {
            return false;
        }
        let delay_secs = self.config.hint_delay_secs;
        if self.round.phase != Phase::Guessing || self.round.hint != HintState::Idle {
            return false;
        }

        self.cancel_kind(TimerKind::GuessTick);
        self.round.hint = HintState::Pending {
            remaining_secs: delay_secs,
        };
        log::debug!("hint requested, revealing in {}s", delay_secs);
        self.schedule(TimerKind::HintTick, TICK_MS, true);
        self.emit();
        true
    }

    /// Hides a shown hint and resumes the countdown where it stopped.
    pub fn close_hint(&mut self) -> bool {
        if self.round.hint != HintState::Shown {
            return false;
        }
        self.round.hint = HintState::Idle;
        if self.round.phase == Phase::Guessing {
            self.schedule(TimerKind::GuessTick, TICK_MS, true);
        }
        self.emit();
        true
    }

    /// Moves on after a win without waiting for the countdown, or starts a
    /// new playthrough after the game was completed.
    pub fn next_level(&mut self) -> bool {
        match self.round.phase {
            Phase::Won => {
                let next = self
                    .ladder
                    .advance(self.round.level_index, self.config.advance_policy);
                self.start_round(next)
            }
            Phase::GameCompleted => self.start_round(0),
            _ => false,
        }
    }

    /// Replays the current level. Failed attempts never touch progress.
    pub fn retry(&mut self) -> bool {
        use Phase::*;
        match self.round.phase {
            ReadyToGuess | Guessing | GameOver | TimeOver => self.start_round(self.round.level_index),
            Start | Showing | Won | GameCompleted => false,
        }
    }

    /// Jumps to the previous or next level of the ladder.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let target =
            self.ladder
                .navigate(self.round.level_index, direction, self.config.navigation);
        self.start_round(target)
    }

    /// Cancels every outstanding timer, for when the screen goes away.
    pub fn shutdown(&mut self) {
        self.cancel_all();
        self.generation = self.generation.wrapping_add(1);
        log::debug!("engine shut down");
    }

    fn on_timer(&mut self, kind: TimerKind) -> bool {
        use TimerKind::*;
        match kind {
            RevealStep => self.reveal_step(),
            RevealSettle => {
                if self.round.phase != Phase::Showing {
                    return false;
                }
                self.set_phase(Phase::ReadyToGuess);
                true
            }
            GuessTick => self.guess_tick(),
            HintTick => self.hint_tick(),
            NextLevelTick => self.next_level_tick(),
            WrongCellClear => self.round.wrong_cell.take().is_some(),
        }
    }

    fn reveal_step(&mut self) -> bool {
        if self.round.phase != Phase::Showing {
            return false;
        }

        let step = self.round.revealed.len();
        let Some(&cell) = self.level().shown().get(step) else {
            return false;
        };
        self.round.revealed.push(cell);
        log::trace!("revealed cell {} ({}/{})", cell, step + 1, INITIAL_DOTS);

        let next = if self.round.revealed.len() < INITIAL_DOTS {
            TimerKind::RevealStep
        } else {
            TimerKind::RevealSettle
        };
        self.schedule(next, self.config.reveal_delay_ms, false);
        true
    }

    fn guess_tick(&mut self) -> bool {
        if self.round.phase != Phase::Guessing || self.round.hint.freezes_countdown() {
            return false;
        }

        self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
        if self.round.time_remaining == 0 {
            self.end_guessing(Phase::TimeOver);
        }
        true
    }

    fn hint_tick(&mut self) -> bool {
        let HintState::Pending { remaining_secs } = self.round.hint else {
            return false;
        };

        let remaining_secs = remaining_secs.saturating_sub(1);
        self.round.hint = if remaining_secs == 0 {
            self.cancel_kind(TimerKind::HintTick);
            log::debug!("hint revealed");
            HintState::Shown
        } else {
            HintState::Pending { remaining_secs }
        };
        true
    }

    fn next_level_tick(&mut self) -> bool {
        if self.round.phase != Phase::Won {
            return false;
        }

        self.round.countdown = self.round.countdown.saturating_sub(1);
        if self.round.countdown == 0 {
            self.cancel_kind(TimerKind::NextLevelTick);
            let next = self
                .ladder
                .advance(self.round.level_index, self.config.advance_policy);
            self.start_round(next);
        }
        true
    }

    fn complete_round(&mut self) {
        let index = self.round.level_index;

        if self.ladder.is_last(index) && self.config.on_last_level == LastLevelPolicy::CompleteAndReset
        {
            self.end_guessing(Phase::GameCompleted);
            self.ladder.reset();
            return;
        }

        self.end_guessing(Phase::Won);
        let next = self.ladder.advance(index, self.config.advance_policy);
        self.ladder.record_progress(next);
        self.round.countdown = self.config.next_level_delay_secs;
        self.schedule(TimerKind::NextLevelTick, TICK_MS, true);
    }

    /// Leaves the guess phase: stops the countdown and drops any hint.
    fn end_guessing(&mut self, phase: Phase) {
        self.cancel_kind(TimerKind::GuessTick);
        self.cancel_kind(TimerKind::HintTick);
        self.round.hint = HintState::Idle;
        self.set_phase(phase);
    }

    fn set_phase(&mut self, phase: Phase) {
        log::debug!("phase {:?} -> {:?}", self.round.phase, phase);
        self.round.phase = phase;
    }

    fn schedule(&mut self, kind: TimerKind, delay_ms: u32, repeat: bool) -> TimerToken {
        let token = TimerToken {
            generation: self.generation,
            serial: self.next_serial,
            kind,
        };
        self.next_serial = self.next_serial.wrapping_add(1);
        self.active.insert(token, repeat);
        self.commands.push(TimerCommand::Schedule {
            token,
            delay_ms,
            repeat,
        });
        token
    }

    fn cancel_kind(&mut self, kind: TimerKind) {
        let cancelled: Vec<_> = self
            .active
            .keys()
            .filter(|token| token.kind == kind)
            .copied()
            .collect();
        for token in cancelled {
            self.active.remove(&token);
            self.commands.push(TimerCommand::Cancel(token));
        }
    }

    fn cancel_all(&mut self) {
        self.commands
            .extend(self.active.drain().map(|(token, _)| TimerCommand::Cancel(token)));
    }

    fn emit(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl<S: ProgressStore> TimerTarget for RoundEngine<S> {
    fn fire(&mut self, token: TimerToken) -> bool {
        let Some(&repeat) = self.active.get(&token) else {
            log::trace!("stale timer ignored: {:?}", token);
            return false;
        };
        if !repeat {
            self.active.remove(&token);
        }

        let generation = self.generation;
        let updated = self.on_timer(token.kind);
        // a new round has already emitted its own snapshot
        if updated && generation == self.generation {
            self.emit();
        }
        updated
    }

    fn take_timer_commands(&mut self) -> Vec<TimerCommand> {
        core::mem::take(&mut self.commands)
    }
}

impl<S: fmt::Debug> fmt::Debug for RoundEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundEngine")
            .field("ladder", &self.ladder)
            .field("config", &self.config)
            .field("round", &self.round)
            .field("generation", &self.generation)
            .field("active_timers", &self.active.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
