use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// What a scheduled callback does when it fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Shows the next cell of the reveal phase.
    RevealStep,
    /// Pause after the last revealed cell, then ready to guess.
    RevealSettle,
    /// One second of the guess countdown.
    GuessTick,
    /// One second of the hint delay.
    HintTick,
    /// One second of the post-win countdown.
    NextLevelTick,
    /// Clears the wrong-cell highlight.
    WrongCellClear,
}

/// Identity of one scheduled callback.
///
/// `generation` changes with every new round, so a token handed out for an
/// earlier round can never match an active timer again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub generation: u32,
    pub serial: u32,
    pub kind: TimerKind,
}

/// Request from the engine to whoever owns the real clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerCommand {
    Schedule {
        token: TimerToken,
        delay_ms: u32,
        /// Fire every `delay_ms` until cancelled instead of once.
        repeat: bool,
    },
    Cancel(TimerToken),
}

/// Something driven by timer callbacks.
pub trait TimerTarget {
    /// Delivers an elapsed timer. Returns whether anything changed; stale or
    /// cancelled tokens are ignored.
    fn fire(&mut self, token: TimerToken) -> bool;

    /// Drains the commands produced since the last call.
    fn take_timer_commands(&mut self) -> Vec<TimerCommand>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingTimer {
    token: TimerToken,
    due_ms: u64,
    period_ms: Option<u32>,
    order: u64,
}

/// Deterministic clock for driving a [`TimerTarget`] without a browser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VirtualScheduler {
    now_ms: u64,
    next_order: u64,
    pending: Vec<PendingTimer>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|timer| timer.token.kind == kind)
    }

    pub fn apply(&mut self, commands: impl IntoIterator<Item = TimerCommand>) {
        for command in commands {
            match command {
                TimerCommand::Schedule {
                    token,
                    delay_ms,
                    repeat,
                } => {
                    let delay_ms = delay_ms.max(1);
                    let order = self.bump_order();
                    self.pending.push(PendingTimer {
                        token,
                        due_ms: self.now_ms + u64::from(delay_ms),
                        period_ms: repeat.then_some(delay_ms),
                        order,
                    });
                }
                TimerCommand::Cancel(token) => self.pending.retain(|timer| timer.token != token),
            }
        }
    }

    /// Moves the clock forward by `ms`, firing every timer that falls due in
    /// order. Timers due at the same instant fire in the order they were
    /// scheduled.
    pub fn advance<T: TimerTarget>(&mut self, ms: u64, target: &mut T) {
        let end_ms = self.now_ms + ms;
        self.apply(target.take_timer_commands());

        while let Some(position) = self.next_due(end_ms) {
            let timer = self.pending[position];
            self.now_ms = timer.due_ms;

            match timer.period_ms {
                Some(period_ms) => {
                    let order = self.bump_order();
                    let rearmed = &mut self.pending[position];
                    rearmed.due_ms += u64::from(period_ms);
                    rearmed.order = order;
                }
                None => {
                    self.pending.remove(position);
                }
            }

            log::trace!("virtual timer fired at {}ms: {:?}", self.now_ms, timer.token);
            target.fire(timer.token);
            self.apply(target.take_timer_commands());
        }

        self.now_ms = end_ms;
    }

    fn next_due(&self, end_ms: u64) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= end_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.order))
            .map(|(position, _)| position)
    }

    fn bump_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Default)]
    struct Recorder {
        fired: Vec<(TimerKind, u32)>,
        queued: Vec<TimerCommand>,
    }

    impl TimerTarget for Recorder {
        fn fire(&mut self, token: TimerToken) -> bool {
            self.fired.push((token.kind, token.serial));
            true
        }

        fn take_timer_commands(&mut self) -> Vec<TimerCommand> {
            core::mem::take(&mut self.queued)
        }
    }

    fn token(serial: u32, kind: TimerKind) -> TimerToken {
        TimerToken {
            generation: 1,
            serial,
            kind,
        }
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut scheduler = VirtualScheduler::new();
        let mut recorder = Recorder::default();
        recorder.queued = vec![
            TimerCommand::Schedule {
                token: token(1, TimerKind::RevealSettle),
                delay_ms: 500,
                repeat: false,
            },
            TimerCommand::Schedule {
                token: token(2, TimerKind::RevealStep),
                delay_ms: 200,
                repeat: false,
            },
        ];

        scheduler.advance(1000, &mut recorder);

        assert_eq!(
            recorder.fired,
            vec![(TimerKind::RevealStep, 2), (TimerKind::RevealSettle, 1)]
        );
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.now_ms(), 1000);
    }

    #[test]
    fn repeating_timer_rearms_until_cancelled() {
        let mut scheduler = VirtualScheduler::new();
        let mut recorder = Recorder::default();
        let tick = token(1, TimerKind::GuessTick);
        recorder.queued = vec![TimerCommand::Schedule {
            token: tick,
            delay_ms: 1000,
            repeat: true,
        }];

        scheduler.advance(3500, &mut recorder);
        assert_eq!(recorder.fired.len(), 3);
        assert!(scheduler.is_scheduled(TimerKind::GuessTick));

        scheduler.apply([TimerCommand::Cancel(tick)]);
        scheduler.advance(5000, &mut recorder);
        assert_eq!(recorder.fired.len(), 3);
    }
}
