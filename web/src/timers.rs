use std::collections::HashMap;

use gloo::timers::callback::{Interval, Timeout};
use mirage_core::{TimerCommand, TimerToken};
use yew::Callback;

#[derive(Debug)]
enum Handle {
    Once(Timeout),
    Every(Interval),
}

/// Runs the engine's timer requests on real browser timers.
///
/// Each token owns its gloo handle, so dropping the handle cancels the
/// callback. The engine still ignores anything that slips through.
#[derive(Debug, Default)]
pub(crate) struct TimerHost {
    handles: HashMap<TimerToken, Handle>,
}

impl TimerHost {
    pub(crate) fn apply(&mut self, commands: Vec<TimerCommand>, on_fire: &Callback<TimerToken>) {
        for command in commands {
            match command {
                TimerCommand::Schedule {
                    token,
                    delay_ms,
                    repeat,
                } => {
                    let on_fire = on_fire.clone();
                    let handle = if repeat {
                        Handle::Every(Interval::new(delay_ms, move || on_fire.emit(token)))
                    } else {
                        Handle::Once(Timeout::new(delay_ms, move || on_fire.emit(token)))
                    };
                    log::trace!("scheduled {:?} in {}ms", token, delay_ms);
                    self.handles.insert(token, handle);
                }
                TimerCommand::Cancel(token) => {
                    if self.handles.remove(&token).is_some() {
                        log::trace!("cancelled {:?}", token);
                    }
                }
            }
        }
    }

    /// Drops the handle of a one-shot timer that has just fired.
    pub(crate) fn fired(&mut self, token: TimerToken) {
        if matches!(self.handles.get(&token), Some(Handle::Once(_))) {
            self.handles.remove(&token);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.handles.clear();
    }
}
