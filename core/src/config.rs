use serde::{Deserialize, Serialize};

use crate::*;

/// Where the ladder goes after the level that was just won.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvancePolicy {
    /// Stay on the last level once it is reached.
    Cap,
    /// Continue from the first level after the last one.
    Wrap,
}

/// What winning the last level of the ladder does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LastLevelPolicy {
    /// Finish the playthrough and reset stored progress to the first level.
    CompleteAndReset,
    /// Treat it like any other win and advance with the [`AdvancePolicy`].
    Loop,
}

/// How previous/next navigation handles the ends of the ladder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationPolicy {
    Clamp,
    Wrap,
    /// Stop at the first level, but go from the last back to the first.
    ClampStart,
}

/// Tunables for one screen's round engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub guess_time_secs: u32,
    pub next_level_delay_secs: u32,
    pub reveal_delay_ms: u32,
    pub hints: bool,
    /// Seconds between asking for a hint and seeing it.
    pub hint_delay_secs: u32,
    pub wrong_cell_display_ms: u32,
    pub advance_policy: AdvancePolicy,
    pub on_last_level: LastLevelPolicy,
    pub navigation: NavigationPolicy,
}

impl EngineConfig {
    /// Plain memory screen: short guess timer, endless loop over the ladder.
    pub const fn classic() -> Self {
        Self {
            guess_time_secs: 15,
            next_level_delay_secs: NEXT_LEVEL_DELAY_SECS,
            reveal_delay_ms: REVEAL_DELAY_MS,
            hints: false,
            hint_delay_secs: HINT_DELAY_SECS,
            wrong_cell_display_ms: WRONG_CELL_DISPLAY_MS,
            advance_policy: AdvancePolicy::Wrap,
            on_last_level: LastLevelPolicy::Loop,
            navigation: NavigationPolicy::ClampStart,
        }
    }

    /// Adventure screen: longer timer, hints, and a completion screen.
    pub const fn adventure() -> Self {
        Self {
            guess_time_secs: 20,
            next_level_delay_secs: NEXT_LEVEL_DELAY_SECS,
            reveal_delay_ms: REVEAL_DELAY_MS,
            hints: true,
            hint_delay_secs: HINT_DELAY_SECS,
            wrong_cell_display_ms: WRONG_CELL_DISPLAY_MS,
            advance_policy: AdvancePolicy::Cap,
            on_last_level: LastLevelPolicy::CompleteAndReset,
            navigation: NavigationPolicy::ClampStart,
        }
    }

    pub const fn hints_enabled(&self) -> bool {
        self.hints
    }

    /// Fixes values that would stall the engine, like a zero guess timer.
    pub fn sanitized(mut self) -> Self {
        self.guess_time_secs = self.guess_time_secs.max(1);
        self.next_level_delay_secs = self.next_level_delay_secs.max(1);
        self.hint_delay_secs = self.hint_delay_secs.max(1);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::adventure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_where_the_screens_differ() {
        let classic = EngineConfig::classic();
        let adventure = EngineConfig::adventure();

        assert_eq!(classic.guess_time_secs, 15);
        assert_eq!(adventure.guess_time_secs, 20);
        assert!(!classic.hints_enabled());
        assert!(adventure.hints_enabled());
        assert_eq!(adventure.on_last_level, LastLevelPolicy::CompleteAndReset);
        assert_eq!(classic.on_last_level, LastLevelPolicy::Loop);
        assert_eq!(classic.navigation, NavigationPolicy::ClampStart);
        assert_eq!(adventure.navigation, NavigationPolicy::ClampStart);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"guess_time_secs": 30, "advance_policy": "wrap"}"#).unwrap();

        assert_eq!(config.guess_time_secs, 30);
        assert_eq!(config.advance_policy, AdvancePolicy::Wrap);
        assert!(config.hints);
        assert_eq!(config.hint_delay_secs, HINT_DELAY_SECS);
    }

    #[test]
    fn sanitized_rejects_zero_timers() {
        let config = EngineConfig {
            guess_time_secs: 0,
            hint_delay_secs: 0,
            ..EngineConfig::classic()
        }
        .sanitized();

        assert_eq!(config.guess_time_secs, 1);
        assert_eq!(config.hint_delay_secs, 1);
    }
}
