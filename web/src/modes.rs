use mirage_core::EngineConfig;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Mode {
    Classic,
    #[default]
    Adventure,
}

impl Mode {
    pub(crate) const fn title(self) -> &'static str {
        match self {
            Self::Classic => "Mirage Recall",
            Self::Adventure => "Mirage Adventure",
        }
    }

    /// Table name in the presets file.
    const fn key(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Adventure => "adventure",
        }
    }

    const fn builtin(self) -> EngineConfig {
        match self {
            Self::Classic => EngineConfig::classic(),
            Self::Adventure => EngineConfig::adventure(),
        }
    }
}

/// Engine settings for `mode`, read from the presets file. Keys present in
/// the mode's table override the built-in preset; a broken file or table
/// falls back to the built-in preset as a whole.
pub(crate) fn config_for(mode: Mode, presets: &str) -> EngineConfig {
    let builtin = mode.builtin();

    let overrides = match presets.parse::<toml::Table>() {
        Ok(mut table) => match table.remove(mode.key()) {
            Some(toml::Value::Table(overrides)) => overrides,
            Some(other) => {
                log::warn!("preset [{}] is a {}, not a table", mode.key(), other.type_str());
                return builtin.sanitized();
            }
            None => {
                log::debug!("no [{}] preset, using built-in settings", mode.key());
                return builtin.sanitized();
            }
        },
        Err(err) => {
            log::warn!("ignoring mode presets: {}", err);
            return builtin.sanitized();
        }
    };

    match overlay(&builtin, overrides) {
        Ok(config) => config.sanitized(),
        Err(err) => {
            log::warn!("ignoring [{}] preset: {:#}", mode.key(), err);
            builtin.sanitized()
        }
    }
}

fn overlay(base: &EngineConfig, overrides: toml::Table) -> anyhow::Result<EngineConfig> {
    let toml::Value::Table(mut merged) = toml::Value::try_from(base)? else {
        anyhow::bail!("engine settings are not a table");
    };
    merged.extend(overrides);
    Ok(toml::Value::Table(merged).try_into()?)
}
