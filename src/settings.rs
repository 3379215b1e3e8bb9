use serde::Deserialize;

use crate::sqlite;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub sqlite: sqlite::Settings,
}

impl Settings {
    /// Layers `config/default` (optional) and `CLUBHUB_`-prefixed
    /// environment variables over the compiled-in database URL.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("sqlite.url", sqlite::default_url())?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("CLUBHUB").separator("__"))
            .build()?
            .try_deserialize()
    }
}
