use crate::error::{BadEnvVarSnafu, CollegeResult, InvalidTimezoneSnafu, ParseBodyLimitSnafu};
use dotenvy::var;
use jiff::tz::TimeZone;
use snafu::ResultExt;
use std::{env::VarError, sync::Arc};

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_config: Arc<ServerConfig>,
    timezone: TimeZone,
}

impl RuntimeConfiguration {
    pub fn new() -> CollegeResult<Self> {
        Self::from_lookup(&|name: &'static str| var(name))
    }

    ///`lookup` stands in for the environment, so that tests don't have to touch the real one
    pub fn from_lookup<L>(lookup: &L) -> CollegeResult<Self>
    where
        L: Fn(&'static str) -> Result<String, dotenvy::Error>,
    {
        let timezone = match optional_env_var(lookup, "COLLEGE_TIMEZONE")? {
            Some(tz) => TimeZone::get(&tz).context(InvalidTimezoneSnafu { tz })?,
            None => TimeZone::system(),
        };

        Ok(Self {
            server_config: Arc::new(ServerConfig::from_lookup(lookup)?),
            timezone,
        })
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }
}

impl Default for RuntimeConfiguration {
    fn default() -> Self {
        Self {
            server_config: Arc::new(ServerConfig::default()),
            timezone: TimeZone::UTC,
        }
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub address: String,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_lookup<L>(lookup: &L) -> CollegeResult<Self>
    where
        L: Fn(&'static str) -> Result<String, dotenvy::Error>,
    {
        let defaults = Self::default();

        let address =
            optional_env_var(lookup, "COLLEGE_SERVER_IP")?.unwrap_or(defaults.address);
        let max_body_bytes = match optional_env_var(lookup, "COLLEGE_MAX_BODY_BYTES")? {
            Some(original) => original
                .parse()
                .context(ParseBodyLimitSnafu { original })?,
            None => defaults.max_body_bytes,
        };

        Ok(Self {
            address,
            max_body_bytes,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

///`Ok(None)` if the variable just isn't set, rather than being set to garbage
fn optional_env_var<L>(lookup: &L, name: &'static str) -> CollegeResult<Option<String>>
where
    L: Fn(&'static str) -> Result<String, dotenvy::Error>,
{
    match lookup(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(e) => Err(e).context(BadEnvVarSnafu { name }),
    }
}
