use crate::error::ConfigError;
use crate::types::Group;
use config as config_crate;
use serde::Deserialize;

pub const DEFAULT_SOURCE_URL: &str = "https://oblenergo.cv.ua/shutdowns/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Configuração operacional do serviço.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Grupo de desligamento monitorado ("1", "2" ou "3").
    pub group: Group,
    /// Página de desligamentos da distribuidora.
    #[serde(default = "default_source_url")]
    pub source_url: String,
    /// User agent de navegador; o site recusa o padrão do cliente HTTP.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout da requisição em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Intervalo entre atualizações em segundos.
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    /// Funde períodos de mesmo estado que se encostam na meia-noite.
    #[serde(default)]
    pub merge_across_midnight: bool,
    /// Arquivo onde o status em JSON é gravado a cada ciclo.
    #[serde(default)]
    pub status_path: Option<String>,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_update_interval_secs() -> u64 {
    600
}

impl Config {
    /// Carrega o arquivo `config` (qualquer formato suportado pelo crate `config`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(config_crate::File::with_name("config"))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config_crate::Source + Send + Sync + 'static,
    {
        let settings = config_crate::Config::builder().add_source(source).build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source_url não pode ser vazio".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent não pode ser vazio".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs deve ser maior que zero".into(),
            ));
        }
        if self.update_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "update_interval_secs deve ser maior que zero".into(),
            ));
        }
        Ok(())
    }
}
