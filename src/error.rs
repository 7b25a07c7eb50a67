//! Tipos de erro do serviço.

use crate::types::Group;
use thiserror::Error;

/// Falhas ao buscar ou interpretar a página de desligamentos.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("falha de transporte HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resposta {status} ao buscar {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("seletor CSS inválido: {0}")]
    Selector(String),
}

/// Falha de uma atualização; o snapshot anterior continua valendo.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("períodos de desligamento do grupo {group} não atualizados: {source}")]
    UpdateFailed {
        group: Group,
        #[source]
        source: ScrapeError,
    },
}

/// Erros de configuração.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("falha ao carregar configuração: {0}")]
    Load(#[from] config::ConfigError),

    #[error("configuração inválida: {0}")]
    Invalid(String),
}
