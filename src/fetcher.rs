//! fetcher.rs — Busca da página de desligamentos e montagem dos períodos do grupo
//!
//! Uma requisição por chamada, sem retry: o agendador decide quando tentar
//! de novo. O parsing do HTML é síncrono e não atravessa nenhum `await`.

use crate::builder::{coalesce_across_midnight, tokens_to_periods};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::extractor::extract_tokens;
use crate::types::{Group, Period, PeriodState};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Cria o cliente HTTP com user agent de navegador e timeout explícito.
pub fn build_client(config: &Config) -> Result<Client, ScrapeError> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}

/// Seletor do container do grupo: `div#inf{g}[data-id='{g}']`.
pub fn container_selector(group: Group) -> Result<Selector, ScrapeError> {
    let css = format!("div#inf{id}[data-id='{id}']", id = group.id());
    Selector::parse(&css).map_err(|e| ScrapeError::Selector(format!("{css}: {e:?}")))
}

/// Indica se o documento contém o container do grupo.
pub fn has_container(html: &str, group: Group) -> Result<bool, ScrapeError> {
    let selector = container_selector(group)?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

/// Extrai os períodos OFF e POSSIBLE_ON de hoje e amanhã para o grupo.
///
/// Devolve `None` quando o container do grupo não existe no documento.
pub fn parse_periods(
    html: &str,
    group: Group,
    merge_across_midnight: bool,
) -> Result<Option<Vec<Period>>, ScrapeError> {
    let selector = container_selector(group)?;
    let document = Html::parse_document(html);
    let Some(container) = document.select(&selector).next() else {
        return Ok(None);
    };

    let days = extract_tokens(container);
    debug!("[GRUPO {}] {} dia(s) de símbolos extraídos", group, days.len());

    let mut periods = Vec::new();
    for (day_idx, day) in days.iter().enumerate() {
        let applies_today = day_idx == 0;
        for state in PeriodState::ALL {
            periods.extend(
                tokens_to_periods(day, state.symbol())
                    .into_iter()
                    .map(|(start, end)| Period::new(start, end, applies_today, state)),
            );
        }
    }

    if merge_across_midnight {
        periods = coalesce_across_midnight(periods);
    }
    Ok(Some(periods))
}

/// Scraper da página de desligamentos para um grupo fixo.
#[derive(Debug, Clone)]
pub struct OblenergoScraper {
    client: Client,
    url: String,
    group: Group,
    merge_across_midnight: bool,
}

impl OblenergoScraper {
    pub fn new(client: Client, config: &Config, group: Group) -> Self {
        Self {
            client,
            url: config.source_url.clone(),
            group,
            merge_across_midnight: config.merge_across_midnight,
        }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    async fn fetch_page(&self) -> Result<String, ScrapeError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: self.url.clone(),
                status,
            });
        }
        Ok(response.text().await?)
    }

    /// Confirma que o grupo existe na página, sem montar os períodos.
    ///
    /// Resposta não-2xx ou container ausente resultam em `Ok(false)`.
    pub async fn validate(&self) -> Result<bool, ScrapeError> {
        match self.fetch_page().await {
            Ok(html) => has_container(&html, self.group),
            Err(ScrapeError::Status { status, .. }) => {
                warn!("[GRUPO {}] Validação recebeu status {}", self.group, status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Busca a página e devolve todos os períodos do grupo.
    ///
    /// Container ausente não é erro: devolve lista vazia e registra um aviso.
    pub async fn fetch_periods(&self) -> Result<Vec<Period>, ScrapeError> {
        let html = self.fetch_page().await?;
        match parse_periods(&html, self.group, self.merge_across_midnight)? {
            Some(periods) => Ok(periods),
            None => {
                warn!(
                    "[GRUPO {}] Container do grupo não encontrado em {}; nenhum período.",
                    self.group, self.url
                );
                Ok(Vec::new())
            }
        }
    }
}
