use crate::config::Config;
use crate::error::{ScrapeError, UpdateError};
use crate::fetcher::{OblenergoScraper, build_client};
use crate::query::Timeline;
use crate::types::{Group, Period};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Estado publicado após a última atualização bem-sucedida de um grupo.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub group: Group,
    pub periods: Vec<Period>,
    pub last_update: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn empty(group: Group) -> Self {
        Self {
            group,
            periods: Vec::new(),
            last_update: None,
        }
    }

    /// Consultas sobre os períodos a partir de `now`.
    pub fn timeline<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Timeline<'_, Tz> {
        Timeline::new(&self.periods, now)
    }
}

/// Mantém o snapshot de períodos de um grupo e o substitui a cada atualização.
///
/// O snapshot nunca é alterado no lugar: cada atualização publica um novo
/// `Arc<Snapshot>` no canal, e leitores seguram o anterior até pedir outro.
#[derive(Debug)]
pub struct PowerOffCoordinator {
    client: Client,
    config: Config,
    fetcher: OblenergoScraper,
    snapshot: watch::Sender<Arc<Snapshot>>,
}

impl PowerOffCoordinator {
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let client = build_client(config)?;
        let fetcher = OblenergoScraper::new(client.clone(), config, config.group);
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::empty(config.group)));
        Ok(Self {
            client,
            config: config.clone(),
            fetcher,
            snapshot,
        })
    }

    pub fn group(&self) -> Group {
        self.fetcher.group()
    }

    /// Snapshot atual (pode estar desatualizado se a última busca falhou).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.borrow().clone()
    }

    /// Receptor para a camada de apresentação acompanhar novos snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot.subscribe()
    }

    pub async fn validate(&self) -> Result<bool, ScrapeError> {
        self.fetcher.validate().await
    }

    /// Busca períodos novos e publica um snapshot novo.
    ///
    /// Em caso de falha o snapshot anterior é mantido intacto.
    pub async fn refresh(&mut self) -> Result<usize, UpdateError> {
        let group = self.group();
        debug!("[GRUPO {}] Iniciando atualização dos períodos", group);

        let periods = self
            .fetcher
            .fetch_periods()
            .await
            .map_err(|source| UpdateError::UpdateFailed { group, source })?;

        for period in &periods {
            debug!("[GRUPO {}] Período {:?}", group, period);
        }

        let count = periods.len();
        let snapshot = Snapshot {
            group,
            periods,
            last_update: Some(Utc::now()),
        };
        self.snapshot.send_replace(Arc::new(snapshot));
        info!(
            "[GRUPO {}] Atualização concluída: {} períodos encontrados.",
            group, count
        );
        Ok(count)
    }

    /// Troca o grupo monitorado; descarta o snapshot se o grupo mudou.
    ///
    /// Retorna `true` quando houve troca. O chamador deve pedir um `refresh`
    /// em seguida, pois o novo snapshot começa vazio.
    pub fn change_group(&mut self, group: Group) -> bool {
        if group == self.group() {
            return false;
        }
        info!("[GRUPO {}] Trocando para o grupo {}", self.group(), group);
        self.config.group = group;
        self.fetcher = OblenergoScraper::new(self.client.clone(), &self.config, group);
        self.snapshot.send_replace(Arc::new(Snapshot::empty(group)));
        true
    }
}
