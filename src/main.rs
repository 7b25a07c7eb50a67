mod builder;
mod config;
mod coordinator;
mod error;
mod extractor;
mod fetcher;
mod query;
mod scheduler;
mod status;
mod types;

use anyhow::Result;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializa o sistema de logging (tracing)
    tracing_subscriber::fmt::init();

    // Carrega e valida a configuração
    let config: config::Config = config::Config::load()?;
    info!(
        "Configuração carregada: grupo {}, fonte {}",
        config.group, config.source_url
    );

    // Coordenador com o cliente HTTP e o snapshot vazio do grupo
    let coordinator = coordinator::PowerOffCoordinator::new(&config)?;

    // Acompanha os snapshots publicados (troca de grupo ou atualização)
    let mut snapshots = coordinator.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            debug!(
                "[GRUPO {}] Novo snapshot: {} períodos, atualizado em {:?}",
                snapshot.group,
                snapshot.periods.len(),
                snapshot.last_update
            );
        }
    });

    // O scheduler roda até o processo ser encerrado
    let handle = tokio::spawn(scheduler::run_scheduler(config, coordinator));
    tokio::select! {
        res = handle => {
            if let Err(e) = res {
                anyhow::bail!("Scheduler error: {:?}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Encerrando monitoramento.");
        }
    }

    Ok(())
}
