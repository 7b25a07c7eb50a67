// src/scheduler.rs

use crate::config::Config;
use crate::coordinator::PowerOffCoordinator;
use crate::error::ConfigError;
use crate::status::{self, PowerStatus};
use chrono::Local;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// Estados do scheduler: validando o grupo ou monitorando.
enum SchedulerState {
    ValidatingGroup,
    Monitoring,
}

/// Confere se o grupo configurado existe na página.
async fn check_group(coordinator: &PowerOffCoordinator) -> bool {
    let group = coordinator.group();
    info!("[GRUPO {}] Validando grupo na página de desligamentos...", group);
    match coordinator.validate().await {
        Ok(true) => {
            info!("[GRUPO {}] Grupo encontrado na página.", group);
            true
        }
        Ok(false) => {
            warn!("[GRUPO {}] Grupo não encontrado na página.", group);
            false
        }
        Err(e) => {
            error!("[GRUPO {}] Falha ao validar grupo: {}", group, e);
            false
        }
    }
}

/// Aplica o grupo da configuração recarregada; retorna `true` se trocou.
fn sync_group(
    coordinator: &mut PowerOffCoordinator,
    reloaded: Result<Config, ConfigError>,
) -> bool {
    match reloaded {
        Ok(config) => coordinator.change_group(config.group),
        Err(e) => {
            warn!(
                "[GRUPO {}] Configuração não recarregada: {}",
                coordinator.group(),
                e
            );
            false
        }
    }
}

/// Scheduler principal: valida o grupo uma vez, depois atualiza a cada intervalo.
///
/// Nunca roda duas atualizações ao mesmo tempo e uma falha só afeta o ciclo
/// em que ocorreu; o snapshot anterior continua publicado.
pub async fn run_scheduler(config: Config, mut coordinator: PowerOffCoordinator) {
    let mut state = SchedulerState::ValidatingGroup;
    let retry = Duration::from_secs(config.update_interval_secs);

    loop {
        match state {
            SchedulerState::ValidatingGroup => {
                // Um grupo inválido pode ser corrigido no arquivo sem reiniciar
                sync_group(&mut coordinator, Config::load());
                if check_group(&coordinator).await {
                    info!(
                        "[ESTADO: MONITORAMENTO ATIVO] [GRUPO {}] Iniciando atualizações a cada {}s.",
                        coordinator.group(),
                        config.update_interval_secs
                    );
                    state = SchedulerState::Monitoring;
                } else {
                    warn!(
                        "[GRUPO {}] Nova validação em {:?}...",
                        coordinator.group(),
                        retry
                    );
                    tokio::time::sleep(retry).await;
                }
            }
            SchedulerState::Monitoring => {
                let mut ticker = interval(Duration::from_secs(config.update_interval_secs));
                let mut cycle_number: u64 = 0;

                loop {
                    ticker.tick().await;
                    let cycle_start = Instant::now();
                    cycle_number += 1;

                    // 1. Troca de grupo pela configuração
                    sync_group(&mut coordinator, Config::load());
                    let group = coordinator.group();
                    info!("[GRUPO {}][CICLO {}] Iniciando ciclo.", group, cycle_number);

                    // 2. Atualização dos períodos
                    match coordinator.refresh().await {
                        Ok(0) => warn!(
                            "[GRUPO {}][CICLO {}] Nenhum período publicado para o grupo.",
                            group, cycle_number
                        ),
                        Ok(count) => debug!(
                            "[GRUPO {}][CICLO {}] {} períodos no snapshot.",
                            group, cycle_number, count
                        ),
                        Err(e) => error!(
                            "[GRUPO {}][CICLO {}] {}; mantendo snapshot anterior.",
                            group, cycle_number, e
                        ),
                    }

                    // 3. Publicação do status
                    let status = PowerStatus::build(&coordinator.snapshot(), Local::now());
                    info!(
                        "[GRUPO {}][CICLO {}] Estado: {} | próximo desligamento: {:?} | próxima religação: {:?}",
                        group,
                        cycle_number,
                        status.state_label,
                        status.next_power_off,
                        status.next_power_on
                    );
                    if let Err(e) = status::publish(&status, config.status_path.as_deref()).await {
                        error!(
                            "[GRUPO {}][CICLO {}] Erro ao publicar status: {:?}",
                            group, cycle_number, e
                        );
                    }

                    info!(
                        "[GRUPO {}][CICLO {}] Fim do ciclo. Duração: {:?}",
                        group,
                        cycle_number,
                        cycle_start.elapsed()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::config_for;
    use crate::types::Group;

    #[test]
    fn reloaded_config_rebinds_group() {
        let mut coordinator = PowerOffCoordinator::new(&config_for("http://127.0.0.1:9/", "3")).unwrap();

        assert!(!sync_group(&mut coordinator, Ok(config_for("http://127.0.0.1:9/", "3"))));
        assert_eq!(coordinator.group(), Group::Three);

        assert!(sync_group(&mut coordinator, Ok(config_for("http://127.0.0.1:9/", "2"))));
        assert_eq!(coordinator.group(), Group::Two);
        assert!(coordinator.snapshot().periods.is_empty());
    }

    #[test]
    fn unreadable_config_keeps_group() {
        let mut coordinator = PowerOffCoordinator::new(&config_for("http://127.0.0.1:9/", "1")).unwrap();
        let reloaded = Err(ConfigError::Invalid("update_interval_secs deve ser maior que zero".into()));
        assert!(!sync_group(&mut coordinator, reloaded));
        assert_eq!(coordinator.group(), Group::One);
    }
}
