//! status.rs — Estado derivado entregue à camada de apresentação em JSON

use crate::coordinator::Snapshot;
use crate::query::{CalendarEvent, LOOKAHEAD_HOURS};
use crate::types::{Group, PeriodState, PowerState};
use anyhow::Result;
use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

/// Evento de calendário com horário em offset fixo, serializável.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub state: PeriodState,
    pub label: &'static str,
}

impl<Tz: TimeZone> From<CalendarEvent<Tz>> for EventView {
    fn from(event: CalendarEvent<Tz>) -> Self {
        Self {
            start: event.start.fixed_offset(),
            end: event.end.fixed_offset(),
            state: event.state,
            label: event.label,
        }
    }
}

/// Sensores e calendário do grupo num instante.
#[derive(Debug, Clone, Serialize)]
pub struct PowerStatus {
    pub group: Group,
    pub state: PowerState,
    pub state_label: &'static str,
    pub next_power_off: Option<DateTime<FixedOffset>>,
    pub next_power_on: Option<DateTime<FixedOffset>>,
    pub last_update: Option<DateTime<Utc>>,
    pub current_event: Option<EventView>,
    /// Eventos das próximas 24 horas.
    pub events: Vec<EventView>,
}

impl PowerStatus {
    pub fn build<Tz: TimeZone>(snapshot: &Snapshot, now: DateTime<Tz>) -> Self {
        let timeline = snapshot.timeline(now.clone());
        let state = timeline.current_state();
        let horizon = now.clone() + TimeDelta::hours(LOOKAHEAD_HOURS);

        Self {
            group: snapshot.group,
            state,
            state_label: state.label(),
            next_power_off: timeline.next_power_off().map(|dt| dt.fixed_offset()),
            next_power_on: timeline.next_power_on().map(|dt| dt.fixed_offset()),
            last_update: snapshot.last_update,
            current_event: timeline.event_at(&now).map(EventView::from),
            events: timeline
                .events_between(&now, &horizon)
                .into_iter()
                .map(EventView::from)
                .collect(),
        }
    }
}

/// Grava o status em `path` ou, sem caminho, registra no log.
pub async fn publish(status: &PowerStatus, path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(status)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => info!("[GRUPO {}] Status: {}", status.group, json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;

    fn snapshot() -> Snapshot {
        Snapshot {
            group: Group::Two,
            periods: vec![
                Period::new(1140, 1290, true, PeriodState::Off),
                Period::new(1260, 1380, true, PeriodState::PossibleOn),
            ],
            last_update: None,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7200)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn builds_sensor_values() {
        let status = PowerStatus::build(&snapshot(), at(12, 0));
        assert_eq!(status.state, PowerState::On);
        assert_eq!(status.state_label, "Power ON");
        assert_eq!(status.next_power_off, Some(at(19, 0)));
        assert_eq!(status.next_power_on, Some(at(21, 30)));
        assert!(status.current_event.is_none());
        assert_eq!(status.events.len(), 2);
    }

    #[test]
    fn serializes_labels_and_rfc3339_times() {
        let status = PowerStatus::build(&snapshot(), at(19, 30));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["group"], "2");
        assert_eq!(json["state"], "off");
        assert_eq!(json["current_event"]["label"], "Power OFF");
        assert_eq!(json["next_power_on"], "2026-10-18T21:30:00+02:00");
        assert!(json["last_update"].is_null());
    }

    #[tokio::test]
    async fn publish_writes_status_file() {
        let path = std::env::temp_dir().join(format!("poweroff-status-{}.json", std::process::id()));
        let status = PowerStatus::build(&snapshot(), at(12, 0));
        publish(&status, path.to_str()).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"next_power_off\": \"2026-10-18T19:00:00+02:00\""));
        std::fs::remove_file(path).unwrap();
    }
}
