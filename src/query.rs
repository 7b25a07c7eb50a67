//! query.rs — Consultas sobre a lista de períodos num instante de referência
//!
//! Os períodos são relativos ao dia; a `Timeline` fixa "hoje" a partir do
//! `now` recebido (no fuso do chamador) e converte cada período em intervalo
//! absoluto antes de responder.

use crate::types::{MINUTES_PER_DAY, Period, PeriodState, PowerState, SLOT_MINUTES, SLOTS_PER_DAY};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone};

/// Janela de antecedência usada para as próximas transições.
pub const LOOKAHEAD_HOURS: i64 = 24;

/// Evento de calendário pronto para exibição.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub state: PeriodState,
    pub label: &'static str,
}

impl<Tz: TimeZone> CalendarEvent<Tz> {
    fn new(start: DateTime<Tz>, end: DateTime<Tz>, state: PeriodState) -> Self {
        Self {
            start,
            end,
            state,
            label: state.label(),
        }
    }

    /// Contém o instante, incluindo as duas pontas.
    pub fn contains(&self, at: &DateTime<Tz>) -> bool {
        self.start <= *at && *at <= self.end
    }
}

/// Resolve um horário local no fuso. Horários ambíguos ficam com o mais cedo;
/// horários inexistentes (lacuna de DST) avançam em passos de um slot até o
/// primeiro instante válido depois da lacuna.
fn resolve_local<Tz: TimeZone>(tz: &Tz, date: NaiveDate, minutes: u32) -> DateTime<Tz> {
    let (hour, minute) = (minutes / 60, minutes % 60);
    let naive = date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN));
    (0..=SLOTS_PER_DAY as i64)
        .map(|step| naive + TimeDelta::minutes(step * SLOT_MINUTES as i64))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .unwrap_or_else(|| {
            // fuso sem nenhum horário válido no dia: usa o offset da véspera
            let offset = tz.offset_from_utc_datetime(&(naive - TimeDelta::days(1)));
            DateTime::from_naive_utc_and_offset(naive - offset.fix(), offset)
        })
}

/// Soma `minutes` (que pode passar de um dia) à data e resolve no fuso.
fn resolve_offset<Tz: TimeZone>(tz: &Tz, anchor: NaiveDate, minutes: u32) -> DateTime<Tz> {
    let days = u64::from(minutes / MINUTES_PER_DAY);
    let date = anchor.checked_add_days(Days::new(days)).unwrap_or(anchor);
    resolve_local(tz, date, minutes % MINUTES_PER_DAY)
}

/// Converte um período em intervalo absoluto ancorado em `today` (ou amanhã).
///
/// Offsets acima de 1440 (períodos fundidos na meia-noite) caem nos dias
/// seguintes à âncora.
pub fn to_absolute<Tz: TimeZone>(
    period: &Period,
    today: NaiveDate,
    tz: &Tz,
) -> (DateTime<Tz>, DateTime<Tz>) {
    let anchor = if period.applies_today {
        today
    } else {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    };

    let start = resolve_offset(tz, anchor, period.start);
    let mut end = resolve_offset(tz, anchor, period.end);
    if end < start {
        end += TimeDelta::days(1);
    }
    (start, end)
}

/// Visão da lista de períodos a partir de um `now`.
#[derive(Debug, Clone)]
pub struct Timeline<'a, Tz: TimeZone> {
    periods: &'a [Period],
    now: DateTime<Tz>,
}

impl<'a, Tz: TimeZone> Timeline<'a, Tz> {
    pub fn new(periods: &'a [Period], now: DateTime<Tz>) -> Self {
        Self { periods, now }
    }

    fn events_of(&self, state: PeriodState) -> impl Iterator<Item = CalendarEvent<Tz>> {
        let today = self.now.date_naive();
        let tz = self.now.timezone();
        self.periods
            .iter()
            .filter(move |p| p.state == state)
            .map(move |p| {
                let (start, end) = to_absolute(p, today, &tz);
                CalendarEvent::new(start, end, state)
            })
    }

    /// Evento vigente no instante; OFF tem prioridade sobre POSSIBLE_ON.
    pub fn event_at(&self, at: &DateTime<Tz>) -> Option<CalendarEvent<Tz>> {
        PeriodState::ALL
            .into_iter()
            .find_map(|state| self.events_of(state).find(|event| event.contains(at)))
    }

    /// Todos os eventos cujo início ou fim cai dentro de `[start, end]`.
    pub fn events_between(
        &self,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Vec<CalendarEvent<Tz>> {
        let in_window = |at: &DateTime<Tz>| start <= at && at <= end;
        let today = self.now.date_naive();
        let tz = self.now.timezone();
        self.periods
            .iter()
            .map(|p| {
                let (event_start, event_end) = to_absolute(p, today, &tz);
                CalendarEvent::new(event_start, event_end, p.state)
            })
            .filter(|event| in_window(&event.start) || in_window(&event.end))
            .collect()
    }

    pub fn current_state(&self) -> PowerState {
        self.event_at(&self.now)
            .map(|event| PowerState::from(event.state))
            .unwrap_or(PowerState::On)
    }

    fn lookahead(&self) -> Vec<CalendarEvent<Tz>> {
        let horizon = self.now.clone() + TimeDelta::hours(LOOKAHEAD_HOURS);
        self.events_between(&self.now, &horizon)
    }

    /// Próximo início de período OFF depois de `now`, dentro de 24h.
    pub fn next_power_off(&self) -> Option<DateTime<Tz>> {
        self.lookahead()
            .into_iter()
            .filter(|event| event.state == PeriodState::Off)
            .map(|event| event.start)
            .filter(|start| *start > self.now)
            .min()
    }

    /// Próximo fim de qualquer evento (OFF ou POSSIBLE_ON) depois de `now`.
    ///
    /// Considera o fim de todos os eventos listados, não só dos OFF: o fim de
    /// uma janela de energia possível também conta como volta da energia.
    pub fn next_power_on(&self) -> Option<DateTime<Tz>> {
        self.lookahead()
            .into_iter()
            .map(|event| event.end)
            .filter(|end| *end > self.now)
            .min()
    }
}
