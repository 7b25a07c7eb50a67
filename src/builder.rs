//! builder.rs — Conversão de símbolos em períodos e merge de intervalos

use crate::types::{MINUTES_PER_DAY, Period, PeriodState, SLOT_MINUTES, Symbol};

/// Converte a sequência de slots de um dia em pares `(início, fim)` em minutos,
/// um para cada sequência máxima de slots iguais a `target`.
pub fn tokens_to_periods(tokens: &[Symbol], target: Symbol) -> Vec<(u32, u32)> {
    let mut periods = Vec::new();
    let mut run_start: Option<usize> = None;

    for (slot, symbol) in tokens.iter().enumerate() {
        match (run_start, *symbol == target) {
            (None, true) => run_start = Some(slot),
            (Some(start), false) => {
                periods.push(slot_range(start, slot));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        periods.push(slot_range(start, tokens.len()));
    }
    periods
}

fn slot_range(first: usize, past_last: usize) -> (u32, u32) {
    (first as u32 * SLOT_MINUTES, past_last as u32 * SLOT_MINUTES)
}

/// Merge clássico de intervalos: ordena por início e funde sobrepostos ou
/// encostados (`next.start <= current.end`).
///
/// Deve receber períodos de um mesmo estado e mesma âncora de dia; OFF e
/// POSSIBLE_ON nunca são fundidos entre si.
pub fn merge_periods(mut periods: Vec<Period>) -> Vec<Period> {
    periods.sort_by_key(|p| (p.start, p.end));

    let mut merged: Vec<Period> = Vec::with_capacity(periods.len());
    for current in periods {
        match merged.last_mut() {
            Some(last) if current.start <= last.end => {
                last.end = last.end.max(current.end);
            }
            _ => merged.push(current),
        }
    }
    merged
}

/// Funde, por estado, períodos que atravessam a meia-noite entre hoje e amanhã.
///
/// Os períodos de amanhã são reancorados em hoje (+1440), fundidos com
/// `merge_periods` e, se continuarem inteiramente em amanhã, voltam à âncora
/// original. Um período fundido fica em hoje com `end > 1440`.
pub fn coalesce_across_midnight(periods: Vec<Period>) -> Vec<Period> {
    let mut result = Vec::with_capacity(periods.len());

    for state in PeriodState::ALL {
        let anchored: Vec<Period> = periods
            .iter()
            .filter(|p| p.state == state)
            .map(|p| {
                if p.applies_today {
                    *p
                } else {
                    Period::new(
                        p.start + MINUTES_PER_DAY,
                        p.end + MINUTES_PER_DAY,
                        true,
                        state,
                    )
                }
            })
            .collect();

        result.extend(merge_periods(anchored).into_iter().map(|p| {
            if p.start >= MINUTES_PER_DAY {
                Period::new(
                    p.start - MINUTES_PER_DAY,
                    p.end - MINUTES_PER_DAY,
                    false,
                    state,
                )
            } else {
                p
            }
        }));
    }
    result
}
