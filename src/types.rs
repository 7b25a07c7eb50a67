use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutos em um dia; offsets de período são relativos à meia-noite.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Quantidade de slots de meia hora em um dia.
pub const SLOTS_PER_DAY: usize = 48;

/// Duração de um slot em minutos.
pub const SLOT_MINUTES: u32 = 30;

/// Grupo de desligamento (distrito) publicado pela distribuidora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Group {
    One,
    Two,
    Three,
}

impl Group {
    /// Identificador usado no HTML (`div#inf{id}[data-id='{id}']`).
    pub fn id(&self) -> &'static str {
        match self {
            Group::One => "1",
            Group::Two => "2",
            Group::Three => "3",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Group::One),
            "2" => Ok(Group::Two),
            "3" => Ok(Group::Three),
            other => Err(format!("grupo desconhecido: {other:?}")),
        }
    }
}

impl TryFrom<String> for Group {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Group> for String {
    fn from(group: Group) -> Self {
        group.id().to_string()
    }
}

/// Símbolo da legenda de cada slot de meia hora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// "В": sem energia.
    Off,
    /// "З": com energia.
    On,
    /// "МЗ": energia possível.
    PossibleOn,
}

/// Estado de um período publicado (só existem períodos de OFF e POSSIBLE_ON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodState {
    Off,
    PossibleOn,
}

impl PeriodState {
    pub const ALL: [PeriodState; 2] = [PeriodState::Off, PeriodState::PossibleOn];

    /// Símbolo da legenda que origina este estado.
    pub fn symbol(&self) -> Symbol {
        match self {
            PeriodState::Off => Symbol::Off,
            PeriodState::PossibleOn => Symbol::PossibleOn,
        }
    }

    pub fn label(&self) -> &'static str {
        PowerState::from(*self).label()
    }
}

/// Estado de energia derivado para um instante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    On,
    Off,
    PossibleOn,
}

impl PowerState {
    pub fn label(&self) -> &'static str {
        match self {
            PowerState::On => "Power ON",
            PowerState::Off => "Power OFF",
            PowerState::PossibleOn => "Possible ON",
        }
    }
}

impl From<PeriodState> for PowerState {
    fn from(state: PeriodState) -> Self {
        match state {
            PeriodState::Off => PowerState::Off,
            PeriodState::PossibleOn => PowerState::PossibleOn,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intervalo semiaberto `[start, end)` em minutos a partir da meia-noite.
///
/// `end` só passa de 1440 quando um merge atravessa a meia-noite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: u32,
    pub end: u32,
    /// `true` ancora no dia de hoje, `false` no de amanhã.
    pub applies_today: bool,
    pub state: PeriodState,
}

impl Period {
    pub fn new(start: u32, end: u32, applies_today: bool, state: PeriodState) -> Self {
        Self {
            start,
            end,
            applies_today,
            state,
        }
    }
}
