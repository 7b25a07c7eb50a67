//! extractor.rs — Extração dos símbolos de meia hora a partir do container do grupo
//!
//! A página não tem marcação estável: cada célula traz a letra da legenda no
//! texto ou implícita no nome da tag. A heurística (texto ou tag, achatar e
//! depois fatiar em dias de 48 slots) quebra se a distribuidora mudar o HTML;
//! adaptar deve ser só uma edição nas tabelas abaixo.

use crate::types::{SLOTS_PER_DAY, Symbol};
use scraper::ElementRef;

/// Símbolos de um dia completo (slot `i` cobre `[i*30, (i+1)*30)` minutos).
pub type DayTokens = [Symbol; SLOTS_PER_DAY];

/// Máximo de dias publicados: hoje e amanhã.
pub const MAX_DAYS: usize = 2;

/// Texto normalizado (maiúsculo, sem espaços) -> símbolo.
pub const TEXT_SYMBOLS: [(&str, Symbol); 3] = [
    ("В", Symbol::Off),
    ("З", Symbol::On),
    ("МЗ", Symbol::PossibleOn),
];

/// Fallback por nome de tag: `<o>`=В, `<u>`=З, `<s>`=МЗ.
pub const TAG_SYMBOLS: [(&str, Symbol); 3] = [
    ("o", Symbol::Off),
    ("u", Symbol::On),
    ("s", Symbol::PossibleOn),
];

/// Determina o símbolo de um elemento, se ele for um marcador da legenda.
pub fn symbol_of(element: ElementRef<'_>) -> Option<Symbol> {
    let text = element.text().collect::<String>().trim().to_uppercase();
    if let Some((_, symbol)) = TEXT_SYMBOLS.iter().find(|(token, _)| *token == text) {
        return Some(*symbol);
    }
    let tag = element.value().name().to_ascii_lowercase();
    TAG_SYMBOLS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, symbol)| *symbol)
}

/// Percorre os descendentes do container em ordem de documento e agrupa os
/// símbolos em até dois dias de 48 slots.
///
/// - Dias incompletos são completados com `On` (falta de dado = com energia).
/// - Sem nenhum símbolo, devolve um único dia todo `On`.
pub fn extract_tokens(container: ElementRef<'_>) -> Vec<DayTokens> {
    let raw: Vec<Symbol> = container
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter_map(symbol_of)
        .collect();

    let mut days: Vec<DayTokens> = raw
        .chunks(SLOTS_PER_DAY)
        .take(MAX_DAYS)
        .map(|chunk| {
            let mut day = [Symbol::On; SLOTS_PER_DAY];
            day[..chunk.len()].copy_from_slice(chunk);
            day
        })
        .collect();

    if days.is_empty() {
        days.push([Symbol::On; SLOTS_PER_DAY]);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn container_tokens(html: &str) -> Vec<DayTokens> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("div#inf1").unwrap();
        let container = document.select(&selector).next().unwrap();
        extract_tokens(container)
    }

    fn cells(tag: &str, count: usize) -> String {
        format!("<{tag}></{tag}>").repeat(count)
    }

    #[test]
    fn maps_text_and_tag_markers() {
        let html = r#"<div id="inf1"><p><b>В</b><b> мз </b><b>з</b><o></o><u></u><s></s><b>00:00</b></p></div>"#;
        let days = container_tokens(html);
        assert_eq!(days.len(), 1);
        assert_eq!(
            &days[0][..6],
            &[
                Symbol::Off,
                Symbol::PossibleOn,
                Symbol::On,
                Symbol::Off,
                Symbol::On,
                Symbol::PossibleOn,
            ]
        );
        // o restante é completado com On
        assert!(days[0][6..].iter().all(|s| *s == Symbol::On));
    }

    #[test]
    fn text_wins_over_tag_name() {
        let html = r#"<div id="inf1"><o>З</o><u>В</u></div>"#;
        let days = container_tokens(html);
        assert_eq!(&days[0][..2], &[Symbol::On, Symbol::Off]);
    }

    #[test]
    fn empty_container_yields_single_day_on() {
        let days = container_tokens(r#"<div id="inf1"><p>sem dados</p></div>"#);
        assert_eq!(days, vec![[Symbol::On; SLOTS_PER_DAY]]);
    }

    #[test]
    fn splits_today_and_tomorrow_and_caps_at_two_days() {
        let html = format!(
            r#"<div id="inf1"><p>{}</p><p>{}</p><p>{}</p></div>"#,
            cells("o", SLOTS_PER_DAY),
            cells("s", SLOTS_PER_DAY),
            cells("o", 10)
        );
        let days = container_tokens(&html);
        assert_eq!(days.len(), 2);
        assert!(days[0].iter().all(|s| *s == Symbol::Off));
        assert!(days[1].iter().all(|s| *s == Symbol::PossibleOn));
    }

    #[test]
    fn short_second_day_is_padded() {
        let html = format!(
            r#"<div id="inf1"><p>{}{}</p></div>"#,
            cells("u", SLOTS_PER_DAY),
            cells("o", 4)
        );
        let days = container_tokens(&html);
        assert_eq!(days.len(), 2);
        assert!(days[1][..4].iter().all(|s| *s == Symbol::Off));
        assert!(days[1][4..].iter().all(|s| *s == Symbol::On));
    }
}
