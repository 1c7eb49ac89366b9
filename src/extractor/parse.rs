use scraper::{ElementRef, Html, Selector};

use crate::config::{placeholders, CARD_SELECTOR};
use crate::types::{PrizeResult, ResultCard};

const TITLE_SELECTOR: &str = ".results__card--title span";
const TIME_SELECTOR: &str = ".results__card--header > span";
const ROW_SELECTOR: &str = "tbody tr";
const PRIZE_SELECTOR: &str = "td";
const RESULT_SELECTOR: &str = ".results__table-align-results";
const GROUP_SELECTOR: &str = ".results__table-grupo span";

struct CardSelectors {
    card: Selector,
    title: Selector,
    time: Selector,
    row: Selector,
    prize: Selector,
    result: Selector,
    group: Selector,
}

impl CardSelectors {
    fn new() -> Self {
        Self {
            card: selector(CARD_SELECTOR),
            title: selector(TITLE_SELECTOR),
            time: selector(TIME_SELECTOR),
            row: selector(ROW_SELECTOR),
            prize: selector(PRIZE_SELECTOR),
            result: selector(RESULT_SELECTOR),
            group: selector(GROUP_SELECTOR),
        }
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Map every result card in a rendered page to a `ResultCard`.
///
/// Missing fields fall back to placeholder strings. Rows whose prize cell is
/// present but empty are dropped.
pub fn parse_cards(html: &str) -> Vec<ResultCard> {
    let document = Html::parse_document(html);
    let sel = CardSelectors::new();

    document
        .select(&sel.card)
        .map(|card| parse_card(card, &sel))
        .collect()
}

fn parse_card(card: ElementRef<'_>, sel: &CardSelectors) -> ResultCard {
    let title = first_text(card, &sel.title).unwrap_or_else(|| placeholders::TITLE.to_string());
    let time = first_text(card, &sel.time).unwrap_or_else(|| placeholders::TIME.to_string());

    let results = card
        .select(&sel.row)
        .filter_map(|row| parse_row(row, sel))
        .collect();

    ResultCard { title, time, results }
}

fn parse_row(row: ElementRef<'_>, sel: &CardSelectors) -> Option<PrizeResult> {
    let prize = first_text(row, &sel.prize).unwrap_or_else(|| placeholders::PRIZE.to_string());
    if prize.is_empty() {
        return None;
    }
    let result = first_text(row, &sel.result).unwrap_or_else(|| placeholders::RESULT.to_string());
    let group = first_text(row, &sel.group).unwrap_or_else(|| placeholders::GROUP.to_string());

    Some(PrizeResult { prize, result, group })
}

/// Rendered text of the first match, or `None` if nothing matches.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(rendered_text)
}

/// Elements that start a new line when rendered. Their text never runs into
/// a neighbour's; inline elements (`span`, `b`, ...) add no separator.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

/// Descendant text as a browser lays it out, trimmed, with whitespace runs
/// collapsed.
fn rendered_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(el, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let block = BLOCK_ELEMENTS.contains(&child_el.value().name());
            if block {
                out.push(' ');
            }
            push_text(child_el, out);
            if block {
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="results">
            <div class="results__card">
              <div class="results__card--header">
                <span>11:00</span>
                <div class="results__card--title"><span>PT-RIO</span></div>
              </div>
              <table>
                <tbody>
                  <tr>
                    <td>1º</td>
                    <td class="results__table-align-results">
                      <span>1</span> <span>2</span>
                      <span>3</span><span>4</span>
                    </td>
                    <td class="results__table-grupo"><span>56</span></td>
                  </tr>
                  <tr>
                    <td>2º</td>
                    <td class="results__table-align-results">  5678 </td>
                    <td class="results__table-grupo"><span>20</span></td>
                  </tr>
                  <tr>
                    <td>   </td>
                    <td class="results__table-align-results">9999</td>
                  </tr>
                </tbody>
              </table>
            </div>
            <div class="results__card">
              <div class="results__card--header"><span>14:00</span></div>
              <table><tbody>
                <tr><td>1º</td></tr>
              </tbody></table>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn parses_title_time_and_rows() {
        let cards = parse_cards(PAGE);
        assert_eq!(cards.len(), 2);

        let first = &cards[0];
        assert_eq!(first.title, "PT-RIO");
        assert_eq!(first.time, "11:00");
        assert_eq!(first.results.len(), 2, "empty prize row must be skipped");
        assert_eq!(
            first.results[0],
            PrizeResult {
                prize: "1º".to_string(),
                result: "1 2 34".to_string(),
                group: "56".to_string(),
            }
        );
        assert_eq!(first.results[1].result, "5678");
        assert_eq!(first.results[1].group, "20");
    }

    #[test]
    fn block_children_stay_separate_words() {
        let html = r#"
            <div class="results__card">
              <div class="results__card--header"><span>18:00</span></div>
              <table><tbody><tr>
                <td>1º</td>
                <td class="results__table-align-results"><div>12</div><div>34</div></td>
                <td class="results__table-grupo"><span>07</span></td>
              </tr></tbody></table>
            </div>
        "#;
        let cards = parse_cards(html);
        assert_eq!(cards[0].results[0].result, "12 34");
        assert_eq!(cards[0].results[0].group, "07");
    }

    #[test]
    fn missing_title_yields_placeholder() {
        let cards = parse_cards(PAGE);
        assert_eq!(cards[1].title, placeholders::TITLE);
        assert_eq!(cards[1].time, "14:00");
    }

    #[test]
    fn missing_row_fields_yield_placeholders() {
        let cards = parse_cards(PAGE);
        let row = &cards[1].results[0];
        assert_eq!(row.prize, "1º");
        assert_eq!(row.result, placeholders::RESULT);
        assert_eq!(row.group, placeholders::GROUP);
    }

    #[test]
    fn missing_header_yields_time_placeholder() {
        let html = r#"<div class="results__card"><table><tbody></tbody></table></div>"#;
        let cards = parse_cards(html);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].time, placeholders::TIME);
        assert!(cards[0].results.is_empty());
    }

    #[test]
    fn page_without_cards_yields_nothing() {
        assert!(parse_cards("<html><body><p>Carregando...</p></body></html>").is_empty());
    }
}
