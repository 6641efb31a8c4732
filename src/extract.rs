//! Pulls the bank table out of the archived page's markup.
//!
//! Only the first `<tbody>` is read. Within it every `<tr>` holding at least
//! one `<td>` must decompose into a name and a market cap; anything else is a
//! parse error naming the row rather than a silently dropped row.

use scraper::{ElementRef, Html, Selector};

use crate::amount::parse_market_cap;
use crate::error::EtlError;
use crate::records::BankRecord;

const NAME_CELL: usize = 1;
const CAP_CELL: usize = 2;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("selector literals are valid CSS")
}

pub fn extract(markup: &str) -> Result<Vec<BankRecord>, EtlError> {
    let document = Html::parse_document(markup);
    let row_selector = selector("tr");
    let cell_selector = selector("td");

    let body = document
        .select(&selector("tbody"))
        .next()
        .ok_or(EtlError::MissingTable)?;

    let mut records = Vec::new();
    for (row_index, row) in body.select(&row_selector).enumerate() {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.is_empty() {
            continue;
        }
        records.push(parse_row(&cells).map_err(|reason| EtlError::Parse {
            row: row_index,
            reason,
        })?);
    }
    Ok(records)
}

fn parse_row(cells: &[ElementRef]) -> Result<BankRecord, String> {
    if cells.len() <= CAP_CELL {
        return Err(format!(
            "expected at least {} cells, found {}",
            CAP_CELL + 1,
            cells.len()
        ));
    }

    Ok(BankRecord {
        name: bank_name(cells[NAME_CELL])?,
        market_cap_usd: market_cap(cells[CAP_CELL])?,
    })
}

/**
 * The name cell leads with a flag icon link, so the bank is the second
 * link in the cell, or the only one when there is no flag.
 */
fn bank_name(cell: ElementRef) -> Result<String, String> {
    let links: Vec<ElementRef> = cell.select(&selector("a")).collect();
    let link = match links.len() {
        0 => return Err("name cell has no link".to_string()),
        1 => links[0],
        _ => links[1],
    };
    let title = link
        .value()
        .attr("title")
        .ok_or_else(|| "bank link has no title".to_string())?;

    let name = title.trim();
    if name.is_empty() {
        return Err("name link title is empty".to_string());
    }
    Ok(name.to_string())
}

fn market_cap(cell: ElementRef) -> Result<f64, String> {
    let leading_text = cell.text().next().unwrap_or_default();
    parse_market_cap(leading_text).map_err(|e| e.to_string())
}
