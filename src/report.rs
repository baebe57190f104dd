//! Battery Report — reads capacities out of the `powercfg /batteryreport` HTML
//!
//! The report is machine-generated markup made of `<table>` blocks whose rows
//! pair an upper-case label cell with one value cell per installed battery:
//!
//! ```text
//! <tr><td><span class="label">DESIGN CAPACITY</span></td><td>57,020 mWh</td></tr>
//! ```
//!
//! Only the label/value row shape is relied on, so a light tag scanner is
//! enough and layout changes between Windows builds do not break parsing.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const DESIGN_CAPACITY: &str = "DESIGN CAPACITY";
pub const FULL_CHARGE_CAPACITY: &str = "FULL CHARGE CAPACITY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryDetails {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub chemistry: Option<String>, // "LiP", "Li-I", ...
    pub cycle_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryReport {
    pub design_capacity_mwh: u64,
    pub full_charge_capacity_mwh: u64,
    pub details: BatteryDetails,
}

/// Header block of the report describing the machine it was generated on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub computer_name: Option<String>,
    pub system_product_name: Option<String>,
    pub os_build: Option<String>,
    pub report_time: Option<String>,
}

/// One battery column of the report. A column with unreadable capacities
/// keeps its own error so the other batteries still parse.
pub type BatteryEntry = Result<BatteryReport, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    pub metadata: ReportMetadata,
    /// Always non-empty, in document order.
    pub batteries: Vec<BatteryEntry>,
}

/// Parse the first installed battery from a report document.
pub fn parse_report(doc: &str) -> Result<BatteryReport, ParseError> {
    parse_batteries(doc)?
        .into_iter()
        .next()
        .unwrap_or(Err(ParseError::MissingField(DESIGN_CAPACITY)))
}

/// Parse every installed battery from a report document.
///
/// Fails only when no table pairs both capacity labels.
pub fn parse_batteries(doc: &str) -> Result<Vec<BatteryEntry>, ParseError> {
    batteries_from_tables(&labeled_tables(doc))
}

/// Parse batteries and the report header in one pass over the markup.
pub fn parse_document(doc: &str) -> Result<ParsedReport, ParseError> {
    let tables = labeled_tables(doc);
    let batteries = batteries_from_tables(&tables)?;
    Ok(ParsedReport {
        metadata: metadata_from_tables(&tables),
        batteries,
    })
}

/// Convert a capacity cell such as `57,020 mWh` to a number.
///
/// Takes the first run of digits and drops grouping separators inside it, so
/// localized reports (`57.020 mWh`, `57 020 mWh`) read the same.
pub fn parse_capacity(field: &'static str, text: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidValue {
        field,
        value: text.to_string(),
    };
    let digits = leading_number(text).ok_or_else(invalid)?;
    digits.parse::<u64>().map_err(|_| invalid())
}

// ─── Table scanning ────────────────────────────────────────────────────────

#[derive(Debug)]
struct Row {
    label: String,
    values: Vec<String>,
}

fn labeled_tables(doc: &str) -> Vec<Vec<Row>> {
    elements(doc, "table")
        .into_iter()
        .map(|table| {
            elements(table, "tr")
                .into_iter()
                .filter_map(|row| {
                    let mut cells = elements(row, "td").into_iter().map(cell_text);
                    let label = cells.next()?.to_uppercase();
                    let values: Vec<String> = cells.collect();
                    if values.is_empty() {
                        return None;
                    }
                    Some(Row { label, values })
                })
                .collect()
        })
        .collect()
}

fn batteries_from_tables(tables: &[Vec<Row>]) -> Result<Vec<BatteryEntry>, ParseError> {
    let mut batteries = Vec::new();
    let mut seen_design = false;

    for rows in tables {
        let design = rows.iter().find(|r| r.label.contains(DESIGN_CAPACITY));
        let full = rows.iter().find(|r| r.label.contains(FULL_CHARGE_CAPACITY));
        seen_design |= design.is_some();

        let (Some(design), Some(full)) = (design, full) else {
            continue;
        };

        for (column, design_text) in design.values.iter().enumerate() {
            let full_text = full.values.get(column).map(String::as_str).unwrap_or("");
            batteries.push(battery_column(rows, column, design_text, full_text));
        }
    }

    if batteries.is_empty() {
        let missing = if seen_design { FULL_CHARGE_CAPACITY } else { DESIGN_CAPACITY };
        return Err(ParseError::MissingField(missing));
    }
    Ok(batteries)
}

fn battery_column(rows: &[Row], column: usize, design_text: &str, full_text: &str) -> BatteryEntry {
    Ok(BatteryReport {
        design_capacity_mwh: parse_capacity(DESIGN_CAPACITY, design_text)?,
        full_charge_capacity_mwh: parse_capacity(FULL_CHARGE_CAPACITY, full_text)?,
        details: details_for_column(rows, column),
    })
}

fn details_for_column(rows: &[Row], column: usize) -> BatteryDetails {
    let value = |label: &str| {
        rows.iter()
            .find(|r| r.label == label)
            .and_then(|r| r.values.get(column))
            .and_then(|v| present(v))
    };
    BatteryDetails {
        name: value("NAME"),
        manufacturer: value("MANUFACTURER"),
        serial_number: value("SERIAL NUMBER"),
        chemistry: value("CHEMISTRY"),
        cycle_count: value("CYCLE COUNT")
            .and_then(|v| leading_number(&v))
            .and_then(|n| n.parse().ok()),
    }
}

fn metadata_from_tables(tables: &[Vec<Row>]) -> ReportMetadata {
    let value = |label: &str| {
        tables
            .iter()
            .flatten()
            .find(|r| r.label == label)
            .and_then(|r| r.values.first())
            .and_then(|v| present(v))
    };
    ReportMetadata {
        computer_name: value("COMPUTER NAME"),
        system_product_name: value("SYSTEM PRODUCT NAME"),
        os_build: value("OS BUILD"),
        report_time: value("REPORT TIME"),
    }
}

/// `-` and empty cells mean the OS had no value.
fn present(value: &str) -> Option<String> {
    match value.trim() {
        "" | "-" => None,
        v => Some(v.to_string()),
    }
}

fn leading_number(text: &str) -> Option<String> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let mut digits = String::new();
    let mut chars = text[start..].chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if matches!(c, ',' | '.' | ' ' | '\u{a0}' | '\u{202f}')
            && chars.peek().is_some_and(|n| n.is_ascii_digit())
        {
            continue;
        } else {
            break;
        }
    }
    Some(digits)
}

/// Inner markup of every `<tag>` element directly reachable in `doc`.
///
/// An element ends at its closing tag, or at the next opening tag of the same
/// name when the close was omitted.
fn elements<'a>(doc: &'a str, tag: &str) -> Vec<&'a str> {
    // ASCII lowering keeps byte offsets identical to `doc`
    let lower = doc.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(start) = find_tag(&lower, &open, pos) {
        let Some(gt) = lower[start..].find('>') else { break };
        let content_start = start + gt + 1;
        let next_close = find_tag(&lower, &close, content_start);
        let next_open = find_tag(&lower, &open, content_start);
        let content_end = match (next_close, next_open) {
            (Some(c), Some(o)) => c.min(o),
            (Some(c), None) => c,
            (None, Some(o)) => o,
            (None, None) => doc.len(),
        };
        out.push(&doc[content_start..content_end]);
        pos = content_end;
    }
    out
}

/// Find `<name` followed by a tag boundary, so `<tr` never matches `<track`.
fn find_tag(lower: &str, pattern: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(idx) = lower[pos..].find(pattern) {
        let at = pos + idx;
        let after = at + pattern.len();
        match lower[after..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return Some(at),
            None => return None,
            _ => pos = after,
        }
    }
    None
}

/// Visible text of a cell: tags removed, entities decoded, whitespace collapsed.
fn cell_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    // no-break spaces count as whitespace here, so `57&nbsp;020` becomes `57 020`
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let c = match &rest[1..end] {
                "nbsp" => '\u{a0}',
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                num => {
                    let code = if let Some(hex) =
                        num.strip_prefix("#x").or_else(|| num.strip_prefix("#X"))
                    {
                        u32::from_str_radix(hex, 16).ok()?
                    } else {
                        num.strip_prefix('#')?.parse().ok()?
                    };
                    char::from_u32(code)?
                }
            };
            Some((c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
