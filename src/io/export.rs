use anyhow::Result;
use std::io::Write;

use crate::application::{Cell, ReportResult};
use crate::domain::format_cents;

/// Rows written between cooperative yields, so a large export never hogs
/// the runtime.
const EXPORT_CHUNK_ROWS: usize = 500;

const BASE_CSS: &str = "\
body { font-family: sans-serif; margin: 2em; color: #222; }
h1 { font-size: 1.4em; margin-bottom: 0.2em; }
p.period { color: #555; margin-top: 0; }
table { border-collapse: collapse; width: 100%; margin-top: 1em; }
th, td { border: 1px solid #999; padding: 4px 8px; font-size: 0.9em; }
th { background: #ddd; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
tr.group td { background: #eee; font-weight: bold; }
tr.subtotal td { border-top: 2px solid #666; font-weight: bold; }
tr.total td { background: #ddd; font-weight: bold; }
p.warnings { color: #a40; }
p.footer { color: #888; font-size: 0.8em; }";

const PRINT_CSS: &str = "\
@media print {
  body { margin: 0; }
  tr.group td { page-break-after: avoid; }
  table { page-break-inside: auto; }
  tr { page-break-inside: avoid; }
}";

enum HtmlStyle {
    Sheet,
    Print,
}

/// Export a report as CSV: one record per data row with the group label in
/// the first column, closed by a grand-total record. Returns the number of
/// data rows written.
pub async fn write_csv<W: Write>(result: &ReportResult, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(result.columns.len() + 1);
    header.push("Group");
    header.extend(result.columns.iter().copied());
    csv_writer.write_record(&header)?;

    let mut count = 0;
    for group in &result.groups {
        for row in &group.rows {
            let mut record: Vec<String> = Vec::with_capacity(row.cells.len() + 1);
            record.push(group.label.clone());
            record.extend(row.cells.iter().map(Cell::render));
            csv_writer.write_record(&record)?;

            count += 1;
            if count % EXPORT_CHUNK_ROWS == 0 {
                csv_writer.flush()?;
                tokio::task::yield_now().await;
            }
        }
    }

    let mut total = vec![String::new(); header.len()];
    total[0] = "TOTAL".to_string();
    total[header.len() - 1] = format_cents(result.grand_total_cents);
    csv_writer.write_record(&total)?;

    csv_writer.flush()?;
    Ok(count)
}

/// Export a report as a spreadsheet-flavored HTML table.
pub async fn write_html<W: Write>(result: &ReportResult, writer: W) -> Result<usize> {
    write_html_document(result, writer, HtmlStyle::Sheet).await
}

/// Export a report as a print document: the same table with print styles
/// and a generation footer.
pub async fn write_print<W: Write>(result: &ReportResult, writer: W) -> Result<usize> {
    write_html_document(result, writer, HtmlStyle::Print).await
}

async fn write_html_document<W: Write>(
    result: &ReportResult,
    mut writer: W,
    style: HtmlStyle,
) -> Result<usize> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html><head><meta charset=\"utf-8\">")?;
    writeln!(writer, "<title>{}</title>", escape_html(&result.title))?;
    writeln!(writer, "<style>")?;
    writeln!(writer, "{}", BASE_CSS)?;
    if matches!(style, HtmlStyle::Print) {
        writeln!(writer, "{}", PRINT_CSS)?;
    }
    writeln!(writer, "</style></head><body>")?;
    writeln!(writer, "<h1>{}</h1>", escape_html(&result.title))?;
    if let Some((from, to)) = result.period {
        writeln!(writer, "<p class=\"period\">Period: {} to {}</p>", from, to)?;
    }

    let span = result.columns.len().max(2);
    writeln!(writer, "<table>")?;
    let headers: String = result
        .columns
        .iter()
        .map(|column| format!("<th>{}</th>", escape_html(column)))
        .collect();
    writeln!(writer, "<thead><tr>{}</tr></thead>", headers)?;
    writeln!(writer, "<tbody>")?;

    let mut count = 0;
    for group in &result.groups {
        writeln!(
            writer,
            "<tr class=\"group\"><td colspan=\"{}\">{}</td></tr>",
            span,
            escape_html(&group.label)
        )?;
        for row in &group.rows {
            let cells: String = row
                .cells
                .iter()
                .map(|cell| {
                    let class = if cell.is_numeric() { " class=\"num\"" } else { "" };
                    format!("<td{}>{}</td>", class, escape_html(&cell.render()))
                })
                .collect();
            writeln!(writer, "<tr>{}</tr>", cells)?;

            count += 1;
            if count % EXPORT_CHUNK_ROWS == 0 {
                tokio::task::yield_now().await;
            }
        }
        writeln!(
            writer,
            "<tr class=\"subtotal\"><td colspan=\"{}\">Subtotal</td><td class=\"num\">{}</td></tr>",
            span - 1,
            format_cents(group.subtotal_cents)
        )?;
    }
    writeln!(
        writer,
        "<tr class=\"total\"><td colspan=\"{}\">Total</td><td class=\"num\">{}</td></tr>",
        span - 1,
        format_cents(result.grand_total_cents)
    )?;
    writeln!(writer, "</tbody></table>")?;

    if !result.warnings.is_empty() {
        writeln!(
            writer,
            "<p class=\"warnings\">{} data issue(s) found during assembly</p>",
            result.warnings.len()
        )?;
    }
    writeln!(
        writer,
        "<p class=\"footer\">Generated {}</p>",
        result.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(writer, "</body></html>")?;

    writer.flush()?;
    Ok(count)
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Rojas & Cia <SA>"), "Rojas &amp; Cia &lt;SA&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
