use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use crate::application::{
    assemble, paginate, Cell, GroupBy, Page, ReportQuery, ReportResult, ReportType,
};
use crate::domain::format_cents;
use crate::io::{write_csv, write_html, write_print, ImportOptions, Importer};
use crate::storage::DocumentStore;

/// Cells wider than this are truncated in table output.
const MAX_COLUMN_WIDTH: usize = 32;

/// Cobranza - Collections and Billing Reports
#[derive(Parser)]
#[command(name = "cobranza")]
#[command(about = "Billing, collections and payroll reports over a document store")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "cobranza.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Import a storage snapshot (a JSON object keyed by collection name)
    Import {
        /// Input file (stdin if omitted)
        input: Option<String>,

        /// Validate and count without writing
        #[arg(long)]
        dry_run: bool,

        /// Clear each collection before loading its documents
        #[arg(long)]
        replace: bool,
    },

    /// List collections, or the document keys of one collection
    Collections {
        /// Collection name (omit to list all collections)
        name: Option<String>,
    },

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Invoice register for a period
    Invoices {
        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Debit note register for a period
    DebitNotes {
        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Credit note register for a period
    CreditNotes {
        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Collections for a period, by city or by executive
    Collections {
        /// City code (grouped by executive)
        #[arg(long)]
        city: Option<String>,

        /// Executive id (grouped by payment source; --city narrows the lookup)
        #[arg(long)]
        executive: Option<String>,

        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Account statements with per-installment balances
    Statement {
        /// City code
        #[arg(long)]
        city: String,

        /// Limit the statement to one invoice
        #[arg(long)]
        invoice: Option<String>,

        /// Start date (YYYY-MM-DD, omit for the full payment history)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, omit for the full payment history)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Payroll summary by area with collected amounts
    Payroll {
        /// City code
        #[arg(long)]
        city: String,

        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Commission vouchers for an executive's assigned accounts
    Commissions {
        /// Executive id
        #[arg(long)]
        executive: String,

        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
pub struct OutputArgs {
    /// Output format: table, json, csv, html, print
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Override the report's default grouping
    #[arg(long)]
    pub group_by: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Page to display (table format only)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (table format only)
    #[arg(long, default_value = "40")]
    pub page_size: usize,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                DocumentStore::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Import {
                input,
                dry_run,
                replace,
            } => {
                let store = DocumentStore::connect(&self.database).await?;
                run_import_command(&store, input.as_deref(), dry_run, replace).await?;
            }

            Commands::Collections { name } => {
                let store = DocumentStore::connect(&self.database).await?;
                run_collections_command(&store, name.as_deref()).await?;
            }

            Commands::Report(report_cmd) => {
                let store = DocumentStore::connect(&self.database).await?;
                run_report_command(&store, report_cmd, self.verbose).await?;
            }
        }

        Ok(())
    }
}

async fn run_import_command(
    store: &DocumentStore,
    input: Option<&str>,
    dry_run: bool,
    replace: bool,
) -> Result<()> {
    use std::fs::File;
    use std::io::{stdin, Read};

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let importer = Importer::new(store);
    let result = importer
        .import_snapshot(reader, ImportOptions { dry_run, replace })
        .await?;

    if dry_run {
        println!("Validation complete (dry run, nothing written)");
    } else {
        println!("Import complete");
    }
    println!("  Collections: {}", result.collections);
    println!("  Imported:    {}", result.imported);
    println!("  Skipped:     {}", result.skipped);

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!("  {}[{}]: {}", error.collection, error.index, error.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

async fn run_collections_command(store: &DocumentStore, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let documents = store.list(name).await?;
            if documents.is_empty() {
                println!("No documents in '{}'.", name);
            } else {
                for document in &documents {
                    println!("{}", document.key);
                }
                println!("({} documents)", documents.len());
            }
        }
        None => {
            let stats = store.collection_stats().await?;
            if stats.is_empty() {
                println!("No collections found.");
            } else {
                println!("{:<28} {:>10}", "COLLECTION", "DOCUMENTS");
                println!("{}", "-".repeat(40));
                for entry in &stats {
                    println!("{:<28} {:>10}", entry.name, entry.documents);
                }
            }
        }
    }
    Ok(())
}

async fn run_report_command(
    store: &DocumentStore,
    cmd: ReportCommands,
    verbose: bool,
) -> Result<()> {
    let (query, output) = build_query(cmd)?;
    let result = assemble(store, &query).await?;
    render_report(&result, &output, verbose).await
}

/// Turn a report subcommand into a validated query plus its output options.
fn build_query(cmd: ReportCommands) -> Result<(ReportQuery, OutputArgs)> {
    let (mut query, output) = match cmd {
        ReportCommands::Invoices { from, to, output } => {
            let (from, to) = parse_date_range(from, to)?;
            (
                ReportQuery::new(ReportType::InvoiceRegister).with_range(from, to),
                output,
            )
        }

        ReportCommands::DebitNotes { from, to, output } => {
            let (from, to) = parse_date_range(from, to)?;
            (
                ReportQuery::new(ReportType::DebitNoteRegister).with_range(from, to),
                output,
            )
        }

        ReportCommands::CreditNotes { from, to, output } => {
            let (from, to) = parse_date_range(from, to)?;
            (
                ReportQuery::new(ReportType::CreditNoteRegister).with_range(from, to),
                output,
            )
        }

        ReportCommands::Collections {
            city,
            executive,
            from,
            to,
            output,
        } => {
            let (from, to) = parse_date_range(from, to)?;
            let query = match (city, executive) {
                (city, Some(executive)) => {
                    let mut query = ReportQuery::new(ReportType::CollectionsByExecutive)
                        .with_executive(executive);
                    if let Some(city) = city {
                        query = query.with_city(city);
                    }
                    query
                }
                (Some(city), None) => {
                    ReportQuery::new(ReportType::CollectionsByCity).with_city(city)
                }
                (None, None) => {
                    anyhow::bail!("The collections report needs --city or --executive")
                }
            };
            (query.with_range(from, to), output)
        }

        ReportCommands::Statement {
            city,
            invoice,
            from,
            to,
            output,
        } => {
            let mut query = ReportQuery::new(ReportType::AccountStatement).with_city(city);
            if let Some(invoice) = invoice {
                query = query.with_invoice(invoice);
            }
            // No default range: a statement covers the whole payment history
            query.date_from = from.map(|s| parse_date(&s)).transpose()?;
            query.date_to = to.map(|s| parse_date(&s)).transpose()?;
            (query, output)
        }

        ReportCommands::Payroll {
            city,
            from,
            to,
            output,
        } => {
            let (from, to) = parse_date_range(from, to)?;
            (
                ReportQuery::new(ReportType::PayrollSummary)
                    .with_city(city)
                    .with_range(from, to),
                output,
            )
        }

        ReportCommands::Commissions {
            executive,
            from,
            to,
            output,
        } => {
            let (from, to) = parse_date_range(from, to)?;
            (
                ReportQuery::new(ReportType::CommissionVoucher)
                    .with_executive(executive)
                    .with_range(from, to),
                output,
            )
        }
    };

    if let Some(group_by) = &output.group_by {
        let group = GroupBy::from_str(group_by).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid grouping '{}'. Valid values: city, executive, holder, invoice, source, area, period",
                group_by
            )
        })?;
        query = query.with_group_by(group);
    }

    Ok((query, output))
}

async fn render_report(result: &ReportResult, output: &OutputArgs, verbose: bool) -> Result<()> {
    use std::fs::File;
    use std::io::{stdout, Write};

    let mut writer: Box<dyn Write> = match &output.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match output.format.as_str() {
        "json" => {
            serde_json::to_writer_pretty(&mut writer, result)?;
            writeln!(writer)?;
        }
        "csv" => {
            let count = write_csv(result, writer).await?;
            if output.output.is_some() {
                eprintln!("Exported {} rows", count);
            }
        }
        "html" => {
            let count = write_html(result, writer).await?;
            if output.output.is_some() {
                eprintln!("Exported {} rows", count);
            }
        }
        "print" => {
            let count = write_print(result, writer).await?;
            if output.output.is_some() {
                eprintln!("Exported {} rows", count);
            }
        }
        "table" => {
            let page = paginate(result, output.page_size, output.page);
            print_table(result, &page, &mut writer)?;
        }
        other => {
            anyhow::bail!(
                "Invalid format '{}'. Valid formats: table, json, csv, html, print",
                other
            );
        }
    }

    report_warnings(result, verbose);
    Ok(())
}

/// Warnings go to stderr so they never land in a redirected report.
fn report_warnings(result: &ReportResult, verbose: bool) {
    if result.warnings.is_empty() {
        return;
    }
    eprintln!(
        "{} data issue(s) found during assembly (use --verbose to list them)",
        result.warnings.len()
    );
    if verbose {
        for warning in &result.warnings {
            eprintln!("  {}", warning);
        }
    }
}

fn print_table<W: std::io::Write>(
    result: &ReportResult,
    page: &Page,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "{}", result.title)?;
    if let Some((from, to)) = result.period {
        writeln!(
            writer,
            "Period: {} to {}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        )?;
    }
    writeln!(writer)?;

    if result.is_empty() {
        writeln!(writer, "No rows matched this query.")?;
        return Ok(());
    }

    // Fit column widths to this page's content
    let columns = result.columns.len();
    let mut widths: Vec<usize> = result.columns.iter().map(|c| display_width(c)).collect();
    let mut numeric = vec![false; columns];
    for group in &page.groups {
        for row in &group.rows {
            for (i, cell) in row.cells.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(display_width(&render_cell(cell)));
                if cell.is_numeric() {
                    numeric[i] = true;
                }
            }
        }
    }
    let amount_width = display_width(&format_cents(page.grand_total_cents));
    if let Some(last) = widths.last_mut() {
        *last = (*last).max(amount_width);
    }

    let line_width = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);
    let last_width = widths.last().copied().unwrap_or(0);
    let lead_width = line_width.saturating_sub(last_width);

    let header: Vec<String> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| pad(column, widths[i], numeric[i]))
        .collect();
    writeln!(writer, "{}", header.join("  ").trim_end())?;
    writeln!(writer, "{}", "-".repeat(line_width))?;

    for group in &page.groups {
        writeln!(writer, "{}", group.label)?;
        for row in &group.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .enumerate()
                .take(columns)
                .map(|(i, cell)| pad(&render_cell(cell), widths[i], numeric[i]))
                .collect();
            writeln!(writer, "{}", cells.join("  ").trim_end())?;
        }
        if group.continues {
            writeln!(writer, "  (continues on the next page)")?;
        } else {
            writeln!(
                writer,
                "{:<lead_width$}{:>last_width$}",
                "  Subtotal",
                format_cents(group.subtotal_cents)
            )?;
        }
    }

    writeln!(writer, "{}", "-".repeat(line_width))?;
    if page.is_last() {
        writeln!(
            writer,
            "{:<lead_width$}{:>last_width$}",
            "TOTAL",
            format_cents(page.grand_total_cents)
        )?;
    }
    if page.page_count > 1 {
        writeln!(writer)?;
        writeln!(
            writer,
            "Page {} of {} ({} rows)",
            page.index, page.page_count, page.total_rows
        )?;
    }

    Ok(())
}

fn render_cell(cell: &Cell) -> String {
    truncate(&cell.render(), MAX_COLUMN_WIDTH)
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

/// Width as the terminal sees it. Formatter padding counts chars, so
/// this must too or accented names would misalign columns.
fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn truncate(value: &str, max_len: usize) -> String {
    if display_width(value) <= max_len {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn parse_date_range(from: Option<String>, to: Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    use chrono::Datelike;

    let today = Utc::now().date_naive();

    // Default to_date is today
    let to_date = match to {
        Some(date_str) => parse_date(&date_str)?,
        None => today,
    };

    // Default from_date is start of current month
    let from_date = match from {
        Some(date_str) => parse_date(&date_str)?,
        None => today.with_day(1).unwrap_or(today),
    };

    Ok((from_date, to_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long holder name here", 10), "a very ...");
        // Multibyte names must not split inside a char
        assert_eq!(truncate("Muñoz Peña María", 10), "Muñoz P...");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
        );
        assert!(parse_date("05/03/2026").is_err());
    }

    #[test]
    fn test_parse_date_range_defaults() {
        use chrono::Datelike;

        let (from, to) = parse_date_range(None, None).unwrap();
        assert_eq!(from.day(), 1);
        assert!(from <= to);

        let (from, to) =
            parse_date_range(Some("2026-01-01".to_string()), Some("2026-01-31".to_string()))
                .unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
    }

    #[test]
    fn test_build_query_maps_subcommands() {
        let (query, _) = build_query(ReportCommands::Payroll {
            city: "051".to_string(),
            from: Some("2026-01-01".to_string()),
            to: Some("2026-01-31".to_string()),
            output: default_output(),
        })
        .unwrap();
        assert_eq!(query.report_type, ReportType::PayrollSummary);
        assert_eq!(query.city_code.as_deref(), Some("051"));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_build_query_collections_needs_a_target() {
        let result = build_query(ReportCommands::Collections {
            city: None,
            executive: None,
            from: None,
            to: None,
            output: default_output(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_build_query_rejects_unknown_grouping() {
        let mut output = default_output();
        output.group_by = Some("nonsense".to_string());
        let result = build_query(ReportCommands::Invoices {
            from: Some("2026-01-01".to_string()),
            to: Some("2026-01-31".to_string()),
            output,
        });
        assert!(result.is_err());
    }

    fn default_output() -> OutputArgs {
        OutputArgs {
            format: "table".to_string(),
            group_by: None,
            output: None,
            page: 1,
            page_size: 40,
        }
    }
}
