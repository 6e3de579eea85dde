use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::warn;

use crate::{
    cli::{ListArgs, OutputFormat, StatsArgs},
    directory::{
        apply_filters, chart_data, clamp_page, distinct_values, load_dataset, page_window, paginate,
        total_pages, ChartData, Choice, Count, Dataset, Field, FilterSelection, PageLink,
        PageSize, Record, SheetSource,
    },
};

/// One page of the filtered staff table
#[derive(Debug, Serialize)]
pub struct ListReport {
    pub search: String,
    pub grade: Choice,
    pub specialization: Choice,
    pub page_size: PageSize,
    /// 1-based page actually shown, after clamping
    pub page: usize,
    pub total_pages: usize,
    /// 1-based position of the first row shown; 0 when nothing matched
    pub first: usize,
    pub last: usize,
    /// Rows passing the filters
    pub matched: usize,
    /// Rows in the whole dataset
    pub total: usize,
    pub rows: Vec<Record>,
}

/// Facet option sets as the selectors list them
#[derive(Debug, Serialize)]
pub struct OptionsReport {
    pub grades: Vec<Choice>,
    pub specializations: Vec<Choice>,
}

/// Runs the one-shot reports against a freshly loaded dataset
pub struct ReportRunner {
    source: Arc<dyn SheetSource>,
    page_size: PageSize,
}

impl ReportRunner {
    pub fn new(source: Arc<dyn SheetSource>, page_size: PageSize) -> Self {
        Self { source, page_size }
    }

    /// Fetch and parse the sheet once
    pub async fn load(&self) -> Result<Dataset> {
        let dataset = load_dataset(self.source.as_ref()).await?;
        if dataset.is_empty() {
            warn!("{} has no teacher rows", self.source.location());
        }
        Ok(dataset)
    }

    pub async fn list(&self, args: &ListArgs) -> Result<String> {
        let dataset = self.load().await?;
        let report = list_report(&dataset, args, self.page_size);
        Ok(format_list(&report, args.format))
    }

    pub async fn stats(&self, args: &StatsArgs) -> Result<String> {
        let dataset = self.load().await?;
        let focus = Choice::from_arg(args.grade.as_deref());
        let chart = chart_data(dataset.records(), &focus);
        Ok(format_stats(&chart, args.format))
    }

    pub async fn options(&self, format: OutputFormat) -> Result<String> {
        let dataset = self.load().await?;
        Ok(format_options(&options_report(&dataset), format))
    }
}

/// Filter, then cut the requested page; the page is clamped into range
pub fn list_report(dataset: &Dataset, args: &ListArgs, page_size: PageSize) -> ListReport {
    let selection = FilterSelection {
        search: args.search.clone(),
        grade: Choice::from_arg(args.grade.as_deref()),
        specialization: Choice::from_arg(args.specialization.as_deref()),
    };

    let matched = apply_filters(dataset.records(), &selection);
    let index = clamp_page(args.page, total_pages(matched.len(), page_size));
    let page = paginate(&matched, index, page_size);
    let (first, last, _) = page.range();

    ListReport {
        search: selection.search,
        grade: selection.grade,
        specialization: selection.specialization,
        page_size,
        page: index,
        total_pages: page.total_pages,
        first,
        last,
        matched: matched.len(),
        total: dataset.len(),
        rows: page.items.iter().map(|&r| r.clone()).collect(),
    }
}

pub fn options_report(dataset: &Dataset) -> OptionsReport {
    OptionsReport {
        grades: distinct_values(dataset.records(), Field::Grade),
        specializations: distinct_values(dataset.records(), Field::Specialization),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize report: {}\"}}", e))
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}

/// Markdown cells cannot carry raw pipes
fn md_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

pub fn format_list(report: &ListReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "{} {}  {} {}  {} {}",
                "Cari:".bold(),
                if report.search.is_empty() { "-" } else { report.search.as_str() },
                "Gred:".bold(),
                report.grade,
                "Pengkhususan:".bold(),
                report.specialization
            );
            output.push('\n');

            if report.rows.is_empty() {
                let _ = writeln!(
                    output,
                    "{}",
                    "Tiada rekod dijumpai bagi kriteria carian anda.".yellow()
                );
                return output;
            }

            let headers = ["Nama", "Gred", "Pengkhususan", "Kelulusan"];
            let mut widths = headers.map(width);
            for r in &report.rows {
                for (w, value) in widths.iter_mut().zip(row_cells(r)) {
                    *w = (*w).max(width(value));
                }
            }

            let header_line: Vec<String> = headers
                .iter()
                .zip(widths)
                .map(|(h, w)| pad(h, w).bold().to_string())
                .collect();
            let _ = writeln!(output, "{}", header_line.join("  "));

            for r in &report.rows {
                let [name, grade, specialization, qualification] = row_cells(r);
                let _ = writeln!(
                    output,
                    "{}  {}  {}  {}",
                    pad(name, widths[0]).bold(),
                    pad(grade, widths[1]).yellow(),
                    pad(specialization, widths[2]),
                    pad(qualification, widths[3]).italic()
                );
            }

            output.push('\n');
            let _ = writeln!(
                output,
                "Menunjukkan {} hingga {} daripada {} entri",
                report.first, report.last, report.matched
            );
            if report.total_pages > 1 {
                let strip: Vec<String> = page_window(report.page, report.total_pages)
                    .into_iter()
                    .map(|link| match link {
                        PageLink::Page(n) if n == report.page => format!("[{}]", n).bold().to_string(),
                        PageLink::Page(n) => n.to_string(),
                        PageLink::Gap => "…".to_string(),
                    })
                    .collect();
                let _ = writeln!(output, "Halaman: {}", strip.join(" "));
            }
            output
        }
        OutputFormat::Markdown => {
            let mut output = String::new();
            output.push_str("## Biodata Guru\n\n");
            if report.rows.is_empty() {
                output.push_str("_Tiada rekod dijumpai bagi kriteria carian anda._\n");
                return output;
            }

            output.push_str("| Nama | Gred | Pengkhususan | Kelulusan |\n");
            output.push_str("|---|---|---|---|\n");
            for r in &report.rows {
                let cells = row_cells(r).map(md_cell);
                let _ = writeln!(output, "| {} |", cells.join(" | "));
            }
            output.push_str("\n---\n");
            let _ = writeln!(
                output,
                "*Menunjukkan {} hingga {} daripada {} entri | Halaman {}/{}*",
                report.first, report.last, report.matched, report.page, report.total_pages
            );
            output
        }
    }
}

fn row_cells(r: &Record) -> [&str; 4] {
    [
        r.name.as_str(),
        r.grade.as_str(),
        r.specialization.as_str(),
        r.qualification.as_str(),
    ]
}

const BAR_WIDTH: usize = 40;

fn text_bars(output: &mut String, counts: &[Count]) {
    let label_width = counts.iter().map(|c| width(&c.value)).max().unwrap_or(0);
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0).max(1);
    for c in counts {
        let len = (c.count * BAR_WIDTH).div_ceil(max);
        let _ = writeln!(
            output,
            "  {} {} {}",
            pad(&c.value, label_width),
            "█".repeat(len).yellow(),
            c.count
        );
    }
}

fn markdown_counts(output: &mut String, heading: &str, column: &str, counts: &[Count]) {
    let _ = writeln!(output, "### {}\n", heading);
    let _ = writeln!(output, "| {} | Bilangan |", column);
    output.push_str("|---|---:|\n");
    for c in counts {
        let _ = writeln!(output, "| {} | {} |", md_cell(&c.value), c.count);
    }
    output.push('\n');
}

pub fn format_stats(chart: &ChartData, format: OutputFormat) -> String {
    let specialization_title = format!("Taburan Pengkhususan {}", chart.specialization_scope());
    match format {
        OutputFormat::Json => to_json(chart),
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{}", "Bilangan Guru Mengikut Gred".bold());
            text_bars(&mut output, &chart.grades);
            output.push('\n');
            let _ = writeln!(output, "{}", specialization_title.bold());
            text_bars(&mut output, &chart.specializations);
            output.push('\n');
            let _ = writeln!(
                output,
                "Terdapat seramai {} orang guru berdaftar di SK Klang Gate pada masa kini.",
                chart.total.to_string().bold()
            );
            output
        }
        OutputFormat::Markdown => {
            let mut output = String::from("## Infografik\n\n");
            markdown_counts(&mut output, "Bilangan Guru Mengikut Gred", "Gred", &chart.grades);
            markdown_counts(
                &mut output,
                &specialization_title,
                "Pengkhususan",
                &chart.specializations,
            );
            let _ = writeln!(output, "**Jumlah guru berdaftar:** {}", chart.total);
            output
        }
    }
}

pub fn format_options(report: &OptionsReport, format: OutputFormat) -> String {
    let labels = |choices: &[Choice]| {
        choices
            .iter()
            .map(|c| c.label().to_string())
            .collect::<Vec<_>>()
    };
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{}", "Gred:".bold());
            for label in labels(&report.grades) {
                let _ = writeln!(output, "  • {}", label);
            }
            let _ = writeln!(output, "{}", "Pengkhususan:".bold());
            for label in labels(&report.specializations) {
                let _ = writeln!(output, "  • {}", label);
            }
            output
        }
        OutputFormat::Markdown => {
            let mut output = String::from("## Gred\n\n");
            for label in labels(&report.grades) {
                let _ = writeln!(output, "- {}", label);
            }
            output.push_str("\n## Pengkhususan\n\n");
            for label in labels(&report.specializations) {
                let _ = writeln!(output, "- {}", label);
            }
            output
        }
    }
}
