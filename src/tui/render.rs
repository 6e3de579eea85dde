use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};

use super::app::{App, InputMode};
use super::tab::Tab;
use super::theme::Theme;
use crate::app::LoadStatus;
use crate::constants::{HEADER_PHOTO, UI_FOOTER, UI_SUBTITLE, UI_TITLE};
use crate::directory::{page_window, Choice, Count, PageLink, PageSize, PhotoKind};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &mut App) {
    let theme = Theme::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &theme);
    render_tabs(frame, chunks[1], app, &theme);

    match app.load.status().clone() {
        LoadStatus::Idle | LoadStatus::Loading => render_loading(frame, chunks[2], app, &theme),
        LoadStatus::Failed(message) => render_error(frame, chunks[2], app, &message, &theme),
        LoadStatus::Ready => match app.tab {
            Tab::Biodata => render_biodata(frame, chunks[2], app, &theme),
            Tab::Infografik => render_infografik(frame, chunks[2], app, &theme),
            Tab::TambahGuru => render_form(frame, chunks[2], app, &theme),
        },
    }

    render_status_bar(frame, chunks[3], app, &theme);

    if app.detail_open {
        let area = frame.area();
        render_detail(frame, area, app, &theme);
    }
}

/// Render the banner
fn render_header(frame: &mut Frame, area: Rect, theme: &Theme) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(UI_TITLE, theme.title())),
        Line::from(Span::styled(UI_SUBTITLE, theme.muted())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.colors.maroon)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.display_name())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.border(false)),
        )
        .style(theme.muted())
        .highlight_style(theme.selected_tab())
        .divider(" ");

    frame.render_widget(tabs, area);
}

fn render_loading(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Memuatkan data guru...",
            Style::default().fg(theme.colors.gold),
        )),
        Line::from(Span::styled(app.source_location.as_str(), theme.muted())),
    ];
    let loading = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(loading, area);
}

fn render_error(frame: &mut Frame, area: Rect, app: &App, message: &str, theme: &Theme) {
    let cached = app.load.dataset().len();
    let mut text = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Tekan "),
            Span::styled("r", Style::default().fg(theme.colors.gold)),
            Span::raw(" untuk Cuba Lagi"),
        ]),
    ];
    if cached > 0 {
        text.push(Line::from(vec![
            Span::raw("Tekan "),
            Span::styled("Esc", Style::default().fg(theme.colors.gold)),
            Span::raw(format!(" untuk melihat {} rekod tersimpan", cached)),
        ]));
    }

    let panel = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Ralat Sambungan ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.colors.error)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(panel, area);
}

fn render_biodata(frame: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let view = &app.biodata;
    let page = view.page();
    let paged = view.page_size() != PageSize::All && page.total_pages > 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                         // Filters
            Constraint::Min(3),                            // Table
            Constraint::Length(if paged { 2 } else { 0 }), // Pagination
        ])
        .split(area);

    // Filter bar
    let searching = app.input_mode == InputMode::Search;
    let cursor = if searching { "▏" } else { "" };
    let search_text = if view.selection().search.is_empty() && !searching {
        Span::styled("Cari nama guru...", theme.muted())
    } else {
        Span::raw(format!("{}{}", view.selection().search, cursor))
    };
    let filters = Paragraph::new(Line::from(vec![
        Span::styled("Cari: ", theme.title()),
        search_text,
        Span::raw("   "),
        Span::styled("Gred: ", theme.title()),
        facet(&view.selection().grade, theme),
        Span::raw("   "),
        Span::styled("Pengkhususan: ", theme.title()),
        facet(&view.selection().specialization, theme),
        Span::raw("   "),
        Span::styled("Paparkan ", theme.muted()),
        Span::raw(view.page_size().to_string()),
        Span::styled(" baris", theme.muted()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(searching)),
    );
    frame.render_widget(filters, chunks[0]);

    // Table
    let records = view.page_records();
    if records.is_empty() {
        let empty = Paragraph::new("Tiada rekod dijumpai bagi kriteria carian anda.")
            .style(theme.muted())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)));
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(["Nama", "Gred", "Pengkhususan", "Kelulusan", "Gambar"])
            .style(
                Style::default()
                    .fg(theme.colors.gold)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<Row> = records
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(r.grade.clone()).style(Style::default().fg(theme.colors.gold)),
                    Cell::from(r.specialization.clone()),
                    Cell::from(r.qualification.clone())
                        .style(Style::default().add_modifier(Modifier::ITALIC)),
                    Cell::from(r.photo_or_placeholder(PhotoKind::Thumbnail).to_string())
                        .style(theme.muted()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(28),
                Constraint::Length(8),
                Constraint::Percentage(22),
                Constraint::Percentage(22),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .style(Style::default().fg(theme.colors.text_primary))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)))
        .row_highlight_style(Style::default().bg(theme.colors.highlight_bg))
        .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, chunks[1], &mut app.table_state);
    }

    if paged {
        let (first, last, total) = page.range();
        let mut strip = vec![Span::styled("‹ ", theme.muted())];
        for link in page_window(page.index, page.total_pages) {
            match link {
                PageLink::Page(n) if n == page.index => {
                    strip.push(Span::styled(format!("[{}]", n), theme.selected_tab()))
                }
                PageLink::Page(n) => strip.push(Span::raw(format!(" {} ", n))),
                PageLink::Gap => strip.push(Span::styled(" … ", theme.muted())),
            }
        }
        strip.push(Span::styled(" ›", theme.muted()));

        let pagination = Paragraph::new(vec![
            Line::from(Span::styled(
                format!(
                    "Menunjukkan {} hingga {} daripada {} entri",
                    first, last, total
                ),
                theme.muted(),
            )),
            Line::from(strip),
        ]);
        frame.render_widget(pagination, chunks[2]);
    }
}

/// An unset facet reads as muted "Semua"
fn facet(choice: &Choice, theme: &Theme) -> Span<'static> {
    let label = choice.label().to_string();
    if choice.is_all() {
        Span::styled(label, theme.muted())
    } else {
        Span::styled(label, Style::default().fg(theme.colors.gold))
    }
}

fn bars<'a>(counts: &'a [Count], colour: impl Fn(usize) -> ratatui::style::Color) -> Vec<Bar<'a>> {
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::default()
                .value(c.count as u64)
                .label(Line::from(c.value.as_str()))
                .text_value(c.count.to_string())
                .style(Style::default().fg(colour(i)))
        })
        .collect()
}

fn render_infografik(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chart = app.infografik.chart();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Focus selector
            Constraint::Min(6),    // Charts
            Constraint::Length(3), // Totals
        ])
        .split(area);

    let focus = Paragraph::new(Line::from(vec![
        Span::styled("Fokus Gred: ", theme.title()),
        Span::raw(chart.focus.label().to_string()),
        Span::styled("   (g/G untuk tukar)", theme.muted()),
    ]));
    frame.render_widget(focus, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let grade_bars = bars(&chart.grades, |i| theme.grade_bar(i));
    let grade_chart = BarChart::default()
        .block(
            Block::default()
                .title(" Bilangan Guru Mengikut Gred ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.colors.maroon)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&grade_bars));
    frame.render_widget(grade_chart, columns[0]);

    let specialization_bars = bars(&chart.specializations, |i| theme.specialization_bar(i));
    let specialization_chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(
                    " Taburan Pengkhususan {} ",
                    chart.specialization_scope()
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.colors.gold)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&specialization_bars));
    frame.render_widget(specialization_chart, columns[1]);

    let totals = Paragraph::new(Line::from(vec![
        Span::raw("Terdapat seramai "),
        Span::styled(chart.total.to_string(), theme.title()),
        Span::raw(" orang guru berdaftar di SK Klang Gate pada masa kini."),
    ]))
    .block(
        Block::default()
            .title(" Statistik Keseluruhan ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.colors.gold)),
    );
    frame.render_widget(totals, chunks[2]);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let link = match &app.form_url {
        Some(url) => Span::styled(
            url.as_str(),
            Style::default()
                .fg(theme.colors.gold)
                .add_modifier(Modifier::UNDERLINED),
        ),
        None => Span::styled(
            "Pautan borang belum dikonfigurasi (form.url)",
            Style::default().fg(theme.colors.error),
        ),
    };

    let text = vec![
        Line::from(Span::styled("Daftar Guru Baru", theme.title())),
        Line::from(Span::styled(
            "Sila lengkapkan butiran berikut untuk pendaftaran pangkalan data.",
            theme.muted(),
        )),
        Line::from(""),
        Line::from(link),
        Line::from(""),
        Line::from(Span::styled(
            "Pendaftaran ini akan dikemaskini secara automatik dalam pangkalan data utama selepas pengesahan pentadbir.",
            theme.muted(),
        )),
    ];

    let form = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Borang Tambah Guru SK Klang Gate ")
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(form, area);
}

/// Popup with every column of the selected record
fn render_detail(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let Some(record) = app.selected_record() else {
        return;
    };

    let dataset = app.biodata.dataset();
    let mut lines: Vec<Line> = dataset
        .headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|header| {
            let value = if header == HEADER_PHOTO {
                record.photo_or_placeholder(PhotoKind::Portrait)
            } else {
                record.get(header).unwrap_or("")
            };
            Line::from(vec![
                Span::styled(format!("{}: ", header), theme.title()),
                Span::raw(value.to_string()),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Esc untuk tutup", theme.muted())));

    let width = 70.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", record.name))
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup);
    frame.render_widget(detail, popup);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![Span::styled(
        format!(" {} ", UI_FOOTER),
        Style::default().fg(theme.colors.maroon).add_modifier(Modifier::BOLD),
    )];

    if let Some(loaded_at) = app.load.dataset().loaded_at {
        spans.push(Span::styled(
            format!("| {} rekod, {} ", app.load.dataset().len(), loaded_at.format("%H:%M")),
            theme.muted(),
        ));
    }

    if app.load.is_stale() && app.load.status() == &LoadStatus::Ready {
        spans.push(Span::styled(
            "| DATA LAMA (muat semula gagal) ",
            Style::default().fg(theme.colors.error),
        ));
    }

    let hint = match (&app.status_message, app.input_mode) {
        (Some(message), _) => message.clone(),
        (None, InputMode::Search) => "Enter/Esc selesai mencari".to_string(),
        (None, InputMode::Normal) => format!(
            "{}  |  Tab tukar tab  r muat semula  q keluar",
            app.tab.keyboard_hint()
        ),
    };
    spans.push(Span::styled(format!("| {}", hint), theme.muted()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadOutcome;
    use crate::directory::fixtures::{dataset, teacher};
    use crate::utils::DirectoryError;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(records: usize) -> App {
        let mut app = App::new("mock://sheet".to_string(), None, PageSize::rows(10));
        let ticket = app.begin_load();
        let rows = (0..records)
            .map(|i| teacher(&format!("Guru {:02}", i), "DG41", "Sains"))
            .collect();
        app.apply_load(LoadOutcome {
            ticket,
            result: Ok(dataset(rows)),
        });
        app
    }

    #[test]
    fn test_loading_screen() {
        let mut app = App::new("mock://sheet".to_string(), None, PageSize::default());
        app.begin_load();
        let text = screen(&mut app);
        assert!(text.contains("DATA GURU SK KLANG GATE"));
        assert!(text.contains("Memuatkan data guru"));
    }

    #[test]
    fn test_biodata_table_and_pagination() {
        let mut app = app_with(25);
        let text = screen(&mut app);
        assert!(text.contains("Guru 00"));
        assert!(!text.contains("Guru 10"));
        assert!(text.contains("Menunjukkan 1 hingga 10 daripada 25 entri"));
    }

    #[test]
    fn test_empty_result_message() {
        let mut app = app_with(3);
        app.biodata.set_search("tiada sesiapa");
        let text = screen(&mut app);
        assert!(text.contains("Tiada rekod dijumpai"));
    }

    #[test]
    fn test_error_panel_mentions_cached_rows() {
        let mut app = app_with(3);
        let ticket = app.begin_load();
        app.apply_load(LoadOutcome {
            ticket,
            result: Err(DirectoryError::FetchError("HTTP 500".to_string())),
        });

        let text = screen(&mut app);
        assert!(text.contains("Ralat Sambungan"));
        assert!(text.contains("Fetch error: HTTP 500"));
        assert!(text.contains("3 rekod tersimpan"));
    }

    #[test]
    fn test_infografik_and_form_tabs() {
        let mut app = app_with(4);
        app.tab = Tab::Infografik;
        let text = screen(&mut app);
        assert!(text.contains("Bilangan Guru Mengikut Gred"));
        assert!(text.contains("(Top 10)"));

        app.tab = Tab::TambahGuru;
        app.form_url = Some("https://example.org/form".to_string());
        let text = screen(&mut app);
        assert!(text.contains("https://example.org/form"));
    }
}
