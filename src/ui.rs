use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use transaction_pipeline::{Column, PipelineRun, ProductCategory, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Generated,
    Cleaned,
    Transformed,
    Aggregated,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Generated,
        Page::Cleaned,
        Page::Transformed,
        Page::Aggregated,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Generated => Page::Cleaned,
            Page::Cleaned => Page::Transformed,
            Page::Transformed => Page::Aggregated,
            Page::Aggregated => Page::Generated,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Generated => Page::Aggregated,
            Page::Cleaned => Page::Generated,
            Page::Transformed => Page::Cleaned,
            Page::Aggregated => Page::Transformed,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Generated => "Generated",
            Page::Cleaned => "Cleaned",
            Page::Transformed => "Transformed",
            Page::Aggregated => "Aggregated",
        }
    }

    fn index(&self) -> usize {
        match self {
            Page::Generated => 0,
            Page::Cleaned => 1,
            Page::Transformed => 2,
            Page::Aggregated => 3,
        }
    }
}

pub struct App {
    pub run: PipelineRun,
    pub current_page: Page,
    pub states: [TableState; 4],
    pub show_detail: bool,
    pub category_filter: Option<ProductCategory>,
}

impl App {
    pub fn new(run: PipelineRun) -> Self {
        let mut states: [TableState; 4] = Default::default();
        for state in states.iter_mut() {
            state.select(Some(0));
        }

        Self {
            run,
            current_page: Page::Generated,
            states,
            show_detail: false,
            category_filter: None,
        }
    }

    fn table(&self, page: Page) -> Option<&transaction_pipeline::Table> {
        match page {
            Page::Generated => Some(&self.run.generated),
            Page::Cleaned => Some(&self.run.cleaned),
            Page::Transformed => Some(&self.run.transformed),
            Page::Aggregated => None,
        }
    }

    /// Records of the current page after the category filter.
    pub fn visible_records(&self) -> Vec<&Transaction> {
        self.visible_records_for(self.current_page)
    }

    fn visible_records_for(&self, page: Page) -> Vec<&Transaction> {
        match self.table(page) {
            Some(table) => table
                .iter()
                .filter(|tx| match self.category_filter {
                    Some(category) => tx.product_category == Some(category),
                    None => true,
                })
                .collect(),
            None => Vec::new(),
        }
    }

    fn row_count(&self) -> usize {
        self.row_count_for(self.current_page)
    }

    fn row_count_for(&self, page: Page) -> usize {
        match page {
            Page::Aggregated => self.run.aggregated.len(),
            _ => self.visible_records_for(page).len(),
        }
    }

    fn state_mut(&mut self) -> &mut TableState {
        &mut self.states[self.current_page.index()]
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        let selected = self.states[self.current_page.index()].selected()?;
        self.visible_records().get(selected).copied()
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn apply_filter(&mut self, category: Option<ProductCategory>) {
        self.category_filter = category;
        for page in Page::ALL {
            let selection = if self.row_count_for(page) > 0 { Some(0) } else { None };
            self.states[page.index()].select(selection);
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn move_selection(&mut self, delta: isize, wrap: bool) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let current = self.state_mut().selected().unwrap_or(0) as isize;
        let last = len as isize - 1;
        let target = current + delta;
        let i = if wrap {
            if target > last {
                0
            } else if target < 0 {
                last
            } else {
                target
            }
        } else {
            target.clamp(0, last)
        };
        self.state_mut().select(Some(i as usize));
    }

    pub fn next(&mut self) {
        self.move_selection(1, true);
    }

    pub fn previous(&mut self) {
        self.move_selection(-1, true);
    }

    pub fn page_down(&mut self) {
        self.move_selection(20, false);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-20, false);
    }

    pub fn home(&mut self) {
        self.move_selection(isize::MIN / 2, false);
    }

    pub fn end(&mut self) {
        self.move_selection(isize::MAX / 2, false);
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('c') => app.apply_filter(None),
                KeyCode::Char(d @ '1'..='4') => {
                    let idx = d as usize - '1' as usize;
                    app.apply_filter(Some(ProductCategory::ALL[idx]));
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.home(),
                KeyCode::End => app.end(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.current_page == Page::Aggregated {
        render_aggregate(f, chunks[1], app);
    } else if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Seed: {}", app.run.seed),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("✗ {} dropped", app.run.cleaning.dropped_rows()),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Σ {:.2}", app.run.aggregated.total()),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn category_color(category: Option<ProductCategory>) -> Color {
    match category {
        Some(ProductCategory::Electronics) => Color::Cyan,
        Some(ProductCategory::Clothing) => Color::Magenta,
        Some(ProductCategory::HomeGoods) => Color::Yellow,
        Some(ProductCategory::Books) => Color::Green,
        None => Color::Red,
    }
}

fn header_row<'a>(names: impl Iterator<Item = &'a str>) -> Row<'a> {
    let cells = names.map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(table) = app.table(app.current_page) else {
        return;
    };
    let columns: Vec<Column> = table.columns().to_vec();

    let header = header_row(columns.iter().map(|c| c.name()));

    let rows: Vec<Row> = app
        .visible_records()
        .into_iter()
        .map(|tx| {
            let color = category_color(tx.product_category);
            let cells: Vec<Cell> = columns
                .iter()
                .map(|c| {
                    let text = match c {
                        Column::Amount => tx
                            .amount
                            .map(|a| format!("{:.2}", a))
                            .unwrap_or_else(|| "NaN".to_string()),
                        _ => cell_text(tx, *c),
                    };
                    match c {
                        Column::Amount | Column::ProductCategory => {
                            Cell::from(text).style(Style::default().fg(color))
                        }
                        _ => Cell::from(text),
                    }
                })
                .collect();
            Row::new(cells).height(1)
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|c| Constraint::Length(c.name().len().max(12) as u16 + 2))
        .collect();

    let title = format!(" {} ({} rows) ", app.current_page.title(), rows.len());
    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    let idx = app.current_page.index();
    f.render_stateful_widget(widget, area, &mut app.states[idx]);
}

fn render_aggregate(f: &mut Frame, area: Rect, app: &mut App) {
    let header = header_row(
        ["Category", "Transactions", "Total Amount", "Avg Amount"].into_iter(),
    );

    let rows: Vec<Row> = app
        .run
        .aggregated
        .rows()
        .iter()
        .map(|row| {
            let avg = if row.transactions > 0 {
                row.amount / row.transactions as f64
            } else {
                0.0
            };
            Row::new(vec![
                Cell::from(row.product_category.to_string())
                    .style(Style::default().fg(category_color(Some(row.product_category)))),
                Cell::from(row.transactions.to_string()),
                Cell::from(format!("{:.2}", row.amount)),
                Cell::from(format!("{:.2}", avg)),
            ])
        })
        .collect();

    let widget = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Amount by Product Category "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    let idx = Page::Aggregated.index();
    f.render_stateful_widget(widget, area, &mut app.states[idx]);
}

/// Cell text with missing values shown as "NaN", like the previews.
fn cell_text(tx: &Transaction, column: Column) -> String {
    tx.cell(column).unwrap_or_else(|| "NaN".to_string())
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(Color::Yellow);

    let lines: Vec<Line> = match app.selected_transaction() {
        Some(tx) => {
            let mut lines = Vec::new();
            for column in Column::BASE.iter().chain(std::iter::once(&Column::TransactionYear)) {
                let value = cell_text(tx, *column);
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<18}", column.name()), label),
                    Span::raw(value),
                ]));
            }

            if let Some(drop) = app
                .run
                .cleaning
                .dropped
                .iter()
                .find(|d| d.transaction_id == tx.transaction_id)
            {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Dropped by cleaner: {}", drop.reason.describe()),
                    Style::default().fg(Color::Red),
                )));
            }
            lines
        }
        None => vec![Line::from("No row selected")],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Details "),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.states[app.current_page.index()]
        .selected()
        .map(|i| i + 1)
        .unwrap_or(0);
    let total = app.row_count();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(category) = app.category_filter {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", category),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("1-4", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Category | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Stage | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
