use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::graphql::Dataset;
use crate::session::SessionContext;
use crate::utils::truncate_text;
use crate::views::{DatasetKind, GateField, GateView, ListDisplay, ListView, Screen, Slot};

use super::app::App;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let screen = app.screen();
    match &screen {
        Screen::Gate => render_gate(f, chunks[1], app.gate()),
        Screen::List { dataset: DatasetKind::Characters, .. } => {
            render_list(f, chunks[1], app.characters(), app.session())
        }
        Screen::List { dataset: DatasetKind::Launches, .. } => {
            render_list(f, chunks[1], app.launches(), app.session())
        }
        Screen::NotFound(path) => {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("Nothing lives at {}", path),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from("Press ENTER to go back to the characters list."),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Not found "));
            f.render_widget(body, chunks[1]);
        }
    }

    let help = match screen {
        Screen::Gate if app.gate().is_editing() => {
            " TAB: Switch field | ENTER: Save | ESC: Cancel "
        }
        Screen::Gate => " TAB: Switch field | ENTER: Continue | ESC: Quit ",
        Screen::List { .. } => {
            " ↑↓: Select | ENTER: Details | ←→: Page | 1/2: Dataset | r: Reload | e: Edit info | o: Sign out | q: Quit "
        }
        Screen::NotFound(_) => " ENTER: Home | q: Quit ",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let who = match app.session().current() {
        Some(identity) => Span::styled(
            format!("{} · {}", identity.display_name, identity.title),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("not signed in", Style::default().fg(Color::DarkGray)),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Explorer ", Style::default().add_modifier(Modifier::BOLD)),
        Span::from(format!("{}  ", app.route())),
        who,
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_gate(f: &mut Frame, area: Rect, gate: &GateView) {
    let form_area = centered(area, 60, 11);
    let title = if gate.is_editing() { " Edit your info " } else { " Who are you? " };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(form_area);
    f.render_widget(Clear, form_area);
    f.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    for (field, area) in [(GateField::DisplayName, rows[0]), (GateField::Title, rows[1])] {
        let focused = gate.focus() == field;
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let mut value = gate.value(field).to_string();
        if focused {
            value.push('▏');
        }
        let input = Paragraph::new(value)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", field.label())));
        f.render_widget(input, area);
    }

    if let Some(error) = gate.error() {
        f.render_widget(
            Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
            rows[2],
        );
    }
}

fn render_list<D: Dataset>(f: &mut Frame, area: Rect, view: &ListView<D>, session: &SessionContext) {
    let dataset = view.dataset();
    let page_label = match view.total_pages() {
        Some(total) => format!(" {} · page {} of {} ", dataset.title(), view.page(), total),
        None => format!(" {} · page {} ", dataset.title(), view.page()),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let block = Block::default().borders(Borders::ALL).title(page_label);

    match view.display(session) {
        // Resolved before we get here, but never show rows without an identity.
        ListDisplay::Gate => {}
        ListDisplay::Loading => {
            f.render_widget(
                Paragraph::new("Loading…")
                    .alignment(Alignment::Center)
                    .block(block),
                chunks[0],
            );
        }
        ListDisplay::Error(message) => {
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        "Could not load this page",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(message.to_string()),
                ])
                .wrap(Wrap { trim: true })
                .block(block),
                chunks[0],
            );
        }
        ListDisplay::Table(page) if page.is_empty() => {
            f.render_widget(
                Paragraph::new("No records on this page.")
                    .alignment(Alignment::Center)
                    .block(block),
                chunks[0],
            );
        }
        ListDisplay::Table(page) => {
            let columns = dataset.columns();
            let cell_width = (chunks[0].width as usize / columns.len().max(1)).saturating_sub(2);
            let header = Row::new(columns.iter().map(|c| Cell::from(*c)))
                .style(Style::default().add_modifier(Modifier::BOLD));
            let rows = page.items.iter().map(|item| {
                Row::new(
                    dataset
                        .row(item)
                        .into_iter()
                        .map(|value| Cell::from(truncate_text(&value, cell_width))),
                )
            });
            let widths = vec![Constraint::Ratio(1, columns.len().max(1) as u32); columns.len()];
            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("▶ ");
            let mut state = TableState::default().with_selected(Some(view.selected()));
            f.render_stateful_widget(table, chunks[0], &mut state);
        }
    }

    let control = |label: &str, enabled: bool| {
        Span::styled(
            format!(" {} ", label),
            if enabled {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            control("◀ previous", view.has_previous()),
            Span::from(format!(" {} ", view.page())),
            control("next ▶", view.has_next()),
        ]))
        .alignment(Alignment::Center),
        chunks[1],
    );

    if let Some(overlay) = view.detail() {
        render_detail(f, area, dataset.as_ref(), &overlay.id, &overlay.state);
    }
}

fn render_detail<D: Dataset>(f: &mut Frame, area: Rect, dataset: &D, id: &str, state: &Slot<D::Detail>) {
    let popup = centered(area, 80, 18);
    f.render_widget(Clear, popup);

    let (title, lines) = match state {
        Slot::Idle | Slot::Loading => (format!(" #{} ", id), vec![Line::from("Loading…")]),
        Slot::Failed(message) => (
            format!(" #{} ", id),
            vec![Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red)))],
        ),
        Slot::Ready(detail) => {
            let lines = dataset
                .detail_fields(detail)
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{:<12}", label), Style::default().add_modifier(Modifier::BOLD)),
                        Span::from(value),
                    ])
                })
                .collect();
            (format!(" {} ", dataset.detail_heading(detail)), lines)
        }
    };

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(" ESC: Close "),
        );
    f.render_widget(body, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
