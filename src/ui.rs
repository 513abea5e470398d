//! Terminal rendering. Reads controller state, never mutates it.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Tabs};
use ratatui::Frame;

use clock_core::{format_duration, ClockSnapshot, Tab};

use crate::app::App;
use crate::countdown::{Field, TimerPanel};
use crate::particles::{ParticleField, Tint};
use crate::stopwatch::StopwatchPanel;

const ACCENT: Color = Color::Rgb(167, 139, 250);
const PINK: Color = Color::Rgb(244, 114, 182);
const DIM: Color = Color::DarkGray;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    draw_particles(frame, area, &app.particles);

    let [tabs_area, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_tabs(frame, tabs_area, app.tabs.active());

    let mut clock_area = body;
    if !app.tabs.is_active(Tab::Clock) {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
        clock_area = left;
        if app.tabs.panel_visible(Tab::Stopwatch) {
            draw_stopwatch(frame, right, &app.stopwatch);
        }
        if app.tabs.panel_visible(Tab::Timer) {
            draw_timer(frame, right, &app.timer, app.now_ms());
        }
    }
    draw_clock(frame, clock_area, &app.clock.snapshot);

    frame.render_widget(
        Paragraph::new("1-3/Tab switch  Space start/pause  ? help  q quit")
            .style(Style::default().fg(DIM))
            .alignment(Alignment::Center),
        footer,
    );

    if app.help_visible {
        draw_help(frame, area, app.help_text());
    } else if app.confirm_exit {
        draw_confirm_exit(frame, area);
    }
}

fn draw_particles(frame: &mut Frame, area: Rect, field: &ParticleField) {
    let mut violet = Vec::new();
    let mut pink = Vec::new();
    let mut cyan = Vec::new();
    for p in field.visible() {
        match p.tint {
            Tint::Violet => violet.push((p.x, p.y)),
            Tint::Pink => pink.push((p.x, p.y)),
            Tint::Cyan => cyan.push((p.x, p.y)),
        }
    }
    let canvas = Canvas::default()
        .marker(Marker::Dot)
        .x_bounds([0.0, 1.0])
        .y_bounds([0.0, 1.0])
        .paint(|ctx| {
            ctx.draw(&Points { coords: &violet, color: ACCENT });
            ctx.draw(&Points { coords: &pink, color: PINK });
            ctx.draw(&Points { coords: &cyan, color: Color::Cyan });
        });
    frame.render_widget(canvas, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .map(|t| format!("{} {}", t.index() + 1, t.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::bordered().title(" DYNE CLOCK "))
        .select(active.index())
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED));
    frame.render_widget(tabs, area);
}

fn draw_clock(frame: &mut Frame, area: Rect, snap: &ClockSnapshot) {
    let [dial_area, digital_area, arc_area, info_area] = Layout::vertical([
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(area);

    draw_dial(frame, square(dial_area), snap);

    let digital = Line::from(vec![
        Span::styled(
            snap.strings.digital.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", snap.strings.ampm),
            Style::default().fg(Color::Black).bg(ACCENT),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(digital)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        digital_area,
    );

    let gauge = Gauge::default()
        .block(Block::bordered().title(" Seconds "))
        .gauge_style(Style::default().fg(PINK))
        .ratio(snap.arc_progress().clamp(0.0, 1.0))
        .label(format!("{:02}s  offset {:.1}", snap.sec_frac as u32, snap.arc_offset()));
    frame.render_widget(gauge, arc_area);

    let info = Line::from(vec![
        Span::styled(snap.strings.weekday.clone(), Style::default().fg(ACCENT)),
        Span::styled("  |  ", Style::default().fg(DIM)),
        Span::raw(snap.strings.date.clone()),
        Span::styled("  |  ", Style::default().fg(DIM)),
        Span::raw(snap.strings.utc_offset.clone()),
    ]);
    frame.render_widget(
        Paragraph::new(info)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        info_area,
    );
}

/// Point on the dial at `radius` and `degrees` clockwise from twelve.
fn polar(radius: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (radius * rad.sin(), radius * rad.cos())
}

fn draw_dial(frame: &mut Frame, area: Rect, snap: &ClockSnapshot) {
    let hands = snap.hands();
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.1, 1.1])
        .y_bounds([-1.1, 1.1])
        .paint(|ctx| {
            ctx.draw(&Circle { x: 0.0, y: 0.0, radius: 1.05, color: DIM });
            for i in 0..60 {
                let inner = if i % 5 == 0 { 0.82 } else { 0.92 };
                let (x1, y1) = polar(inner, i as f64 * 6.0);
                let (x2, y2) = polar(1.0, i as f64 * 6.0);
                let color = if i % 5 == 0 { Color::White } else { DIM };
                ctx.draw(&CanvasLine { x1, y1, x2, y2, color });
            }
            for (angle, len, color) in [
                (hands.hour, 0.5, Color::White),
                (hands.minute, 0.75, ACCENT),
                (hands.second, 0.9, PINK),
            ] {
                let (x2, y2) = polar(len, angle);
                ctx.draw(&CanvasLine { x1: 0.0, y1: 0.0, x2, y2, color });
            }
        });
    frame.render_widget(canvas, area);
}

/// Largest centred rect that renders as a square, with cells twice as tall
/// as they are wide.
fn square(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(2));
    let height = (width / 2).max(1).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn key_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default()
    } else {
        Style::default().fg(DIM)
    };
    vec![
        Span::styled(format!("[{}] ", key), style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("{}   ", label), style),
    ]
}

fn draw_stopwatch(frame: &mut Frame, area: Rect, panel: &StopwatchPanel) {
    let sw = &panel.stopwatch;
    let block = Block::bordered().title(" STOPWATCH ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [time_area, hint_area, laps_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(panel.display(), Style::default().add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        time_area,
    );

    let running = sw.is_running();
    let resettable = !running && (sw.elapsed_ms() > 0 || !sw.laps().is_empty());
    let mut hints = key_hint("Space", sw.control_label(), true);
    hints.extend(key_hint("l", "Lap", running));
    hints.extend(key_hint("r", "Reset", resettable));
    frame.render_widget(Paragraph::new(Line::from(hints)).alignment(Alignment::Center), hint_area);

    // Lap list (most recent first)
    let mut lines = vec![Line::styled(
        format!("{:<8}{:>14}{:>16}", "Lap", "Split", "Total"),
        Style::default().fg(DIM),
    )];
    lines.extend(sw.laps_recent_first().skip(panel.lap_scroll_offset).map(|lap| {
        Line::from(format!(
            "Lap {:02}  {:>14}{:>16}",
            lap.index,
            format_duration(lap.duration_ms as i64, true),
            format_duration(lap.cumulative_ms as i64, true)
        ))
    }));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), laps_area);
}

fn draw_timer(frame: &mut Frame, area: Rect, panel: &TimerPanel, now_ms: u64) {
    let block = Block::bordered().title(" TIMER ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [display_area, hint_area, progress_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(3),
    ])
    .areas(inner);

    let cd = &panel.countdown;
    if panel.accepts_input() {
        let field = |text: &str, which: Field| {
            let shown = if text.is_empty() { "00".to_string() } else { format!("{:0>2}", text) };
            let mut style = if text.is_empty() { Style::default().fg(DIM) } else { Style::default() };
            if panel.focus == which {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(format!(" {} ", shown), style)
        };
        let fields = Line::from(vec![
            field(&panel.input.hours, Field::Hours),
            Span::raw("h : "),
            field(&panel.input.minutes, Field::Minutes),
            Span::raw("m : "),
            field(&panel.input.seconds, Field::Seconds),
            Span::raw("s"),
        ]);
        frame.render_widget(Paragraph::new(fields).alignment(Alignment::Center), display_area);
    } else {
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if panel.flash_active(now_ms) {
            style = style.fg(Color::Red).add_modifier(Modifier::SLOW_BLINK);
        }
        frame.render_widget(
            Paragraph::new(Span::styled(cd.display(), style)).alignment(Alignment::Center),
            display_area,
        );
        let gauge = Gauge::default()
            .block(Block::bordered())
            .gauge_style(Style::default().fg(ACCENT))
            .ratio(cd.progress().clamp(0.0, 1.0))
            .label(format!("of {}", format_duration(cd.configured_ms() as i64, false)));
        frame.render_widget(gauge, progress_area);
    }

    let mut hints = key_hint("Space", cd.control_label(), true);
    hints.extend(key_hint("r", "Reset", panel.is_configured()));
    frame.render_widget(Paragraph::new(Line::from(hints)).alignment(Alignment::Center), hint_area);
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

pub fn draw_help(frame: &mut Frame, area: Rect, help_text: &str) {
    let lines: Vec<Line> = help_text.lines().map(Line::from).collect();
    let height = lines.len() as u16 + 4;
    let popup = centered(area, 40, height);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(" Help ")
                .title_bottom(" Press any key to close "),
        ),
        popup,
    );
}

pub fn draw_confirm_exit(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 36, 8);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("A timer is still running."),
            Line::from("Exit anyway?"),
            Line::from(""),
            Line::from("  y = Stop & exit"),
            Line::from("  n = Cancel"),
        ])
        .block(Block::bordered().title(" Timer Running ")),
        popup,
    );
}
