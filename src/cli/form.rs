//! Full-screen prediction form using ratatui
//!
//! One page with six inputs in two columns and a Predict button. Every
//! submission reads the current field values, scores them against the fitted
//! pipeline and shows the probability under the form. Nothing carries over
//! between submissions except the field values themselves.

use std::io::{self, stdout};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use crate::pipeline::{
    DealPipeline, DealTerms, FormOptions, DEFAULT_LENGTH, DEFAULT_PREMIUM, DEFAULT_SIZE,
};
use crate::utils::format_probability;

/// Arrow-key step for Deal Size
const SIZE_STEP: f64 = 100.0;
/// Arrow-key step for Expected Length
const LENGTH_STEP: f64 = 10.0;
/// Slider step for Premium
const PREMIUM_STEP: f64 = 0.01;

/// Form inputs in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Size,
    Premium,
    Length,
    DealType,
    NatureOfBid,
    PaymentType,
    Predict,
}

impl Field {
    const ORDER: [Field; 7] = [
        Field::Size,
        Field::Premium,
        Field::Length,
        Field::DealType,
        Field::NatureOfBid,
        Field::PaymentType,
        Field::Predict,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Size => "Deal Size (USD million)",
            Field::Premium => "Premium (0-1 = 0%-100%)",
            Field::Length => "Expected Length (days)",
            Field::DealType => "Deal Type",
            Field::NatureOfBid => "Nature of Bid",
            Field::PaymentType => "Payment Type",
            Field::Predict => "Predict",
        }
    }
}

/// What the caller should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Quit,
}

/// Result line shown below the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Probability(f64),
    Invalid(String),
}

/// Field values and focus of the form
#[derive(Debug, Clone)]
pub struct FormState {
    options: FormOptions,
    size_input: String,
    length_input: String,
    premium: f64,
    deal_type: usize,
    nature_of_bid: usize,
    payment_type: usize,
    focus: usize,
    outcome: Option<FormOutcome>,
}

impl FormState {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            size_input: format_number(DEFAULT_SIZE),
            length_input: format_number(DEFAULT_LENGTH),
            premium: DEFAULT_PREMIUM,
            deal_type: 0,
            nature_of_bid: 0,
            payment_type: 0,
            focus: 0,
            outcome: None,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ORDER[self.focus]
    }

    pub fn outcome(&self) -> Option<&FormOutcome> {
        self.outcome.as_ref()
    }

    pub fn set_outcome(&mut self, outcome: FormOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn premium(&self) -> f64 {
        self.premium
    }

    /// Current values as deal terms; numeric text that does not parse is
    /// reported by field name
    pub fn terms(&self) -> Result<DealTerms, String> {
        let size = self
            .size_input
            .parse::<f64>()
            .map_err(|_| format!("{} must be a number", Field::Size.label()))?;
        let length = self
            .length_input
            .parse::<i64>()
            .map_err(|_| format!("{} must be a whole number", Field::Length.label()))?;

        Ok(DealTerms {
            size,
            premium: self.premium,
            length: length as f64,
            deal_type: pick(&self.options.deal_types, self.deal_type),
            nature_of_bid: pick(&self.options.natures_of_bid, self.nature_of_bid),
            payment_type: pick(&self.options.payment_types, self.payment_type),
        })
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return FormAction::Quit;
        }

        match key.code {
            KeyCode::Esc => return FormAction::Quit,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % Field::ORDER.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + Field::ORDER.len() - 1) % Field::ORDER.len()
            }
            KeyCode::Left => self.step(-1),
            KeyCode::Right => self.step(1),
            KeyCode::Backspace => {
                if let Some(input) = self.numeric_input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                let allow_fraction = self.focused() == Field::Size;
                if let Some(input) = self.numeric_input_mut() {
                    let accepted = c.is_ascii_digit()
                        || (c == '-' && input.is_empty())
                        || (c == '.' && allow_fraction && !input.contains('.'));
                    if accepted {
                        input.push(c);
                    }
                }
            }
            _ => {}
        }

        FormAction::Continue
    }

    fn numeric_input_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            Field::Size => Some(&mut self.size_input),
            Field::Length => Some(&mut self.length_input),
            _ => None,
        }
    }

    fn step(&mut self, direction: i32) {
        let dir = f64::from(direction);
        match self.focused() {
            Field::Size => {
                let current = self.size_input.parse::<f64>().unwrap_or(0.0);
                self.size_input = format_number(current + dir * SIZE_STEP);
            }
            Field::Length => {
                let current = self.length_input.parse::<i64>().unwrap_or(0);
                let delta = i64::from(direction) * LENGTH_STEP as i64;
                self.length_input = current.saturating_add(delta).to_string();
            }
            Field::Premium => {
                let next = self.premium + dir * PREMIUM_STEP;
                self.premium = ((next * 100.0).round() / 100.0).clamp(0.0, 1.0);
            }
            Field::DealType => {
                cycle(&mut self.deal_type, self.options.deal_types.len(), direction)
            }
            Field::NatureOfBid => cycle(
                &mut self.nature_of_bid,
                self.options.natures_of_bid.len(),
                direction,
            ),
            Field::PaymentType => cycle(
                &mut self.payment_type,
                self.options.payment_types.len(),
                direction,
            ),
            Field::Predict => {}
        }
    }

    fn display_value(&self, field: Field) -> String {
        match field {
            Field::Size => self.size_input.clone(),
            Field::Length => self.length_input.clone(),
            Field::Premium => format!("{:.2}", self.premium),
            Field::DealType => pick(&self.options.deal_types, self.deal_type),
            Field::NatureOfBid => pick(&self.options.natures_of_bid, self.nature_of_bid),
            Field::PaymentType => pick(&self.options.payment_types, self.payment_type),
            Field::Predict => String::new(),
        }
    }
}

/// Run the form until the user quits
pub fn run_form(pipeline: &DealPipeline, options: FormOptions) -> Result<()> {
    enable_raw_mode()?;

    run_then_restore(
        || {
            let mut terminal = setup_terminal()?;
            run_form_loop(&mut terminal, pipeline, FormState::new(options))
        },
        restore_terminal,
    )
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    stdout().execute(EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run `body`, then `restore` whatever the outcome; the body's error wins
fn run_then_restore(
    body: impl FnOnce() -> Result<()>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let result = body();
    restore()?;
    result
}

fn run_form_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    pipeline: &DealPipeline,
    mut state: FormState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_form(frame, &state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match state.handle_key(key) {
                FormAction::Quit => return Ok(()),
                FormAction::Submit => {
                    let outcome = match state.terms() {
                        Ok(terms) => FormOutcome::Probability(pipeline.predict(&terms)?),
                        Err(message) => FormOutcome::Invalid(message),
                    };
                    state.set_outcome(outcome);
                }
                FormAction::Continue => {}
            }
        }
    }
}

/// Draw the whole page
pub fn draw_form(frame: &mut Frame, state: &FormState) {
    let area = frame.area();

    let form_width = 80u16.min(area.width);
    let form_height = 22u16.min(area.height);
    let x = area.width.saturating_sub(form_width) / 2;
    let y = area.height.saturating_sub(form_height) / 2;
    let form_area = Rect::new(x, y, form_width, form_height);

    frame.render_widget(Clear, form_area);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Deal-Closure Probability ")
        .title_style(Style::default().fg(Color::Cyan).bold());
    let inner = outer_block.inner(form_area);
    frame.render_widget(outer_block, form_area);

    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(9),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .split(inner);

    let intro = Paragraph::new(Line::from(vec![
        Span::styled(" Fill in the deal terms and press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Predict", Style::default().fg(Color::White).bold()),
    ]));
    frame.render_widget(intro, rows[0]);

    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let left = Layout::vertical([Constraint::Length(3); 3]).split(columns[0]);
    let right = Layout::vertical([Constraint::Length(3); 3]).split(columns[1]);

    draw_text_field(frame, state, Field::Size, left[0]);
    draw_premium_slider(frame, state, right[0]);
    draw_text_field(frame, state, Field::Length, left[1]);
    draw_select_field(frame, state, Field::DealType, right[1]);
    draw_select_field(frame, state, Field::NatureOfBid, left[2]);
    draw_select_field(frame, state, Field::PaymentType, right[2]);

    draw_predict_button(frame, state, rows[2]);
    draw_outcome(frame, state, rows[3]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(" Tab/↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" move  ", Style::default().fg(Color::DarkGray)),
        Span::styled("←→", Style::default().fg(Color::Cyan)),
        Span::styled(" adjust  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" predict  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(help, rows[4]);
}

fn field_block(state: &FormState, field: Field) -> Block<'static> {
    let color = if state.focused() == field {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", field.label()))
}

fn draw_text_field(frame: &mut Frame, state: &FormState, field: Field, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {}", state.display_value(field)),
        Style::default().fg(Color::White).bold(),
    )];
    if state.focused() == field {
        spans.push(Span::styled("▌", Style::default().fg(Color::Yellow)));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(field_block(state, field));
    frame.render_widget(paragraph, area);
}

fn draw_premium_slider(frame: &mut Frame, state: &FormState, area: Rect) {
    let gauge = Gauge::default()
        .block(field_block(state, Field::Premium))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(state.premium().clamp(0.0, 1.0))
        .label(state.display_value(Field::Premium));
    frame.render_widget(gauge, area);
}

fn draw_select_field(frame: &mut Frame, state: &FormState, field: Field, area: Rect) {
    let value = state.display_value(field);
    let arrow_style = if state.focused() == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(" ◀ ", arrow_style),
        Span::styled(value, Style::default().fg(Color::White).bold()),
        Span::styled(" ▶", arrow_style),
    ]))
    .block(field_block(state, field));
    frame.render_widget(paragraph, area);
}

fn draw_predict_button(frame: &mut Frame, state: &FormState, area: Rect) {
    let style = if state.focused() == Field::Predict {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Cyan).bold()
    };
    let button = Paragraph::new(Line::from(Span::styled("[ Predict ]", style)))
        .alignment(Alignment::Center);
    frame.render_widget(button, area);
}

fn draw_outcome(frame: &mut Frame, state: &FormState, area: Rect) {
    let line = match state.outcome() {
        Some(FormOutcome::Probability(p)) => Line::from(vec![
            Span::styled(" ✓ Estimated probability of ", Style::default().fg(Color::Green)),
            Span::styled("closing", Style::default().fg(Color::Green).bold()),
            Span::styled(": ", Style::default().fg(Color::Green)),
            Span::styled(format_probability(*p), Style::default().fg(Color::Green).bold()),
        ]),
        Some(FormOutcome::Invalid(message)) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn pick(values: &[String], idx: usize) -> String {
    values.get(idx).cloned().unwrap_or_default()
}

fn cycle(idx: &mut usize, len: usize, direction: i32) {
    if len == 0 {
        return;
    }
    *idx = if direction < 0 {
        (*idx + len - 1) % len
    } else {
        (*idx + 1) % len
    };
}

/// Render without a trailing `.0` for whole numbers
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
