mod app;

use anyhow::{Context, Result};
use app::{handle_form_input, App};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mortgage_calc::{
    config::AppConfig,
    payment, CurrencyFormatter, Field, LoanForm, Locale, PaymentCalculator, ValidationResult,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use serde::Serialize;
use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Amortized monthly mortgage payment calculator.
///
/// With no loan flags an interactive form opens in the terminal; with any of
/// --principal, --rate or --term the payment is printed and the program exits.
#[derive(Parser, Debug)]
#[command(name = "mortgage-calc", version)]
struct Cli {
    /// Principal loan amount
    #[arg(short, long)]
    principal: Option<String>,

    /// Annual interest rate in percent (truncated to a whole percent)
    #[arg(short, long)]
    rate: Option<String>,

    /// Length of loan in years
    #[arg(short, long)]
    term: Option<String>,

    /// Locale for currency formatting, e.g. en-US or de-DE (default: host locale)
    #[arg(long)]
    locale: Option<String>,

    /// ISO currency code (default: USD)
    #[arg(long)]
    currency: Option<String>,

    /// JSON config file with "locale" and "currency" keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the one-shot result as JSON
    #[arg(long)]
    json: bool,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn is_one_shot(&self) -> bool {
        self.principal.is_some() || self.rate.is_some() || self.term.is_some()
    }
}

#[derive(Serialize)]
struct Report<'a> {
    payment: &'a str,
    monthly_payment: Option<f64>,
    errors: &'a ValidationResult,
    error: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), if cli.is_one_shot() { "warn" } else { "off" })?;

    let formatter = build_formatter(&cli)?;
    let calculator = PaymentCalculator::new(formatter);

    if cli.is_one_shot() {
        let ok = run_once(&cli, &calculator, &mut io::stdout(), &mut io::stderr())?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(calculator);
    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>, default_filter: &str) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn build_formatter(cli: &Cli) -> Result<CurrencyFormatter> {
    let file_config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let config = file_config.merge(AppConfig {
        locale: cli.locale.clone(),
        currency: cli.currency.clone(),
    });
    let options = config.format_options(Locale::from_env())?;
    log::debug!("formatting with {} {}", options.locale, options.currency);
    Ok(CurrencyFormatter::new(options))
}

/// Prints the payment, or the errors, for the loan given on the command line.
/// Returns whether a payment was calculated.
fn run_once(
    cli: &Cli,
    calculator: &PaymentCalculator,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<bool> {
    let mut form = LoanForm::new();
    let fields = [
        (Field::Principal, &cli.principal),
        (Field::Rate, &cli.rate),
        (Field::Term, &cli.term),
    ];
    for (field, value) in fields {
        if let Some(text) = value {
            form.update(field, text)?;
        }
    }

    let ok = form.submit(calculator);

    if cli.json {
        let monthly_payment = if ok {
            payment::calculate(&form.input).ok()
        } else {
            None
        };
        let report = Report {
            payment: &form.payment,
            monthly_payment,
            errors: &form.errors,
            error: &form.error,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else if ok {
        writeln!(out, "Your monthly mortgage payment will be {}", form.payment)?;
    } else {
        for field in Field::ALL {
            let message = form.errors.message(field);
            if !message.is_empty() {
                writeln!(err, "{} {}", field.label(), message)?;
            }
        }
        if !form.error.is_empty() {
            writeln!(err, "{}", form.error)?;
        }
    }

    Ok(ok)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_form_input(&mut app, key)? {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Mortgage Calculator")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    for (field, area) in Field::ALL.into_iter().zip(&chunks[1..4]) {
        render_field(f, app, field, *area);
    }

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled(" Calculate ", Style::default().fg(Color::Black).bg(Color::Green)),
        Span::raw("   "),
        Span::styled(" Clear Form ", Style::default().fg(Color::Black).bg(Color::Gray)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(buttons, chunks[4]);

    let result = if app.form.has_payment() {
        Line::from(vec![
            Span::raw("Your monthly mortgage payment will be "),
            Span::styled(
                app.form.payment.as_str(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if !app.form.error.is_empty() {
        Line::styled(app.form.error.as_str(), Style::default().fg(Color::Red))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(result).alignment(Alignment::Center), chunks[5]);

    let help = Paragraph::new("Tab/↑/↓: move | Enter: calculate | c: clear form | Esc/q: exit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[6]);
}

fn render_field(f: &mut Frame, app: &App, field: Field, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)].as_ref())
        .split(area);

    let focused = app.focus == field;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(field.label());

    let text = app.buffer(field);
    let input = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .block(input_block);
    f.render_widget(input, rows[0]);

    if focused {
        f.set_cursor(rows[0].x + 1 + text.len() as u16, rows[0].y + 1);
    }

    let error = Paragraph::new(app.form.errors.message(field))
        .style(Style::default().fg(Color::Red));
    f.render_widget(error, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_shot(args: &[&str]) -> (bool, String, String) {
        let cli = Cli::parse_from(std::iter::once("mortgage-calc").chain(args.iter().copied()));
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let ok = run_once(&cli, &PaymentCalculator::default(), &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_one_shot_text() {
        let (ok, out, err) = one_shot(&["-p", "200000", "-r", "6", "-t", "30"]);
        assert!(ok);
        assert_eq!(out, "Your monthly mortgage payment will be $1,199.10\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_one_shot_reports_blank_fields() {
        let (ok, out, err) = one_shot(&["--principal", "200000"]);
        assert!(!ok);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "Interest Rate: Rate cannot be blank!\nLength of Loan (in years): Term cannot be blank!\n"
        );
    }

    #[test]
    fn test_one_shot_json() {
        let (ok, out, _) = one_shot(&["-p", "200000", "-r", "6", "-t", "30", "--json"]);
        assert!(ok);
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["payment"], "$1,199.10");
        let monthly = report["monthly_payment"].as_f64().unwrap();
        assert!((monthly - 1199.10).abs() < 0.005);
        assert_eq!(report["errors"]["principal"], "");
        assert_eq!(report["error"], "");
    }

    #[test]
    fn test_one_shot_json_invalid() {
        let (ok, out, _) = one_shot(&["-p", "200000", "-r", "6", "-t", "0", "--json"]);
        assert!(!ok);
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["payment"], "");
        assert!(report["monthly_payment"].is_null());
        assert_eq!(report["errors"]["term"], "Term cannot be blank!");
    }

    #[test]
    fn test_one_shot_rejects_bad_principal() {
        let cli = Cli::parse_from(["mortgage-calc", "-p", "NaN", "-r", "6", "-t", "30"]);
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let result = run_once(&cli, &PaymentCalculator::default(), &mut out, &mut err);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_loan_flags_opens_form() {
        assert!(!Cli::parse_from(["mortgage-calc", "--currency", "EUR"]).is_one_shot());
        assert!(Cli::parse_from(["mortgage-calc", "-t", "30"]).is_one_shot());
    }
}
