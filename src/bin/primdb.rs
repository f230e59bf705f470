//! PrimDB - interactive shell

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use primdb::executor::{Database, QueryResult, Session};
use primdb::sql::{parse_command, Command};
use primdb::storage::{JsonStorage, Record};
use primdb::Config;

/// Print welcome banner
fn print_banner() {
    println!("PrimDB - a primitive table store");
    println!("Type 'help' for commands, 'exit' to quit");
}

/// Print help message
fn print_help() {
    println!(
        r#"
Tables:
  create_table <name> <column:type> ...   Create a table (types: int, str, bool)
  drop_table <name>                       Drop a table and its records
  list_tables                             List all tables
  info <name>                             Show columns and record count
  check <name>                            Validate stored records against the schema

Records:
  insert into <table> values (<value>, ...)
  select from <table> [where <column> = <value>]
  update <table> set <column> = <value>, ... where <column> = <value>
  delete from <table> where <column> = <value>

Quoted values are always text; unquoted ones are converted to the column type.

  help                                    Show this help message
  exit                                    Quit
"#
    );
}

/// Format rows as a table
fn format_results(columns: &[String], rows: &[Record]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let cell = |row: &Record, column: &str| {
        row.get(column).map(|v| v.to_string()).unwrap_or_default()
    };

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            widths[i] = widths[i].max(cell(row, column).chars().count());
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    let mut output = String::new();
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
        .collect::<Vec<_>>()
        .join("|");
    output.push_str(&format!("|{}|\n", header));
    output.push_str(&separator);

    for row in rows {
        let line: String = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {:>width$} ", cell(row, c), width = *w))
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(&format!("|{}|\n", line));
    }
    if !rows.is_empty() {
        output.push_str(&separator);
    }

    output.push_str(&format!("{} row(s) returned\n", rows.len()));
    output
}

fn print_result(result: &QueryResult) {
    if !result.columns.is_empty() {
        print!("{}", format_results(&result.columns, &result.rows));
    }
    if let Some(message) = &result.message {
        println!("{}", message);
    }
    if let Some(elapsed) = result.elapsed {
        println!("Completed in {:.3} s", elapsed.as_secs_f64());
    }
}

/// Main REPL loop
fn run_repl(session: &mut Session<JsonStorage>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new().context("failed to start line editor")?;

    print_banner();

    loop {
        let line = match editor.readline("primdb> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(trimmed) {
            debug!(error = %e, "failed to record history entry");
        }

        let command = match parse_command(trimmed) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Exit => break,
            Command::Help => {
                print_help();
                continue;
            }
            _ => {}
        }

        let mut confirm = |action: &str| {
            let prompt = format!("Are you sure you want to run \"{}\"? [y/n]: ", action);
            editor
                .readline(&prompt)
                .map(|answer| answer.trim().eq_ignore_ascii_case("y"))
                .unwrap_or(false)
        };

        match session.run(command, &mut confirm) {
            Ok(result) => print_result(&result),
            Err(e) => eprintln!("{}", e),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(std::env::args().skip(1))?;
    let storage = JsonStorage::open(&config.data_dir, &config.metadata_file)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    let db = Database::open(storage, config.cache_selects).context("failed to load catalog")?;
    let mut session = Session::new(db, &config);

    run_repl(&mut session)
}
