//! flatdb command-line shell
//!
//! ```bash
//! # Interactive shell over ./mydb
//! flatdb --data-dir mydb
//!
//! # Execute a single command and exit
//! flatdb --data-dir mydb -c "select from users"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use flatdb::db::command::Command;
use flatdb::db::engine::ResultSet;
use flatdb::db::session::Session;
use flatdb::storage::file::FileStorage;

/// The prompt shown when waiting for input
const PROMPT: &str = "db> ";

/// flatdb command-line shell
#[derive(Parser, Debug)]
#[command(
    name = "flatdb",
    version,
    about = "Minimal file-backed tabular data store"
)]
struct Args {
    /// Directory holding the catalog and table files
    #[arg(long, default_value = ".", value_name = "DIR")]
    data_dir: PathBuf,

    /// Execute a single command and exit (skips confirmation prompts)
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Suppress the banner
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("flatdb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flatdb=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut session = Session::new(FileStorage::new(&args.data_dir));

    if let Some(line) = &args.command {
        let command = Command::parse(line)?;
        let result = session.execute(command)?;
        print_result(&result);
        return Ok(());
    }

    repl(&mut session, args.quiet)
}

fn repl(session: &mut Session<FileStorage>, quiet: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    if !quiet {
        println!("flatdb shell. Type \"help\" for commands, \"exit\" to leave.");
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match Command::parse(line) {
                    Ok(Command::Exit) => break,
                    Ok(command) => {
                        if command.is_destructive() && !confirm(&mut editor, command.name())? {
                            println!("Operation cancelled.");
                            continue;
                        }
                        dispatch(session, command);
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Executes one confirmed command and reports the outcome
fn dispatch(session: &mut Session<FileStorage>, command: Command) {
    let name = command.name();
    let start = Instant::now();

    match session.execute(command) {
        Ok(result) => {
            debug!(command = name, elapsed_ms = start.elapsed().as_millis() as u64, "executed");
            print_result(&result);
        }
        Err(err) => println!("{err}"),
    }
}

/// Asks the user to confirm a destructive command
fn confirm(editor: &mut DefaultEditor, name: &str) -> Result<bool> {
    match editor.readline(&format!("Are you sure you want to run \"{name}\"? [y/n]: ")) {
        Ok(answer) => Ok(answer.trim().eq_ignore_ascii_case("y")),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn print_result(result: &ResultSet) {
    match result {
        ResultSet::CreateTable { table_name, columns } => {
            let specs: Vec<String> = columns.iter().map(ToString::to_string).collect();
            println!(
                "Table \"{}\" created with columns: {}",
                table_name,
                specs.join(", ")
            );
        }
        ResultSet::DropTable { table_name } => {
            println!("Table \"{}\" dropped.", table_name);
        }
        ResultSet::ListTables { names } => {
            if names.is_empty() {
                println!("No tables.");
            } else {
                for name in names {
                    println!("- {}", name);
                }
            }
        }
        ResultSet::Insert { table_name, id } => {
            println!("Row {} inserted into \"{}\".", id, table_name);
        }
        ResultSet::Select { columns, rows } => {
            println!("{}", columns.join(" | "));
            for row in rows {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|name| row.get(name).map(ToString::to_string).unwrap_or_default())
                    .collect();
                println!("{}", cells.join(" | "));
            }
            println!("({} rows)", rows.len());
        }
        ResultSet::Update { count } => println!("{} row(s) updated.", count),
        ResultSet::Delete { count } => println!("{} row(s) deleted.", count),
        ResultSet::Info { table_name, columns } => {
            println!("Table \"{}\":", table_name);
            for column in columns {
                println!("  {}", column);
            }
        }
        ResultSet::Help => print!("{}", HELP),
        ResultSet::Exit => {}
    }
}

const HELP: &str = "\
Commands:
  create_table <name> <col:type>...   create a table (types: int, str, bool)
  drop_table <name>                   remove a table and its rows
  list_tables                         list all tables
  insert into <t> values (v1, ...)    append a row
  select from <t> [where col = val]   show rows
  update <t> set col = val where col = val
  delete from <t> where col = val
  info <t>                            show a table's columns
  help                                this message
  exit                                leave the shell
";
