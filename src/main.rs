use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;

use facility_access::logging;
use facility_access::permissions::{
    catalog, find_matching_permissions, find_matching_permissions_regex, normalize_json,
    PermissionRecord,
};
use facility_access::session::{SessionMetadata, SessionStorage};
use facility_access::{AccessConfig, PermissionSession};

const USAGE: &str = "\
Usage: facility-access <command> [args]

Commands:
  sessions                          List cached sessions
  show <session>                    Print every cached permission
  check <session> <query>...        Check queries by id or legacy name
  find <session> <text> [--regex]   Search ids and names (flag in any position)
  import <session> <file.json>      Normalize a payload and cache it";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let config = AccessConfig::from_env()?;
    let _guard = logging::init_logging_with(&config.logging)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let storage = SessionStorage::with_dir(&config.storage_dir);

    tracing::debug!(?args, storage = %storage.base_dir().display(), "Diagnostics console");

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["sessions"] => list_sessions(&storage),
        ["show", session_id] => {
            let session = open(session_id, &storage, &config)?;
            show(&session);
            Ok(ExitCode::SUCCESS)
        }
        ["check", session_id, queries @ ..] if !queries.is_empty() => {
            let session = open(session_id, &storage, &config)?;
            if check(&session, queries) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        ["find", rest @ ..] => match parse_find_args(rest) {
            Some(find) => {
                let session = open(find.session_id, &storage, &config)?;
                let snapshot = session.snapshot();
                if find.regex {
                    let pattern = Regex::new(find.text)
                        .with_context(|| format!("Invalid pattern '{}'", find.text))?;
                    print_records(&find_matching_permissions_regex(&pattern, &snapshot));
                } else {
                    print_records(&find_matching_permissions(find.text, &snapshot));
                }
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("{}", USAGE);
                Ok(ExitCode::from(2))
            }
        },
        ["import", session_id, file] => import(session_id, Path::new(file), &storage),
        _ => {
            eprintln!("{}", USAGE);
            Ok(ExitCode::from(2))
        }
    }
}

/// Arguments of the `find` command
#[derive(Debug, PartialEq, Eq)]
struct FindArgs<'a> {
    session_id: &'a str,
    text: &'a str,
    regex: bool,
}

/// `--regex` may appear anywhere after the command
fn parse_find_args<'a>(args: &[&'a str]) -> Option<FindArgs<'a>> {
    let regex = args.contains(&"--regex");
    let positional: Vec<&str> = args.iter().copied().filter(|a| *a != "--regex").collect();
    match positional.as_slice() {
        [session_id, text] => Some(FindArgs {
            session_id: *session_id,
            text: *text,
            regex,
        }),
        _ => None,
    }
}

fn open(session_id: &str, storage: &SessionStorage, config: &AccessConfig) -> Result<PermissionSession> {
    let session = PermissionSession::restore(session_id, storage.clone())?
        .with_resolver(config.resolver());
    Ok(session)
}

fn list_sessions(storage: &SessionStorage) -> Result<ExitCode> {
    let sessions = storage.list_sessions()?;
    if sessions.is_empty() {
        println!("{}", "No cached sessions".dimmed());
        return Ok(ExitCode::SUCCESS);
    }

    for session_id in sessions {
        match storage.load_metadata(&session_id) {
            Ok(meta) => println!(
                "{}  {} permissions  user={}  updated={}",
                session_id.bold(),
                meta.permission_count,
                meta.user_id.as_deref().unwrap_or("-"),
                meta.updated_at.format("%Y-%m-%d %H:%M:%S")
            ),
            Err(e) => println!("{}  {}", session_id.bold(), e.to_string().yellow()),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn show(session: &PermissionSession) {
    let snapshot = session.snapshot();
    println!(
        "Session {} ({} permissions, legacy names {})",
        session.session_id().bold(),
        snapshot.len(),
        if session.resolver().legacy_name_matching() {
            "on"
        } else {
            "off"
        }
    );
    print_records(&snapshot.iter().collect::<Vec<_>>());
}

/// Print a verdict per query; true when at least one query is granted
fn check(session: &PermissionSession, queries: &[&str]) -> bool {
    for query in queries {
        if session.has_permission(query) {
            println!("{} {}", "granted".green().bold(), query);
        } else {
            println!("{} {}", "denied ".red().bold(), query);
        }

        // Known capabilities are also checked under their other spelling
        if let Some(capability) = catalog::lookup(query) {
            let verdict = if session.has_any_permission(capability.queries()) {
                "granted".green()
            } else {
                "denied".red()
            };
            println!(
                "        {} as capability {} / {}",
                verdict,
                capability.id.cyan(),
                capability.name
            );
        }
    }

    let any = session.has_any_permission(queries.iter().copied());
    if any {
        println!("{}", "any: granted".green());
    } else {
        println!("{}", "any: denied".red());
    }
    any
}

fn import(session_id: &str, file: &Path, storage: &SessionStorage) -> Result<ExitCode> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let permissions = normalize_json(&json)?;

    let session = if storage.session_exists(session_id) {
        PermissionSession::restore(session_id, storage.clone())?
    } else {
        PermissionSession::with_storage(SessionMetadata::new(session_id), storage.clone())?
    };
    let snapshot = session.replace(permissions)?;

    println!(
        "Imported {} permissions into {}",
        snapshot.len(),
        session_id.bold()
    );
    Ok(ExitCode::SUCCESS)
}

fn print_records(records: &[&PermissionRecord]) {
    if records.is_empty() {
        println!("{}", "(none)".dimmed());
        return;
    }

    for record in records {
        let mut line = format!(
            "{}  {}",
            record.id().unwrap_or("<no id>").cyan(),
            record.name().unwrap_or("<no name>")
        );
        if let (Some(action), Some(resource)) = (&record.action, &record.resource) {
            line.push_str(&format!("  [{} {}]", action, resource).dimmed().to_string());
        }
        if record.is_system == Some(true) {
            line.push_str(&format!("  {}", "system".yellow()));
        }
        println!("{}", line);
    }
}
