// ==========================================
// Reagent Inventory - CLI entry point
// ==========================================
// Usage:
//   reagent-inventory list [query] [--location <id>] [--sort name]
//   reagent-inventory import <file.csv> --email <e> --password <p>
//   reagent-inventory export [query] [--output out.csv]
//   reagent-inventory locations | professors
//   reagent-inventory sign-up <email> <password> [--name <n>]
// ==========================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use reagent_inventory::app::{get_default_db_path, AppState};
use reagent_inventory::config::DB_PATH_ENV;
use reagent_inventory::{logging, ReagentColumn, ReagentQuery, SessionContext, SortDirection};

#[derive(Parser, Debug)]
#[command(name = "reagent-inventory", version, about = "Inventario de reactivos peligrosos")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<String>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filtered reagent table
    List {
        /// Free-text filter (accent and case insensitive)
        query: Option<String>,
        /// Only reagents stored at this location id
        #[arg(long)]
        location: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortColumn>,
        #[arg(long)]
        desc: bool,
    },
    /// Bulk CSV import (all rows or none)
    Import {
        file: PathBuf,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Filtered reagents as re-importable CSV
    Export {
        query: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Storage locations
    Locations,
    /// Responsible professors
    Professors,
    /// Create a local account
    SignUp {
        email: String,
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortColumn {
    Name,
    Brand,
    Class,
    Expiration,
    Professor,
    Location,
    Cabinet,
    Code,
}

impl From<SortColumn> for ReagentColumn {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => ReagentColumn::Name,
            SortColumn::Brand => ReagentColumn::Brand,
            SortColumn::Class => ReagentColumn::Class,
            SortColumn::Expiration => ReagentColumn::ExpirationDate,
            SortColumn::Professor => ReagentColumn::Professor,
            SortColumn::Location => ReagentColumn::Location,
            SortColumn::Cabinet => ReagentColumn::Cabinet,
            SortColumn::Code => ReagentColumn::Code,
        }
    }
}

fn build_query(text: Option<String>, location: Option<String>) -> ReagentQuery {
    ReagentQuery::text(text.as_deref().unwrap_or_default()).with_location(location.as_deref())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(version = reagent_inventory::VERSION, db_path = %db_path, "starting");

    let state = AppState::new(db_path).context("cannot initialize app state")?;

    match cli.command {
        Command::List {
            query,
            location,
            sort,
            desc,
        } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let view = state
                .reagent_api
                .view(
                    &build_query(query, location),
                    sort.map(|c| (ReagentColumn::from(c), direction)),
                )
                .await?;

            if let Some(chip) = &view.location_chip {
                println!("[{}]", chip);
            }
            let titles: Vec<&str> = view.columns.iter().map(|c| c.title.as_str()).collect();
            println!("{}", titles.join("\t"));
            for row in &view.rows {
                println!("{}", row.cells.join("\t"));
            }
            println!("{}/{}", view.rows.len(), view.total);
        }
        Command::Import {
            file,
            email,
            password,
        } => {
            let user = state.auth_api.sign_in(&email, &password).await?;
            let ctx = SessionContext::signed_in(user);
            let summary = state.reagent_api.import_file(&ctx, &file).await?;
            println!("{}", summary.message());
            state.auth_api.sign_out().await?;
        }
        Command::Export {
            query,
            location,
            output,
        } => {
            let csv = state
                .reagent_api
                .export_csv(&build_query(query, location))
                .await?;
            match output {
                Some(path) => tokio::fs::write(&path, csv)
                    .await
                    .with_context(|| format!("cannot write {}", path.display()))?,
                None => print!("{}", csv),
            }
        }
        Command::Locations => {
            for doc in state.location_api.list_locations().await? {
                println!("{}\t{}", doc.id, doc.record.name);
            }
        }
        Command::Professors => {
            for doc in state.professor_api.list_professors().await? {
                println!("{}\t{}\t{}", doc.id, doc.record.full_name(), doc.record.email);
            }
        }
        Command::SignUp {
            email,
            password,
            name,
        } => {
            let user = state
                .auth_api
                .sign_up(&email, &password, name.as_deref())
                .await?;
            println!("{}\t{}", user.uid, user.email);
            state.auth_api.sign_out().await?;
        }
    }

    Ok(())
}
