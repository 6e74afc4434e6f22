//! Maeda CLI
//!
//! Operator commands against the content API:
//! - List records in a collection
//! - Upload or download the PDF catalog
//! - Check that the content API is reachable
//! - Print a default config file

use clap::{Parser, Subcommand, ValueEnum};
use maeda::catalog::CatalogService;
use maeda::cms::{Cms, Filter};
use maeda::config::Config;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "maeda-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator tools for the Maeda website")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Content API base URL, overriding the config
    #[arg(long, global = true)]
    pub cms_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records in a collection (brands, products, recipes, contact, ...)
    List {
        collection: String,
    },

    /// Manage the downloadable catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Check the content API
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Replace the catalog with a PDF file
    Upload { path: PathBuf },

    /// Save the current catalog
    Download {
        /// Output file (default: the configured catalog file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = maeda::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.cms_url {
        config.cms.base_url = url.clone();
    }
    let cms = Cms::http(&config.cms)?;

    match cli.command {
        Commands::List { collection } => {
            let records = cms.list_raw(&collection, &Filter::new()).await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&records)?),
                Format::Csv => print_csv(&records)?,
                Format::Table => print_table(&records),
            }
        }

        Commands::Catalog { action } => {
            let catalog = CatalogService::new(cms, config.catalog.clone());
            match action {
                CatalogAction::Upload { path } => {
                    if !path.exists() {
                        eprintln!("File not found: {:?}", path);
                        std::process::exit(1);
                    }
                    let bytes = std::fs::read(&path)?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    catalog.upload(&file_name, bytes).await?;
                    println!("Catalog uploaded from {:?}", path);
                }
                CatalogAction::Download { output } => {
                    let file = catalog.download().await?;
                    let path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
                    std::fs::write(&path, &file.bytes)?;
                    println!("Catalog saved to {:?} ({} bytes)", path, file.bytes.len());
                }
            }
        }

        Commands::Status => match cms.health_check().await {
            Ok(()) => {
                println!("Maeda v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Content API: {} (ok)", config.cms.base_url);
            }
            Err(e) => {
                eprintln!("Cannot reach the content API at {}", config.cms.base_url);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Best display name for a record, preferring English
fn record_title(record: &Value) -> String {
    ["name_en", "title_en", "name_ar", "title_ar", "name", "email"]
        .iter()
        .filter_map(|key| record[*key].as_str())
        .find(|s| !s.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_table(records: &[Value]) {
    if records.is_empty() {
        println!("No records");
        return;
    }

    println!("{:<8} {}", "ID", "Title");
    println!("{}", "-".repeat(60));
    for record in records {
        println!("{:<8} {}", cell(&record["id"]), record_title(record));
    }
    println!();
    println!("{} record(s)", records.len());
}

fn print_csv(records: &[Value]) -> Result<(), Box<dyn std::error::Error>> {
    let columns = csv_columns(records);
    let mut writer = csv::Writer::from_writer(std::io::stdout());

    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|c| cell(&record[c.as_str()])))?;
    }
    writer.flush()?;
    Ok(())
}

/// Union of the records' top-level keys, with `id` first
fn csv_columns(records: &[Value]) -> Vec<String> {
    let keys: BTreeSet<&str> = records
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|object| object.keys().map(String::as_str))
        .filter(|key| *key != "id")
        .collect();

    std::iter::once("id")
        .chain(keys)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_title_prefers_english() {
        let brand = json!({"id": 1, "name_ar": "واحة", "name_en": "Palm Oasis"});
        assert_eq!(record_title(&brand), "Palm Oasis");

        let recipe = json!({"id": 2, "title_ar": "كبسة", "title_en": ""});
        assert_eq!(record_title(&recipe), "كبسة");

        assert_eq!(record_title(&json!({"id": 3})), "-");
    }

    #[test]
    fn test_csv_columns() {
        let records = vec![
            json!({"name_en": "Kabsa", "id": 1}),
            json!({"id": 2, "category_id": 4}),
        ];
        assert_eq!(csv_columns(&records), vec!["id", "category_id", "name_en"]);
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(&json!(null)), "");
        assert_eq!(cell(&json!("x")), "x");
        assert_eq!(cell(&json!(3)), "3");
        assert_eq!(cell(&json!(["a"])), "[\"a\"]");
    }
}
