use geosift::cli::{Cli, Commands, ConfigAction};
use geosift::config::Config;
use geosift::embedding::FastEmbedProvider;
use geosift::engine::{IngestRecord, KnowledgeBase};
use geosift::error::{GeosiftError, Result};
use geosift::ranking::SearchMode;
use geosift::store::DocumentMetadata;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Ingest { files, jsonl } => {
            cmd_ingest(cli.config, files, jsonl)?;
        }
        Commands::Search {
            query,
            limit,
            mode,
            json,
        } => {
            cmd_search(cli.config, &query, limit, &mode, json)?;
        }
        Commands::Stats => {
            cmd_stats(cli.config)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose { "geosift=debug" } else { "geosift=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn cmd_ingest(config_path: Option<PathBuf>, files: Vec<PathBuf>, jsonl: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let kb = open_knowledge_base(&config)?;

    let mut records = Vec::new();
    for path in &files {
        let content = std::fs::read_to_string(path).map_err(|e| GeosiftError::Io {
            source: e,
            context: format!("Failed to read input file: {:?}", path),
        })?;

        if jsonl {
            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let record: IngestRecord =
                    serde_json::from_str(line).map_err(|e| GeosiftError::Json {
                        source: e,
                        context: format!("Invalid record at {}:{}", path.display(), line_no + 1),
                    })?;
                records.push(record);
            }
        } else {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            records.push(IngestRecord {
                text: content,
                metadata: DocumentMetadata::new(filename),
            });
        }
    }

    let report = kb.ingest(records)?;

    println!("✓ Ingestion complete");
    println!("  Added: {}", report.added);
    println!("  Rejected: {}", report.rejected);
    println!("  Failed: {}", report.failed);
    println!("  Duration: {}ms", report.duration_ms);
    println!("  Documents stored: {}", kb.document_count());

    Ok(())
}

fn cmd_search(
    config_path: Option<PathBuf>,
    query: &str,
    limit: usize,
    mode_label: &str,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let kb = open_knowledge_base(&config)?;

    if !kb.is_ready() {
        println!("Knowledge base is empty. Run 'geosift ingest <files>' first.");
        return Ok(());
    }

    let mode = SearchMode::from_label(mode_label);
    let results = kb.search(query, limit, mode)?;

    if json {
        let output = serde_json::to_string_pretty(&results).map_err(|e| GeosiftError::Json {
            source: e,
            context: "Failed to serialize results".to_string(),
        })?;
        println!("{}", output);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!(
            "\n{}. {} (document {})",
            i + 1,
            result.filename,
            result.document_id
        );
        println!("   score: {:.4}", result.score);

        let vector_scores: Vec<String> = result
            .breakdown
            .vector
            .iter()
            .map(|(aspect, score)| format!("{} {:.3}", aspect, score))
            .collect();
        println!(
            "   vector: {} | keyword {:.3} | semantic {:.3}",
            vector_scores.join(", "),
            result.breakdown.keyword,
            result.breakdown.semantic
        );
        println!("   {}", result.preview(160).replace('\n', " "));
    }

    Ok(())
}

fn cmd_stats(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let kb = open_knowledge_base(&config)?;

    println!("Geosift Status");
    println!("==============");
    println!("\nDocuments: {}", kb.document_count());
    println!("Model: {} ({} dimensions)", kb.model_name(), kb.dimension());

    let snapshot_path = kb.snapshot_path();
    match std::fs::metadata(snapshot_path) {
        Ok(meta) => {
            println!(
                "Snapshot: {} ({})",
                snapshot_path.display(),
                format_size(meta.len())
            );
        }
        Err(_) => {
            println!("Snapshot: {} (not yet written)", snapshot_path.display());
        }
    }

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show { section } => {
            let config = load_config(config_path)?;
            let value = serde_json::to_value(&config).map_err(|e| GeosiftError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;

            let shown = match &section {
                Some(name) => value.get(name).cloned().ok_or_else(|| {
                    GeosiftError::Config(format!(
                        "Unknown config section '{}' (expected storage, embedding, or ranking)",
                        name
                    ))
                })?,
                None => value,
            };

            let json = serde_json::to_string_pretty(&shown).map_err(|e| GeosiftError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{}", json);
        }
        ConfigAction::Validate { file } => {
            let path = match file {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Model: {}", config.embedding.model);
        }
        ConfigAction::Init { force } => {
            let path = Config::default_path()?;

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            // Create parent directory
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| GeosiftError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            // Save default config
            let config = Config::default();
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn open_knowledge_base(config: &Config) -> Result<KnowledgeBase> {
    let provider = Arc::new(FastEmbedProvider::new(&config.embedding.model)?);
    KnowledgeBase::open(config, provider)
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'geosift config init' to create one."
        );
        return Ok(Config::default());
    }

    Config::load(&path)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
