//! Kotoba - phrasebook translation from the command line
//!
//! Translates text with the builtin phrasebook, records every translation,
//! and keeps a list of favorites.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use kotoba::cli::{Args, Commands, FavoriteAction, HistoryAction};
use kotoba::config::Config;
use kotoba::error::KotobaError;
use kotoba::record::{Translation, TranslationUpdate};
use kotoba::session::Session;
use kotoba::translate::QUICK_PHRASES;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    if let Commands::Init { path, force } = &args.command {
        if path.exists() && !*force {
            return Err(KotobaError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ))
            .into());
        }
        Config::default().save_to_file(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("kotoba.toml").exists() {
                info!("Found kotoba.toml in current directory, loading...");
                Config::from_file("kotoba.toml")?
            } else {
                Config::default()
            }
        }
    };

    let session = match Session::open(config).await {
        Ok(session) => session,
        Err(KotobaError::CatalogUnavailable(reason)) => {
            eprintln!("Failed to load languages: {}. Please try again.", reason);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match args.command {
        Commands::Translate { text, from, to, swap, favorite, json } => {
            let mut pair = session.language_pair(from.as_deref(), to.as_deref());
            if swap {
                pair = pair
                    .swapped()
                    .ok_or_else(|| KotobaError::validation("cannot swap while the source is auto"))?;
            }
            let resolution = session.translate_pair(&text, &pair).await?;

            if let Some(reason) = resolution.warning() {
                warn!("Translation was not saved: {}", reason);
            }

            let favorite = match (favorite, resolution.translation.id) {
                (true, Some(id)) => Some(session.favorites().add(id, "").await?),
                (true, None) => {
                    warn!("Cannot favorite a translation that was not saved");
                    None
                }
                (false, _) => None,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("{}", resolution.translation.translated_text);
                match resolution.translation.id {
                    Some(id) => println!("(saved as #{})", id),
                    None => println!("(not saved)"),
                }
                if let Some(favorite) = favorite {
                    println!("Added to favorites ({})", favorite.category);
                }
            }
        }
        Commands::Languages => {
            let catalog = session.catalog();
            if catalog.is_empty() {
                println!("No languages available");
            } else {
                println!("\n{:<6} {}", "Code", "Language");
                println!("{}", "-".repeat(40));
                for language in catalog.list_all() {
                    println!("{:<6} {}", language.code, language.label());
                }
            }
        }
        Commands::Phrases => {
            println!("Quick Phrases:");
            for phrase in QUICK_PHRASES {
                println!("  {}", phrase);
            }

            let mut pairs: Vec<String> = session
                .resolver()
                .phrases()
                .pairs()
                .map(|pair| pair.to_string())
                .collect();
            pairs.sort();
            println!("\nPhrasebook tables: {}", pairs.join(", "));
        }
        Commands::History { action } => match action {
            HistoryAction::List => {
                let translations = session.history().list().await?;
                if translations.is_empty() {
                    println!("No translations yet.");
                } else {
                    print_translation_header();
                    for translation in &translations {
                        print_translation_row(translation);
                    }
                }
            }
            HistoryAction::Show { id } => {
                let translation = session.history().get(id).await?;
                let favorite = session.favorites().for_translation(id).await?;
                println!("#{} ({} -> {})", id, translation.source_lang, translation.target_lang);
                println!("Source:     {}", translation.source_text);
                println!("Translated: {}", translation.translated_text);
                println!("Created:    {}", translation.timestamp.to_rfc3339());
                if let Some(favorite) = favorite {
                    println!("Favorite:   {} (#{})", favorite.category, favorite.id);
                }
            }
            HistoryAction::Correct { id, text, source_text, from, to } => {
                let update = TranslationUpdate {
                    source_text,
                    translated_text: text,
                    source_lang: from,
                    target_lang: to,
                };
                let corrected = session.history().correct(id, update).await?;
                println!("Corrected #{}: {}", id, corrected.translated_text);
            }
            HistoryAction::Delete { id } => {
                if session.history().delete(id).await? {
                    println!("Deleted translation #{}", id);
                } else {
                    println!("No translation #{}", id);
                }
            }
        },
        Commands::Favorite { action } => match action {
            FavoriteAction::Add { translation_id, category } => {
                // Fail early on unknown translations
                session.history().get(translation_id).await?;
                let favorite = session.favorites().add(translation_id, &category).await?;
                println!("Added #{} to favorites ({})", translation_id, favorite.category);
            }
            FavoriteAction::Remove { id } => {
                if session.favorites().remove(id).await? {
                    println!("Removed favorite #{}", id);
                } else {
                    println!("No favorite #{}", id);
                }
            }
            FavoriteAction::Toggle { translation_id, category } => {
                match session.favorites().toggle(translation_id, &category).await? {
                    Some(favorite) => println!("Added #{} to favorites ({})", translation_id, favorite.category),
                    None => println!("Removed #{} from favorites", translation_id),
                }
            }
            FavoriteAction::Category { id, category } => {
                let favorite = session.favorites().recategorize(id, &category).await?;
                println!("Favorite #{} is now in {}", id, favorite.category);
            }
            FavoriteAction::List => {
                let favorites = session.favorites().list().await?;
                if favorites.is_empty() {
                    println!("No favorites yet.");
                } else {
                    println!("\n{:<6} {:<12} {}", "Fav", "Category", "Translation");
                    println!("{}", "-".repeat(80));
                    for favorite in favorites {
                        let summary = match session.history().get(favorite.translation_id).await {
                            Ok(translation) => format!(
                                "#{} {} -> {}",
                                favorite.translation_id,
                                preview(&translation.source_text),
                                preview(&translation.translated_text)
                            ),
                            Err(e) => format!("#{} ({})", favorite.translation_id, e),
                        };
                        println!("{:<6} {:<12} {}", favorite.id, favorite.category, summary);
                    }
                }
            }
        },
        // Written before the session is opened
        Commands::Init { .. } => {}
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".kotoba").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "kotoba.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - level: {}, file: {}",
          log_level, log_dir.join("kotoba.log").display());

    Ok(())
}

fn print_translation_header() {
    println!("\n{:<6} {:<12} {:<20} {:<30} {:<30}", "Id", "Languages", "Created", "Source", "Translation");
    println!("{}", "-".repeat(100));
}

fn print_translation_row(translation: &Translation) {
    println!(
        "{:<6} {:<12} {:<20} {:<30} {:<30}",
        translation.id.map(|id| id.to_string()).unwrap_or_default(),
        format!("{}->{}", translation.source_lang, translation.target_lang),
        translation.timestamp.format("%Y-%m-%d %H:%M:%S"),
        preview(&translation.source_text),
        preview(&translation.translated_text)
    );
}

/// Shorten text for table output, on a character boundary
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 27;
    if text.chars().count() > MAX_CHARS {
        format!("{}...", text.chars().take(MAX_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}
