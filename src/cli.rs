use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::favorites::DEFAULT_CATEGORY;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate text and record it in the history
    Translate {
        /// Text to translate
        text: String,

        /// Source language code, or "auto"
        #[arg(short, long)]
        from: Option<String>,

        /// Target language code
        #[arg(short, long)]
        to: Option<String>,

        /// Translate in the reverse direction of --from/--to
        #[arg(long)]
        swap: bool,

        /// Add the result to favorites
        #[arg(long)]
        favorite: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported languages
    Languages,

    /// List quick phrases
    Phrases,

    /// Browse and correct recorded translations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage favorite translations
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(default_value = "kotoba.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recorded translations, newest first
    List,

    /// Show one translation
    Show {
        id: u64,
    },

    /// Correct a recorded translation
    Correct {
        id: u64,

        /// Corrected translation text
        #[arg(long)]
        text: Option<String>,

        /// Corrected source text
        #[arg(long)]
        source_text: Option<String>,

        /// Corrected source language
        #[arg(long)]
        from: Option<String>,

        /// Corrected target language
        #[arg(long)]
        to: Option<String>,
    },

    /// Delete a recorded translation
    Delete {
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum FavoriteAction {
    /// Add a translation to favorites
    Add {
        /// Translation id
        translation_id: u64,

        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Remove a favorite by its own id
    Remove {
        id: u64,
    },

    /// Add the translation to favorites, or remove it if it already is one
    Toggle {
        translation_id: u64,

        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Move a favorite to another category
    Category {
        id: u64,
        category: String,
    },

    /// List favorites with their translations
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_category_defaults() {
        let args = Args::try_parse_from(["kotoba", "favorite", "toggle", "3"]).unwrap();
        match args.command {
            Commands::Favorite {
                action: FavoriteAction::Toggle { translation_id, category },
            } => {
                assert_eq!(translation_id, 3);
                assert_eq!(category, DEFAULT_CATEGORY);
            }
            _ => panic!("expected favorite toggle"),
        }
    }

    #[test]
    fn test_translate_swap_flag() {
        let args = Args::try_parse_from(["kotoba", "translate", "hola", "--from", "es", "--to", "en", "--swap"])
            .unwrap();
        assert!(matches!(args.command, Commands::Translate { swap: true, .. }));
    }
}
