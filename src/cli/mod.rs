//! Command-line interface for alurio.
//!
//! Provides commands for managing the creator profile, generating scripts
//! and posts, browsing the content library, and exporting scripts to PDF.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::adapters::GeminiBackend;
use crate::config;
use crate::core::{ContentGenerator, ModelSelection};
use crate::domain::{
    ArtifactId, ImageAttachment, ItemKind, LibraryItem, PostArtifact, Profile, ScriptArtifact,
    ScriptLength,
};
use crate::export::export_script;
use crate::library::{FileStore, LibraryFilter, LibraryStore, ProfileStore, SaveOutcome};

/// alurio - Script and post generation for short-form creators
#[derive(Parser, Debug)]
#[command(name = "alurio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the creator profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Generate a short-video script for a topic
    Script {
        /// What the video is about
        topic: String,

        /// Target length (short, medium, long)
        #[arg(short, long, default_value = "medium")]
        length: ScriptLength,

        /// Print the script without saving it to the library
        #[arg(long)]
        no_save: bool,
    },

    /// Generate a post or carousel from images
    Post {
        /// Image files (or data: URLs), in slide order
        #[arg(required = true)]
        images: Vec<String>,

        /// Extra context for the caption
        #[arg(short, long, default_value = "")]
        context: String,

        /// Treat the images as one carousel
        #[arg(long)]
        carousel: bool,

        /// Print the post without saving it to the library
        #[arg(long)]
        no_save: bool,
    },

    /// List items in the library
    Library {
        /// Filter by kind (script, post)
        #[arg(short, long)]
        kind: Option<ItemKind>,

        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Maximum number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a library item in full
    Show {
        /// Item ID
        id: String,
    },

    /// Mark a library item as used (or unused)
    Toggle {
        /// Item ID
        id: String,
    },

    /// Export a script to PDF
    Export {
        /// Script ID
        id: String,

        /// Output directory (defaults to the configured exports dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show library statistics
    Stats,

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Create or replace the profile
    Set {
        #[arg(long)]
        name: String,

        /// Content niche (e.g. "Produtividade")
        #[arg(long)]
        niche: String,

        /// Content objective (e.g. "Construir autoridade")
        #[arg(long)]
        objective: String,

        /// Voice and tone (e.g. "Educativo")
        #[arg(long)]
        tone: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// Show the stored profile
    Show,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Profile { command } => execute_profile(command),
            Commands::Script {
                topic,
                length,
                no_save,
            } => generate_script(&topic, length, no_save).await,
            Commands::Post {
                images,
                context,
                carousel,
                no_save,
            } => generate_post(&images, &context, carousel, no_save).await,
            Commands::Library {
                kind,
                search,
                limit,
            } => list_library(kind, search, limit),
            Commands::Show { id } => show_item(&id),
            Commands::Toggle { id } => toggle_item(&id),
            Commands::Export { id, out } => export_item(&id, out),
            Commands::Stats => show_stats(),
            Commands::Config => show_config(),
        }
    }
}

fn open_library() -> Result<LibraryStore<FileStore>> {
    Ok(LibraryStore::load(FileStore::open_default()?))
}

fn require_profile(storage: &FileStore) -> Result<Profile> {
    ProfileStore::load(storage)
        .filter(|profile| profile.onboarding_completed)
        .context("No profile configured. Run 'alurio profile set' first.")
}

fn generator() -> Result<ContentGenerator> {
    let settings = &config::config()?.gemini;
    let backend = GeminiBackend::from_settings(settings)?;
    Ok(ContentGenerator::new(
        Arc::new(backend),
        ModelSelection::from(settings),
    ))
}

/// Execute profile subcommands
fn execute_profile(command: ProfileCommands) -> Result<()> {
    let storage = FileStore::open_default()?;

    match command {
        ProfileCommands::Set {
            name,
            niche,
            objective,
            tone,
            email,
        } => {
            let mut profile = Profile::new(name, niche, objective, tone).onboarded();
            if let Some(email) = email {
                profile = profile.with_email(email);
            }
            ProfileStore::save(&storage, &profile)?;
            eprintln!("Profile saved for {}", profile.name);
        }
        ProfileCommands::Show => match ProfileStore::load(&storage) {
            Some(profile) => {
                println!("Name:      {}", profile.name);
                println!("Niche:     {}", profile.niche);
                println!("Objective: {}", profile.objective);
                println!("Tone:      {}", profile.tone_description);
                if let Some(email) = &profile.email {
                    println!("Email:     {}", email);
                }
            }
            None => println!("No profile configured. Run 'alurio profile set' first."),
        },
    }

    Ok(())
}

/// Generate a script, then save it as a separate step
async fn generate_script(topic: &str, length: ScriptLength, no_save: bool) -> Result<()> {
    let storage = FileStore::open_default()?;
    let profile = require_profile(&storage)?;

    eprintln!("Generating {} script for: {}", length, topic);
    let script = generator()?.generate_script(topic, &profile, length).await?;

    print_script(&script);

    if !no_save {
        let mut library = LibraryStore::load(storage);
        report_save(library.save(script.clone())?, script.id.as_str());
    }

    Ok(())
}

/// Load an image from a file path or a data URL
fn load_image(source: &str) -> Result<ImageAttachment> {
    if source.starts_with("data:") {
        return ImageAttachment::from_data_url(source)
            .with_context(|| format!("Invalid data URL: {:.40}...", source));
    }

    let path = Path::new(source);
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let mime = ImageAttachment::mime_from_extension(ext)
        .with_context(|| format!("Unsupported image type: {}", path.display()))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;

    Ok(ImageAttachment::from_bytes(mime, &bytes))
}

/// Generate a post or carousel, then save it as a separate step
async fn generate_post(
    sources: &[String],
    context: &str,
    carousel: bool,
    no_save: bool,
) -> Result<()> {
    let storage = FileStore::open_default()?;
    let profile = require_profile(&storage)?;

    let images = sources
        .iter()
        .map(|s| load_image(s))
        .collect::<Result<Vec<_>>>()?;

    eprintln!(
        "Generating {} from {} image(s)",
        if carousel { "carousel" } else { "post" },
        images.len()
    );
    let post = generator()?
        .generate_from_images(&images, &profile, context, carousel)
        .await?;

    print_post(&post);

    if !no_save {
        let mut library = LibraryStore::load(storage);
        report_save(library.save(post.clone())?, post.id.as_str());
    }

    Ok(())
}

fn report_save(outcome: SaveOutcome, id: &str) {
    match outcome {
        SaveOutcome::Inserted => eprintln!("\nSaved to library: {}", id),
        SaveOutcome::AlreadyPresent => eprintln!("\nAlready in library: {}", id),
    }
}

fn print_script(script: &ScriptArtifact) {
    println!("{}", script.title);
    println!(
        "Duração: {}s | Formato: {}",
        script.duration_seconds, script.requested_length
    );
    println!("\nGANCHO: {}", script.hook.spoken_line);
    println!("  ({})", script.hook.visual_action);
    println!("\nDESENVOLVIMENTO:");
    for (i, block) in script.development_blocks.iter().enumerate() {
        println!("  #{} {}", i + 1, block.spoken_line);
        println!("     ({})", block.visual_action);
    }
    println!("\nCTA: {}", script.closing_cta.spoken_line);
    println!("  ({})", script.closing_cta.visual_action);

    print_list("Dicas de gravação", &script.recording_tips);
    print_list("Dicas de alcance", &script.reach_tips);

    if !script.next_themes.is_empty() {
        println!("\nPróximos temas:");
        for theme in &script.next_themes {
            println!("  - {}: {}", theme.title, theme.reasoning);
        }
    }
}

fn print_post(post: &PostArtifact) {
    println!("{}", post.title);
    for slide in &post.slides {
        println!("\nSlide {}: {}", slide.slide_number, slide.text);
        println!("  ({})", slide.visual_advice);
    }
    println!("\n{}", post.caption);
    println!("\n{}", post.hashtags.join(" "));

    print_list("Músicas", &post.music_suggestions);
    print_list("Próximas fotos", &post.next_image_tips);
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}:", heading);
    for item in items {
        println!("  - {}", item);
    }
}

fn truncate(title: &str, max: usize) -> String {
    if title.chars().count() > max {
        let cut: String = title.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}

/// List items in the library
fn list_library(kind: Option<ItemKind>, search: String, limit: usize) -> Result<()> {
    let library = open_library()?;

    if library.is_empty() {
        println!("Library is empty. Use 'alurio script <topic>' to add content.");
        return Ok(());
    }

    let items = library.filter(&LibraryFilter { kind, search });
    if items.is_empty() {
        println!("No matching items");
        return Ok(());
    }

    println!(
        "{:<34} {:<8} {:<10} {:<5} {:<40}",
        "ID", "KIND", "STATUS", "USED", "TITLE"
    );
    println!("{}", "-".repeat(100));

    for item in items.iter().take(limit) {
        println!(
            "{:<34} {:<8} {:<10} {:<5} {:<40}",
            item.id().as_str(),
            item.kind().to_string(),
            item.status().to_string(),
            if item.is_used() { "yes" } else { "no" },
            truncate(item.title(), 40)
        );
    }

    println!("\nShowing {} of {} items", items.len().min(limit), library.len());

    Ok(())
}

/// Show a library item in full
fn show_item(id: &str) -> Result<()> {
    let library = open_library()?;
    let item = library
        .get(&ArtifactId::from(id))
        .with_context(|| format!("Item not found: {}", id))?;

    match item {
        LibraryItem::Script(script) => print_script(script),
        LibraryItem::Post(post) => print_post(post),
    }

    Ok(())
}

/// Flip the used flag of a library item
fn toggle_item(id: &str) -> Result<()> {
    let mut library = open_library()?;

    match library.toggle_used(&ArtifactId::from(id))? {
        Some(true) => println!("Marked as used: {}", id),
        Some(false) => println!("Marked as unused: {}", id),
        None => println!("Item not found: {}", id),
    }

    Ok(())
}

/// Export a script to PDF
fn export_item(id: &str, out: Option<PathBuf>) -> Result<()> {
    let library = open_library()?;
    let item = library
        .get(&ArtifactId::from(id))
        .with_context(|| format!("Item not found: {}", id))?;
    let script = item
        .as_script()
        .with_context(|| format!("Only scripts can be exported: {} is a {}", id, item.kind()))?;

    let dir = match out {
        Some(dir) => dir,
        None => config::exports_dir()?,
    };

    let path = export_script(script, &dir)?;
    println!("{}", path.display());

    Ok(())
}

/// Show library statistics
fn show_stats() -> Result<()> {
    let library = open_library()?;
    let stats = library.stats(Utc::now());

    println!("Total:   {}", stats.total);
    println!("Scripts: {}", stats.scripts);
    println!("Posts:   {}", stats.posts);
    println!("Used:    {}", stats.used);
    println!();
    println!("Activity (items per week, most recent first):");
    for (week, count) in stats.weekly_activity.iter().enumerate() {
        println!("  Week {}: {}", week + 1, count);
    }

    let recent = library.recent(3);
    if !recent.is_empty() {
        println!("\nRecent:");
        for item in recent {
            println!("  {} [{}] {}", item.id(), item.kind(), item.title());
        }
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("alurio configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Exports: {}", cfg.exports.display());
    println!();
    println!("Gemini:");
    println!("  API base:     {}", cfg.gemini.api_base);
    println!("  Script model: {}", cfg.gemini.script_model);
    println!("  Post model:   {}", cfg.gemini.post_model);
    println!(
        "  API key:      {}",
        if cfg.gemini.api_key.is_some() {
            "(set)"
        } else {
            "(missing)"
        }
    );

    Ok(())
}
