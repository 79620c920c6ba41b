mod render;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chatmark_core::{
    CustomEmojiSnapshot, CustomEmojiStore, FileEmojiStore, ImageHandle, MarkupVocabulary,
    NativeEmojiTable, VocabularyError, format_with_store, load_vocabulary_from_str,
};
use chatmark_emoji::EmojiTableError;

use crate::render::{Format, print_json, render_json_error};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "chatmark",
    version,
    about = "chatmark: format chat messages with emphasis, autolinks and emoji"
)]
struct Cli {
    /// Output mode: "pretty" for human-readable output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Format a chat message read from FILE (or stdin with `-`).
    Format {
        #[arg(default_value = "-")]
        file: String,
        /// Markup vocabulary JSON. Defaults to the standard chat vocabulary.
        #[arg(long)]
        vocabulary: Option<String>,
        /// Native emoji table JSON. Defaults to the bundled table.
        #[arg(long)]
        emoji_table: Option<String>,
        /// Custom emoji store file.
        #[arg(long)]
        store: Option<String>,
        /// Format without custom emoji when the store cannot be read.
        #[arg(long, requires = "store")]
        allow_degraded: bool,
        /// Replace custom emoji sentinels with inline `<img>` tags (pretty output).
        #[arg(long)]
        splice: bool,
    },

    /// Manage emoji.
    #[command(subcommand)]
    Emoji(EmojiCmd),
}

#[derive(Subcommand, Debug)]
enum EmojiCmd {
    /// Register IMAGE as the custom emoji `:SHORTCODE:`.
    Add {
        shortcode: String,
        image: String,
        /// Custom emoji store file.
        #[arg(long)]
        store: String,
        /// Markup vocabulary JSON whose delimiter the shortcode must avoid.
        #[arg(long)]
        vocabulary: Option<String>,
    },

    /// List registered custom emoji shortcodes.
    List {
        /// Custom emoji store file.
        #[arg(long)]
        store: String,
    },

    /// List native emoji shortcodes.
    Native {
        /// Native emoji table JSON. Defaults to the bundled table.
        #[arg(long)]
        emoji_table: Option<String>,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Format {
            file,
            vocabulary,
            emoji_table,
            store,
            allow_degraded,
            splice,
        } => cmd_format(
            &file,
            vocabulary.as_deref(),
            emoji_table.as_deref(),
            store.as_deref(),
            allow_degraded,
            splice,
            format,
        )?,
        Cmd::Emoji(EmojiCmd::Add {
            shortcode,
            image,
            store,
            vocabulary,
        }) => cmd_emoji_add(&shortcode, &image, &store, vocabulary.as_deref(), format)?,
        Cmd::Emoji(EmojiCmd::List { store }) => cmd_emoji_list(&store, format)?,
        Cmd::Emoji(EmojiCmd::Native { emoji_table }) => {
            cmd_emoji_native(emoji_table.as_deref(), format)?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `CHATMARK_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("CHATMARK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_format(
    file: &str,
    vocabulary_path: Option<&str>,
    emoji_table_path: Option<&str>,
    store_path: Option<&str>,
    allow_degraded: bool,
    splice: bool,
    format: Format,
) -> Result<()> {
    let input = read_input(file)?;
    let vocab = resolve_vocabulary(vocabulary_path)?;
    let native = resolve_emoji_table(emoji_table_path);

    let res = match store_path {
        Some(path) => {
            let store = FileEmojiStore::new(path);
            match format_with_store(&input, &vocab, &native, &store) {
                Ok(res) => res,
                Err(e) if allow_degraded => {
                    tracing::warn!(error = %e, "formatting without custom emoji");
                    chatmark_core::format(&input, &vocab, &native, &CustomEmojiSnapshot::empty())
                }
                Err(e) => return Err(e).context(format!("custom emoji store {path}")),
            }
        }
        None => chatmark_core::format(&input, &vocab, &native, &CustomEmojiSnapshot::empty()),
    };

    match format {
        Format::Json => print_json(&res)?,
        Format::Pretty => {
            if splice {
                println!("{}", res.splice_images(img_tag));
            } else {
                println!("{}", res.text);
            }
            if res.has_custom_emojis() && !splice {
                eprintln!("{} custom emoji referenced", res.images.len());
            }
        }
    }
    Ok(())
}

fn cmd_emoji_add(
    shortcode: &str,
    image_path: &str,
    store_path: &str,
    vocabulary_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let vocab = resolve_vocabulary(vocabulary_path)?;
    let bytes =
        fs::read(image_path).with_context(|| format!("failed to read image '{image_path}'"))?;
    let image = ImageHandle::from(bytes);
    let len = image.len();

    let store = FileEmojiStore::new(store_path).with_delimiter(vocab.emoji_delimiter);
    store
        .put(shortcode, image)
        .with_context(|| format!("failed to register :{shortcode}:"))?;

    match format {
        Format::Json => print_json(&serde_json::json!({
            "status": "registered",
            "shortcode": shortcode,
            "bytes": len,
            "store": store_path,
        }))?,
        Format::Pretty => eprintln!("registered :{shortcode}: ({len} bytes) in {store_path}"),
    }
    Ok(())
}

fn cmd_emoji_list(store_path: &str, format: Format) -> Result<()> {
    let snapshot = FileEmojiStore::new(store_path)
        .get_all()
        .with_context(|| format!("failed to read custom emoji store '{store_path}'"))?;
    let codes = snapshot.shortcodes();

    match format {
        Format::Json => print_json(&serde_json::json!({ "shortcodes": codes }))?,
        Format::Pretty => {
            for code in codes {
                println!(":{code}:");
            }
        }
    }
    Ok(())
}

fn cmd_emoji_native(emoji_table_path: Option<&str>, format: Format) -> Result<()> {
    let native = resolve_emoji_table(emoji_table_path);
    let mut entries: Vec<(&str, &str)> = native.iter().collect();
    entries.sort_unstable();

    match format {
        Format::Json => {
            let map: serde_json::Map<String, serde_json::Value> = entries
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
                .collect();
            print_json(&map)?;
        }
        Format::Pretty => {
            for (code, html) in entries {
                println!(":{code}: {html}");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read the message from a file, or from stdin when `file` is `-`.
///
/// One trailing line ending is dropped; it belongs to the file, not the message.
fn read_input(file: &str) -> Result<String> {
    let mut buf = if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read message from stdin")?;
        buf
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read message file '{file}'"))?
    };
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

/// Load the vocabulary at `path`, or the standard one.
fn resolve_vocabulary(path: Option<&str>) -> Result<MarkupVocabulary> {
    let Some(path) = path else {
        return Ok(MarkupVocabulary::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary file '{path}'"))?;
    match load_vocabulary_from_str(&json) {
        Ok(vocab) => Ok(vocab),
        Err(VocabularyError::InvalidJson(e)) => {
            render_json_error(&json, path, &e);
            bail!("invalid vocabulary file '{path}'");
        }
        Err(e) => Err(e).with_context(|| format!("invalid vocabulary file '{path}'")),
    }
}

/// Load the native emoji table at `path`, or the bundled one.
///
/// A table that cannot be loaded is reported and replaced by an empty one, so
/// formatting still runs with shortcodes left literal.
fn resolve_emoji_table(path: Option<&str>) -> NativeEmojiTable {
    let Some(path) = path else {
        return NativeEmojiTable::load_or_empty(None);
    };
    match NativeEmojiTable::load_from_path(Path::new(path)) {
        Ok(table) => table,
        Err(e) => {
            if let EmojiTableError::InvalidJson(json_err) = &e
                && let Ok(source) = fs::read_to_string(path)
            {
                render_json_error(&source, path, json_err);
            }
            tracing::warn!(
                error = %e,
                path,
                "native emoji table unavailable, shortcodes stay literal"
            );
            NativeEmojiTable::empty()
        }
    }
}

/// Inline `<img>` tag carrying the image as a data URI.
fn img_tag(image: &ImageHandle) -> String {
    format!(
        "<img class=\"custom-emoji\" src=\"data:image/png;base64,{}\">",
        image.to_base64()
    )
}
