//! Learn Narish CLI - read lessons, pages and the dictionary from the local
//! cache, refreshing from the content server in the background.
//!
//! Every command prints what the cache holds right away, then prints again
//! once the relevant collections have synced.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use learnnarish_core::cache::{CacheManager, DbResult};
use learnnarish_core::models::{Lesson, Page, WordData};
use learnnarish_core::routes::Route;
use learnnarish_core::utils::{format_date, truncate};
use learnnarish_core::views::{DictionaryPage, DictionaryQuery, SearchMode};
use learnnarish_core::{ApiClient, Config};

// ============================================================================
// Constants
// ============================================================================

/// Width definitions are cut to in listings
const DEFINITION_WIDTH: usize = 60;

const USAGE: &str = "\
Usage: learnnarish <command>

Commands:
  sync                                  Sync every collection now
  status                                Show record counts and last sync times
  pages                                 List pages in display order
  lessons                               List lessons in order
  lesson <number>                       Show one lesson
  words [--english|--narish TEXT] [--page N]
                                        Search the dictionary
  word <id>                             Show a word as JSON
  open <path>                           Resolve a site path, e.g. /dictionary/word/12
  config [--api-url URL] [--page-limit N]
                                        Show or change saved settings

Set RUST_LOG=debug for sync logging, LEARNNARISH_API_URL to use another server.";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level, e.g. RUST_LOG=learnnarish_core=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    if command == "config" {
        return configure(&args[1..]);
    }

    let config = Config::load()?.with_env();
    let client = ApiClient::from_config(&config)?;
    info!(server = client.base_url(), "learnnarish starting");
    let manager = CacheManager::from_config(&config, Arc::new(client))?;

    match command.as_str() {
        "sync" => sync(&manager).await,
        "status" => status(&manager).await,
        "pages" => show(manager.ordered_pages().await?, |pages| print_pages(pages)).await,
        "lessons" => show(manager.lessons().await?, |lessons| print_lessons(lessons)).await,
        "lesson" => {
            let number = parse_id(args.get(1), "lesson number")?;
            show(manager.lesson(number).await?, print_lesson).await
        }
        "words" => {
            let query = parse_query(&args[1..])?;
            show(manager.search_dictionary(query).await?, print_dictionary_page).await
        }
        "word" => {
            let id = parse_id(args.get(1), "word id")?;
            show(manager.word(id).await?, print_word_json).await
        }
        "open" => {
            let path = args.get(1).map(String::as_str).unwrap_or("/");
            show(manager.resolve_route(path).await?, print_route).await
        }
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("Unknown command '{other}'\n\n{USAGE}"),
    }
}

/// Print the cached value, then the synced one. A failed sync keeps the
/// cached output and reports the error.
async fn show<T, F>(result: DbResult<T>, render: F) -> Result<()>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T),
{
    println!("== cached ==");
    render(&result.local);
    match result.resolve().await {
        Ok(latest) => {
            println!("== synced ==");
            render(&latest);
        }
        Err(e) => eprintln!("Sync failed, showing cached data only: {e}"),
    }
    Ok(())
}

async fn sync(manager: &CacheManager) -> Result<()> {
    let mut failed = 0;
    for (collection, result) in manager.sync_all().await? {
        match result {
            Ok(report) => println!(
                "{:<12} {:>5} records in {} page(s)",
                collection.as_str(),
                report.records,
                report.pages
            ),
            Err(e) => {
                failed += 1;
                println!("{:<12} failed: {e}", collection.as_str());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} collection(s) failed to sync");
    }
    Ok(())
}

async fn status(manager: &CacheManager) -> Result<()> {
    let status = manager.status().await?;
    if let Some(path) = &status.store_path {
        println!("Store: {}", path.display());
    }
    for entry in &status.collections {
        println!(
            "{:<12} {:>5} records  synced {}",
            entry.collection.as_str(),
            entry.records,
            entry.age_display()
        );
    }
    Ok(())
}

/// Print the saved settings, saving any changes given first.
fn configure(args: &[String]) -> Result<()> {
    let mut config = Config::load()?;
    if apply_config_args(&mut config, args)? {
        config.save()?;
        println!("Saved {}", Config::config_path()?.display());
    }
    println!("api_base_url  {}", config.api_base_url());
    match config.page_limit {
        Some(limit) => println!("page_limit    {limit}"),
        None => println!("page_limit    (server default)"),
    }
    println!("store         {}", config.store_path()?.display());
    Ok(())
}

// ===== Argument parsing =====

/// Apply `--api-url` / `--page-limit` to `config`; true if anything changed.
fn apply_config_args(config: &mut Config, args: &[String]) -> Result<bool> {
    let mut changed = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--api-url" => {
                let url = iter.next().context("--api-url needs a URL")?;
                config.api_base_url = Some(url.clone());
            }
            "--page-limit" => {
                let limit = iter.next().context("--page-limit needs a number")?;
                config.page_limit = Some(
                    limit
                        .parse()
                        .with_context(|| format!("Invalid page limit '{limit}'"))?,
                );
            }
            other => bail!("Unexpected argument '{other}'"),
        }
        changed = true;
    }
    Ok(changed)
}

fn parse_id(arg: Option<&String>, what: &str) -> Result<i64> {
    let arg = arg.with_context(|| format!("Missing {what}\n\n{USAGE}"))?;
    arg.parse()
        .with_context(|| format!("Invalid {what} '{arg}'"))
}

fn parse_query(args: &[String]) -> Result<DictionaryQuery> {
    let mut query = DictionaryQuery::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--english" | "--narish" => {
                query.mode = if arg == "--english" {
                    SearchMode::English
                } else {
                    SearchMode::Narish
                };
                let search = iter
                    .next()
                    .with_context(|| format!("{arg} needs a search term"))?;
                query.search = Some(search.clone());
            }
            "--page" => {
                let page = iter.next().context("--page needs a number")?;
                query.page = page
                    .parse()
                    .with_context(|| format!("Invalid page '{page}'"))?;
            }
            other => bail!("Unexpected argument '{other}'"),
        }
    }
    Ok(query)
}

// ===== Output =====

fn print_pages(pages: &[Page]) {
    for page in pages {
        println!(
            "{:>3}  /{:<24} {}",
            page.display_order.unwrap_or_default(),
            page.link.as_deref().unwrap_or(""),
            page.title.as_deref().unwrap_or("(untitled)")
        );
    }
}

fn print_lessons(lessons: &[Lesson]) {
    for lesson in lessons {
        let updated = lesson
            .meta
            .date_updated
            .as_deref()
            .or(lesson.meta.date_created.as_deref())
            .map(format_date)
            .unwrap_or_default();
        println!("{:<48} {}", lesson.display_title(), updated);
    }
}

fn print_lesson(lesson: &Option<Lesson>) {
    match lesson {
        Some(lesson) => {
            println!("{}", lesson.display_title());
            if let Some(title) = &lesson.narish_title {
                println!("{title}");
            }
            println!();
            println!("{}", lesson.lesson.as_deref().unwrap_or(""));
        }
        None => println!("(no such lesson)"),
    }
}

fn print_dictionary_page(page: &DictionaryPage) {
    for word in &page.words {
        let root = word.root.as_ref().map(|r| r.display()).unwrap_or_default();
        let definitions: Vec<&str> = word
            .definitions
            .iter()
            .map(|d| d.definition.as_str())
            .collect();
        println!(
            "{:>5}  {:<16} {:<8} {}",
            word.id,
            word.word,
            root,
            truncate(&definitions.join("; "), DEFINITION_WIDTH)
        );
    }
    println!(
        "Page {} of {} ({} matches)",
        page.page,
        page.page_count.max(1),
        page.total_matches
    );
}

fn print_word_json(word: &Option<WordData>) {
    match word {
        Some(word) => match serde_json::to_string_pretty(word) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize word: {e}"),
        },
        None => println!("(no such word)"),
    }
}

fn print_route(route: &Route) {
    match route {
        Route::Page(page) => println!(
            "page {} ({})",
            page.id,
            page.title.as_deref().unwrap_or("untitled")
        ),
        Route::Dictionary => println!("dictionary"),
        Route::Word(id) => println!("dictionary word {id}"),
        Route::Lesson(number) => println!("lesson {number}"),
        Route::NotFound(path) => println!("not found: /{}", path.join("/")),
    }
}
