use std::io;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};

use genslate::core::{
    format_output_path, load_document, print_error_message, print_info_message, read_input,
    write_output, GenslateError,
};
use genslate::env::{generate_env_docs, logging, EnvVar};
use genslate::parsers::get_title;
use genslate::translation::storage::{FileSettingsStore, SettingsStore, StoreSettingsProvider};
use genslate::translation::{
    ConfigManager, GeminiClient, GeminiModel, Orchestrator, Selection, TranslationConfig,
    TranslationError,
};
use genslate::ui::{write_model_list, Prompter, TerminalOverlay};

/// Translate the text of HTML documents into English with Google Gemini.
#[derive(Parser)]
#[command(name = "genslate")]
#[command(version)]
struct Cli {
    /// Settings file holding the API key and model [default: platform config dir]
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the translation model
    Configure {
        /// Model identifier to save without prompting
        #[arg(long)]
        model: Option<String>,

        /// Only list the available models
        #[arg(long)]
        list: bool,
    },

    /// Translate every visible text of a document
    Page {
        /// File path, http(s) URL, or - for stdin
        input: String,

        /// Output path (%title% and %timestamp% are substituted) [default: stdout]
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum characters per request
        #[arg(long)]
        batch_limit: Option<usize>,
    },

    /// Translate a piece of selected text
    Selection {
        /// The selected text
        #[arg(long)]
        text: String,

        /// Document containing the selection; it is replaced in place
        #[arg(long)]
        document: Option<String>,

        /// Output path for the updated document [default: stdout]
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Clear the stored API key and ask for a new one
    SetKey,

    /// Print the supported environment variables
    Env,

    /// Write an example configuration file
    Init {
        #[arg(default_value = "genslate.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        print_error_message(&error.to_string());
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => logging::LogLevel::get()
            .ok()
            .and_then(|level| tracing::Level::from_str(&level).ok())
            .unwrap_or(tracing::Level::WARN),
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// 运行期错误加上统一前缀，前置条件错误原样输出
fn translation_failed(error: TranslationError) -> GenslateError {
    if error.is_terminal() {
        GenslateError::new(&format!("An error occurred during translation: {error}"))
    } else {
        error.into()
    }
}

fn open_store(path: Option<PathBuf>) -> Result<FileSettingsStore, GenslateError> {
    match path {
        Some(path) => Ok(FileSettingsStore::new(path)),
        None => Ok(FileSettingsStore::default_location()?),
    }
}

/// 环境变量和配置文件都没有 Key 时询问用户
fn require_api_key(base: &TranslationConfig, store: &FileSettingsStore) -> Result<(), GenslateError> {
    if base.api_key().is_some() {
        return Ok(());
    }
    Prompter::stdio().request_api_key(store)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), GenslateError> {
    let store = open_store(cli.settings)?;
    let base = ConfigManager::load(cli.config.as_deref())?.into_config();

    match cli.command {
        Commands::Configure { model, list } => configure(&store, base.model, model, list),
        Commands::Page {
            input,
            output,
            batch_limit,
        } => {
            let base = match batch_limit {
                Some(limit) => {
                    let config = base.with_batch_character_limit(limit);
                    config.validate()?;
                    config
                }
                None => base,
            };
            translate_page(base, &store, &input, output.as_deref()).await
        }
        Commands::Selection {
            text,
            document,
            output,
        } => translate_selection(base, &store, &text, document.as_deref(), output.as_deref()).await,
        Commands::SetKey => {
            store.clear_api_key()?;
            match Prompter::stdio().request_api_key(&store) {
                Ok(_) | Err(TranslationError::MissingApiKey) => Ok(()),
                Err(error) => Err(error.into()),
            }
        }
        Commands::Env => {
            println!("{}", generate_env_docs());
            Ok(())
        }
        Commands::Init { path } => {
            ConfigManager::generate_example_config(&path)?;
            print_info_message(&format!("Example configuration written to {}", path.display()));
            Ok(())
        }
    }
}

fn configure(
    store: &FileSettingsStore,
    fallback: GeminiModel,
    model: Option<String>,
    list: bool,
) -> Result<(), GenslateError> {
    let current = store.model()?.unwrap_or(fallback);

    if list {
        write_model_list(&mut io::stdout(), current)?;
        return Ok(());
    }

    let chosen = match model {
        Some(model) => Some(GeminiModel::from_str(model.trim())?),
        None => Prompter::stdio().choose_model(current)?,
    };

    if let Some(model) = chosen {
        store.set_model(model)?;
        print_info_message(&format!("Translation model saved: {model}"));
    }
    Ok(())
}

async fn translate_page(
    base: TranslationConfig,
    store: &FileSettingsStore,
    input: &str,
    output: Option<&str>,
) -> Result<(), GenslateError> {
    require_api_key(&base, store)?;

    let document = load_document(&read_input(input).await?)?;
    let mut orchestrator = Orchestrator::new(GeminiClient::new()?, StoreSettingsProvider::new(base, store));
    let overlay = TerminalOverlay::stderr();

    let summary = orchestrator
        .run(&document.dom.document, &overlay)
        .await
        .map_err(translation_failed)?;

    if summary.mismatched_batches > 0 {
        print_info_message(&format!(
            "{} of {} batches came back misaligned and were written to their first text node.",
            summary.mismatched_batches, summary.batches
        ));
    }

    let output = output.map(|path| format_output_path(path, get_title(&document.dom.document).as_deref()));
    write_output(&document, output.as_deref())
}

async fn translate_selection(
    base: TranslationConfig,
    store: &FileSettingsStore,
    text: &str,
    document: Option<&str>,
    output: Option<&str>,
) -> Result<(), GenslateError> {
    if text.trim().is_empty() {
        return Err(TranslationError::NoSelection.into());
    }
    require_api_key(&base, store)?;

    let mut orchestrator = Orchestrator::new(GeminiClient::new()?, StoreSettingsProvider::new(base, store));

    let Some(target) = document else {
        let translated = orchestrator
            .translate_text(text)
            .await
            .map_err(translation_failed)?;
        println!("{translated}");
        return Ok(());
    };

    let document = load_document(&read_input(target).await?)?;
    let mut selection = Selection::find(&document.dom.document, text).ok_or_else(|| {
        TranslationError::InvalidInput(format!("\"{text}\" was not found in {target}"))
    })?;

    let overlay = TerminalOverlay::stderr();
    orchestrator
        .translate_selection(&mut selection, &overlay)
        .await
        .map_err(translation_failed)?;

    write_output(&document, output)
}
