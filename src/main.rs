//! formbind CLI - render form documents and resolve field values

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use formbind::{FixSuggestion, FormBuilder, FormDocument, FormError, HtmlConfig, InputBag, Record};

#[derive(Parser)]
#[command(name = "formbind")]
#[command(about = "formbind - HTML forms with model binding and old-input repopulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a form document
    Render {
        /// Path to the form YAML file
        file: PathBuf,

        #[command(flatten)]
        sources: Sources,

        /// HTML config with default attributes and groups
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSRF token added to non-GET forms
        #[arg(long)]
        token: Option<String>,

        /// Form action when the document has no url
        #[arg(long)]
        url: Option<String>,
    },

    /// Print the value a field would render, as JSON
    Resolve {
        /// Field name (dot or bracket notation)
        field: String,

        #[command(flatten)]
        sources: Sources,

        /// Default value as JSON
        #[arg(long)]
        default: Option<String>,

        /// Only look at the model (fails without --model)
        #[arg(long)]
        model_only: bool,
    },
}

/// Data sources (JSON, or YAML for .yaml/.yml files)
#[derive(Args)]
struct Sources {
    /// Bound model
    #[arg(long)]
    model: Option<PathBuf>,

    /// Old input from a failed submission
    #[arg(long)]
    old_input: Option<PathBuf>,

    /// Current request input
    #[arg(long)]
    request: Option<PathBuf>,

    /// Do not repopulate from request input
    #[arg(long)]
    ignore_request: bool,
}

/// Loaded data, owned for the duration of a command
struct Loaded {
    model: Option<Record>,
    old_input: Option<InputBag>,
    request: Option<InputBag>,
    consider_request: bool,
}

impl Sources {
    fn load(&self) -> Result<Loaded> {
        let model = match &self.model {
            Some(path) => {
                let value = load_data(path)?;
                let record = Record::from_value(value)
                    .with_context(|| format!("Invalid model in {}", path.display()))?;
                Some(record)
            }
            None => None,
        };
        Ok(Loaded {
            model,
            old_input: self.old_input.as_deref().map(load_data).transpose()?.map(InputBag::new),
            request: self.request.as_deref().map(load_data).transpose()?.map(InputBag::new),
            consider_request: !self.ignore_request,
        })
    }
}

impl Loaded {
    /// Builder wired to the loaded sources
    fn builder(&self, config: Arc<HtmlConfig>) -> FormBuilder<'_> {
        let mut form = FormBuilder::with_config(config);
        if let Some(old_input) = &self.old_input {
            form = form.with_old_input(old_input);
        }
        if let Some(request) = &self.request {
            form = form.with_request(request);
        }
        form.consider_request(self.consider_request);
        if let Some(model) = &self.model {
            form.set_model(model);
        }
        form
    }
}

fn main() {
    // Initialize tracing (stderr, so rendered markup stays clean on stdout)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            sources,
            config,
            token,
            url,
        } => render(&file, &sources, config.as_deref(), token, url),
        Commands::Resolve {
            field,
            sources,
            default,
            model_only,
        } => resolve(&field, &sources, default.as_deref(), model_only),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<FormError>().and_then(|fe| fe.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn render(
    file: &Path,
    sources: &Sources,
    config: Option<&Path>,
    token: Option<String>,
    url: Option<String>,
) -> Result<()> {
    let document = FormDocument::from_file(file)
        .with_context(|| format!("Failed to load form {}", file.display()))?;
    let config = match config {
        Some(path) => HtmlConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HtmlConfig::default(),
    };

    let loaded = sources.load()?;
    let mut form = loaded.builder(Arc::new(config));
    if let Some(token) = token {
        form = form.with_token(token);
    }
    if let Some(url) = url {
        form = form.with_url(url);
    }

    println!("{}", document.render(&mut form)?);
    Ok(())
}

fn resolve(field: &str, sources: &Sources, default: Option<&str>, model_only: bool) -> Result<()> {
    let default = default
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(FormError::from)
        .context("Invalid --default (expected JSON)")?;

    let loaded = sources.load()?;
    let form = loaded.builder(Arc::new(HtmlConfig::default()));

    let value = if model_only {
        form.resolver().bound_value(field)?.or(default)
    } else {
        form.value_attribute(field, default)
    };

    println!("{}", serde_json::to_string(&value.unwrap_or(Value::Null))?);
    Ok(())
}

/// Read a data file: YAML for .yaml/.yml, JSON otherwise
fn load_data(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .map_err(FormError::from)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let value = if is_yaml {
        serde_yaml::from_str(&text).map_err(FormError::from)
    } else {
        serde_json::from_str(&text).map_err(FormError::from)
    };

    value.with_context(|| format!("Failed to parse {}", path.display()))
}
