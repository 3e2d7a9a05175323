use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use reqwest::blocking::RequestBuilder;
use reqwest::StatusCode;
use supports_color::Stream as ColorStream;
use url::Url;

use rpc_client::config::{ClientConfig, ConfigManager, ConfigSource, BASE_URL_ENV};
use rpc_client::{provider, SharedClient};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Send requests through a shared client aimed at the configured RPC base URL."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the saved base URL.
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Send a GET request to PATH under the base URL.
    Get(GetArgs),
    /// Send a POST request with a JSON body to PATH under the base URL.
    Post(PostArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Save the base URL used when RPC_BASEURL is not set.
    Set(SetArgs),
    /// Print the base URL the client would use and where it comes from.
    Show,
}

#[derive(Args)]
struct SetArgs {
    /// Absolute http(s) URL, e.g. https://api.example.com
    url: String,
}

#[derive(Args)]
struct GetArgs {
    /// Request path relative to the base URL.
    path: String,
}

#[derive(Args)]
struct PostArgs {
    /// Request path relative to the base URL.
    path: String,
    /// JSON request body.
    #[arg(short, long)]
    data: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let Cli { command } = Cli::parse();

    match command {
        Commands::Config(ConfigCommands::Set(args)) => handle_config_set(args),
        Commands::Config(ConfigCommands::Show) => handle_config_show(),
        Commands::Get(args) => handle_get(provider::init(), args),
        Commands::Post(args) => handle_post(provider::init(), args),
    }
}

fn handle_config_set(args: SetArgs) -> Result<()> {
    let base_url = args.url.trim();
    let parsed = Url::parse(base_url).with_context(|| format!("invalid base URL {base_url:?}"))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        bail!("base URL must be an absolute http or https URL, got {base_url:?}");
    }

    let config = ConfigManager::new()?;
    config
        .save_base_url(base_url)
        .context("failed to save base URL")?;
    println!("Base URL saved to {}", config.config_file().display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = ClientConfig::load();
    match config.source {
        ConfigSource::Environment => println!("{} (from {BASE_URL_ENV})", config.base_url),
        ConfigSource::File => {
            let file = ConfigManager::new()?.config_file();
            println!("{} (from {})", config.base_url, file.display());
        }
        ConfigSource::Unset => println!(
            "No base URL configured. Set {BASE_URL_ENV} or run `rpc-client config set <URL>`."
        ),
    }
    Ok(())
}

fn handle_get(client: &SharedClient, args: GetArgs) -> Result<()> {
    let url = client.url(&args.path);
    send(client.get(&args.path), &url)
}

fn handle_post(client: &SharedClient, args: PostArgs) -> Result<()> {
    let url = client.url(&args.path);
    let mut request = client.post(&args.path);
    if let Some(data) = args.data {
        let body: serde_json::Value =
            serde_json::from_str(&data).context("--data is not valid JSON")?;
        request = request.json(&body);
    }
    send(request, &url)
}

fn send(request: RequestBuilder, url: &str) -> Result<()> {
    let spinner = create_spinner(url)?;
    let result = request.send();
    spinner.finish_and_clear();

    let response = result.with_context(|| format!("request to {url} failed"))?;
    let status = response.status();
    let body = response
        .text()
        .context("failed to read response body")?;

    if !status.is_success() {
        eprintln!("{} {url}", status_label(status));
        if !body.is_empty() {
            eprintln!("{body}");
        }
        return Err(anyhow!("server responded with status {status}"));
    }

    println!("{body}");
    Ok(())
}

fn create_spinner(url: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {wide_msg}")?
            .tick_chars("⠁⠃⠇⡇⣇⣧⣷⣿"),
    );
    pb.set_message(url.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

fn status_label(status: StatusCode) -> String {
    let label = status.to_string();
    if color_enabled() {
        if status.is_server_error() {
            format!("{}", label.red().bold())
        } else {
            format!("{}", label.yellow().bold())
        }
    } else {
        label
    }
}

fn color_enabled() -> bool {
    supports_color::on_cached(ColorStream::Stderr)
        .map(|level| level.has_basic)
        .unwrap_or(false)
}
