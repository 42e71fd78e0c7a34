/// gigset - build setlist playlists from the command line
use clap::{Args, Parser, Subcommand};
use gigset_cli::{config::CliConfig, proxy, view};
use gigset_client::{Controller, FileTokenStore, SetlistClient, TokenStore};
use gigset_core::{
    authorization_header, build_request, capture_token, Event, FormValues, Session, StatusTone,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser)]
#[command(name = "gigset")]
#[command(about = "Turn band names into setlist playlists", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./gigset.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the form to the playlist function
    Submit {
        #[command(flatten)]
        form: FormArgs,

        /// Also print the full decoded response
        #[arg(long)]
        raw: bool,
    },
    /// Show the payload and request without sending anything
    Preview {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the example payload
    Example,
    /// Manage the cached bearer token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Run the local CORS proxy in front of the function emulator
    Proxy {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Emulator invocation URL
        #[arg(long)]
        target: Option<String>,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Print the cached token (masked unless --reveal)
    Show {
        #[arg(long)]
        reveal: bool,
    },
    /// Cache a token
    Set { token: String },
    /// Forget the cached token
    Clear,
    /// Take the token from a `?token=` or `?bearer=` link
    Capture { link: Url },
}

#[derive(Args)]
struct FormArgs {
    /// Band name (repeatable)
    #[arg(short, long = "band")]
    bands: Vec<String>,

    /// Band names separated by newlines or commas
    #[arg(long = "bands")]
    band_list: Option<String>,

    /// Playlist to create (needs a token)
    #[arg(short, long)]
    playlist: Option<String>,

    #[arg(long)]
    threshold: Option<String>,

    #[arg(long)]
    max_length: Option<String>,

    #[arg(long)]
    rate_limit: Option<String>,

    #[arg(long)]
    no_cache: bool,

    #[arg(long)]
    force_smart: bool,

    #[arg(long)]
    fuzzy: bool,

    /// Function URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Target the local emulator (wraps the request in an event envelope)
    #[arg(long)]
    local: bool,

    /// Bearer token for this run (also cached)
    #[arg(short, long)]
    token: Option<String>,

    /// Link the form was opened with; a token in it is captured
    #[arg(long)]
    link: Option<Url>,

    /// Start from the example values
    #[arg(long)]
    example: bool,
}

impl FormArgs {
    /// Layer the command line values over `form`.
    fn apply(&self, mut form: FormValues) -> FormValues {
        let mut bands = self.bands.clone();
        if let Some(list) = &self.band_list {
            bands.push(list.clone());
        }
        if !bands.is_empty() {
            form.band_names = bands.join("\n");
        }
        if let Some(playlist) = &self.playlist {
            form.playlist_name = playlist.clone();
        }
        if let Some(threshold) = &self.threshold {
            form.copy_last_setlist_threshold = threshold.clone();
        }
        if let Some(max_length) = &self.max_length {
            form.max_setlist_length = max_length.clone();
        }
        if let Some(rate_limit) = &self.rate_limit {
            form.rate_limit = rate_limit.clone();
        }
        form.no_cache |= self.no_cache;
        form.force_smart_setlist |= self.force_smart;
        form.use_fuzzy_search |= self.fuzzy;
        form
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout stays clean for results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigset=info,gigset_client=info,gigset_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Submit { form, raw } => submit(&config, &form, raw).await,
        Commands::Preview { form } => preview(&config, &form).await,
        Commands::Example => example(&config),
        Commands::Token { action } => token(&config, action),
        Commands::Proxy { host, port, target } => {
            let mut config = config;
            if let Some(host) = host {
                config.proxy.host = host;
            }
            if let Some(port) = port {
                config.proxy.port = port;
            }
            if let Some(target) = target {
                config.proxy.target_url = target;
            }
            config.validate()?;
            proxy::serve(&config.proxy).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Boot a session and replay the command line onto it.
async fn open_session(
    config: &CliConfig,
    args: &FormArgs,
) -> anyhow::Result<Controller<SetlistClient, FileTokenStore>> {
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config.endpoint.clone());

    let mut controller = Controller::new(
        Session::new(endpoint),
        SetlistClient::new()?,
        config.token_store()?,
    );
    controller.boot(args.link.clone()).await;

    if args.local || config.local_mode {
        controller.dispatch(Event::SetLocalMode(true)).await;
    }
    // An endpoint typed on the command line wins over the local URL
    if let Some(endpoint) = &args.endpoint {
        controller.dispatch(Event::EditEndpoint(endpoint.clone())).await;
    }
    if let Some(token) = &args.token {
        controller.dispatch(Event::EditToken(token.clone())).await;
    }
    if args.example {
        controller.dispatch(Event::FillExample).await;
    }

    let form = args.apply(controller.session().form.clone());
    controller.dispatch(Event::EditForm(form)).await;
    Ok(controller)
}

async fn submit(config: &CliConfig, args: &FormArgs, raw: bool) -> anyhow::Result<ExitCode> {
    let mut controller = open_session(config, args).await?;
    controller.dispatch(Event::Submit).await;

    let session = controller.into_session();
    print!("{}", view::render_session(&session, raw));

    Ok(match session.status.tone {
        StatusTone::Ok => ExitCode::SUCCESS,
        StatusTone::Error => ExitCode::FAILURE,
    })
}

async fn preview(config: &CliConfig, args: &FormArgs) -> anyhow::Result<ExitCode> {
    let session = open_session(config, args).await?.into_session();

    println!("{}", session.playlist_hint());
    println!("{}", session.payload_preview());

    let endpoint = session.endpoint.trim();
    if !endpoint.is_empty() {
        let auth = authorization_header(&session.token);
        let request = build_request(
            endpoint,
            &session.payload(),
            auth.as_deref(),
            session.local_mode,
        )?;
        println!();
        print!("{}", view::render_request_preview(&request));
    }
    Ok(ExitCode::SUCCESS)
}

fn example(config: &CliConfig) -> anyhow::Result<ExitCode> {
    let token_present = config.cached_token().is_some();
    let payload = gigset_core::build_payload(&FormValues::default().example(), token_present);
    println!("{}", payload.to_json_pretty()?);
    Ok(ExitCode::SUCCESS)
}

fn token(config: &CliConfig, action: TokenAction) -> anyhow::Result<ExitCode> {
    let store = config.token_store()?;

    match action {
        TokenAction::Show { reveal } => match store.load()? {
            Some(token) if reveal => println!("{}", token),
            Some(token) => println!("{}", mask(&token)),
            None => {
                eprintln!("No token cached at {}", store.path().display());
                return Ok(ExitCode::FAILURE);
            }
        },
        TokenAction::Set { token } => {
            let token = token.trim();
            if token.is_empty() {
                eprintln!("Token is empty");
                return Ok(ExitCode::FAILURE);
            }
            store.save(token)?;
            println!("Token saved to {}", store.path().display());
        }
        TokenAction::Clear => {
            store.clear()?;
            println!("Token cleared");
        }
        TokenAction::Capture { link } => match capture_token(&link) {
            Some(captured) => {
                store.save(&captured.token)?;
                println!("Token captured from link and hidden from URL");
                println!("{}", captured.cleaned);
            }
            None => {
                eprintln!("No token or bearer parameter in link");
                return Ok(ExitCode::FAILURE);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

/// Hide the token entirely, keeping only its length.
fn mask(token: &str) -> String {
    let bare = token.trim();
    let bare = bare.strip_prefix("Bearer ").unwrap_or(bare).trim();
    format!("**** ({} chars)", bare.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigset_core::{InvocationMode, LOCAL_INVOKE_URL};
    use tempfile::TempDir;

    fn parse_form(args: &[&str]) -> FormArgs {
        let argv = ["gigset", "preview"].iter().chain(args).copied();
        match Cli::parse_from(argv).command {
            Commands::Preview { form } => form,
            _ => panic!("Expected the preview command"),
        }
    }

    fn config_in(dir: &TempDir) -> CliConfig {
        CliConfig {
            token_file: Some(dir.path().join("token.json")),
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_apply_layers_flags_over_form() {
        let args = parse_form(&[
            "--band",
            "Opeth",
            "-b",
            "Gojira",
            "--bands",
            "Tool, Mastodon",
            "--threshold",
            "8",
            "--fuzzy",
        ]);
        let form = args.apply(FormValues::default().example());

        assert_eq!(form.band_names, "Opeth\nGojira\nTool, Mastodon");
        assert_eq!(form.copy_last_setlist_threshold, "8");
        assert_eq!(form.playlist_name, "Rehearsal Mix");
        assert_eq!(form.rate_limit, "0.5");
        assert!(form.no_cache);
        assert!(form.use_fuzzy_search);
        assert!(!form.force_smart_setlist);
    }

    #[test]
    fn test_apply_without_flags_keeps_form() {
        let form = FormValues {
            band_names: "Opeth".to_string(),
            ..FormValues::default()
        };
        assert_eq!(parse_form(&[]).apply(form.clone()), form);
    }

    #[tokio::test]
    async fn test_explicit_endpoint_survives_local_mode() {
        let dir = TempDir::new().unwrap();
        let args = parse_form(&[
            "--endpoint",
            "https://custom.example/run",
            "--local",
            "--bands",
            "A",
        ]);

        let session = open_session(&config_in(&dir), &args)
            .await
            .unwrap()
            .into_session();

        assert!(session.local_mode);
        assert_eq!(session.endpoint, "https://custom.example/run");

        let request =
            build_request(&session.endpoint, &session.payload(), None, session.local_mode)
                .unwrap();
        assert_eq!(request.mode, InvocationMode::Local);
        assert_eq!(request.url, "https://custom.example/run");
    }

    #[tokio::test]
    async fn test_local_mode_without_endpoint_uses_local_url() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig {
            endpoint: "https://fn.example.com/".to_string(),
            local_mode: true,
            ..config_in(&dir)
        };

        let session = open_session(&config, &parse_form(&["--bands", "A"]))
            .await
            .unwrap()
            .into_session();
        assert_eq!(session.endpoint, LOCAL_INVOKE_URL);
    }

    #[tokio::test]
    async fn test_endpoint_flag_without_local_mode() {
        let dir = TempDir::new().unwrap();
        let args = parse_form(&["-e", "https://other.example/", "--token", "abc"]);

        let session = open_session(&config_in(&dir), &args)
            .await
            .unwrap()
            .into_session();
        assert!(!session.local_mode);
        assert_eq!(session.endpoint, "https://other.example/");
        assert_eq!(config_in(&dir).cached_token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_mask_hides_whole_token() {
        assert_eq!(mask("abc"), "**** (3 chars)");
        assert_eq!(mask("Bearer secret-token"), "**** (12 chars)");
        assert!(!mask("Bearer secret-token").contains("Bear"));
    }
}
