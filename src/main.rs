use anyhow::Result;
use clap::Parser;
use classcribe::cli::{Cli, Commands, ConfigAction};
use classcribe::config::Config;
use classcribe::diagnostics::check_dependencies;
use classcribe::ipc::{IpcServer, Request, Response, send_request};
use classcribe::pipeline::VideoSource;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        None => {
            let source = resolve_source(cli.video, cli.video_url)?;
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(workdir) = cli.workdir {
                config.output.workdir = workdir;
            }
            classcribe::app::run_analyze_command(config, source, cli.quiet).await?;
        }
        Some(Commands::Serve { socket }) => {
            let config = load_config(cli.config.as_deref())?;
            classcribe::service::run_serve(config, socket, cli.quiet).await?;
        }
        Some(Commands::Request {
            socket,
            video,
            video_url,
        }) => {
            if video.is_none() && video_url.is_none() {
                anyhow::bail!("provide one of --video or --video-url");
            }
            let request = Request::Analyze {
                video_path: video.map(|p| p.display().to_string()),
                video_url,
            };
            handle_ipc_command(socket, request).await?;
        }
        Some(Commands::Status { socket }) => {
            handle_ipc_command(socket, Request::Status).await?;
        }
        Some(Commands::Shutdown { socket }) => {
            handle_ipc_command(socket, Request::Shutdown).await?;
        }
        Some(Commands::Check) => {
            check_dependencies();
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
    }

    Ok(())
}

/// Resolve exactly one input source from the CLI flags.
fn resolve_source(video: Option<PathBuf>, video_url: Option<String>) -> Result<VideoSource> {
    match (video, video_url) {
        (Some(path), None) => Ok(VideoSource::Local(path)),
        (None, Some(url)) => Ok(VideoSource::Url(url)),
        // clap rejects both flags together; only the empty case reaches here
        _ => anyhow::bail!("provide one of --video or --video-url (see --help)"),
    }
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (configs/pipeline.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    Ok(config.with_env_overrides())
}

/// Send a request to a running service and render the response.
async fn handle_ipc_command(socket: Option<PathBuf>, request: Request) -> Result<()> {
    let socket_path = socket.unwrap_or_else(IpcServer::default_socket_path);

    match send_request(&socket_path, request).await {
        Ok(response) => match response {
            Response::Ok => {
                println!("ok");
            }
            Response::Analysis {
                utterances,
                audio_path,
                transcript_path,
                report_path,
                report,
                ..
            } => {
                println!("audio:      {}", audio_path);
                println!("transcript: {}", transcript_path);
                println!("report:     {}", report_path);
                println!();
                println!("{} utterances", utterances.len());
                println!();
                println!("{}", report);
            }
            Response::Status {
                transcriber_model,
                analyzer_model,
            } => {
                println!("Status:");
                println!("  Transcriber: {}", transcriber_model);
                println!("  Analyzer:    {}", analyzer_model);
            }
            Response::Error { message } => {
                eprintln!("Error: {}", message);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Failed to communicate with service: {}", e);
            eprintln!("Is the service running? Start it with: classcribe serve");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Handle configuration commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&std::path::Path>) -> Result<()> {
    let config_path = custom_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Init => {
            Config::write_default(&config_path)?;
            println!("Wrote default configuration to {}", config_path.display());
        }
        ConfigAction::Show => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
