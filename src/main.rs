use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::sync::Arc;
use tracing::{info, warn};

use bili_duration::render::render;
use bili_duration::selection::Field;
use bili_duration::{create_provider, repl, Config, Session};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("bili-duration")
        .version(env!("CARGO_PKG_VERSION"))
        .author("ChanlerDev")
        .about("Sum the durations of a range of parts of a Bilibili multi-part video")
        .arg(
            Arg::new("input")
                .value_name("BV_OR_URL")
                .help("BV identifier or video link")
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("N")
                .help("First part to include")
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("N")
                .help("Last part to include (defaults to the final part)")
        )
        .arg(
            Arg::new("speed")
                .long("speed")
                .short('s')
                .value_name("X")
                .help("Playback speed, at least 0.1")
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .short('i')
                .help("Start an interactive session")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Run the HTTP lookup service (requires the 'api' feature)")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_name("PORT")
                .help("Port for --serve (overrides config and PORT)")
                .value_parser(clap::value_parser!(u16))
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file")
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("URL")
                .help("Fetch parts through a deployed /bilibili-parts service")
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
        )
        .get_matches();

    if matches.get_flag("verbose") {
        tracing_subscriber::fmt()
            .with_target(true)
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter("bili_duration=info,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(backend) = matches.get_one::<String>("backend") {
        config.upstream.backend_url = Some(backend.clone());
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    config.validate()?;

    let provider = create_provider(&config)?;

    if matches.get_flag("serve") {
        return serve(provider, config).await;
    }

    let session = Session::new(provider, &config.session);

    if matches.get_flag("interactive") {
        if let Some(input) = matches.get_one::<String>("input") {
            let _ = session.search(input).await;
            print!("{}", render(&session.snapshot()));
        }
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        return repl::run(&session, stdin, &mut stdout).await;
    }

    let Some(input) = matches.get_one::<String>("input") else {
        anyhow::bail!("Provide a BV identifier or link, or use --interactive");
    };

    info!("🔍 Looking up {}", input);
    if let Err(e) = session.search(input).await {
        print!("{}", render(&session.snapshot()));
        return Err(e.into());
    }

    let edits = [
        (Field::From, matches.get_one::<String>("from")),
        (Field::To, matches.get_one::<String>("to")),
        (Field::Speed, matches.get_one::<String>("speed")),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            match field {
                Field::From => session.on_from_change(value),
                Field::To => session.on_to_change(value),
                Field::Speed => session.on_speed_change(value),
            }
            session.commit_field(field);
        }
    }

    print!("{}", render(&session.snapshot()));
    Ok(())
}

#[cfg(feature = "api")]
async fn serve(provider: Arc<dyn bili_duration::PartsProvider>, config: Config) -> Result<()> {
    info!("{}", config.summary());
    bili_duration::api::ApiServer::new(provider, Arc::new(config))
        .start()
        .await
}

#[cfg(not(feature = "api"))]
async fn serve(_provider: Arc<dyn bili_duration::PartsProvider>, _config: Config) -> Result<()> {
    anyhow::bail!("This build has no HTTP service; rebuild with `--features api`")
}
