use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use ytsave::config::{Config, DEFAULT_SERVER};
use ytsave::core::{AudioQuality, DownloadMode, StatusKind, StatusMessage, VideoQuality};
use ytsave::youtube::{build_watch_url, extract_video_id, is_youtube_url};
use ytsave::{FormEvent, FormView, PreviewPhase, check_server, connect};

#[derive(Parser)]
#[command(
    name = "ytsave",
    version,
    about = "Download YouTube audio or video through a ytsave web server",
    long_about = "Drives the download form of a running web server from the terminal.\n\
    The server does the extraction; this tool previews the link and saves the result.\n\n\
    Examples:\n\
      ytsave https://youtu.be/dQw4w9WgXcQ                 # Download MP3 (192 kbps)\n\
      ytsave -m mp4 -Q 1080 https://youtu.be/dQw4w9WgXcQ  # Download MP4 up to 1080p\n\
      ytsave -i https://youtu.be/dQw4w9WgXcQ              # Show preview only\n\
      ytsave -d ./music https://youtu.be/dQw4w9WgXcQ      # Save to directory\n\
      ytsave --check                                      # Check the server is up\n\
      ytsave --interactive                                # Type URLs and commands"
)]
struct Args {
    /// Video URL to download
    #[arg(help = "Video URL (watch?v=, youtu.be/, /shorts/ or /embed/ links)")]
    url: Option<String>,

    #[arg(short = 'm', long = "mode", default_value = "mp3", help = "Output format (mp3, mp4)")]
    mode: DownloadMode,

    #[arg(
        short = 'q',
        long = "quality",
        default_value = "192",
        value_parser = parse_audio_quality,
        help = "MP3 bitrate in kbps (128, 192, 256)"
    )]
    quality: AudioQuality,

    #[arg(
        short = 'Q',
        long = "video-quality",
        default_value = "720",
        value_parser = parse_video_quality,
        help = "Maximum MP4 height (360, 720, 1080)"
    )]
    video_quality: VideoQuality,

    #[arg(
        short = 's',
        long = "server",
        env = "YTSAVE_SERVER",
        default_value = DEFAULT_SERVER,
        help = "Base URL of the web server"
    )]
    server: String,

    #[arg(short = 'd', long = "dir", default_value = ".", help = "Download to specified directory")]
    output_dir: PathBuf,

    #[arg(long = "timeout", help = "Give up on requests after this many seconds")]
    timeout: Option<u64>,

    #[arg(short = 'i', long = "info-only", help = "Show the preview only, no download")]
    info_only: bool,

    #[arg(long = "check", help = "Check the server health endpoint and exit")]
    check: bool,

    #[arg(long = "interactive", help = "Read URLs and commands from stdin")]
    interactive: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            server: self.server.clone(),
            request_timeout: self.timeout.map(Duration::from_secs),
            output_dir: self.output_dir.clone(),
            mode: self.mode,
            audio_quality: self.quality,
            video_quality: self.video_quality,
            ..Config::default()
        }
    }
}

fn parse_audio_quality(value: &str) -> Result<AudioQuality, String> {
    let quality = AudioQuality::normalize(value);
    if quality.as_ref() != value.trim() {
        eprintln!("Warning: Unsupported bitrate '{}', using {}", value, quality);
    }
    Ok(quality)
}

fn parse_video_quality(value: &str) -> Result<VideoQuality, String> {
    let quality = VideoQuality::normalize(value);
    if quality.as_ref() != value.trim() {
        eprintln!("Warning: Unsupported video quality '{}', using {}", value, quality);
    }
    Ok(quality)
}

enum Command {
    Event(FormEvent),
    Quit,
    Unknown(String),
}

/// `:`-prefixed lines are commands, anything else replaces the URL field.
fn parse_command(line: &str) -> Command {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Command::Event(FormEvent::Input(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("mp3"), None) => Command::Event(FormEvent::Mode(DownloadMode::Mp3)),
        (Some("mp4"), None) => Command::Event(FormEvent::Mode(DownloadMode::Mp4)),
        (Some("q"), Some(value)) => {
            Command::Event(FormEvent::AudioQuality(AudioQuality::normalize(value)))
        }
        (Some("vq"), Some(value)) => {
            Command::Event(FormEvent::VideoQuality(VideoQuality::normalize(value)))
        }
        (Some("get"), None) => Command::Event(FormEvent::Submit),
        (Some("quit"), None) => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    }
}

fn print_status(status: &StatusMessage) {
    match status.kind {
        StatusKind::Neutral => println!("… {}", status.text),
        StatusKind::Success => println!("✓ {}", status.text),
        StatusKind::Error => eprintln!("✗ {}", status.text),
    }
}

fn print_preview(view: &FormView, video_id: Option<&str>) {
    println!("Title: {}", view.preview.title);
    println!("  Channel: {}", view.preview.channel);
    println!("  {}", view.preview.duration);
    if let Some(thumbnail) = &view.preview.thumbnail {
        println!("  Thumbnail: {}", thumbnail);
    }
    if let Some(id) = video_id {
        println!("  Watch: {}", build_watch_url(id));
    }
}

/// Echo every visible change of the form until the session ends
fn spawn_view_printer(mut views: watch::Receiver<FormView>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = views.borrow().clone();
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            if view.url_feedback != last.url_feedback {
                println!("{}", view.url_feedback);
            }
            if view.mode != last.mode {
                println!("Mode: {}", view.mode);
            }
            if view.status != last.status && view.status.is_visible() {
                print_status(&view.status);
            }
            if view.phase == PreviewPhase::Loaded && view.preview != last.preview {
                print_preview(&view, None);
            }
            if view.last_saved != last.last_saved
                && let Some(saved) = &view.last_saved
            {
                println!("Saved to: {}", saved.path.display());
            }
            last = view;
        }
    })
}

async fn one_shot(config: &Config, url: &str, info_only: bool) -> Result<()> {
    let video_id = extract_video_id(url.trim());
    if video_id.is_some() && !is_youtube_url(url.trim()) {
        eprintln!("Warning: {} is not on a known YouTube host; the server may reject it", url);
    }

    let (session, handle) = connect(config)?;
    let task = tokio::spawn(session.run());
    let mut views = handle.subscribe();

    println!("Fetching preview for: {}", url);
    handle.input(url);
    let view = views
        .wait_for(|v| {
            matches!(
                v.phase,
                PreviewPhase::Loaded | PreviewPhase::Invalid | PreviewPhase::Error
            )
        })
        .await?
        .clone();

    match view.phase {
        PreviewPhase::Invalid => bail!("{}", view.url_feedback),
        PreviewPhase::Error => bail!("{}", view.status.text),
        _ => print_preview(&view, video_id.as_deref()),
    }

    if info_only {
        println!("Information only mode - skipping download.");
        return Ok(());
    }

    println!();
    handle.submit();
    views.wait_for(|v| v.busy || v.submissions > 0).await?;
    print_status(&handle.view().status);
    let view = views.wait_for(|v| v.submissions > 0).await?.clone();
    drop(handle);
    task.await.context("form session crashed")?;

    match (view.status.kind, view.last_saved) {
        (StatusKind::Success, Some(saved)) => {
            print_status(&view.status);
            println!("Saved to: {} ({} bytes)", saved.path.display(), saved.size);
            Ok(())
        }
        _ => bail!("{}", view.status.text),
    }
}

async fn interactive(config: &Config) -> Result<()> {
    let (session, handle) = connect(config)?;
    let task = tokio::spawn(session.run());
    let printer = spawn_view_printer(handle.subscribe());

    println!("Paste a URL, or use :mp3, :mp4, :q <kbps>, :vq <lines>, :get, :quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Event(event) => {
                handle.send(event);
            }
            Command::Quit => break,
            Command::Unknown(command) => eprintln!("Unknown command: {}", command),
        }
    }

    drop(handle);
    task.await.context("form session crashed")?;
    printer.await?;
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = args.config();

    if args.check {
        let health = check_server(&config)
            .await
            .with_context(|| format!("server {} is not reachable", config.server))?;
        println!(
            "{} {} at {}: {}",
            health.app.as_deref().unwrap_or("server"),
            health.version.as_deref().unwrap_or(""),
            config.server,
            health.status
        );
        if !health.is_ok() {
            bail!("server reported status '{}'", health.status);
        }
        return Ok(());
    }

    if args.interactive {
        return interactive(&config).await;
    }

    let Some(url) = args.url.as_deref() else {
        bail!("a URL is required unless --interactive or --check is given");
    };
    one_shot(&config, url, args.info_only).await
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ytsave=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
