mod demo;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};

use backend::{FilePrefs, HttpBackend, InMemoryBackend, LingoBackend, PrefsStore};
use services::{Clock, DashboardService, HeartsService, LessonFlowService};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidServerUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidServerUrl { raw } => write!(f, "invalid --server value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    dashboard_service: Arc<DashboardService>,
    lesson_flow: Arc<LessonFlowService>,
    hearts: Arc<HeartsService>,
}

impl UiApp for DesktopApp {
    fn dashboard_service(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard_service)
    }

    fn lesson_flow(&self) -> Arc<LessonFlowService> {
        Arc::clone(&self.lesson_flow)
    }

    fn hearts(&self) -> Arc<HeartsService> {
        Arc::clone(&self.hearts)
    }
}

struct Args {
    server_url: String,
    prefs_path: String,
    offline: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--server <url>] [--prefs <path>] [--offline]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --server http://127.0.0.1:5000");
    eprintln!("  --prefs  lingo-prefs.json");
    eprintln!();
    eprintln!("  --offline runs against bundled demo lessons, no server needed.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_SERVER_URL, LINGO_PREFS_PATH, LINGO_OFFLINE");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut server_url = std::env::var("LINGO_SERVER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".into());
        let mut prefs_path =
            std::env::var("LINGO_PREFS_PATH").unwrap_or_else(|_| "lingo-prefs.json".into());
        let mut offline = std::env::var("LINGO_OFFLINE").is_ok();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--server" => {
                    let value = require_value(args, "--server")?;
                    if value.trim().is_empty() || !value.contains("://") {
                        return Err(ArgsError::InvalidServerUrl { raw: value });
                    }
                    server_url = value;
                }
                "--prefs" => {
                    prefs_path = require_value(args, "--prefs")?;
                }
                "--offline" => {
                    offline = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            server_url,
            prefs_path,
            offline,
        })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let backend: Arc<dyn LingoBackend> = if parsed.offline {
        log::info!("running offline against bundled demo lessons");
        Arc::new(InMemoryBackend::new(demo::demo_lessons()))
    } else {
        log::info!("using backend at {}", parsed.server_url);
        Arc::new(HttpBackend::new(parsed.server_url))
    };
    let prefs: Arc<dyn PrefsStore> = Arc::new(FilePrefs::new(&parsed.prefs_path));

    let clock = Clock::default_clock();
    let hearts = Arc::new(HeartsService::new(
        Arc::clone(&backend),
        Arc::clone(&prefs),
        clock,
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::clone(&backend),
        Arc::clone(&prefs),
    ));
    let lesson_flow = Arc::new(LessonFlowService::new(
        Arc::clone(&backend),
        Arc::clone(&hearts),
    ));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        dashboard_service,
        lesson_flow,
        hearts,
    });
    let context = build_app_context(&app);

    // Explicitly disable always-on-top so dev runs don't behave like a modal
    // window on macOS.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Lingo")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
