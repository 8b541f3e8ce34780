use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use yeardots::{render_params, OutputFormat, ParamPolicy, RenderParams, ServiceConfig, Theme};

#[derive(Parser)]
#[command(name = "yeardots", version, about = "Year-progress dot calendar renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one image and write it to a file or stdout
    Render(RenderArgs),
    /// Serve the HTTP image and model endpoints
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Reference date (YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or RFC 3339); defaults to now
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value_t = 390)]
    width: u32,
    #[arg(long, default_value_t = 844)]
    height: u32,
    /// png, svg or json
    #[arg(long, default_value = "png")]
    format: String,
    /// dark or light
    #[arg(long, default_value = "dark")]
    theme: String,
    /// Largest accepted width or height
    #[arg(long, default_value_t = 4096)]
    max_dimension: u32,
    /// Output path; stdout when omitted
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,
    /// Request threads; defaults to the number of CPUs
    #[arg(long)]
    workers: Option<usize>,
    /// Fall back to defaults on malformed parameters instead of rejecting
    #[arg(long)]
    lenient: bool,
    #[arg(long, default_value_t = 4096)]
    max_dimension: u32,
    #[arg(long, default_value = "dark")]
    theme: String,
    #[arg(long, default_value_t = 60)]
    cache_max_age: u32,
}

fn theme(name: &str) -> anyhow::Result<Theme> {
    match Theme::by_name(name) {
        Some(t) => Ok(t),
        None => bail!("unknown theme `{name}` (expected dark or light)"),
    }
}

/// Validate CLI arguments with the same rules the HTTP surfaces apply.
fn render_request(args: &RenderArgs, now: NaiveDateTime) -> anyhow::Result<RenderParams> {
    let config = ServiceConfig {
        param_policy: ParamPolicy::Strict,
        max_dimension: args.max_dimension,
        ..ServiceConfig::default()
    };
    let (width, height) = (args.width.to_string(), args.height.to_string());
    let mut pairs = vec![
        ("width", width.as_str()),
        ("height", height.as_str()),
        ("format", args.format.as_str()),
        ("theme", args.theme.as_str()),
    ];
    if let Some(date) = &args.date {
        pairs.push(("date", date.as_str()));
    }
    RenderParams::from_pairs(pairs, &config, now).context("invalid render arguments")
}

fn run_render(args: &RenderArgs) -> anyhow::Result<()> {
    let params = render_request(args, Local::now().naive_local())?;

    let rendered = render_params(&params).context("rendering failed")?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &rendered.body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} ({} bytes)", path.display(), rendered.body.len());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered.body)?;
            stdout.flush()?;
        }
    }
    if rendered.format == OutputFormat::Png {
        // The raster carries no text
        eprintln!("{}", rendered.label.text());
    }
    Ok(())
}

fn service_config(args: &ServeArgs) -> anyhow::Result<ServiceConfig> {
    let defaults = ServiceConfig::default();
    Ok(ServiceConfig {
        bind: args.bind.clone(),
        workers: args.workers.unwrap_or(defaults.workers),
        param_policy: if args.lenient { ParamPolicy::Lenient } else { ParamPolicy::Strict },
        max_dimension: args.max_dimension,
        theme: theme(&args.theme)?,
        cache_max_age_secs: args.cache_max_age,
        ..defaults
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Serve(args) => {
            let config = service_config(&args)?;
            yeardots::server::YearServer::bind(config)?.run()?;
            Ok(())
        }
    }
}
