use std::env;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Parser;
use directories::ProjectDirs;
use lightbox::catalog::{Catalog, Handle};
use lightbox::cli::{Cli, LayoutArgs, Sub, ViewArgs};
use lightbox::gallery::{Gallery, ScrollMetrics};
use lightbox::image_service::{ImageService, TemplateService};
use lightbox::layout::{
    DisplayRequest, Options, PageCursor, ViewerOptions, ViewerSummary, ViewportGeometry,
};
use lightbox::renderer::JsonLinesRenderer;
use lightbox::utils::debounce::ResizeDebouncer;
use lightbox_config::Config;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let directives = env::var("RUST_LOG").unwrap_or_else(|_| "lightbox=debug".to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    tracy_client::Client::start();

    let cli = Cli::parse();
    let path = config_path(cli.config);

    if let Sub::Validate = cli.subcommand {
        let path = path.context("no config file to validate")?;
        Config::load(&path).map_err(|err| anyhow!("{err:?}"))?;
        info!("config is valid");
        return Ok(());
    }

    let config = match &path {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("{err:?}");
                warn!("using the default config");
                Config::default()
            }
        },
        None => {
            debug!("no config file, using the default config");
            Config::default()
        }
    };

    match cli.subcommand {
        Sub::Layout(args) => layout(args, &config),
        Sub::View(args) => view(args, &config),
        Sub::Validate => Ok(()),
    }
}

/// Resolves the config file to use.
///
/// An explicitly requested path is returned even if it doesn't exist, so that the error is
/// reported. The default path is only returned if the file is there.
fn config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path);
    }

    if let Some(path) = env::var_os("LIGHTBOX_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let dirs = ProjectDirs::from("", "", "lightbox")?;
    let path = dirs.config_dir().join("config.kdl");
    path.exists().then_some(path)
}

fn load_catalog(path: &Path, config: &Config) -> anyhow::Result<Catalog> {
    let catalog = Catalog::load(path)?;
    Ok(catalog.truncated(config.gallery.download_limit))
}

fn layout(args: LayoutArgs, config: &Config) -> anyhow::Result<()> {
    let catalog = Rc::new(load_catalog(&args.catalog, config)?);
    let options = Rc::new(Options::from_config(config));
    let service = TemplateService::from_config(&config.image_service);

    let out = BufWriter::new(io::stdout().lock());
    let mut renderer = JsonLinesRenderer::new(out, service);

    let start = Instant::now();
    let mut gallery = Gallery::new(catalog, options, args.viewport.geometry());
    gallery.load(&mut renderer);

    if let Some(idx) = args.select {
        gallery.select(Handle(idx), &mut renderer);
    }

    for _ in 0..args.scrolls {
        let metrics = ScrollMetrics {
            scroll_height: f64::from(gallery.content_height()),
            scroll_top: f64::from(
                gallery
                    .content_height()
                    .saturating_sub(gallery.geometry().height),
            ),
            client_height: f64::from(gallery.geometry().height),
        };
        if gallery.scroll(metrics, &mut renderer) == 0 {
            debug!("nothing left to scroll to");
            break;
        }
    }

    // Simulated clock: resizes are fed through the debouncer the way a host event loop would.
    let delay = Duration::from_millis(config.debounce.resize_ms);
    let mut debouncer = ResizeDebouncer::new(delay);
    let mut now = start;
    for &(width, height) in &args.resize {
        let geometry = ViewportGeometry::new(width, height, args.viewport.dpr);
        debouncer.push(geometry, now);

        now += if args.burst { delay / 2 } else { delay };
        if let Some(geometry) = debouncer.poll(now) {
            gallery.resize(geometry, &mut renderer);
        }
    }
    if let Some(deadline) = debouncer.deadline() {
        if let Some(geometry) = debouncer.poll(deadline) {
            gallery.resize(geometry, &mut renderer);
        }
    }

    debug!(
        "{} columns, content height {}px, {} of {} pages placed",
        gallery.plan().column_count,
        gallery.content_height(),
        match gallery.pager().cursor() {
            PageCursor::Page(page) => page,
            PageCursor::Exhausted => gallery.pager().total_pages(),
        },
        gallery.pager().total_pages(),
    );

    renderer
        .into_inner()
        .flush()
        .context("error writing to stdout")?;
    Ok(())
}

#[derive(Serialize)]
struct ViewOutput {
    url: String,
    external_url: String,
    request: DisplayRequest,
    summary: ViewerSummary,
}

fn view(args: ViewArgs, config: &Config) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.catalog, config)?;
    let handle = Handle(args.handle);
    let photo = catalog.get(handle).with_context(|| {
        format!(
            "there's no photo {handle} in a catalog of {} photos",
            catalog.len()
        )
    })?;

    let options = ViewerOptions::from_config(&config.viewer);
    let geometry = args.viewport.geometry();
    let request = options.display_request(photo, &geometry);
    let summary = options.summary(photo, &geometry, &catalog);

    let service = TemplateService::from_config(&config.image_service);
    let output = ViewOutput {
        url: service.resolve(&request.photo_id, request.size.w, request.size.h),
        external_url: service.external_url(&photo.external_ref),
        request,
        summary,
    };

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &output).context("error serializing output")?;
    writeln!(out).context("error writing to stdout")?;
    Ok(())
}
