use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use affilizap_copywriter::{
    Copywriter, GeminiGenerator, GenerationInput, GenerationOutcome, InlineImage, ProgressTicker,
};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::render;

pub struct GenerateArgs {
    pub links: Vec<String>,
    pub links_file: Option<PathBuf>,
    pub images: Vec<String>,
    pub json: bool,
    pub save: bool,
}

pub async fn run(ctx: &AppContext, args: GenerateArgs) -> Result<ExitCode> {
    let mut links = args.links;
    if let Some(path) = &args.links_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        links.extend(text.lines().map(str::to_string));
    }

    let mut images = Vec::with_capacity(args.images.len());
    for source in &args.images {
        images.push(load_image(source).await?);
    }

    let input = match GenerationInput::new(links, images) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(2));
        }
    };

    let copywriter = Copywriter::new(GeminiGenerator::from_config(&ctx.config));
    let outcome = run_with_progress(&copywriter, &input, !args.json).await;

    if args.json {
        render::print_json(outcome.copies())?;
    } else {
        render::print_copies(outcome.copies());
    }

    if let GenerationOutcome::Failure { error, .. } = &outcome {
        eprintln!("Falha na geração: {error}");
    }

    if args.save {
        save_successes(ctx, &outcome).await?;
    }

    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn run_with_progress(
    copywriter: &Copywriter<GeminiGenerator>,
    input: &GenerationInput,
    show: bool,
) -> GenerationOutcome {
    let ticker = ProgressTicker::start();
    let bar = if show {
        progress_bar()
    } else {
        ProgressBar::hidden()
    };
    let drawing = tokio::spawn(draw_progress(bar.clone(), ticker.subscribe()));

    let outcome = copywriter.generate_tracked(input, ticker).await;

    if let Err(e) = drawing.await {
        warn!(error = %e, "Progress display stopped unexpectedly");
    }
    bar.finish_and_clear();
    outcome
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    match ProgressStyle::with_template("{spinner} Criando copies [{bar:30}] {pos}%") {
        Ok(style) => bar.set_style(style.progress_chars("=> ")),
        Err(e) => warn!(error = %e, "Invalid progress template"),
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

async fn draw_progress(bar: ProgressBar, mut progress: watch::Receiver<u8>) {
    loop {
        let value = *progress.borrow_and_update();
        bar.set_position(u64::from(value));
        if value >= 100 || progress.changed().await.is_err() {
            break;
        }
    }
    bar.set_position(u64::from(*progress.borrow()));
}

async fn save_successes(ctx: &AppContext, outcome: &GenerationOutcome) -> Result<()> {
    let successes = outcome.successes();
    if successes.is_empty() {
        return Ok(());
    }

    let history = ctx.history().await?;
    history.load_local().await?;
    let sync = history.append(&successes).await?;
    info!(saved = successes.len(), remote = sync.len(), "Saved to history");
    sync.settled().await;
    Ok(())
}

/// A screenshot path, or an inline data URL.
async fn load_image(source: &str) -> Result<InlineImage> {
    if source.starts_with("data:") {
        return InlineImage::from_encoded(source).context("Invalid image data URL");
    }

    let path = Path::new(source);
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(InlineImage::new(mime_for(path), data))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "image/jpeg",
    }
}
