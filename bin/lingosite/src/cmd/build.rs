//! Build command - writes the static SEO artifacts

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use lingosite_generator::{BuildStats, Builder, FontSource};

use crate::site::Site;

/// Run the build command.
///
/// Writes sitemap.xml, sitemap.xsl, robots.txt and one OpenGraph card per
/// page. Cards are skipped when the font cannot be read.
pub async fn run(
    config_path: &Path,
    output: Option<&Path>,
    drafts: bool,
    origin: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?origin, "Starting build");

    let mut site = Site::load(config_path)?;

    if drafts {
        site.config.build.drafts = true;
    }

    if let Some(origin) = origin {
        tracing::info!(origin, "Overriding site origin from CLI");
        site.config.site.origin = origin.to_string();
        site.config.validate().wrap_err("Invalid origin")?;
    }

    let output = match output {
        Some(output) => output.to_path_buf(),
        None => site.root.join(&site.config.build.output_dir),
    };

    let mut builder = Builder::new(
        site.config.clone(),
        site.localizer.clone(),
        site.content_dir(),
        &output,
    );

    let font_file = site.font_file();
    match FontSource::File(font_file.clone()).load(site.config.origin()).await {
        Ok(font) => builder = builder.with_font(font),
        Err(e) => {
            tracing::warn!(error = %e, "OpenGraph font unavailable");
            println!("  ⚠ Font not found at {}, skipping OpenGraph cards", font_file.display());
        }
    }

    let stats = tokio::task::spawn_blocking(move || builder.build())
        .await
        .wrap_err("Build task failed")?
        .wrap_err("Build failed")?;

    print_build_stats(&stats, &output, start.elapsed().as_secs_f64());
    tracing::info!(?stats, "Build completed successfully");

    Ok(())
}

fn print_build_stats(stats: &BuildStats, output: &Path, seconds: f64) {
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Entries:         {}", stats.entries);
    println!("  Sitemap URLs:    {}", stats.sitemap_urls);
    println!("  OpenGraph cards: {}", stats.opengraph_images);
    if stats.failures > 0 {
        println!("  Parse failures:  {}", stats.failures);
    }
    println!();
    println!("  Duration:        {seconds:.2}s");
    println!("  Output:          {}", output.display());
    println!();
}
