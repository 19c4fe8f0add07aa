//! Check command - validate configuration and content

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use lingosite_generator::collector::validate_groups;

use crate::site::Site;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration, content files and translation groups.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let result = validate(config_path);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Collect every problem with the site at `config_path`.
pub fn validate(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let site = match Site::load(config_path) {
        Ok(site) => {
            println!("  ✓ Configuration valid");
            site
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e:#}");
            result.add_error(format!("Configuration error: {e:#}"));
            return result;
        }
    };

    println!("\nChecking content files...");
    let content_dir = site.content_dir();
    if !content_dir.exists() {
        result.add_warning(format!(
            "Content directory does not exist: {}",
            content_dir.display()
        ));
    }

    match site.collect() {
        Ok(content) => {
            for failure in &content.failures {
                result.add_error(failure.to_string());
            }
            if content.failures.is_empty() {
                println!("  ✓ All {} content files valid", content.len());
            } else {
                println!(
                    "  ✗ {} content file(s) have errors",
                    content.failures.len()
                );
            }

            println!("\nChecking translation groups...");
            let issues = validate_groups(&content.entries, &site.localizer);
            let errors = issues.iter().filter(|i| i.is_error()).count();
            for issue in issues {
                if issue.is_error() {
                    result.add_error(issue.to_string());
                } else {
                    result.add_warning(issue.to_string());
                }
            }
            if errors == 0 {
                println!("  ✓ Translation groups consistent");
            } else {
                println!("  ✗ {errors} translation group error(s)");
            }
        }
        Err(e) => result.add_error(format!("Failed to read content: {e}")),
    }

    println!("\nChecking OpenGraph font...");
    let font = site.font_file();
    if font.is_file() {
        println!("  ✓ {} exists", font.display());
    } else {
        result.add_warning(format!(
            "OpenGraph font missing: {} (cards will fail to render)",
            font.display()
        ));
    }

    result
}
