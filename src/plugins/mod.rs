//! Search plugin localizer
//!
//! Rebuilds the localized search-plugin tree: a fixed `en` baseline copied
//! from the local overlay source tree, then one directory per supported
//! locale, populated from the l10n host with local overrides and
//! engine-specific XML overlays applied on the way through.

pub mod dom;
pub mod listing;
pub mod locales;
pub mod overlay;
pub mod properties;
pub mod xpath;

use std::fs;
use std::path::Path;

use crate::common::fs::{copy_dir_recursive, write_bytes, write_text};
use crate::config::{PluginsConfig, expand_locale, expand_locale_file};
use crate::error::{Result, UpkeepError};
use crate::fetch::Fetcher;
use crate::progress::ProgressDisplay;

use overlay::Overlay;

/// Why a locale produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not in the locally computed supported set
    Unsupported,
    /// Listing unavailable or empty
    NoFiles,
    /// No default engine in the region properties resource
    NoDefaultEngine,
}

/// Summary of a localizer run
#[derive(Debug, Default)]
pub struct PluginsReport {
    /// Locales written, with the number of plugin files each
    pub written: Vec<(String, usize)>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Rebuild the output tree for every supported locale.
///
/// Unsupported locales, empty listings and missing default engines skip the
/// locale and continue; fetch failures for individual plugin files abort.
pub fn run_plugins(
    root: &Path,
    config: &PluginsConfig,
    fetcher: &Fetcher,
    progress: &ProgressDisplay,
) -> Result<PluginsReport> {
    let overlays_dir = root.join(&config.overlays_dir);
    let output_dir = root.join(&config.output_dir);

    // The output tree is a build product; start from nothing.
    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)?;
    }
    fs::create_dir_all(&output_dir)?;

    // The en plugins aren't in any l10n repo; seed them from the local tree.
    let en_baseline = overlays_dir.join("en");
    if !en_baseline.is_dir() {
        return Err(UpkeepError::FileNotFound {
            path: en_baseline.display().to_string(),
        });
    }
    copy_dir_recursive(&en_baseline, output_dir.join("en"))?;

    let all_locales = locales::parse_locale_list(&fetcher.get_text(&config.locale_list_url)?);
    let supported = locales::supported_locales(root, &config.supported_locales_cmd)?;
    progress.set_total(all_locales.len() as u64);

    let mut report = PluginsReport::default();
    for locale in &all_locales {
        progress.update(locale);
        if !supported.contains(locale) {
            progress.status(format!("skipping unsupported locale: {}", locale));
            report.skipped.push((locale.clone(), SkipReason::Unsupported));
            progress.inc();
            continue;
        }

        progress.status(format!("scraping: {}...", locale));
        match localize_one(locale, config, &overlays_dir, &output_dir, fetcher, progress)? {
            LocaleOutcome::Written(count) => report.written.push((locale.clone(), count)),
            LocaleOutcome::Skipped(reason) => report.skipped.push((locale.clone(), reason)),
        }
        progress.inc();
    }

    Ok(report)
}

/// What happened for one supported locale
enum LocaleOutcome {
    /// Number of plugin files written
    Written(usize),
    Skipped(SkipReason),
}

/// Localize a single supported locale
fn localize_one(
    locale: &str,
    config: &PluginsConfig,
    overlays_dir: &Path,
    output_dir: &Path,
    fetcher: &Fetcher,
    progress: &ProgressDisplay,
) -> Result<LocaleOutcome> {
    let listing_url = expand_locale(&config.listing_url, locale);
    let files = match fetcher.get_text_optional(&listing_url)? {
        Some(html) => listing::parse_listing(&html)?,
        None => Vec::new(),
    };
    if files.is_empty() {
        progress.status(format!("no files for locale: {}", locale));
        return Ok(LocaleOutcome::Skipped(SkipReason::NoFiles));
    }

    progress.status("  found search plugins".to_string());

    let directory = output_dir.join(locale);
    fs::create_dir_all(&directory)?;

    let region_url = expand_locale(&config.region_url, locale);
    let default = fetcher
        .get_text_optional(&region_url)?
        .and_then(|contents| properties::default_engine(&contents));
    let Some(default) = default else {
        // Skipped locales leave no output behind.
        fs::remove_dir_all(&directory)?;
        return Ok(LocaleOutcome::Skipped(SkipReason::NoDefaultEngine));
    };
    progress.status(format!("  default: {}", default));
    write_text(&directory.join("default.txt"), &default)?;

    let mut written = 0;
    for file in &files {
        let destination = directory.join(file);

        // Locale-specific overrides win over anything remote.
        let override_path = overlays_dir.join(locale).join(file);
        if override_path.exists() {
            progress.status(format!("  copying override: {}...", file));
            fs::copy(&override_path, &destination)?;
            written += 1;
            continue;
        }

        progress.status(format!("  downloading: {}...", file));
        let url = expand_locale_file(&config.raw_url, locale, file);
        let bytes = fetcher.get_bytes(&url)?;

        if patch_xml_plugin(file, &bytes, overlays_dir, &destination)? {
            written += 1;
            continue;
        }

        write_bytes(&destination, &bytes)?;
        written += 1;
    }

    Ok(LocaleOutcome::Written(written))
}

/// Apply the engine-specific overlay to a downloaded XML plugin, if one is
/// defined. Returns whether the patched document was written.
fn patch_xml_plugin(
    file: &str,
    bytes: &[u8],
    overlays_dir: &Path,
    destination: &Path,
) -> Result<bool> {
    let path = Path::new(file);
    if path.extension().and_then(|e| e.to_str()) != Some("xml") {
        return Ok(false);
    }

    // The engine identifier is the stem up to the first '-'
    // ("google-nocodes.xml" and "google.xml" share one overlay).
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file);
    let engine = stem.split('-').next().unwrap_or(stem);

    let Some(overlay) = Overlay::load_for_engine(overlays_dir, engine)? else {
        return Ok(false);
    };

    let mut document = dom::parse(bytes).map_err(|reason| UpkeepError::XmlParseFailed {
        path: file.to_string(),
        reason,
    })?;
    overlay.apply(&mut document);

    let contents = overlay::serialize_with_header(&document, file)?;
    write_text(destination, &contents)?;
    Ok(true)
}
