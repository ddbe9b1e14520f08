use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::config::Configuration;
use crate::loader::load_pixels;
use crate::processing::luminosity::{Analysis, LuminosityAnalyzer};
use crate::processing::overlay::{background_css, debug_caption};

/// Outcome for one input image. Exactly one of `analysis` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageReport {
    fn succeeded(path: PathBuf, analysis: Analysis, cfg: &Configuration) -> Self {
        let background = background_css(
            &path.to_string_lossy(),
            cfg.overlay_color,
            analysis.overlay_opacity,
        );
        let caption = cfg.debug_caption.then(|| debug_caption(&analysis));
        Self {
            path,
            analysis: Some(analysis),
            background: Some(background),
            caption,
            error: None,
        }
    }

    fn failed(path: PathBuf, err: &anyhow::Error) -> Self {
        Self {
            path,
            analysis: None,
            background: None,
            caption: None,
            error: Some(format!("{err:#}")),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.analysis.is_some()
    }
}

fn analyze_file(path: &Path, analyzer: LuminosityAnalyzer, apply_exif: bool) -> Result<Analysis> {
    let pixels = load_pixels(path, apply_exif)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(analyzer.analyze(pixels.as_slice())?)
}

/// Decode and analyze `paths` on blocking workers, at most
/// `cfg.max_concurrent_decodes` at a time.
///
/// Per-image failures are reported, not propagated. Reports come back in
/// input order.
#[instrument(skip_all, fields(images = paths.len()))]
pub async fn run(paths: Vec<PathBuf>, cfg: &Configuration) -> Vec<ImageReport> {
    let analyzer = cfg.analyzer();
    let apply_exif = cfg.apply_exif_orientation;
    let max_in_flight = cfg.max_concurrent_decodes.max(1);

    let mut pending = paths.iter().cloned().enumerate();
    let mut tasks: JoinSet<(usize, PathBuf, Result<Analysis>)> = JoinSet::new();
    let mut done: Vec<(usize, ImageReport)> = Vec::new();

    loop {
        while tasks.len() < max_in_flight {
            let Some((idx, path)) = pending.next() else {
                break;
            };
            tasks.spawn(async move {
                let p = path.clone();
                let res = tokio::task::spawn_blocking(move || analyze_file(&p, analyzer, apply_exif))
                    .await
                    .context("analysis worker panicked")
                    .and_then(|r| r);
                (idx, path, res)
            });
        }

        let Some(join_res) = tasks.join_next().await else {
            break;
        };
        match join_res {
            Ok((idx, path, Ok(analysis))) => {
                debug!(
                    path = %path.display(),
                    luminosity = analysis.luminosity,
                    opacity = analysis.overlay_opacity,
                    "analyzed"
                );
                done.push((idx, ImageReport::succeeded(path, analysis, cfg)));
            }
            Ok((idx, path, Err(err))) => {
                warn!(path = %path.display(), "analysis failed: {err:#}");
                done.push((idx, ImageReport::failed(path, &err)));
            }
            // the image is given a failed report by `in_input_order`
            Err(err) => warn!("analysis task aborted: {err}"),
        }
    }

    let reports = in_input_order(done, &paths);
    info!(
        analyzed = reports.iter().filter(|r| r.is_ok()).count(),
        failed = reports.iter().filter(|r| !r.is_ok()).count(),
        "batch complete"
    );
    reports
}

/// One report per input, in input order. Inputs whose task never reported
/// back get a failed report so no image goes missing.
fn in_input_order(mut done: Vec<(usize, ImageReport)>, paths: &[PathBuf]) -> Vec<ImageReport> {
    done.sort_by_key(|(idx, _)| *idx);
    let mut done = done.into_iter().peekable();
    let mut reports = Vec::with_capacity(paths.len());
    for (idx, path) in paths.iter().enumerate() {
        match done.next_if(|(i, _)| *i == idx) {
            Some((_, report)) => reports.push(report),
            None => reports.push(ImageReport::failed(
                path.clone(),
                &anyhow::anyhow!("analysis task aborted"),
            )),
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, rgba: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(4, 3, Rgba(rgba)).save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn reports_follow_input_order_and_isolate_failures() {
        let dir = tempfile::tempdir().unwrap();
        let white = write_png(dir.path(), "white.png", [255, 255, 255, 255]);
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"nope").unwrap();
        let black = write_png(dir.path(), "black.png", [0, 0, 0, 128]);

        let cfg = Configuration {
            max_concurrent_decodes: 1,
            ..Configuration::default()
        };
        let reports = run(vec![white.clone(), broken.clone(), black.clone()], &cfg).await;

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].path, white);
        assert_eq!(reports[0].analysis.unwrap().luminosity, 1.0);
        assert_eq!(reports[1].path, broken);
        assert!(reports[1].error.is_some());
        assert_eq!(reports[2].analysis.unwrap().luminosity, 0.0);
    }

    #[test]
    fn aborted_task_still_gets_a_report() {
        let paths = vec![
            PathBuf::from("a.png"),
            PathBuf::from("b.png"),
            PathBuf::from("c.png"),
        ];
        let analysis = LuminosityAnalyzer::default()
            .analyze(&[0, 0, 0, 255])
            .unwrap();
        let cfg = Configuration::default();
        // b.png never reported back; c.png finished before a.png
        let done = vec![
            (2, ImageReport::succeeded(paths[2].clone(), analysis, &cfg)),
            (0, ImageReport::succeeded(paths[0].clone(), analysis, &cfg)),
        ];

        let reports = in_input_order(done, &paths);
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_ok());
        assert_eq!(reports[1].path, PathBuf::from("b.png"));
        assert!(!reports[1].is_ok());
        assert_eq!(reports[1].error.as_deref(), Some("analysis task aborted"));
        assert!(reports[2].is_ok());
    }

    #[tokio::test]
    async fn caption_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_png(dir.path(), "grey.png", [128, 128, 128, 255]);

        let quiet = run(vec![img.clone()], &Configuration::default()).await;
        assert!(quiet[0].caption.is_none());
        assert!(quiet[0].background.as_deref().unwrap().starts_with("linear-gradient("));

        let cfg = Configuration {
            debug_caption: true,
            ..Configuration::default()
        };
        let loud = run(vec![img], &cfg).await;
        assert_eq!(
            loud[0].caption.as_deref(),
            Some("Image lum : 50% | Overlay opacity: 27%")
        );
    }
}
