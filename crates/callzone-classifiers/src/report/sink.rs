use std::path::{Path, PathBuf};

use plotly::Plot;

use crate::error::Result;

/// Destination for the per-player pitch plots.
pub trait PlotSink {
    fn emit(&mut self, player_name: &str, plot: Plot) -> Result<()>;
}

/// Opens each figure in the default browser.
#[derive(Debug, Default)]
pub struct BrowserSink;

impl PlotSink for BrowserSink {
    fn emit(&mut self, player_name: &str, plot: Plot) -> Result<()> {
        log::info!("Opening pitch plot for {}", player_name);
        plot.show();
        Ok(())
    }
}

/// Writes `<dir>/<player-slug>.html` for each figure.
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl HtmlFileSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for HtmlFileSink {
    fn emit(&mut self, player_name: &str, plot: Plot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.html", slugify(player_name)));
        std::fs::write(&path, plot.to_html())?;
        log::info!("Wrote pitch plot for {} to {}", player_name, path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Discards plots.
#[derive(Debug, Default)]
pub struct NullSink;

impl PlotSink for NullSink {
    fn emit(&mut self, _player_name: &str, _plot: Plot) -> Result<()> {
        Ok(())
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes: "Judge, Aaron" -> "judge-aaron".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("player");
    }
    slug
}
