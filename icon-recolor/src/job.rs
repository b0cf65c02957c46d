//! TOML batch files
//!
//! ```toml
//! [defaults]
//! tolerance = 60
//! new_bg_color = "#ffffff"
//!
//! [[job]]
//! input = "images/5.jpg"
//! output = "outputs/output5.png"
//! target_bg_color = [0, 0, 0]
//! transparent_bg = true
//! ```
//!
//! A job inherits every setting it leaves out from `[defaults]`.
//! `transparent_bg = true` drops an inherited `new_bg_color`. Keys that are
//! not remap settings are rejected.

use crate::task::Task;
use anyhow::{Context, Result};
use color_remap::{Color, ColorInput, RemapOptions, SaveOptions};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// A color as written in a jobs file: a string or a list of numbers.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorValue {
    Text(String),
    Components(Vec<i64>),
}

impl From<&ColorValue> for ColorInput {
    fn from(value: &ColorValue) -> Self {
        match value {
            ColorValue::Text(text) => ColorInput::Text(text.clone()),
            ColorValue::Components(components) => ColorInput::Components(components.clone()),
        }
    }
}

/// Remap settings shared by `[defaults]` and each `[[job]]`. Unset fields
/// fall back to `[defaults]`, then to the library defaults.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct JobSettings {
    pub target_bg_color: Option<ColorValue>,
    pub new_bg_color: Option<ColorValue>,
    pub target_fg_color: Option<ColorValue>,
    pub new_fg_color: Option<ColorValue>,
    pub change_all_fg: Option<bool>,
    pub invert_mask: Option<bool>,
    pub tolerance: Option<f64>,
    pub no_bg: Option<bool>,
    pub transparent_bg: Option<bool>,
    pub flatten_background: Option<ColorValue>,
}

impl JobSettings {
    pub fn or(&self, fallback: &JobSettings) -> JobSettings {
        JobSettings {
            target_bg_color: self.target_bg_color.clone().or_else(|| fallback.target_bg_color.clone()),
            new_bg_color: if self.transparent_bg == Some(true) {
                self.new_bg_color.clone()
            } else {
                self.new_bg_color.clone().or_else(|| fallback.new_bg_color.clone())
            },
            target_fg_color: self.target_fg_color.clone().or_else(|| fallback.target_fg_color.clone()),
            new_fg_color: self.new_fg_color.clone().or_else(|| fallback.new_fg_color.clone()),
            change_all_fg: self.change_all_fg.or(fallback.change_all_fg),
            invert_mask: self.invert_mask.or(fallback.invert_mask),
            tolerance: self.tolerance.or(fallback.tolerance),
            no_bg: self.no_bg.or(fallback.no_bg),
            transparent_bg: self.transparent_bg,
            flatten_background: self
                .flatten_background
                .clone()
                .or_else(|| fallback.flatten_background.clone()),
        }
    }

    pub fn to_options(&self) -> color_remap::Result<(RemapOptions, SaveOptions)> {
        let parse = |value: &Option<ColorValue>| Color::parse(value.as_ref().map(ColorInput::from).as_ref());
        let defaults = RemapOptions::new();

        let target_bg_color = if self.no_bg.unwrap_or(false) {
            None
        } else {
            parse(&self.target_bg_color)?.or(defaults.target_bg_color)
        };

        let new_bg_color = parse(&self.new_bg_color)?;
        if self.transparent_bg == Some(true) && new_bg_color.is_some() {
            return Err(color_remap::Error::InvalidParameter(
                "transparent_bg conflicts with new_bg_color".to_string(),
            ));
        }

        let options = RemapOptions::new()
            .with_target_bg_color(target_bg_color)
            .with_new_bg_color(new_bg_color)
            .with_target_fg_color(parse(&self.target_fg_color)?)
            .with_new_fg_color(parse(&self.new_fg_color)?)
            .with_change_all_fg(self.change_all_fg.unwrap_or(defaults.change_all_fg))
            .with_invert_mask(self.invert_mask.unwrap_or(defaults.invert_mask))
            .with_tolerance(self.tolerance.unwrap_or(defaults.tolerance));

        let mut save_options = SaveOptions::new();
        if let Some(background) = parse(&self.flatten_background)? {
            save_options = save_options.with_flatten_background(background);
        }

        Ok((options, save_options))
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub save_mask: Option<PathBuf>,

    #[serde(flatten)]
    pub settings: JobSettings,

    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Defaults {
    #[serde(flatten)]
    pub settings: JobSettings,

    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct JobFile {
    pub defaults: Defaults,

    #[serde(rename = "job")]
    pub jobs: Vec<Job>,
}

impl JobFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read jobs file {} failed", path.display()))?;

        toml::from_str(&text).with_context(|| format!("parse jobs file {} failed", path.display()))
    }

    /// Resolve every job into a runnable task. Relative paths are taken
    /// relative to `base_dir`.
    pub fn tasks(&self, base_dir: &Path) -> Result<Vec<Task>> {
        reject_unknown(&self.defaults.unknown, "[defaults]")?;

        self.jobs
            .iter()
            .enumerate()
            .map(|(index, job)| {
                reject_unknown(&job.unknown, &format!("job #{}", index + 1))?;

                let settings = job.settings.or(&self.defaults.settings);
                let (options, save_options) = settings.to_options().with_context(|| {
                    format!("parse failed for job #{} ({})", index + 1, job.input.display())
                })?;

                Ok(Task {
                    input: base_dir.join(&job.input),
                    output: base_dir.join(&job.output),
                    options,
                    save_options,
                    save_mask: job.save_mask.as_ref().map(|mask| base_dir.join(mask)),
                })
            })
            .collect()
    }
}

fn reject_unknown(unknown: &BTreeMap<String, toml::Value>, scope: &str) -> Result<()> {
    if unknown.is_empty() {
        return Ok(());
    }

    let keys = unknown.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
    anyhow::bail!("unknown key(s) in {scope}: {keys}")
}

/// Run every job of `path` in order. Returns the number of failed jobs.
pub fn run_batch(path: &Path, keep_going: bool) -> Result<usize> {
    let file = JobFile::load(path)?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    let tasks = file.tasks(base_dir)?;

    log::info!("running {} job(s) from {}", tasks.len(), path.display());

    let mut failed = 0;
    for (index, task) in tasks.iter().enumerate() {
        match task.execute() {
            Ok(report) => log::info!("job #{}: {report}", index + 1),
            Err(e) if keep_going => {
                log::warn!("job #{}: {e:#}", index + 1);
                failed += 1;
            }
            Err(e) => return Err(e.context(format!("job #{}", index + 1))),
        }
    }

    Ok(failed)
}
