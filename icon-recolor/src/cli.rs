use crate::task::Task;
use clap::{Args, Parser, Subcommand};
use color_remap::{Color, RemapOptions, SaveOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "icon-recolor", version, about = "Recolor icons and strip their backgrounds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remap the colors of one image
    Run(RunArgs),

    /// Run every [[job]] listed in a TOML file
    Batch {
        /// Jobs file. Relative paths inside it resolve against its directory.
        jobs: PathBuf,

        /// Continue with the next job when one fails
        #[arg(long)]
        keep_going: bool,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    pub input: PathBuf,
    pub output: PathBuf,

    /// Background color to match (hex, "r,g,b" or a color name)
    #[arg(long, default_value = "#ffffff")]
    pub bg: Color,

    /// Do not match a background color
    #[arg(long)]
    pub no_bg: bool,

    /// Background replacement color. Omit to make the background transparent.
    #[arg(long)]
    pub new_bg: Option<Color>,

    /// Foreground color to match, only used together with --no-bg
    #[arg(long)]
    pub fg: Option<Color>,

    /// Foreground replacement color
    #[arg(long)]
    pub new_fg: Option<Color>,

    /// Recolor every non-background pixel with --new-fg
    #[arg(long)]
    pub change_all_fg: bool,

    #[arg(long)]
    pub invert_mask: bool,

    /// Euclidean RGB distance below which a pixel matches
    #[arg(long, default_value_t = 40.0)]
    pub tolerance: f64,

    /// Background used when the output format has no alpha channel
    #[arg(long, default_value = "#ffffff")]
    pub flatten: Color,

    /// Also write the computed mask to this path
    #[arg(long)]
    pub save_mask: Option<PathBuf>,
}

impl RunArgs {
    pub fn into_task(self) -> Task {
        let target_bg_color = if self.no_bg { None } else { Some(self.bg) };

        let options = RemapOptions::new()
            .with_target_bg_color(target_bg_color)
            .with_new_bg_color(self.new_bg)
            .with_target_fg_color(self.fg)
            .with_new_fg_color(self.new_fg)
            .with_change_all_fg(self.change_all_fg)
            .with_invert_mask(self.invert_mask)
            .with_tolerance(self.tolerance);

        Task {
            input: self.input,
            output: self.output,
            options,
            save_options: SaveOptions::new().with_flatten_background(self.flatten),
            save_mask: self.save_mask,
        }
    }
}
