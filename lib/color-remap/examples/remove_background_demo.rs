use color_remap::{Color, RemapOptions, SaveOptions, modify_image_colors};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let options = RemapOptions::new()
        .with_target_bg_color(Some(Color::WHITE))
        .with_new_bg_color(None)
        .with_tolerance(40.0);

    let report = modify_image_colors(
        "data/icon.png",
        output_dir.join("icon_transparent.png"),
        &options,
        &SaveOptions::new(),
    )?;

    println!("✓ Background removed: {report}");
    println!("  Output:   tmp/icon_transparent.png");

    Ok(())
}
