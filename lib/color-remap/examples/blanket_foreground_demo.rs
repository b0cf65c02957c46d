use color_remap::{Color, RemapOptions, SaveOptions, modify_image_colors};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let options = RemapOptions::new()
        .with_target_bg_color(Some(Color::WHITE))
        .with_new_fg_color(Some(Color::new(0, 255, 0)))
        .with_change_all_fg(true)
        .with_tolerance(40.0);

    let report = modify_image_colors(
        "data/icon.png",
        output_dir.join("icon_green.png"),
        &options,
        &SaveOptions::new(),
    )?;

    println!("✓ Foreground recolored: {report}");
    println!("  Output:   tmp/icon_green.png");

    Ok(())
}
