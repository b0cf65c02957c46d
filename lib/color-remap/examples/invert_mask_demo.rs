use color_remap::{
    Color, ColorRemapper, RemapOptions, SaveOptions, load_rgba, save_mask, save_rgba,
};
use std::path::Path;

// Keep the dark ring and drop the gradient around it by matching the ring
// and inverting the mask.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let options = RemapOptions::new()
        .with_target_bg_color(Some(Color::BLACK))
        .with_invert_mask(true)
        .with_tolerance(60.0);

    let image = load_rgba("data/gradient_icon.png")?;
    let (output, mask) = ColorRemapper::new(&options)?.remap_with_mask(&image)?;

    save_rgba(&output, output_dir.join("gradient_icon_inverted.png"), &SaveOptions::new())?;
    if let Some(mask) = mask {
        save_mask(&mask, output_dir.join("gradient_icon_mask.png"))?;
    }

    println!("✓ Inverted mask applied successfully!");
    println!("  Output:   tmp/gradient_icon_inverted.png");
    println!("  Mask:     tmp/gradient_icon_mask.png");

    Ok(())
}
