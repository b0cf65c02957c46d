use image::{Rgba, RgbaImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("data")?;

    // Black ring on a white background
    let icon = RgbaImage::from_fn(128, 128, |x, y| {
        let dx = x as f32 - 64.0;
        let dy = y as f32 - 64.0;
        let r = (dx * dx + dy * dy).sqrt();
        if (30.0..44.0).contains(&r) {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    icon.save("data/icon.png")?;

    // Same ring over a light vertical gradient
    let gradient = RgbaImage::from_fn(128, 128, |x, y| {
        let dx = x as f32 - 64.0;
        let dy = y as f32 - 64.0;
        let r = (dx * dx + dy * dy).sqrt();
        if (30.0..44.0).contains(&r) {
            Rgba([0, 0, 0, 255])
        } else {
            let v = 140 + (y * 115 / 127) as u8;
            Rgba([v, v, 255, 255])
        }
    });
    gradient.save("data/gradient_icon.png")?;

    println!("Created data/icon.png and data/gradient_icon.png");
    Ok(())
}
