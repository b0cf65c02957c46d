use color_remap::{
    Color, ColorInput, Error, RemapOptions, ReplacementRule, SaveOptions, Stage,
    modify_image_colors,
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

const GREEN: Color = Color::new(0, 255, 0);

fn black_corner() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
    image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    image
}

#[test]
fn test_white_icon_background_removed() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("white.png");
    let output = dir.path().join("white-out.png");
    RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255])).save(&input)?;

    let options = RemapOptions::new()
        .with_target_bg_color(Some(Color::WHITE))
        .with_tolerance(40.0);
    let report = modify_image_colors(&input, &output, &options, &SaveOptions::new())?;

    assert_eq!(report.matched, 100);
    assert_eq!(report.made_transparent, 100);

    let saved = image::open(&output)?.to_rgba8();
    assert_eq!(saved.dimensions(), (10, 10));
    assert!(saved.pixels().all(|p| *p == Rgba([255, 255, 255, 0])));
    Ok(())
}

#[test]
fn test_background_rule_wins_over_foreground_pair() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("corner.png");
    let output = dir.path().join("corner-out.png");
    black_corner().save(&input)?;

    let options = RemapOptions::new()
        .with_target_fg_color(Some(Color::BLACK))
        .with_new_fg_color(Some(GREEN))
        .with_tolerance(10.0);
    let report = modify_image_colors(&input, &output, &options, &SaveOptions::new())?;
    assert!(matches!(report.rule, ReplacementRule::BackgroundOnly { .. }));

    let saved = image::open(&output)?.to_rgba8();
    assert_eq!(*saved.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(saved.pixels().filter(|p| p[3] == 0).count(), 3);
    Ok(())
}

#[test]
fn test_blanket_foreground_from_jpeg_source() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("icon.jpg");
    let output = dir.path().join("icon.png");

    // Solid blocks survive JPEG compression close enough for tolerance 40.
    let source = RgbImage::from_fn(16, 16, |x, _| {
        if x < 8 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
    });
    source.save(&input)?;

    let options = RemapOptions::new()
        .with_new_fg_color(Some(GREEN))
        .with_change_all_fg(true)
        .with_tolerance(40.0);
    modify_image_colors(&input, &output, &options, &SaveOptions::new())?;

    let saved = image::open(&output)?.to_rgba8();
    assert_eq!(*saved.get_pixel(2, 8), Rgba([0, 255, 0, 255]));
    assert_eq!(saved.get_pixel(13, 8)[3], 0);
    Ok(())
}

#[test]
fn test_missing_input_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("never.png");

    let err = modify_image_colors(
        dir.path().join("missing.png"),
        &output,
        &RemapOptions::new(),
        &SaveOptions::new(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::FileNotFound(_)));
    assert_eq!(err.stage(), Stage::Load);
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_save_failure_reports_stage() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("corner.png");
    black_corner().save(&input)?;

    let err = modify_image_colors(
        &input,
        dir.path().join("no-such-dir").join("out.png"),
        &RemapOptions::new(),
        &SaveOptions::new(),
    )
    .unwrap_err();

    assert_eq!(err.stage(), Stage::Save);
    assert!(err.to_string().contains("no-such-dir"));

    // The cause is reported once, through the source chain.
    let cause = std::error::Error::source(&err).map(|e| e.to_string()).unwrap_or_default();
    assert!(cause.contains("output directory does not exist"));
    assert!(!err.to_string().contains(&cause));
    Ok(())
}

#[test]
fn test_parsed_colors_drive_the_pipeline() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("corner.png");
    let output = dir.path().join("corner.jpg");
    let mut source = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]));
    source.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    source.save(&input)?;

    let target = Color::parse(Some(&ColorInput::from("#fff")))?;
    let replacement = Color::parse(Some(&ColorInput::from(vec![255, 0, 0, 255])))?;
    let options = RemapOptions::new()
        .with_target_bg_color(target)
        .with_new_bg_color(replacement)
        .with_tolerance(10.0);

    modify_image_colors(&input, &output, &options, &SaveOptions::new())?;

    let saved = image::open(&output)?.to_rgb8();
    assert_eq!(saved.dimensions(), (16, 16));
    let right = saved.get_pixel(12, 12);
    assert!(right[0] > 150 && right[1] < 100 && right[2] < 100, "{right:?}");
    Ok(())
}

#[test]
fn test_bad_color_is_a_parse_error() {
    let err = Color::parse(Some(&ColorInput::from("#12"))).unwrap_err();
    assert!(matches!(err, Error::InvalidColorFormat(_)));
    assert_eq!(err.stage(), Stage::Parse);
}
