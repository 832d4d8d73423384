use photo_sheet::*;

#[test]
fn test_default_settings_are_valid() {
    let settings = SheetSettings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.crop, CropTarget::new(35.0, 45.0));
    assert_eq!(settings.sheet.preset, PaperPreset::A4);
}

#[test]
fn test_validation_non_positive_photo_size() {
    let mut settings = SheetSettings::default();
    settings.crop.width_mm = 0.0;

    match settings.validate() {
        Err(PhotoError::Config(msg)) => assert!(msg.contains("Photo width")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_validation_negative_margin() {
    let mut settings = SheetSettings::default();
    settings.sheet.margin_mm = -1.0;
    assert!(matches!(settings.validate(), Err(PhotoError::Config(_))));

    settings.sheet.margin_mm = 0.0;
    settings.sheet.gap_mm = 0.0;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_validation_preset_dimension_mismatch() {
    let mut settings = SheetSettings::default();
    settings.sheet.paper_width_mm = 200.0;

    match settings.validate() {
        Err(PhotoError::Config(msg)) => assert!(msg.contains("Custom")),
        other => panic!("Expected Config error, got {:?}", other),
    }

    settings.sheet.preset = PaperPreset::Custom;
    assert!(settings.validate().is_ok());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_settings_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = SheetSettings::default();
    settings.crop = CropTarget::new(50.0, 50.0);
    settings.sheet.apply_preset(PaperPreset::Photo10x15);
    settings.sheet.gap_mm = 3.0;

    settings.save(&path).await.unwrap();
    let loaded = SheetSettings::load(&path).await.unwrap();
    assert_eq!(loaded, settings);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_settings_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    tokio::fs::write(&path, r#"{ "crop": { "width_mm": 30.0, "height_mm": 40.0 } }"#)
        .await
        .unwrap();

    let loaded = SheetSettings::load(&path).await.unwrap();
    assert_eq!(loaded.crop, CropTarget::new(30.0, 40.0));
    assert_eq!(loaded.sheet, SheetConfig::default());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_invalid_settings_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    assert!(matches!(
        SheetSettings::load(&path).await,
        Err(PhotoError::Config(_))
    ));
}

#[test]
fn test_validation_rejects_oversized_paper_and_photo() {
    let mut settings = SheetSettings::default();
    settings.sheet.preset = PaperPreset::Custom;
    settings.sheet.paper_width_mm = 1e6;
    assert!(matches!(settings.validate(), Err(PhotoError::Config(_))));

    let mut settings = SheetSettings::default();
    settings.crop.height_mm = 1e7;
    assert!(matches!(settings.validate(), Err(PhotoError::Config(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_crop_section_keeps_default_height() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("width-only.json");
    tokio::fs::write(&path, r#"{ "crop": { "width_mm": 30 }, "sheet": { "gap_mm": 1 } }"#)
        .await
        .unwrap();

    let loaded = SheetSettings::load(&path).await.unwrap();
    assert_eq!(loaded.crop, CropTarget::new(30.0, 45.0));
    assert_eq!(loaded.sheet.preset, PaperPreset::A4);
    assert_eq!(loaded.sheet.margin_mm, 5.0);
    assert_eq!(loaded.sheet.gap_mm, 1.0);
}
