use platform_detector::model_manager::sha256_hex;
use platform_detector::{
    Classifier, DetectorConfig, DetectorState, ModelError, ModelManager, ModelSource,
    PlatformDetector,
};
use std::fs;

const MODEL_JSON: &str = r#"{
    "vocab": {"free": 0, "win": 1, "meeting": 2},
    "classes": ["spam", "ham"],
    "class_log_prior": [-0.4, -1.2],
    "feature_log_prob": [[-0.5, -0.6, -3.0], [-2.0, -2.5, -0.3]]
}"#;

#[test]
fn test_model_file_with_checksum() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("spam.json");
    fs::write(&path, MODEL_JSON)?;
    let hash = sha256_hex(MODEL_JSON.as_bytes());

    assert!(ModelManager::verify_file(&path, &hash)?);
    assert!(ModelManager::verify_file(&path, &hash.to_uppercase())?);

    let classifier = Classifier::builder()
        .with_model_file(&path, Some(hash.as_str()))?
        .build()?;
    assert_eq!(classifier.predict("free win free")?, "spam");
    assert!(classifier.info().model_source.starts_with("file:"));
    Ok(())
}

#[test]
fn test_model_file_hash_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("spam.json");
    fs::write(&path, MODEL_JSON)?;

    let detector = PlatformDetector::new(DetectorConfig::new(ModelSource::File {
        path: path.clone(),
        sha256: Some("00".repeat(32)),
    }));
    assert!(matches!(detector.load(), Err(ModelError::HashMismatch { .. })));
    assert_eq!(detector.state(), DetectorState::Failed);
    assert!(!ModelManager::verify_file(&path, &"00".repeat(32))?);
    Ok(())
}

#[test]
fn test_installed_model() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path().join("models"));
    assert!(!manager.is_model_installed("spam"));

    let path = manager.get_model_path("spam");
    manager.ensure_model_dir("spam")?;
    fs::write(&path, MODEL_JSON)?;
    assert!(manager.is_model_installed("spam"));

    let classifier = Classifier::builder()
        .with_installed_model(&manager, "spam")?
        .build()?;
    assert_eq!(classifier.predict("meeting meeting")?, "ham");
    assert_eq!(classifier.info().model_source, "installed:spam");
    Ok(())
}

#[test]
fn test_missing_installed_model() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path().join("models"));
    let result = Classifier::builder().with_installed_model(&manager, "nope");
    assert!(matches!(result, Err(ModelError::NotInstalled(_))));
    assert!(!manager.models_dir().exists());
    Ok(())
}

#[test]
fn test_failed_installed_load_leaves_disk_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    std::env::set_var("PLATFORM_DETECTOR_HOME", home.path());

    let detector = PlatformDetector::new(DetectorConfig::new(ModelSource::Installed("nope".into())));
    let result = detector.load();
    std::env::remove_var("PLATFORM_DETECTOR_HOME");

    assert!(matches!(result, Err(ModelError::NotInstalled(_))));
    assert_eq!(detector.state(), DetectorState::Failed);
    assert!(!home.path().join("models").exists());
    assert_eq!(fs::read_dir(home.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_async_file_load() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("spam.json");
    tokio::fs::write(&path, MODEL_JSON).await?;

    let detector = PlatformDetector::new(DetectorConfig::new(ModelSource::File {
        path,
        sha256: Some(sha256_hex(MODEL_JSON.as_bytes())),
    }));
    detector.load_async().await?;
    assert_eq!(detector.predict("FREE! Win!")?, "spam");
    Ok(())
}
