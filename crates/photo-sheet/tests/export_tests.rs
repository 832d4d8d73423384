use photo_sheet::*;
use std::sync::Mutex;

/// Records shared files, optionally failing every attempt
#[derive(Default)]
struct RecordingShare {
    fail: bool,
    shared: Mutex<Vec<(String, usize)>>,
}

impl ShareTarget for RecordingShare {
    fn is_available(&self) -> bool {
        true
    }

    fn share<'a>(&'a self, bytes: &'a [u8], filename: &'a str) -> ShareFuture<'a> {
        Box::pin(async move {
            if self.fail {
                return Err(PhotoError::Share("user dismissed share sheet".to_string()));
            }
            self.shared
                .lock()
                .unwrap()
                .push((filename.to_string(), bytes.len()));
            Ok(())
        })
    }
}

#[tokio::test]
async fn test_share_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let share = RecordingShare::default();

    let delivery = deliver(b"jpeg", "photo-35x45.jpg", &share, dir.path())
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::Shared);
    assert_eq!(
        *share.shared.lock().unwrap(),
        vec![("photo-35x45.jpg".to_string(), 4)]
    );
    assert!(!dir.path().join("photo-35x45.jpg").exists());
}

#[tokio::test]
async fn test_failed_share_falls_back_to_download() {
    let dir = tempfile::tempdir().unwrap();
    let share = RecordingShare {
        fail: true,
        ..Default::default()
    };

    let delivery = deliver(b"sheet bytes", "print_sheet_A4.jpg", &share, dir.path())
        .await
        .unwrap();

    let expected = dir.path().join("print_sheet_A4.jpg");
    assert_eq!(delivery, Delivery::Saved(expected.clone()));
    assert_eq!(std::fs::read(expected).unwrap(), b"sheet bytes");
}

#[tokio::test]
async fn test_unavailable_share_downloads() {
    let dir = tempfile::tempdir().unwrap();

    let delivery = deliver(b"x", "photo-30x40.jpg", &NoShare, dir.path())
        .await
        .unwrap();

    assert!(matches!(delivery, Delivery::Saved(ref p) if p.ends_with("photo-30x40.jpg")));
}

#[tokio::test]
async fn test_download_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = deliver(b"x", "photo-35x45.jpg", &NoShare, &missing).await;
    assert!(matches!(result, Err(PhotoError::Io(_))));
}
