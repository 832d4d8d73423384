use crate::{PhotoCommand, PhotoUpdate};
use photo_sheet::{SheetJob, ShareTarget, Ticket, deliver, load_image, render_crop_async};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Async worker task that processes photo commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PhotoCommand>,
    update_tx: mpsc::UnboundedSender<PhotoUpdate>,
    share: Arc<dyn ShareTarget>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, share.as_ref(), &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: PhotoCommand,
    share: &dyn ShareTarget,
    command_rx: &mut mpsc::UnboundedReceiver<PhotoCommand>,
    update_tx: &mpsc::UnboundedSender<PhotoUpdate>,
) {
    match cmd {
        PhotoCommand::LoadImage { ticket, path } => {
            let update = match load_image(&path).await {
                Ok(image) => PhotoUpdate::ImageLoaded {
                    ticket,
                    image: Arc::new(image),
                },
                Err(e) => error_update(
                    Some(ticket),
                    format!("Failed to load {}: {}", path.display(), e),
                ),
            };
            let _ = update_tx.send(update);
        }
        PhotoCommand::RenderCrop { job } => {
            let ticket = job.ticket;
            let update = match render_crop_async(job).await {
                Ok(result) => PhotoUpdate::CropRendered {
                    ticket,
                    result: Arc::new(result),
                },
                Err(e) => error_update(Some(ticket), format!("Failed to crop photo: {}", e)),
            };
            let _ = update_tx.send(update);
        }
        PhotoCommand::RenderSheet { mut job } => {
            // Drain any queued sheet renders, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let PhotoCommand::RenderSheet { job: new_job } = next_cmd {
                    log::debug!("Discarding queued sheet render, using newer request");
                    job = new_job;
                } else {
                    // Can't put it back, so handle it before the sheet
                    Box::pin(process_command(next_cmd, share, command_rx, update_tx)).await;
                }
            }

            handle_render_sheet(job, update_tx).await;
        }
        PhotoCommand::Save {
            bytes,
            filename,
            dir,
        } => {
            let update = match deliver(&bytes, &filename, share, &dir).await {
                Ok(delivery) => PhotoUpdate::Saved { filename, delivery },
                Err(e) => error_update(None, format!("Failed to save {}: {}", filename, e)),
            };
            let _ = update_tx.send(update);
        }
    }
}

async fn handle_render_sheet(job: SheetJob, update_tx: &mpsc::UnboundedSender<PhotoUpdate>) {
    let ticket = job.ticket;
    let config = ticket.config;
    let update = match job.run_async().await {
        Ok(sheet) => {
            log::info!(
                "Rendered {} sheet with {} photos",
                config.preset.name(),
                sheet.photos_count()
            );
            PhotoUpdate::SheetRendered {
                ticket,
                sheet: Arc::new(sheet),
            }
        }
        Err(e) => error_update(None, format!("Failed to render sheet: {}", e)),
    };
    let _ = update_tx.send(update);
}

fn error_update(ticket: Option<Ticket>, message: String) -> PhotoUpdate {
    log::error!("{}", message);
    PhotoUpdate::Error { ticket, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use photo_sheet::{
        CropJob, CropTarget, CroppedResult, Delivery, ImageSource, NoShare, PaperPreset,
        SheetConfig, SheetTicket, Size, ViewTransform,
    };

    fn spawn_worker() -> (
        mpsc::UnboundedSender<PhotoCommand>,
        mpsc::UnboundedReceiver<PhotoUpdate>,
        tokio::task::JoinHandle<()>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(worker_task(command_rx, update_tx, Arc::new(NoShare)));
        (command_tx, update_rx, handle)
    }

    fn tile() -> Arc<CroppedResult> {
        Arc::new(CroppedResult {
            image: RgbImage::from_pixel(413, 531, Rgb([90, 90, 90])),
            jpeg: Vec::new(),
            target: CropTarget::default(),
        })
    }

    fn ticket(job: u64) -> Ticket {
        Ticket { generation: 1, job }
    }

    fn sheet_job(crop_revision: u64, preset: PaperPreset) -> SheetJob {
        SheetJob {
            ticket: SheetTicket {
                generation: 1,
                crop_revision,
                config: SheetConfig::from_preset(preset),
            },
            crop: tile(),
        }
    }

    #[tokio::test]
    async fn test_queued_sheet_renders_are_coalesced() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();

        let presets = [PaperPreset::A4, PaperPreset::A6, PaperPreset::Photo10x15];
        for (revision, preset) in (1..).zip(presets) {
            command_tx
                .send(PhotoCommand::RenderSheet {
                    job: sheet_job(revision, preset),
                })
                .unwrap();
        }
        drop(command_tx);

        worker_task(command_rx, update_tx, Arc::new(NoShare)).await;

        let mut updates = Vec::new();
        while let Some(update) = update_rx.recv().await {
            updates.push(update);
        }

        assert_eq!(updates.len(), 1);
        match &updates[0] {
            PhotoUpdate::SheetRendered { ticket: t, sheet } => {
                assert_eq!(*t, sheet_job(3, PaperPreset::Photo10x15).ticket);
                assert_eq!(sheet.config.preset, PaperPreset::Photo10x15);
                assert_eq!(sheet.photos_count(), 6);
            }
            other => panic!("Expected SheetRendered, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_commands_survive_coalescing() {
        let dir = tempfile::tempdir().unwrap();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();

        command_tx
            .send(PhotoCommand::RenderSheet {
                job: sheet_job(1, PaperPreset::A4),
            })
            .unwrap();
        command_tx
            .send(PhotoCommand::Save {
                bytes: Arc::new(b"jpeg".to_vec()),
                filename: "photo-35x45.jpg".to_string(),
                dir: dir.path().to_path_buf(),
            })
            .unwrap();
        drop(command_tx);

        worker_task(command_rx, update_tx, Arc::new(NoShare)).await;

        let saved = update_rx.recv().await.unwrap();
        assert!(matches!(
            saved,
            PhotoUpdate::Saved { delivery: Delivery::Saved(_), .. }
        ));
        let sheet = update_rx.recv().await.unwrap();
        assert!(matches!(
            sheet,
            PhotoUpdate::SheetRendered { ticket: t, .. } if t.crop_revision == 1
        ));
        assert!(dir.path().join("photo-35x45.jpg").exists());
    }

    #[tokio::test]
    async fn test_render_crop_echoes_ticket() {
        let (command_tx, mut update_rx, handle) = spawn_worker();

        let job = CropJob {
            ticket: ticket(7),
            source: Arc::new(ImageSource::new(RgbImage::from_pixel(
                800,
                600,
                Rgb([10, 20, 30]),
            ))),
            target: CropTarget::default(),
            view: ViewTransform::default(),
            preview: Size::new(210.0, 270.0),
        };
        command_tx.send(PhotoCommand::RenderCrop { job }).unwrap();

        match update_rx.recv().await.unwrap() {
            PhotoUpdate::CropRendered { ticket: t, result } => {
                assert_eq!(t, ticket(7));
                assert_eq!(result.image.dimensions(), (413, 531));
            }
            other => panic!("Expected CropRendered, got {:?}", other),
        }

        drop(command_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file_reports_error_with_ticket() {
        let (command_tx, mut update_rx, handle) = spawn_worker();

        command_tx
            .send(PhotoCommand::LoadImage {
                ticket: ticket(2),
                path: "/definitely/not/here.jpg".into(),
            })
            .unwrap();

        match update_rx.recv().await.unwrap() {
            PhotoUpdate::Error { ticket: t, message } => {
                assert_eq!(t, Some(ticket(2)));
                assert!(message.contains("here.jpg"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }

        drop(command_tx);
        handle.await.unwrap();
    }
}
