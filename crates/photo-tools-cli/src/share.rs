use photo_sheet::{PhotoError, ShareFuture, ShareTarget};
use std::path::PathBuf;

/// Shares a file by handing it to an external program.
///
/// The bytes are written to a temporary file and the program is run with
/// that path as its last argument. A non-zero exit counts as a failed share.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
    staging_dir: PathBuf,
}

impl CommandShare {
    /// Parse a command line such as `"kdeconnect-cli --share"`
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            staging_dir: std::env::temp_dir(),
        })
    }
}

impl ShareTarget for CommandShare {
    fn is_available(&self) -> bool {
        !self.program.is_empty()
    }

    fn share<'a>(&'a self, bytes: &'a [u8], filename: &'a str) -> ShareFuture<'a> {
        Box::pin(async move {
            let path = self.staging_dir.join(filename);
            tokio::fs::write(&path, bytes).await?;

            log::debug!("Running {} {:?} {}", self.program, self.args, path.display());
            let status = tokio::process::Command::new(&self.program)
                .args(&self.args)
                .arg(&path)
                .status()
                .await;

            let _ = tokio::fs::remove_file(&path).await;

            match status {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(PhotoError::Share(format!(
                    "{} exited with {}",
                    self.program, status
                ))),
                Err(e) => Err(PhotoError::Share(format!(
                    "could not run {}: {}",
                    self.program, e
                ))),
            }
        })
    }
}
