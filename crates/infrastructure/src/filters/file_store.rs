use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use ferrous_filters_application::ports::FilterStore;
use ferrous_filters_domain::{DomainError, FilterRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace};

/// Distinguishes temp files of overlapping saves of the same filter.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filter content cached as `<dir>/<id>.txt`.
pub struct FileFilterStore {
    dir: PathBuf,
}

impl FileFilterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))
    }

    fn temp_path(&self, filter: &FilterRecord) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}.txt.{}.{}.tmp", filter.id, std::process::id(), seq))
    }

    async fn write_temp(&self, tmp: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl FilterStore for FileFilterStore {
    fn path(&self, filter: &FilterRecord) -> PathBuf {
        self.dir.join(format!("{}.txt", filter.id))
    }

    async fn save(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        let path = self.path(filter);
        let data = filter.content.clone().unwrap_or_default();
        info!(filter_id = filter.id, path = %path.display(), "Saving filter contents");

        self.ensure_dir().await?;

        // Readers only ever see the old file or the complete new one.
        let tmp = self.temp_path(filter);
        let written = match self.write_temp(&tmp, &data).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(&path, e));
        }

        filter.last_updated = self.last_modified(filter).await;
        Ok(())
    }

    async fn load(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        let path = self.path(filter);
        trace!(filter_id = filter.id, path = %path.display(), "Loading filter contents");

        let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::FilterFileNotFound(path.display().to_string()),
            _ => io_error(&path, e),
        })?;

        trace!(filter_id = filter.id, len = data.len(), "Filter file read");
        filter.set_content(Bytes::from(data));
        filter.last_updated = self.last_modified(filter).await;
        Ok(())
    }

    async fn last_modified(&self, filter: &FilterRecord) -> Option<DateTime<Utc>> {
        let metadata = tokio::fs::metadata(self.path(filter)).await.ok()?;
        metadata.modified().ok().map(DateTime::<Utc>::from)
    }

    async fn touch(&self, filter: &mut FilterRecord) -> Result<(), DomainError> {
        let path = self.path(filter);
        let now = SystemTime::now();

        let target = path.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::OpenOptions::new()
                .write(true)
                .open(&target)?
                .set_modified(now)
        })
        .await
        .map_err(|e| DomainError::IoError(e.to_string()))?
        .map_err(|e| io_error(&path, e))?;

        filter.last_updated = Some(DateTime::<Utc>::from(now));
        Ok(())
    }

    async fn remove(&self, filter: &FilterRecord) -> Result<(), DomainError> {
        let path = self.path(filter);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(filter_id = filter.id, path = %path.display(), "Filter file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::IoError(format!("{}: {}", path.display(), e))
}
