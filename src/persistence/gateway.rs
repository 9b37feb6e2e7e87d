//! Listing persistence backends

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::listing::ListingForm;

/// Writes listing snapshots to a backend. Calls may fail; callers decide
/// whether to retry.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn save(&self, form: &ListingForm) -> Result<()>;

    async fn load(&self, id: Uuid) -> Result<Option<ListingForm>>;
}

/// Stores each listing as `<state>/listings/<id>.json`
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    root: PathBuf,
}

impl JsonFileGateway {
    pub fn new(state_path: &Path) -> Self {
        Self {
            root: state_path.join("listings"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn listing_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileGateway {
    async fn save(&self, form: &ListingForm) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("Failed to create listings directory")?;

        let contents =
            serde_json::to_string_pretty(form).context("Failed to serialize listing")?;

        // Write to a sibling file first so readers never see a partial record
        let path = self.listing_path(form.id);
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Failed to move listing into {}", path.display()))?;

        tracing::debug!(listing = %form.id, path = %path.display(), "listing saved");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<ListingForm>> {
        let path = self.listing_path(id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let form = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse listing {}", path.display()))?;
        Ok(Some(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{ListingPatch, Location};
    use crate::wizard::Classification;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = JsonFileGateway::new(temp_dir.path());

        let mut form = ListingForm::new(Classification::LandParcel);
        form.apply(ListingPatch {
            form_position: Some(4),
            location: Some(Location {
                city: Some("Alicante".to_string()),
                ..Location::default()
            }),
            ..ListingPatch::default()
        });

        gateway.save(&form).await.unwrap();
        assert!(gateway.listing_path(form.id).exists());

        let loaded = gateway.load(form.id).await.unwrap().unwrap();
        assert_eq!(loaded, form);
    }

    #[tokio::test]
    async fn test_load_missing_listing() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = JsonFileGateway::new(temp_dir.path());

        assert!(gateway.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_listing_fails() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = JsonFileGateway::new(temp_dir.path());
        let id = Uuid::new_v4();

        std::fs::create_dir_all(gateway.root()).unwrap();
        std::fs::write(gateway.listing_path(id), "{ not json").unwrap();

        assert!(gateway.load(id).await.is_err());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = JsonFileGateway::new(temp_dir.path());

        let mut form = ListingForm::new(Classification::Standard);
        gateway.save(&form).await.unwrap();

        form.apply(ListingPatch::form_position(7));
        gateway.save(&form).await.unwrap();

        let loaded = gateway.load(form.id).await.unwrap().unwrap();
        assert_eq!(loaded.form_position, 7);
        assert!(!gateway.listing_path(form.id).with_extension("json.tmp").exists());
    }
}
