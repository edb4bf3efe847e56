//! # Tasks - Category Image Reconciliation
//!
//! Aligns the denormalised `image` column of categories with a list of
//! known-good asset paths.
//!
//! Each mapping is applied on its own: a failing mapping is recorded in the
//! [ReconcileReport] and the task moves on to the next one. The batch is not
//! wrapped in a transaction, so an interrupted run keeps the updates applied
//! so far. Re-running with the same mappings converges on the same state.
use std::{
    collections::HashSet,
    fmt::Display,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::TaskTrait;
use crate::{DatabaseGateway, ErrorKind, StorefrontError};

/// Known-good image path for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryImageMapping {
    /// Category identifier (must already exist)
    #[serde(alias = "categoryId", alias = "id")]
    pub category_id: i32,
    /// Path of the stored asset
    #[serde(alias = "imagePath", alias = "img")]
    pub image_path: String,
}

impl CategoryImageMapping {
    /// Create a new mapping
    pub fn new(category_id: i32, image_path: impl Into<String>) -> Self {
        Self {
            category_id,
            image_path: image_path.into(),
        }
    }
}

/// Ordered list of mappings with at most one entry per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryImageMappings(Vec<CategoryImageMapping>);

impl CategoryImageMappings {
    /// Validate and wrap a list of mappings
    pub fn new(mappings: Vec<CategoryImageMapping>) -> Result<Self, StorefrontError> {
        let mut seen = HashSet::new();
        for mapping in mappings.iter() {
            if !seen.insert(mapping.category_id) {
                return Err(StorefrontError::InvalidData(format!(
                    "Duplicate mapping for category {}",
                    mapping.category_id
                )));
            }
            if mapping.image_path.trim().is_empty() {
                return Err(StorefrontError::InvalidData(format!(
                    "Empty image path for category {}",
                    mapping.category_id
                )));
            }
        }
        Ok(Self(mappings))
    }

    /// Load mappings from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorefrontError> {
        let path = path.as_ref();
        debug!("Loading category image mappings: {:?}", path);
        let data = std::fs::read_to_string(path)?;

        let mappings: Vec<CategoryImageMapping> = match path.extension() {
            Some(ext) if ext == "json" => serde_json::from_str(&data)?,
            _ => serde_yaml::from_str(&data)?,
        };
        Self::new(mappings)
    }

    /// Parse mappings from a YAML string
    pub fn from_yaml(data: &str) -> Result<Self, StorefrontError> {
        Self::new(serde_yaml::from_str(data)?)
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the list empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the mappings in order
    pub fn iter(&self) -> std::slice::Iter<'_, CategoryImageMapping> {
        self.0.iter()
    }
}

/// Outcome of applying one mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReconcileOutcome {
    /// The image path was written
    Updated,
    /// The stored image path already matched
    Unchanged,
    /// Dry-run, the category exists and would be updated
    Skipped,
    /// The mapping could not be applied
    Failed {
        /// Failure classification
        kind: ErrorKind,
        /// Error message
        error: String,
    },
}

impl ReconcileOutcome {
    /// Did the mapping apply (or would it in a dry-run)
    pub fn is_success(&self) -> bool {
        !matches!(self, ReconcileOutcome::Failed { .. })
    }
}

/// Report line for one mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileEntry {
    /// Category identifier
    pub category_id: i32,
    /// Target image path
    pub image_path: String,
    /// Outcome
    #[serde(flatten)]
    pub outcome: ReconcileOutcome,
}

impl Display for ReconcileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            ReconcileOutcome::Updated => write!(
                f,
                "Updated category {} image to {}",
                self.category_id, self.image_path
            ),
            ReconcileOutcome::Unchanged => write!(
                f,
                "Category {} image already {}",
                self.category_id, self.image_path
            ),
            ReconcileOutcome::Skipped => write!(
                f,
                "Would update category {} image to {}",
                self.category_id, self.image_path
            ),
            ReconcileOutcome::Failed { kind, error } => write!(
                f,
                "Failed to update category {} ({}): {}",
                self.category_id, kind, error
            ),
        }
    }
}

/// Final state of a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileState {
    /// Every mapping applied
    Completed,
    /// At least one mapping failed
    Failed,
}

/// Per-mapping report of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Entries in mapping order
    pub entries: Vec<ReconcileEntry>,
}

impl ReconcileReport {
    /// Number of successful entries
    pub fn successes(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_success())
            .count()
    }

    /// Number of failed entries
    pub fn failures(&self) -> usize {
        self.entries.len() - self.successes()
    }

    /// Failed entries
    pub fn failed(&self) -> impl Iterator<Item = &ReconcileEntry> {
        self.entries.iter().filter(|e| !e.outcome.is_success())
    }

    /// Did every mapping apply
    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    /// Final state of the run
    pub fn state(&self) -> ReconcileState {
        if self.is_success() {
            ReconcileState::Completed
        } else {
            ReconcileState::Failed
        }
    }
}

/// Category Image Reconciliation Task
#[derive(Debug, Clone, Default)]
pub struct ReconcileTask {
    mappings: CategoryImageMappings,
    dry_run: bool,
    assets: Option<PathBuf>,
}

#[async_trait]
impl TaskTrait for ReconcileTask {
    type Output = ReconcileReport;

    async fn run(
        &self,
        database: &dyn DatabaseGateway,
    ) -> Result<ReconcileReport, StorefrontError> {
        self.run_with(database, |entry| debug!("{}", entry)).await
    }
}

impl ReconcileTask {
    /// Create a task for the given mappings
    pub fn new(mappings: CategoryImageMappings) -> Self {
        Self {
            mappings,
            ..Default::default()
        }
    }

    /// Only check the mappings, do not write
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Require every image path to exist below this directory
    pub fn assets(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets = Some(root.into());
        self
    }

    /// Run the task, calling `progress` as soon as each mapping is done
    pub async fn run_with<F>(
        &self,
        database: &dyn DatabaseGateway,
        mut progress: F,
    ) -> Result<ReconcileReport, StorefrontError>
    where
        F: FnMut(&ReconcileEntry) + Send,
    {
        info!(
            "Task - Reconciling {} category images{}",
            self.mappings.len(),
            if self.dry_run { " (dry-run)" } else { "" }
        );

        let mut report = ReconcileReport::default();
        for mapping in self.mappings.iter() {
            let outcome = match self.apply(database, mapping).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(
                        "Category {} could not be reconciled: {}",
                        mapping.category_id, error
                    );
                    ReconcileOutcome::Failed {
                        kind: error.kind(),
                        error: error.to_string(),
                    }
                }
            };

            let entry = ReconcileEntry {
                category_id: mapping.category_id,
                image_path: mapping.image_path.clone(),
                outcome,
            };
            progress(&entry);
            report.entries.push(entry);
        }

        info!(
            "Task - Reconciliation finished :: {} succeeded, {} failed",
            report.successes(),
            report.failures()
        );
        Ok(report)
    }

    async fn apply(
        &self,
        database: &dyn DatabaseGateway,
        mapping: &CategoryImageMapping,
    ) -> Result<ReconcileOutcome, StorefrontError> {
        if let Some(root) = &self.assets {
            verify_asset(root, &mapping.image_path)?;
        }

        let current = database.category_image(mapping.category_id).await?;
        if current.as_deref() == Some(mapping.image_path.as_str()) {
            return Ok(ReconcileOutcome::Unchanged);
        }
        if self.dry_run {
            return Ok(ReconcileOutcome::Skipped);
        }

        database
            .set_category_image(mapping.category_id, &mapping.image_path)
            .await?;
        Ok(ReconcileOutcome::Updated)
    }
}

/// Check an image path resolves to a file below the asset root
fn verify_asset(root: &Path, image_path: &str) -> Result<(), StorefrontError> {
    let relative = Path::new(image_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(StorefrontError::InvalidData(format!(
            "Image path escapes the asset root: {}",
            image_path
        )));
    }

    if root.join(relative).is_file() {
        Ok(())
    } else {
        Err(StorefrontError::MissingAsset(image_path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, models::Categories};

    async fn database(categories: &[&str]) -> Result<Database, StorefrontError> {
        let database = Database::memory().await?;
        database.create().await?;
        for name in categories {
            Categories::create(database.connection(), *name).await?;
        }
        Ok(database)
    }

    fn mappings(data: &[(i32, &str)]) -> CategoryImageMappings {
        CategoryImageMappings::new(
            data.iter()
                .map(|(id, path)| CategoryImageMapping::new(*id, *path))
                .collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_category_does_not_abort() -> Result<(), StorefrontError> {
        let database = database(&["Shoes"]).await?;
        let task = ReconcileTask::new(mappings(&[(1, "/a.jpg"), (999, "/b.jpg")]));

        let report = task.run(&database).await?;

        assert_eq!(report.successes(), 1);
        assert_eq!(report.failures(), 1);
        assert_eq!(report.state(), ReconcileState::Failed);
        assert_eq!(report.entries[0].outcome, ReconcileOutcome::Updated);
        match &report.entries[1].outcome {
            ReconcileOutcome::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::NotFound),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }

        assert_eq!(
            database.category_image(1).await?,
            Some("/a.jpg".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn failure_in_the_middle() -> Result<(), StorefrontError> {
        let database = database(&["Shoes", "Hats"]).await?;
        let task = ReconcileTask::new(mappings(&[(1, "/a.jpg"), (42, "/x.jpg"), (2, "/b.jpg")]));

        let report = task.run(&database).await?;
        assert_eq!(report.successes(), 2);
        assert_eq!(report.failed().next().map(|e| e.category_id), Some(42));
        assert_eq!(
            database.category_image(2).await?,
            Some("/b.jpg".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn progress_per_entry() -> Result<(), StorefrontError> {
        let database = database(&["Shoes", "Hats"]).await?;
        let task = ReconcileTask::new(mappings(&[(1, "/a.jpg"), (999, "/b.jpg"), (2, "/c.jpg")]));

        let mut lines = Vec::new();
        let report = task
            .run_with(&database, |entry| lines.push(entry.to_string()))
            .await?;

        assert_eq!(
            lines,
            vec![
                "Updated category 1 image to /a.jpg".to_string(),
                report.entries[1].to_string(),
                "Updated category 2 image to /c.jpg".to_string(),
            ]
        );
        assert!(lines[1].starts_with("Failed to update category 999 (not-found)"));
        Ok(())
    }

    #[tokio::test]
    async fn idempotent() -> Result<(), StorefrontError> {
        let database = database(&["Shoes", "Hats"]).await?;
        let task = ReconcileTask::new(mappings(&[(1, "/a.jpg"), (2, "/b.jpg")]));

        let first = task.run(&database).await?;
        let after_first = (
            database.category_image(1).await?,
            database.category_image(2).await?,
        );
        let second = task.run(&database).await?;
        let after_second = (
            database.category_image(1).await?,
            database.category_image(2).await?,
        );

        assert_eq!(after_first, after_second);
        assert!(first.is_success() && second.is_success());
        assert!(
            second
                .entries
                .iter()
                .all(|e| e.outcome == ReconcileOutcome::Unchanged)
        );
        Ok(())
    }

    #[tokio::test]
    async fn dry_run_does_not_write() -> Result<(), StorefrontError> {
        let database = database(&["Shoes"]).await?;
        let task = ReconcileTask::new(mappings(&[(1, "/a.jpg"), (7, "/b.jpg")])).dry_run(true);

        let report = task.run(&database).await?;
        assert_eq!(report.entries[0].outcome, ReconcileOutcome::Skipped);
        assert!(!report.entries[1].outcome.is_success());
        assert_eq!(database.category_image(1).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn missing_asset() -> Result<(), StorefrontError> {
        let root = std::env::temp_dir().join("storefront-assets-test");
        std::fs::create_dir_all(root.join("images"))?;
        std::fs::write(root.join("images").join("a.jpg"), b"jpg")?;

        let database = database(&["Shoes", "Hats"]).await?;
        let task = ReconcileTask::new(mappings(&[
            (1, "/images/a.jpg"),
            (2, "/images/missing.jpg"),
        ]))
        .assets(&root);

        let report = task.run(&database).await?;
        assert_eq!(report.entries[0].outcome, ReconcileOutcome::Updated);
        match &report.entries[1].outcome {
            ReconcileOutcome::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::MissingAsset),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }
        assert_eq!(database.category_image(2).await?, None);
        Ok(())
    }

    #[test]
    fn asset_path_escape() {
        let root = std::env::temp_dir();
        assert!(verify_asset(&root, "/../etc/passwd").is_err());
    }

    #[test]
    fn duplicate_mappings() {
        let result = CategoryImageMappings::new(vec![
            CategoryImageMapping::new(1, "/a.jpg"),
            CategoryImageMapping::new(1, "/b.jpg"),
        ]);
        assert!(matches!(result, Err(StorefrontError::InvalidData(_))));
    }

    #[test]
    fn parse_aliases() -> Result<(), StorefrontError> {
        let mappings = CategoryImageMappings::from_yaml(
            r#"
- category_id: 1
  image_path: /a.jpg
- categoryId: 2
  imagePath: /b.jpg
- id: 3
  img: /c.jpg
"#,
        )?;
        assert_eq!(mappings.len(), 3);
        assert_eq!(
            mappings.iter().nth(1),
            Some(&CategoryImageMapping::new(2, "/b.jpg"))
        );
        Ok(())
    }

    #[test]
    fn load_json() -> Result<(), StorefrontError> {
        let path = std::env::temp_dir().join("storefront-mappings-test.json");
        std::fs::write(&path, r#"[{"categoryId": 1, "imagePath": "/a.jpg"}]"#)?;

        let mappings = CategoryImageMappings::load(&path)?;
        assert_eq!(mappings.len(), 1);
        Ok(())
    }

    #[test]
    fn entry_display() {
        let entry = ReconcileEntry {
            category_id: 999,
            image_path: "/b.jpg".to_string(),
            outcome: ReconcileOutcome::Failed {
                kind: ErrorKind::NotFound,
                error: "Categories 999 not found".to_string(),
            },
        };
        assert_eq!(
            entry.to_string(),
            "Failed to update category 999 (not-found): Categories 999 not found"
        );
    }
}
