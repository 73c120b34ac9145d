use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use slug::slugify;
use tracing::{debug, info, warn};

use crate::error::{DraftError, Result};
use crate::model::{EntityKind, InvoiceDraft, LineItem};

/// Where drafts are loaded from and submitted to.
pub trait DraftRepository {
    fn fetch(&self, kind: EntityKind, number: &str) -> Result<InvoiceDraft>;

    /// Stores `draft`. A failed submit leaves the caller's draft untouched.
    fn submit(&self, draft: &InvoiceDraft) -> Result<()>;

    fn list(&self, kind: EntityKind) -> Result<Vec<String>>;

    fn next_number(&self, kind: EntityKind) -> Result<String>;
}

/// Keeps each draft as a JSON document under `<root>/drafts/<kind>/`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    root: PathBuf,
}

impl JsonFileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, kind: EntityKind) -> PathBuf {
        self.root.join("drafts").join(kind.as_str())
    }

    pub fn path_for(&self, kind: EntityKind, number: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{}.json", slugify(number)))
    }

    fn json_files(&self, kind: EntityKind) -> Result<Vec<PathBuf>> {
        let dir = self.kind_dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                files.push(path);
            }
        }
        debug!(dir = %dir.display(), count = files.len(), "scanned drafts");
        Ok(files)
    }
}

impl DraftRepository for JsonFileRepository {
    fn fetch(&self, kind: EntityKind, number: &str) -> Result<InvoiceDraft> {
        let path = self.path_for(kind, number);
        if !path.exists() {
            return Err(DraftError::DraftNotFound(number.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let mut draft: InvoiceDraft = serde_json::from_str(&content)?;
        draft.recalculate();
        if draft.has_client() && draft.line_items.is_empty() {
            draft.line_items.push(LineItem::blank());
        }
        info!(path = %path.display(), "fetched draft");
        Ok(draft)
    }

    fn submit(&self, draft: &InvoiceDraft) -> Result<()> {
        if slugify(&draft.number).is_empty() {
            return Err(DraftError::Config("draft has no number".to_string()));
        }
        let path = self.path_for(draft.entity, &draft.number);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write next to the target and rename, so a failure never leaves half a file.
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(draft)?;
        if let Err(e) = fs::write(&tmp_path, json) {
            fs::remove_file(&tmp_path).ok();
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            fs::remove_file(&tmp_path).ok();
            return Err(e.into());
        }
        info!(path = %path.display(), items = draft.line_items.len(), "saved draft");
        Ok(())
    }

    fn list(&self, kind: EntityKind) -> Result<Vec<String>> {
        let mut numbers = Vec::new();
        for path in self.json_files(kind)? {
            let draft = fs::read_to_string(&path).map_err(DraftError::from).and_then(|content| {
                serde_json::from_str::<InvoiceDraft>(&content).map_err(DraftError::from)
            });
            match draft {
                Ok(draft) => numbers.push(draft.number),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable draft"),
            }
        }
        numbers.sort();
        Ok(numbers)
    }

    fn next_number(&self, kind: EntityKind) -> Result<String> {
        let prefix = kind.number_prefix();
        let number_re = Regex::new(&format!(r"(?i)^{}-(\d+)$", regex::escape(prefix)))
            .map_err(|e| DraftError::Config(e.to_string()))?;

        let mut next_idx: u32 = 1;
        for path in self.json_files(kind)? {
            let Some(stem) = path.file_stem() else {
                continue;
            };
            if let Some(caps) = number_re.captures(&stem.to_string_lossy()) {
                if let Ok(idx) = caps[1].parse::<u32>() {
                    if idx >= next_idx {
                        next_idx = idx.checked_add(1).ok_or_else(|| {
                            DraftError::Config(format!("{prefix} numbers are exhausted"))
                        })?;
                    }
                }
            }
        }
        Ok(format!("{prefix}-{next_idx:04}"))
    }
}
