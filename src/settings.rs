use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Result;

const APP_DIR: &str = "pdfcut";
const RECENT_FILES: &str = "recent_files.txt";
const MAX_RECENT: usize = 10;

/// Most-recently-opened documents, newest first, stored one path per line
#[derive(Debug, Clone, Default)]
pub struct RecentFiles {
    store: Option<PathBuf>,
    paths: Vec<PathBuf>,
}

impl RecentFiles {
    /// Load from the user's config directory; no config directory means nothing is persisted
    pub fn load() -> Self {
        match dirs::config_dir() {
            Some(dir) => Self::load_from(dir.join(APP_DIR)),
            None => Self::default(),
        }
    }

    /// Load from `dir/recent_files.txt`, starting empty when the file is missing or unreadable
    pub fn load_from<P: AsRef<Path>>(dir: P) -> Self {
        let store = dir.as_ref().join(RECENT_FILES);
        let paths = match fs::read_to_string(&store) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(PathBuf::from)
                .take(MAX_RECENT)
                .collect(),
            Err(_) => Vec::new(),
        };

        Self {
            store: Some(store),
            paths,
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Move `path` to the front and persist; persisting failures are only logged
    pub fn add(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
        self.paths.insert(0, path.to_path_buf());
        self.paths.truncate(MAX_RECENT);

        if let Err(e) = self.save() {
            warn!("Could not save recent files: {}", e);
        }
    }

    fn save(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Some(dir) = store.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = self
            .paths
            .iter()
            .map(|path| path.to_string_lossy().to_string())
            .collect::<Vec<String>>()
            .join("\n");
        fs::write(store, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut recent = RecentFiles::load_from(dir.path());
        assert!(recent.is_empty());

        recent.add(Path::new("/a.pdf"));
        recent.add(Path::new("/b.pdf"));
        recent.add(Path::new("/a.pdf"));

        assert_eq!(
            recent.paths(),
            &[PathBuf::from("/a.pdf"), PathBuf::from("/b.pdf")]
        );
    }

    #[test]
    fn persists_and_caps_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut recent = RecentFiles::load_from(dir.path().join("nested"));
        for i in 0..15 {
            recent.add(&PathBuf::from(format!("/doc{}.pdf", i)));
        }

        let reloaded = RecentFiles::load_from(dir.path().join("nested"));
        assert_eq!(reloaded.paths().len(), MAX_RECENT);
        assert_eq!(reloaded.paths()[0], PathBuf::from("/doc14.pdf"));
    }
}
