use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use crate::fs::FileSystem;

/// Files held in memory, walked in path order.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem(BTreeMap<PathBuf, String>);

impl MemoryFileSystem {
    pub fn new<P: Into<PathBuf>, C: Into<String>>(files: impl IntoIterator<Item = (P, C)>) -> Self {
        Self(
            files
                .into_iter()
                .map(|(path, content)| (path.into(), content.into()))
                .collect(),
        )
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        self.0
            .keys()
            .filter(|path| path.starts_with(root))
            .cloned()
            .collect()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}
