use std::{
    io,
    path::{Path, PathBuf},
};

/// The file access the resolver needs. `OsFileSystem` is the real one.
pub trait FileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Every file path under `root`, recursively, in a stable order.
    /// A root that cannot be walked yields nothing.
    fn walk_files(&self, root: &Path) -> Vec<PathBuf>;

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

impl<FS: FileSystem + ?Sized> FileSystem for &FS {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        (**self).walk_files(root)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }
}
