mod collect_deps;
mod error;
mod fs;
mod hash;
#[cfg(test)]
mod memory_fs;
mod merge;
mod requirement;
mod resource;
mod search;

pub use collect_deps::{collect_dependencies, DependencyMap};
pub use error::{ResourceError, UnresolvedRequirement};
pub use fs::FileSystem;
pub use merge::{
    chunks_for_output, concat, merge_for_output, merge_requirements, Chunk, EmittedSet,
};
pub use requirement::{parse_requirements, DirectiveGrammar, Requirement, Scope, Span};
pub use resource::{normalize_base_name, parse_base_name, BaseName, Resource, ResourceKind};
pub use search::{
    Proximity, ResolveRequirement, SearchConfiguration, SearchMode, SearchResolver,
};

use std::{
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

#[derive(Default, Clone, Debug)]
pub struct OsFileSystem(());

impl FileSystem for OsFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(root = %root.display(), %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }
}
