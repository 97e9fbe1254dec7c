mod proximity;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

pub use proximity::Proximity;

use crate::{
    error::{ResourceError, UnresolvedRequirement},
    fs::FileSystem,
    hash::IndexSet,
    requirement::{Requirement, Scope},
    resource::{Resource, ResourceKind, ResourceName},
};

/// How a `local` requirement picks the directories it searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Every configured root, plus the requiring file's own directory.
    /// Proximity decides.
    #[default]
    Ranked,
    /// Only the requiring file's directory tree.
    Subtree,
}

/// The ordered directories searched for required resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfiguration {
    roots: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    mode: SearchMode,
}

impl SearchConfiguration {
    pub fn new<P: Into<PathBuf>>(roots: impl IntoIterator<Item = P>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            output_dir: None,
            mode: SearchMode::default(),
        }
    }

    /// Files under `output_dir` are never treated as inputs, so earlier
    /// merge output is not picked up again.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

impl fmt::Display for SearchConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.roots.is_empty() {
            f.write_str("\t(none)")?;
        }
        for (i, root) in self.roots.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "\t{}", root.display())?;
        }
        if let Some(output_dir) = &self.output_dir {
            write!(f, "\n\texcluding {}", output_dir.display())?;
        }
        Ok(())
    }
}

/// Turns a requirement of some resource into exactly one resource.
pub trait ResolveRequirement {
    fn resolve(
        &self,
        requirement: &Requirement,
        requiring: &Resource,
    ) -> Result<Arc<Resource>, UnresolvedRequirement>;
}

impl<R: ResolveRequirement + ?Sized> ResolveRequirement for &R {
    fn resolve(
        &self,
        requirement: &Requirement,
        requiring: &Resource,
    ) -> Result<Arc<Resource>, UnresolvedRequirement> {
        (**self).resolve(requirement, requiring)
    }
}

/// Finds resources by walking the configured roots of a file system.
pub struct SearchResolver<FS> {
    fs: FS,
    config: SearchConfiguration,
    roots: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl<FS: FileSystem> SearchResolver<FS> {
    pub fn new(fs: FS, config: SearchConfiguration) -> Self {
        let roots = config
            .roots()
            .iter()
            .map(|root| canonical_path(&fs, root))
            .collect();
        let output_dir = config
            .output_dir()
            .map(|output_dir| canonical_path(&fs, output_dir));
        Self {
            fs,
            config,
            roots,
            output_dir,
        }
    }

    pub fn config(&self) -> &SearchConfiguration {
        &self.config
    }

    pub fn file_system(&self) -> &FS {
        &self.fs
    }

    /// Builds the resource at `path` through this resolver's file system.
    /// The resource is keyed by its canonical path, the same form resolved
    /// dependencies carry.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Arc<Resource>, ResourceError> {
        Resource::load(canonical_path(&self.fs, path.as_ref()), &self.fs).map(Arc::new)
    }

    /// Every resource of `kind` under the configured roots.
    pub fn find_all_of_kind(&self, kind: ResourceKind) -> Vec<Arc<Resource>> {
        self.find_all_matching(&self.roots, |name| name.kind == kind)
    }

    /// Every script and stylesheet under the configured roots.
    pub fn find_all_processable(&self) -> Vec<Arc<Resource>> {
        self.find_all_matching(&self.roots, |name| name.kind.is_processable())
    }

    fn find_all_matching(
        &self,
        roots: &[PathBuf],
        mut matches: impl FnMut(&ResourceName) -> bool,
    ) -> Vec<Arc<Resource>> {
        self.walk(roots)
            .into_iter()
            .filter(|path| matches(&ResourceName::from_path(path)))
            .filter_map(|path| self.open(path).ok())
            .collect()
    }

    /// Files under `roots`, once each, in root order, without the output dir.
    fn walk(&self, roots: &[PathBuf]) -> IndexSet<PathBuf> {
        let mut paths = IndexSet::default();
        for root in roots {
            tracing::trace!(root = %root.display(), "walking search root");
            paths.extend(
                self.fs
                    .walk_files(root)
                    .into_iter()
                    .filter(|path| !self.is_excluded(path)),
            );
        }
        paths
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.output_dir
            .as_deref()
            .is_some_and(|output_dir| path.starts_with(output_dir))
    }

    fn roots_for(&self, scope: Scope, requiring_dir: &Path) -> Vec<PathBuf> {
        match (scope, self.config.mode()) {
            (Scope::Global, _) => self.roots.clone(),
            (Scope::Local, SearchMode::Subtree) => vec![requiring_dir.to_path_buf()],
            (Scope::Local, SearchMode::Ranked) => std::iter::once(requiring_dir.to_path_buf())
                .chain(self.roots.iter().cloned())
                .collect(),
        }
    }

    fn unresolved(&self, requirement: &Requirement, requiring: &Resource) -> UnresolvedRequirement {
        UnresolvedRequirement {
            requirement: requirement.clone(),
            requiring: requiring.path().clone(),
            searched: self.config.clone(),
        }
    }
}

impl<FS: FileSystem> ResolveRequirement for SearchResolver<FS> {
    fn resolve(
        &self,
        requirement: &Requirement,
        requiring: &Resource,
    ) -> Result<Arc<Resource>, UnresolvedRequirement> {
        let requiring_path = canonical_path(&self.fs, requiring.path());
        let requiring_dir = requiring_path.parent().unwrap_or(Path::new(""));
        let candidates = self
            .walk(&self.roots_for(requirement.scope(), requiring_dir))
            .into_iter()
            .filter(|path| *path != requiring_path)
            .filter(|path| {
                let name = ResourceName::from_path(path);
                name.kind == requiring.kind() && name.base_name.name == requirement.name()
            })
            .collect::<Vec<_>>();
        for candidate in &candidates {
            tracing::trace!(requirement = %requirement, candidate = %candidate.display(), "candidate");
        }

        let Some((index, proximity)) =
            proximity::closest(&requiring_path, candidates.iter().map(PathBuf::as_path))
        else {
            return Err(self.unresolved(requirement, requiring));
        };
        let resolved = &candidates[index];
        tracing::debug!(
            requirement = %requirement,
            requiring = %requiring.path().display(),
            resolved = %resolved.display(),
            candidates = candidates.len(),
            ?proximity,
            "resolved requirement"
        );
        self.open(resolved)
            .map_err(|_| self.unresolved(requirement, requiring))
    }
}

/// Canonical form of `path`, which need not exist yet: the nearest ancestor
/// that does exist is canonicalized and the rest appended. A relative path
/// with no existing ancestor is taken from the current directory.
fn canonical_path<FS: FileSystem>(fs: &FS, path: &Path) -> PathBuf {
    if let Ok(canonical) = fs.canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(file_name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            canonical_path(fs, parent).join(file_name)
        }
        _ => path.to_path_buf(),
    }
}
