mod base_name;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

pub use base_name::{normalize_base_name, parse_base_name, BaseName};

use crate::{
    error::ResourceError,
    fs::FileSystem,
    requirement::{parse_requirements, DirectiveGrammar, Requirement},
    OsFileSystem,
};

/// What a file holds, going by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Script,
    Stylesheet,
    Unknown,
}

impl ResourceKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "js" | "javascript" => Self::Script,
            "css" => Self::Stylesheet,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|extension| extension.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Whether files of this kind can carry requirements.
    pub fn is_processable(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Script => "script",
            Self::Stylesheet => "stylesheet",
            Self::Unknown => "unknown",
        })
    }
}

/// Everything about a resource that can be told from its path alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResourceName {
    pub kind: ResourceKind,
    pub extension: Box<str>,
    pub base_name: BaseName,
}

impl ResourceName {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|file_name| file_name.to_string_lossy())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self {
            kind: ResourceKind::from_path(path),
            extension: extension.into_boxed_str(),
            base_name: parse_base_name(&file_name),
        }
    }
}

/// One file, read once when the resource is built.
#[derive(Debug)]
pub struct Resource {
    path: Arc<Path>,
    kind: ResourceKind,
    extension: Box<str>,
    base_name: Box<str>,
    minified: bool,
    content: Option<String>,
    requirements: Option<Vec<Requirement>>,
}

impl Resource {
    /// Reads `path` from the OS file system.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        Self::load(path, &OsFileSystem::default())
    }

    /// Reads `path` through `fs`. A file that cannot be read as text yields a
    /// resource without content; only an empty path is an error.
    pub fn load<FS: FileSystem>(path: impl AsRef<Path>, fs: &FS) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ResourceError::EmptyPath);
        }
        let content = match fs.read_to_string(path) {
            Ok(content) => Some(content),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "resource content unreadable");
                None
            }
        };
        Self::with_content(path, content)
    }

    /// Builds a resource from content already in memory.
    pub fn with_content(
        path: impl Into<PathBuf>,
        content: Option<String>,
    ) -> Result<Self, ResourceError> {
        let path: PathBuf = path.into();
        if path.as_os_str().is_empty() {
            return Err(ResourceError::EmptyPath);
        }
        let ResourceName {
            kind,
            extension,
            base_name,
        } = ResourceName::from_path(&path);
        let requirements = match (DirectiveGrammar::for_kind(kind), &content) {
            (Some(grammar), Some(content)) => Some(parse_requirements(grammar, content)),
            _ => None,
        };
        Ok(Self {
            path: path.into(),
            kind,
            extension,
            base_name: base_name.name.into_boxed_str(),
            minified: base_name.minified,
            content,
            requirements,
        })
    }

    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Lower-cased extension without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name with directory, extension, minification suffix and version removed.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn minified(&self) -> bool {
        self.minified
    }

    /// `None` when the file could not be read.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Size of the content in bytes, 0 when unreadable.
    pub fn size(&self) -> u64 {
        self.content.as_ref().map_or(0, |content| content.len() as u64)
    }

    /// Requirements in textual order. `None` for unknown kinds and unreadable
    /// files, possibly empty otherwise.
    pub fn requirements(&self) -> Option<&[Requirement]> {
        self.requirements.as_deref()
    }

    /// Whether there is anything to merge into this resource.
    pub fn has_requirements(&self) -> bool {
        self.requirements().is_some_and(|requirements| !requirements.is_empty())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.base_name, self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory_fs::MemoryFileSystem, requirement::Span};
    use test_case::test_case;

    #[test_case("file.someCrazyThing", ResourceKind::Unknown)]
    #[test_case("c:/file.js", ResourceKind::Script)]
    #[test_case("file.Js", ResourceKind::Script)]
    #[test_case("file.awesome.js", ResourceKind::Script)]
    #[test_case("file.JavaScript", ResourceKind::Script)]
    #[test_case("FILE.CSS", ResourceKind::Stylesheet)]
    #[test_case("someFile", ResourceKind::Unknown)]
    fn test_kind_from_path(path: &str, expected: ResourceKind) {
        assert_eq!(ResourceKind::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(
            Resource::with_content("", None),
            Err(ResourceError::EmptyPath)
        ));
        assert!(matches!(
            Resource::load("", &MemoryFileSystem::default()),
            Err(ResourceError::EmptyPath)
        ));
    }

    #[test]
    fn test_path_derived_properties() {
        let resource = Resource::with_content("/usr/local/jQuery-1.5.4-min.JS", None).unwrap();
        assert_eq!(resource.path().as_ref(), Path::new("/usr/local/jQuery-1.5.4-min.JS"));
        assert_eq!(resource.kind(), ResourceKind::Script);
        assert_eq!(resource.extension(), "js");
        assert_eq!(resource.base_name(), "jquery");
        assert!(resource.minified());
    }

    #[test]
    fn test_missing_file_has_no_content_or_requirements() {
        let resource = Resource::load("/nowhere/test.js", &MemoryFileSystem::default()).unwrap();
        assert_eq!(resource.content(), None);
        assert_eq!(resource.size(), 0);
        assert_eq!(resource.requirements(), None);
    }

    #[test]
    fn test_unknown_kind_has_no_requirements() {
        let resource =
            Resource::with_content("notes.txt", Some("//= require \"a\"".to_owned())).unwrap();
        assert_eq!(resource.requirements(), None);
    }

    #[test]
    fn test_plain_content_has_empty_requirements() {
        let fs = MemoryFileSystem::new([("/p/test.js", "var foo = {};")]);
        let resource = Resource::load("/p/test.js", &fs).unwrap();
        assert_eq!(resource.content(), Some("var foo = {};"));
        assert_eq!(resource.size(), 13);
        assert_eq!(resource.requirements(), Some(&[][..]));
        assert!(!resource.has_requirements());
    }

    #[test]
    fn test_requirements_are_parsed_at_construction() {
        let content = "//= require \"jquery\"\nvar foo = {};\n";
        let resource = Resource::with_content("app.js", Some(content.to_owned())).unwrap();
        let requirements = resource.requirements().unwrap();
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].name(), "jquery");
        assert_eq!(requirements[0].span(), Span::new(0, 21));
    }
}
