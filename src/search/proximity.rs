use std::path::{Component, Path};

/// How far a candidate's directory is from the requiring file's directory.
///
/// Ordered from best to worst: the derived `Ord` compares the variant first,
/// so any `Below` beats any `Above` whatever the distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Proximity {
    SameDirectory,
    /// Inside the requiring directory, `levels` directories down.
    Below { levels: usize },
    /// `levels` directories up to the common branch point, then `descent`
    /// directories down to the candidate.
    Above { levels: usize, descent: usize },
    Unrelated,
}

impl Proximity {
    pub fn between(requiring_dir: &Path, candidate_dir: &Path) -> Self {
        let Some(relative) = pathdiff::diff_paths(candidate_dir, requiring_dir) else {
            return Self::Unrelated;
        };
        let mut levels = 0usize;
        let mut descent = 0usize;
        for component in relative.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir if descent == 0 => levels += 1,
                Component::Normal(_) => descent += 1,
                // rooted or prefixed: the two paths share nothing
                _ => return Self::Unrelated,
            }
        }
        match (levels, descent) {
            (0, 0) => Self::SameDirectory,
            (0, levels) => Self::Below { levels },
            (levels, descent) => Self::Above { levels, descent },
        }
    }
}

/// Index of the candidate closest to `requiring_file`; the earliest wins ties.
pub fn closest<'a>(
    requiring_file: &Path,
    candidates: impl IntoIterator<Item = &'a Path>,
) -> Option<(usize, Proximity)> {
    let requiring_dir = requiring_file.parent().unwrap_or(Path::new(""));
    candidates
        .into_iter()
        .map(|candidate| {
            let candidate_dir = candidate.parent().unwrap_or(Path::new(""));
            Proximity::between(requiring_dir, candidate_dir)
        })
        .enumerate()
        .min_by_key(|&(index, proximity)| (proximity, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/r/a", "/r/a", Proximity::SameDirectory)]
    #[test_case("/r/a", "/r/a/b", Proximity::Below { levels: 1 })]
    #[test_case("/r/a", "/r/a/b/c", Proximity::Below { levels: 2 })]
    #[test_case("/r/a/b", "/r/a", Proximity::Above { levels: 1, descent: 0 })]
    #[test_case("/r/a/b", "/r", Proximity::Above { levels: 2, descent: 0 })]
    #[test_case("/r/a/b", "/r/c", Proximity::Above { levels: 2, descent: 1 })]
    #[test_case("dir1", "dir1/dir2", Proximity::Below { levels: 1 })]
    #[test_case("relative/dir", "/absolute/dir", Proximity::Unrelated)]
    #[test_case("/absolute/dir", "relative/dir", Proximity::Unrelated)]
    fn test_between(requiring_dir: &str, candidate_dir: &str, expected: Proximity) {
        assert_eq!(
            Proximity::between(Path::new(requiring_dir), Path::new(candidate_dir)),
            expected
        );
    }

    #[test]
    fn test_downward_outranks_upward() {
        assert!(Proximity::Below { levels: 10 } < Proximity::Above { levels: 1, descent: 0 });
        assert!(Proximity::SameDirectory < Proximity::Below { levels: 1 });
        assert!(Proximity::Above { levels: 9, descent: 9 } < Proximity::Unrelated);
    }

    #[test]
    fn test_closest() {
        let candidates = [
            Path::new("/r/x/file2.js"),
            Path::new("/r/a/file2.js"),
            Path::new("/r/a/b/c/file2.js"),
            Path::new("/r/a/b/file2.js"),
        ];
        assert_eq!(
            closest(Path::new("/r/a/b/file1.js"), candidates),
            Some((3, Proximity::SameDirectory))
        );
        assert_eq!(
            closest(Path::new("/r/a/b/file1.js"), candidates[..3].iter().copied()),
            Some((2, Proximity::Below { levels: 1 }))
        );
        assert_eq!(
            closest(Path::new("/r/a/b/file1.js"), candidates[..2].iter().copied()),
            Some((1, Proximity::Above { levels: 1, descent: 0 }))
        );
        assert_eq!(closest(Path::new("/r/a/file1.js"), []), None);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let candidates = [Path::new("/r/b/f.js"), Path::new("/r/c/f.js")];
        assert_eq!(
            closest(Path::new("/r/a/g.js"), candidates),
            Some((0, Proximity::Above { levels: 1, descent: 1 }))
        );
    }
}
