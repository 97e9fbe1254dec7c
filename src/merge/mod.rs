mod chunk;

use std::{path::Path, sync::Arc};

pub use chunk::{concat, Chunk};

use crate::{
    collect_deps::collect_dependencies, error::UnresolvedRequirement, hash::HashSet,
    resource::Resource, search::ResolveRequirement,
};

/// Base names whose content a merge has already written out.
///
/// One set is shared by every step of a merge so that a resource required
/// from several places is emitted once. Start a fresh set for each
/// independent output.
#[derive(Debug, Default)]
pub struct EmittedSet {
    names: HashSet<Box<str>>,
    expanding: Vec<Arc<Path>>,
}

impl EmittedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, base_name: &str) -> bool {
        self.names.contains(base_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| &**name)
    }

    fn is_expanding(&self, path: &Path) -> bool {
        self.expanding.iter().any(|expanding| **expanding == *path)
    }
}

struct Frame {
    resource: Arc<Resource>,
    next_requirement: usize,
    position: usize,
}

/// Splices the resolved requirements of `root` into its content.
///
/// Each directive is replaced by the merged content of the resource it
/// names, unless that resource's base name is already in `emitted` or the
/// resource is still being expanded further up, in which case the directive
/// is dropped. Names are added to `emitted` as their content is completed.
pub fn merge_requirements<R: ResolveRequirement>(
    root: &Arc<Resource>,
    resolver: &R,
    emitted: &mut EmittedSet,
) -> Result<Vec<Chunk>, UnresolvedRequirement> {
    let mut chunks = Vec::new();
    let depth = emitted.expanding.len();
    let mut stack = vec![Frame {
        resource: root.clone(),
        next_requirement: 0,
        position: 0,
    }];
    emitted.expanding.push(root.path().clone());

    while let Some(top) = stack.last_mut() {
        let resource = top.resource.clone();
        let requirements = resource.requirements().unwrap_or_default();

        let Some(requirement) = requirements.get(top.next_requirement) else {
            if requirements.is_empty() {
                chunks.push(Chunk::whole(resource.clone()));
            } else if top.position < resource.size() as usize {
                chunks.push(Chunk::new(resource.clone(), top.position, None));
            }
            stack.pop();
            emitted.expanding.pop();
            if !stack.is_empty() {
                emitted.names.insert(resource.base_name().into());
            }
            continue;
        };
        top.next_requirement += 1;

        let span = requirement.span();
        if span.start > top.position {
            chunks.push(Chunk::new(
                resource.clone(),
                top.position,
                Some(span.start),
            ));
        }
        top.position = span.end;

        let dependency = match resolver.resolve(requirement, &resource) {
            Ok(dependency) => dependency,
            Err(err) => {
                emitted.expanding.truncate(depth);
                return Err(err);
            }
        };
        if emitted.contains(dependency.base_name()) || emitted.is_expanding(dependency.path()) {
            tracing::debug!(
                requirement = %requirement,
                requiring = %resource.path().display(),
                "dropping directive, content already emitted or being expanded"
            );
            continue;
        }
        emitted.expanding.push(dependency.path().clone());
        stack.push(Frame {
            resource: dependency,
            next_requirement: 0,
            position: 0,
        });
    }
    Ok(chunks)
}

/// The merged output of `root` as a sequence of chunks, for callers that
/// post-process fragments before joining them.
///
/// Fails before producing anything if any requirement in the tree cannot
/// be resolved.
pub fn chunks_for_output<R: ResolveRequirement>(
    root: &Arc<Resource>,
    resolver: &R,
) -> Result<Vec<Chunk>, UnresolvedRequirement> {
    // Resolving the whole tree first makes a missing requirement fail before
    // any chunk is built. The merge below resolves again as it splices.
    let dependencies = collect_dependencies(root, resolver)?;
    tracing::debug!(
        root = %root.path().display(),
        dependencies = dependencies.len(),
        "merging"
    );
    merge_requirements(root, resolver, &mut EmittedSet::new())
}

/// The merged output of `root`.
pub fn merge_for_output<R: ResolveRequirement>(
    root: &Arc<Resource>,
    resolver: &R,
) -> Result<String, UnresolvedRequirement> {
    chunks_for_output(root, resolver).map(|chunks| concat(&chunks))
}
