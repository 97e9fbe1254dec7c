use std::sync::Arc;

use crate::{
    error::UnresolvedRequirement, hash::IndexMap, resource::Resource,
    search::ResolveRequirement,
};

/// Every requirement name reachable from a root, mapped to the resource it
/// resolved to, in the order resolution completed: a resource always comes
/// after everything it requires.
#[derive(Debug, Default)]
pub struct DependencyMap {
    resources_by_name: IndexMap<Box<str>, Arc<Resource>>,
}

impl DependencyMap {
    pub fn get(&self, name: &str) -> Option<&Arc<Resource>> {
        self.resources_by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources_by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.resources_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources_by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources_by_name.keys().map(|name| &**name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Resource>)> {
        self.resources_by_name
            .iter()
            .map(|(name, resource)| (&**name, resource))
    }

    fn record(&mut self, name: Box<str>, resource: Arc<Resource>) {
        self.resources_by_name.insert(name, resource);
    }
}

struct Frame {
    resource: Arc<Resource>,
    next_requirement: usize,
    recorded_as: Option<Box<str>>,
}

impl Frame {
    fn new(resource: Arc<Resource>, recorded_as: Option<Box<str>>) -> Self {
        Self {
            resource,
            next_requirement: 0,
            recorded_as,
        }
    }
}

/// Resolves the whole requirement tree of `root`, depth first.
///
/// The first requirement that cannot be resolved aborts the walk; nothing
/// after it is looked up. A resource that is already being resolved further
/// up the current path is recorded again but not descended into.
pub fn collect_dependencies<R: ResolveRequirement>(
    root: &Arc<Resource>,
    resolver: &R,
) -> Result<DependencyMap, UnresolvedRequirement> {
    let mut dependencies = DependencyMap::default();
    let mut stack = vec![Frame::new(root.clone(), None)];

    while let Some(top) = stack.last_mut() {
        let resource = top.resource.clone();
        let index = top.next_requirement;
        top.next_requirement += 1;

        let Some(requirement) = resource
            .requirements()
            .and_then(|requirements| requirements.get(index))
        else {
            if let Some(Frame {
                resource,
                recorded_as: Some(name),
                ..
            }) = stack.pop()
            {
                dependencies.record(name, resource);
            }
            continue;
        };

        let resolved = resolver.resolve(requirement, &resource)?;
        let name = Box::<str>::from(requirement.name());
        if stack
            .iter()
            .any(|frame| frame.resource.path() == resolved.path())
        {
            tracing::trace!(name = %name, path = %resolved.path().display(), "requirement cycle");
            dependencies.record(name, resolved);
        } else {
            stack.push(Frame::new(resolved, Some(name)));
        }
    }
    Ok(dependencies)
}
