use std::{path::Path, sync::Arc};

use thiserror::Error;

use crate::{requirement::Requirement, search::SearchConfiguration};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("a resource must be created with a non-empty path")]
    EmptyPath,
}

/// No resource anywhere in the search configuration matched a requirement.
#[derive(Debug, Error)]
#[error("unable to resolve requirement {requirement} of {}\nsearch paths:\n{searched}", .requiring.display())]
pub struct UnresolvedRequirement {
    pub requirement: Requirement,
    pub requiring: Arc<Path>,
    pub searched: SearchConfiguration,
}

impl UnresolvedRequirement {
    /// Name of the requirement that could not be satisfied.
    pub fn name(&self) -> &str {
        self.requirement.name()
    }
}
