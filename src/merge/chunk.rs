use std::{fmt, sync::Arc};

use crate::resource::Resource;

/// A slice of one resource's content, `start..end` or `start..` to the end.
#[derive(Debug, Clone)]
pub struct Chunk {
    resource: Arc<Resource>,
    start: usize,
    end: Option<usize>,
}

impl Chunk {
    pub fn new(resource: Arc<Resource>, start: usize, end: Option<usize>) -> Self {
        Self {
            resource,
            start,
            end,
        }
    }

    pub fn whole(resource: Arc<Resource>) -> Self {
        Self::new(resource, 0, None)
    }

    pub fn resource(&self) -> &Arc<Resource> {
        &self.resource
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> Option<usize> {
        self.end
    }

    pub fn content(&self) -> &str {
        let content = self.resource.content().unwrap_or_default();
        match self.end {
            Some(end) => &content[self.start..end],
            None => &content[self.start..],
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.base_name(), self.start)?;
        if let Some(end) = self.end {
            write!(f, ":{end}")?;
        }
        Ok(())
    }
}

/// Joins chunk contents in order.
pub fn concat(chunks: &[Chunk]) -> String {
    let mut merged = String::with_capacity(chunks.iter().map(|chunk| chunk.content().len()).sum());
    for chunk in chunks {
        merged.push_str(chunk.content());
    }
    merged
}
