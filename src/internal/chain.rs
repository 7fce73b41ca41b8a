//! Circular dependency detection for a single resolution pass.

use std::ops::{Deref, DerefMut};

use crate::error::{DiError, DiResult};
use crate::service_type::ServiceType;

pub(crate) const MAX_DEPTH: usize = 1024;

/// Service types currently in progress along the active resolution path.
///
/// One chain is created per top-level resolution request and passed down by
/// `&mut`, so concurrent requests never observe each other's stacks.
pub(crate) struct CallSiteChain {
    stack: Vec<ServiceType>,
    max_depth: usize,
}

impl CallSiteChain {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Pushes `service_type`, failing if it is already on the path.
    ///
    /// The returned guard pops the entry when dropped, on success and error
    /// paths alike, so later siblings may depend on the same type again.
    pub(crate) fn enter(&mut self, service_type: &ServiceType) -> DiResult<ChainGuard<'_>> {
        // Circular detection BEFORE pushing the new type
        if self.stack.contains(service_type) {
            let mut path = self.stack.clone();
            path.push(service_type.clone());
            return Err(DiError::CircularDependency(path));
        }

        if self.stack.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.stack.len()));
        }

        self.stack.push(service_type.clone());
        Ok(ChainGuard { chain: self })
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, service_type: &ServiceType) -> bool {
        self.stack.contains(service_type)
    }
}

/// Scoped entry on a [`CallSiteChain`].
pub(crate) struct ChainGuard<'a> {
    chain: &'a mut CallSiteChain,
}

impl Deref for ChainGuard<'_> {
    type Target = CallSiteChain;

    fn deref(&self) -> &CallSiteChain {
        self.chain
    }
}

impl DerefMut for ChainGuard<'_> {
    fn deref_mut(&mut self) -> &mut CallSiteChain {
        self.chain
    }
}

impl Drop for ChainGuard<'_> {
    fn drop(&mut self) {
        let popped = self.chain.stack.pop();
        debug_assert!(popped.is_some());
    }
}
