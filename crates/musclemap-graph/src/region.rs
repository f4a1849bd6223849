//! Region resolution: the root ancestor of every anatomy node.

use musclemap_core::prelude::*;
use std::collections::HashSet;

/// Why a node has no region
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolveFailure {
    /// Parent chain revisits these ids (in walk order, repeated id last)
    Cycle(Vec<NodeId>),
    /// Parent chain names a node that isn't in the snapshot
    MissingParent(NodeId),
}

/// Memoized root-ancestor lookup over one snapshot
pub struct RegionResolver<'a> {
    snapshot: &'a AnatomySnapshot,
    /// Arena index -> arena index of its region
    regions: Vec<Option<usize>>,
    failures: Vec<Option<ResolveFailure>>,
}

impl<'a> RegionResolver<'a> {
    /// Resolve every node in the snapshot.
    ///
    /// Each parent chain is walked at most once; a walk that reaches an
    /// already-resolved ancestor reuses its answer.
    pub fn new(snapshot: &'a AnatomySnapshot) -> Self {
        let len = snapshot.len();
        let mut resolver = Self {
            snapshot,
            regions: vec![None; len],
            failures: vec![None; len],
        };

        for idx in 0..len {
            resolver.resolve(idx);
        }

        let failed = resolver.failures.iter().filter(|f| f.is_some()).count();
        if failed > 0 {
            log::warn!("{} of {} anatomy nodes have no resolvable region", failed, len);
        }

        resolver
    }

    fn resolve(&mut self, start: usize) {
        if self.regions[start].is_some() || self.failures[start].is_some() {
            return;
        }

        let nodes = self.snapshot.nodes();
        let mut path: Vec<usize> = Vec::new();
        let mut on_path: HashSet<usize> = HashSet::new();
        let mut current = start;

        let outcome = loop {
            if let Some(region) = self.regions[current] {
                break Ok(region);
            }
            if let Some(failure) = &self.failures[current] {
                break Err(failure.clone());
            }
            if !on_path.insert(current) {
                let mut ids: Vec<NodeId> = path.iter().map(|&i| nodes[i].id.clone()).collect();
                ids.push(nodes[current].id.clone());
                break Err(ResolveFailure::Cycle(ids));
            }
            path.push(current);

            match &nodes[current].parent_id {
                None => break Ok(current),
                Some(parent_id) => match self.snapshot.index_of(parent_id) {
                    Some(parent) => current = parent,
                    None => break Err(ResolveFailure::MissingParent(parent_id.clone())),
                },
            }
        };

        for idx in path {
            match &outcome {
                Ok(region) => self.regions[idx] = Some(*region),
                Err(failure) => {
                    log::warn!("Region resolution failed for '{}'", nodes[idx].id);
                    self.failures[idx] = Some(failure.clone());
                }
            }
        }
    }

    /// The snapshot this resolver was built over
    pub fn snapshot(&self) -> &'a AnatomySnapshot {
        self.snapshot
    }

    /// Root ancestor of a node (the node itself when it is a root)
    pub fn region_of(&self, id: &str) -> Result<&'a AnatomyNode> {
        let idx = self
            .snapshot
            .index_of(id)
            .ok_or_else(|| Error::not_found(id))?;
        let region = self.region_index(idx).ok_or_else(|| self.failure_error(idx))?;
        self.snapshot
            .node_at(region)
            .ok_or_else(|| Error::not_found(id))
    }

    /// Id of a node's region
    pub fn region_id_of(&self, id: &str) -> Result<&'a str> {
        self.region_of(id).map(|n| n.id.as_str())
    }

    /// Region arena index for an arena index; `None` when resolution failed
    pub fn region_index(&self, idx: usize) -> Option<usize> {
        self.regions.get(idx).copied().flatten()
    }

    fn failure_error(&self, idx: usize) -> Error {
        let node_id = self.snapshot.nodes()[idx].id.clone();
        match &self.failures[idx] {
            Some(ResolveFailure::Cycle(path)) => Error::cycle(node_id, path.clone()),
            Some(ResolveFailure::MissingParent(parent)) => Error::not_found(parent.clone()),
            None => Error::not_found(node_id),
        }
    }

    /// All region roots, sorted by id
    pub fn regions(&self) -> Vec<&'a AnatomyNode> {
        let mut roots: Vec<_> = self.snapshot.roots().collect();
        roots.sort_by(|a, b| a.id.cmp(&b.id));
        roots
    }

    /// Nodes whose region is `region_id`, in snapshot order
    pub fn members_of(&self, region_id: &str) -> Vec<&'a AnatomyNode> {
        let Some(region) = self.snapshot.index_of(region_id) else {
            return Vec::new();
        };
        self.snapshot
            .nodes()
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.region_index(*idx) == Some(region))
            .map(|(_, node)| node)
            .collect()
    }

    /// Errors for every node whose region could not be found, in snapshot order
    pub fn failures(&self) -> Vec<(NodeId, Error)> {
        (0..self.failures.len())
            .filter(|&idx| self.failures[idx].is_some())
            .map(|idx| (self.snapshot.nodes()[idx].id.clone(), self.failure_error(idx)))
            .collect()
    }

    /// Whether every node resolved
    pub fn is_complete(&self) -> bool {
        self.failures.iter().all(Option::is_none)
    }
}
