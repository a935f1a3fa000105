//! # Container Resolver
//!
//! Cardinality-parameterized blocks (grid, tabs, carousel, card) own a set
//! of named child containers whose shape follows their properties. A
//! descriptor describes the desired shape as a [`ContainerPlan`];
//! [`reconcile_containers`] brings an existing container list in line with
//! it while keeping container identity stable:
//!
//! - same length: containers untouched (titles refreshed)
//! - grow: existing containers stay index-aligned, new empty ones appended
//! - shrink: the first *N* stay; trailing containers are discarded with
//!   their subtrees, or their children migrate into the last remaining
//!   container under [`ShrinkPolicy::MigrateToLast`]
//!
//! Named plans (card sections) match existing containers by slot tag
//! instead of by index.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Block, BlockId, ChildContainer, ContainerId, ContainerKind};

/// Upper bound on generated containers unless configured otherwise
pub const DEFAULT_MAX_CONTAINERS: usize = 64;

/// What happens to the content of containers removed by a shrink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkPolicy {
    /// Drop removed containers together with their subtrees
    #[default]
    Discard,
    /// Move children of removed containers into the last remaining one
    MigrateToLast,
}

/// Engine-wide tuning shared by the registry and the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub shrink_policy: ShrinkPolicy,
    pub max_containers: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            shrink_policy: ShrinkPolicy::Discard,
            max_containers: DEFAULT_MAX_CONTAINERS,
        }
    }
}

/// One desired container slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    pub kind: ContainerKind,
    pub title: Option<String>,
}

impl SlotSpec {
    pub fn new(kind: ContainerKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: Some(title.into()),
        }
    }
}

/// Desired slot layout of a block
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerPlan {
    /// No children at all
    Leaf,
    /// One default slot backed by `Block::children`
    Children,
    /// Positional containers; existing ones are matched by index
    Indexed(Vec<SlotSpec>),
    /// Semantic sections; existing ones are matched by slot tag
    Named(Vec<SlotSpec>),
}

impl ContainerPlan {
    /// `count` positional containers of one kind titled by `title(i)`
    pub fn indexed(count: usize, kind: ContainerKind, title: impl Fn(usize) -> String) -> Self {
        ContainerPlan::Indexed(
            (0..count)
                .map(|i| SlotSpec::new(kind.clone(), title(i)))
                .collect(),
        )
    }

    /// True for plans that are backed by `Block::containers`
    pub fn uses_containers(&self) -> bool {
        matches!(self, ContainerPlan::Indexed(_) | ContainerPlan::Named(_))
    }
}

/// Read a cardinality property, clamped to `max`. Non-numeric or missing
/// values yield `None`.
pub fn count_property(block: &Block, name: &str, max: usize) -> Option<usize> {
    let value = block.property(name)?;
    let count = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .or_else(|| n.as_i64().map(|_| 0))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Some((count as usize).min(max))
}

/// Outcome of reconciling one block's containers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileDiff {
    pub block_id: Option<BlockId>,
    pub added: Vec<ContainerId>,
    pub removed: Vec<ContainerId>,
    /// Top-level blocks moved out of removed containers
    pub migrated: Vec<BlockId>,
    /// Number of blocks destroyed with removed containers
    pub dropped_blocks: usize,
}

impl ReconcileDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The warning callers should surface, if content was lost
    pub fn warning(&self) -> Option<Warning> {
        if self.dropped_blocks == 0 {
            return None;
        }
        Some(Warning::ContainerCardinalityReconciled {
            block_id: self.block_id.clone(),
            removed: self.removed.clone(),
            dropped_blocks: self.dropped_blocks,
        })
    }
}

/// Non-fatal signals raised while editing
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A shrink discarded non-empty containers
    ContainerCardinalityReconciled {
        block_id: Option<BlockId>,
        removed: Vec<ContainerId>,
        dropped_blocks: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ContainerCardinalityReconciled {
                block_id,
                removed,
                dropped_blocks,
            } => {
                write!(
                    f,
                    "removed {} container(s) and {} block(s)",
                    removed.len(),
                    dropped_blocks
                )?;
                if let Some(id) = block_id {
                    write!(f, " from {id}")?;
                }
                Ok(())
            }
        }
    }
}

/// Result of [`reconcile_containers`]
#[derive(Debug)]
pub struct Reconciled {
    pub containers: Vec<ChildContainer>,
    /// Containers that no longer exist. Their children are already gone
    /// when they were migrated.
    pub removed: Vec<ChildContainer>,
    pub diff: ReconcileDiff,
}

/// Bring `existing` in line with `plan`.
///
/// Container ids and children survive whenever their slot survives. Leaf
/// and `Children` plans remove every container.
pub fn reconcile_containers(
    existing: Vec<ChildContainer>,
    plan: &ContainerPlan,
    policy: ShrinkPolicy,
) -> Reconciled {
    let (mut containers, mut removed, added) = match plan {
        ContainerPlan::Leaf | ContainerPlan::Children => (Vec::new(), existing, Vec::new()),
        ContainerPlan::Indexed(specs) => reconcile_indexed(existing, specs),
        ContainerPlan::Named(specs) => reconcile_named(existing, specs),
    };

    let mut diff = ReconcileDiff {
        added,
        removed: removed.iter().map(|c| c.id.clone()).collect(),
        ..ReconcileDiff::default()
    };

    match (policy, containers.last_mut()) {
        (ShrinkPolicy::MigrateToLast, Some(last)) => {
            for container in &mut removed {
                diff.migrated
                    .extend(container.children.iter().map(|b| b.id.clone()));
                last.children.append(&mut container.children);
            }
        }
        _ => {
            diff.dropped_blocks = removed.iter().map(ChildContainer::subtree_len).sum();
        }
    }

    Reconciled {
        containers,
        removed,
        diff,
    }
}

type Split = (Vec<ChildContainer>, Vec<ChildContainer>, Vec<ContainerId>);

fn reconcile_indexed(existing: Vec<ChildContainer>, specs: &[SlotSpec]) -> Split {
    let mut kept = existing;
    let removed = if kept.len() > specs.len() {
        kept.split_off(specs.len())
    } else {
        Vec::new()
    };

    for (container, spec) in kept.iter_mut().zip(specs) {
        container.kind = spec.kind.clone();
        container.title = spec.title.clone();
    }

    let mut added = Vec::new();
    for spec in &specs[kept.len()..] {
        let container = ChildContainer::empty(spec.kind.clone(), spec.title.clone());
        added.push(container.id.clone());
        kept.push(container);
    }

    (kept, removed, added)
}

fn reconcile_named(existing: Vec<ChildContainer>, specs: &[SlotSpec]) -> Split {
    let mut pool: Vec<Option<ChildContainer>> = existing.into_iter().map(Some).collect();
    let mut kept = Vec::with_capacity(specs.len());
    let mut added = Vec::new();

    for spec in specs {
        let matched = pool
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|c| c.kind == spec.kind))
            .and_then(Option::take);

        let container = match matched {
            Some(mut container) => {
                container.title = spec.title.clone();
                container
            }
            None => {
                let container = ChildContainer::empty(spec.kind.clone(), spec.title.clone());
                added.push(container.id.clone());
                container
            }
        };
        kept.push(container);
    }

    let removed = pool.into_iter().flatten().collect();
    (kept, removed, added)
}
