//! Sectioned list snapshots and the diff between two of them
//!
//! A [`Snapshot`] is the complete, ordered state of one list view. Two
//! snapshots are reconciled with [`diff`], which compares items by their list
//! identity only and reports what a view has to insert, remove and move.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Section labels of a list. The set is closed and known at compile time.
pub trait SectionKind: Copy + Eq + Hash + Debug + 'static {
    const ALL: &'static [Self];
}

/// An item that can be placed in a snapshot
pub trait SnapshotItem: Clone {
    type Id: Clone + Eq + Hash + Debug;

    fn item_id(&self) -> &Self::Id;
}

/// Where an item sits inside a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemPosition<S> {
    pub section: S,
    pub index: usize,
}

#[derive(Clone, Debug)]
pub struct Snapshot<S, I> {
    sections: Vec<(S, Vec<I>)>,
}

impl<S: SectionKind, I: SnapshotItem> Default for Snapshot<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SectionKind, I: SnapshotItem> Snapshot<S, I> {
    /// An empty snapshot with every section present, in declaration order
    pub fn new() -> Self {
        Self {
            sections: S::ALL.iter().map(|s| (*s, Vec::new())).collect(),
        }
    }

    /// Append items to the end of `section`.
    ///
    /// Items whose id is already present anywhere in the snapshot are skipped
    /// and returned, so a snapshot never holds the same id twice.
    pub fn append_items(&mut self, section: S, items: impl IntoIterator<Item = I>) -> Vec<I> {
        let mut seen: HashSet<I::Id> = self.item_ids().into_iter().collect();
        let mut rejected = Vec::new();
        let Some((_, target)) = self.sections.iter_mut().find(|(s, _)| *s == section) else {
            return items.into_iter().collect();
        };

        for item in items {
            if seen.insert(item.item_id().clone()) {
                target.push(item);
            } else {
                tracing::warn!(id = ?item.item_id(), "Duplicate item id rejected from snapshot");
                rejected.push(item);
            }
        }
        rejected
    }

    /// All items in display order, section by section
    pub fn all_items(&self) -> impl Iterator<Item = &I> + '_ {
        self.sections.iter().flat_map(|(_, items)| items.iter())
    }

    pub fn item_ids(&self) -> Vec<I::Id> {
        self.all_items().map(|i| i.item_id().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at a flat display index across all sections
    pub fn item_at(&self, index: usize) -> Option<&I> {
        self.all_items().nth(index)
    }

    /// Edit item contents in place. `f` must not change item ids.
    pub fn update_items(&mut self, mut f: impl FnMut(&mut I)) {
        for (_, items) in self.sections.iter_mut() {
            items.iter_mut().for_each(&mut f);
        }
    }
}

#[derive(Clone, Debug)]
pub struct MovedItem<S, I> {
    pub item: I,
    pub from: ItemPosition<S>,
    pub to: ItemPosition<S>,
}

/// Operations turning an old snapshot into a new one.
///
/// `inserted`, `moved` and `unchanged` follow the new snapshot's order,
/// `removed` follows the old snapshot's order.
#[derive(Clone, Debug)]
pub struct SnapshotDiff<S, I> {
    pub inserted: Vec<(I, ItemPosition<S>)>,
    pub removed: Vec<(I, ItemPosition<S>)>,
    pub moved: Vec<MovedItem<S, I>>,
    pub unchanged: Vec<I>,
}

impl<S, I> Default for SnapshotDiff<S, I> {
    fn default() -> Self {
        Self {
            inserted: Vec::new(),
            removed: Vec::new(),
            moved: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

impl<S, I> SnapshotDiff<S, I> {
    /// True when applying the diff would not change the view
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.inserted.len() + self.removed.len() + self.moved.len()
    }
}

/// Compute the operations that turn `old` into `new`.
///
/// Items are matched by id alone; content changes behind an unchanged id are
/// not reported. Among items present in both snapshots, the largest set that
/// keeps its relative order stays put and everything else is reported as
/// moved, so the number of moves is minimal.
pub fn diff<S, I>(old: &Snapshot<S, I>, new: &Snapshot<S, I>) -> SnapshotDiff<S, I>
where
    S: SectionKind,
    I: SnapshotItem,
{
    let old_index: HashMap<&I::Id, (usize, ItemPosition<S>)> = flatten(old)
        .enumerate()
        .map(|(flat, (pos, item))| (item.item_id(), (flat, pos)))
        .collect();
    let new_ids: HashSet<&I::Id> = new.all_items().map(|i| i.item_id()).collect();

    let mut result = SnapshotDiff::default();

    // Common items in new order, with their flat index in the old snapshot
    let mut common: Vec<(usize, ItemPosition<S>, ItemPosition<S>, &I)> = Vec::new();
    for (to, item) in flatten(new) {
        match old_index.get(item.item_id()) {
            Some((flat, from)) => common.push((*flat, *from, to, item)),
            None => result.inserted.push((item.clone(), to)),
        }
    }

    for (from, item) in flatten(old) {
        if !new_ids.contains(item.item_id()) {
            result.removed.push((item.clone(), from));
        }
    }

    let old_order: Vec<usize> = common.iter().map(|(flat, ..)| *flat).collect();
    let keep = longest_increasing_subsequence(&old_order);

    for (i, (_, from, to, item)) in common.into_iter().enumerate() {
        if keep[i] && from.section == to.section {
            result.unchanged.push(item.clone());
        } else {
            result.moved.push(MovedItem {
                item: item.clone(),
                from,
                to,
            });
        }
    }

    result
}

fn flatten<S: SectionKind, I: SnapshotItem>(
    snapshot: &Snapshot<S, I>,
) -> impl Iterator<Item = (ItemPosition<S>, &I)> + '_ {
    snapshot.sections.iter().flat_map(|(section, items)| {
        items
            .iter()
            .enumerate()
            .map(move |(index, item)| (ItemPosition { section: *section, index }, item))
    })
}

/// Mark the members of one longest strictly increasing subsequence.
///
/// Patience sorting with predecessor links, O(n log n). Ties resolve to the
/// earliest candidate, so the result depends only on the input sequence.
fn longest_increasing_subsequence(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&t| seq[t] < *value);
        if slot > 0 {
            prev[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut keep = vec![false; seq.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        keep[i] = true;
        cursor = prev[i];
    }
    keep
}
