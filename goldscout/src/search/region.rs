//! Region arena.
//!
//! Every rectangle the search ever creates lives in one contiguous `Vec`,
//! addressed by [`RegionId`]. Parents and children refer to each other by
//! index, so the tree has no ownership cycles and the queue can name a
//! region with a plain integer.

use std::fmt;
use std::ops::Index;

use crate::grid::Rect;

/// Index of a region in its [`RegionArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

impl RegionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rectangle tracked by the search, with its estimate and, once probed,
/// its true count.
#[derive(Debug, Clone)]
pub struct Region {
    rect: Rect,
    depth: u32,
    parent: Option<RegionId>,
    children: Vec<RegionId>,
    actual_count: Option<u64>,
    expected_density: f64,
    /// Sum of `actual_count` over explored children.
    explored_children_count: u64,
    /// Sum of areas over unexplored children.
    unexplored_children_area: u64,
}

impl Region {
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Plan level that splits this region.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    pub fn children(&self) -> &[RegionId] {
        &self.children
    }

    /// True count, available once the region has been probed.
    #[inline]
    pub fn actual_count(&self) -> Option<u64> {
        self.actual_count
    }

    #[inline]
    pub fn is_explored(&self) -> bool {
        self.actual_count.is_some()
    }

    /// Current estimate of treasures per cell.
    #[inline]
    pub fn expected_density(&self) -> f64 {
        self.expected_density
    }

    /// Current estimate of treasures in the whole region.
    pub fn expected_count(&self) -> f64 {
        self.expected_density * self.rect.area() as f64
    }

    pub fn explored_children_count(&self) -> u64 {
        self.explored_children_count
    }

    pub fn unexplored_children_area(&self) -> u64 {
        self.unexplored_children_area
    }
}

/// Owner of every region created during one search.
#[derive(Debug, Default)]
pub struct RegionArena {
    regions: Vec<Region>,
}

impl RegionArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the explored root region covering `rect`.
    pub fn insert_root(&mut self, rect: Rect, count: u64) -> RegionId {
        self.insert(Region {
            rect,
            depth: 0,
            parent: None,
            children: Vec::new(),
            actual_count: Some(count),
            expected_density: count as f64 / rect.area() as f64,
            explored_children_count: 0,
            unexplored_children_area: 0,
        })
    }

    /// Creates an unexplored child of `parent` one level deeper.
    pub fn spawn_child(&mut self, parent: RegionId, rect: Rect, density: f64) -> RegionId {
        let depth = self[parent].depth + 1;
        let id = self.insert(Region {
            rect,
            depth,
            parent: Some(parent),
            children: Vec::new(),
            actual_count: None,
            expected_density: density,
            explored_children_count: 0,
            unexplored_children_area: 0,
        });
        let parent = &mut self.regions[parent.index()];
        parent.children.push(id);
        parent.unexplored_children_area += rect.area();
        id
    }

    fn insert(&mut self, region: Region) -> RegionId {
        let index = self.regions.len();
        assert!(index < u32::MAX as usize, "region arena is full");
        self.regions.push(region);
        RegionId(index as u32)
    }

    /// Records the true count of a probed region and folds it into its
    /// parent's running sums.
    ///
    /// # Panics
    ///
    /// Panics if the region was already explored.
    pub fn mark_explored(&mut self, id: RegionId, count: u64) {
        let region = &mut self.regions[id.index()];
        assert!(region.actual_count.is_none(), "region {} explored twice", id);
        region.actual_count = Some(count);
        let (area, parent) = (region.rect.area(), region.parent);

        if let Some(parent) = parent {
            let parent = &mut self.regions[parent.index()];
            parent.explored_children_count += count;
            parent.unexplored_children_area -= area;
        }
    }

    /// Density to assign to every unexplored child of `parent`: the
    /// treasures not yet accounted for, spread over the area not yet probed.
    ///
    /// Returns `None` when the parent is unexplored or has no unexplored
    /// children left.
    pub fn residual_density(&self, parent: RegionId) -> Option<f64> {
        let region = &self[parent];
        let total = region.actual_count?;
        if region.unexplored_children_area == 0 {
            return None;
        }
        let residual = total.saturating_sub(region.explored_children_count);
        Some(residual as f64 / region.unexplored_children_area as f64)
    }

    pub(crate) fn set_density(&mut self, id: RegionId, density: f64) {
        self.regions[id.index()].expected_density = density;
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over `(id, region)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(i, r)| (RegionId(i as u32), r))
    }
}

impl Index<RegionId> for RegionArena {
    type Output = Region;

    fn index(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Extent;

    fn quadrants(arena: &mut RegionArena, root: RegionId, density: f64) -> Vec<RegionId> {
        Rect::new(0, 0, 3, 3)
            .tiles(Extent::new(2, 2))
            .map(|rect| arena.spawn_child(root, rect, density))
            .collect()
    }

    #[test]
    fn test_root_is_explored() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 8);
        assert!(arena[root].is_explored());
        assert_eq!(arena[root].actual_count(), Some(8));
        assert_eq!(arena[root].depth(), 0);
        assert_eq!(arena[root].parent(), None);
        assert!((arena[root].expected_density() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_spawn_child_links_parent() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 4);
        let children = quadrants(&mut arena, root, 0.25);

        assert_eq!(arena.len(), 5);
        assert_eq!(arena[root].children(), children.as_slice());
        assert_eq!(arena[root].unexplored_children_area(), 16);
        for &child in &children {
            assert_eq!(arena[child].parent(), Some(root));
            assert_eq!(arena[child].depth(), 1);
            assert!(!arena[child].is_explored());
            assert!((arena[child].expected_count() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mark_explored_updates_parent_sums() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 4);
        let children = quadrants(&mut arena, root, 0.25);

        arena.mark_explored(children[0], 3);
        assert_eq!(arena[root].explored_children_count(), 3);
        assert_eq!(arena[root].unexplored_children_area(), 12);

        let residual = arena.residual_density(root).unwrap();
        assert!((residual - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_residual_density_none_when_all_explored() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 0);
        for child in quadrants(&mut arena, root, 0.0) {
            arena.mark_explored(child, 0);
        }
        assert_eq!(arena.residual_density(root), None);
    }

    #[test]
    fn test_residual_density_none_for_unexplored_parent() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 1);
        let child = quadrants(&mut arena, root, 0.0625)[0];
        arena.spawn_child(child, Rect::cell(0, 0), 0.0);
        assert_eq!(arena.residual_density(child), None);
    }

    #[test]
    #[should_panic(expected = "explored twice")]
    fn test_double_exploration_panics() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 0);
        let child = quadrants(&mut arena, root, 0.0)[0];
        arena.mark_explored(child, 0);
        arena.mark_explored(child, 0);
    }

    #[test]
    fn test_iter_in_creation_order() {
        let mut arena = RegionArena::new();
        let root = arena.insert_root(Rect::new(0, 0, 3, 3), 0);
        quadrants(&mut arena, root, 0.0);
        let ids: Vec<_> = arena.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert!(arena.get(RegionId(9)).is_none());
    }
}
