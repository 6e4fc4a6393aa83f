//! # Spawn Set Reconciler
//!
//! Keeps the set of world objects the host displays in step with the latest
//! world data from the server.
//!
//! ## Pass Structure
//!
//! ```text
//! 1. REMOVE  ids displayed but absent from the fresh set        -> destroy
//! 2. CREATE  ids in the fresh set, not displayed, position known -> instantiate
//! 3. TOGGLE  ids in both                                        -> show/hide by distance
//! ```
//!
//! Removal runs first so an id the server reuses for a different kind of
//! object never has two live handles.
//!
//! Entities without a resolved position are neither created nor toggled, but
//! their id still counts as present: a displayed object whose id comes back
//! unresolved is left exactly as it was.
//!
//! Distances are recomputed on every pass, nothing is cached between passes.

use std::collections::{HashMap, HashSet};

use geoquest_shared::{LatLng, SpawnKind, SpawnLocation};

use crate::metric::DistanceMetric;

/// A world object as far as the reconciler is concerned.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnEntity {
    /// Stable identifier.
    pub id: String,
    /// Object category.
    pub kind: SpawnKind,
    /// Snapped position, `None` until the server resolves it.
    pub position: Option<LatLng>,
}

impl SpawnEntity {
    /// Creates an entity.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: SpawnKind, position: Option<LatLng>) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
        }
    }
}

impl From<&SpawnLocation> for SpawnEntity {
    fn from(location: &SpawnLocation) -> Self {
        Self {
            id: location.id.clone(),
            kind: location.kind,
            position: location.snapped_point,
        }
    }
}

/// Host side of the reconciler: owns what is actually on screen.
pub trait SpawnRenderer {
    /// Live object handle.
    type Handle;

    /// Instantiates the object for `entity` at `position`.
    fn instantiate(&mut self, entity: &SpawnEntity, position: LatLng, visible: bool)
        -> Self::Handle;

    /// Destroys a live object.
    fn destroy(&mut self, id: &str, handle: Self::Handle);

    /// Shows or hides a live object.
    fn set_visible(&mut self, handle: &mut Self::Handle, visible: bool);
}

/// One live object.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnedEntry<H> {
    /// Host handle.
    pub handle: H,
    /// Category it was created as.
    pub kind: SpawnKind,
    /// Position at the last pass.
    pub position: LatLng,
    /// Visibility applied at the last pass.
    pub visible: bool,
}

/// An object to instantiate.
#[derive(Clone, Debug, PartialEq)]
pub struct Creation {
    /// The entity, with a resolved position.
    pub entity: SpawnEntity,
    /// Resolved position.
    pub position: LatLng,
    /// Initial visibility.
    pub visible: bool,
}

/// A visibility update for a live object.
#[derive(Clone, Debug, PartialEq)]
pub struct Toggle {
    /// Object id.
    pub id: String,
    /// Fresh position.
    pub position: LatLng,
    /// Visibility to apply.
    pub visible: bool,
}

/// What a pass will do, computed without touching the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Ids to destroy, applied first.
    pub remove: Vec<String>,
    /// Objects to instantiate, applied second.
    pub create: Vec<Creation>,
    /// Visibility updates, applied last.
    pub toggle: Vec<Toggle>,
    /// Incoming entities skipped for lack of a position.
    pub skipped_unresolved: usize,
    /// Incoming entities skipped because their id already appeared.
    pub skipped_duplicates: usize,
}

impl ReconcilePlan {
    /// Returns true if the pass changes the set of live objects.
    #[must_use]
    pub fn changes_membership(&self) -> bool {
        !self.remove.is_empty() || !self.create.is_empty()
    }
}

/// Outcome of an applied pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
    /// Destroyed ids, in order.
    pub removed: Vec<String>,
    /// Created ids with their initial visibility, in order.
    pub created: Vec<(String, bool)>,
    /// Toggled ids with the visibility applied, in order.
    pub toggled: Vec<(String, bool)>,
    /// Incoming entities skipped for lack of a position.
    pub skipped_unresolved: usize,
    /// Incoming entities skipped as duplicates.
    pub skipped_duplicates: usize,
}

impl ReconcileReport {
    /// Live objects visible after the pass.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.created
            .iter()
            .chain(self.toggled.iter())
            .filter(|(_, visible)| *visible)
            .count()
    }
}

/// Registry of live objects keyed by id. At most one handle per id.
#[derive(Debug)]
pub struct SpawnRegistry<H> {
    entries: HashMap<String, SpawnedEntry<H>>,
}

impl<H> Default for SpawnRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SpawnRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `id` is live.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Looks up a live object.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SpawnedEntry<H>> {
        self.entries.get(id)
    }

    /// Iterates over live ids in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Computes a pass without applying it.
    pub fn plan<M: DistanceMetric>(
        &self,
        incoming: &[SpawnEntity],
        reference: LatLng,
        max_distance: f64,
        metric: &M,
    ) -> ReconcilePlan {
        let mut plan = ReconcilePlan::default();
        let mut seen: HashSet<&str> = HashSet::with_capacity(incoming.len());
        let visible = |position: LatLng| metric.distance(reference, position) <= max_distance;

        for entity in incoming {
            if !seen.insert(entity.id.as_str()) {
                tracing::debug!("Duplicate spawn id {} in incoming set", entity.id);
                plan.skipped_duplicates += 1;
                continue;
            }
            let Some(position) = entity.position else {
                plan.skipped_unresolved += 1;
                continue;
            };

            match self.entries.get(&entity.id) {
                Some(entry) if entry.kind == entity.kind => plan.toggle.push(Toggle {
                    id: entity.id.clone(),
                    position,
                    visible: visible(position),
                }),
                Some(entry) => {
                    tracing::debug!(
                        "Spawn id {} reused: {} -> {}",
                        entity.id,
                        entry.kind,
                        entity.kind
                    );
                    plan.remove.push(entity.id.clone());
                    plan.create.push(Creation {
                        entity: entity.clone(),
                        position,
                        visible: visible(position),
                    });
                }
                None => plan.create.push(Creation {
                    entity: entity.clone(),
                    position,
                    visible: visible(position),
                }),
            }
        }

        let mut missing: Vec<String> = self
            .entries
            .keys()
            .filter(|id| !seen.contains(id.as_str()))
            .cloned()
            .collect();
        missing.sort_unstable();
        plan.remove.extend(missing);

        plan
    }

    /// Applies a pass: removes, then creates, then toggles.
    pub fn apply<R>(&mut self, plan: ReconcilePlan, renderer: &mut R) -> ReconcileReport
    where
        R: SpawnRenderer<Handle = H>,
    {
        let mut report = ReconcileReport {
            skipped_unresolved: plan.skipped_unresolved,
            skipped_duplicates: plan.skipped_duplicates,
            ..ReconcileReport::default()
        };

        for id in plan.remove {
            if let Some(entry) = self.entries.remove(&id) {
                renderer.destroy(&id, entry.handle);
                report.removed.push(id);
            }
        }

        for creation in plan.create {
            let handle = renderer.instantiate(&creation.entity, creation.position, creation.visible);
            let id = creation.entity.id;
            self.entries.insert(
                id.clone(),
                SpawnedEntry {
                    handle,
                    kind: creation.entity.kind,
                    position: creation.position,
                    visible: creation.visible,
                },
            );
            report.created.push((id, creation.visible));
        }

        for toggle in plan.toggle {
            if let Some(entry) = self.entries.get_mut(&toggle.id) {
                renderer.set_visible(&mut entry.handle, toggle.visible);
                entry.visible = toggle.visible;
                entry.position = toggle.position;
                report.toggled.push((toggle.id, toggle.visible));
            }
        }

        tracing::debug!(
            "Reconciled spawns: {} removed, {} created, {} toggled ({} visible), {} unresolved",
            report.removed.len(),
            report.created.len(),
            report.toggled.len(),
            report.visible_count(),
            report.skipped_unresolved
        );

        report
    }

    /// Plans and applies a pass in one go.
    pub fn reconcile<M, R>(
        &mut self,
        incoming: &[SpawnEntity],
        reference: LatLng,
        max_distance: f64,
        metric: &M,
        renderer: &mut R,
    ) -> ReconcileReport
    where
        M: DistanceMetric,
        R: SpawnRenderer<Handle = H>,
    {
        let plan = self.plan(incoming, reference, max_distance, metric);
        self.apply(plan, renderer)
    }

    /// Destroys every live object. Returns the ids destroyed.
    pub fn clear<R>(&mut self, renderer: &mut R) -> Vec<String>
    where
        R: SpawnRenderer<Handle = H>,
    {
        let mut ids: Vec<String> = Vec::with_capacity(self.entries.len());
        for (id, entry) in self.entries.drain() {
            renderer.destroy(&id, entry.handle);
            ids.push(id);
        }
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Planar;

    /// Records every call; handles are sequence numbers.
    #[derive(Default)]
    struct FakeRenderer {
        next: u32,
        live: HashMap<u32, (String, bool)>,
        destroyed: Vec<String>,
        visibility_calls: usize,
    }

    impl SpawnRenderer for FakeRenderer {
        type Handle = u32;

        fn instantiate(&mut self, entity: &SpawnEntity, _position: LatLng, visible: bool) -> u32 {
            self.next += 1;
            self.live.insert(self.next, (entity.id.clone(), visible));
            self.next
        }

        fn destroy(&mut self, id: &str, handle: u32) {
            assert!(self.live.remove(&handle).is_some(), "double destroy of {id}");
            self.destroyed.push(id.to_owned());
        }

        fn set_visible(&mut self, handle: &mut u32, visible: bool) {
            self.visibility_calls += 1;
            if let Some(entry) = self.live.get_mut(handle) {
                entry.1 = visible;
            }
        }
    }

    fn at(lat: f64, lng: f64) -> Option<LatLng> {
        Some(LatLng::new(lat, lng))
    }

    fn minion(id: &str, position: Option<LatLng>) -> SpawnEntity {
        SpawnEntity::new(id, SpawnKind::Minion, position)
    }

    #[test]
    fn test_create_new_entity() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();

        let report = registry.reconcile(
            &[minion("a", at(10.0, 10.0))],
            LatLng::new(0.0, 0.0),
            1.0,
            &Planar,
            &mut renderer,
        );

        assert_eq!(report.created, vec![("a".to_owned(), false)]);
        assert!(registry.contains("a"));
        assert_eq!(renderer.live.len(), 1);
    }

    #[test]
    fn test_remove_missing_entity() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        registry.reconcile(&[minion("a", at(0.0, 0.0))], LatLng::default(), 5.0, &Planar, &mut renderer);

        let report = registry.reconcile(&[], LatLng::default(), 5.0, &Planar, &mut renderer);

        assert_eq!(report.removed, vec!["a"]);
        assert!(registry.is_empty());
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn test_toggle_visible_within_range() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        let incoming = [minion("a", at(0.0, 0.0))];
        registry.reconcile(&incoming, LatLng::new(0.0, 0.0), 5.0, &Planar, &mut renderer);

        let report = registry.reconcile(&incoming, LatLng::new(0.0, 0.0), 5.0, &Planar, &mut renderer);

        assert_eq!(report.toggled, vec![("a".to_owned(), true)]);
        assert!(registry.get("a").unwrap().visible);
    }

    #[test]
    fn test_toggle_hidden_out_of_range() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        let incoming = [minion("a", at(0.0, 0.0))];
        registry.reconcile(&incoming, LatLng::new(0.0, 0.0), 5.0, &Planar, &mut renderer);

        let report = registry.reconcile(&incoming, LatLng::new(100.0, 100.0), 5.0, &Planar, &mut renderer);

        assert_eq!(report.toggled, vec![("a".to_owned(), false)]);
        assert!(report.removed.is_empty());
        // Hidden objects stay registered
        assert!(registry.contains("a"));
        assert!(!registry.get("a").unwrap().visible);
    }

    #[test]
    fn test_skip_unresolved() {
        let mut registry: SpawnRegistry<u32> = SpawnRegistry::new();
        let plan = registry.plan(&[minion("b", None)], LatLng::default(), 5.0, &Planar);

        assert!(plan.create.is_empty());
        assert_eq!(plan.skipped_unresolved, 1);

        let mut renderer = FakeRenderer::default();
        registry.apply(plan, &mut renderer);
        assert!(!registry.contains("b"));
    }

    #[test]
    fn test_unresolved_later_resolved_is_created() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();

        registry.reconcile(&[minion("b", None)], LatLng::default(), 5.0, &Planar, &mut renderer);
        let report = registry.reconcile(&[minion("b", at(1.0, 1.0))], LatLng::default(), 5.0, &Planar, &mut renderer);

        assert_eq!(report.created, vec![("b".to_owned(), true)]);
    }

    #[test]
    fn test_live_entity_returning_unresolved_is_kept() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        let reference = LatLng::default();

        registry.reconcile(
            &[SpawnEntity::new("a", SpawnKind::Chest, at(1.0, 1.0))],
            reference,
            5.0,
            &Planar,
            &mut renderer,
        );
        let plan = registry.plan(
            &[SpawnEntity::new("a", SpawnKind::Chest, None)],
            reference,
            5.0,
            &Planar,
        );
        assert!(!plan.changes_membership());
        assert!(plan.toggle.is_empty());

        let report = registry.apply(plan, &mut renderer);
        assert!(report.removed.is_empty());
        assert_eq!(report.skipped_unresolved, 1);
        assert!(renderer.destroyed.is_empty());

        let entry = registry.get("a").unwrap();
        assert_eq!(entry.position, LatLng::new(1.0, 1.0));
        assert!(entry.visible);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        let incoming = [
            minion("a", at(0.0, 0.0)),
            SpawnEntity::new("b", SpawnKind::Chest, at(3.0, 4.0)),
            SpawnEntity::new("c", SpawnKind::Tower, at(30.0, 40.0)),
            minion("d", None),
        ];
        let reference = LatLng::new(0.0, 0.0);

        let first = registry.reconcile(&incoming, reference, 5.0, &Planar, &mut renderer);
        assert_eq!(first.created.len(), 3);

        let second = registry.reconcile(&incoming, reference, 5.0, &Planar, &mut renderer);
        assert!(second.created.is_empty());
        assert!(second.removed.is_empty());

        let mut toggled = second.toggled.clone();
        toggled.sort();
        let mut created = first.created.clone();
        created.sort();
        assert_eq!(toggled, created);
    }

    #[test]
    fn test_reused_id_with_new_kind_replaces_handle() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        registry.reconcile(&[minion("a", at(0.0, 0.0))], LatLng::default(), 5.0, &Planar, &mut renderer);
        let old_handle = registry.get("a").unwrap().handle;

        let report = registry.reconcile(
            &[SpawnEntity::new("a", SpawnKind::Chest, at(0.0, 0.0))],
            LatLng::default(),
            5.0,
            &Planar,
            &mut renderer,
        );

        assert_eq!(report.removed, vec!["a"]);
        assert_eq!(report.created, vec![("a".to_owned(), true)]);
        let entry = registry.get("a").unwrap();
        assert_ne!(entry.handle, old_handle);
        assert_eq!(entry.kind, SpawnKind::Chest);
        // The stale handle was destroyed, only one object is live
        assert_eq!(renderer.live.len(), 1);
    }

    #[test]
    fn test_duplicate_incoming_ids_keep_first() {
        let registry: SpawnRegistry<u32> = SpawnRegistry::new();
        let plan = registry.plan(
            &[minion("a", at(0.0, 0.0)), minion("a", at(50.0, 50.0))],
            LatLng::default(),
            5.0,
            &Planar,
        );

        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.create[0].position, LatLng::new(0.0, 0.0));
        assert_eq!(plan.skipped_duplicates, 1);
    }

    #[test]
    fn test_toggle_updates_position_and_recomputes_distance() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        registry.reconcile(&[minion("a", at(0.0, 0.0))], LatLng::default(), 5.0, &Planar, &mut renderer);

        // The object moved out of range on the server
        let report = registry.reconcile(&[minion("a", at(0.0, 9.0))], LatLng::default(), 5.0, &Planar, &mut renderer);

        assert_eq!(report.toggled, vec![("a".to_owned(), false)]);
        assert_eq!(registry.get("a").unwrap().position, LatLng::new(0.0, 9.0));
    }

    #[test]
    fn test_boundary_distance_is_visible() {
        let registry: SpawnRegistry<u32> = SpawnRegistry::new();
        let plan = registry.plan(&[minion("a", at(3.0, 4.0))], LatLng::default(), 5.0, &Planar);
        assert!(plan.create[0].visible);
    }

    #[test]
    fn test_clear_destroys_everything() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        registry.reconcile(
            &[minion("b", at(0.0, 0.0)), minion("a", at(1.0, 1.0))],
            LatLng::default(),
            5.0,
            &Planar,
            &mut renderer,
        );

        assert_eq!(registry.clear(&mut renderer), vec!["a", "b"]);
        assert!(registry.is_empty());
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn test_removals_applied_before_creations() {
        let mut registry = SpawnRegistry::new();
        let mut renderer = FakeRenderer::default();
        registry.reconcile(&[minion("old", at(0.0, 0.0))], LatLng::default(), 5.0, &Planar, &mut renderer);

        registry.reconcile(&[minion("new", at(0.0, 0.0))], LatLng::default(), 5.0, &Planar, &mut renderer);

        assert_eq!(renderer.destroyed, vec!["old"]);
        assert_eq!(renderer.next, 2);
        assert_eq!(renderer.visibility_calls, 0);
    }
}
