//! Lazy, memoizing views over top-level collections.
//!
//! A [`CollectionView`] walks the root's children for one top-level tag and
//! parses each match on demand. With caching enabled, every parse result is
//! appended to a [`CollectionCache`] shared by all views of the same
//! collection, so a later traversal replays the cached slots and only parses
//! elements no earlier traversal reached. With caching disabled, each view
//! parses from the start and stores nothing.
//!
//! The cache lives in a `RefCell` owned by the document; views borrow it only
//! for the duration of one `next` call.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace, warn};

use gpx_model::{Element, ModelError, Record};

use crate::error::{GpxError, Result};
use crate::interpret::Interpreter;
use crate::options::{InvalidItemPolicy, ReaderOptions};
use crate::schema::{self, Schema};

/// A top-level repeated group of a GPX document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Waypoints,
    Routes,
    Tracks,
}

impl Collection {
    /// Tag of the root's children that belong to this collection.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Waypoints => "wpt",
            Self::Routes => "rte",
            Self::Tracks => "trk",
        }
    }

    /// Schema each item is parsed with.
    pub const fn schema(self) -> &'static Schema {
        match self {
            Self::Waypoints => &schema::WAYPOINT,
            Self::Routes => &schema::ROUTE,
            Self::Tracks => &schema::TRACK,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waypoints => "waypoints",
            Self::Routes => "routes",
            Self::Tracks => "tracks",
        }
    }

    /// Every collection, in document-model order.
    pub const fn all() -> [Self; 3] {
        [Self::Waypoints, Self::Routes, Self::Tracks]
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Waypoints => 0,
            Self::Routes => 1,
            Self::Tracks => 2,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|collection| collection.as_str() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

/// One memoization slot, aligned to the n-th matching element.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheSlot {
    Parsed(Record),
    /// The element failed to parse and was skipped; it is never reparsed.
    Skipped,
}

/// Parse results for one collection, in document order.
///
/// Slots past the end are unparsed. Slots are only ever appended.
#[derive(Debug, Default)]
pub struct CollectionCache {
    slots: Vec<CacheSlot>,
    /// Index into the root's children just past the last cached element.
    resume_at: usize,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[CacheSlot] {
        &self.slots
    }

    fn push(&mut self, slot: CacheSlot, next_child: usize) {
        self.slots.push(slot);
        self.resume_at = next_child;
    }
}

/// A restartable traversal of one top-level collection.
///
/// Yields `Ok(record)` per item. Under [`InvalidItemPolicy::Fail`] a parse
/// failure is yielded once as `Err` and the view is exhausted afterwards.
pub struct CollectionView<'d> {
    root: &'d Element,
    collection: Collection,
    interpreter: Interpreter<'d>,
    cache: Option<&'d RefCell<CollectionCache>>,
    on_invalid: InvalidItemPolicy,
    /// Next cache slot to replay.
    ordinal: usize,
    /// Next root child to scan when caching is disabled.
    position: usize,
    resumed: bool,
    done: bool,
}

impl<'d> CollectionView<'d> {
    /// View over `root`'s `collection`, memoized in `cache` when
    /// `options.cache` is set.
    pub fn new(
        root: &'d Element,
        collection: Collection,
        interpreter: Interpreter<'d>,
        cache: &'d RefCell<CollectionCache>,
        options: ReaderOptions,
    ) -> Self {
        debug!(
            collection = %collection,
            cache = options.cache,
            cached = cache.borrow().len(),
            "starting traversal"
        );
        Self {
            root,
            collection,
            interpreter,
            cache: options.cache.then_some(cache),
            on_invalid: options.on_invalid,
            ordinal: 0,
            position: 0,
            resumed: false,
            done: false,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Convert each record into a typed value.
    pub fn typed<T>(self) -> impl Iterator<Item = Result<T>>
    where
        T: for<'r> TryFrom<&'r Record, Error = ModelError>,
    {
        self.map(|item| item.and_then(|record| T::try_from(&record).map_err(GpxError::from)))
    }

    /// Replay the next cached slot, if any. `Some(None)` is a skipped slot.
    fn replay(&mut self) -> Option<Option<Record>> {
        let cache = self.cache?.borrow();
        let slot = cache.slots.get(self.ordinal)?;
        self.ordinal += 1;
        match slot {
            CacheSlot::Parsed(record) => Some(Some(record.clone())),
            CacheSlot::Skipped => Some(None),
        }
    }

    fn scan_start(&self) -> usize {
        match self.cache {
            Some(cache) => cache.borrow().resume_at,
            None => self.position,
        }
    }

    fn next_match(&self, start: usize) -> Option<(usize, &'d Element)> {
        let tag = self.collection.tag();
        let namespace = self.interpreter.namespace();
        self.root
            .children
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, child)| child.is(namespace, tag))
    }
}

impl Iterator for CollectionView<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            match self.replay() {
                Some(Some(record)) => return Some(Ok(record)),
                Some(None) => continue,
                None => {}
            }

            let start = self.scan_start();
            if !self.resumed {
                self.resumed = true;
                debug!(
                    collection = %self.collection,
                    replayed = self.ordinal,
                    child = start,
                    "resuming scan"
                );
            }

            let Some((index, element)) = self.next_match(start) else {
                self.done = true;
                return None;
            };

            let slot = match self.interpreter.parse(element, self.collection.schema()) {
                Ok(record) => {
                    trace!(collection = %self.collection, child = index, "parsed item");
                    CacheSlot::Parsed(record)
                }
                Err(error) => match self.on_invalid {
                    InvalidItemPolicy::Fail => {
                        self.done = true;
                        return Some(Err(error));
                    }
                    InvalidItemPolicy::Skip => {
                        warn!(
                            collection = %self.collection,
                            child = index,
                            error = %error,
                            "skipping invalid item"
                        );
                        CacheSlot::Skipped
                    }
                },
            };

            match self.cache {
                Some(cache) => {
                    cache.borrow_mut().push(slot.clone(), index + 1);
                    self.ordinal += 1;
                }
                None => self.position = index + 1,
            }

            if let CacheSlot::Parsed(record) = slot {
                return Some(Ok(record));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::default_registry;
    use crate::schema::GPX_NAMESPACE;

    fn root() -> Element {
        let point = |lat: &str| {
            Element::namespaced(GPX_NAMESPACE, "wpt")
                .with_attribute("lat", lat)
                .with_attribute("lon", "0")
        };
        Element::namespaced(GPX_NAMESPACE, "gpx")
            .with_child(point("1"))
            .with_child(Element::namespaced(GPX_NAMESPACE, "rte"))
            .with_child(point("2"))
            .with_child(point("95"))
            .with_child(point("3"))
    }

    fn latitudes(view: CollectionView<'_>) -> Vec<Option<f64>> {
        view.map(|item| item.ok().and_then(|record| record.decimal("lat")))
            .collect()
    }

    #[test]
    fn collection_tokens() {
        assert_eq!("tracks".parse::<Collection>(), Ok(Collection::Tracks));
        assert_eq!(Collection::Tracks.tag(), "trk");
        assert!("trk".parse::<Collection>().is_err());
    }

    #[test]
    fn fail_policy_stops_at_first_error() {
        let root = root();
        let registry = default_registry();
        let cache = RefCell::new(CollectionCache::new());
        let view = CollectionView::new(
            &root,
            Collection::Waypoints,
            Interpreter::new(&registry),
            &cache,
            ReaderOptions::default(),
        );
        assert_eq!(latitudes(view), [Some(1.0), Some(2.0), None]);
        assert_eq!(cache.borrow().len(), 2);
    }

    #[test]
    fn skip_policy_records_skipped_slot() {
        let root = root();
        let registry = default_registry();
        let cache = RefCell::new(CollectionCache::new());
        let options = ReaderOptions::default().with_invalid_policy(InvalidItemPolicy::Skip);
        let view = CollectionView::new(
            &root,
            Collection::Waypoints,
            Interpreter::new(&registry),
            &cache,
            options,
        );
        assert_eq!(latitudes(view), [Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(cache.borrow().slots()[2], CacheSlot::Skipped);
        assert_eq!(cache.borrow().resume_at, 5);
    }

    #[test]
    fn partial_traversal_resumes_after_cache() {
        let root = root();
        let registry = default_registry();
        let cache = RefCell::new(CollectionCache::new());
        let options = ReaderOptions::default().with_invalid_policy(InvalidItemPolicy::Skip);
        let view = || {
            CollectionView::new(
                &root,
                Collection::Waypoints,
                Interpreter::new(&registry),
                &cache,
                options,
            )
        };

        let first: Vec<_> = view().take(1).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(cache.borrow().len(), 1);
        assert_eq!(cache.borrow().resume_at, 1);

        assert_eq!(latitudes(view()), [Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(cache.borrow().len(), 4);
    }

    #[test]
    fn view_follows_interpreter_namespace() {
        const GPX_1_0: &str = "http://www.topografix.com/GPX/1/0";
        let point = Element::namespaced(GPX_1_0, "wpt")
            .with_attribute("lat", "4")
            .with_attribute("lon", "5");
        let root = Element::namespaced(GPX_1_0, "gpx")
            .with_child(point.clone())
            .with_child(Element::namespaced(GPX_NAMESPACE, "wpt"))
            .with_child(point);
        let registry = default_registry();
        let cache = RefCell::new(CollectionCache::new());
        let view = CollectionView::new(
            &root,
            Collection::Waypoints,
            Interpreter::new(&registry).with_namespace(GPX_1_0),
            &cache,
            ReaderOptions::default(),
        );
        assert_eq!(latitudes(view), [Some(4.0), Some(4.0)]);
        assert_eq!(cache.borrow().resume_at, 3);
    }

    #[test]
    fn uncached_view_leaves_cache_empty() {
        let root = root();
        let registry = default_registry();
        let cache = RefCell::new(CollectionCache::new());
        let view = CollectionView::new(
            &root,
            Collection::Routes,
            Interpreter::new(&registry),
            &cache,
            ReaderOptions::uncached(),
        );
        assert_eq!(view.count(), 1);
        assert!(cache.borrow().is_empty());
    }
}
