//! Memoization tests for collection views.
//!
//! A counting `latitude` coercion replaces the built-in one so each test can
//! tell how many times the interpreter parsed a waypoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gpx_model::{Record, Value};
use gpx_reader::coerce::{LATITUDE, parse_decimal};
use gpx_reader::{
    CoercionRegistry, Collection, Document, GpxError, RawInput, ReaderOptions, ScalarCoercion,
};

const DOCUMENT: &str = r#"<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1">
  <wpt lat="1" lon="10"><name>a</name></wpt>
  <trk><name>not a waypoint</name></trk>
  <wpt lat="2" lon="20"><name>b</name></wpt>
  <wpt lat="3" lon="30"><name>c</name></wpt>
</gpx>"#;

/// Latitude coercion that counts its calls.
struct CountingLatitude {
    calls: Arc<AtomicUsize>,
}

impl ScalarCoercion for CountingLatitude {
    fn type_name(&self) -> &'static str {
        LATITUDE
    }

    fn coerce(&self, input: RawInput<'_>) -> gpx_reader::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = input
            .text()
            .ok_or(GpxError::MissingValue { type_name: LATITUDE })?;
        parse_decimal(LATITUDE, text).map(Value::Decimal)
    }
}

fn counting_document(options: ReaderOptions) -> (Document, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = CoercionRegistry::standard();
    registry.register(Box::new(CountingLatitude {
        calls: Arc::clone(&calls),
    }));
    let document = Document::from_str_with_options(DOCUMENT, options)
        .unwrap()
        .with_registry(Arc::new(registry));
    (document, calls)
}

fn traverse(document: &Document) -> Vec<Record> {
    document
        .waypoints()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn test_cached_traversals_parse_once() {
    let (document, calls) = counting_document(ReaderOptions::default());

    let first = traverse(&document);
    assert_eq!(first.len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let second = traverse(&document);
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(document.cached_len(Collection::Waypoints), 3);
}

#[test]
fn test_uncached_traversals_reparse() {
    let (document, calls) = counting_document(ReaderOptions::uncached());

    let first = traverse(&document);
    let second = traverse(&document);
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert_eq!(document.cached_len(Collection::Waypoints), 0);
}

#[test]
fn test_partial_traversal_resumes() {
    let (document, calls) = counting_document(ReaderOptions::default());

    let head: Vec<_> = document.waypoints().unwrap().take(2).collect();
    assert_eq!(head.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let names: Vec<_> = traverse(&document)
        .iter()
        .map(|record| record.text("name").unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_interleaved_views_share_cache() {
    let (document, calls) = counting_document(ReaderOptions::default());

    let mut outer = document.waypoints().unwrap();
    let mut inner = document.waypoints().unwrap();

    assert_eq!(outer.next().unwrap().unwrap().decimal("lat"), Some(1.0));
    assert_eq!(inner.next().unwrap().unwrap().decimal("lat"), Some(1.0));
    assert_eq!(inner.next().unwrap().unwrap().decimal("lat"), Some(2.0));
    assert_eq!(outer.next().unwrap().unwrap().decimal("lat"), Some(2.0));
    assert_eq!(outer.next().unwrap().unwrap().decimal("lat"), Some(3.0));
    assert!(outer.next().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_collections_have_separate_caches() {
    let (document, _) = counting_document(ReaderOptions::default());

    assert_eq!(traverse(&document).len(), 3);
    assert_eq!(document.tracks().unwrap().count(), 1);
    assert_eq!(document.cached_len(Collection::Tracks), 1);
    assert_eq!(document.cached_len(Collection::Routes), 0);
}
