//! Document facade.
//!
//! [`Document`] owns the element tree of one GPX file and exposes its parts:
//! the checked version, the creator, the metadata record and lazy views over
//! the waypoint, route and track collections. Everything except `creator`
//! and `extensions` is gated on the version check.

use std::cell::{OnceCell, RefCell};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use gpx_model::{Element, Field, Gpx, Record};

use crate::coerce::{CoercionRegistry, default_registry};
use crate::error::{GpxError, Result};
use crate::interpret::Interpreter;
use crate::options::ReaderOptions;
use crate::schema::{self, GPX_NAMESPACE, SUPPORTED_VERSION};
use crate::tree;
use crate::view::{Collection, CollectionCache, CollectionView};

/// A loaded GPX document.
///
/// Not `Sync`: collection caches use interior mutability and assume one
/// traversal at a time.
#[derive(Debug)]
pub struct Document {
    root: Element,
    registry: Arc<CoercionRegistry>,
    options: ReaderOptions,
    version: OnceCell<()>,
    metadata: OnceCell<Option<Record>>,
    caches: [RefCell<CollectionCache>; 3],
}

impl Document {
    /// Wrap a pre-parsed tree.
    ///
    /// # Errors
    ///
    /// [`GpxError::NotAGpxDocument`] when the root is not `gpx` in the GPX 1.1
    /// namespace.
    pub fn from_element(root: Element) -> Result<Self> {
        Self::from_element_with_options(root, ReaderOptions::default())
    }

    /// Wrap a pre-parsed tree, reading it with `options`.
    ///
    /// # Errors
    ///
    /// [`GpxError::NotAGpxDocument`] when the root is not `gpx` in the GPX 1.1
    /// namespace.
    pub fn from_element_with_options(root: Element, options: ReaderOptions) -> Result<Self> {
        if !root.is(GPX_NAMESPACE, "gpx") {
            return Err(GpxError::NotAGpxDocument {
                tag: root.name.to_string(),
            });
        }
        debug!(
            children = root.children.len(),
            cache = options.cache,
            "loaded document"
        );
        Ok(Self {
            root,
            registry: default_registry(),
            options,
            version: OnceCell::new(),
            metadata: OnceCell::new(),
            caches: Default::default(),
        })
    }

    /// Parse markup text.
    ///
    /// # Errors
    ///
    /// Tree-building failures ([`GpxError::Xml`],
    /// [`GpxError::MalformedDocument`], ...) and
    /// [`GpxError::NotAGpxDocument`].
    pub fn from_str_with_options(text: &str, options: ReaderOptions) -> Result<Self> {
        Self::from_element_with_options(tree::parse_str(text)?, options)
    }

    /// Read and parse markup from a reader.
    ///
    /// # Errors
    ///
    /// [`GpxError::Io`] when reading fails, plus every error of
    /// [`from_str_with_options`](Self::from_str_with_options).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ReaderOptions::default())
    }

    /// Read and parse markup from a reader, using `options`.
    ///
    /// # Errors
    ///
    /// Same as [`from_reader`](Self::from_reader).
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ReaderOptions) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_str_with_options(&text, options)
    }

    /// Open a GPX file.
    ///
    /// # Errors
    ///
    /// [`GpxError::FileNotFound`] when `path` does not exist, plus every
    /// loading error of [`from_reader`](Self::from_reader).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open a GPX file, using `options`.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GpxError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GpxError::Io(e)
            }
        })?;
        debug!(path = %path.display(), "opening document");
        Self::from_reader_with_options(file, options)
    }

    /// Use `registry` for every coercion from now on.
    ///
    /// Results already cached were produced by the previous registry and are
    /// discarded.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<CoercionRegistry>) -> Self {
        self.registry = registry;
        self.metadata = OnceCell::new();
        self.caches = Default::default();
        self
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    pub fn registry(&self) -> &CoercionRegistry {
        &self.registry
    }

    fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(&self.registry)
    }

    /// The declared version, once it has been checked against the supported
    /// one.
    ///
    /// # Errors
    ///
    /// [`GpxError::UnsupportedVersion`] when the root declares another version
    /// or none at all. A failed check is repeated on the next call.
    pub fn version(&self) -> Result<&str> {
        if self.version.get().is_none() {
            let found = self.root.attribute("version");
            debug!(found = ?found, supported = SUPPORTED_VERSION, "checking version");
            if found != Some(SUPPORTED_VERSION) {
                return Err(GpxError::UnsupportedVersion {
                    found: found.map(str::to_string),
                    supported: SUPPORTED_VERSION,
                });
            }
            let _ = self.version.set(());
        }
        Ok(SUPPORTED_VERSION)
    }

    /// The `creator` attribute, verbatim.
    pub fn creator(&self) -> Option<&str> {
        self.root.attribute("creator")
    }

    /// The `<metadata>` record, parsed on first access.
    ///
    /// # Errors
    ///
    /// The version check failure, or the first coercion failure inside
    /// `<metadata>`. Failures are not cached.
    pub fn metadata(&self) -> Result<Option<&Record>> {
        self.version()?;
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata.as_ref());
        }
        let parsed = self
            .root
            .find(GPX_NAMESPACE, "metadata")
            .map(|element| self.interpreter().parse(element, &schema::METADATA))
            .transpose()?;
        Ok(self.metadata.get_or_init(|| parsed).as_ref())
    }

    /// Lazy view over one top-level collection.
    ///
    /// # Errors
    ///
    /// The version check failure.
    pub fn collection(&self, collection: Collection) -> Result<CollectionView<'_>> {
        self.version()?;
        Ok(CollectionView::new(
            &self.root,
            collection,
            self.interpreter(),
            &self.caches[collection.index()],
            self.options,
        ))
    }

    pub fn waypoints(&self) -> Result<CollectionView<'_>> {
        self.collection(Collection::Waypoints)
    }

    pub fn routes(&self) -> Result<CollectionView<'_>> {
        self.collection(Collection::Routes)
    }

    pub fn tracks(&self) -> Result<CollectionView<'_>> {
        self.collection(Collection::Tracks)
    }

    /// Number of memoized slots for `collection`.
    pub fn cached_len(&self, collection: Collection) -> usize {
        self.caches[collection.index()].borrow().len()
    }

    /// Children of the root's `<extensions>` element.
    pub fn extensions(&self) -> &[Element] {
        self.root
            .find(GPX_NAMESPACE, "extensions")
            .map(|element| element.children.as_slice())
            .unwrap_or_default()
    }

    /// Parse the whole document eagerly.
    ///
    /// The root attributes and `<extensions>` are read with the `gpx` schema;
    /// metadata and the three collections go through [`metadata`](Self::metadata)
    /// and the collection views, so their caches and the invalid-item policy
    /// apply.
    ///
    /// # Errors
    ///
    /// The version check failure, or the first coercion failure not skipped
    /// by the policy.
    pub fn parse_all(&self) -> Result<Record> {
        self.version()?;
        let mut record = self.interpreter().parse(&self.root, &schema::GPX_HEADER)?;
        if let Some(metadata) = self.metadata()? {
            record.insert("metadata", Field::Record(metadata.clone()));
        }
        for collection in Collection::all() {
            for item in self.collection(collection)? {
                record.push(collection.tag(), item?);
            }
        }
        Ok(record)
    }

    /// Parse the whole document into typed records.
    ///
    /// # Errors
    ///
    /// Anything [`parse_all`](Self::parse_all) returns, or
    /// [`GpxError::Model`] when a record does not convert.
    pub fn to_gpx(&self) -> Result<Gpx> {
        let record = self.parse_all()?;
        Ok(Gpx::try_from(&record)?)
    }
}

impl FromStr for Document {
    type Err = GpxError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_str_with_options(text, ReaderOptions::default())
    }
}

/// Open a GPX file and convert it to typed records in one step.
///
/// # Errors
///
/// Anything [`Document::open`] or [`Document::to_gpx`] returns.
pub fn read_gpx(path: impl AsRef<Path>) -> Result<Gpx> {
    Document::open(path)?.to_gpx()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(version: &str) -> Element {
        Element::namespaced(GPX_NAMESPACE, "gpx")
            .with_attribute("version", version)
            .with_attribute("creator", "unit test")
    }

    #[test]
    fn rejects_foreign_root() {
        let error = Document::from_element(Element::namespaced("urn:kml", "kml")).unwrap_err();
        assert!(matches!(error, GpxError::NotAGpxDocument { ref tag } if tag == "{urn:kml}kml"));
    }

    #[test]
    fn version_gates_collections() {
        let document = Document::from_element(root("1.0")).unwrap();
        assert_eq!(document.creator(), Some("unit test"));
        assert!(matches!(
            document.version(),
            Err(GpxError::UnsupportedVersion { found: Some(ref v), .. }) if v == "1.0"
        ));
        assert!(document.waypoints().is_err());
        assert!(document.metadata().is_err());
        assert!(document.parse_all().is_err());
    }

    #[test]
    fn debug_names_registry_types() {
        let document = Document::from_element(root("1.1")).unwrap();
        let debug = format!("{document:?}");
        assert!(debug.starts_with("Document {"), "{debug}");
        assert!(debug.contains("\"dgpsid\""), "{debug}");
    }

    #[test]
    fn parse_all_fills_collection_caches() {
        let document = Document::from_element(
            root("1.1")
                .with_child(Element::namespaced(GPX_NAMESPACE, "trk"))
                .with_child(Element::namespaced(GPX_NAMESPACE, "trk")),
        )
        .unwrap();
        let record = document.parse_all().unwrap();
        assert_eq!(record.records("trk").len(), 2);
        assert_eq!(record.text("creator"), Some("unit test"));
        assert!(!record.contains("wpt"));
        assert_eq!(document.cached_len(Collection::Tracks), 2);
    }

    #[test]
    fn metadata_is_optional() {
        let document = Document::from_element(root("1.1")).unwrap();
        assert_eq!(document.version().unwrap(), "1.1");
        assert!(document.metadata().unwrap().is_none());
        assert!(document.extensions().is_empty());
    }
}
