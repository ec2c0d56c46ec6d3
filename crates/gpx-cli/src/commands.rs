use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info_span};

use gpx_model::{Metadata, Record, Route, Track, Waypoint};
use gpx_reader::{Collection, CollectionView, Document, ReaderOptions};

use crate::types::DocumentSummary;

pub fn run_summary(path: &Path, options: ReaderOptions) -> Result<DocumentSummary> {
    let span = info_span!("summary", path = %path.display());
    let _guard = span.enter();

    let document = open(path, options)?;
    let version = document.version().context("check version")?.to_string();
    let metadata = document
        .metadata()
        .context("parse metadata")?
        .map(Metadata::try_from)
        .transpose()
        .context("convert metadata")?;

    let waypoints: Vec<Waypoint> = typed(document.waypoints()?, Collection::Waypoints)?;
    let routes: Vec<Route> = typed(document.routes()?, Collection::Routes)?;
    let tracks: Vec<Track> = typed(document.tracks()?, Collection::Tracks)?;

    let summary = DocumentSummary {
        version,
        creator: document.creator().map(str::to_string),
        name: metadata.as_ref().and_then(|m| m.name.clone()),
        time: metadata
            .as_ref()
            .and_then(|m| m.time)
            .map(|time| time.to_string()),
        waypoints: waypoints.len(),
        routes: routes.len(),
        route_points: routes.iter().map(|route| route.points.len()).sum(),
        tracks: tracks.len(),
        track_segments: tracks.iter().map(|track| track.segments.len()).sum(),
        track_points: tracks.iter().map(Track::point_count).sum(),
    };
    debug!(
        waypoints = summary.waypoints,
        routes = summary.routes,
        tracks = summary.tracks,
        "summary complete"
    );
    Ok(summary)
}

/// Render the typed records of `collection` (or the whole document) as JSON.
pub fn run_dump(
    path: &Path,
    options: ReaderOptions,
    collection: Option<Collection>,
    compact: bool,
) -> Result<String> {
    let span = info_span!("dump", path = %path.display());
    let _guard = span.enter();

    let document = open(path, options)?;
    let value = match collection {
        None => to_json(&document.to_gpx().context("parse document")?)?,
        Some(collection) => {
            let view = document.collection(collection)?;
            match collection {
                Collection::Waypoints => to_json(&typed::<Waypoint>(view, collection)?)?,
                Collection::Routes => to_json(&typed::<Route>(view, collection)?)?,
                Collection::Tracks => to_json(&typed::<Track>(view, collection)?)?,
            }
        }
    };

    let rendered = if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    };
    rendered.context("render JSON")
}

fn open(path: &Path, options: ReaderOptions) -> Result<Document> {
    Document::open_with_options(path, options)
        .with_context(|| format!("load {}", path.display()))
}

fn typed<T>(view: CollectionView<'_>, collection: Collection) -> Result<Vec<T>>
where
    T: for<'r> TryFrom<&'r Record, Error = gpx_model::ModelError>,
{
    view.typed()
        .collect::<gpx_reader::Result<Vec<T>>>()
        .with_context(|| format!("read {collection}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).context("serialize records")
}
