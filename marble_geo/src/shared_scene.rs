//! A scene shared between threads, e.g. a loader adding items while a renderer queries them.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::bbox::LatLonAltBox;
use crate::scene::{GeoGraphicsScene, GraphicsItem};

/// Handle to a [`GeoGraphicsScene`] which can be cloned and sent to other threads.
///
/// Readers work on immutable snapshots, so a long query never holds the lock. Writers copy
/// the scene if a snapshot of it is still alive, and swap it in once they are done.
pub struct SharedScene<T> {
    inner: Arc<RwLock<Arc<GeoGraphicsScene<T>>>>,
}

impl<T> Clone for SharedScene<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedScene<T> {
    fn default() -> Self {
        Self::from(GeoGraphicsScene::default())
    }
}

impl<T> From<GeoGraphicsScene<T>> for SharedScene<T> {
    fn from(scene: GeoGraphicsScene<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(scene))),
        }
    }
}

impl<T: GraphicsItem> SharedScene<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the scene. Later updates do not affect it.
    pub fn snapshot(&self) -> Arc<GeoGraphicsScene<T>> {
        Arc::clone(&self.inner.read())
    }

    /// Modify the scene. Updates are applied one at a time.
    pub fn update<R>(&self, f: impl FnOnce(&mut GeoGraphicsScene<T>) -> R) -> R {
        let mut scene = self.inner.write();
        f(Arc::make_mut(&mut scene))
    }

    /// Same as [`GeoGraphicsScene::items`] on a fresh snapshot.
    pub fn items(&self, bbox: &LatLonAltBox, zoom: i32) -> Vec<Arc<T>> {
        self.snapshot().items(bbox, zoom)
    }
}
