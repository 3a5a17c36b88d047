//! Per-document scanning state.
//!
//! A cadastre export is accompanied by the georeferenced bounding box its
//! drawing maps onto, but the drawing's own extent is only discoverable
//! from the data: the first white-filled rectangle (`MLLLLZ`,
//! `fill:#ffffff`) is the page background and delimits the drawing space.
//! Until that marker is seen every path is ignored; once it is, the
//! scanner builds the linear transform into the target box and offers
//! every subsequent path to the recognizer chain.

use cadascan_path::{BoundingBox, LinearTransform, VectorPath};

use crate::claim::Dispatcher;

/// Scans one document's path stream in source order.
pub struct DocumentScanner<'a> {
    target_box: BoundingBox,
    transform: Option<LinearTransform>,
    dispatcher: Dispatcher<'a>,
    unclaimed: usize,
}

impl<'a> DocumentScanner<'a> {
    /// A scanner mapping the document onto `target_box`, dispatching to
    /// the given recognizer chain.
    #[must_use]
    pub fn new(target_box: BoundingBox, dispatcher: Dispatcher<'a>) -> Self {
        Self {
            target_box,
            transform: None,
            dispatcher,
            unclaimed: 0,
        }
    }

    /// Offer the next path of the stream.
    ///
    /// Returns `true` when the path was consumed — either as the
    /// background marker or by a recognizer.
    pub fn offer(&mut self, path: &VectorPath) -> bool {
        let Some(transform) = self.transform else {
            if is_background_marker(path) {
                match LinearTransform::between(&path.bbox(), &self.target_box) {
                    Some(transform) => {
                        log::debug!("document bounding box: {:?}", path.bbox());
                        self.transform = Some(transform);
                        return true;
                    }
                    None => log::warn!("degenerate background rectangle ignored"),
                }
            }
            return false;
        };
        if self.dispatcher.dispatch(path, &transform) {
            true
        } else {
            self.unclaimed += 1;
            false
        }
    }

    /// The transform established by the background marker, once seen.
    #[must_use]
    pub const fn transform(&self) -> Option<&LinearTransform> {
        self.transform.as_ref()
    }

    /// Number of paths offered after the marker that no recognizer
    /// claimed.
    #[must_use]
    pub const fn unclaimed(&self) -> usize {
        self.unclaimed
    }
}

/// The page background: a white-filled rectangle ring.
fn is_background_marker(path: &VectorPath) -> bool {
    path.command_codes() == "MLLLLZ" && path.style().fill_is("#ffffff")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
