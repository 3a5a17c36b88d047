//! Chain-of-responsibility dispatch over recognizers.
//!
//! Every path in a document is offered to an ordered list of recognizers;
//! the first one to claim it wins and the rest never see it. The ordering
//! is a policy of whoever assembles the [`Dispatcher`] — recognizers make
//! no assumptions about their position in the chain.
//!
//! The dispatcher borrows its recognizers, so the caller keeps ownership
//! and reads the accumulated results back out once the document has been
//! scanned.

use cadascan_path::{PointTransform, VectorPath};

/// A recognizer that can claim paths from the document stream.
pub trait PathClaimer {
    /// Inspect `path` and claim it if it belongs to this recognizer.
    ///
    /// Returns `true` when the path has been consumed. The transform maps
    /// drawing coordinates into the target map space; recognizers that
    /// work in drawing space (text decoding) only use it for reported
    /// positions.
    fn try_claim(&mut self, path: &VectorPath, transform: &dyn PointTransform) -> bool;
}

/// An ordered list of claimers; the first claim wins.
#[derive(Default)]
pub struct Dispatcher<'a> {
    claimers: Vec<&'a mut dyn PathClaimer>,
}

impl<'a> Dispatcher<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            claimers: Vec::new(),
        }
    }

    /// Append a claimer at the end of the chain.
    pub fn register(&mut self, claimer: &'a mut dyn PathClaimer) {
        self.claimers.push(claimer);
    }

    /// Offer a path to each claimer in order.
    ///
    /// Returns `true` if some claimer consumed it.
    pub fn dispatch(&mut self, path: &VectorPath, transform: &dyn PointTransform) -> bool {
        self.claimers
            .iter_mut()
            .any(|claimer| claimer.try_claim(path, transform))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cadascan_path::transform::IdentityTransform;

    struct CountingClaimer {
        claims: bool,
        seen: usize,
    }

    impl PathClaimer for CountingClaimer {
        fn try_claim(&mut self, _path: &VectorPath, _transform: &dyn PointTransform) -> bool {
            self.seen += 1;
            self.claims
        }
    }

    #[test]
    fn first_claim_wins() {
        let mut first = CountingClaimer {
            claims: true,
            seen: 0,
        };
        let mut second = CountingClaimer {
            claims: true,
            seen: 0,
        };
        let path = VectorPath::from_svg("M 0 0 L 1 1", "").unwrap();
        {
            let mut dispatcher = Dispatcher::new();
            dispatcher.register(&mut first);
            dispatcher.register(&mut second);
            assert!(dispatcher.dispatch(&path, &IdentityTransform));
        }
        assert_eq!(first.seen, 1);
        assert_eq!(second.seen, 0);
    }

    #[test]
    fn later_claimers_tried_after_refusals() {
        let mut first = CountingClaimer {
            claims: false,
            seen: 0,
        };
        let mut second = CountingClaimer {
            claims: true,
            seen: 0,
        };
        let path = VectorPath::from_svg("M 0 0 L 1 1", "").unwrap();
        {
            let mut dispatcher = Dispatcher::new();
            dispatcher.register(&mut first);
            dispatcher.register(&mut second);
            assert!(dispatcher.dispatch(&path, &IdentityTransform));
        }
        assert_eq!(first.seen, 1);
        assert_eq!(second.seen, 1);
    }

    #[test]
    fn unclaimed_path_reported() {
        let mut only = CountingClaimer {
            claims: false,
            seen: 0,
        };
        let path = VectorPath::from_svg("M 0 0 L 1 1", "").unwrap();
        {
            let mut dispatcher = Dispatcher::new();
            dispatcher.register(&mut only);
            assert!(!dispatcher.dispatch(&path, &IdentityTransform));
        }
        assert_eq!(only.seen, 1);
    }
}
