use std::rc::Rc;

use serde::Serialize;

use crate::{engine, Anchor, Bounds, LineSegment, RawSettings, Result, Settings};

/// Consumer of fractal changes. Receives no payload; pulls the new state from
/// the subject with [`FractalSubject::snapshot`].
pub trait FractalObserver {
    fn update(&self, subject: &dyn FractalSubject);
}

/// Shared handle to a registered observer. Identity is pointer identity.
pub type ObserverHandle = Rc<dyn FractalObserver>;

/// Holder of the current fractal and its observers.
pub trait FractalSubject {
    /// Adds an observer. Registering the same handle twice is a no-op.
    fn register(&mut self, observer: ObserverHandle);
    /// Removes an observer if present.
    fn unregister(&mut self, observer: &ObserverHandle);
    /// Calls every observer once, in registration order.
    fn notify_all(&self);
    fn snapshot(&self) -> Rc<GeneratedFractal>;
}

/// Output of one complete generation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFractal {
    generation: u64,
    settings: Settings,
    segments: Vec<LineSegment>,
}

impl GeneratedFractal {
    /// Pass number; grows by one with each successful regeneration.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Segments in draw order.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_segments(&self.segments)
    }
}

/// Owns the current [`GeneratedFractal`] and republishes it on every change.
///
/// Each pass is generated into a fresh buffer and only swapped in once it has
/// completed, so a failed pass leaves the previous snapshot in place and
/// observers are not called.
pub struct FractalStore {
    anchor: Anchor,
    current: Rc<GeneratedFractal>,
    observers: Vec<ObserverHandle>,
}

impl FractalStore {
    /// Creates a store holding the fractal for `initial`. No observers exist
    /// yet, so nothing is notified.
    pub fn new(anchor: Anchor, initial: &RawSettings) -> Result<Self> {
        let settings = initial.normalize(&anchor)?;
        let segments = engine::generate(&settings)?;
        Ok(Self {
            anchor,
            current: Rc::new(GeneratedFractal {
                generation: 0,
                settings,
                segments,
            }),
            observers: Vec::new(),
        })
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Replaces the anchor used by later calls to [`Self::apply_settings`].
    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Normalizes `raw` and regenerates. Always regenerates, even when the
    /// values match the current ones.
    pub fn apply_settings(&mut self, raw: &RawSettings) -> Result<()> {
        let settings = raw.normalize(&self.anchor).inspect_err(|err| {
            tracing::warn!(%err, "rejected settings");
        })?;
        self.apply(settings)
    }

    /// Regenerates from already canonical settings, swaps the snapshot and
    /// notifies observers. Out-of-domain settings are rejected before the
    /// engine runs.
    pub fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.validate().inspect_err(|err| {
            tracing::warn!(%err, "rejected settings");
        })?;
        let segments = engine::generate(&settings).inspect_err(|err| {
            tracing::warn!(%err, depth = settings.depth, "generation aborted");
        })?;

        let generation = self.current.generation + 1;
        tracing::debug!(
            generation,
            depth = settings.depth,
            segments = segments.len(),
            "fractal regenerated"
        );
        self.current = Rc::new(GeneratedFractal {
            generation,
            settings,
            segments,
        });

        self.notify_all();
        Ok(())
    }
}

impl FractalSubject for FractalStore {
    fn register(&mut self, observer: ObserverHandle) {
        if !self.observers.iter().any(|o| Rc::ptr_eq(o, &observer)) {
            self.observers.push(observer);
        }
    }

    fn unregister(&mut self, observer: &ObserverHandle) {
        self.observers.retain(|o| !Rc::ptr_eq(o, observer));
    }

    fn notify_all(&self) {
        for observer in &self.observers {
            observer.update(self);
        }
    }

    fn snapshot(&self) -> Rc<GeneratedFractal> {
        Rc::clone(&self.current)
    }
}

impl std::fmt::Debug for FractalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FractalStore")
            .field("anchor", &self.anchor)
            .field("generation", &self.current.generation)
            .field("segments", &self.current.segments.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
