//! Photo rotation.

use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;
use crate::sources::photos::load_photos;

/// Ordered photo list with a cursor.
///
/// Walking the list shows every photo once per cycle. When the cursor wraps,
/// the list is reshuffled so the next cycle is a fresh permutation.
#[derive(Debug, Clone, Default)]
pub struct PhotoRotation {
    photos: Vec<PathBuf>,
    cursor: usize,
}

impl PhotoRotation {
    /// Build a rotation in a random starting order.
    pub fn new<R: Rng + ?Sized>(mut photos: Vec<PathBuf>, rng: &mut R) -> Self {
        photos.shuffle(rng);
        Self { photos, cursor: 0 }
    }

    /// Return the photo at the cursor and advance. On wrap the order is
    /// reshuffled. `None` when there is nothing to show.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PathBuf> {
        let photo = self.photos.get(self.cursor)?.clone();
        self.cursor += 1;
        if self.cursor >= self.photos.len() {
            self.cursor = 0;
            self.photos.shuffle(rng);
        }
        Some(photo)
    }

    /// Swap in a new list and start a new cycle.
    pub fn replace<R: Rng + ?Sized>(&mut self, photos: Vec<PathBuf>, rng: &mut R) {
        *self = Self::new(photos, rng);
    }

    /// True when the next advance begins a new cycle.
    pub fn at_cycle_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Full-screen photo widget. Rescans its directory at the end of every cycle.
pub struct PhotoWidget {
    dir: PathBuf,
    rotation: PhotoRotation,
}

impl PhotoWidget {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            rotation: PhotoRotation::default(),
        }
    }

    fn show_next(&mut self, sink: &mut dyn RenderSink) {
        let mut rng = rand::rng();
        match self.rotation.advance(&mut rng) {
            Some(path) => {
                sink.render(&WidgetUpdate::Photo { path });
                if self.rotation.at_cycle_start() {
                    let rescanned = load_photos(&self.dir);
                    Log::log_widget(
                        LogLevel::Log,
                        self.name(),
                        &format!("Cycle complete, {} photos for the next one", rescanned.len()),
                    );
                    self.rotation.replace(rescanned, &mut rng);
                }
            }
            None => Log::log_widget(
                LogLevel::Warn,
                self.name(),
                &format!("No photos to rotate in {}", self.dir.display()),
            ),
        }
    }
}

impl Refreshable for PhotoWidget {
    fn name(&self) -> &'static str {
        "photos"
    }

    fn start(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        self.rotation = PhotoRotation::new(load_photos(&self.dir), &mut rand::rng());
        if self.rotation.is_empty() {
            sink.render(&WidgetUpdate::NoPhotos);
        } else {
            Log::log_widget(
                LogLevel::Info,
                self.name(),
                &format!("Loaded {} photos", self.rotation.len()),
            );
            self.show_next(sink);
        }
    }

    fn on_tick(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        self.show_next(sink);
    }
}
