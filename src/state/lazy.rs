/// Lazy thumbnail loading
///
/// Each list row has a thumbnail slot that starts as a placeholder. The
/// shared viewport watcher tracks the scroll position of the files panel;
/// a slot starts loading the first time at least 10% of it enters the
/// viewport grown by a 50px prefetch margin. Observation is one-shot.
///
/// Without a watcher (lazy loading switched off) every slot loads as soon
/// as it is observed.

use iced::widget::image::Handle;

/// Minimum visible fraction of a row that triggers loading.
pub const THRESHOLD: f32 = 0.1;
/// Extra pixels above and below the viewport that count as visible.
pub const ROOT_MARGIN: f32 = 50.0;

/// Slot lifecycle: `Pending → Observed → Loading → Loaded | Failed`.
#[derive(Debug, Clone)]
pub enum ThumbState {
    Pending,
    Observed,
    Loading,
    Loaded(Handle),
    /// The real image could not be fetched or decoded; the placeholder stays.
    Failed,
}

/// Vertical extent of a row inside the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f32,
    pub height: f32,
}

impl Band {
    /// Fraction of this band covered by `[top, bottom)`.
    fn ratio_within(&self, top: f32, bottom: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let visible = (self.top + self.height).min(bottom) - self.top.max(top);
        (visible.max(0.0) / self.height).min(1.0)
    }
}

/// Scroll position and height of the files panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportWatcher {
    pub offset: f32,
    pub height: f32,
}

impl ViewportWatcher {
    pub fn new(height: f32) -> Self {
        Self { offset: 0.0, height }
    }

    fn intersects(&self, band: &Band) -> bool {
        let top = self.offset - ROOT_MARGIN;
        let bottom = self.offset + self.height + ROOT_MARGIN;
        band.ratio_within(top, bottom) >= THRESHOLD
    }
}

#[derive(Debug, Clone)]
struct Slot {
    url: String,
    band: Band,
    state: ThumbState,
}

/// A thumbnail that should be fetched now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub index: usize,
    pub url: String,
}

#[derive(Debug)]
pub struct LazyLoader {
    watcher: Option<ViewportWatcher>,
    slots: Vec<Option<Slot>>,
    generation: u64,
}

impl LazyLoader {
    /// `watcher` is `None` when lazy loading is unavailable.
    pub fn new(watcher: Option<ViewportWatcher>) -> Self {
        Self {
            watcher,
            slots: Vec::new(),
            generation: 0,
        }
    }

    /// Drop every slot (new list rendered). Replies for the previous
    /// generation are ignored from now on.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.slots.clear();
    }

    /// Current watcher geometry, `None` without lazy loading.
    pub fn viewport(&self) -> Option<ViewportWatcher> {
        self.watcher
    }

    /// Register a placeholder at `index` with its deferred source.
    pub fn insert(&mut self, index: usize, url: String, band: Band) {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(Slot {
            url,
            band,
            state: ThumbState::Pending,
        });
    }

    /// Start watching every pending slot. Returns the loads to start now.
    pub fn observe_all(&mut self) -> Vec<LoadRequest> {
        for slot in self.slots.iter_mut().flatten() {
            if matches!(slot.state, ThumbState::Pending) {
                slot.state = if self.watcher.is_some() {
                    ThumbState::Observed
                } else {
                    ThumbState::Loading
                };
            }
        }

        match self.watcher {
            Some(_) => self.scan(),
            None => self.requests_for(|state| matches!(state, ThumbState::Loading)),
        }
    }

    /// The files panel scrolled or was resized.
    pub fn set_viewport(&mut self, offset: f32, height: f32) -> Vec<LoadRequest> {
        match &mut self.watcher {
            Some(watcher) => {
                watcher.offset = offset;
                watcher.height = height;
                self.scan()
            }
            None => Vec::new(),
        }
    }

    /// Resize only (window changed), keeping the scroll offset.
    pub fn set_height(&mut self, height: f32) -> Vec<LoadRequest> {
        match self.watcher {
            Some(watcher) => self.set_viewport(watcher.offset, height),
            None => Vec::new(),
        }
    }

    /// Move every observed slot that intersects the viewport to Loading.
    fn scan(&mut self) -> Vec<LoadRequest> {
        let Some(watcher) = self.watcher else {
            return Vec::new();
        };

        let mut requests = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(slot) = slot else { continue };
            if matches!(slot.state, ThumbState::Observed) && watcher.intersects(&slot.band) {
                slot.state = ThumbState::Loading;
                requests.push(LoadRequest {
                    generation: self.generation,
                    index,
                    url: slot.url.clone(),
                });
            }
        }
        requests
    }

    fn requests_for(&self, wanted: impl Fn(&ThumbState) -> bool) -> Vec<LoadRequest> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let slot = slot.as_ref()?;
                wanted(&slot.state).then(|| LoadRequest {
                    generation: self.generation,
                    index,
                    url: slot.url.clone(),
                })
            })
            .collect()
    }

    /// A fetch finished. Returns false if it belonged to an older list.
    pub fn finish(&mut self, generation: u64, index: usize, result: Option<Handle>) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.slots.get_mut(index).and_then(Option::as_mut) {
            Some(slot) if matches!(slot.state, ThumbState::Loading) => {
                slot.state = match result {
                    Some(handle) => ThumbState::Loaded(handle),
                    None => ThumbState::Failed,
                };
                true
            }
            _ => false,
        }
    }

    pub fn state(&self, index: usize) -> Option<&ThumbState> {
        self.slots.get(index)?.as_ref().map(|slot| &slot.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: f32 = 100.0;

    fn loader_with_rows(watcher: Option<ViewportWatcher>, rows: usize) -> LazyLoader {
        let mut loader = LazyLoader::new(watcher);
        for i in 0..rows {
            loader.insert(
                i,
                format!("/thumbnails/small/{}.jpg", i),
                Band { top: i as f32 * ROW, height: ROW },
            );
        }
        loader
    }

    fn indices(requests: &[LoadRequest]) -> Vec<usize> {
        requests.iter().map(|r| r.index).collect()
    }

    #[test]
    fn test_only_visible_rows_load() {
        let mut loader = loader_with_rows(Some(ViewportWatcher::new(250.0)), 10);
        // viewport 0..250 plus 50px margin reaches 300: rows 0, 1, 2
        let requests = loader.observe_all();
        assert_eq!(indices(&requests), [0, 1, 2]);
        assert!(matches!(loader.state(3), Some(ThumbState::Observed)));
    }

    #[test]
    fn test_threshold_applies() {
        let mut loader = loader_with_rows(Some(ViewportWatcher::new(155.0)), 5);
        // margin edge at 205: row 2 is 5% visible, below the threshold
        assert_eq!(indices(&loader.observe_all()), [0, 1]);
        // edge at 215: 15% visible
        assert_eq!(indices(&loader.set_viewport(10.0, 155.0)), [2]);
    }

    #[test]
    fn test_observation_is_one_shot() {
        let mut loader = loader_with_rows(Some(ViewportWatcher::new(100.0)), 10);
        assert_eq!(indices(&loader.observe_all()), [0, 1]);

        assert_eq!(indices(&loader.set_viewport(500.0, 100.0)), [4, 5, 6]);
        // scrolling back does not fire rows 0 and 1 again
        assert!(loader.set_viewport(0.0, 100.0).is_empty());
    }

    #[test]
    fn test_without_watcher_everything_loads_immediately() {
        let mut loader = loader_with_rows(None, 4);
        assert_eq!(indices(&loader.observe_all()), [0, 1, 2, 3]);
        assert!(loader.set_viewport(1000.0, 100.0).is_empty());
    }

    #[test]
    fn test_finish_and_failures() {
        let mut loader = loader_with_rows(Some(ViewportWatcher::new(100.0)), 3);
        let generation = loader.generation;
        loader.observe_all();

        let handle = Handle::from_rgba(1, 1, vec![0, 0, 0, 255]);
        assert!(loader.finish(generation, 0, Some(handle)));
        assert!(matches!(loader.state(0), Some(ThumbState::Loaded(_))));

        assert!(loader.finish(generation, 1, None));
        assert!(matches!(loader.state(1), Some(ThumbState::Failed)));

        // row 2 was never requested
        assert!(!loader.finish(generation, 2, None));
    }

    #[test]
    fn test_replies_from_previous_list_are_ignored() {
        let mut loader = loader_with_rows(None, 2);
        let old = loader.generation;
        loader.observe_all();

        loader.reset();
        loader.insert(0, "/thumbnails/small/new.jpg".to_string(), Band { top: 0.0, height: ROW });
        loader.observe_all();

        assert!(!loader.finish(old, 0, None));
        assert!(matches!(loader.state(0), Some(ThumbState::Loading)));
    }
}
