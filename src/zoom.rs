//! Persisted viewport zoom.
//!
//! [`ZoomController`] owns one clamped percentage, writes it to a
//! [`PreferenceStore`] on every change, and applies it to the surface as a
//! root scale factor. Pinch-zoom on exempt regions is unaffected: the
//! [`PolicyGuard`](crate::PolicyGuard) lets those gestures through and this
//! controller never listens for them.

use std::fmt;

use crate::logging::SurfaceLog;
use crate::store::PreferenceStore;
use crate::surface::Surface;

/// Smallest allowed zoom percentage.
pub const MIN_ZOOM: i32 = 70;
/// Largest allowed zoom percentage.
pub const MAX_ZOOM: i32 = 150;
/// Zoom percentage used when nothing valid is stored.
pub const DEFAULT_ZOOM: i32 = 100;
/// Change applied by one zoom-in or zoom-out.
pub const ZOOM_STEP: i32 = 10;
/// Preference key the level is persisted under.
pub const ZOOM_STORAGE_KEY: &str = "bietalreef_zoom_level";

/// A zoom percentage guaranteed to lie in `MIN_ZOOM..=MAX_ZOOM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(i32);

impl ZoomLevel {
    /// The smallest level.
    pub const MIN: ZoomLevel = ZoomLevel(MIN_ZOOM);
    /// The largest level.
    pub const MAX: ZoomLevel = ZoomLevel(MAX_ZOOM);
    /// The default level.
    pub const DEFAULT: ZoomLevel = ZoomLevel(DEFAULT_ZOOM);

    /// Clamps any percentage into range.
    ///
    /// ```
    /// use policy_guard::ZoomLevel;
    ///
    /// assert_eq!(ZoomLevel::clamped(200), ZoomLevel::MAX);
    /// assert_eq!(ZoomLevel::clamped(-50), ZoomLevel::MIN);
    /// assert_eq!(ZoomLevel::clamped(120).percent(), 120);
    /// ```
    pub fn clamped(percent: i64) -> Self {
        let clamped = percent.clamp(i64::from(MIN_ZOOM), i64::from(MAX_ZOOM));
        // In range, so the narrowing cannot truncate.
        ZoomLevel(clamped as i32)
    }

    /// Parses a stored value, accepting only a decimal integer already in
    /// range. Surrounding whitespace is ignored.
    pub fn parse(stored: &str) -> Option<Self> {
        let percent: i32 = stored.trim().parse().ok()?;
        (MIN_ZOOM..=MAX_ZOOM)
            .contains(&percent)
            .then_some(ZoomLevel(percent))
    }

    /// Returns the percentage.
    pub fn percent(self) -> i32 {
        self.0
    }

    /// Returns the root scale factor, `percent / 100`.
    pub fn scale_factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    fn step(self, delta: i32) -> Self {
        ZoomLevel::clamped(i64::from(self.0) + i64::from(delta))
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        ZoomLevel::DEFAULT
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Owner of the persisted zoom level for one surface.
///
/// Storage failures never reach the caller: a failed read starts at the
/// default, a failed write keeps the new level in memory and logs a
/// warning.
///
/// # Example
///
/// ```
/// use policy_guard::{MemoryStore, SimulatedSurface, ZoomController};
///
/// let surface = SimulatedSurface::new();
/// let mut zoom = ZoomController::new(surface.clone(), MemoryStore::new());
///
/// zoom.zoom_in();
/// assert_eq!(zoom.level().percent(), 110);
/// assert_eq!(surface.root_scale(), Some(1.1));
///
/// zoom.release();
/// assert_eq!(surface.root_scale(), None);
/// ```
pub struct ZoomController<S: Surface, P: PreferenceStore> {
    surface: S,
    store: P,
    level: ZoomLevel,
    log: SurfaceLog,
    attached: bool,
}

impl<S: Surface, P: PreferenceStore> ZoomController<S, P> {
    /// Restores the stored level and applies it to the surface.
    pub fn new(surface: S, store: P) -> Self {
        Self::labelled(surface, store, "root")
    }

    /// Like [`new`](Self::new), tagging log records with `label`.
    pub fn labelled(surface: S, store: P, label: &str) -> Self {
        let log = SurfaceLog::new(label);
        let level = restore(&store, &log);
        let controller = Self {
            surface,
            store,
            level,
            log,
            attached: true,
        };
        controller.apply();
        controller
    }

    /// Returns the current level.
    pub fn level(&self) -> ZoomLevel {
        self.level
    }

    /// Raises the level by one step, stopping at the maximum.
    pub fn zoom_in(&mut self) -> ZoomLevel {
        self.commit(self.level.step(ZOOM_STEP))
    }

    /// Lowers the level by one step, stopping at the minimum.
    pub fn zoom_out(&mut self) -> ZoomLevel {
        self.commit(self.level.step(-ZOOM_STEP))
    }

    /// Returns to the default level.
    pub fn reset(&mut self) -> ZoomLevel {
        self.commit(ZoomLevel::DEFAULT)
    }

    /// Sets the level, clamping out-of-range input instead of failing.
    pub fn set_zoom(&mut self, percent: i64) -> ZoomLevel {
        self.commit(ZoomLevel::clamped(percent))
    }

    /// Reverts the surface to its platform-default scale.
    ///
    /// The level stays readable and later changes are still persisted, but
    /// they are no longer applied to the surface. Safe to call repeatedly.
    pub fn release(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.surface.set_root_scale(None);
        self.log.debug(format_args!("zoom released; scale reset"));
    }

    fn commit(&mut self, level: ZoomLevel) -> ZoomLevel {
        self.level = level;
        if let Err(e) = self.store.set(ZOOM_STORAGE_KEY, &level.percent().to_string()) {
            self.log
                .warn(format_args!("could not persist zoom level {}: {}", level, e));
        }
        self.apply();
        self.log.info(format_args!("zoom set to {}", level));
        level
    }

    fn apply(&self) {
        if self.attached {
            self.surface.set_root_scale(Some(self.level.scale_factor()));
        }
    }
}

impl<S: Surface, P: PreferenceStore> Drop for ZoomController<S, P> {
    fn drop(&mut self) {
        self.release();
    }
}

fn restore<P: PreferenceStore>(store: &P, log: &SurfaceLog) -> ZoomLevel {
    match store.get(ZOOM_STORAGE_KEY) {
        Ok(Some(stored)) => ZoomLevel::parse(&stored).unwrap_or_else(|| {
            log.debug(format_args!(
                "ignoring stored zoom level {:?}; using default",
                stored
            ));
            ZoomLevel::DEFAULT
        }),
        Ok(None) => ZoomLevel::DEFAULT,
        Err(e) => {
            log.warn(format_args!("could not read zoom level: {}", e));
            ZoomLevel::DEFAULT
        }
    }
}
