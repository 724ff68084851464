use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for overlay ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Process-wide counter feeding generated ids.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Interned identifier of a user-added overlay (text, icon, image, shape,
/// path). Four bytes, `Copy`, compared in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(Spur);

impl OverlayId {
    /// Intern a string as an id, returning the existing id if already known.
    pub fn intern(s: &str) -> Self {
        OverlayId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate an id such as `shape_12`. Unique within the process, but not
    /// against ids that arrived through deserialization; callers holding a
    /// map should go through `fresh_id` in the overlay store.
    pub fn with_prefix(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OverlayId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OverlayId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(OverlayId::intern(&s))
    }
}
