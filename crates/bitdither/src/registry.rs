//! Ordered, index-addressable collection of dithering algorithms.
//!
//! The registry is the single dispatch point shared by every caller. It
//! never gives an index special meaning: policies such as "0 restores the
//! original" belong to the caller.

use crate::buffer::PixelBuffer;
use crate::dither::{Dither, FloydSteinberg, Ordered, Random};

/// One registered algorithm.
pub struct AlgorithmEntry {
    key: &'static str,
    name: &'static str,
    transform: Box<dyn Dither + Send + Sync>,
}

impl AlgorithmEntry {
    /// Stable, lowercase identifier (e.g. `ordered-4x4`).
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Human-readable name (e.g. `Ordered 4x4`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The algorithm itself.
    pub fn transform(&self) -> &(dyn Dither + Send + Sync) {
        self.transform.as_ref()
    }
}

impl std::fmt::Debug for AlgorithmEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmEntry")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of `{key, name, transform}` entries.
///
/// # Example
///
/// ```
/// use bitdither::{AlgorithmRegistry, PixelBuffer, Rgb};
///
/// let registry = AlgorithmRegistry::standard();
/// assert_eq!(registry.resolve("floyd-steinberg"), Some(5));
/// assert_eq!(registry.resolve("1"), Some(1));
///
/// let mut image = PixelBuffer::filled(2, 2, Rgb::gray(128));
/// assert_eq!(registry.apply(1, &mut image, false), Some("Ordered 2x2"));
/// ```
#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    entries: Vec<AlgorithmEntry>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in set in its fixed order: random, four ordered sizes,
    /// Floyd-Steinberg.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("random", "Random", Random::new());
        registry.register("ordered-2x2", "Ordered 2x2", Ordered::bayer2());
        registry.register("ordered-4x4", "Ordered 4x4", Ordered::bayer4());
        registry.register("ordered-8x8", "Ordered 8x8", Ordered::bayer8());
        registry.register("ordered-16x16", "Ordered 16x16", Ordered::bayer16());
        registry.register("floyd-steinberg", "Floyd-Steinberg", FloydSteinberg);
        registry
    }

    /// Append an algorithm and return its index.
    pub fn register<D>(&mut self, key: &'static str, name: &'static str, transform: D) -> usize
    where
        D: Dither + Send + Sync + 'static,
    {
        self.entries.push(AlgorithmEntry {
            key,
            name,
            transform: Box::new(transform),
        });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AlgorithmEntry> {
        self.entries.get(index)
    }

    /// Index of the entry with the given key.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Resolve a user-supplied reference: a decimal index or a key.
    ///
    /// Keys are matched case-insensitively.
    pub fn resolve(&self, reference: &str) -> Option<usize> {
        let reference = reference.trim();
        if let Ok(index) = reference.parse::<usize>() {
            return (index < self.len()).then_some(index);
        }
        self.entries
            .iter()
            .position(|e| e.key.eq_ignore_ascii_case(reference))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmEntry> {
        self.entries.iter()
    }

    /// Run entry `index` over `image`.
    ///
    /// Returns the entry's name, or `None` (with `image` untouched) when the
    /// index is out of range.
    pub fn apply(&self, index: usize, image: &mut PixelBuffer, colored: bool) -> Option<&'static str> {
        let entry = self.get(index)?;
        entry.transform.dither(image, colored);
        Some(entry.name)
    }
}
