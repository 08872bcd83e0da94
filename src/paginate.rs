use std::ops::Range;

/// Ordered, contiguous, non-overlapping index ranges covering `0..len` exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pages: Vec<Range<usize>>,
}

impl Partition {
    pub fn pages(&self) -> &[Range<usize>] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<Range<usize>> {
        self.pages.get(index).cloned()
    }

    /// Page holding chunk `index`.
    pub fn page_of(&self, index: usize) -> Option<usize> {
        self.pages.iter().position(|r| r.contains(&index))
    }

    /// `[[0, 1], [2], ...]`
    pub fn to_index_lists(&self) -> Vec<Vec<usize>> {
        self.pages.iter().map(|r| r.clone().collect()).collect()
    }
}

/// Greedy split of `heights` into pages of at most `capacity`.
///
/// A chunk that fits exactly stays on the current page. A chunk taller than `capacity`
/// gets a page to itself. Negative and NaN heights count as zero.
pub fn paginate(heights: &[f32], capacity: f32) -> Partition {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut used = 0.0f32;
    for (i, &h) in heights.iter().enumerate() {
        let h = if h > 0.0 { h } else { 0.0 };
        if i > start && used + h > capacity {
            pages.push(start..i);
            start = i;
            used = 0.0;
        }
        used += h;
    }
    if start < heights.len() {
        pages.push(start..heights.len());
    }
    Partition { pages }
}
