//! Normalized in-memory font model.
//!
//! A [`FontContainer`] owns glyph groups and derives the shared font
//! metrics (baseline, width, height) that place every glyph in one
//! coordinate system. Population, transforms and metric recomputation
//! are an explicit two-phase protocol: mutate, then [`FontContainer::commit`].
//! Metrics read before a commit reflect the previous state, which is
//! defined behavior rather than an error.

use crate::{FontError, Glyph, RawMetrics, Result};

/// One contiguous insertion batch of glyphs, usually a Unicode sub-range.
///
/// Groups are ordered by insertion, not by code point; several groups may
/// be non-contiguous in code-point space.
#[derive(Debug, Clone, Default)]
pub struct Group {
    glyphs: Vec<Glyph>,
}

impl Group {
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn first_code(&self) -> Option<u32> {
        self.glyphs.first().map(|g| g.code)
    }

    /// Code points in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.glyphs.iter().map(|g| g.code)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The normalized font model: all groups plus the derived shared metrics.
#[derive(Debug, Clone)]
pub struct FontContainer {
    origin_name: String,
    /// Derived name, `<origin><width>x<height>` after a commit
    pub name: String,
    /// Nominal point size the source was rasterized at
    pub size: u32,
    /// Bounding-box width over all glyphs aligned at the shared origin
    pub width: usize,
    /// Bounding-box height over all glyphs aligned at the shared origin
    pub height: usize,
    /// Vertical shared origin: distance from the box top to the baseline
    pub baseline: i32,
    /// Horizontal shared origin
    pub baseline_h: i32,
    /// Code point of the first glyph ever added (legacy format field)
    pub first_char: Option<u32>,
    groups: Vec<Group>,
}

impl FontContainer {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        let origin_name = name.into();
        Self {
            name: origin_name.clone(),
            origin_name,
            size,
            width: 0,
            height: 0,
            baseline: 0,
            baseline_h: 0,
            first_char: None,
            groups: Vec::new(),
        }
    }

    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }

    /// Replace the origin name; the derived `<name><W>x<H>` form is
    /// refreshed on the next commit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.origin_name = name.into();
        self.name = self.origin_name.clone();
    }

    /// Start a new glyph group and return its index.
    pub fn add_group(&mut self) -> usize {
        self.groups.push(Group::default());
        self.groups.len() - 1
    }

    /// Append a glyph to `group`.
    ///
    /// Unset metrics default to the bitmap's own dimensions, `left = 0`
    /// and `top = height`. A code point that is already present anywhere
    /// in the container is rejected.
    pub fn add_char(&mut self, group: usize, code: u32, bitmap: Vec<Vec<bool>>, metrics: RawMetrics) -> Result<()> {
        if group >= self.groups.len() {
            return Err(FontError::InvalidGroup { group });
        }
        if self.find_glyph(code).is_some() {
            return Err(FontError::DuplicateChar { code });
        }
        if self.first_char.is_none() {
            self.first_char = Some(code);
        }
        self.groups[group].glyphs.push(Glyph::new(code, bitmap, metrics));
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All glyphs in insertion order, across groups.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.groups.iter().flat_map(|g| g.glyphs.iter())
    }

    fn glyphs_mut(&mut self) -> impl Iterator<Item = &mut Glyph> {
        self.groups.iter_mut().flat_map(|g| g.glyphs.iter_mut())
    }

    pub fn glyph_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn find_glyph(&self, code: u32) -> Option<&Glyph> {
        self.glyphs().find(|g| g.code == code)
    }

    /// Number of 8-pixel row bands needed for the shared height.
    pub fn rows(&self) -> usize {
        self.height.div_ceil(8)
    }

    /// Recompute the shared metrics from the current glyph set.
    ///
    /// Must be called after every batch of additions or transforms before
    /// metrics are read or the container is encoded.
    pub fn commit(&mut self) {
        let mut top = 0i32;
        let mut bottom = 0i32;
        let mut left = 0i32;
        let mut right = 0i32;
        for g in self.glyphs() {
            top = top.min(-g.top);
            bottom = bottom.max(g.height as i32 - g.top);
            left = left.min(-g.left);
            right = right.max(g.width as i32 - g.left);
        }
        self.width = (right - left) as usize;
        self.height = (bottom - top) as usize;
        self.baseline = -top;
        self.baseline_h = -left;
        self.name = format!("{}{}x{}", self.origin_name, self.width, self.height);
        log::debug!(
            "committed metrics for {}: {}x{}, baseline {}, baseline_h {}",
            self.name,
            self.width,
            self.height,
            self.baseline,
            self.baseline_h
        );
    }

    /// Pad blank rows above every glyph until its `top` bearing equals the
    /// shared baseline. Glyphs keep their own natural height below the
    /// baseline; this is the only alignment the grouped table layout needs.
    pub fn expand_top(&mut self) {
        let baseline = self.baseline;
        for g in self.glyphs_mut() {
            let pad = baseline - g.top;
            if pad > 0 {
                g.pad_top(pad as usize);
            }
            g.top = baseline;
        }
    }

    /// [`Self::expand_top`] plus bottom padding to the shared font height,
    /// producing fixed-height glyphs.
    pub fn expand_v(&mut self) {
        let baseline = self.baseline;
        let height = self.height;
        for g in self.glyphs_mut() {
            let pad_top = baseline - g.top;
            let pad_bottom = height as i32 - baseline - (g.height as i32 - g.top);
            if pad_top > 0 {
                g.pad_top(pad_top as usize);
            }
            if pad_bottom > 0 {
                g.pad_bottom(pad_bottom as usize);
            }
            g.top = baseline;
            debug_assert_eq!(g.height, height);
        }
    }

    /// Pad blank columns so every glyph spans the shared font width,
    /// anchored at `baseline_h`, or centered when `baseline_h == 0`.
    pub fn expand_h(&mut self) {
        let width = self.width;
        let baseline_h = self.baseline_h;
        for g in self.glyphs_mut() {
            let (before, after) = if baseline_h == 0 {
                let before = (width as i32 - g.width as i32) / 2;
                (before, width as i32 - g.width as i32 - before)
            } else {
                (baseline_h - g.left, width as i32 - baseline_h - (g.width as i32 - g.left))
            };
            g.pad_h(before.max(0) as usize, after.max(0) as usize);
            g.left = baseline_h;
            debug_assert_eq!(g.width, width);
        }
    }

    /// Expand every glyph to the full fixed cell, as the legacy table
    /// layout requires. Idempotent once the metrics are committed.
    pub fn expand(&mut self) {
        self.expand_v();
        self.expand_h();
    }

    /// Trim up to the requested pixel margins from every glyph, but only
    /// the portion of the margin that glyph actually occupies; a glyph
    /// narrower than the crop region is left untouched on that side.
    /// Recommits the shared metrics when done.
    pub fn deflate(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        // Remaining extents of the shared frame after the requested trim
        let left_part = self.baseline_h - left;
        let right_part = self.width as i32 - self.baseline_h - right;
        let top_part = self.baseline - top;
        let bottom_part = self.height as i32 - self.baseline - bottom;
        for g in self.glyphs_mut() {
            let left_p = ((g.left - left_part).max(0) as usize).min(g.width);
            let right_p = ((g.width as i32 - g.left - right_part).max(0) as usize).min(g.width - left_p);
            g.crop_h(left_p, right_p);

            let top_p = ((g.top - top_part).max(0) as usize).min(g.height);
            // A negative bottom trim grows short glyphs down to the new frame
            let bottom_p = g.height as i32 - g.top - bottom_part;
            if bottom_p < 0 {
                g.pad_bottom((-bottom_p) as usize);
                g.crop_v(top_p, 0);
            } else {
                g.crop_v(top_p, (bottom_p as usize).min(g.height - top_p));
            }
        }
        self.commit();
    }

    /// Truncate tall descenders from the bottom until the font fits
    /// `target_height` pixels.
    pub fn deflate_bottom(&mut self, target_height: usize) {
        let bottom = self.height as i32 - target_height as i32;
        self.deflate(0, 0, 0, bottom);
    }
}
