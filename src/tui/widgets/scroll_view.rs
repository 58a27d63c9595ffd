use ratatui::layout::Rect;
use std::cell::Cell;

/// Vertical scroll state for a column of fixed-height items.
///
/// Keeps the focused item fully on screen: when the viewport shrinks (small
/// terminal) the column scrolls just enough to reveal it, and scrolls back
/// when there is room again. The offset is a `Cell` so it can follow focus
/// during rendering, which only has shared access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollView {
    offset: Cell<u16>,
}

impl ScrollView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u16 {
        self.offset.get()
    }

    /// Adjust the offset so item `focused` is visible in a viewport of
    /// `viewport` rows. Items are stacked with `gap` rows between them.
    pub fn reveal(&self, heights: &[u16], gap: u16, focused: usize, viewport: u16) {
        let total = total_height(heights, gap);
        let max_offset = total.saturating_sub(viewport);
        let mut offset = self.offset.get().min(max_offset);

        if let Some(height) = heights.get(focused) {
            let top = item_top(heights, gap, focused);
            let bottom = top + height;
            // An item taller than the viewport shows from its top
            if top < offset || *height > viewport {
                offset = top;
            } else if bottom > offset + viewport {
                offset = bottom.saturating_sub(viewport).min(max_offset);
            }
        }
        self.offset.set(offset);
    }

    pub fn reset(&self) {
        self.offset.set(0);
    }

    /// Screen rectangles for each item inside `area`; `None` for items not
    /// fully visible at the current offset. The `focused` item is the
    /// exception: when it starts inside the view it is clipped to the bottom
    /// edge rather than dropped.
    pub fn layout(&self, heights: &[u16], gap: u16, focused: usize, area: Rect) -> Vec<Option<Rect>> {
        let offset = self.offset.get();
        let view_bottom = offset + area.height;
        let mut top = 0u16;
        heights
            .iter()
            .enumerate()
            .map(|(index, &height)| {
                let starts_in_view = top >= offset && top < view_bottom;
                let visible = if top + height <= view_bottom {
                    height
                } else {
                    view_bottom.saturating_sub(top)
                };
                let item = (starts_in_view && (visible == height || index == focused)).then(|| Rect {
                    x: area.x,
                    y: area.y + (top - offset),
                    width: area.width,
                    height: visible,
                });
                top += height + gap;
                item
            })
            .collect()
    }
}

fn item_top(heights: &[u16], gap: u16, index: usize) -> u16 {
    heights[..index].iter().map(|h| h + gap).sum()
}

fn total_height(heights: &[u16], gap: u16) -> u16 {
    let gaps = gap * heights.len().saturating_sub(1) as u16;
    heights.iter().sum::<u16>() + gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHTS: [u16; 4] = [3, 3, 3, 3];

    #[test]
    fn test_everything_fits_no_scroll() {
        let view = ScrollView::new();
        view.reveal(&HEIGHTS, 1, 3, 20);
        assert_eq!(view.offset(), 0);
        let rects = view.layout(&HEIGHTS, 1, 3, Rect::new(0, 2, 10, 20));
        assert_eq!(rects[0], Some(Rect::new(0, 2, 10, 3)));
        assert_eq!(rects[3], Some(Rect::new(0, 14, 10, 3)));
    }

    #[test]
    fn test_scrolls_down_to_reveal_focused() {
        let view = ScrollView::new();
        // total = 4*3 + 3 gaps = 15, viewport 8
        view.reveal(&HEIGHTS, 1, 3, 8);
        assert_eq!(view.offset(), 7);
        let rects = view.layout(&HEIGHTS, 1, 3, Rect::new(0, 0, 10, 8));
        assert_eq!(rects[0], None);
        assert_eq!(rects[3], Some(Rect::new(0, 5, 10, 3)));
    }

    #[test]
    fn test_scrolls_back_up() {
        let view = ScrollView::new();
        view.reveal(&HEIGHTS, 1, 3, 8);
        view.reveal(&HEIGHTS, 1, 0, 8);
        assert_eq!(view.offset(), 0);
    }

    #[test]
    fn test_offset_shrinks_when_viewport_grows() {
        let view = ScrollView::new();
        view.reveal(&HEIGHTS, 1, 3, 8);
        view.reveal(&HEIGHTS, 1, 3, 40);
        assert_eq!(view.offset(), 0);
    }

    #[test]
    fn test_item_taller_than_viewport_is_clipped_from_its_top() {
        let view = ScrollView::new();
        let heights = [3, 4, 3];
        view.reveal(&heights, 1, 1, 3);
        assert_eq!(view.offset(), 4);

        let rects = view.layout(&heights, 1, 1, Rect::new(0, 0, 10, 3));
        assert_eq!(rects[0], None);
        assert_eq!(rects[1], Some(Rect::new(0, 0, 10, 3)));
        assert_eq!(rects[2], None);
    }

    #[test]
    fn test_partially_visible_unfocused_item_is_dropped() {
        let view = ScrollView::new();
        let rects = view.layout(&HEIGHTS, 1, 0, Rect::new(0, 0, 10, 6));
        assert_eq!(rects[0], Some(Rect::new(0, 0, 10, 3)));
        assert_eq!(rects[1], None);
    }

    #[test]
    fn test_out_of_range_focus_is_ignored() {
        let view = ScrollView::new();
        view.reveal(&HEIGHTS, 1, 9, 8);
        assert_eq!(view.offset(), 0);
    }
}
