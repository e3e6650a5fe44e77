//! "Current line" highlight.
//!
//! The highlighted block is whichever visible block sits closest to the
//! vertical center of the viewport.

use super::surface::{BlockId, ContentBlocks, Rect};

/// Pick the block nearest the viewport center among those intersecting the
/// viewport.  Ties resolve to the earliest block in document order.
pub fn pick_center_block<I>(viewport: Rect, blocks: I) -> Option<BlockId>
where
    I: IntoIterator<Item = (BlockId, Rect)>,
{
    let center = viewport.center_y();
    let mut best: Option<(BlockId, f64)> = None;

    for (id, rect) in blocks {
        if !rect.intersects(&viewport) {
            continue;
        }
        let distance = (rect.center_y() - center).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((id, distance)),
        }
    }

    best.map(|(id, _)| id)
}

/// Which block currently carries the marker.  The block itself belongs to
/// the content; only its id is remembered here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightState {
    current: Option<BlockId>,
}

impl HighlightState {
    pub fn current(&self) -> Option<BlockId> {
        self.current
    }

    /// Move the marker to the center block.  When nothing is visible the
    /// previous highlight is kept, so a reflow does not flash it off.
    pub fn update<C: ContentBlocks + ?Sized>(&mut self, viewport: Rect, content: &mut C) {
        let Some(target) = pick_center_block(viewport, content.block_rects()) else {
            return;
        };
        if self.current == Some(target) {
            return;
        }
        if let Some(old) = self.current.take() {
            content.set_marked(old, false);
        }
        content.set_marked(target, true);
        self.current = Some(target);
    }

    /// Remove the marker and forget the block.
    pub fn clear<C: ContentBlocks + ?Sized>(&mut self, content: &mut C) {
        if let Some(old) = self.current.take() {
            content.set_marked(old, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blocks {
        rects: Vec<Rect>,
        marked: Vec<bool>,
    }

    impl Blocks {
        fn new(rects: Vec<Rect>) -> Self {
            let marked = vec![false; rects.len()];
            Self { rects, marked }
        }

        fn marked_ids(&self) -> Vec<usize> {
            (0..self.marked.len()).filter(|&i| self.marked[i]).collect()
        }
    }

    impl ContentBlocks for Blocks {
        fn block_rects(&self) -> Vec<(BlockId, Rect)> {
            self.rects
                .iter()
                .enumerate()
                .map(|(i, r)| (BlockId(i), *r))
                .collect()
        }

        fn set_marked(&mut self, id: BlockId, marked: bool) {
            if let Some(slot) = self.marked.get_mut(id.0) {
                *slot = marked;
            }
        }
    }

    /// Viewport centered on y = 0.
    fn viewport() -> Rect {
        Rect::new(-100.0, 200.0)
    }

    #[test]
    fn picks_block_nearest_the_center() {
        // Centers at -50, 0 and 80.
        let blocks = vec![
            (BlockId(0), Rect::new(-60.0, 20.0)),
            (BlockId(1), Rect::new(-10.0, 20.0)),
            (BlockId(2), Rect::new(70.0, 20.0)),
        ];
        assert_eq!(pick_center_block(viewport(), blocks), Some(BlockId(1)));
    }

    #[test]
    fn ties_go_to_the_first_block() {
        let blocks = vec![
            (BlockId(0), Rect::new(-30.0, 20.0)),
            (BlockId(1), Rect::new(10.0, 20.0)),
        ];
        assert_eq!(pick_center_block(viewport(), blocks), Some(BlockId(0)));
    }

    #[test]
    fn ignores_blocks_outside_the_viewport() {
        // The off-screen block would be closer if it were considered.
        let blocks = vec![
            (BlockId(0), Rect::new(-500.0, 1.0)),
            (BlockId(1), Rect::new(90.0, 5.0)),
        ];
        assert_eq!(pick_center_block(viewport(), blocks), Some(BlockId(1)));
        assert_eq!(pick_center_block(viewport(), vec![(BlockId(0), Rect::new(300.0, 5.0))]), None);
    }

    #[test]
    fn moves_the_single_marker() {
        let mut content = Blocks::new(vec![Rect::new(-60.0, 20.0), Rect::new(-10.0, 20.0)]);
        let mut state = HighlightState::default();

        state.update(viewport(), &mut content);
        assert_eq!(state.current(), Some(BlockId(1)));
        assert_eq!(content.marked_ids(), vec![1]);

        // Scroll: block 0 is now the centered one.
        content.rects = vec![Rect::new(-10.0, 20.0), Rect::new(40.0, 20.0)];
        state.update(viewport(), &mut content);
        assert_eq!(state.current(), Some(BlockId(0)));
        assert_eq!(content.marked_ids(), vec![0]);
    }

    #[test]
    fn keeps_highlight_when_nothing_is_visible() {
        let mut content = Blocks::new(vec![Rect::new(-10.0, 20.0)]);
        let mut state = HighlightState::default();
        state.update(viewport(), &mut content);

        content.rects = vec![Rect::new(1_000.0, 20.0)];
        state.update(viewport(), &mut content);
        assert_eq!(state.current(), Some(BlockId(0)));
        assert_eq!(content.marked_ids(), vec![0]);
    }

    #[test]
    fn clear_unmarks_and_forgets() {
        let mut content = Blocks::new(vec![Rect::new(-10.0, 20.0)]);
        let mut state = HighlightState::default();
        state.update(viewport(), &mut content);
        state.clear(&mut content);
        assert_eq!(state.current(), None);
        assert!(content.marked_ids().is_empty());
    }
}
