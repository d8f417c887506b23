//! Render/query boundary between the engine and the page
//!
//! The engine never touches the DOM directly. It asks a `Surface` for element
//! bounds and pushes back a ball offset plus a handful of boolean visual
//! flags. `HeadlessBoard` is an in-memory surface with a fixed layout.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::{BucketColor, Rect};

/// Elements the Plinko engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Ball,
    /// Text label riding on the ball
    Label,
    Board,
    Peg(usize),
    Bucket(usize),
}

/// Boolean visual states the engine toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFlag {
    /// Peg was just hit
    Highlight,
    /// Bucket holds the current ball
    Active,
    /// Bucket celebrates a settle
    Glow,
    /// Ball is dimmed between drops
    Faded,
    /// Bucket is painted yellow instead of white
    Filled,
}

impl VisualFlag {
    /// Flag that paints a bucket in `color`
    pub fn for_color(color: BucketColor) -> (VisualFlag, bool) {
        (VisualFlag::Filled, color == BucketColor::Yellow)
    }
}

pub trait Surface {
    fn is_present(&self, element: Element) -> bool;
    fn peg_count(&self) -> usize;
    fn bucket_count(&self) -> usize;
    /// Layout bounds of an element, in a space shared by all elements
    fn bounds(&self, element: Element) -> Option<Rect>;
    fn set_visual_state(&mut self, element: Element, flag: VisualFlag, on: bool);
    /// Move the ball to `offset` from its rest position
    fn place_ball(&mut self, offset: Vec2);
    fn set_label(&mut self, text: &str);
}

/// Fixed-layout surface kept entirely in memory
///
/// Coordinates are board-relative. The ball's rest position has its top edge
/// at the board top and is centered horizontally.
#[derive(Debug, Clone)]
pub struct HeadlessBoard {
    pub board: Rect,
    pub ball_size: f32,
    pub pegs: Vec<Rect>,
    pub buckets: Vec<Rect>,
    ball_offset: Vec2,
    label: String,
    flags: HashSet<(Element, VisualFlag)>,
}

impl HeadlessBoard {
    pub fn new(board: Rect, ball_size: f32, pegs: Vec<Rect>, buckets: Vec<Rect>) -> Self {
        Self {
            board,
            ball_size,
            pegs,
            buckets,
            ball_offset: Vec2::ZERO,
            label: String::new(),
            flags: HashSet::new(),
        }
    }

    /// The landing page layout: staggered peg rows over five 50px buckets
    pub fn landing_page() -> Self {
        let board = Rect::new(0.0, 0.0, 300.0, 320.0);
        let peg_size = 10.0;
        let mut pegs = Vec::new();
        for row in 0..7 {
            let cols = if row % 2 == 0 { 7 } else { 6 };
            let spacing = 30.0;
            let row_width = (cols - 1) as f32 * spacing;
            let y = 50.0 + row as f32 * 28.0;
            for col in 0..cols {
                let x = board.center().x - row_width / 2.0 + col as f32 * spacing;
                pegs.push(Rect::new(x - peg_size / 2.0, y - peg_size / 2.0, peg_size, peg_size));
            }
        }
        let buckets = (0..5)
            .map(|i| Rect::new(25.0 + i as f32 * 50.0, 250.0, 50.0, 50.0))
            .collect();
        Self::new(board, 16.0, pegs, buckets)
    }

    pub fn ball_offset(&self) -> Vec2 {
        self.ball_offset
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn has_flag(&self, element: Element, flag: VisualFlag) -> bool {
        self.flags.contains(&(element, flag))
    }

    fn ball_rect(&self) -> Rect {
        let left = self.board.center().x - self.ball_size / 2.0;
        Rect::new(
            left + self.ball_offset.x,
            self.board.top + self.ball_offset.y,
            self.ball_size,
            self.ball_size,
        )
    }
}

impl Surface for HeadlessBoard {
    fn is_present(&self, _element: Element) -> bool {
        true
    }

    fn peg_count(&self) -> usize {
        self.pegs.len()
    }

    fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bounds(&self, element: Element) -> Option<Rect> {
        match element {
            Element::Ball | Element::Label => Some(self.ball_rect()),
            Element::Board => Some(self.board),
            Element::Peg(i) => self.pegs.get(i).copied(),
            Element::Bucket(i) => self.buckets.get(i).copied(),
        }
    }

    fn set_visual_state(&mut self, element: Element, flag: VisualFlag, on: bool) {
        if on {
            self.flags.insert((element, flag));
        } else {
            self.flags.remove(&(element, flag));
        }
    }

    fn place_ball(&mut self, offset: Vec2) {
        self.ball_offset = offset;
    }

    fn set_label(&mut self, text: &str) {
        self.label = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_rect_follows_offset() {
        let mut board = HeadlessBoard::landing_page();
        let rest = board.bounds(Element::Ball).unwrap();
        assert_eq!(rest.center().x, 150.0);
        assert_eq!(rest.top, 0.0);

        board.place_ball(Vec2::new(12.0, 40.0));
        let moved = board.bounds(Element::Ball).unwrap();
        assert_eq!(moved.left - rest.left, 12.0);
        assert_eq!(moved.top, 40.0);
    }

    #[test]
    fn test_landing_page_layout() {
        let board = HeadlessBoard::landing_page();
        assert_eq!(board.bucket_count(), 5);
        assert_eq!(board.peg_count(), 7 * 4 + 6 * 3);
        // Bucket row spans 250px centered on the board
        let first = board.bounds(Element::Bucket(0)).unwrap();
        let last = board.bounds(Element::Bucket(4)).unwrap();
        assert_eq!(last.right() - first.left, 250.0);
        assert!(board.bounds(Element::Peg(99)).is_none());
    }

    #[test]
    fn test_flags() {
        let mut board = HeadlessBoard::landing_page();
        board.set_visual_state(Element::Peg(3), VisualFlag::Highlight, true);
        assert!(board.has_flag(Element::Peg(3), VisualFlag::Highlight));
        board.set_visual_state(Element::Peg(3), VisualFlag::Highlight, false);
        assert!(!board.has_flag(Element::Peg(3), VisualFlag::Highlight));
    }
}
