//! The persistent stroke list: drawable points separated by pen-up markers.

use serde::Serialize;

use super::color::PaintColor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StrokePoint {
    pub pos: (i32, i32),
    pub color: PaintColor,
    pub thickness: u32,
}

impl StrokePoint {
    pub fn new(pos: (i32, i32), color: PaintColor, thickness: u32) -> Self {
        Self {
            pos,
            color,
            thickness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeEntry {
    Point(StrokePoint),
    /// Lift the pen: no segment is drawn across this entry.
    PenUp,
}

impl StrokeEntry {
    pub fn point(&self) -> Option<&StrokePoint> {
        match self {
            StrokeEntry::Point(point) => Some(point),
            StrokeEntry::PenUp => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrokeList {
    entries: Vec<StrokeEntry>,
}

impl StrokeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<StrokeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[StrokeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.entries.iter().filter(|e| e.point().is_some()).count()
    }

    pub fn points(&self) -> impl Iterator<Item = &StrokePoint> {
        self.entries.iter().filter_map(StrokeEntry::point)
    }

    pub fn push_point(&mut self, point: StrokePoint) {
        self.entries.push(StrokeEntry::Point(point));
    }

    /// Append a pen-up marker. A marker directly after another marker (or at the
    /// start of the list) changes nothing visible, so it is not stored.
    pub fn pen_up(&mut self) {
        if matches!(self.entries.last(), Some(StrokeEntry::Point(_))) {
            self.entries.push(StrokeEntry::PenUp);
        }
    }

    /// Remove every point strictly closer than `radius` to `center`. Markers
    /// stay. Returns how many points were removed.
    pub fn erase_near(&mut self, center: (i32, i32), radius: f32) -> usize {
        let before = self.entries.len();
        let r2 = radius * radius;
        self.entries.retain(|entry| match entry {
            StrokeEntry::Point(point) => {
                let dx = (point.pos.0 - center.0) as f32;
                let dy = (point.pos.1 - center.1) as f32;
                dx * dx + dy * dy >= r2
            }
            StrokeEntry::PenUp => true,
        });
        before - self.entries.len()
    }

    /// Move every stored point vertically by `dy`; markers are left alone.
    pub fn shift_y(&mut self, dy: i32) {
        if dy == 0 {
            return;
        }
        for entry in &mut self.entries {
            if let StrokeEntry::Point(point) = entry {
                point.pos.1 += dy;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Segments to render: each list-adjacent pair where neither entry is a marker.
    pub fn segments(&self) -> impl Iterator<Item = (&StrokePoint, &StrokePoint)> {
        self.entries
            .windows(2)
            .filter_map(|pair| match (&pair[0], &pair[1]) {
                (StrokeEntry::Point(a), StrokeEntry::Point(b)) => Some((a, b)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> StrokePoint {
        StrokePoint::new((x, y), PaintColor::RED, 10)
    }

    #[test]
    fn pen_up_breaks_segments() {
        let broken = StrokeList::from_entries(vec![
            StrokeEntry::Point(p(0, 0)),
            StrokeEntry::PenUp,
            StrokeEntry::Point(p(10, 0)),
        ]);
        assert_eq!(broken.segments().count(), 0);

        let joined =
            StrokeList::from_entries(vec![StrokeEntry::Point(p(0, 0)), StrokeEntry::Point(p(10, 0))]);
        assert_eq!(joined.segments().count(), 1);
    }

    #[test]
    fn segments_pair_adjacent_points_only() {
        let list = StrokeList::from_entries(vec![
            StrokeEntry::Point(p(0, 0)),
            StrokeEntry::Point(p(1, 0)),
            StrokeEntry::Point(p(2, 0)),
            StrokeEntry::PenUp,
            StrokeEntry::Point(p(3, 0)),
            StrokeEntry::Point(p(4, 0)),
        ]);
        let pairs: Vec<_> = list.segments().map(|(a, b)| (a.pos.0, b.pos.0)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (3, 4)]);
    }

    #[test]
    fn pen_up_collapses_repeats() {
        let mut list = StrokeList::new();
        list.pen_up();
        assert!(list.is_empty());
        list.push_point(p(0, 0));
        list.pen_up();
        list.pen_up();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn erase_removes_points_inside_radius() {
        let mut list = StrokeList::new();
        list.push_point(p(100, 100));
        list.push_point(p(120, 100));
        list.push_point(p(300, 100));
        let removed = list.erase_near((100, 100), 50.0);
        assert_eq!(removed, 2);
        assert_eq!(list.points().map(|pt| pt.pos).collect::<Vec<_>>(), vec![(300, 100)]);
    }

    #[test]
    fn erase_radius_is_exclusive() {
        let mut list = StrokeList::new();
        list.push_point(p(150, 100));
        assert_eq!(list.erase_near((100, 100), 50.0), 0);
        assert_eq!(list.erase_near((101, 100), 50.0), 1);
    }

    #[test]
    fn erase_keeps_markers_and_order() {
        let mut list = StrokeList::from_entries(vec![
            StrokeEntry::Point(p(0, 0)),
            StrokeEntry::Point(p(100, 0)),
            StrokeEntry::PenUp,
            StrokeEntry::Point(p(110, 0)),
            StrokeEntry::Point(p(400, 0)),
        ]);
        assert_eq!(list.erase_near((105, 0), 20.0), 2);
        assert_eq!(
            list.entries(),
            &[
                StrokeEntry::Point(p(0, 0)),
                StrokeEntry::PenUp,
                StrokeEntry::Point(p(400, 0)),
            ]
        );
    }

    #[test]
    fn erasing_twice_changes_nothing_more() {
        let mut list = StrokeList::new();
        for x in (0..400).step_by(20) {
            list.push_point(p(x, 100));
            if x % 100 == 0 {
                list.pen_up();
            }
        }
        list.erase_near((200, 100), 50.0);
        let once = list.clone();
        let removed = list.erase_near((200, 100), 50.0);
        assert_eq!(removed, 0);
        assert_eq!(list, once);
    }

    #[test]
    fn shifts_are_additive() {
        let mut base = StrokeList::new();
        base.push_point(p(10, 10));
        base.pen_up();
        base.push_point(p(20, -5));

        let mut stepwise = base.clone();
        stepwise.shift_y(7);
        stepwise.shift_y(-19);

        let mut single = base.clone();
        single.shift_y(7 - 19);

        assert_eq!(stepwise, single);
        assert_eq!(single.entries()[1], StrokeEntry::PenUp);
        assert_eq!(single.points().next().map(|pt| pt.pos), Some((10, -2)));
    }
}
