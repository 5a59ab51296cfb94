use crate::color::Color;

use super::image::CodelImage;

/// Tracks color runs along one scan line at a time and keeps the shortest
/// run length seen over every line fed to it.
#[derive(Debug, Default)]
struct RunTracker {
    /// Color and start index of the run in progress.
    current: Option<(Color, u32)>,
    min_run: Option<u32>,
}

impl RunTracker {
    fn push(&mut self, index: u32, color: Color) {
        match self.current {
            Some((c, _)) if c == color => {}
            Some((_, start)) => {
                self.record(index - start);
                self.current = Some((color, index));
            }
            None => self.current = Some((color, index)),
        }
    }

    /// Close the line at `index`. The run in progress ends here no matter
    /// what color it has.
    fn end_line(&mut self, index: u32) {
        if let Some((_, start)) = self.current.take() {
            self.record(index - start);
        }
    }

    fn record(&mut self, len: u32) {
        self.min_run = Some(self.min_run.map_or(len, |m| m.min(len)));
    }

    fn scan_line(&mut self, line: impl IntoIterator<Item = Color>) {
        let mut len = 0;
        for (i, color) in (0u32..).zip(line) {
            self.push(i, color);
            len = i + 1;
        }
        self.end_line(len);
    }
}

/// Estimate the codel size of a Piet program image.
///
/// Scans every row left to right and every column top to bottom, and
/// returns the shortest run of same-colored pixels found. A run ends at a
/// color change or at the end of its line. A uniform image therefore
/// reports the shorter of its two sides, and an empty image reports 1.
pub fn estimate_codel_size(img: &CodelImage) -> u32 {
    let mut tracker = RunTracker::default();

    for y in 0..img.height {
        tracker.scan_line(img.row(y).iter().copied());
    }
    let row_min = tracker.min_run;

    for x in 0..img.width {
        tracker.scan_line(img.column(x));
    }

    log::trace!(
        "codel scan: row minimum {:?}, overall minimum {:?}",
        row_min,
        tracker.min_run
    );
    tracker.min_run.unwrap_or(1)
}
