use std::collections::VecDeque;
/// One window slot. Time, raw and filtered values always travel together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowEntry {
    pub t: f64,
    pub raw: f64,
    pub filtered: Option<f64>,
}
/// Series and x-axis range handed to the display.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowFrame {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub x_range: (f64, f64),
}
impl WindowFrame {
    pub fn len(&self) -> usize {
        self.xs.len()
    }
}
/// Rolling buffer bounded by elapsed time rather than sample count.
pub struct SampleWindow {
    entries: VecDeque<WindowEntry>,
    window_size: f64,
}
impl SampleWindow {
    pub fn new(window_size: f64) -> Self {
        Self {
            entries: VecDeque::new(),
            window_size,
        }
    }
    /// Append and evict; returns how many stale entries were dropped.
    pub fn push(&mut self, entry: WindowEntry) -> usize {
        self.entries.push_back(entry);
        self.evict()
    }
    fn evict(&mut self) -> usize {
        let mut evicted = 0;
        // Strictly greater: a span equal to the window size is kept.
        while self.span() > self.window_size {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }
    pub fn span(&self) -> f64 {
        match (self.entries.front(), self.entries.back()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }
    /// `[t_first, max(window_size, t_last)]`, so the axis never starts out narrower
    /// than the window.
    pub fn display_range(&self) -> Option<(f64, f64)> {
        let first = self.entries.front()?;
        let last = self.entries.back()?;
        Some((first.t, self.window_size.max(last.t)))
    }
    pub fn times(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.t).collect()
    }
    /// Current window for display; filtered values are preferred when present.
    pub fn frame(&self) -> Option<WindowFrame> {
        let x_range = self.display_range()?;
        let ys = self
            .entries
            .iter()
            .map(|e| e.filtered.unwrap_or(e.raw))
            .collect();
        Some(WindowFrame {
            xs: self.times(),
            ys,
            x_range,
        })
    }
}
#[cfg(test)]
impl SampleWindow {
    pub fn window_size(&self) -> f64 {
        self.window_size
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn oldest(&self) -> Option<&WindowEntry> {
        self.entries.front()
    }
    pub fn newest(&self) -> Option<&WindowEntry> {
        self.entries.back()
    }
    pub fn raw_values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.raw).collect()
    }
    /// Filtered series, or `None` when the window holds unfiltered samples.
    pub fn filtered_values(&self) -> Option<Vec<f64>> {
        self.entries.iter().map(|e| e.filtered).collect()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn entry(t: f64) -> WindowEntry {
        WindowEntry {
            t,
            raw: t * 2.0,
            filtered: Some(-t),
        }
    }
    #[test]
    fn evicts_until_span_fits() {
        let mut window = SampleWindow::new(10.0);
        for i in 0..=12 {
            window.push(entry(i as f64));
        }
        assert_eq!(window.oldest().map(|e| e.t), Some(2.0));
        assert_eq!(window.newest().map(|e| e.t), Some(12.0));
        assert_eq!(window.len(), 11);
        assert_eq!(window.span(), 10.0);
    }
    #[test]
    fn span_equal_to_window_is_kept() {
        let mut window = SampleWindow::new(2.5);
        assert_eq!(window.push(entry(0.0)), 0);
        assert_eq!(window.push(entry(2.5)), 0);
        assert_eq!(window.len(), 2);
        assert_eq!(window.push(entry(2.6)), 1);
        assert_eq!(window.oldest().map(|e| e.t), Some(2.5));
    }
    #[test]
    fn large_gap_leaves_only_newest() {
        let mut window = SampleWindow::new(1.0);
        for t in [0.0, 0.2, 0.4, 0.6] {
            window.push(entry(t));
        }
        assert_eq!(window.push(entry(30.0)), 4);
        assert_eq!(window.len(), 1);
        assert_eq!(window.span(), 0.0);
    }
    #[test]
    fn bound_holds_after_every_push() {
        let mut window = SampleWindow::new(3.0);
        let mut t = 0.0;
        for i in 0..500 {
            t += 0.013 * (i % 7) as f64 + 0.001;
            window.push(entry(t));
            assert!(window.span() <= window.window_size());
            let filtered = window.filtered_values().unwrap();
            assert_eq!(window.times().len(), window.raw_values().len());
            assert_eq!(window.times().len(), filtered.len());
        }
    }
    #[test]
    fn display_range_is_at_least_window_wide() {
        let mut window = SampleWindow::new(10.0);
        assert_eq!(window.display_range(), None);
        window.push(entry(0.5));
        window.push(entry(3.0));
        assert_eq!(window.display_range(), Some((0.5, 10.0)));
        for t in [8.0, 11.0, 14.0] {
            window.push(entry(t));
        }
        assert_eq!(window.display_range(), Some((8.0, 14.0)));
    }
    #[test]
    fn frame_uses_filtered_series_when_available() {
        let mut window = SampleWindow::new(10.0);
        window.push(entry(1.0));
        window.push(entry(2.0));
        let frame = window.frame().unwrap();
        assert_eq!(frame.xs, vec![1.0, 2.0]);
        assert_eq!(frame.ys, vec![-1.0, -2.0]);
        let mut raw_only = SampleWindow::new(10.0);
        raw_only.push(WindowEntry {
            t: 1.0,
            raw: 7.0,
            filtered: None,
        });
        assert_eq!(raw_only.frame().unwrap().ys, vec![7.0]);
        assert_eq!(raw_only.filtered_values(), None);
    }
}
