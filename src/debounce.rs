/// Two-sample edge detector for a single button.
///
/// Each physical button (and the encoder push-button) owns its own instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debouncer {
    current: bool,
    previous: bool,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift the current sample into history and record `raw`.
    pub fn update(&mut self, raw: bool) {
        self.previous = self.current;
        self.current = raw;
    }

    /// True only on the update where the signal went false → true.
    pub fn is_pressed(&self) -> bool {
        self.current && !self.previous
    }

    /// True only on the update where the signal went true → false.
    pub fn is_released(&self) -> bool {
        !self.current && self.previous
    }

    pub fn changed(&self) -> bool {
        self.current != self.previous
    }

    pub fn state(&self) -> bool {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_edge_reported_once() {
        let mut d = Debouncer::new();
        let samples = [false, true, true, true, false, true];
        let edges: Vec<bool> = samples
            .iter()
            .map(|&s| {
                d.update(s);
                d.is_pressed()
            })
            .collect();
        assert_eq!(edges, [false, true, false, false, false, true]);
    }

    #[test]
    fn held_signal_never_repeats() {
        let mut d = Debouncer::new();
        d.update(true);
        assert!(d.is_pressed());
        for _ in 0..10 {
            d.update(true);
            assert!(!d.is_pressed());
            assert!(!d.changed());
        }
    }

    #[test]
    fn falling_edge() {
        let mut d = Debouncer::new();
        d.update(true);
        d.update(false);
        assert!(d.is_released());
        assert!(!d.is_pressed());
        assert!(d.changed());
        d.update(false);
        assert!(!d.is_released());
    }

    #[test]
    fn instances_are_independent() {
        let mut a = Debouncer::new();
        let b = Debouncer::new();
        a.update(true);
        assert!(a.is_pressed());
        assert!(!b.is_pressed());
        assert!(!b.state());
    }
}
