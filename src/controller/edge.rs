/// Press/release tracking for a click button
///
/// Fires once per press-release cycle. Holding the button keeps the flag set
/// and suppresses repeated clicks until the button is released again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTracker {
    pressed: bool,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the current state; returns true on a fresh press
    pub fn update(&mut self, asserted: bool) -> bool {
        match (asserted, self.pressed) {
            (true, false) => {
                self.pressed = true;
                true
            }
            (false, true) => {
                self.pressed = false;
                false
            }
            _ => false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_while_held() {
        let mut edge = EdgeTracker::new();
        let fired: Vec<bool> = [true, true, true, true].iter().map(|&a| edge.update(a)).collect();
        assert_eq!(fired, vec![true, false, false, false]);
        assert!(edge.is_pressed());
    }

    #[test]
    fn release_rearms() {
        let mut edge = EdgeTracker::new();
        assert!(edge.update(true));
        assert!(!edge.update(false));
        assert!(!edge.is_pressed());
        assert!(edge.update(true));
    }

    #[test]
    fn idle_never_fires() {
        let mut edge = EdgeTracker::new();
        for _ in 0..5 {
            assert!(!edge.update(false));
        }
    }
}
