/// Start/stop bookkeeping for the animation loop. Each start hands out a new
/// generation, and a frame callback keeps rescheduling only while its
/// generation is current, so a quick stop/start never leaves two loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopGate {
    running: bool,
    generation: u32,
}

impl LoopGate {
    /// Generation for a new loop, or `None` if one is already running.
    pub fn start(&mut self) -> Option<u32> {
        if self.running {
            return None;
        }
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
        Some(self.generation)
    }

    /// Returns whether a loop was running.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Whether the loop of `generation` should run another frame.
    pub fn admits(&self, generation: u32) -> bool {
        self.running && self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_start_is_refused_while_running() {
        let mut gate = LoopGate::default();
        let first = gate.start().unwrap();
        assert_eq!(gate.start(), None);
        assert!(gate.admits(first));
    }

    #[test]
    fn restart_retires_the_old_loop() {
        let mut gate = LoopGate::default();
        let old = gate.start().unwrap();
        assert!(gate.stop());
        assert!(!gate.admits(old));
        // Restarted before the old loop saw its next frame.
        let new = gate.start().unwrap();
        assert_ne!(old, new);
        assert!(!gate.admits(old));
        assert!(gate.admits(new));
    }

    #[test]
    fn stop_when_idle_is_a_no_op() {
        let mut gate = LoopGate::default();
        assert!(!gate.stop());
        assert_eq!(gate, LoopGate::default());
    }
}
