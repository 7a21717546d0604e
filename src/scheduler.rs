//! The fixed-rate accumulator that decides how many logical ticks to run
//! for a given slice of elapsed real time.

/// The hard cap on ticks a single [`TickScheduler::update`] call can emit.
///
/// This is the "spiral-of-death" guard: once a caller falls more than five
/// ticks behind, the core stops trying to catch up and drops the residual
/// accumulator instead, rather than burning an unbounded amount of CPU
/// replaying backlog ticks.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// A fixed-timestep accumulator, owned per-simulation rather than kept as
/// process-global state — tests construct their own instance.
///
/// Allocation-free and orientation-agnostic: nothing about hex geometry or
/// entity state leaks into this type.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    tick_rate: f32,
    tick_duration: f32,
    accumulator: f32,
    current_tick: u64,
}

impl TickScheduler {
    /// Constructs a scheduler running at `tick_rate` ticks per second.
    pub fn new(tick_rate: f32) -> Self {
        debug_assert!(tick_rate > 0.0);
        Self {
            tick_rate,
            tick_duration: 1.0 / tick_rate,
            accumulator: 0.0,
            current_tick: 0,
        }
    }

    /// The configured ticks-per-second rate.
    pub const fn tick_rate(&self) -> f32 {
        self.tick_rate
    }

    /// The duration of one tick in seconds, `1 / tick_rate`.
    pub const fn tick_duration(&self) -> f32 {
        self.tick_duration
    }

    /// The monotonically increasing tick counter.
    pub const fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// How far into the next tick the accumulator currently sits, in
    /// `[0, 1)`. Intended for the display-side interpolation an external
    /// collaborator owns; this core never reads it.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.tick_duration
    }

    /// Feeds `elapsed_seconds` of real time into the accumulator and
    /// returns how many logical ticks the caller should run.
    ///
    /// Emits one tick per full `tick_duration` accumulated, up to
    /// [`MAX_TICKS_PER_FRAME`]. If the cap is hit while time remains
    /// accumulated, the residual is dropped to zero rather than carried
    /// over — the spiral-of-death guard is mandatory, not best-effort.
    pub fn update(&mut self, elapsed_seconds: f32) -> u32 {
        debug_assert!(elapsed_seconds >= 0.0);
        self.accumulator += elapsed_seconds;

        let mut ticks = 0;
        while self.accumulator >= self.tick_duration && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.tick_duration;
            self.current_tick += 1;
            ticks += 1;
        }

        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= self.tick_duration {
            self.accumulator = 0.0;
        }

        ticks
    }

    /// Resets the accumulator to zero without touching `current_tick`.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_elapsed_produces_zero_ticks() {
        let mut sched = TickScheduler::new(10.0);
        assert_eq!(sched.update(0.0), 0);
        assert_eq!(sched.current_tick(), 0);
    }

    #[test]
    fn overflow_clamps_to_max_ticks_and_drops_residual() {
        let mut sched = TickScheduler::new(10.0);
        let ticks = sched.update(1.0);
        assert_eq!(ticks, MAX_TICKS_PER_FRAME);
        assert_eq!(sched.accumulator, 0.0);
    }

    #[test]
    fn empty_script_tick_advances_current_tick_by_one() {
        let mut sched = TickScheduler::new(10.0);
        sched.update(0.1);
        assert_eq!(sched.current_tick(), 1);
    }

    proptest::proptest! {
        #[test]
        fn never_exceeds_max_ticks_per_frame(elapsed in 0.0f32..100.0) {
            let mut sched = TickScheduler::new(30.0);
            let ticks = sched.update(elapsed);
            proptest::prop_assert!(ticks <= MAX_TICKS_PER_FRAME);
        }
    }
}
