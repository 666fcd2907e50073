use crate::config::SYSTICK_FREQUENCY_HZ;

pub type TickDuration = fugit::Duration<u32, 1, { SYSTICK_FREQUENCY_HZ }>;
pub type TickInstant = fugit::Instant<u32, 1, { SYSTICK_FREQUENCY_HZ }>;

pub use TickDuration as Duration;
pub use TickInstant as Instant;

/// Monotonic control clock.
///
/// Every blocking maneuver polls shared state in a loop and calls
/// [`Clock::wait_tick`] once per iteration. This is the only scheduling point
/// of the core: on hardware the periodic control interrupt updates encoders,
/// sensors and the speed loop in the background and `wait_tick` may return
/// immediately. A simulated platform advances its model by one tick there.
pub trait Clock {
    fn now(&self) -> Instant;

    fn wait_tick(&mut self);

    /// Blocking sleep for the given number of ticks
    fn sleep_ticks(&mut self, ticks: u32) {
        let start = self.now();
        while elapsed_ticks(start, self.now()) < ticks {
            self.wait_tick();
        }
    }
}

pub fn elapsed_ticks(since: Instant, now: Instant) -> u32 {
    (now - since).ticks()
}

/// Elapsed time in seconds between two instants
pub fn elapsed_seconds(since: Instant, now: Instant) -> f32 {
    elapsed_ticks(since, now) as f32 / SYSTICK_FREQUENCY_HZ as f32
}
