//! Busy-wait primitives for timing edges on the data line.

use embedded_hal::digital::PinState;

use crate::{
    clock::{Microseconds, MonotonicClock},
    line::GpioLine,
};

/// Polls `line` until it reads `level`.
///
/// Returns `true` as soon as the level matches and `false` once `timeout` has
/// elapsed since `start` without a match. `start` defaults to the current
/// instant; passing an earlier instant lets several waits share one deadline.
pub fn wait_for_level<L, C>(
    line: &mut L,
    clock: &C,
    level: PinState,
    timeout: Microseconds,
    start: Option<Microseconds>,
) -> bool
where
    L: GpioLine + ?Sized,
    C: MonotonicClock + ?Sized,
{
    let start = start.unwrap_or_else(|| clock.now());
    while line.read() != level {
        if clock.now().since(start) >= timeout {
            return false;
        }
    }
    true
}

/// Measures the width of the next pulse at `level`.
///
/// Any pulse already in progress is skipped first. All three edges must arrive
/// within `timeout` of the call; otherwise [`Microseconds::ZERO`] is returned,
/// which is never a real measurement.
pub fn measure_pulse<L, C>(
    line: &mut L,
    clock: &C,
    level: PinState,
    timeout: Microseconds,
) -> Microseconds
where
    L: GpioLine + ?Sized,
    C: MonotonicClock + ?Sized,
{
    let start = clock.now();

    if !wait_for_level(line, clock, !level, timeout, Some(start)) {
        return Microseconds::ZERO;
    }
    if !wait_for_level(line, clock, level, timeout, Some(start)) {
        return Microseconds::ZERO;
    }
    let rise = clock.now();
    if !wait_for_level(line, clock, !level, timeout, Some(start)) {
        return Microseconds::ZERO;
    }

    clock.now().since(rise)
}
