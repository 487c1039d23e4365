pub trait Clock {
    /// Monotonic milliseconds. Wraps at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Elapsed ticks from `since` to `now`, correct across counter wraparound.
pub const fn ticks_diff(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_without_wrap() {
        assert_eq!(ticks_diff(1_500, 1_000), 500);
    }

    #[test]
    fn diff_across_wrap() {
        assert_eq!(ticks_diff(199, u32::MAX - 300), 500);
    }

    #[test]
    fn diff_of_same_tick_is_zero() {
        assert_eq!(ticks_diff(42, 42), 0);
    }
}
