use std::time::Duration;

/// Signed relative time.
///
/// [`Duration`] cannot be negative, but callers computing a delay as
/// "deadline minus now" can end up with one. Negative delays are accepted and
/// clamped to zero by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    Forward(Duration),
    Backward(Duration),
}

impl Delay {
    pub fn from_millis(millis: i64) -> Self {
        let magnitude = Duration::from_millis(millis.unsigned_abs());
        if millis < 0 {
            Delay::Backward(magnitude)
        } else {
            Delay::Forward(magnitude)
        }
    }

    /// Non-finite input collapses to zero; values past `Duration::MAX` saturate.
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() {
            return if secs == f64::INFINITY {
                Delay::Forward(Duration::MAX)
            } else {
                Delay::Forward(Duration::ZERO)
            };
        }
        let magnitude = Duration::try_from_secs_f64(secs.abs()).unwrap_or(Duration::MAX);
        if secs < 0.0 {
            Delay::Backward(magnitude)
        } else {
            Delay::Forward(magnitude)
        }
    }
}

impl From<Duration> for Delay {
    fn from(duration: Duration) -> Self {
        Delay::Forward(duration)
    }
}

/// Clamps a relative time to a non-negative [`Duration`].
pub fn normalize(delay: impl Into<Delay>) -> Duration {
    match delay.into() {
        Delay::Forward(duration) => duration,
        Delay::Backward(_) => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_delays_clamp_to_zero() {
        assert_eq!(normalize(Delay::from_millis(-500)), Duration::ZERO);
        assert_eq!(normalize(Delay::from_secs_f64(-0.25)), Duration::ZERO);
        assert_eq!(normalize(Delay::from_millis(i64::MIN)), Duration::ZERO);
    }

    #[test]
    fn test_positive_delays_pass_through() {
        assert_eq!(normalize(Duration::from_secs(5)), Duration::from_secs(5));
        assert_eq!(
            normalize(Delay::from_millis(1500)),
            Duration::from_millis(1500)
        );
        assert_eq!(
            normalize(Delay::from_secs_f64(0.5)),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_non_finite_seconds() {
        assert_eq!(normalize(Delay::from_secs_f64(f64::NAN)), Duration::ZERO);
        assert_eq!(
            normalize(Delay::from_secs_f64(f64::NEG_INFINITY)),
            Duration::ZERO
        );
        assert_eq!(
            normalize(Delay::from_secs_f64(f64::INFINITY)),
            Duration::MAX
        );
    }
}
