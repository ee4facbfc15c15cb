use chrono::Duration;

/// Hourly base price scaled to the booked duration, rounded half-up to the
/// cent.
pub fn price_for(base_price_cents: i64, duration: Duration) -> i64 {
    let minutes = i128::from(duration.num_minutes());
    let cents = (i128::from(base_price_cents) * minutes + 30) / 60;
    i64::try_from(cents).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_and_rounds() {
        assert_eq!(price_for(2000, Duration::minutes(60)), 2000);
        assert_eq!(price_for(2000, Duration::minutes(90)), 3000);
        assert_eq!(price_for(1999, Duration::minutes(90)), 2999); // 2998.5
        assert_eq!(price_for(1000, Duration::minutes(100)), 1667);
        assert_eq!(price_for(0, Duration::minutes(120)), 0);
    }
}
