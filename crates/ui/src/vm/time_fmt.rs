/// "M:SS" label for the next-heart countdown.
#[must_use]
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_countdown(150), "2:30");
        assert_eq!(format_countdown(61), "1:01");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn negative_remainders_clamp_to_zero() {
        assert_eq!(format_countdown(-5), "0:00");
    }
}
