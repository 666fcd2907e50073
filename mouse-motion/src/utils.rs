/// Sign of a number: -1, 0 or 1
pub fn sign(number: f32) -> f32 {
    ((number > 0.0) as i8 - (number < 0.0) as i8) as f32
}

/// Convert meters into encoder micrometers
pub fn meters_to_micrometers(meters: f32) -> i32 {
    (meters * crate::config::MICROMETERS_PER_METER) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_numbers() {
        assert_eq!(sign(3.2), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }

    #[test]
    fn meters_round_toward_zero() {
        assert_eq!(meters_to_micrometers(0.18), 180_000);
        assert_eq!(meters_to_micrometers(-0.0005), -500);
    }
}
