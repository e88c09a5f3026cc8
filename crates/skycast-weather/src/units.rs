//! Temperature conversions. Results are rounded to one decimal place.

/// Round to one decimal place
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round_tenth(celsius * 9.0 / 5.0 + 32.0)
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    round_tenth((fahrenheit - 32.0) * 5.0 / 9.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        assert_eq!(celsius_to_fahrenheit(21.7), 71.1);
        assert_eq!(celsius_to_fahrenheit(36.6), 97.9);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        // -40.0 to 50.0 in 0.5 steps
        for step in 0..=180 {
            let celsius = -40.0 + f64::from(step) * 0.5;
            let back = fahrenheit_to_celsius(celsius_to_fahrenheit(celsius));
            assert!(
                (back - celsius).abs() <= 0.1,
                "{celsius} came back as {back}"
            );
        }
    }
}
