//! Device position sources.

use crate::types::LocationError;

/// A raw device fix, before it is named by reverse geocoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Something that can report where the device is
pub trait PositionProvider: Send + Sync {
    fn current_position(&self) -> Result<Position, LocationError>;

    fn is_available(&self) -> bool {
        self.current_position().is_ok()
    }
}

/// Position pinned in configuration. Refuses requests when unset.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPosition {
    position: Option<Position>,
}

impl ConfiguredPosition {
    pub fn new(position: Option<(f64, f64)>) -> Self {
        Self {
            position: position.map(|(latitude, longitude)| Position { latitude, longitude }),
        }
    }
}

impl PositionProvider for ConfiguredPosition {
    fn current_position(&self) -> Result<Position, LocationError> {
        self.position.ok_or_else(|| {
            LocationError::Unsupported("no device position configured".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_position() {
        let provider = ConfiguredPosition::new(Some((13.55, 78.5)));
        assert!(provider.is_available());
        assert_eq!(
            provider.current_position().unwrap(),
            Position { latitude: 13.55, longitude: 78.5 }
        );
    }

    #[test]
    fn test_unconfigured_position_is_unsupported() {
        let provider = ConfiguredPosition::default();
        assert!(!provider.is_available());
        assert!(matches!(
            provider.current_position(),
            Err(LocationError::Unsupported(_))
        ));
    }
}
