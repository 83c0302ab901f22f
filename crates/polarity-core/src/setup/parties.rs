//! Party Setup
//!
//! Creates the five parties spanning the ideology axis.

use crate::components::party::{Party, PartyId, PartyRegistry};

/// Create all parties and register them, left to right
pub fn create_parties() -> PartyRegistry {
    let mut registry = PartyRegistry::new();

    registry.register(Party::new(PartyId(0), "Radical Left", -0.8, "#ef4444", 0.2));
    registry.register(Party::new(PartyId(1), "Center-Left Alliance", -0.3, "#22c55e", 0.4));
    registry.register(Party::new(PartyId(2), "Centrist Bloc", 0.0, "#94a3b8", 0.5));
    registry.register(Party::new(PartyId(3), "Nationalist Alliance", 0.3, "#3b82f6", 0.6));
    registry.register(Party::new(PartyId(4), "Religious Right", 0.8, "#a855f7", 0.8));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_creation() {
        let registry = create_parties();
        assert_eq!(registry.len(), 5);

        let ideologies: Vec<f64> = registry.all_parties().map(|p| p.base_ideology).collect();
        assert_eq!(ideologies, vec![-0.8, -0.3, 0.0, 0.3, 0.8]);

        for (i, party) in registry.all_parties().enumerate() {
            assert_eq!(party.id, PartyId(i));
            assert_eq!(party.current_ideology, party.base_ideology);
            assert_eq!(party.strength, 0);
        }
    }

    #[test]
    fn test_party_lookup() {
        let registry = create_parties();
        assert_eq!(registry.find_by_name("Centrist Bloc").unwrap().id, PartyId(2));
        assert_eq!(registry.find_by_name("Religious Right").unwrap().y_pos, 0.8);
    }
}
