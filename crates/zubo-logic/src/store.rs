//! Life packages sold in the store.
//!
//! Checkout itself happens with the payment provider; what comes back is
//! "N lives purchased", applied with
//! [`GameSession::apply_purchase`](crate::session::GameSession::apply_purchase).
//! This module only knows the catalogue and when buying is allowed.

use crate::config::GameRules;
use crate::session::GameSession;

/// A purchasable bundle of lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifePackage {
    pub id: u8,
    pub lives: u32,
    /// Price in US cents.
    pub price_cents: u32,
    /// Highlighted as the best deal.
    pub popular: bool,
}

impl LifePackage {
    /// Price per life in cents, rounded down.
    pub fn cents_per_life(&self) -> u32 {
        self.price_cents / self.lives.max(1)
    }
}

pub const LIFE_PACKAGES: [LifePackage; 3] = [
    LifePackage {
        id: 1,
        lives: 5,
        price_cents: 300,
        popular: false,
    },
    LifePackage {
        id: 2,
        lives: 10,
        price_cents: 500,
        popular: true,
    },
    LifePackage {
        id: 3,
        lives: 20,
        price_cents: 1000,
        popular: false,
    },
];

/// Find a package by id.
pub fn package(id: u8) -> Option<&'static LifePackage> {
    LIFE_PACKAGES.iter().find(|p| p.id == id)
}

/// Whether the player may still buy lives at this point of the run.
pub fn purchases_allowed(session: &GameSession, rules: &GameRules) -> bool {
    session.answered_count < rules.store_cutoff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        assert_eq!(LIFE_PACKAGES.len(), 3);
        assert_eq!(package(2).map(|p| p.lives), Some(10));
        assert!(package(9).is_none());
        assert_eq!(LIFE_PACKAGES.iter().filter(|p| p.popular).count(), 1);
    }

    #[test]
    fn test_bigger_packages_are_not_pricier_per_life() {
        for pair in LIFE_PACKAGES.windows(2) {
            assert!(pair[1].cents_per_life() <= pair[0].cents_per_life());
        }
    }

    #[test]
    fn test_cutoff() {
        let rules = GameRules::default();
        let mut s = GameSession::new(&rules);
        s.answered_count = 74;
        assert!(purchases_allowed(&s, &rules));
        s.answered_count = 75;
        assert!(!purchases_allowed(&s, &rules));
    }
}
