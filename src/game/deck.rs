use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};

use crate::game::card::{Card, CardId, CardKind};
use crate::types::{BuildingKind, CardType, PropertyColor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("draw pile is empty")]
    Exhausted,
}

/// Draw pile plus discard pile. Cards are drawn from the end of `draw_pile`.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    recycle_discards: bool,
    rng: StdRng,
}

impl Deck {
    pub fn standard(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cards = standard_catalog();
        cards.shuffle(&mut rng);
        Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
            recycle_discards: false,
            rng,
        }
    }

    /// Unshuffled deck that deals `cards` in order, first card first.
    pub fn stacked(cards: Vec<Card>) -> Self {
        let mut draw_pile = cards;
        draw_pile.reverse();
        Self {
            draw_pile,
            discard_pile: Vec::new(),
            recycle_discards: false,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_recycling(mut self, recycle_discards: bool) -> Self {
        self.recycle_discards = recycle_discards;
        self
    }

    pub fn draw_card(&mut self) -> Result<Card, DeckError> {
        if self.draw_pile.is_empty() && self.recycle_discards && !self.discard_pile.is_empty() {
            self.draw_pile.append(&mut self.discard_pile);
            self.draw_pile.shuffle(&mut self.rng);
            tracing::debug!(cards = self.draw_pile.len(), "reshuffled discard pile");
        }
        self.draw_pile.pop().ok_or(DeckError::Exhausted)
    }

    pub fn discard_card(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn cards_remaining(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn total_cards(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }
}

pub fn standard_catalog() -> Vec<Card> {
    use PropertyColor::*;

    const MONEY: &[(u32, usize)] = &[(10, 1), (5, 2), (4, 3), (3, 4), (2, 6), (1, 7)];
    const PROPERTIES: &[(PropertyColor, u32, &[&str])] = &[
        (Brown, 1, &["Old Town Rd", "Cobblestone Way"]),
        (LightBlue, 1, &["Sunrise Ave", "Ocean View Dr", "Mountain Pass"]),
        (Pink, 2, &["Rose St", "Violet Ave", "Magenta Pl"]),
        (Orange, 2, &["Harvest Ln", "Poppy Hills", "Sunset Blvd"]),
        (Red, 3, &["Ruby Rd", "Garnet Ave", "Crimson Sq"]),
        (Yellow, 3, &["Gold St", "Lemon Ln", "Sunshine Way"]),
        (Green, 4, &["Emerald Dr", "Forest Rd", "Meadow Walk"]),
        (DarkBlue, 4, &["Luxury Lane", "Prestige Point"]),
        (
            Railroad,
            2,
            &["Central Station", "East Line RR", "West Line RR", "North Line RR"],
        ),
        (Utility, 2, &["Power Plant", "Water Works"]),
    ];
    const WILDS: &[(&str, &[PropertyColor], u32, usize)] = &[
        ("Wild (Pink/Orange)", &[Pink, Orange], 2, 2),
        ("Wild (Lt.Blue/Brown)", &[LightBlue, Brown], 1, 1),
        ("Wild (Lt.Blue/Railroad)", &[LightBlue, Railroad], 2, 1),
        ("Wild (Green/Railroad)", &[Green, Railroad], 4, 1),
        ("Wild (Dk.Blue/Green)", &[DarkBlue, Green], 4, 1),
        ("Wild (Utility/Railroad)", &[Utility, Railroad], 2, 1),
        ("Wild (Yellow/Red)", &[Yellow, Red], 3, 2),
        ("Property Wildcard (Any Color)", &PropertyColor::ALL, 0, 3),
    ];
    const RENTS: &[(&str, &[PropertyColor], u32, usize)] = &[
        ("Rent (Pink/Orange)", &[Pink, Orange], 1, 3),
        ("Rent (Lt.Blue/Brown)", &[LightBlue, Brown], 1, 3),
        ("Rent (Green/Dk.Blue)", &[Green, DarkBlue], 1, 3),
        ("Rent (Yellow/Red)", &[Yellow, Red], 1, 3),
        ("Rent (Railroad/Utility)", &[Railroad, Utility], 1, 3),
    ];
    const BUILDINGS: &[(BuildingKind, &str, u32, usize)] = &[
        (BuildingKind::House, "House", 3, 3),
        (BuildingKind::Hotel, "Hotel", 4, 3),
    ];
    const ACTIONS: &[(CardType, &str, u32, usize)] = &[
        (CardType::DoubleTheRent, "Double The Rent", 1, 2),
        (CardType::JustSayNo, "Just Say No!", 4, 3),
        (CardType::DealBreaker, "Deal Breaker", 5, 2),
        (CardType::SlyDeal, "Sly Deal", 3, 3),
        (CardType::ForcedDeal, "Forced Deal", 3, 4),
        (CardType::DebtCollector, "Debt Collector", 3, 3),
        (CardType::Birthday, "It's My Birthday!", 2, 3),
        (CardType::PassGo, "Pass Go", 1, 10),
    ];

    let mut next_id = 0;
    let mut cards = Vec::with_capacity(120);
    let mut push = |name: &str, value: u32, kind: CardKind, count: usize| {
        for _ in 0..count {
            next_id += 1;
            cards.push(Card::new(CardId(next_id), name, value, kind.clone()));
        }
    };

    for (value, count) in MONEY {
        let name = format!("${value}M");
        push(name.as_str(), *value, CardKind::Money, *count);
    }
    for (color, value, names) in PROPERTIES {
        for name in *names {
            push(*name, *value, CardKind::Property { color: *color }, 1);
        }
    }
    for (name, colors, value, count) in WILDS {
        let kind = CardKind::PropertyWild {
            colors: colors.to_vec(),
        };
        push(*name, *value, kind, *count);
    }
    push(
        "Rent (Wild - All Colors)",
        3,
        CardKind::Rent {
            colors: PropertyColor::ALL.to_vec(),
            wild: true,
        },
        3,
    );
    for (name, colors, value, count) in RENTS {
        let kind = CardKind::Rent {
            colors: colors.to_vec(),
            wild: false,
        };
        push(*name, *value, kind, *count);
    }
    for (building, name, value, count) in BUILDINGS {
        let kind = CardKind::Building {
            building: *building,
        };
        push(*name, *value, kind, *count);
    }
    for (card_type, name, value, count) in ACTIONS {
        if let Some(kind) = CardKind::simple(*card_type) {
            push(*name, *value, kind, *count);
        }
    }
    cards
}
