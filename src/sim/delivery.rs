//! Delivery requests and the request board

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::CityState;
use super::symbols::Difficulty;
use crate::consts::{BOARD_SIZE, CORRUPTED_REQUEST_CHANCE, SCAN_TICKS};

/// Flavor text for a delivery
#[derive(Debug, Clone, Copy)]
pub struct DeliveryTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub recipient: &'static str,
}

pub const DELIVERY_TEMPLATES: [DeliveryTemplate; 8] = [
    DeliveryTemplate {
        title: "A memory of spring rain",
        description: "Warm droplets on fresh leaves, the scent of renewal",
        recipient: "The Forgotten Garden",
    },
    DeliveryTemplate {
        title: "A lost lullaby",
        description: "Mother's voice, soft and eternal, wrapped in starlight",
        recipient: "Child in Sector 7",
    },
    DeliveryTemplate {
        title: "The taste of grandmother's cookies",
        description: "Love baked into every crumb, sweetness that transcends time",
        recipient: "Empty Kitchen Unit",
    },
    DeliveryTemplate {
        title: "First snow's silence",
        description: "The hush that falls when winter first kisses the earth",
        recipient: "The Waiting Room",
    },
    DeliveryTemplate {
        title: "Ocean waves at midnight",
        description: "Endless rhythm, ancient songs of salt and moon",
        recipient: "Desert Simulation",
    },
    DeliveryTemplate {
        title: "A cat's contented purr",
        description: "Vibrations of pure peace, trust made audible",
        recipient: "Lonely Apartment 404",
    },
    DeliveryTemplate {
        title: "Dancing shadows at sunset",
        description: "Light and darkness waltzing on cobblestone",
        recipient: "The Empty Plaza",
    },
    DeliveryTemplate {
        title: "The smell of old books",
        description: "Wisdom and adventure captured in yellowed pages",
        recipient: "Digital Library Core",
    },
];

/// Length of a delivery id
pub const DELIVERY_ID_LEN: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A delivery request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub title: String,
    pub description: String,
    pub recipient: String,
    pub difficulty: Difficulty,
    pub corrupted: bool,
}

impl Delivery {
    /// Roll a random request. Requests can only be corrupted while the city is.
    pub fn generate<R: Rng>(city: CityState, rng: &mut R) -> Self {
        let template = &DELIVERY_TEMPLATES[rng.random_range(0..DELIVERY_TEMPLATES.len())];
        let difficulty = Difficulty::ALL[rng.random_range(0..Difficulty::ALL.len())];
        let corrupted = city == CityState::Corrupted && rng.random_bool(CORRUPTED_REQUEST_CHANCE);

        Self {
            id: random_id(rng),
            title: template.title.to_string(),
            description: template.description.to_string(),
            recipient: template.recipient.to_string(),
            difficulty,
            corrupted,
        }
    }
}

fn random_id<R: Rng>(rng: &mut R) -> String {
    (0..DELIVERY_ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// The list of open requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryBoard {
    pub deliveries: Vec<Delivery>,
    /// Ticks until the running scan finishes (0 = idle)
    scan_ticks: u32,
}

impl DeliveryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scanning(&self) -> bool {
        self.scan_ticks > 0
    }

    /// Start a rescan. Returns false if one is already running.
    pub fn refresh(&mut self) -> bool {
        if self.is_scanning() {
            return false;
        }
        self.scan_ticks = SCAN_TICKS;
        true
    }

    /// Advance the scan; returns true when a fresh set of requests was posted
    pub fn tick<R: Rng>(&mut self, city: CityState, rng: &mut R) -> bool {
        if self.scan_ticks == 0 {
            return false;
        }
        self.scan_ticks -= 1;
        if self.scan_ticks > 0 {
            return false;
        }
        self.deliveries = (0..BOARD_SIZE).map(|_| Delivery::generate(city, rng)).collect();
        true
    }

    pub fn get(&self, id: &str) -> Option<&Delivery> {
        self.deliveries.iter().find(|d| d.id == id)
    }

    /// Take a fulfilled request off the board
    pub fn remove(&mut self, id: &str) -> Option<Delivery> {
        let index = self.deliveries.iter().position(|d| d.id == id)?;
        Some(self.deliveries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scan(board: &mut DeliveryBoard, city: CityState, rng: &mut Pcg32) -> u32 {
        let mut ticks = 0;
        while !board.tick(city, rng) {
            ticks += 1;
            assert!(ticks <= SCAN_TICKS, "scan never finished");
        }
        ticks + 1
    }

    #[test]
    fn test_generated_delivery_uses_template() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            let d = Delivery::generate(CityState::Stable, &mut rng);
            assert_eq!(d.id.len(), DELIVERY_ID_LEN);
            assert!(d.id.bytes().all(|b| ID_ALPHABET.contains(&b)));
            assert!(
                DELIVERY_TEMPLATES
                    .iter()
                    .any(|t| t.title == d.title && t.description == d.description && t.recipient == d.recipient)
            );
        }
    }

    #[test]
    fn test_corruption_only_in_corrupted_city() {
        let mut rng = Pcg32::seed_from_u64(99);
        for city in [CityState::Stable, CityState::Glitching] {
            for _ in 0..100 {
                assert!(!Delivery::generate(city, &mut rng).corrupted);
            }
        }
        let corrupted = (0..200)
            .filter(|_| Delivery::generate(CityState::Corrupted, &mut rng).corrupted)
            .count();
        assert!(corrupted > 100 && corrupted < 190, "got {} corrupted of 200", corrupted);
    }

    #[test]
    fn test_board_scan() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut board = DeliveryBoard::new();
        assert!(!board.is_scanning());
        assert!(!board.tick(CityState::Stable, &mut rng));

        assert!(board.refresh());
        assert!(board.is_scanning());
        assert!(!board.refresh(), "refresh is disabled while scanning");

        assert_eq!(scan(&mut board, CityState::Stable, &mut rng), SCAN_TICKS);
        assert!(!board.is_scanning());
        assert_eq!(board.deliveries.len(), BOARD_SIZE);
    }

    #[test]
    fn test_board_remove() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut board = DeliveryBoard::new();
        board.refresh();
        scan(&mut board, CityState::Glitching, &mut rng);

        let id = board.deliveries[1].id.clone();
        assert!(board.get(&id).is_some());
        assert_eq!(board.remove(&id).map(|d| d.id), Some(id.clone()));
        assert!(board.get(&id).is_none());
        assert_eq!(board.deliveries.len(), BOARD_SIZE - 1);
        assert!(board.remove("missing").is_none());
    }
}
