//! Fake customer generation for first-run seeding.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use customers_core::customer::{Customer, CustomerSeeder, sanitize_phone_number};
use customers_core::platform::Localization;

const FIRST_NAMES: &[&str] = &[
    "Aaliyah", "Aaron", "Abigail", "Adrian", "Aiden", "Alex", "Alice", "Amara", "Andre", "Angela",
    "Ava", "Beatriz", "Benjamin", "Bianca", "Brandon", "Caleb", "Camila", "Carlos", "Chloe",
    "Daniel", "Deepa", "Diego", "Elena", "Eli", "Emily", "Evan", "Fatima", "Felix", "Gabriel",
    "Grace", "Hannah", "Hiro", "Isaac", "Isabella", "Jamal", "Jasmine", "Jonah", "Julia",
    "Kenji", "Laila", "Leo", "Lucia", "Maya", "Mei", "Nadia", "Noah", "Olivia", "Omar", "Priya",
    "Quinn", "Rafael", "Rosa", "Samuel", "Sofia", "Tariq", "Uma", "Victor", "Wen", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Adeyemi", "Armstead", "Baker", "Bauer", "Chen", "Costa", "Dalton", "Dubois",
    "Ellison", "Fischer", "Flores", "Garcia", "Gupta", "Hansen", "Hughes", "Ibrahim", "Jensen",
    "Kaur", "Kowalski", "Lambert", "Lopez", "Moreau", "Murphy", "Nakamura", "Nguyen", "Novak",
    "O'Brien", "Okafor", "Park", "Patel", "Quinn", "Reyes", "Rossi", "Sato", "Schmidt", "Silva",
    "Singh", "Sullivan", "Tanaka", "Torres", "Ulrich", "Vargas", "Walsh", "Weber", "Xu", "Yamada",
    "Young", "Zhang", "Zimmerman",
];

const COMPANY_WORDS: &[&str] = &[
    "Acme", "Apex", "Blue Harbor", "Cascade", "Copperline", "Evergreen", "Granite", "Horizon",
    "Ironwood", "Lumen", "Meridian", "Northwind", "Pinnacle", "Redwood", "Silverlake", "Summit",
    "Tidewater", "Vertex",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "and Sons", "Partners", "Holdings"];

const CATCH_PHRASE_ADJECTIVES: &[&str] = &[
    "adaptive", "balanced", "centralized", "cross-platform", "decentralized", "distributed",
    "enhanced", "integrated", "multi-tiered", "optimized", "proactive", "reactive", "secured",
    "synergized", "user-centric", "virtual",
];

const CATCH_PHRASE_DESCRIPTORS: &[&str] = &[
    "asynchronous", "bifurcated", "client-driven", "dynamic", "empowering", "global",
    "heuristic", "interactive", "logistical", "modular", "real-time", "scalable", "systemic",
    "transitional",
];

const CATCH_PHRASE_NOUNS: &[&str] = &[
    "algorithm", "architecture", "capability", "database", "firmware", "framework", "hierarchy",
    "interface", "middleware", "paradigm", "portal", "strategy", "toolset", "workforce",
];

const STREET_NAMES: &[&str] = &[
    "Pacific", "Maple", "Oak", "Cedar", "Elm", "Lakeview", "Hillcrest", "Sunset", "Washington",
    "Lincoln", "Park", "River", "Highland", "Mission", "Market", "Jackson",
];

const STREET_SUFFIXES: &[&str] = &["Ave", "St", "Blvd", "Rd", "Ln", "Dr", "Ct", "Way"];

const CITIES: &[&str] = &[
    "Austin", "Boston", "Chicago", "Denver", "Fresno", "Houston", "Madison", "Miami", "Oakland",
    "Omaha", "Phoenix", "Portland", "Raleigh", "Sacramento", "San Diego", "San Francisco",
    "Seattle", "Tucson",
];

const STATE_ABBREVIATIONS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org", "mail.test"];

/// Generates plausible random customers.
///
/// Departments are title-cased through the injected [`Localization`]. With a
/// fixed seed, every call to [`CustomerSeeder::generate`] yields the same
/// records, identifiers included.
#[derive(Clone)]
pub struct FakeCustomerSeeder {
    localization: Arc<dyn Localization>,
    seed: Option<u64>,
}

impl FakeCustomerSeeder {
    pub fn new(localization: Arc<dyn Localization>) -> Self {
        Self {
            localization,
            seed: None,
        }
    }

    /// Makes generation deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn fake_customer(&self, rng: &mut StdRng) -> Customer {
        let first_name = pick(rng, FIRST_NAMES);
        let last_name = pick(rng, LAST_NAMES);
        let id = Builder::from_random_bytes(rng.r#gen()).into_uuid();

        Customer {
            id: id.to_string(),
            email: email(rng, &first_name, &last_name),
            company: format!("{} {}", pick(rng, COMPANY_WORDS), pick(rng, COMPANY_SUFFIXES)),
            department: self.localization.to_title_case(&catch_phrase(rng)),
            phone: phone(rng),
            street: format!(
                "{} {} {}",
                rng.gen_range(1..10_000),
                pick(rng, STREET_NAMES),
                pick(rng, STREET_SUFFIXES)
            ),
            unit: unit(rng),
            city: pick(rng, CITIES),
            state: pick(rng, STATE_ABBREVIATIONS),
            postal_code: format!("{:05}", rng.gen_range(1_000..100_000)),
            country: "USA".to_string(),
            photo_url: format!("https://robohash.org/{}.png?size=150x150", id.simple()),
            first_name,
            last_name,
            ..Customer::default()
        }
    }
}

impl CustomerSeeder for FakeCustomerSeeder {
    fn generate(&self, count: usize) -> Vec<Customer> {
        let mut rng = self.rng();
        let customers: Vec<Customer> = (0..count)
            .map(|_| self.fake_customer(&mut rng))
            .collect();
        tracing::debug!("Generated {} fake customers", customers.len());
        customers
    }
}

fn pick(rng: &mut StdRng, words: &[&str]) -> String {
    words.choose(rng).copied().unwrap_or_default().to_string()
}

fn email(rng: &mut StdRng, first_name: &str, last_name: &str) -> String {
    let local: String = format!("{first_name}.{last_name}")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    format!("{}@{}", local, pick(rng, EMAIL_DOMAINS))
}

fn catch_phrase(rng: &mut StdRng) -> String {
    format!(
        "{} {} {}",
        pick(rng, CATCH_PHRASE_ADJECTIVES),
        pick(rng, CATCH_PHRASE_DESCRIPTORS),
        pick(rng, CATCH_PHRASE_NOUNS)
    )
}

/// Ten dialable digits, generated in a formatted cell-number shape first.
fn phone(rng: &mut StdRng) -> String {
    let formatted = format!(
        "({}{:02}) {:03}-{:04}",
        rng.gen_range(2..10),
        rng.gen_range(0..100),
        rng.gen_range(0..1_000),
        rng.gen_range(0..10_000)
    );
    sanitize_phone_number(&formatted).chars().take(10).collect()
}

fn unit(rng: &mut StdRng) -> String {
    if rng.gen_bool(0.5) {
        format!("Apt. {}", rng.gen_range(100..1_000))
    } else {
        format!("Suite {}", rng.gen_range(100..1_000))
    }
}
