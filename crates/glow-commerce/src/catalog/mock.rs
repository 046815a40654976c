//! Seeded demo catalog.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Product;
use crate::money::{Currency, Money};

const CATEGORIES: [(&str, &str, &[&str]); 6] = [
    ("skincare", "Skincare", &["Serum", "Moisturizer", "Cleanser", "Toner", "Eye Cream"]),
    ("makeup", "Makeup", &["Foundation", "Lipstick", "Mascara", "Blush", "Highlighter"]),
    ("haircare", "Haircare", &["Shampoo", "Conditioner", "Hair Oil", "Hair Mask"]),
    ("fragrance", "Fragrance", &["Eau de Parfum", "Body Mist", "Perfume Oil"]),
    ("bodycare", "Body Care", &["Body Lotion", "Body Scrub", "Hand Cream", "Body Wash"]),
    ("tools", "Tools", &["Makeup Brush Set", "Jade Roller", "Sponge", "Gua Sha"]),
];

const BRANDS: [&str; 6] = [
    "Glow Co.",
    "Luxe Beauty",
    "Pure Skin",
    "Velvet Rose",
    "Botanica",
    "Aura Labs",
];

const ADJECTIVES: [&str; 8] = [
    "Radiant", "Hydrating", "Velvet", "Silk", "Dewy", "Midnight", "Rose", "Golden",
];

const DAY: i64 = 24 * 60 * 60;

/// Deterministic generator for demo product lists.
///
/// The same seed and `now` always produce the same catalog.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    seed: u64,
    count: usize,
    currency: Currency,
}

impl MockCatalog {
    /// Default number of generated products.
    pub const DEFAULT_COUNT: usize = 48;

    /// Create a generator for the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            count: Self::DEFAULT_COUNT,
            currency: Currency::USD,
        }
    }

    /// Set the number of products.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the price currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Generate the catalog. `now` is a unix timestamp in seconds; creation
    /// dates fall within the preceding year.
    pub fn generate(&self, now: i64) -> Vec<Product> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.count)
            .map(|i| self.product(i, now, &mut rng))
            .collect()
    }

    fn product(&self, index: usize, now: i64, rng: &mut StdRng) -> Product {
        let (category_id, category_name, kinds) = CATEGORIES[index % CATEGORIES.len()];
        let brand = BRANDS[(index / CATEGORIES.len()) % BRANDS.len()];
        let kind = kinds[rng.gen_range(0..kinds.len())];
        let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];

        // Prices end in .99 between $9.99 and $129.99.
        let dollars: i64 = rng.gen_range(10..=130);
        let price = Money::new(dollars * 100 - 1, self.currency);

        let rating = (rng.gen_range(30..=50) as f32) / 10.0;
        let stock = if rng.gen_bool(0.15) { 0 } else { rng.gen_range(1..=120) };
        let age_days: i64 = rng.gen_range(0..365);

        let id = format!("product-{}", index + 1);
        let mut product = Product::new(
            id.clone(),
            format!("{} {} {}", brand, adjective, kind),
            price,
        )
        .with_brand(brand)
        .with_category(category_id, category_name)
        .with_rating(rating)
        .with_stock(stock)
        .with_created_at(now - age_days * DAY)
        .with_image(format!("https://images.glowcart.test/{}.jpg", id));
        product.review_count = rng.gen_range(0..=2_500);

        if rng.gen_bool(0.3) {
            let markup: i64 = rng.gen_range(10..=40);
            let original = price.amount_cents + price.amount_cents * markup / 100;
            product = product.with_original_price(Money::new(original, self.currency));
        }
        if age_days < 30 {
            product = product.new_arrival();
        }
        if rng.gen_bool(0.2) {
            product = product.bestseller();
        }
        product
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new(42)
    }
}
