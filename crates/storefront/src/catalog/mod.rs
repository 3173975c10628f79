//! Static product catalog.
//!
//! The catalog is a fixed in-memory list loaded once at startup: no
//! database, no mutation after load. Listing and detail routes read from it,
//! and the checkout orchestrator takes its line items from it.

pub mod filters;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use dynasty_core::{Price, ProductId};

/// Product categories carried by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Neckties,
    BowTies,
    PocketSquares,
    Men,
    Women,
    Combos,
    OversizedTees,
    Wedding,
}

impl Category {
    /// All categories, in navigation order.
    pub const ALL: [Self; 8] = [
        Self::Neckties,
        Self::BowTies,
        Self::PocketSquares,
        Self::Men,
        Self::Women,
        Self::Combos,
        Self::OversizedTees,
        Self::Wedding,
    ];

    /// URL slug for the category.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Neckties => "neckties",
            Self::BowTies => "bow-ties",
            Self::PocketSquares => "pocket-squares",
            Self::Men => "men",
            Self::Women => "women",
            Self::Combos => "combos",
            Self::OversizedTees => "oversized-tees",
            Self::Wedding => "wedding",
        }
    }

    /// Prefix of the category's image files under `/images/`.
    const fn image_prefix(self) -> &'static str {
        match self {
            Self::Neckties => "necktie",
            Self::BowTies => "bowtie",
            Self::PocketSquares => "pocketsquares",
            Self::Men => "men",
            Self::Women => "women",
            Self::Combos => "combos",
            Self::OversizedTees => "oversizedtees",
            Self::Wedding => "wedding",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Error returned for a category slug the storefront does not carry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// A catalog product. Immutable once loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    /// Dominant color, used by the color filter.
    pub color: Option<&'static str>,
    pub pattern: Option<&'static str>,
    pub material: Option<&'static str>,
    pub is_new: bool,
}

impl Product {
    /// Number of stock photos per category; product images wrap over these.
    const IMAGES_PER_CATEGORY: u32 = 6;

    /// The product's main image reference, derived from its category and id.
    #[must_use]
    pub fn image(&self) -> String {
        let index = (self.id.as_u32() - 1) % Self::IMAGES_PER_CATEGORY + 1;
        format!("/images/{}{index}.jpg", self.category.image_prefix())
    }

    /// Main image plus four alternates, wrapping over the category's photos.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        let first = (self.id.as_u32() - 1) % Self::IMAGES_PER_CATEGORY + 1;
        (0..5)
            .map(|offset| {
                let index = (first + offset - 1) % Self::IMAGES_PER_CATEGORY + 1;
                format!("/images/{}{index}.jpg", self.category.image_prefix())
            })
            .collect()
    }

    /// The SKU printed on detail pages and packing slips.
    #[must_use]
    pub fn sku(&self) -> String {
        format!("TTH-SNT-{}", self.id)
    }
}

/// The static catalog: every product the storefront carries.
pub struct Catalog {
    products: &'static [Product],
}

impl Catalog {
    /// Load the catalog. Cheap after the first call.
    #[must_use]
    pub fn load() -> Self {
        static PRODUCTS: OnceLock<Vec<Product>> = OnceLock::new();
        Self {
            products: PRODUCTS.get_or_init(seed_products),
        }
    }

    /// All products across every category.
    #[must_use]
    pub const fn all(&self) -> &'static [Product] {
        self.products
    }

    /// Products in one category.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&'static Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Look up a product by id across all categories.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&'static Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::load()
    }
}

/// One entry of the seed list before it is numbered.
struct Seed {
    name: &'static str,
    description: &'static str,
    price: i64,
    category: Category,
    color: Option<&'static str>,
    pattern: Option<&'static str>,
    material: Option<&'static str>,
    is_new: bool,
}

/// Build the product list. Ids are assigned sequentially from 1 in seed
/// order, which also makes "newest" (id descending) match arrival order.
#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    let seeds = [
        // Neckties
        Seed {
            name: "Midnight Maratha Silk Tie",
            description: "Hand-finished seven-fold tie in deep navy mulberry silk.",
            price: 4200,
            category: Category::Neckties,
            color: Some("navy"),
            pattern: Some("solid"),
            material: Some("silk"),
            is_new: false,
        },
        Seed {
            name: "Jaipur Paisley Tie",
            description: "Woven paisley in maroon and antique gold.",
            price: 4800,
            category: Category::Neckties,
            color: Some("maroon"),
            pattern: Some("paisley"),
            material: Some("silk"),
            is_new: false,
        },
        Seed {
            name: "Charcoal Herringbone Tie",
            description: "Textured herringbone weave for the boardroom.",
            price: 3900,
            category: Category::Neckties,
            color: Some("grey"),
            pattern: Some("herringbone"),
            material: Some("wool-silk"),
            is_new: true,
        },
        Seed {
            name: "Ivory Wedding Stripe Tie",
            description: "Tonal ivory stripe, made for morning ceremonies.",
            price: 5600,
            category: Category::Neckties,
            color: Some("ivory"),
            pattern: Some("stripe"),
            material: Some("silk"),
            is_new: true,
        },
        // Bow ties
        Seed {
            name: "Classic Black Silk Bow",
            description: "Self-tie barathea bow in jet black.",
            price: 3400,
            category: Category::BowTies,
            color: Some("black"),
            pattern: Some("solid"),
            material: Some("silk"),
            is_new: false,
        },
        Seed {
            name: "Burgundy Velvet Bow",
            description: "Pre-tied velvet bow with adjustable strap.",
            price: 3800,
            category: Category::BowTies,
            color: Some("maroon"),
            pattern: Some("solid"),
            material: Some("velvet"),
            is_new: true,
        },
        Seed {
            name: "Polka Midnight Bow",
            description: "Navy ground with ivory pin dots.",
            price: 3600,
            category: Category::BowTies,
            color: Some("navy"),
            pattern: Some("dot"),
            material: Some("silk"),
            is_new: false,
        },
        // Pocket squares
        Seed {
            name: "Madder Print Square",
            description: "Ancient madder print with hand-rolled edges.",
            price: 3400,
            category: Category::PocketSquares,
            color: Some("maroon"),
            pattern: Some("print"),
            material: Some("silk"),
            is_new: false,
        },
        Seed {
            name: "White Linen Square",
            description: "Irish linen with a fine ivory border.",
            price: 3500,
            category: Category::PocketSquares,
            color: Some("ivory"),
            pattern: Some("solid"),
            material: Some("linen"),
            is_new: false,
        },
        Seed {
            name: "Peacock Jacquard Square",
            description: "Teal jacquard woven in Varanasi.",
            price: 4100,
            category: Category::PocketSquares,
            color: Some("teal"),
            pattern: Some("jacquard"),
            material: Some("silk"),
            is_new: true,
        },
        // Men
        Seed {
            name: "Bandhgala Evening Set",
            description: "Tie, bow, and square boxed for evening wear.",
            price: 9800,
            category: Category::Men,
            color: Some("black"),
            pattern: None,
            material: Some("silk"),
            is_new: false,
        },
        Seed {
            name: "Monsoon Check Tie",
            description: "Muted glen check for everyday tailoring.",
            price: 4300,
            category: Category::Men,
            color: Some("grey"),
            pattern: Some("check"),
            material: Some("wool-silk"),
            is_new: false,
        },
        // Women
        Seed {
            name: "Rosewater Neck Scarf",
            description: "Slim silk scarf in dusty rose.",
            price: 3700,
            category: Category::Women,
            color: Some("rose"),
            pattern: Some("solid"),
            material: Some("silk"),
            is_new: true,
        },
        Seed {
            name: "Indigo Block-Print Scarf",
            description: "Hand block-printed indigo twill.",
            price: 4400,
            category: Category::Women,
            color: Some("navy"),
            pattern: Some("print"),
            material: Some("cotton-silk"),
            is_new: false,
        },
        // Combos
        Seed {
            name: "Groom's Trousseau Box",
            description: "Wedding tie, bow, square, and lapel pin.",
            price: 12_500,
            category: Category::Combos,
            color: Some("ivory"),
            pattern: None,
            material: Some("silk"),
            is_new: true,
        },
        Seed {
            name: "Office Week Combo",
            description: "Five rotating ties for the working week.",
            price: 18_000,
            category: Category::Combos,
            color: None,
            pattern: None,
            material: Some("silk"),
            is_new: false,
        },
        // Oversized tees
        Seed {
            name: "Dynasty Crest Oversized Tee",
            description: "Heavyweight cotton tee with embroidered crest.",
            price: 3400,
            category: Category::OversizedTees,
            color: Some("black"),
            pattern: Some("solid"),
            material: Some("cotton"),
            is_new: true,
        },
        Seed {
            name: "Club Stripe Oversized Tee",
            description: "Drop-shoulder tee with knitted club stripe.",
            price: 3600,
            category: Category::OversizedTees,
            color: Some("ivory"),
            pattern: Some("stripe"),
            material: Some("cotton"),
            is_new: true,
        },
        Seed {
            name: "Faded Teal Oversized Tee",
            description: "Garment-dyed tee in washed teal.",
            price: 3500,
            category: Category::OversizedTees,
            color: Some("teal"),
            pattern: Some("solid"),
            material: Some("cotton"),
            is_new: false,
        },
        // Wedding
        Seed {
            name: "Sherwani Gold Cravat",
            description: "Brocade cravat in antique gold.",
            price: 6800,
            category: Category::Wedding,
            color: Some("gold"),
            pattern: Some("brocade"),
            material: Some("silk"),
            is_new: false,
        },
        Seed {
            name: "Baraat Safa Square",
            description: "Oversized celebration square in crimson.",
            price: 4600,
            category: Category::Wedding,
            color: Some("maroon"),
            pattern: Some("brocade"),
            material: Some("silk"),
            is_new: true,
        },
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, seed)| Product {
            #[allow(clippy::cast_possible_truncation)] // seed list is tiny
            id: ProductId::new(i as u32 + 1),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            price: Price::from_rupees(seed.price),
            category: seed.category,
            color: seed.color,
            pattern: seed.pattern,
            material: seed.material,
            is_new: seed.is_new,
        })
        .collect()
}
