use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItemId(pub String);

impl MenuItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Burger,
    Side,
    Drink,
    Dessert,
}

impl MenuCategory {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Burger => "Burgers",
            Self::Side => "Sides",
            Self::Drink => "Drinks",
            Self::Dessert => "Desserts",
        }
    }

    pub const ALL: [MenuCategory; 4] =
        [Self::Burger, Self::Side, Self::Drink, Self::Dessert];
}

impl std::str::FromStr for MenuCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "burger" => Ok(Self::Burger),
            "side" => Ok(Self::Side),
            "drink" => Ok(Self::Drink),
            "dessert" => Ok(Self::Dessert),
            other => Err(format!(
                "unknown menu category `{other}` (expected burger|side|drink|dessert)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub unit_price: Decimal,
    pub description: String,
    pub available: bool,
    pub options: Vec<String>,
}

/// In-memory menu catalog. The catalog is the single source of truth for
/// item identity and pricing; order lines always copy their unit price from
/// here, never from conversation input.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn find(&self, item_id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    /// Case-insensitive substring match on the display name. Returns the
    /// first hit, so seed data keeps more specific names ahead of generic
    /// ones within a category.
    pub fn find_by_name(&self, name: &str) -> Option<&MenuItem> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.items.iter().find(|item| item.name.to_lowercase().contains(&needle))
    }

    pub fn by_category(&self, category: MenuCategory) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.category == category).collect()
    }

    pub fn search(&self, keyword: &str) -> Vec<&MenuItem> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn available_items(&self) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.available).collect()
    }

    pub fn all_items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The standard burger-shop menu the kiosk ships with.
    pub fn standard() -> Self {
        fn item(
            id: &str,
            name: &str,
            category: MenuCategory,
            price_cents: i64,
            description: &str,
            options: &[&str],
        ) -> MenuItem {
            MenuItem {
                id: MenuItemId::new(id),
                name: name.to_string(),
                category,
                unit_price: Decimal::new(price_cents, 2),
                description: description.to_string(),
                available: true,
                options: options.iter().map(|opt| opt.to_string()).collect(),
            }
        }

        let burger_options = ["extra cheese", "extra bacon", "extra patty"];

        Self::new(vec![
            item(
                "B001",
                "Classic Burger",
                MenuCategory::Burger,
                590,
                "Fresh beef patty with crisp vegetables",
                &burger_options,
            ),
            item(
                "B002",
                "Cheeseburger",
                MenuCategory::Burger,
                690,
                "Loaded with melted cheddar",
                &burger_options,
            ),
            item(
                "B003",
                "Bacon Burger",
                MenuCategory::Burger,
                790,
                "Premium burger topped with crispy bacon",
                &burger_options,
            ),
            item(
                "B004",
                "Double Burger",
                MenuCategory::Burger,
                890,
                "Two patties for the seriously hungry",
                &burger_options,
            ),
            item(
                "S001",
                "French Fries",
                MenuCategory::Side,
                250,
                "Golden and crispy",
                &["size upgrade"],
            ),
            item(
                "S002",
                "Mozzarella Sticks",
                MenuCategory::Side,
                350,
                "Stretchy mozzarella in a crunchy shell",
                &[],
            ),
            item("S003", "Onion Rings", MenuCategory::Side, 300, "Crispy battered onion", &[]),
            item("D001", "Cola", MenuCategory::Drink, 200, "Ice-cold cola", &["size upgrade"]),
            item("D002", "Lemon Soda", MenuCategory::Drink, 200, "Crisp lemon-lime soda", &[
                "size upgrade",
            ]),
            item("D003", "Americano", MenuCategory::Drink, 250, "Bold drip coffee", &[
                "size upgrade",
                "extra shot",
            ]),
            item(
                "DS001",
                "Soft Serve",
                MenuCategory::Dessert,
                200,
                "Smooth vanilla soft-serve ice cream",
                &[],
            ),
            item("DS002", "Apple Pie", MenuCategory::Dessert, 250, "Baked warm to order", &[]),
        ])
    }
}
