use serde::Serialize;

use super::product::{Product, ProductId};

/// A product line in the cart.
///
/// The product fields are a frozen copy taken when the line was created, so
/// later catalog changes do not reach items already in the cart.
///
/// `line` numbers each insertion. A product removed and added again gets a
/// fresh line, which keeps it apart from an order taken before the removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    #[serde(skip)]
    line: u64,
}

impl CartItem {
    fn from_product(product: Product, line: u64) -> Self {
        Self {
            product,
            quantity: 1,
            line,
        }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Read-only view of the cart handed to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: f64,
}

/// The cart contents and the rules for changing them.
///
/// ## Invariants
/// - At most one item per product id (adding again bumps the quantity)
/// - Every item has `quantity >= 1`
/// - Items keep the order in which they were first added
///
/// Mutators return whether anything changed so callers only announce real
/// commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(skip)]
    next_line: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Adds one unit of `product`, returning the line's new quantity.
    ///
    /// Stock is not checked here.
    pub fn add(&mut self, product: Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        let line = self.next_line;
        self.next_line += 1;
        self.items.push(CartItem::from_product(product, line));
        1
    }

    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Sets the quantity of an existing line. Zero or negative removes it.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Removes an ordered snapshot from the cart.
    ///
    /// Each ordered line's quantity is subtracted from the same line and lines
    /// that reach zero are dropped. Lines created after the snapshot was
    /// taken, including re-adds of an ordered product, are left alone.
    pub fn settle(&mut self, ordered: &[CartItem]) -> bool {
        let mut changed = false;
        for line in ordered {
            if let Some(item) = self.items.iter_mut().find(|item| item.line == line.line) {
                item.quantity = item.quantity.saturating_sub(line.quantity);
                changed = true;
            }
        }
        self.items.retain(|item| item.quantity > 0);
        changed
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }
}
