//! Shopper-facing notices for failed cart mutations.

use serde::Serialize;

/// Substrings that mark a server message as a stock problem.
const STOCK_MARKERS: [&str; 3] = ["insufficient", "inventory", "stock"];

/// The mutation a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Add,
    Update,
}

/// What the shopper is told after a failed add or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartNotice {
    /// The service refused for lack of stock.
    OutOfStock { mutation: Mutation },
    /// Adding failed for any other reason.
    AddFailed,
    /// Updating failed for any other reason.
    UpdateFailed,
}

impl CartNotice {
    /// Classify a failure message from the service.
    ///
    /// The match is a case-insensitive substring test, so wording changes on
    /// the server side can silently move a failure into the generic bucket.
    pub fn classify(mutation: Mutation, message: &str) -> Self {
        let lower = message.to_lowercase();
        if STOCK_MARKERS.iter().any(|m| lower.contains(m)) {
            return CartNotice::OutOfStock { mutation };
        }
        match mutation {
            Mutation::Add => CartNotice::AddFailed,
            Mutation::Update => CartNotice::UpdateFailed,
        }
    }

    pub fn is_stock_problem(&self) -> bool {
        matches!(self, CartNotice::OutOfStock { .. })
    }

    /// Text shown to the shopper.
    pub fn message(&self) -> &'static str {
        match self {
            CartNotice::OutOfStock {
                mutation: Mutation::Add,
            } => "There isn't enough stock in the inventory of this item.",
            CartNotice::OutOfStock {
                mutation: Mutation::Update,
            } => "You can’t add more of this item (Not enough stock available).",
            CartNotice::AddFailed => "Failed to add item in the cart. Please try again.",
            CartNotice::UpdateFailed => "Failed to update item. Please try again.",
        }
    }
}

impl std::fmt::Display for CartNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
