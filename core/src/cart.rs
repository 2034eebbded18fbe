// printshop_core/src/cart.rs

//! The shopping cart: a pure, synchronous reducer over (product snapshot,
//! quantity, customizations) lines, plus the order-policy gates the UI
//! applies in front of it.
//!
//! The reducer does no I/O and recomputes the running total from scratch
//! after every mutation, so the total can never drift from the line items.
//! Products are copied by value at add time; later catalog price changes do
//! not retroactively reprice lines already in the cart. The cart lives only
//! in transient session memory and is never persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Product;

pub type Customizations = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  /// Snapshot taken at add time.
  pub product: Product,
  pub quantity: u32,
  pub customizations: Option<Customizations>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
  lines: Vec<CartLine>,
  total: f64,
}

impl Cart {
  pub fn new() -> Self {
    Cart::default()
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn total(&self) -> f64 {
    self.total
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Adds a product. If a line with the same product id already exists its
  /// quantity is increased and its existing customizations are retained
  /// (not merged, not replaced); otherwise a new line is appended.
  pub fn add(&mut self, product: Product, quantity: u32, customizations: Option<Customizations>) {
    if quantity == 0 {
      return;
    }
    match self.lines.iter_mut().find(|line| line.product.id == product.id) {
      Some(line) => line.quantity += quantity,
      None => self.lines.push(CartLine {
        product,
        quantity,
        customizations,
      }),
    }
    self.recompute_total();
  }

  /// Removes every line matching the product id.
  pub fn remove(&mut self, product_id: &str) {
    self.lines.retain(|line| line.product.id != product_id);
    self.recompute_total();
  }

  /// Sets a line's quantity. Anything at or below zero drops the line
  /// entirely; that is a normal removal, not an error.
  pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
    if quantity <= 0 {
      self.remove(product_id);
      return;
    }
    if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == product_id) {
      line.quantity = quantity as u32;
    }
    self.recompute_total();
  }

  pub fn clear(&mut self) {
    self.lines.clear();
    self.total = 0.0;
  }

  fn recompute_total(&mut self) {
    self.total = self
      .lines
      .iter()
      .map(|line| line.product.price * f64::from(line.quantity))
      .sum();
  }
}

/// UI-level order policies, checked before dispatching an add to the
/// reducer. These are deliberately not reducer invariants: the reducer will
/// happily accept a quantity of 1.
pub mod policy {
  use thiserror::Error;

  use super::Cart;
  use crate::model::{Category, Product};

  /// First poster/customizable addition is bumped to this order minimum.
  pub const MIN_POSTER_QUANTITY: u32 = 3;

  /// The size a companion print must have for a split poster to qualify.
  pub const QUALIFYING_SIZE: &str = "A4";

  #[derive(Debug, Error, Clone, PartialEq, Eq)]
  pub enum CartPolicyError {
    #[error("Split posters pair with a standard print: add an A4 poster or A4 custom print to your cart first, then add the split poster.")]
    SplitPosterWithoutCompanion,
  }

  /// What the gate decided for an add request.
  #[derive(Debug, Clone, PartialEq)]
  pub struct AdmittedAdd {
    /// Quantity to actually dispatch (possibly bumped).
    pub quantity: u32,
    /// Set when the quantity was silently adjusted; shown to the user after
    /// the fact.
    pub adjustment_notice: Option<String>,
  }

  fn qualifies_as_companion(product: &Product, customizations: Option<&super::Customizations>) -> bool {
    if !matches!(product.category, Category::Poster | Category::Customizable) {
      return false;
    }
    let chosen_size = customizations
      .and_then(|c| c.get("size").map(String::as_str))
      .or(product.size.as_deref());
    chosen_size == Some(QUALIFYING_SIZE)
  }

  fn cart_has_companion(cart: &Cart) -> bool {
    cart
      .lines()
      .iter()
      .any(|line| qualifies_as_companion(&line.product, line.customizations.as_ref()))
  }

  /// Gates an add request against the current cart contents.
  ///
  /// - A split poster is admitted only when the cart already holds (or is
  ///   concurrently gaining, which to this check looks the same: gate after
  ///   the companion add) a qualifying A4 poster/customizable line.
  /// - The first poster/customizable addition is bumped to
  ///   [`MIN_POSTER_QUANTITY`], with a notice for the user.
  pub fn gate_add(
    cart: &Cart,
    product: &Product,
    requested_quantity: u32,
  ) -> Result<AdmittedAdd, CartPolicyError> {
    if product.category == Category::SplitPoster && !cart_has_companion(cart) {
      return Err(CartPolicyError::SplitPosterWithoutCompanion);
    }

    let first_print_line = matches!(product.category, Category::Poster | Category::Customizable)
      && !cart
        .lines()
        .iter()
        .any(|line| matches!(line.product.category, Category::Poster | Category::Customizable));
    if first_print_line && requested_quantity < MIN_POSTER_QUANTITY {
      return Ok(AdmittedAdd {
        quantity: MIN_POSTER_QUANTITY,
        adjustment_notice: Some(format!(
          "Posters ship in sets of {MIN_POSTER_QUANTITY} or more, so we set your quantity to {MIN_POSTER_QUANTITY}."
        )),
      });
    }

    Ok(AdmittedAdd {
      quantity: requested_quantity,
      adjustment_notice: None,
    })
  }
}
