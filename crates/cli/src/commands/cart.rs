//! Cart commands.
//!
//! Each command opens the cart, applies at most one mutation, then renders
//! the result. Observer callbacks stand in for the storefront's badge and
//! toast: they queue lines that are flushed after the command runs.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use nutrijoseph_cart::storage::KeyValueStore;
use nutrijoseph_cart::{CartConfig, CartStore, CartView, NewProduct, added_notification};
use nutrijoseph_core::CurrencyCode;
use tracing::{info, warn};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Output format for read commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// An open cart plus the notifications its observers have queued.
pub struct Session<S> {
    cart: CartStore<S>,
    currency: CurrencyCode,
    notices: Rc<RefCell<Vec<String>>>,
}

impl<S: KeyValueStore> Session<S> {
    /// Open the cart on `backend` and wire up presentation observers.
    pub fn open(backend: S, config: &CartConfig) -> Self {
        let mut cart = CartStore::from_config(backend, config);
        let notices = Rc::new(RefCell::new(Vec::new()));

        if let Some(warning) = cart.take_load_warning() {
            warn!(%warning, "Cart will not survive a restart");
            notices
                .borrow_mut()
                .push(format!("Aviso: {warning}. El carrito no se guardará."));
        }

        let currency = config.currency;
        cart.on_change(move |totals| {
            info!(
                total_items = totals.total_items,
                total_price = %totals.total_price.display(currency),
                "Cart badge updated"
            );
        });

        let sink = Rc::clone(&notices);
        cart.on_item_added(move |name| sink.borrow_mut().push(added_notification(name)));

        let sink = Rc::clone(&notices);
        cart.on_persistence_warning(move |warning| {
            sink.borrow_mut()
                .push(format!("Aviso: {warning}. El carrito no se guardará."));
        });

        Self {
            cart,
            currency,
            notices,
        }
    }

    pub fn add(
        &mut self,
        out: &mut impl Write,
        id: &str,
        name: &str,
        price: &str,
        image: &str,
    ) -> CommandResult {
        let product = NewProduct::parse(id, name, price, image)?;
        let outcome = self.cart.add_item(product)?;
        info!(product_id = %id, quantity = outcome.quantity, "Product added");
        self.flush_notices(out)?;
        writeln!(out, "Productos en el carrito: {}", self.cart.total_items())?;
        Ok(())
    }

    pub fn remove(&mut self, out: &mut impl Write, id: &str) -> CommandResult {
        let mutation = self.cart.remove_item(id);
        self.flush_notices(out)?;
        if mutation.changed {
            writeln!(out, "Producto {id} eliminado")?;
        } else {
            writeln!(out, "El producto {id} no está en el carrito")?;
        }
        Ok(())
    }

    pub fn clear(&mut self, out: &mut impl Write) -> CommandResult {
        let _ = self.cart.clear();
        self.flush_notices(out)?;
        writeln!(out, "Carrito vaciado")?;
        Ok(())
    }

    pub fn reset(&mut self, out: &mut impl Write) -> CommandResult {
        self.cart.purge()?;
        writeln!(out, "Datos del carrito eliminados")?;
        Ok(())
    }

    pub fn list(&mut self, out: &mut impl Write, format: Format) -> CommandResult {
        self.flush_notices(out)?;
        let view = self.cart.view(self.currency);
        match format {
            Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?,
            Format::Text => render_view(out, &view)?,
        }
        Ok(())
    }

    pub fn totals(&mut self, out: &mut impl Write, format: Format) -> CommandResult {
        self.flush_notices(out)?;
        let totals = self.cart.totals();
        match format {
            Format::Json => {
                let value = serde_json::json!({
                    "total_items": totals.total_items,
                    "total_price": totals.total_price,
                });
                writeln!(out, "{value}")?;
            }
            Format::Text => {
                writeln!(out, "Productos: {}", totals.total_items)?;
                writeln!(out, "Total: {}", totals.total_price.display(self.currency))?;
            }
        }
        Ok(())
    }

    pub fn checkout(&mut self, out: &mut impl Write, format: Format) -> CommandResult {
        let Some(receipt) = self.cart.checkout() else {
            self.flush_notices(out)?;
            writeln!(out, "Tu carrito está vacío")?;
            return Ok(());
        };
        self.flush_notices(out)?;

        match format {
            Format::Json => {
                let value = serde_json::json!({
                    "receipt_id": receipt.id,
                    "placed_at": receipt.placed_at,
                    "total_items": receipt.total_items,
                    "total_price": receipt.total_price,
                    "items": CartView::from_items(&receipt.items, receipt.total_price, self.currency).items,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            }
            Format::Text => {
                writeln!(
                    out,
                    "Total a pagar: {}",
                    receipt.total_price.display(self.currency)
                )?;
                writeln!(out)?;
                writeln!(out, "¡Gracias por tu compra en NUTRIJOSEPH!")?;
            }
        }
        Ok(())
    }

    fn flush_notices(&self, out: &mut impl Write) -> std::io::Result<()> {
        for notice in self.notices.borrow_mut().drain(..) {
            writeln!(out, "{notice}")?;
        }
        Ok(())
    }
}

fn render_view(out: &mut impl Write, view: &CartView) -> std::io::Result<()> {
    if view.is_empty() {
        return writeln!(out, "Tu carrito está vacío");
    }

    for item in &view.items {
        writeln!(
            out,
            "{:<12} {:<28} {} x {:<4} {}",
            item.id, item.name, item.price, item.quantity, item.line_price
        )?;
    }
    writeln!(out, "Total: {}", view.subtotal)
}
