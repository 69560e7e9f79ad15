// storefront_app/src/shell.rs

//! Line-oriented commands standing in for the storefront pages.

use crate::errors::{AppError, Result};
use crate::state::AppState;
use cartsync::{AddOutcome, CartItem, OrderSummary, ProductInput, ToggleOutcome, UserIdentity, WishlistItem};
use serde::Serialize;
use tracing::instrument;

pub const HELP: &str = "\
commands:
  add <product_id> <price> [qty] [name...]   add to cart
  qty <item_id> <quantity>                   set cart quantity (<= 0 removes)
  remove <item_id>                           remove cart row
  clear                                      empty the cart
  wish <product_id> <price> [name...]        toggle wishlist entry
  unwish <item_id>                           remove wishlist row
  move <wishlist_item_id>                    move wishlist row to cart
  cart | wishlist | summary | json           show state
  login <user_id> [email] | logout | whoami  session
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
  Add { input: ProductInput, quantity: u32 },
  SetQuantity { item_id: String, quantity: i64 },
  Remove { item_id: String },
  Clear,
  Wish { input: ProductInput },
  Unwish { item_id: String },
  Move { item_id: String },
  ShowCart,
  ShowWishlist,
  Summary,
  Json,
  Login { user: UserIdentity },
  Logout,
  WhoAmI,
  Help,
  Quit,
}

fn arg<'a>(args: &[&'a str], index: usize, name: &str) -> Result<&'a str> {
  args
    .get(index)
    .copied()
    .ok_or_else(|| AppError::Validation(format!("missing <{}>", name)))
}

fn number<N: std::str::FromStr>(raw: &str, name: &str) -> Result<N>
where
  N::Err: std::fmt::Display,
{
  raw
    .parse::<N>()
    .map_err(|e| AppError::Validation(format!("invalid <{}> '{}': {}", name, raw, e)))
}

fn product(product_id: &str, price: &str, name: &[&str]) -> Result<ProductInput> {
  let mut input = ProductInput::new(product_id, number::<f64>(price, "price")?);
  if !name.is_empty() {
    input = input.with_name(name.join(" "));
  }
  Ok(input)
}

impl Command {
  /// Parses one input line. Blank lines yield `Ok(None)`.
  pub fn parse(line: &str) -> Result<Option<Command>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = words.split_first() else {
      return Ok(None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
      "add" => {
        let product_id = arg(args, 0, "product_id")?;
        let price = arg(args, 1, "price")?;
        // An optional integer right after the price is the quantity.
        let (quantity, name) = match args.get(2).and_then(|raw| raw.parse::<u32>().ok()) {
          Some(quantity) => (quantity, &args[3..]),
          None => (1, args.get(2..).unwrap_or(&[])),
        };
        Command::Add {
          input: product(product_id, price, name)?,
          quantity,
        }
      }
      "qty" => Command::SetQuantity {
        item_id: arg(args, 0, "item_id")?.to_string(),
        quantity: number::<i64>(arg(args, 1, "quantity")?, "quantity")?,
      },
      "remove" | "rm" => Command::Remove {
        item_id: arg(args, 0, "item_id")?.to_string(),
      },
      "clear" => Command::Clear,
      "wish" => Command::Wish {
        input: product(arg(args, 0, "product_id")?, arg(args, 1, "price")?, args.get(2..).unwrap_or(&[]))?,
      },
      "unwish" => Command::Unwish {
        item_id: arg(args, 0, "item_id")?.to_string(),
      },
      "move" => Command::Move {
        item_id: arg(args, 0, "wishlist_item_id")?.to_string(),
      },
      "cart" | "ls" => Command::ShowCart,
      "wishlist" => Command::ShowWishlist,
      "summary" => Command::Summary,
      "json" => Command::Json,
      "login" => {
        let mut user = UserIdentity::new(arg(args, 0, "user_id")?);
        if let Some(email) = args.get(1) {
          user = user.with_email(*email);
        }
        Command::Login { user }
      }
      "logout" => Command::Logout,
      "whoami" => Command::WhoAmI,
      "help" | "?" => Command::Help,
      "quit" | "exit" => Command::Quit,
      other => return Err(AppError::Validation(format!("unknown command '{}' (try 'help')", other))),
    };
    Ok(Some(command))
  }
}

#[derive(Serialize)]
struct StateView {
  signed_in_as: Option<String>,
  cart: Vec<CartItem>,
  wishlist: Vec<WishlistItem>,
  summary: SummaryView,
}

#[derive(Serialize)]
struct SummaryView {
  item_count: u32,
  subtotal: f64,
  tax: f64,
  total: f64,
}

impl From<OrderSummary> for SummaryView {
  fn from(summary: OrderSummary) -> Self {
    Self {
      item_count: summary.item_count,
      subtotal: summary.subtotal,
      tax: summary.tax,
      total: summary.total,
    }
  }
}

fn render_cart(items: &[CartItem]) -> String {
  if items.is_empty() {
    return "cart is empty".to_string();
  }
  items
    .iter()
    .map(|item| {
      format!(
        "{}  {:<24} x{:<3} @ {:>8.2} = {:>9.2}   [product {}]",
        item.id,
        item.product_name,
        item.quantity,
        item.price,
        item.line_total(),
        item.product_id
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_wishlist(items: &[WishlistItem]) -> String {
  if items.is_empty() {
    return "wishlist is empty".to_string();
  }
  items
    .iter()
    .map(|item| format!("{}  {:<24} {:>8.2}   [product {}]", item.id, item.product_name, item.price, item.product_id))
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_summary(summary: &OrderSummary) -> String {
  format!(
    "items {}\nsubtotal {:>10.2}\ntax      {:>10.2}\ntotal    {:>10.2}",
    summary.item_count, summary.subtotal, summary.tax, summary.total
  )
}

/// What the main loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Quit,
}

/// Runs one command and returns the text to print.
#[instrument(name = "shell::execute", skip(state), err(Display))]
pub async fn execute(state: &AppState, command: Command) -> Result<(String, Flow)> {
  let cart = state.storefront.cart();
  let wishlist = state.storefront.wishlist();

  let output = match command {
    Command::Add { input, quantity } => match cart.add_item_with_quantity(input, quantity).await? {
      AddOutcome::Inserted(item) => format!("added {} ({})", item.product_name, item.id),
      AddOutcome::Incremented { id, quantity } => format!("row {} now has quantity {}", id, quantity),
      AddOutcome::AlreadyPresent => "already in cart".to_string(),
    },
    Command::SetQuantity { item_id, quantity } => {
      if !cart.update_quantity(&item_id, quantity).await? {
        return Err(AppError::NotFound(format!("cart row '{}'", item_id)));
      }
      render_cart(&cart.items())
    }
    Command::Remove { item_id } => {
      if !cart.remove_item(&item_id).await? {
        return Err(AppError::NotFound(format!("cart row '{}'", item_id)));
      }
      format!("removed {}", item_id)
    }
    Command::Clear => {
      cart.clear().await?;
      "cart cleared".to_string()
    }
    Command::Wish { input } => match wishlist.toggle_item(input).await? {
      ToggleOutcome::Added(item) => format!("wishlisted {} ({})", item.product_name, item.id),
      ToggleOutcome::Removed(item) => format!("removed {} from wishlist", item.product_name),
    },
    Command::Unwish { item_id } => {
      if !wishlist.remove_item(&item_id).await? {
        return Err(AppError::NotFound(format!("wishlist row '{}'", item_id)));
      }
      format!("removed {}", item_id)
    }
    Command::Move { item_id } => match state.storefront.move_to_cart(&item_id).await? {
      Some(_) => render_cart(&cart.items()),
      None => return Err(AppError::NotFound(format!("wishlist row '{}'", item_id))),
    },
    Command::ShowCart => render_cart(&cart.items()),
    Command::ShowWishlist => render_wishlist(&wishlist.items()),
    Command::Summary => render_summary(&cart.summary()),
    Command::Json => {
      let view = StateView {
        signed_in_as: state.session.user().map(|user| user.id),
        cart: cart.items(),
        wishlist: wishlist.items(),
        summary: cart.summary().into(),
      };
      serde_json::to_string_pretty(&view).map_err(|e| AppError::Internal(e.to_string()))?
    }
    Command::Login { user } => {
      let id = user.id.clone();
      state.session.sign_in(user);
      format!("signed in as {} (reloading)", id)
    }
    Command::Logout => {
      state.session.sign_out();
      "signed out (reloading)".to_string()
    }
    Command::WhoAmI => match state.session.user() {
      Some(user) => format!("{}{}", user.id, user.email.map(|e| format!(" <{}>", e)).unwrap_or_default()),
      None => "guest".to_string(),
    },
    Command::Help => HELP.to_string(),
    Command::Quit => return Ok(("bye".to_string(), Flow::Quit)),
  };
  Ok((output, Flow::Continue))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_add_with_quantity_and_name() {
    let command = Command::parse("add 2 149 3 Toor Dal 1kg").unwrap().unwrap();
    match command {
      Command::Add { input, quantity } => {
        assert_eq!(quantity, 3);
        assert_eq!(input.name.as_deref(), Some("Toor Dal 1kg"));
        assert_eq!(input.price, 149.0);
      }
      other => panic!("unexpected command {:?}", other),
    }
  }

  #[test]
  fn parses_add_without_quantity() {
    match Command::parse("add sku-9 12.5 Olive Oil").unwrap().unwrap() {
      Command::Add { input, quantity } => {
        assert_eq!(quantity, 1);
        assert_eq!(input.name.as_deref(), Some("Olive Oil"));
      }
      other => panic!("unexpected command {:?}", other),
    }
  }

  #[test]
  fn negative_quantity_is_accepted_for_qty() {
    assert_eq!(
      Command::parse("qty abc -1").unwrap(),
      Some(Command::SetQuantity {
        item_id: "abc".to_string(),
        quantity: -1
      })
    );
  }

  #[test]
  fn rejects_bad_input() {
    assert!(Command::parse("add 2").is_err());
    assert!(Command::parse("add 2 cheap").is_err());
    assert!(Command::parse("frobnicate").is_err());
    assert_eq!(Command::parse("   ").unwrap(), None);
  }

  #[test]
  fn parses_login_with_email() {
    match Command::parse("login u-1 a@example.com").unwrap().unwrap() {
      Command::Login { user } => {
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
      }
      other => panic!("unexpected command {:?}", other),
    }
  }
}
