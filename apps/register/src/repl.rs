//! # Register REPL
//!
//! One command per line on stdin, results on stdout.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line ──► Command::from_str ──► execute(&Session) ──► Reply             │
//! │               │                      │                   │              │
//! │               ▼                      ▼                   ▼              │
//! │        VALIDATION_ERROR      ApiError {code, ..}    text / Quit         │
//! │               └──────────────────────┴──► "error [CODE]: message"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed command never ends the session; only `quit` or end of input does.

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::commands::{bill, invoice, product};
use crate::display;
use crate::error::ApiError;
use crate::state::Session;
use till_core::receipt::render_receipt;
use till_core::Money;

const PROMPT: &str = "till> ";

pub const HELP: &str = "\
Catalog:
  products                                   list all products
  search <text>                              find products by name
  new-product <price> <stock> <name...>      add a product
  update-product <id> <price> <stock> <name...>
  restock <id> <stock>                       set stock on hand
  delete-product <id>
Bill:
  add <product-id> [qty]                     add to the bill (qty defaults to 1)
  remove <position>                          remove a bill line (1-based)
  customer <name> [; phone]                  set the customer (blank = walk-in)
  bill                                       show the bill and totals
  clear                                      start over
  checkout                                   commit the bill and print a receipt
Invoices:
  invoices                                   list invoices, newest first
  invoice <id>                               print an invoice receipt
  export <id>                                print an invoice as JSON
  report                                     invoice count and total sales
  help | quit
";

/// A parsed register command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products,
    Search(String),
    NewProduct { price: Money, stock: i64, name: String },
    UpdateProduct { id: i64, price: Money, stock: i64, name: String },
    Restock { id: i64, stock: i64 },
    DeleteProduct(i64),
    Add { product_id: i64, quantity: i64 },
    Remove(usize),
    Customer { name: String, phone: String },
    Bill,
    Clear,
    Checkout,
    Invoices,
    Invoice(i64),
    Export(i64),
    Report,
    Help,
    Quit,
}

/// What to do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl FromStr for Command {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "products" => Command::Products,
            "search" => Command::Search(rest.to_string()),
            "new-product" => {
                let (price, rest) = next_arg(rest, "price")?;
                let (stock, name) = next_arg(rest, "stock")?;
                Command::NewProduct {
                    price: parse_money(price)?,
                    stock: parse_int(stock, "stock")?,
                    name: required(name, "name")?,
                }
            }
            "update-product" => {
                let (id, rest) = next_arg(rest, "id")?;
                let (price, rest) = next_arg(rest, "price")?;
                let (stock, name) = next_arg(rest, "stock")?;
                Command::UpdateProduct {
                    id: parse_int(id, "id")?,
                    price: parse_money(price)?,
                    stock: parse_int(stock, "stock")?,
                    name: required(name, "name")?,
                }
            }
            "restock" => {
                let (id, stock) = next_arg(rest, "id")?;
                Command::Restock {
                    id: parse_int(id, "id")?,
                    stock: parse_int(&required(stock, "stock")?, "stock")?,
                }
            }
            "delete-product" => Command::DeleteProduct(parse_int(&required(rest, "id")?, "id")?),
            "add" => {
                let (id, qty) = next_arg(rest, "product id")?;
                let quantity = if qty.is_empty() {
                    1
                } else {
                    parse_int(qty, "quantity")?
                };
                Command::Add {
                    product_id: parse_int(id, "product id")?,
                    quantity,
                }
            }
            "remove" => {
                let position = required(rest, "position")?;
                let position = position.parse::<usize>().map_err(|_| {
                    ApiError::validation(format!("position must be a line number, got '{}'", position))
                })?;
                Command::Remove(position)
            }
            "customer" => {
                let (name, phone) = rest.split_once(';').unwrap_or((rest, ""));
                Command::Customer {
                    name: name.trim().to_string(),
                    phone: phone.trim().to_string(),
                }
            }
            "bill" => Command::Bill,
            "clear" => Command::Clear,
            "checkout" => Command::Checkout,
            "invoices" => Command::Invoices,
            "invoice" => Command::Invoice(parse_int(&required(rest, "id")?, "id")?),
            "export" => Command::Export(parse_int(&required(rest, "id")?, "id")?),
            "report" => Command::Report,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ApiError::validation(format!(
                    "Unknown command '{}'. Type 'help' for a list.",
                    other
                )))
            }
        };

        Ok(command)
    }
}

/// Splits off the first whitespace-separated argument.
fn next_arg<'a>(s: &'a str, field: &str) -> Result<(&'a str, &'a str), ApiError> {
    let s = s.trim_start();
    if s.is_empty() {
        return Err(ApiError::validation(format!("missing {}", field)));
    }
    Ok(match s.split_once(char::is_whitespace) {
        Some((arg, rest)) => (arg, rest.trim()),
        None => (s, ""),
    })
}

fn required(s: &str, field: &str) -> Result<String, ApiError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ApiError::validation(format!("missing {}", field)));
    }
    Ok(s.to_string())
}

fn parse_int(s: &str, field: &str) -> Result<i64, ApiError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("{} must be a whole number, got '{}'", field, s)))
}

fn parse_money(s: &str) -> Result<Money, ApiError> {
    Ok(s.parse::<Money>()?)
}

/// Runs one command against the session.
pub async fn execute(session: &Session, command: Command) -> Result<Reply, ApiError> {
    debug!(?command, "Executing command");

    let db = &session.db;
    let rate = session.config.tax_rate();

    let text = match command {
        Command::Products => display::product_table(&product::list_products(db).await?),
        Command::Search(query) => {
            display::product_table(&product::search_products(db, &query).await?)
        }
        Command::NewProduct { price, stock, name } => {
            let created = product::create_product(db, &name, price, stock).await?;
            format!("Created {}", display::product_line(&created))
        }
        Command::UpdateProduct {
            id,
            price,
            stock,
            name,
        } => {
            let updated = product::update_product(db, id, &name, price, stock).await?;
            format!("Updated {}", display::product_line(&updated))
        }
        Command::Restock { id, stock } => {
            let restocked = product::restock_product(db, id, stock).await?;
            format!("Restocked {}", display::product_line(&restocked))
        }
        Command::DeleteProduct(id) => {
            product::delete_product(db, id).await?;
            format!("Deleted product #{}\n", id)
        }
        Command::Add {
            product_id,
            quantity,
        } => {
            let line = bill::add_to_bill(db, &session.bill, product_id, quantity).await?;
            display::bill_line("Added", &line)
        }
        Command::Remove(position) => {
            let line = bill::remove_from_bill(&session.bill, position)?;
            display::bill_line("Removed", &line)
        }
        Command::Customer { name, phone } => {
            bill::set_customer(&session.bill, &name, &phone)?;
            let view = bill::get_bill(&session.bill, rate);
            format!("Customer: {}\n", view.customer_name)
        }
        Command::Bill => display::bill_view(&bill::get_bill(&session.bill, rate)),
        Command::Clear => {
            bill::clear_bill(&session.bill);
            "Bill cleared.\n".to_string()
        }
        Command::Checkout => {
            let committed = invoice::checkout(db, &session.bill, rate).await?;
            render_receipt(&committed)
        }
        Command::Invoices => display::invoice_table(&invoice::list_invoices(db).await?),
        Command::Invoice(id) => render_receipt(&invoice::get_invoice(db, id).await?),
        Command::Export(id) => {
            let mut json = invoice::export_invoice(db, id).await?;
            json.push('\n');
            json
        }
        Command::Report => display::report(&invoice::sales_report(db).await?),
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Text(text))
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Errors from individual commands are printed and the loop continues;
/// only terminal I/O failures end it early.
pub async fn run<R, W>(session: &Session, input: R, output: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    let banner = format!(
        "{} register. Type 'help' for commands.\n",
        session.config.store_name()
    );
    output.write_all(banner.as_bytes()).await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(command) => execute(session, command).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(Reply::Text(text)) => output.write_all(text.as_bytes()).await?,
            Ok(Reply::Quit) => break,
            Err(e) => {
                let message = format!("error [{}]: {}\n", e.code.as_str(), e.message);
                output.write_all(message.as_bytes()).await?;
            }
        }
    }

    output.write_all(b"Bye.\n").await?;
    output.flush().await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{AppConfig, DbState};
    use till_db::seed::seed_sample_catalog;
    use till_db::{Database, DbConfig};

    async fn session() -> Session {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_sample_catalog(&db).await.unwrap();
        Session::new(DbState::new(db), AppConfig::default())
    }

    async fn run_script(session: &Session, script: &str) -> String {
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("products".parse::<Command>().unwrap(), Command::Products);
        assert_eq!(
            "  ADD 3  ".parse::<Command>().unwrap(),
            Command::Add {
                product_id: 3,
                quantity: 1
            }
        );
        assert_eq!(
            "add 1 2".parse::<Command>().unwrap(),
            Command::Add {
                product_id: 1,
                quantity: 2
            }
        );
        assert_eq!(
            "new-product 12.50 40 Desk Fan Mini".parse::<Command>().unwrap(),
            Command::NewProduct {
                price: Money::from_cents(1250),
                stock: 40,
                name: "Desk Fan Mini".to_string()
            }
        );
        assert_eq!(
            "customer Ayesha Khan ; 0300-1234567".parse::<Command>().unwrap(),
            Command::Customer {
                name: "Ayesha Khan".to_string(),
                phone: "0300-1234567".to_string()
            }
        );
        assert_eq!(
            "customer".parse::<Command>().unwrap(),
            Command::Customer {
                name: String::new(),
                phone: String::new()
            }
        );
        assert_eq!(
            "search usb hub".parse::<Command>().unwrap(),
            Command::Search("usb hub".to_string())
        );
    }

    #[test]
    fn test_parse_errors_are_validation_errors() {
        for line in [
            "fly away",
            "add",
            "add x",
            "add 1 two",
            "remove -1",
            "new-product 12.50 40",
            "new-product abc 40 Fan",
            "restock 1",
            "invoice",
        ] {
            let err = line.parse::<Command>().unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "{}", line);
        }
    }

    #[tokio::test]
    async fn test_session_sells_and_archives() {
        let session = session().await;

        let out = run_script(
            &session,
            "search laptop\nadd 1 2\ncustomer Ayesha Khan ; 0300-1234567\nbill\ncheckout\nreport\nquit\n",
        )
        .await;

        assert!(out.contains("Laptop Stand"));
        assert!(out.contains("Added 2 x Laptop = RS1799.98"));
        assert!(out.contains("Customer: Ayesha Khan"));
        assert!(out.contains("INVOICE"));
        assert!(out.contains("GRAND TOTAL:"));
        assert!(out.contains("Invoices: 1\nTotal sales: RS1979.98"));
        assert!(out.ends_with("Bye.\n"));

        let laptop = session.db.inner().products().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(laptop.stock, 13);
        assert!(session.bill.with_bill(|bill| bill.is_empty()));
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_session() {
        let session = session().await;

        let out = run_script(&session, "checkout\nadd 1 99\nadd 999\nbogus\nremove 1\nbill\n").await;

        assert!(out.contains("error [EMPTY_BILL]"));
        assert!(out.contains("error [OUT_OF_STOCK]"));
        assert!(out.contains("error [NOT_FOUND]"));
        assert!(out.contains("error [VALIDATION_ERROR]: Unknown command 'bogus'"));
        assert!(out.contains("Bill is empty."));
        assert!(out.ends_with("Bye.\n"));
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_the_bill() {
        let session = session().await;

        // Laptop has 15 in stock; two entries of 10 each pass the add check
        let out = run_script(&session, "add 1 10\nadd 1 10\ncheckout\nbill\n").await;

        assert!(out.contains("error [COMMIT_FAILED]"));
        assert!(out.contains("RS17999.80"));
        let laptop = session.db.inner().products().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(laptop.stock, 15);
        assert_eq!(session.bill.with_bill(|bill| bill.len()), 2);
    }

    #[tokio::test]
    async fn test_catalog_maintenance_and_export() {
        let session = session().await;

        let out = run_script(
            &session,
            "new-product 12.50 4 Desk Fan\nrestock 16 10\nadd 16 3\ncheckout\nexport 1\ndelete-product 16\ninvoice 1\n",
        )
        .await;

        assert!(out.contains("Created #16 Desk Fan @ RS12.50 (4 in stock)"));
        assert!(out.contains("Restocked #16 Desk Fan @ RS12.50 (10 in stock)"));
        assert!(out.contains("\"product_name\": \"Desk Fan\""));
        assert!(out.contains("Deleted product #16"));
        // The archived receipt still prints after the product is gone
        assert_eq!(out.matches("Thank you for your business!").count(), 2);
    }

    #[tokio::test]
    async fn test_oversized_price_and_stock_are_rejected() {
        let session = session().await;

        let out = run_script(
            &session,
            "new-product 92233720368547758.07 2 Gold\nrestock 1 1000000001\nadd 1 1\nbill\n",
        )
        .await;

        assert!(out.contains("error [VALIDATION_ERROR]: price must be between 0 and 1000000000"));
        assert!(out.contains("error [VALIDATION_ERROR]: stock must be between 0 and 1000000000"));
        assert!(out.contains("RS989.99"));
        assert!(out.ends_with("Bye.\n"));
        assert_eq!(session.db.inner().products().count().await.unwrap(), 15);
    }
}
