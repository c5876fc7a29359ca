//! # Receipt Rendering
//!
//! Turns a committed [`Invoice`] into the fixed-width text the register
//! prints after checkout.
//!
//! ```text
//! ================================================
//!                   INVOICE
//! ================================================
//!
//! Invoice #: 1
//! Date: 2024-05-01 14:03:22
//! Customer: Walk-in Customer
//! Phone:
//!
//! ------------------------------------------------
//! ITEM                        QTY    PRICE      TOTAL
//! ------------------------------------------------
//! Laptop                        2 RS 899.99 RS  1799.98
//! ------------------------------------------------
//!                                  Subtotal: RS  1799.98
//!                                 Tax (10%): RS   180.00
//! ================================================
//!                              GRAND TOTAL: RS  1979.98
//! ================================================
//!
//!           Thank you for your business!
//! ```

use std::fmt::Write;

use crate::types::{Invoice, LineItem};

/// Width of the item name column.
pub const ITEM_COLUMN_WIDTH: usize = 25;

const RULE_HEAVY: &str = "================================================";
const RULE_LIGHT: &str = "------------------------------------------------";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the printable receipt for `invoice`.
pub fn render_receipt(invoice: &Invoice) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_receipt(&mut out, invoice);
    out
}

fn write_receipt(out: &mut String, invoice: &Invoice) -> std::fmt::Result {
    writeln!(out, "{}", RULE_HEAVY)?;
    writeln!(out, "{:>25}", "INVOICE")?;
    writeln!(out, "{}", RULE_HEAVY)?;
    writeln!(out)?;
    writeln!(out, "Invoice #: {}", invoice.id)?;
    writeln!(out, "Date: {}", invoice.issued_at.format(DATE_FORMAT))?;
    writeln!(out, "Customer: {}", invoice.customer_name)?;
    writeln!(out, "Phone: {}", invoice.customer_phone)?;
    writeln!(out)?;

    writeln!(out, "{}", RULE_LIGHT)?;
    writeln!(
        out,
        "{:<25} {:>5} {:>8} {:>10}",
        "ITEM", "QTY", "PRICE", "TOTAL"
    )?;
    writeln!(out, "{}", RULE_LIGHT)?;
    for item in &invoice.items {
        write_item(out, item)?;
    }
    writeln!(out, "{}", RULE_LIGHT)?;

    write_total(out, "Subtotal:", &invoice.subtotal().format_amount())?;
    write_total(
        out,
        &format!("Tax ({}):", invoice.tax_rate()),
        &invoice.tax().format_amount(),
    )?;
    writeln!(out, "{}", RULE_HEAVY)?;
    write_total(out, "GRAND TOTAL:", &invoice.grand_total().format_amount())?;
    writeln!(out, "{}", RULE_HEAVY)?;

    writeln!(out)?;
    writeln!(out, "          Thank you for your business!")
}

fn write_item(out: &mut String, item: &LineItem) -> std::fmt::Result {
    writeln!(
        out,
        "{:<25} {:>5} RS{:>7} RS{:>9}",
        truncate_chars(&item.product_name, ITEM_COLUMN_WIDTH),
        item.quantity,
        item.unit_price().format_amount(),
        item.line_total().format_amount()
    )
}

fn write_total(out: &mut String, label: &str, amount: &str) -> std::fmt::Result {
    writeln!(out, "{:>42} RS{:>9}", label, amount)
}

/// Cuts `s` to at most `max` characters, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn laptop_invoice() -> Invoice {
        Invoice {
            id: 1,
            customer_name: "Walk-in Customer".to_string(),
            customer_phone: String::new(),
            issued_at: Utc.with_ymd_and_hms(2024, 5, 1, 14, 3, 22).unwrap(),
            subtotal_cents: 179998,
            tax_cents: 18000,
            grand_total_cents: 197998,
            tax_rate_bps: 1000,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 14, 3, 22).unwrap(),
            items: vec![LineItem {
                product_id: 1,
                product_name: "Laptop".to_string(),
                unit_price_cents: 89999,
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_receipt_header_and_totals() {
        let text = render_receipt(&laptop_invoice());

        assert!(text.contains("Invoice #: 1\n"));
        assert!(text.contains("Date: 2024-05-01 14:03:22\n"));
        assert!(text.contains("Customer: Walk-in Customer\n"));
        assert!(text.contains(&format!("{:>42} RS{:>9}\n", "Subtotal:", "1799.98")));
        assert!(text.contains(&format!("{:>42} RS{:>9}\n", "Tax (10%):", "180.00")));
        assert!(text.contains(&format!("{:>42} RS{:>9}\n", "GRAND TOTAL:", "1979.98")));
        assert!(text.ends_with("Thank you for your business!\n"));
    }

    #[test]
    fn test_receipt_item_row() {
        let text = render_receipt(&laptop_invoice());
        let row = format!("{:<25} {:>5} RS{:>7} RS{:>9}\n", "Laptop", 2, "899.99", "1799.98");
        assert!(text.contains(&row));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut invoice = laptop_invoice();
        invoice.items[0].product_name = "Ergonomic Mouse Pad Deluxe Edition".to_string();

        let text = render_receipt(&invoice);
        assert!(text.contains("Ergonomic Mouse Pad Delux "));
        assert!(!text.contains("Deluxe"));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_chars("ééééé", 3), "ééé");
        assert_eq!(truncate_chars("abc", 25), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
