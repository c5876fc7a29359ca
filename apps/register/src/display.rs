//! Plain-text views printed by the REPL.
//!
//! Receipts come from [`till_core::receipt::render_receipt`]; everything
//! else the cashier sees is laid out here.

use std::fmt::Write;

use crate::commands::bill::{BillDto, BillLineDto};
use crate::commands::invoice::SalesReport;
use till_core::receipt::truncate_chars;
use till_core::{Invoice, Money, Product, TaxRate};

const NAME_WIDTH: usize = 25;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Catalog table: id, name, price, stock.
pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<25} {:>12} {:>6}", "ID", "NAME", "PRICE", "STOCK");
    for p in products {
        let _ = writeln!(
            out,
            "{:>4}  {:<25} {:>12} {:>6}",
            p.id,
            truncate_chars(&p.name, NAME_WIDTH),
            p.price().to_string(),
            p.stock
        );
    }
    out
}

/// One catalog entry after a create/update/restock.
pub fn product_line(product: &Product) -> String {
    format!(
        "#{} {} @ {} ({} in stock)\n",
        product.id,
        product.name,
        product.price(),
        product.stock
    )
}

/// One bill row as confirmed after `add` or `remove`.
pub fn bill_line(verb: &str, line: &BillLineDto) -> String {
    format!(
        "{} {} x {} = {}\n",
        verb,
        line.quantity,
        line.name,
        Money::from_cents(line.line_total_cents)
    )
}

/// The active bill with running totals.
pub fn bill_view(bill: &BillDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Customer: {}", bill.customer_name);
    if !bill.customer_phone.is_empty() {
        let _ = writeln!(out, "Phone: {}", bill.customer_phone);
    }

    if bill.is_empty() {
        let _ = writeln!(out, "Bill is empty.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>3}  {:<25} {:>5} {:>12} {:>12}",
        "#", "ITEM", "QTY", "PRICE", "TOTAL"
    );
    for line in &bill.lines {
        let _ = writeln!(
            out,
            "{:>3}  {:<25} {:>5} {:>12} {:>12}",
            line.position,
            truncate_chars(&line.name, NAME_WIDTH),
            line.quantity,
            Money::from_cents(line.unit_price_cents).to_string(),
            Money::from_cents(line.line_total_cents).to_string()
        );
    }

    let rate = TaxRate::from_bps(bill.tax_rate_bps);
    let totals = [
        ("Subtotal:".to_string(), bill.subtotal_cents),
        (format!("Tax ({}):", rate), bill.tax_cents),
        ("Grand total:".to_string(), bill.grand_total_cents),
    ];
    for (label, cents) in totals {
        let _ = writeln!(out, "{:>48} {:>12}", label, Money::from_cents(cents).to_string());
    }
    out
}

/// Archive summary: one line per invoice, newest first.
pub fn invoice_table(invoices: &[Invoice]) -> String {
    if invoices.is_empty() {
        return "No invoices yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<19}  {:<25} {:>5} {:>12}",
        "NO", "DATE", "CUSTOMER", "QTY", "TOTAL"
    );
    for invoice in invoices {
        let _ = writeln!(
            out,
            "{:>5}  {:<19}  {:<25} {:>5} {:>12}",
            invoice.id,
            invoice.issued_at.format(DATE_FORMAT).to_string(),
            truncate_chars(&invoice.customer_name, NAME_WIDTH),
            invoice.total_quantity(),
            invoice.grand_total().to_string()
        );
    }
    out
}

pub fn report(report: &SalesReport) -> String {
    format!(
        "Invoices: {}\nTotal sales: {}\n",
        report.invoice_count,
        report.total_sales()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use till_core::{Bill, DEFAULT_TAX_RATE};

    fn product(name: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: 1,
            name: name.to_string(),
            price_cents,
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_table_truncates_long_names() {
        let long = "Ergonomic Mouse Pad With Wrist Rest";
        let out = product_table(&[product(long, 1999, 60)]);
        assert!(out.contains("Ergonomic Mouse Pad With "));
        assert!(!out.contains("Wrist Rest"));
        assert!(out.contains("RS19.99"));
    }

    #[test]
    fn test_empty_views() {
        assert_eq!(product_table(&[]), "No products found.\n");
        assert_eq!(invoice_table(&[]), "No invoices yet.\n");

        let view = bill_view(&BillDto::from_bill(&Bill::new(), DEFAULT_TAX_RATE));
        assert!(view.contains("Walk-in Customer"));
        assert!(view.contains("Bill is empty."));
    }

    #[test]
    fn test_bill_view_totals() {
        let mut bill = Bill::new();
        bill.add_item(&product("Laptop", 89999, 15), 2).unwrap();

        let view = bill_view(&BillDto::from_bill(&bill, DEFAULT_TAX_RATE));
        assert!(view.contains("RS1799.98"));
        assert!(view.contains("Tax (10%):"));
        assert!(view.contains("RS180.00"));
        assert!(view.contains("RS1979.98"));
    }

    #[test]
    fn test_report() {
        let out = report(&SalesReport {
            invoice_count: 2,
            total_sales_cents: 197998,
        });
        assert_eq!(out, "Invoices: 2\nTotal sales: RS1979.98\n");
    }
}
