//! Plain-text order documents
//!
//! Fixed layout, deterministic output. Delivery (download, email) is up to the
//! caller.

use std::fmt::Write;

use shared::money::{self, format_money};
use shared::{CartLine, ContactFields, ProductRecord};

const ITEM_HEADER: &str = "Code | Name | Article | Manufacturer | Price | Qty | Sum";

pub struct OrderRenderer<'a> {
    lines: &'a [CartLine],
    contact: &'a ContactFields,
}

impl<'a> OrderRenderer<'a> {
    pub fn new(lines: &'a [CartLine], contact: &'a ContactFields) -> Self {
        Self { lines, contact }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Order\n");
        write_contact(&mut out, self.contact);

        out.push_str("\nItems:\n");
        out.push_str(ITEM_HEADER);
        out.push('\n');
        for line in self.lines {
            let p = &line.product;
            let _ = writeln!(
                out,
                "{} | {} | {} | {} | {} | {} | {}",
                p.code,
                p.name,
                p.article.as_deref().unwrap_or(""),
                p.manufacturer.as_deref().unwrap_or(""),
                p.price,
                line.qty,
                format_money(line.line_total()),
            );
        }

        let total = money::sum_money(self.lines.iter().map(CartLine::line_total));
        let _ = write!(out, "\nTotal: {}", format_money(total));
        out
    }
}

/// Order text for a list of cart lines
pub fn format_order(lines: &[CartLine], contact: &ContactFields) -> String {
    OrderRenderer::new(lines, contact).render()
}

/// Single-product order sent straight from the product table
pub fn format_express_order(product: &ProductRecord, qty: u32, contact: &ContactFields) -> String {
    let mut out = String::from("Express order\n");
    let _ = writeln!(out, "Code: {}", product.code);
    let _ = writeln!(out, "Name: {}", product.name);
    let _ = writeln!(out, "Article: {}", product.article.as_deref().unwrap_or(""));
    let _ = writeln!(
        out,
        "Manufacturer: {}",
        product.manufacturer.as_deref().unwrap_or("")
    );
    let _ = writeln!(out, "Price: {}", product.price);
    let _ = writeln!(out, "Qty: {}", qty);
    let _ = writeln!(
        out,
        "Sum: {}",
        format_money(money::line_total(product.amount(), qty))
    );
    write_contact(&mut out, contact);
    out
}

fn write_contact(out: &mut String, contact: &ContactFields) {
    let fields = [
        ("Company", contact.company()),
        ("Name", contact.name()),
        ("Email", contact.email()),
        ("Phone", contact.phone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "{}: {}", label, value);
        }
    }
}
