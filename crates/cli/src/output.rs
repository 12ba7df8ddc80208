//! Terminal rendering. Command output goes to stdout; notices at error
//! level go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use shopfront::cart::CartLedger;
use shopfront::{Notice, NoticeLevel};
use shopfront_core::{CartEntry, Product};

pub fn notice(notice: &Notice) {
    match notice.level() {
        NoticeLevel::Success => println!("✔ {notice}"),
        NoticeLevel::Info => println!("{notice}"),
        NoticeLevel::Error => eprintln!("✘ {notice}"),
    }
}

pub fn login_hint() {
    eprintln!("  run `shopfront login --token <TOKEN>` first");
}

pub fn empty(message: &str) {
    println!("{message}");
}

pub fn products(products: &[&Product]) {
    if products.is_empty() {
        empty("No products");
        return;
    }
    for product in products {
        println!(
            "{:<12} {:<32} {:>10}  stock {:<5} {}",
            product.id.as_str(),
            product.name,
            product.price.to_string(),
            product.stock,
            product.tags.join(", ")
        );
    }
}

pub fn product_detail(entry: &CartEntry) {
    println!("{}", entry.title);
    println!("  id:          {}", entry.id);
    println!("  price:       {}", entry.price);
    if let Some(category) = &entry.category {
        println!("  category:    {category}");
    }
    println!("  image:       {}", entry.image);
    println!("  description: {}", entry.description);
}

pub fn tags(label: &str, tags: &[&str]) {
    println!("{label}: {}", tags.join(" "));
}

pub fn cart(cart: &CartLedger) {
    if cart.is_empty() {
        empty("Cart is empty");
        return;
    }
    entries(cart.entries());
    println!("{:>58}", format!("subtotal {}", cart.subtotal()));
}

pub fn purchased(entries_bought: &[CartEntry]) {
    if entries_bought.is_empty() {
        empty("Nothing to purchase");
        return;
    }
    println!("Purchased:");
    entries(entries_bought);
}

/// Admin records, numbered for `admin edit <INDEX>`.
pub fn records(records: &[Product]) {
    if records.is_empty() {
        empty("No records");
        return;
    }
    for (index, record) in records.iter().enumerate() {
        println!(
            "[{index:>3}] {:<12} {:<32} {:>10}  stock {:<5} {}",
            record.id.as_str(),
            record.name,
            record.price.to_string(),
            record.stock,
            record.tags.join(", ")
        );
    }
}

fn entries(entries: &[CartEntry]) {
    for entry in entries {
        println!(
            "{:<12} {:<28} {:>4} x {:>10} = {:>10}",
            entry.id.as_str(),
            entry.title,
            entry.quantity().get(),
            entry.price.to_string(),
            entry.total().to_string()
        );
    }
}
