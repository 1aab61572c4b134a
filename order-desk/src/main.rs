//! order-desk command line host
//!
//! Drives the order desk session over a data directory holding `groups.json`
//! and `items.json`.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use order_desk::catalog::PAGE_SIZE_PRESETS;
use order_desk::logger::init_logger;
use order_desk::preferences::PREFERENCES_FILE;
use order_desk::{
    CatalogSource, CategoryStore, FileDelivery, JsonDirSource, LoadOutcome, OrderDelivery,
    OrderDesk, PageSize, SortDirection, SortKey, SortSpec, UiPreferences,
};
use shared::money;
use shared::{CartLine, CategoryNode, ContactFields, NodeId, Theme};

#[derive(Parser, Debug)]
#[command(name = "order-desk", version, about = "Browse a product catalog and build orders")]
struct Cli {
    /// Directory with groups.json and items.json
    #[arg(long, env = "ORDER_DESK_DATA", default_value = "./data")]
    data_dir: PathBuf,

    /// Preferences file (default: <data-dir>/preferences.json)
    #[arg(long, env = "ORDER_DESK_PREFS")]
    prefs: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "order_desk=trace"
    #[arg(long, env = "ORDER_DESK_LOG")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the category tree
    Tree {
        /// Keep only nodes whose name matches (and their ancestors)
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        expand_all: bool,
    },
    /// Print one page of the product table
    Products {
        #[command(flatten)]
        view: ViewArgs,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write every row of the filtered table as JSON
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Build an order from the cart and deliver it as a text file
    Order {
        /// CODE=QTY, repeatable
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<(String, String)>,
        /// Only order these codes (checked cart lines)
        #[arg(long = "only")]
        only: Vec<String>,
        #[command(flatten)]
        contact: ContactArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Send a single product straight away (express order)
    Quick {
        #[arg(long)]
        code: String,
        #[arg(long, default_value = "1")]
        qty: String,
        #[command(flatten)]
        contact: ContactArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Show or change the UI theme
    Theme {
        /// light, dark or toggle
        action: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Category node id restricting the table to its subtree
    #[arg(long)]
    group: Option<String>,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    article: String,
    #[arg(long, default_value = "")]
    manufacturer: String,
    #[arg(long, default_value = "")]
    price_min: String,
    #[arg(long, default_value = "")]
    price_max: String,
    /// name, article, manufacturer or price
    #[arg(long)]
    sort: Option<SortKey>,
    #[arg(long)]
    desc: bool,
    /// Preset page size or "all"
    #[arg(long)]
    page_size: Option<PageSize>,
    /// Custom page size, overrides the preset
    #[arg(long)]
    custom_size: Option<String>,
    #[arg(long, default_value = "1")]
    page: String,
}

#[derive(Args, Debug)]
struct ContactArgs {
    #[arg(long, default_value = "")]
    company: String,
    #[arg(long = "contact-name", default_value = "")]
    contact_name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
}

impl From<ContactArgs> for ContactFields {
    fn from(args: ContactArgs) -> Self {
        Self {
            company: args.company,
            name: args.contact_name,
            email: args.email,
            phone: args.phone,
        }
    }
}

fn parse_item(s: &str) -> Result<(String, String), String> {
    let (code, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=QTY, got {}", s))?;
    Ok((code.trim().to_string(), qty.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref(), cli.log_json);

    let prefs_path = cli
        .prefs
        .clone()
        .unwrap_or_else(|| cli.data_dir.join(PREFERENCES_FILE));
    let preferences = UiPreferences::load(&prefs_path)
        .with_context(|| format!("loading {}", prefs_path.display()))?;
    let source = JsonDirSource::new(&cli.data_dir);

    match cli.command {
        Command::Tree { search, expand_all } => {
            let mut desk = open_desk(&source, preferences).await?;
            let counts = desk.group_counts();
            let categories = desk.categories_mut();
            if expand_all {
                categories.expand_all();
            }
            if let Some(query) = search {
                categories.set_query(query);
            }
            let visible = categories.visible_tree();
            if visible.is_empty() {
                println!("(no categories)");
            }
            print_tree(&visible, categories, &counts, 0);
        }
        Command::Products { view, json } => {
            let mut desk = open_desk(&source, preferences).await?;
            apply_view(&mut desk, &source, &view).await?;

            let window = desk.catalog().current_page();
            if json {
                println!("{}", serde_json::to_string_pretty(&window)?);
            } else {
                for row in window.rows {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        row.code,
                        row.name,
                        row.article.as_deref().unwrap_or(""),
                        row.manufacturer.as_deref().unwrap_or(""),
                        row.price,
                    );
                }
                println!(
                    "page {} of {} ({} rows, presets {:?})",
                    window.page, window.total_pages, window.total_rows, PAGE_SIZE_PRESETS
                );
            }
        }
        Command::Export { view, out } => {
            let mut desk = open_desk(&source, preferences).await?;
            apply_view(&mut desk, &source, &view).await?;

            let records = desk.on_export();
            let content = serde_json::to_string_pretty(&records)?;
            tokio::fs::write(&out, content)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("exported {} rows to {}", records.len(), out.display());
        }
        Command::Order {
            items,
            only,
            contact,
            out,
        } => {
            let mut desk = open_desk(&source, preferences).await?;
            for (code, qty) in &items {
                if desk.on_quantity_change(code, qty).is_none() {
                    eprintln!("unknown product code: {}", code);
                }
            }
            if desk.cart().is_empty() {
                bail!("cart is empty");
            }

            let contact = ContactFields::from(contact);
            let (text, ordered) = if only.is_empty() {
                (desk.on_order_submit(&contact), desk.cart().lines().to_vec())
            } else {
                for code in &only {
                    desk.cart_mut().select(code, true);
                }
                (
                    desk.on_order_submit_selected(&contact),
                    desk.cart().selected_lines(),
                )
            };
            println!("{}", order_summary(&ordered));
            deliver(&FileDelivery::new(out), &text, "order.txt").await?;
        }
        Command::Quick {
            code,
            qty,
            contact,
            out,
        } => {
            let mut desk = open_desk(&source, preferences).await?;
            if !desk.open_quick_order(&code) {
                bail!("unknown product code: {}", code);
            }
            let quick = desk.quick_order_mut();
            quick.set_qty(&qty);
            quick.order();
            if let Some(fields) = quick.contact_mut() {
                *fields = ContactFields::from(contact);
            }
            let Some(order) = desk.quick_send() else {
                bail!("express order could not be built");
            };
            deliver(&FileDelivery::new(out), &order.text, &order.file_name).await?;
        }
        Command::Theme { action } => {
            let mut desk = OrderDesk::new(preferences);
            match action.as_deref() {
                None => {}
                Some("toggle") => {
                    desk.toggle_theme();
                }
                Some(other) => {
                    let theme: Theme = other.parse().map_err(anyhow::Error::msg)?;
                    desk.set_theme(theme);
                }
            }
            if action.is_some() {
                desk.preferences()
                    .save(&prefs_path)
                    .with_context(|| format!("saving {}", prefs_path.display()))?;
            }
            println!("{}", desk.theme());
        }
    }

    Ok(())
}

/// Load the tree and the whole catalog
async fn open_desk(source: &JsonDirSource, preferences: UiPreferences) -> Result<OrderDesk> {
    let mut desk = OrderDesk::new(preferences);
    if desk.open(source).await == LoadOutcome::Discarded {
        bail!("could not load products from {}", source.dir().display());
    }
    Ok(desk)
}

/// Group restriction, filters, sort and paging, in the order a user would set them
async fn apply_view(desk: &mut OrderDesk, source: &JsonDirSource, view: &ViewArgs) -> Result<()> {
    if let Some(group) = &view.group {
        let Some(request) = desk.on_group_select(&NodeId::from(group.as_str())) else {
            bail!("unknown category: {}", group);
        };
        let result = source.load_products().await;
        desk.complete_products(request.ticket, result);
    }

    let catalog = desk.catalog_mut();
    catalog.set_name_query(view.name.as_str());
    catalog.set_article_query(view.article.as_str());
    catalog.set_manufacturer_query(view.manufacturer.as_str());
    catalog.set_price_min(view.price_min.as_str());
    catalog.set_price_max(view.price_max.as_str());
    if let Some(key) = view.sort {
        let direction = if view.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        catalog.set_sort(SortSpec::new(key, direction));
    }
    if let Some(size) = view.page_size {
        catalog.set_page_size(size);
    }
    if let Some(custom) = &view.custom_size {
        catalog.set_custom_page_size(custom.as_str());
    }
    catalog.commit_page(&view.page);
    Ok(())
}

/// Line count, units and total of the lines that went into the order
fn order_summary(lines: &[CartLine]) -> String {
    let units: u64 = lines.iter().map(|l| u64::from(l.qty)).sum();
    let total = money::sum_money(lines.iter().map(CartLine::line_total));
    format!(
        "{} lines, {} items, total {}",
        lines.len(),
        units,
        money::format_money(total)
    )
}

async fn deliver(delivery: &dyn OrderDelivery, text: &str, file_name: &str) -> Result<()> {
    match delivery.deliver(text, file_name).await {
        Ok(location) => {
            println!("order written to {}", location);
            Ok(())
        }
        Err(e) => {
            eprintln!("order not delivered: {}", e);
            Err(e.into())
        }
    }
}

fn print_tree(
    nodes: &[CategoryNode],
    store: &CategoryStore,
    counts: &std::collections::HashMap<NodeId, usize>,
    depth: usize,
) {
    for node in nodes {
        let marker = match (node.has_children(), store.is_open(&node.id)) {
            (false, _) => " ",
            (true, true) => "-",
            (true, false) => "+",
        };
        println!(
            "{}{} {} [{}] ({})",
            "  ".repeat(depth),
            marker,
            node.name,
            node.code,
            counts.get(&node.id).copied().unwrap_or(0)
        );
        if store.is_open(&node.id) {
            print_tree(&node.children, store, counts, depth + 1);
        }
    }
}
