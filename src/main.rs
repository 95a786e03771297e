//! OpenSASE POS - counter terminal

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use opensase_pos::report::DEFAULT_REPORT_DAYS;
use opensase_pos::{CatalogApi, Config, HttpCatalogApi, Money, PaymentMethod, ProductId, ReportRange, SaleComposer, SaleSession, SalesReport};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
  <text>              search products (blank line clears)
  /pick <n>           add the n-th search result
  /remove <id>        remove one unit of a product
  /pay cash|card|pix  select or deselect the payment method
  /submit             close the sale
  /cancel             empty the cart
  /cart               show the cart
  /products           list the catalog
  /categories         list categories
  /report [from to]   sales report (YYYY-MM-DD), last 7 days by default
  /quit";

#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Pick(usize),
    Remove(ProductId),
    Pay(String),
    Submit,
    Cancel,
    Cart,
    Products,
    Categories,
    Report(Option<(NaiveDate, NaiveDate)>),
    Help,
    Quit,
}

fn parse(line: &str) -> anyhow::Result<Command> {
    let Some(rest) = line.strip_prefix('/') else { return Ok(Command::Search(line.to_string())) };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();
    let cmd = match (name, args.as_slice()) {
        ("pick", [n]) => {
            let n: usize = n.parse().context("result number expected")?;
            if n == 0 { bail!("results are numbered from 1"); }
            Command::Pick(n - 1)
        }
        ("remove", [id]) => Command::Remove(ProductId::new(id.parse().context("product id expected")?)),
        ("pay", [method]) => Command::Pay(method.to_string()),
        ("submit", []) => Command::Submit,
        ("cancel", []) => Command::Cancel,
        ("cart", []) => Command::Cart,
        ("products", []) => Command::Products,
        ("categories", []) => Command::Categories,
        ("report", []) => Command::Report(None),
        ("report", [from, to]) => Command::Report(Some((date(from)?, date(to)?))),
        ("help", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => bail!("unknown command /{rest}, try /help"),
    };
    Ok(cmd)
}

fn date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date {raw:?}"))
}

async fn run(cmd: Command, session: &mut SaleSession, api: &dyn CatalogApi, config: &Config) -> opensase_pos::Result<()> {
    match cmd {
        Command::Search(text) => session.type_query(&text),
        Command::Pick(index) => match session.pick_result(index) {
            Some(Ok(())) => print_cart(session.composer()),
            Some(Err(_)) => {}
            None => println!("no search result #{}", index + 1),
        },
        Command::Remove(id) => {
            session.composer_mut().remove_one_unit(id);
            print_cart(session.composer());
        }
        Command::Pay(raw) => {
            let method: PaymentMethod = raw.parse()?;
            match session.composer_mut().toggle_payment_method(method) {
                Some(m) => println!("payment: {m}"),
                None => println!("payment: none"),
            }
        }
        Command::Submit => {
            if session.start_submit().is_ok() {
                println!("sending sale, total {}", session.composer().total());
            }
        }
        Command::Cancel => {
            session.composer_mut().cancel_sale();
            println!("sale cancelled");
        }
        Command::Cart => print_cart(session.composer()),
        Command::Products => {
            for p in api.list_products().await? {
                println!("  {:>5}  {:<30} {:>12}  stock {}", p.id(), p.name(), p.price_in(&config.currency).to_string(), p.stock_quantity());
            }
        }
        Command::Categories => {
            for c in api.list_categories().await? {
                println!("  {:>5}  {}", c.id(), c.name());
            }
        }
        Command::Report(dates) => {
            let range = match dates {
                Some((from, to)) => ReportRange::new(from, to)?,
                None => ReportRange::last_days(DEFAULT_REPORT_DAYS, Local::now().date_naive()),
            };
            let report = SalesReport::from_sales(range, api.sales_report(&range).await?);
            for line in report_lines(&report, &config.currency) {
                println!("{line}");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

/// One line per sale, its items indented below it, then the summary.
fn report_lines(report: &SalesReport, currency: &str) -> Vec<String> {
    let mut lines = vec![];
    for sale in &report.sales {
        lines.push(format!("  {}  {:>4} items  {}", sale.day().format("%d/%m/%Y"), sale.items_sold(), Money::new(sale.total_amount, currency)));
        for item in &sale.items {
            lines.push(format!("      {:<30} x{:<4} {:>12}", item.product_name_at_sale, item.quantity, Money::new(item.subtotal, currency).to_string()));
        }
    }
    lines.push(format!(
        "{} sales, {} items, total {}, average {}",
        report.sale_count, report.items_sold, report.total_in(currency), report.average_in(currency)
    ));
    lines
}

fn print_results(composer: &SaleComposer) {
    let search = composer.search();
    if search.is_empty_result() {
        println!("no product found for {:?}", search.query());
    }
    for (i, p) in search.results().iter().enumerate() {
        println!("  #{:<3} {:<30} {:>12}  stock {}", i + 1, p.name(), p.price_in(composer.cart().currency()).to_string(), p.stock_quantity());
    }
}

fn print_cart(composer: &SaleComposer) {
    let cart = composer.cart();
    for line in cart.lines() {
        println!("  {:>5}  {:<30} x{:<4} {:>12}", line.product_id, line.name, line.quantity, line.subtotal().to_string());
    }
    let payment = composer.payment_method().map(|m| m.to_string()).unwrap_or_else(|| "none".into());
    println!("total {}  payment {}  ({:?})", composer.total(), payment, composer.phase());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalogApi::new(&config)?);
    let (mut session, mut outcomes) = SaleSession::new(Arc::clone(&api), &config);
    tracing::info!(api = %config.api_url, session = %session.composer().session_id(), "🚀 OpenSASE POS counter ready");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => {
                        if let Err(e) = run(cmd, &mut session, api.as_ref(), &config).await {
                            println!("[error] {e}");
                        }
                    }
                    Err(e) => println!("[error] {e:#}"),
                }
                for notice in session.composer_mut().take_notices() {
                    println!("{notice}");
                }
            }
            Some(outcome) = outcomes.recv() => {
                if session.apply_search(outcome) {
                    print_results(session.composer());
                }
            }
            sold = session.settle_submit() => {
                if !sold {
                    print_cart(session.composer());
                }
                for notice in session.composer_mut().take_notices() {
                    println!("{notice}");
                }
            }
        }
    }
    Ok(())
}
