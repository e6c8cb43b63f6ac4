use std::sync::Arc;
use std::thread;

use anyhow::Context;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use limitbook_engine::{
    EngineConfig, MatchingHandle, MatchingService, Order, Price, Quantity, Side, TracingSink,
    init_tracing,
};

const DEFAULT_ORDERS_PER_PRODUCER: usize = 1_000;
const PRODUCERS: u64 = 2;

fn print_help() {
    eprintln!(
        r#"limitbook - price-time priority matching demo

Starts a matching thread, places any seed orders, then lets two producer
threads submit random limit orders concurrently and prints the final book.

USAGE:
    limitbook [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --orders <N>        Orders per producer (default: 1000)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    LIMITBOOK_CONFIG    Config file used when --config is absent
    RUST_LOG            Log level filter (default: limitbook=info)

EXAMPLES:
    # Run with defaults
    limitbook

    # Show every match
    RUST_LOG=limitbook_engine=debug limitbook --orders 20
"#
    );
}

/// Totals one producer submitted, for the conservation check
#[derive(Debug, Default)]
struct Submitted {
    buy: i64,
    sell: i64,
}

fn produce(handle: MatchingHandle, producer: u64, count: usize) -> anyhow::Result<Submitted> {
    let mut rng = StdRng::seed_from_u64(producer);
    let mut submitted = Submitted::default();

    for i in 0..count {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = Price::new(rng.gen_range(95..=105));
        let quantity = Quantity::new(rng.gen_range(1..=10));
        let order = Order::new(
            format!("p{}-{}", producer, i),
            side,
            price,
            quantity,
            Utc::now(),
        );

        handle
            .submit(order)
            .with_context(|| format!("producer {} order {}", producer, i))?;

        match side {
            Side::Buy => submitted.buy += quantity.units(),
            Side::Sell => submitted.sell += quantity.units(),
        }
    }

    Ok(submitted)
}

fn print_orders(label: &str, orders: &[Order]) {
    println!("{} ({} orders)", label, orders.len());
    for order in orders {
        println!(
            "  {:>10} {:>4} {:>6} @ {:<6} {}",
            order.id,
            order.side,
            order.quantity(),
            order.price,
            order.created_at.format("%H:%M:%S%.6f")
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut orders_per_producer = DEFAULT_ORDERS_PER_PRODUCER;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    anyhow::bail!("--config requires a path argument");
                };
                config_path = Some(path.clone());
            }
            "--orders" | "-n" => {
                i += 1;
                let Some(n) = args.get(i) else {
                    anyhow::bail!("--orders requires a number");
                };
                orders_per_producer = n
                    .parse()
                    .with_context(|| format!("invalid --orders value '{}'", n))?;
            }
            arg => {
                print_help();
                anyhow::bail!("unknown argument: {}", arg);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::from_env()?,
    };

    init_tracing(config.log_format).context("failed to install tracing subscriber")?;
    tracing::info!(
        thread = %config.thread_name,
        buffer = config.command_buffer_size,
        seed_orders = config.seed_orders.len(),
        "Starting limitbook"
    );

    let core = config.build_core(Arc::new(TracingSink));
    let service = MatchingService::spawn(core, config.service_config())?;

    let mut expected_net = 0i64;
    for order in config.seed(Utc::now())? {
        let units = order.quantity().units();
        expected_net += match order.side {
            Side::Buy => units,
            Side::Sell => -units,
        };
        service.submit(order)?;
    }

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let handle = service.handle();
            thread::Builder::new()
                .name(format!("producer-{}", producer))
                .spawn(move || produce(handle, producer, orders_per_producer))
                .context("failed to spawn producer thread")
        })
        .collect::<anyhow::Result<_>>()?;

    for producer in producers {
        let submitted = producer
            .join()
            .map_err(|_| anyhow::anyhow!("producer thread panicked"))??;
        expected_net += submitted.buy - submitted.sell;
    }

    let snapshot = service.snapshot()?;
    print_orders("BUY", snapshot.buy_orders());
    print_orders("SELL", snapshot.sell_orders());

    let resting_net =
        snapshot.total_bid_quantity().units() - snapshot.total_ask_quantity().units();
    let stats = service.stats();
    println!(
        "sequence={} orders={} trades={} net_resting={} net_submitted={}",
        snapshot.sequence, stats.orders_processed, stats.trades_executed, resting_net, expected_net
    );

    service.shutdown();

    anyhow::ensure!(
        resting_net == expected_net,
        "conservation violated: resting {} != submitted {}",
        resting_net,
        expected_net
    );
    Ok(())
}
