use std::io;
use std::process::exit;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{error, info};

use memkv::{
    KvsEngine, LockedKvStore, NaiveThreadPool, RayonThreadPool, Result, ShardedKvStore,
    SharedQueueThreadPool, Shell, ThreadPool, WorkloadConfig, MAX_SHARDS,
};

const MAX_THREADS: i64 = 1024;
const MAX_TASKS: u64 = 1_000_000;

#[derive(Parser)]
#[command(name = "memkv", version, about = "A concurrent in-memory key-value store")]
struct Cli {
    /// Storage engine
    #[arg(long, value_enum, default_value_t = Engine::Sharded)]
    engine: Engine,

    /// Shard count for the sharded engine [default: 4 per CPU]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..=MAX_SHARDS as u64))]
    shards: Option<u64>,

    /// Thread pool used by CONCURRENCY_TEST
    #[arg(long, value_enum, default_value_t = Pool::SharedQueue)]
    pool: Pool,

    /// Worker threads in that pool
    #[arg(long, value_name = "N", default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=MAX_THREADS))]
    threads: u32,

    /// Writes issued by CONCURRENCY_TEST
    #[arg(long, value_name = "N", default_value_t = 20, value_parser = clap::value_parser!(u64).range(..=MAX_TASKS))]
    tasks: u64,

    /// Seconds CONCURRENCY_TEST waits for its writers
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    timeout: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Engine {
    Sharded,
    Locked,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pool {
    Naive,
    SharedQueue,
    Rayon,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let workload = WorkloadConfig {
        tasks: cli.tasks as usize,
        threads: cli.threads,
        timeout: Duration::from_secs(cli.timeout),
    };

    info!("memkv {}", env!("CARGO_PKG_VERSION"));
    info!("Storage engine: {:?}", cli.engine);
    info!("Thread pool: {:?} with {} threads", cli.pool, cli.threads);

    match cli.engine {
        Engine::Sharded => {
            let store = match cli.shards {
                Some(shards) => ShardedKvStore::with_shards(shards as usize),
                None => ShardedKvStore::new(),
            };
            info!("Shards: {}", store.shard_count());
            run_with_engine(store, cli.pool, workload)
        }
        Engine::Locked => run_with_engine(LockedKvStore::new(), cli.pool, workload),
    }
}

fn run_with_engine<E: KvsEngine>(engine: E, pool: Pool, workload: WorkloadConfig) -> Result<()> {
    match pool {
        Pool::Naive => run_shell::<E, NaiveThreadPool>(engine, workload),
        Pool::SharedQueue => run_shell::<E, SharedQueueThreadPool>(engine, workload),
        Pool::Rayon => run_shell::<E, RayonThreadPool>(engine, workload),
    }
}

fn run_shell<E: KvsEngine, P: ThreadPool>(engine: E, workload: WorkloadConfig) -> Result<()> {
    let shell: Shell<E, P> = Shell::new(engine, workload);
    shell.run(io::stdin().lock(), io::stdout().lock(), io::stderr())
}
