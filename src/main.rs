//! Benchmark harness: runs the MCES engines over instance files and
//! prints tab-separated timing tables. Wall-clock timeouts, when needed,
//! are imposed by whatever invokes this binary.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mces::{
    anchor_reach, enumerate_anchors, mces_all_products, mces_iterative, mces_pairwise,
    shrink_graphs, AnchorMode, Graph, McesConfig, McgregorConfig, PairwiseAnchor,
};

#[derive(Parser, Debug)]
#[command(name = "mces", version, about = "Anchored MCES benchmark tables")]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Shrink every graph to this radius around its anchor first.
    #[arg(long, global = true)]
    shrink: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pairwise McGregor over every graph pair of the instance file.
    Pairwise { file: PathBuf },
    /// Clique-based MCES over the whole graph sequence.
    Multi {
        file: PathBuf,
        /// Build one product across all graphs instead of iterating.
        #[arg(long)]
        all_products: bool,
        /// Build the full modular product instead of the anchor-limited one.
        #[arg(long)]
        no_limit: bool,
        /// Treat the inputs as unlabeled graphs.
        #[arg(long)]
        unlabeled: bool,
    },
}

fn load(file: &PathBuf, shrink: Option<u32>) -> Result<(Vec<Graph>, Vec<Vec<mces::Edge>>)> {
    let instances = mces::io::instance::read_instances(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let (mut graphs, anchors): (Vec<_>, Vec<_>) = instances.into_iter().unzip();
    if let Some(radius) = shrink {
        let (maps, diameter) = anchor_reach(&graphs, &anchors)?;
        info!(radius, diameter, "shrinking inputs");
        graphs = shrink_graphs(&graphs, radius, &maps);
    }
    Ok((graphs, anchors))
}

fn run_pairwise(file: &PathBuf, shrink: Option<u32>) -> Result<()> {
    let (graphs, _) = load(file, shrink)?;
    println!("g1 n/e\tg2 n/e\ttime (s)");
    for i in 0..graphs.len() {
        for j in (i + 1)..graphs.len() {
            // McGregor expects the smaller vertex set first.
            let (g, h) = if graphs[i].node_count() <= graphs[j].node_count() {
                (&graphs[i], &graphs[j])
            } else {
                (&graphs[j], &graphs[i])
            };
            let start = Instant::now();
            mces_pairwise(g, h, &PairwiseAnchor::none(), &McgregorConfig::default())?;
            let elapsed = start.elapsed().as_secs_f64();
            println!(
                "{}/{}\t{}/{}\t{elapsed:.5}",
                g.node_count(),
                g.edge_count(),
                h.node_count(),
                h.edge_count()
            );
        }
    }
    Ok(())
}

fn run_multi(
    file: &PathBuf,
    shrink: Option<u32>,
    all_products: bool,
    no_limit: bool,
    unlabeled: bool,
) -> Result<()> {
    let (graphs, anchored) = load(file, shrink)?;
    if graphs.len() < 2 {
        bail!("the instance file must contain at least two graphs");
    }

    let mode = if unlabeled {
        AnchorMode::Positional
    } else {
        AnchorMode::Typed
    };
    let anchors = enumerate_anchors(&graphs, &anchored, mode)?;
    if anchors.is_empty() {
        bail!("no valid anchor correspondence exists for the inputs");
    }
    let config = McesConfig {
        limit_product: !no_limit,
        molecule: !unlabeled,
    };

    let sequence: Vec<String> = (0..graphs.len()).map(|i| i.to_string()).collect();
    let sequence = sequence.join(" ");
    println!("graph seq\tmax extension\ttime (s)");
    for anchor in &anchors {
        let start = Instant::now();
        let mappings = if all_products {
            mces_all_products(&graphs, anchor, &config)?
        } else {
            mces_iterative(&graphs, anchor, &config)?
        };
        let elapsed = start.elapsed().as_secs_f64();
        let extension = mappings
            .iter()
            .map(|m| m.len())
            .max()
            .unwrap_or(anchor.len())
            - anchor.len();
        println!("{sequence}\t{extension}\t{elapsed:.2}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match &args.command {
        Command::Pairwise { file } => run_pairwise(file, args.shrink),
        Command::Multi {
            file,
            all_products,
            no_limit,
            unlabeled,
        } => run_multi(file, args.shrink, *all_products, *no_limit, *unlabeled),
    }
}
