// ============================================
// CLI - Запись леса из JSON описания
// ============================================

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use hypertree_writer::output::write_grid;
use hypertree_writer::{ForestDescription, MaskPolicy, OutputFormat, TopologyEncoder, TreeSource, WriterConfig};

#[derive(Parser, Debug)]
#[command(name = "hypertree-writer")]
#[command(about = "Serialize hyper tree grid forests into .vhg / .vhgz files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON forest description and write the container
    Encode {
        /// JSON forest description
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON writer config
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        format: Option<FormatArg>,

        #[arg(long)]
        mask_policy: Option<MaskPolicyArg>,

        /// Build the descriptor on the rayon pool
        #[arg(long)]
        parallel: bool,
    },
    /// Print grid parameters and per-level descriptor sizes
    Inspect {
        input: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Xml,
    Snapshot,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MaskPolicyArg {
    Traverse,
    Skip,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Encode { input, output, config, format, mask_policy, parallel } => {
            // Флаги CLI перекрывают файл настроек
            let mut writer_config = match config {
                Some(path) => WriterConfig::load(path)?,
                None => WriterConfig::default(),
            };
            if let Some(format) = format {
                writer_config.format = match format {
                    FormatArg::Xml => OutputFormat::Xml,
                    FormatArg::Snapshot => OutputFormat::Snapshot,
                };
            }
            if let Some(policy) = mask_policy {
                writer_config.mask_policy = match policy {
                    MaskPolicyArg::Traverse => MaskPolicy::Traverse,
                    MaskPolicyArg::Skip => MaskPolicy::Skip,
                };
            }
            writer_config.parallel |= parallel;

            let grid = ForestDescription::load(&input)?.into_grid()?;
            let descriptor = write_grid(&grid, &output, &writer_config)?;
            println!(
                "{} -> {} ({} trees, {} descriptor bits)",
                input.display(),
                output.display(),
                grid.stored_tree_count(),
                descriptor.len()
            );
        }
        Command::Inspect { input } => {
            let grid = ForestDescription::load(&input)?.into_grid()?;
            let descriptor = TopologyEncoder::default().encode(&grid)?;

            println!("Dimension:      {}", grid.dimension());
            println!("BranchFactor:   {}", grid.branch_factor());
            println!("GridSize:       {:?}", grid.grid_size());
            println!("Transposed:     {}", grid.transposed_root_indexing());
            println!("Trees:          {} of {}", grid.stored_tree_count(), grid.tree_count());
            println!("Levels:         {}", grid.number_of_levels());
            println!("Arrays:         {} point, {} field", grid.point_data().len(), grid.field_data().len());
            for (depth, size) in descriptor.level_sizes().iter().enumerate() {
                println!("  level {:>3}: {} nodes", depth, size);
            }
            println!("Branches:       {}", descriptor.branch_count());
        }
    }
    Ok(())
}
