use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pipeline::{apply_aliases, list_exporters, list_importers, Exporter, Importer};
use std::{fs, path::PathBuf};
use utils::{AliasFields, AliasStore};

#[derive(Parser, Debug)]
#[command(name = "extratos", about = "Convert Brazilian bank statement exports between formats.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available importers and exporters
    List,

    /// Convert a statement file into an export format
    Convert {
        /// Importer name (see `extratos list`)
        importer: String,

        /// Path to the statement file
        input: PathBuf,

        /// Exporter name (see `extratos list`)
        exporter: String,

        /// Output file path
        output: PathBuf,

        /// Account label for exporters that take one
        #[arg(short, long)]
        account: Option<String>,

        /// JSON alias table used to relabel transactions
        #[arg(long, default_value = "aliases.json")]
        aliases: PathBuf,
    },

    /// Manage the alias table
    Alias {
        #[command(subcommand)]
        command: AliasCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AliasCommand {
    /// Create or update the alias for a canonical description
    Set {
        /// Canonical (installment-stripped) description
        original: String,

        /// Display label to substitute
        alias: String,

        /// Optional category
        category: Option<String>,

        /// JSON alias table file
        #[arg(long, default_value = "aliases.json")]
        aliases: PathBuf,
    },

    /// Print the alias table
    List {
        /// JSON alias table file
        #[arg(long, default_value = "aliases.json")]
        aliases: PathBuf,
    },

    /// Replace the alias table from an exported JSON blob
    Import {
        /// Exported alias JSON file
        input: PathBuf,

        /// JSON alias table file
        #[arg(long, default_value = "aliases.json")]
        aliases: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::List => run_list(),
        Command::Convert {
            importer,
            input,
            exporter,
            output,
            account,
            aliases,
        } => run_convert(&importer, &input, &exporter, &output, account.as_deref(), &aliases),
        Command::Alias { command } => run_alias(command),
    }
}

fn run_list() -> Result<()> {
    println!("Importers:");
    for info in list_importers() {
        println!(
            "  • {} — {} ({})",
            info.name,
            info.description,
            info.extensions.join(", ")
        );
    }
    println!("Exporters:");
    for info in list_exporters() {
        println!("  • {} — {}", info.name, info.description);
    }
    Ok(())
}

fn run_convert(
    importer_name: &str,
    input: &PathBuf,
    exporter_name: &str,
    output: &PathBuf,
    account: Option<&str>,
    aliases_path: &PathBuf,
) -> Result<()> {
    let importer = Importer::from_name(importer_name)
        .ok_or_else(|| anyhow!("Unknown importer '{}' (try `extratos list`)", importer_name))?;
    let exporter = Exporter::from_name(exporter_name)
        .ok_or_else(|| anyhow!("Unknown exporter '{}' (try `extratos list`)", exporter_name))?;

    // Statement exports are not reliably UTF-8; decode what we can.
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    println!("📖 Parsing {} as {}", input.display(), importer_name);
    let mut transactions = importer
        .parse(text.as_bytes())
        .with_context(|| format!("parsing {}", input.display()))?;
    println!("✓ {} transactions imported", transactions.len());

    let store = AliasStore::load(aliases_path)?;
    apply_aliases(importer, &mut transactions, store.records());
    let relabeled = transactions.iter().filter(|t| t.alias.is_some()).count();
    if relabeled > 0 {
        println!("✓ {} transactions relabeled from the alias table", relabeled);
    }

    let document = exporter.generate(&transactions, account);
    fs::write(output, document).with_context(|| format!("writing {}", output.display()))?;
    println!("✅ Written to {}", output.display());
    Ok(())
}

fn run_alias(command: AliasCommand) -> Result<()> {
    match command {
        AliasCommand::Set {
            original,
            alias,
            category,
            aliases,
        } => {
            let mut store = AliasStore::load(&aliases)?;
            let list = store.upsert(
                &original,
                AliasFields {
                    alias: Some(alias),
                    category,
                },
            );
            store.save(&aliases)?;
            println!("✓ {} aliases saved to {}", list.len(), aliases.display());
        }
        AliasCommand::List { aliases } => {
            let store = AliasStore::load(&aliases)?;
            for record in store.records() {
                println!(
                    "  • {} → {} [{}]",
                    record.original, record.alias, record.category
                );
            }
        }
        AliasCommand::Import { input, aliases } => {
            let blob = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let mut store = AliasStore::load(&aliases)?;
            store.import_json(&blob)?;
            store.save(&aliases)?;
            println!(
                "✓ Alias table replaced ({} records)",
                store.records().len()
            );
        }
    }
    Ok(())
}
