use clap::{Parser, Subcommand};
use folio::build::Builder;
use folio::{config, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site builder for academic portfolios")]
#[command(long_about = "\
Static site builder for academic portfolios

Posts are rendered to HTML by an external tool; folio collects them together
with publication, talk, note and reading-list records and writes a static site.

Content structure:

  content/
  ├── site.meta.json               # Site metadata (optional, merged over defaults)
  ├── talks.meta.json              # {\"talks\": [...]}
  ├── reading.meta.json            # {\"items\": [...]}
  ├── css/  asset/                 # Copied to the output unchanged
  ├── posts/
  │   ├── 2024-06-01-slug.tex      # Source: date and slug in the name
  │   ├── slug.meta.json           # Title, tags, abstract
  │   ├── slug/index.html          # Rendered body (required to publish)
  │   └── 2024-06-01-slug.pdf      # Attachment (optional)
  ├── publications/
  │   ├── itp25.meta.json          # One record per publication
  │   └── itp25.pdf
  └── notes/
      ├── linear-algebra.meta.json
      └── linear-algebra.pdf

Run 'folio gen-config' to print the stock site.meta.json.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content and write the site
    Build,
    /// Validate the content directory without writing anything
    Check,
    /// Print the stock site.meta.json
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let builder = Builder::new(&cli.source, &cli.output);

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} → {}",
                builder.source().display(),
                builder.output().display()
            );
            let report = builder.build()?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", builder.output().display());
        }
        Command::Check => {
            println!("==> Checking {}", builder.source().display());
            let (meta, content) = builder.load()?;
            output::print_load_output(&meta, &content, builder.source());
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            println!("{}", config::stock_site_meta_json());
        }
    }

    Ok(())
}
