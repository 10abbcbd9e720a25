use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use mdsite::{BlockKind, Config, InlineKind};

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static HTML site from Markdown files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy static assets and render every page in the content directory
    Build {
        /// Site config file; defaults apply when it does not exist
        #[arg(short, long, default_value = "site.toml")]
        config: PathBuf,

        #[arg(long)]
        content: Option<PathBuf>,

        #[arg(long = "static")]
        static_dir: Option<PathBuf>,

        #[arg(long)]
        template: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert one Markdown file to an HTML fragment
    Convert {
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a Markdown file is split and classified
    Blocks {
        input: PathBuf,

        /// Also list inline spans of this kind (text, bold, italic, code, link, image)
        #[arg(long)]
        inline: Option<InlineKind>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build {
            config,
            content,
            static_dir,
            template,
            output,
        } => load_config(&config).and_then(|mut config| {
            if let Some(content) = content {
                config.content = content;
            }
            if let Some(static_dir) = static_dir {
                config.static_dir = static_dir;
            }
            if let Some(template) = template {
                config.template = template;
            }
            if let Some(output) = output {
                config.output = output;
            }
            build(&config)
        }),
        Command::Convert { input, output } => convert(&input, output.as_deref()),
        Command::Blocks { input, inline } => blocks(&input, inline),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn Error>> {
    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(Config::load(path)?.resolve(base))
}

fn build(config: &Config) -> Result<(), Box<dyn Error>> {
    let report = mdsite::site::build(config)?;
    println!(
        "Generated {} pages in {}",
        report.pages.len(),
        config.output.display()
    );
    Ok(())
}

fn read_input(input: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(input).map_err(|e| format!("reading {}: {}", input.display(), e).into())
}

fn convert(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let markdown = read_input(input)?;
    let html = mdsite::markdown_to_html(&markdown)?;

    match output {
        Some(output) => {
            fs::write(output, html)
                .map_err(|e| format!("writing {}: {}", output.display(), e))?;
            info!("Created {}", output.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn blocks(input: &Path, inline: Option<InlineKind>) -> Result<(), Box<dyn Error>> {
    let markdown = read_input(input)?;

    for (i, block) in mdsite::parse(&markdown).iter().enumerate() {
        let first_line = block.text.lines().next().unwrap_or_default();
        println!("{:>3} {:<15} {}", i, block.kind.to_string(), first_line);

        let Some(kind) = inline else { continue };
        if block.kind == BlockKind::Code {
            continue;
        }
        for span in mdsite::spans_of_kind(block.text, kind)? {
            match span.target() {
                Some(target) => println!("      {} {:?} -> {}", kind, span.text(), target),
                None => println!("      {} {:?}", kind, span.text()),
            }
        }
    }
    Ok(())
}
