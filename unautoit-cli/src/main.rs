mod commands;
mod progress;

#[derive(Debug, argh::FromArgs)]
#[argh(description = "an extractor and decompiler for compiled AutoIt binaries")]
struct Options {
    #[argh(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, argh::FromArgs)]
#[argh(subcommand)]
enum Subcommand {
    List(self::commands::list::Options),
    Extract(self::commands::extract::Options),
    ExtractAll(self::commands::extract_all::Options),
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();
    init_tracing();

    // Container parsing, decompression and tidying come from the linked backend.
    let decompiler = unautoit::Unlinked;

    match options.subcommand {
        Subcommand::List(options) => {
            self::commands::list::exec(options, &decompiler)?;
        }
        Subcommand::Extract(options) => {
            self::commands::extract::exec(options, &decompiler)?;
        }
        Subcommand::ExtractAll(options) => {
            self::commands::extract_all::exec(options, &decompiler)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
