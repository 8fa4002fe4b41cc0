use crate::progress::BatchBars;
use anyhow::Context;
use std::path::PathBuf;
use unautoit::Decompiler;
use unautoit::ExtractOptions;
use unautoit::StyleOptions;

#[derive(Debug, argh::FromArgs)]
#[argh(
    subcommand,
    name = "extract-all",
    description = "extract every resource from a compiled AutoIt binary"
)]
pub struct Options {
    #[argh(positional, description = "the compiled binary")]
    pub input: PathBuf,

    #[argh(
        option,
        description = "the output directory",
        short = 'o',
        long = "output-dir",
        default = "PathBuf::from(ExtractOptions::DEFAULT_OUTPUT_DIR)"
    )]
    pub output_dir: PathBuf,

    #[argh(
        option,
        description = "style directives, default: 'spaces=4 use-tabs=off case-map=auto auto-cmt=on max-strsz=160 extra-nl=on'",
        default = "String::new()"
    )]
    pub style: String,
}

pub fn exec<D>(options: Options, decompiler: &D) -> anyhow::Result<()>
where
    D: Decompiler,
{
    let mut catalog = super::load_catalog(decompiler, &options.input)?;
    let extract_options =
        ExtractOptions::new(options.output_dir, StyleOptions::parse(&options.style));

    let bars = BatchBars::new()?;
    let report = unautoit::extract_all(decompiler, &mut catalog, &extract_options, &bars)
        .with_context(|| {
            format!(
                "failed to extract into \"{}\"",
                extract_options.output_dir.display()
            )
        })?;

    for (id, error) in report.failures() {
        eprintln!("[ Error ]: resource {id}: {error}");
    }
    println!(
        "[*] Extracted {} of {} resources to \"{}\"",
        report.succeeded(),
        report.outcomes.len(),
        extract_options.output_dir.display()
    );

    Ok(())
}
