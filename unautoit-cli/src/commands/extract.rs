use crate::progress::TidyBar;
use indicatif::DecimalBytes;
use std::path::PathBuf;
use unautoit::naming;
use unautoit::Decompiler;
use unautoit::ExtractOptions;
use unautoit::StyleOptions;

#[derive(Debug, argh::FromArgs)]
#[argh(
    subcommand,
    name = "extract",
    description = "extract one resource by id from a compiled AutoIt binary"
)]
pub struct Options {
    #[argh(positional, description = "the compiled binary")]
    pub input: PathBuf,

    #[argh(option, description = "the id of the resource to extract, see the list command")]
    pub id: usize,

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

    let name = catalog
        .get(options.id)
        .map(|resource| bar_name(&resource.name, options.id))
        .unwrap_or_default();
    let bar = TidyBar::new(&name)?;
    let result = unautoit::extract_resource(
        decompiler,
        &mut catalog,
        options.id,
        &extract_options,
        &bar,
    );
    bar.finish();

    // A resource failure is reported, not propagated.
    match result {
        Ok(extracted) => {
            let len = u64::try_from(extracted.len).unwrap_or(u64::MAX);
            println!(
                "[*] Written {} to \"{}\"",
                DecimalBytes(len),
                extracted.path.display()
            );
        }
        Err(error) => {
            eprintln!("[ Error ]: {error}");
        }
    }

    Ok(())
}

/// The name shown next to the tidy bar, which is the output name for category resources.
fn bar_name(name: &str, id: usize) -> String {
    if naming::is_category(name) {
        naming::category_file_name(name, id)
    } else {
        name.to_string()
    }
}
