use indicatif::DecimalBytes;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use unautoit::Decompiler;
use unautoit::ResourceInfo;

const HEADERS: [&str; 5] = ["ID", "NAME", "PATH", "SIZE", "TYPE"];

#[derive(Debug, argh::FromArgs)]
#[argh(
    subcommand,
    name = "list",
    description = "list the resources embedded in a compiled AutoIt binary"
)]
pub struct Options {
    #[argh(positional, description = "the compiled binary")]
    pub input: PathBuf,

    #[argh(switch, description = "print a JSON array instead of a table")]
    pub json: bool,
}

pub fn exec<D>(options: Options, decompiler: &D) -> anyhow::Result<()>
where
    D: Decompiler,
{
    let catalog = super::load_catalog(decompiler, &options.input)?;
    let infos = unautoit::list::list(decompiler, &catalog);

    let mut stdout = std::io::stdout().lock();
    if options.json {
        write_json(&mut stdout, &infos)?;
    } else {
        write_table(&mut stdout, &infos)?;
    }
    stdout.flush()?;

    Ok(())
}

/// Write the listing as a JSON array indented by 4 spaces.
fn write_json<W>(mut writer: W, infos: &[ResourceInfo]) -> anyhow::Result<()>
where
    W: Write,
{
    {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        infos.serialize(&mut serializer)?;
    }
    writeln!(writer)?;

    Ok(())
}

/// Write the listing as a bordered table, one row per resource.
fn write_table<W>(mut writer: W, infos: &[ResourceInfo]) -> std::io::Result<()>
where
    W: Write,
{
    let rows: Vec<[String; 5]> = infos
        .iter()
        .map(|info| {
            [
                info.id.to_string(),
                info.name.clone(),
                info.path.clone(),
                DecimalBytes(u64::from(info.decompressed_size)).to_string(),
                info.file_type.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in rows.iter() {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = std::cmp::max(*width, cell.chars().count());
        }
    }

    let mut border = String::new();
    for width in widths.iter() {
        border.push('+');
        border.push_str(&"-".repeat(width + 2));
    }
    border.push('+');

    writeln!(writer, "{border}")?;
    write_row(&mut writer, &HEADERS, &widths)?;
    writeln!(writer, "{border}")?;
    for row in rows.iter() {
        write_row(&mut writer, row, &widths)?;
    }
    writeln!(writer, "{border}")?;

    Ok(())
}

fn write_row<W, S>(mut writer: W, cells: &[S], widths: &[usize]) -> std::io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for (cell, width) in cells.iter().zip(widths.iter()) {
        let cell = cell.as_ref();
        write!(writer, "| {cell:<width$} ")?;
    }
    writeln!(writer, "|")
}
