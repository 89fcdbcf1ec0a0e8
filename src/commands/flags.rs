use anyhow::Result;
use std::io::{self, Write};

use crate::technology::FlagTable;

pub(crate) fn write_flags<W: Write>(out: &mut W, table: &FlagTable) -> Result<()> {
    let width = table.iter().map(|(tech, _)| tech.label().len()).max().unwrap_or(0);
    for (tech, suffix) in table.iter() {
        writeln!(out, "{:<width$}  {}", tech.label(), suffix, width = width)?;
    }
    Ok(())
}

/// Print the silent-install flags used for each installer technology
pub fn flags(table: &FlagTable) -> Result<()> {
    write_flags(&mut io::stdout().lock(), table)
}
