use std::{
    fmt,
    io::{self, Write},
};

use chrono::{DateTime, TimeZone};
use medwaste_core::{FlowCatalog, inventory::build_exchanges, service::BatchReport};

const HEADER: &str = "scenario,facility,process,pollutant,amount,unit,flow";

/// Write one CSV row per inventory exchange of every successful cell.
pub(crate) fn write_csv<W, Tz>(
    out: &mut W,
    batch: &BatchReport,
    catalog: &FlowCatalog,
    generated_at: DateTime<Tz>,
) -> io::Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    writeln!(out, "# generated_at {}", generated_at.to_rfc3339())?;
    writeln!(out, "{HEADER}")?;

    for cell in &batch.cells {
        let Some(emissions) = &cell.emissions else {
            continue;
        };
        for exchange in build_exchanges(emissions, catalog) {
            writeln!(
                out,
                "{},{},{},{},{:e},{},{}",
                field(&cell.scenario),
                field(&cell.facility),
                cell.process,
                exchange.pollutant,
                exchange.amount,
                exchange.unit.symbol(),
                exchange.flow,
            )?;
        }
    }
    out.flush()
}

/// Quote a free-text field when it would break the row.
fn field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_owned()
    }
}
