//! CSV dump of a nation snapshot.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::aggregate::{NationAggregate, Nations};
use crate::error::Result;

const CSV_HEADER: &str = "name, centroid_x, centroid_z, total_area, records, collapsed";

/// `<name>, <x>, <z>, <area>, <records>, <collapsed>`
fn csv_row(name: &str, n: &NationAggregate) -> String {
    format!(
        "{}, {:.1}, {:.1}, {:.1}, {}, {}",
        quote(name),
        n.centroid_x,
        n.centroid_z,
        n.total_area,
        n.record_count,
        n.collapsed
    )
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write one row per nation to `path`.
///
/// Rows go to `<path>.tmp` first which is then renamed over `path`, so a
/// reader never sees a half-written file.
pub fn write_nations_csv(path: &Path, nations: &Nations) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    {
        let mut w = BufWriter::new(File::create(tmp)?);
        writeln!(w, "{}", CSV_HEADER)?;
        for (name, nation) in nations {
            writeln!(w, "{}", csv_row(name, nation))?;
        }
        w.flush()?;
    }

    fs::rename(tmp, path)?;
    Ok(())
}
