//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod pretty;
pub mod table;

pub use pretty::Pretty;

/// Print a single content item
pub fn print_item<T: Serialize + Pretty>(item: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::format_json(item)?),
        OutputFormat::Pretty | OutputFormat::Table => println!("{}", item.pretty()),
    }
    Ok(())
}

/// Print a list, converting to display rows `R` for table output
pub fn print_list<T, R>(items: &[T], format: OutputFormat) -> Result<()>
where
    T: Serialize + Pretty,
    R: Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Json => println!("{}", json::format_json(items)?),
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(R::from).collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Pretty => println!("{}", pretty::format_all(items)),
    }
    Ok(())
}
