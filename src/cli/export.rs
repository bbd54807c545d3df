//! Sheet export command

use crate::config::CliOverrides;
use crate::export::{pack_sheet, write_sheet};

use super::{CommandResult, Context};

/// Execute the export command
pub fn run_export(mut ctx: Context, overrides: &CliOverrides) -> CommandResult {
    ctx.apply(overrides)?;
    let (store, _) = ctx.open()?;

    let export = &ctx.config.export;
    let sheet = pack_sheet(store.require()?, export.columns, &export.name)?;
    let out_dir = ctx.resolve(&export.out);
    let written = write_sheet(&sheet, &out_dir, &ctx.config.export_options())?;

    println!(
        "Exported {} sprites ({}x{} grid, {}x{} px)",
        sheet.metadata.count,
        sheet.columns(),
        sheet.rows(),
        sheet.image.width(),
        sheet.image.height()
    );
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}
